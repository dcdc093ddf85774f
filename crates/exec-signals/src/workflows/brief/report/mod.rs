mod render;
pub mod views;

pub use render::{render_brief, report_lines, write_brief, NO_ACTIVITY_LINE, NO_DATA_LINE};
