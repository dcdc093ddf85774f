mod compiler;
pub mod domain;
pub mod extractor;
mod pipeline;
pub mod report;

pub use compiler::{BriefCompiler, BriefError};
pub use domain::{
    Brief, BriefScope, Post, PostDetails, Profile, ReportingWindow, Signal, SignalCategory,
};
pub use extractor::{extract_signals, KeywordRule, KeywordTable, KeywordTableScorer, SignalScorer};
pub use pipeline::BriefPipeline;
pub use report::{render_brief, write_brief};
