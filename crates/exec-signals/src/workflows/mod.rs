pub mod brief;
pub mod snapshot;
