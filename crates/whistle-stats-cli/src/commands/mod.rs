pub mod completion;
pub mod stats;
