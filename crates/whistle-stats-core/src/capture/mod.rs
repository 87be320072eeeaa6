mod lenient;
mod reader;
mod types;

pub use reader::CaptureReader;
pub use types::*;
