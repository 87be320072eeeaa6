pub mod analysis;
pub mod capture;
pub mod error;
pub mod filter;
pub mod format;
pub mod metrics;

pub use error::{Error, Result};
