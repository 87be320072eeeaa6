use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to read capture file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse capture: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid capture structure: {0}")]
    InvalidStructure(String),

    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),
}

pub type Result<T> = std::result::Result<T, Error>;
