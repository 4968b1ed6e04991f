use thiserror::Error;

use crate::io::FormatError;
use crate::ops::ProcessingError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("binary file error: {0}")]
    Format(#[from] FormatError),

    #[error("binary file processing error: {0}")]
    Processing(#[from] ProcessingError),
}
