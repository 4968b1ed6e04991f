mod check;
mod error;
mod monolithic;
mod transform;

pub use check::{AvoidsMemory, CompatibilityCheck};
pub use error::ProcessingError;
pub use monolithic::{MonolithicConversionInfo, MonolithicOptions};
