use crate::{BinaryFile, Range};

/// A rule deciding whether a file can be handled by some loader.
pub trait CompatibilityCheck {
    fn is_compatible(&self, binary: &BinaryFile) -> bool;
}

/// Compatible when no segment loads into the given memory area, e.g. the
/// area occupied by a loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvoidsMemory(pub Range);

impl CompatibilityCheck for AvoidsMemory {
    fn is_compatible(&self, binary: &BinaryFile) -> bool {
        !binary.covers_memory(self.0)
    }
}

impl BinaryFile {
    pub fn is_compatible(&self, check: &impl CompatibilityCheck) -> bool {
        check.is_compatible(self)
    }
}
