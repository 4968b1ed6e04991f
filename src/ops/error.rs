use thiserror::Error;

/// A transform of an already analyzed file could not be carried out.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProcessingError {
    #[error("the binary file has no segments")]
    NoSegments,

    #[error("segments of the binary file overlap, segment: {segment}")]
    SegmentsOverlap { segment: String },

    #[error("segment extends beyond address $FFFF, segment: {segment}")]
    SegmentOutOfRange { segment: String },

    #[error("compressed segments cannot be merged")]
    CompressedSegment,

    #[error("address of the code that replaces INIT segments is not valid (0-65535): {0}")]
    InvalidExtraCodeAddress(u32),

    #[error(
        "code that replaces INIT segments would span beyond address 65535 ({length} bytes at {address})"
    )]
    ExtraCodeOutOfRange { address: u32, length: usize },

    #[error("internal error when determining lowest and highest address")]
    EmptyImage,

    #[error("the binary file is not monolithic")]
    NotMonolithic,

    #[error("none of the segments can be used to determine the RUN address")]
    NoRunAddress,

    #[error("maximum segment size must be at least 1")]
    InvalidMaxSegmentSize,
}
