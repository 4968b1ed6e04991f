//! Atari DOS 2 binary load files ("XEX").
//!
//! A binary load file is a sequence of segments, each loaded at its own
//! address. Segments that cover $02E0-$02E1 (RUN) or $02E2-$02E3 (INIT)
//! install entry points. This crate parses such files, including segments
//! compressed with LZ4, ZX0 or aPLib, answers questions about their layout
//! and converts them to a single contiguous segment.

pub mod binary;
pub mod error;
pub mod io;
pub mod logging;
pub mod ops;
pub mod range;
pub mod segment;

pub use binary::{BinaryFile, FileStatistics};
pub use error::Error;
pub use io::{
    AnalyzeOptions, CompressionHandling, FormatError, FormatErrorKind, LoadStream, MAX_FILE_SIZE,
    ScanError, parse_dos2_binary, read_dos2_binary_file, write_dos2_binary,
};
pub use ops::{
    AvoidsMemory, CompatibilityCheck, MonolithicConversionInfo, MonolithicOptions,
    ProcessingError,
};
pub use range::{INIT_VECTOR, RUN_VECTOR, Range, RangeError};
pub use segment::{CompressionKind, Segment, SegmentPortion};
