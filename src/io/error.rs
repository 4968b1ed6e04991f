use std::path::Path;

use thiserror::Error;

/// Reason a byte stream was rejected as a binary load file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatErrorKind {
    #[error("binary file is too long, file size exceeds 16 MB")]
    FileTooLong,

    #[error("the binary file is too short to have a header")]
    TooShortForHeader,

    #[error("binary file header not found, first two bytes do not have values of 255 $FF")]
    HeaderNotFound,

    #[error("segment or segment header continues beyond end of binary file")]
    TruncatedSegment,

    #[error("segment with negative size found ({first:05}-{last:05} [{first:04X}-{last:04X}])")]
    NegativeSegmentSize { first: u16, last: u16 },

    #[error("compressed segments not supported by the selected function")]
    CompressionNotSupported,

    #[error("unsupported compression type ${0:02X}")]
    UnsupportedCompressionType(u8),

    #[error("compressed data continues beyond end of file")]
    TruncatedCompressedData,

    #[error("decompression failed")]
    DecompressionFailed,
}

/// A malformed or unsupported binary load file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}{kind}. Offset: {offset:05} ${offset:04X}", file_prefix(.filename))]
pub struct FormatError {
    pub kind: FormatErrorKind,
    /// Position in the input where the problem was detected.
    pub offset: usize,
    /// Base name of the input file, when it came from one.
    pub filename: Option<String>,
}

fn file_prefix(filename: &Option<String>) -> String {
    filename
        .as_deref()
        .map(|name| format!("{name}: "))
        .unwrap_or_default()
}

impl FormatError {
    pub fn new(kind: FormatErrorKind, offset: usize) -> Self {
        Self {
            kind,
            offset,
            filename: None,
        }
    }

    /// Attach the input file name. Only the last path component is kept.
    pub fn with_filename(mut self, path: &Path) -> Self {
        self.filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned());
        self
    }

    /// True when the input is not a binary load file at all, as opposed to a
    /// corrupt one.
    pub fn is_alien(&self) -> bool {
        matches!(
            self.kind,
            FormatErrorKind::TooShortForHeader | FormatErrorKind::HeaderNotFound
        )
    }
}
