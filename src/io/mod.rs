pub mod compressed;
mod dos2;
mod error;
mod writer;

pub use compressed::{ScanError, stream_end};
pub use dos2::{
    AnalyzeOptions, CompressionHandling, MAX_FILE_SIZE, parse_dos2_binary, read_dos2_binary_file,
    write_dos2_binary,
};
pub use error::{FormatError, FormatErrorKind};
pub use writer::LoadStream;
