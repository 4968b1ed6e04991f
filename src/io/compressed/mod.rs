//! End-of-stream scanners for in-stream compressed segments.
//!
//! The scanners never produce decompressed data. They follow the command
//! stream of each format just far enough to find where it ends, so the
//! compressed bytes can be kept verbatim.

mod aplib;
mod bits;
mod lz4;
mod zx0;

use thiserror::Error;

use crate::segment::CompressionKind;

/// A compressed stream needed a byte past the end of the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("compressed stream ends prematurely at offset {position}")]
pub struct ScanError {
    pub position: usize,
}

/// Return the offset just past the compressed stream that starts at `start`.
///
/// Uncompressed input has nothing to scan and ends where it starts.
pub fn stream_end(kind: CompressionKind, data: &[u8], start: usize) -> Result<usize, ScanError> {
    let end = match kind {
        CompressionKind::None => return Ok(start),
        CompressionKind::Lz4 => lz4::scan_lz4(data, start)?,
        CompressionKind::Zx0 => zx0::scan_zx0(data, start)?,
        CompressionKind::Aplib => aplib::scan_aplib(data, start)?,
    };
    tracing::trace!(
        compression = kind.name(),
        start,
        end,
        "compressed stream scanned"
    );
    Ok(end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_by_kind() {
        assert_eq!(stream_end(CompressionKind::Lz4, &[0, 0, 0], 0), Ok(3));
        assert_eq!(
            stream_end(CompressionKind::Zx0, &[0xC0, 0xAA, 0x00, 0x20], 0),
            Ok(4)
        );
        assert_eq!(
            stream_end(CompressionKind::Aplib, &[0x41, 0xC0, 0x00], 0),
            Ok(3)
        );
        assert_eq!(stream_end(CompressionKind::None, &[1, 2, 3], 1), Ok(1));
    }

    #[test]
    fn test_error_reports_position() {
        let err = stream_end(CompressionKind::Lz4, &[0x00, 0x00], 0).unwrap_err();
        assert_eq!(err.position, 2);
    }
}
