use std::path::Path;

use tracing::{debug, warn};

use super::compressed;
use super::error::{FormatError, FormatErrorKind};
use super::writer::LoadStream;
use crate::{BinaryFile, CompressionKind, Error, Segment};

/// Largest input accepted by the analyzer.
pub const MAX_FILE_SIZE: usize = 16 * 1024 * 1024;

const HEADER: [u8; 2] = [0xFF, 0xFF];

/// What the analyzer does with segments whose last address is zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompressionHandling {
    /// Treat them as standard segments (which then have a negative size).
    IgnoreCompression,
    /// Scan the compressed stream, then reject the file.
    #[default]
    ReportNotSupported,
    /// Scan the compressed stream and keep the segment.
    FullSupport,
}

#[derive(Debug, Clone)]
pub struct AnalyzeOptions {
    /// Reject input that does not start with $FFFF.
    pub header_required: bool,
    pub compression: CompressionHandling,
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        Self {
            header_required: true,
            compression: CompressionHandling::ReportNotSupported,
        }
    }
}

/// Parse a binary load file held in memory.
pub fn parse_dos2_binary(input: &[u8], options: &AnalyzeOptions) -> Result<BinaryFile, FormatError> {
    if input.len() > MAX_FILE_SIZE {
        return Err(FormatError::new(FormatErrorKind::FileTooLong, 0));
    }

    let has_header = input.starts_with(&HEADER);
    if options.header_required {
        if input.len() < 2 {
            return Err(FormatError::new(FormatErrorKind::TooShortForHeader, 0));
        }
        if !has_header {
            return Err(FormatError::new(FormatErrorKind::HeaderNotFound, 0));
        }
    }

    let mut pos = if has_header { 2 } else { 0 };
    let mut segments = Vec::new();

    while pos < input.len() {
        let segment_start = pos;

        // Repeated headers between segments are allowed
        if input.get(pos..pos + 2) == Some(&HEADER[..]) {
            pos += 2;
        }

        let first = read_word(input, pos)?;
        pos += 2;
        let last = read_word(input, pos)?;
        pos += 2;

        if options.compression != CompressionHandling::IgnoreCompression && last == 0 {
            let segment = parse_compressed(input, pos, first, segment_start)?;
            pos = segment.source_end;
            if options.compression == CompressionHandling::ReportNotSupported {
                warn!(
                    offset = segment_start,
                    compression = segment.compression.name(),
                    "compressed segment rejected"
                );
                return Err(FormatError::new(
                    FormatErrorKind::CompressionNotSupported,
                    segment_start,
                ));
            }
            segments.push(segment);
            continue;
        }

        if last < first {
            return Err(FormatError::new(
                FormatErrorKind::NegativeSegmentSize { first, last },
                segment_start,
            ));
        }

        let len = usize::from(last - first) + 1;
        let body = input
            .get(pos..pos + len)
            .ok_or_else(|| FormatError::new(FormatErrorKind::TruncatedSegment, pos))?;
        pos += len;

        debug!(offset = segment_start, "segment {first:04X}-{last:04X} parsed");
        segments.push(Segment::new(first, body.to_vec()).with_source(segment_start, pos));
    }

    Ok(BinaryFile::from_analysis(
        segments,
        input.len(),
        options.compression,
    ))
}

/// Read and parse a binary load file from disk.
pub fn read_dos2_binary_file(
    path: impl AsRef<Path>,
    options: &AnalyzeOptions,
) -> Result<BinaryFile, Error> {
    let path = path.as_ref();

    let metadata = std::fs::metadata(path)?;
    if metadata.is_file() && metadata.len() > MAX_FILE_SIZE as u64 {
        return Err(FormatError::new(FormatErrorKind::FileTooLong, 0)
            .with_filename(path)
            .into());
    }

    let data = std::fs::read(path)?;
    let mut binary = parse_dos2_binary(&data, options).map_err(|e| e.with_filename(path))?;
    binary.set_filename(path);
    Ok(binary)
}

/// Serialize segments back to a binary load file: $FFFF, then every segment
/// header and body in order.
pub fn write_dos2_binary(binary: &BinaryFile) -> Vec<u8> {
    let total: usize = binary
        .segments()
        .iter()
        .map(|s| s.header_len() + s.len())
        .sum();
    let mut out = LoadStream::with_capacity(2 + total);
    out.push_header();
    for segment in binary.segments() {
        out.push_segment(segment);
    }
    out.into_bytes()
}

fn read_word(input: &[u8], pos: usize) -> Result<u16, FormatError> {
    match input.get(pos..pos + 2) {
        Some(&[low, high]) => Ok(u16::from_le_bytes([low, high])),
        _ => Err(FormatError::new(FormatErrorKind::TruncatedSegment, pos)),
    }
}

fn parse_compressed(
    input: &[u8],
    pos: usize,
    first: u16,
    segment_start: usize,
) -> Result<Segment, FormatError> {
    let type_byte = *input
        .get(pos)
        .ok_or_else(|| FormatError::new(FormatErrorKind::TruncatedSegment, pos))?;
    let body_start = pos + 1;

    let kind = CompressionKind::from_type_byte(type_byte).ok_or_else(|| {
        FormatError::new(
            FormatErrorKind::UnsupportedCompressionType(type_byte),
            body_start,
        )
    })?;

    let end = compressed::stream_end(kind, input, body_start).map_err(|e| {
        let reason = match kind {
            CompressionKind::Lz4 => FormatErrorKind::TruncatedCompressedData,
            _ => FormatErrorKind::DecompressionFailed,
        };
        FormatError::new(reason, e.position)
    })?;

    debug!(
        offset = segment_start,
        compression = kind.name(),
        length = end - body_start,
        "compressed segment at {first:04X} parsed"
    );

    Ok(
        Segment::compressed(first, kind, input[body_start..end].to_vec())
            .with_source(segment_start, end),
    )
}
