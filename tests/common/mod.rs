#![allow(dead_code)]

use dos2bin::{AnalyzeOptions, CompressionHandling, Segment};

pub fn init() {
    dos2bin::logging::init_tracing();
}

pub fn full_support() -> AnalyzeOptions {
    AnalyzeOptions {
        header_required: true,
        compression: CompressionHandling::FullSupport,
    }
}

/// Encode a standard segment header and body.
pub fn segment_bytes(first: u16, data: &[u8]) -> Vec<u8> {
    let last = first + (data.len() as u16 - 1);
    let mut out = Vec::with_capacity(4 + data.len());
    out.extend_from_slice(&first.to_le_bytes());
    out.extend_from_slice(&last.to_le_bytes());
    out.extend_from_slice(data);
    out
}

/// Encode a compressed segment: first address, zero last address, type byte
/// and the compressed stream.
pub fn compressed_bytes(first: u16, type_byte: u8, stream: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(5 + stream.len());
    out.extend_from_slice(&first.to_le_bytes());
    out.extend_from_slice(&[0x00, 0x00, type_byte]);
    out.extend_from_slice(stream);
    out
}

/// Build a file from $FFFF and the given encoded segments.
pub fn binary_bytes(parts: &[Vec<u8>]) -> Vec<u8> {
    let mut out = vec![0xFF, 0xFF];
    for part in parts {
        out.extend_from_slice(part);
    }
    out
}

pub fn run_segment(address: u16) -> Segment {
    Segment::new(0x02E0, address.to_le_bytes().to_vec())
}

pub fn init_segment(address: u16) -> Segment {
    Segment::new(0x02E2, address.to_le_bytes().to_vec())
}
