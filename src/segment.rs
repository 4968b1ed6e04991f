use std::fmt;

use crate::range::{INIT_VECTOR, RUN_VECTOR, Range};

/// Payload encoding of a segment.
///
/// Compressed segments are announced in the segment header by a zero last
/// address followed by a type byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CompressionKind {
    #[default]
    None,
    Lz4,
    Zx0,
    Aplib,
}

impl CompressionKind {
    pub fn from_type_byte(byte: u8) -> Option<Self> {
        match byte {
            0x00 => Some(CompressionKind::Lz4),
            0x01 => Some(CompressionKind::Aplib),
            0x02 => Some(CompressionKind::Zx0),
            _ => None,
        }
    }

    /// Type byte that follows the segment header on disk.
    pub fn type_byte(self) -> Option<u8> {
        match self {
            CompressionKind::None => None,
            CompressionKind::Lz4 => Some(0x00),
            CompressionKind::Aplib => Some(0x01),
            CompressionKind::Zx0 => Some(0x02),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            CompressionKind::None => "none",
            CompressionKind::Lz4 => "LZ4",
            CompressionKind::Zx0 => "ZX0",
            CompressionKind::Aplib => "aPLib",
        }
    }
}

/// A contiguous run of segment bytes that does not touch a vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentPortion<'a> {
    pub address: u16,
    pub data: &'a [u8],
}

/// One addressed block of a binary load file.
///
/// For compressed segments `data` holds the compressed stream exactly as it
/// appears after the type byte; nothing is decompressed.
#[derive(Debug, Clone, Eq)]
pub struct Segment {
    pub first_address: u16,
    pub data: Vec<u8>,
    pub compression: CompressionKind,
    /// Offset of the segment header in the source file.
    pub source_offset: usize,
    /// Offset just past the segment body in the source file.
    pub source_end: usize,
}

/// Segments compare by what they load, not by where they were read from.
impl PartialEq for Segment {
    fn eq(&self, other: &Self) -> bool {
        self.first_address == other.first_address
            && self.compression == other.compression
            && self.data == other.data
    }
}

impl Segment {
    pub fn new(first_address: u16, data: Vec<u8>) -> Self {
        Self {
            first_address,
            data,
            compression: CompressionKind::None,
            source_offset: 0,
            source_end: 0,
        }
    }

    pub fn compressed(first_address: u16, compression: CompressionKind, data: Vec<u8>) -> Self {
        Self {
            first_address,
            data,
            compression,
            source_offset: 0,
            source_end: 0,
        }
    }

    /// Record where the segment was found in the source file.
    pub fn with_source(mut self, offset: usize, end: usize) -> Self {
        self.source_offset = offset;
        self.source_end = end;
        self
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn is_compressed(&self) -> bool {
        self.compression != CompressionKind::None
    }

    /// Last loaded address. `None` for compressed or empty segments.
    pub fn last_address(&self) -> Option<u16> {
        self.range().map(|r| r.last())
    }

    /// Address range covered by the payload. `None` for compressed or empty
    /// segments, and for payloads running past $FFFF.
    pub fn range(&self) -> Option<Range> {
        if self.is_compressed() || self.data.is_empty() {
            return None;
        }
        Range::from_start_length(self.first_address, self.data.len() as u32).ok()
    }

    fn touches(&self, vector: &Range) -> bool {
        self.range().is_some_and(|r| r.overlaps(vector))
    }

    fn covers(&self, vector: &Range) -> bool {
        self.range().is_some_and(|r| r.covers(vector))
    }

    pub fn has_full_run_vector(&self) -> bool {
        self.covers(&RUN_VECTOR)
    }

    pub fn has_full_init_vector(&self) -> bool {
        self.covers(&INIT_VECTOR)
    }

    pub fn has_partial_run_vector(&self) -> bool {
        self.touches(&RUN_VECTOR)
    }

    pub fn has_partial_init_vector(&self) -> bool {
        self.touches(&INIT_VECTOR)
    }

    /// At least one byte of the RUN vector, full or partial.
    pub fn has_run_vector(&self) -> bool {
        self.has_partial_run_vector()
    }

    /// At least one byte of the INIT vector, full or partial.
    pub fn has_init_vector(&self) -> bool {
        self.has_partial_init_vector()
    }

    pub fn has_no_vector(&self) -> bool {
        !self.has_run_vector() && !self.has_init_vector()
    }

    /// True when some loaded address lies outside both vectors. Compressed
    /// segments always count as data.
    pub fn has_non_vector_data(&self) -> bool {
        if self.is_compressed() {
            return true;
        }
        !self.non_vector_portions().is_empty()
    }

    fn vector_word(&self, vector: &Range) -> Option<u16> {
        if !self.covers(vector) {
            return None;
        }
        let offset = usize::from(vector.first() - self.first_address);
        Some(u16::from_le_bytes([self.data[offset], self.data[offset + 1]]))
    }

    /// Program entry point, when both RUN vector bytes are present.
    pub fn run_vector(&self) -> Option<u16> {
        self.vector_word(&RUN_VECTOR)
    }

    /// Initialization routine address, when both INIT vector bytes are present.
    pub fn init_vector(&self) -> Option<u16> {
        self.vector_word(&INIT_VECTOR)
    }

    /// Split the payload around any vector bytes it covers.
    pub fn non_vector_portions(&self) -> Vec<SegmentPortion<'_>> {
        let Some(range) = self.range() else {
            return Vec::new();
        };

        let mut portions = Vec::new();
        let mut start: Option<usize> = None;

        for offset in 0..self.data.len() {
            let addr = range.first() + offset as u16;
            let is_vector = RUN_VECTOR.contains(addr) || INIT_VECTOR.contains(addr);
            match (is_vector, start) {
                (false, None) => start = Some(offset),
                (true, Some(s)) => {
                    portions.push(self.portion(s, offset));
                    start = None;
                }
                _ => {}
            }
        }
        if let Some(s) = start {
            portions.push(self.portion(s, self.data.len()));
        }

        portions
    }

    fn portion(&self, start: usize, end: usize) -> SegmentPortion<'_> {
        SegmentPortion {
            address: self.first_address + start as u16,
            data: &self.data[start..end],
        }
    }

    /// Split into consecutive segments of at most `max_size` bytes.
    /// Compressed segments and a zero `max_size` yield the segment unchanged.
    pub fn split_using_max_size(&self, max_size: usize) -> Vec<Segment> {
        if max_size == 0 || self.is_compressed() || self.data.len() <= max_size {
            return vec![self.clone()];
        }

        let mut parts = Vec::with_capacity(self.data.len().div_ceil(max_size));
        let mut addr = self.first_address;
        for chunk in self.data.chunks(max_size) {
            parts.push(Segment::new(addr, chunk.to_vec()));
            addr = addr.wrapping_add(chunk.len() as u16);
        }
        parts
    }

    /// Size of the on-disk header, without an optional leading $FFFF.
    pub fn header_len(&self) -> usize {
        if self.is_compressed() { 5 } else { 4 }
    }

    /// Header followed by the payload, as the segment is stored on disk.
    pub fn full_data(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.header_len() + self.data.len());
        out.extend_from_slice(&self.first_address.to_le_bytes());
        match self.compression.type_byte() {
            Some(type_byte) => {
                out.extend_from_slice(&[0x00, 0x00, type_byte]);
            }
            None => {
                let last = self
                    .last_address()
                    .unwrap_or(self.first_address.wrapping_sub(1));
                out.extend_from_slice(&last.to_le_bytes());
            }
        }
        out.extend_from_slice(&self.data);
        out
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_compressed() {
            return write!(
                f,
                "{:04X} {} compressed ({})",
                self.first_address,
                self.compression.name(),
                byte_count(self.data.len())
            );
        }
        let Some(range) = self.range() else {
            return write!(f, "{:04X} (empty)", self.first_address);
        };

        write!(
            f,
            "{:04X}-{:04X} ({})",
            range.first(),
            range.last(),
            byte_count(range.length() as usize)
        )?;
        match self.run_vector() {
            Some(run) => write!(f, " RUN {run:04X}")?,
            None if self.has_run_vector() => write!(f, " RUN (partial)")?,
            None => {}
        }
        match self.init_vector() {
            Some(init) => write!(f, " INIT {init:04X}")?,
            None if self.has_init_vector() => write!(f, " INIT (partial)")?,
            None => {}
        }
        Ok(())
    }
}

fn byte_count(len: usize) -> String {
    if len == 1 {
        "1 byte".to_string()
    } else {
        format!("{len} bytes")
    }
}
