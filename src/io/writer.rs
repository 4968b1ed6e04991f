use crate::Segment;

/// Growable byte buffer for building binary load files.
#[derive(Debug, Clone, Default)]
pub struct LoadStream {
    bytes: Vec<u8>,
}

impl LoadStream {
    pub fn new() -> Self {
        Self::with_capacity(1024)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(capacity),
        }
    }

    /// Append a 16-bit word, low byte first.
    pub fn push_word(&mut self, word: u16) {
        self.bytes.extend_from_slice(&word.to_le_bytes());
    }

    pub fn push_bytes(&mut self, bytes: &[u8]) {
        self.bytes.extend_from_slice(bytes);
    }

    /// Append the $FFFF binary file header.
    pub fn push_header(&mut self) {
        self.push_word(0xFFFF);
    }

    /// Append a segment header and body.
    pub fn push_segment(&mut self, segment: &Segment) {
        self.bytes.extend(segment.full_data());
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}
