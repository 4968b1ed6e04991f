use super::ScanError;

/// Forward-only reader over the input bytes.
#[derive(Debug)]
pub(super) struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    pub(super) fn new(data: &'a [u8], pos: usize) -> Self {
        Self { data, pos }
    }

    pub(super) fn position(&self) -> usize {
        self.pos
    }

    pub(super) fn next_byte(&mut self) -> Result<u8, ScanError> {
        let byte = *self
            .data
            .get(self.pos)
            .ok_or(ScanError { position: self.pos })?;
        self.pos += 1;
        Ok(byte)
    }

    /// Skip `count` bytes. All of them must exist.
    pub(super) fn skip(&mut self, count: usize) -> Result<(), ScanError> {
        let end = self
            .pos
            .checked_add(count)
            .filter(|&end| end <= self.data.len())
            .ok_or(ScanError {
                position: self.data.len(),
            })?;
        self.pos = end;
        Ok(())
    }
}

/// MSB-first bit reader sharing its position with interleaved whole bytes.
///
/// A tag byte is latched when the previous one is exhausted; bytes read with
/// [`BitReader::next_byte`] come from the same stream between latches.
#[derive(Debug)]
pub(super) struct BitReader<'a> {
    cursor: ByteCursor<'a>,
    latch: u8,
    bits_left: u8,
    last_byte: u8,
    backtracked: bool,
}

impl<'a> BitReader<'a> {
    pub(super) fn new(data: &'a [u8], pos: usize) -> Self {
        Self {
            cursor: ByteCursor::new(data, pos),
            latch: 0,
            bits_left: 0,
            last_byte: 0,
            backtracked: false,
        }
    }

    pub(super) fn position(&self) -> usize {
        self.cursor.position()
    }

    pub(super) fn next_byte(&mut self) -> Result<u8, ScanError> {
        let byte = self.cursor.next_byte()?;
        self.last_byte = byte;
        Ok(byte)
    }

    pub(super) fn skip_bytes(&mut self, count: usize) -> Result<(), ScanError> {
        self.cursor.skip(count)
    }

    pub(super) fn next_bit(&mut self) -> Result<bool, ScanError> {
        if self.backtracked {
            self.backtracked = false;
            return Ok(self.last_byte & 1 == 1);
        }
        if self.bits_left == 0 {
            self.latch = self.next_byte()?;
            self.bits_left = 8;
        }
        let bit = self.latch & 0x80 != 0;
        self.latch <<= 1;
        self.bits_left -= 1;
        Ok(bit)
    }

    /// Make the next bit read return bit 0 of the last byte read.
    pub(super) fn backtrack(&mut self) {
        self.backtracked = true;
    }
}
