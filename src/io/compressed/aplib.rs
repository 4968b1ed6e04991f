use super::ScanError;
use super::bits::BitReader;

/// Walk an aPLib stream until the end-of-stream match.
///
/// Only the decisions that move the read position are kept; match offsets
/// and lengths are decoded but not applied.
pub(super) fn scan_aplib(data: &[u8], start: usize) -> Result<usize, ScanError> {
    let mut bits = BitReader::new(data, start);
    let mut last_was_match = false;

    // First byte is always a literal
    bits.next_byte()?;

    loop {
        if !bits.next_bit()? {
            // 0: literal byte
            bits.next_byte()?;
            last_was_match = false;
            continue;
        }

        if !bits.next_bit()? {
            // 10: match with gamma-coded offset
            let high = gamma2(&mut bits)?;
            if !last_was_match && high == 2 {
                // Repeat the previous offset
                gamma2(&mut bits)?;
            } else {
                bits.next_byte()?;
                gamma2(&mut bits)?;
            }
            last_was_match = true;
            continue;
        }

        if bits.next_bit()? {
            // 111: single byte from a 4-bit offset
            for _ in 0..4 {
                bits.next_bit()?;
            }
            last_was_match = false;
        } else {
            // 110: short match; a zero offset ends the stream
            let offs = bits.next_byte()?;
            if offs >> 1 == 0 {
                break;
            }
            last_was_match = true;
        }
    }

    Ok(bits.position())
}

fn gamma2(bits: &mut BitReader<'_>) -> Result<u32, ScanError> {
    let mut result = 1u32;
    loop {
        result = (result << 1) | u32::from(bits.next_bit()?);
        if !bits.next_bit()? {
            return Ok(result);
        }
    }
}
