use super::ScanError;
use super::bits::ByteCursor;

/// Walk LZ4 block sequences until the zero match offset that ends the stream.
pub(super) fn scan_lz4(data: &[u8], start: usize) -> Result<usize, ScanError> {
    let mut cursor = ByteCursor::new(data, start);

    loop {
        let token = cursor.next_byte()?;

        let mut literal_len = usize::from(token >> 4);
        if literal_len == 0x0F {
            literal_len += extended_length(&mut cursor)?;
        }
        cursor.skip(literal_len)?;

        let offset_low = cursor.next_byte()?;
        let offset_high = cursor.next_byte()?;
        if offset_low == 0 && offset_high == 0 {
            break;
        }

        let match_len = 4 + usize::from(token & 0x0F);
        if match_len == 19 {
            extended_length(&mut cursor)?;
        }
    }

    Ok(cursor.position())
}

/// Sum of length bytes; a byte below $FF ends the run.
fn extended_length(cursor: &mut ByteCursor<'_>) -> Result<usize, ScanError> {
    let mut total = 0usize;
    loop {
        let byte = cursor.next_byte()?;
        total += usize::from(byte);
        if byte != 0xFF {
            return Ok(total);
        }
    }
}
