use super::ScanError;
use super::bits::BitReader;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Literal,
    CopyFromLast,
    CopyFromNew,
}

/// Offset MSB value that marks the end of a ZX0 stream.
const END_MARKER: u32 = 256;

/// Walk the ZX0 command stream until the end marker.
pub(super) fn scan_zx0(data: &[u8], start: usize) -> Result<usize, ScanError> {
    let mut bits = BitReader::new(data, start);
    let mut state = State::Literal;

    loop {
        state = match state {
            State::Literal => {
                let length = elias_gamma(&mut bits)?;
                bits.skip_bytes(length as usize)?;
                if bits.next_bit()? {
                    State::CopyFromNew
                } else {
                    State::CopyFromLast
                }
            }
            State::CopyFromLast => {
                elias_gamma(&mut bits)?;
                if bits.next_bit()? {
                    State::CopyFromNew
                } else {
                    State::Literal
                }
            }
            State::CopyFromNew => {
                if elias_gamma(&mut bits)? == END_MARKER {
                    break;
                }
                // Offset LSB; its low bit doubles as the first length bit
                bits.next_byte()?;
                bits.backtrack();
                elias_gamma(&mut bits)?;
                if bits.next_bit()? {
                    State::CopyFromNew
                } else {
                    State::Literal
                }
            }
        };
    }

    Ok(bits.position())
}

fn elias_gamma(bits: &mut BitReader<'_>) -> Result<u32, ScanError> {
    let mut value = 1u32;
    while !bits.next_bit()? {
        value = (value << 1) | u32::from(bits.next_bit()?);
    }
    Ok(value)
}
