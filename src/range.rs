use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RangeError {
    #[error("invalid range format: {0}")]
    InvalidFormat(String),

    #[error("invalid number: {0}")]
    InvalidNumber(String),

    #[error("range first address ({first:04X}) exceeds last address ({last:04X})")]
    FirstExceedsLast { first: u16, last: u16 },

    #[error("zero length range at {first:04X}")]
    ZeroLength { first: u16 },
}

/// Addresses 736-737, pointer to the program entry point.
pub const RUN_VECTOR: Range = Range {
    first: 0x02E0,
    last: 0x02E1,
};

/// Addresses 738-739, pointer to a routine called as soon as it is loaded.
pub const INIT_VECTOR: Range = Range {
    first: 0x02E2,
    last: 0x02E3,
};

/// An inclusive range of the 64 KiB address space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Range {
    first: u16,
    last: u16,
}

impl Range {
    /// Create range from first address and length. Errors when the range
    /// would leave the 16-bit address space.
    pub fn from_start_length(first: u16, length: u32) -> Result<Self, RangeError> {
        if length == 0 {
            return Err(RangeError::ZeroLength { first });
        }
        let last = u32::from(first) + (length - 1);
        let last = u16::try_from(last)
            .map_err(|_| RangeError::InvalidFormat("address overflow".to_string()))?;
        Ok(Self { first, last })
    }

    /// Create range from first and last addresses (inclusive).
    pub fn from_start_end(first: u16, last: u16) -> Result<Self, RangeError> {
        if first > last {
            return Err(RangeError::FirstExceedsLast { first, last });
        }
        Ok(Self { first, last })
    }

    pub fn first(&self) -> u16 {
        self.first
    }

    pub fn last(&self) -> u16 {
        self.last
    }

    pub fn length(&self) -> u32 {
        u32::from(self.last) - u32::from(self.first) + 1
    }

    pub fn contains(&self, addr: u16) -> bool {
        addr >= self.first && addr <= self.last
    }

    /// True when every address of `other` lies inside `self`.
    pub fn covers(&self, other: &Range) -> bool {
        self.first <= other.first && other.last <= self.last
    }

    pub fn overlaps(&self, other: &Range) -> bool {
        self.first <= other.last && other.first <= self.last
    }
}

/// Parse a number from decimal, hex (0x or $), or binary (0b).
fn parse_number(s: &str) -> Result<u16, RangeError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(RangeError::InvalidNumber("empty string".to_string()));
    }

    let (radix, digits) = if let Some(hex) = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .or_else(|| s.strip_prefix('$'))
    {
        (16, hex)
    } else if let Some(bin) = s.strip_prefix("0b").or_else(|| s.strip_prefix("0B")) {
        (2, bin)
    } else {
        (10, s)
    };

    u16::from_str_radix(digits, radix).map_err(|e| RangeError::InvalidNumber(e.to_string()))
}

impl FromStr for Range {
    type Err = RangeError;

    /// Parse range from string.
    /// Formats:
    /// - "first,length" (e.g., "0x2000,0x100")
    /// - "first-last" (e.g., "$2000-$20FF")
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some((first_str, len_str)) = s.split_once(',') {
            let first = parse_number(first_str)?;
            let length = parse_number(len_str)?;
            Range::from_start_length(first, u32::from(length))
        } else if let Some((first_str, last_str)) = s.split_once('-') {
            let first = parse_number(first_str)?;
            let last = parse_number(last_str)?;
            Range::from_start_end(first, last)
        } else {
            Err(RangeError::InvalidFormat(format!(
                "expected 'first,length' or 'first-last', got '{s}'"
            )))
        }
    }
}
