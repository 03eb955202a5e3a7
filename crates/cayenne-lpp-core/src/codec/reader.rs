use super::error::LppError;
use super::layout;

/// Channel/type pair that opens every entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryHeader {
    pub channel: u8,
    pub tag: u8,
}

/// Forward-only cursor over an LPP payload.
///
/// Generic over the unit type so callers holding wider integers (for
/// example a JSON array of numbers) go through the same bounds and octet
/// checks as a plain `&[u8]`.
pub struct LppReader<'a, T> {
    payload: &'a [T],
    cursor: usize,
    base: usize,
}

impl<'a, T: Copy + Into<u32>> LppReader<'a, T> {
    pub fn new(payload: &'a [T]) -> Self {
        Self::with_base(payload, 0)
    }

    /// Reader over a sub-slice whose first unit sits at `base` in the payload.
    pub fn with_base(payload: &'a [T], base: usize) -> Self {
        Self {
            payload,
            cursor: 0,
            base,
        }
    }

    /// Absolute position of the cursor.
    pub fn position(&self) -> usize {
        self.base + self.cursor
    }

    pub fn remaining(&self) -> usize {
        self.payload.len() - self.cursor
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.payload.len()
    }

    pub fn read_header(&mut self) -> Result<EntryHeader, LppError> {
        let offset = self.position();
        let raw = self
            .read_slice(layout::HEADER_LEN)
            .ok_or(LppError::TruncatedHeader {
                offset,
                remaining: self.remaining(),
            })?;
        Ok(EntryHeader {
            channel: octet(raw[layout::CHANNEL_OFFSET], offset + layout::CHANNEL_OFFSET)?,
            tag: octet(raw[layout::TYPE_OFFSET], offset + layout::TYPE_OFFSET)?,
        })
    }

    /// Consume `needed` units of entry body for `tag`.
    ///
    /// `entry_offset` is where the entry's header started and is what the
    /// error reports.
    pub fn read_body(
        &mut self,
        tag: u8,
        needed: usize,
        entry_offset: usize,
    ) -> Result<&'a [T], LppError> {
        let actual = self.remaining();
        self.read_slice(needed).ok_or(LppError::TruncatedBody {
            tag,
            offset: entry_offset,
            needed,
            actual,
        })
    }

    /// Read a big-endian integer of `width` units belonging to a `tag` entry.
    pub fn read_int(&mut self, tag: u8, width: usize, signed: bool) -> Result<i128, LppError> {
        let offset = self.position();
        let raw = self.read_slice(width).ok_or(LppError::TruncatedBody {
            tag,
            offset,
            needed: width,
            actual: self.remaining(),
        })?;
        decode_int(raw, signed).map_err(|err| err.shifted(offset))
    }

    fn read_slice(&mut self, len: usize) -> Option<&'a [T]> {
        let end = self.cursor.checked_add(len)?;
        let slice = self.payload.get(self.cursor..end)?;
        self.cursor = end;
        Some(slice)
    }
}

fn octet<T: Into<u32>>(unit: T, offset: usize) -> Result<u8, LppError> {
    let value = unit.into();
    if value > layout::OCTET_MAX {
        return Err(LppError::ByteOverflow { offset, value });
    }
    Ok(value as u8)
}

/// Decode a big-endian fixed-width integer.
///
/// Signed values are two's complement over exactly `8 * raw.len()` bits, so
/// 1, 2 and 3 byte fields all sign-extend correctly. Fields wider than
/// `MAX_INT_WIDTH` bytes are rejected. Offsets in the returned error are
/// relative to `raw`.
///
/// # Examples
/// ```
/// use cayenne_lpp_core::codec::reader::decode_int;
///
/// assert_eq!(decode_int(&[0xFFu8, 0x9C], true).unwrap(), -100);
/// assert_eq!(decode_int(&[0xFFu8, 0x9C], false).unwrap(), 65436);
/// ```
pub fn decode_int<T: Copy + Into<u32>>(raw: &[T], signed: bool) -> Result<i128, LppError> {
    if raw.len() > layout::MAX_INT_WIDTH {
        return Err(LppError::IntegerTooWide {
            offset: 0,
            width: raw.len(),
            max: layout::MAX_INT_WIDTH,
        });
    }
    let mut value: i128 = 0;
    for (index, unit) in raw.iter().enumerate() {
        let byte = octet(*unit, index)?;
        value = value * 256 + i128::from(byte);
    }

    if signed && !raw.is_empty() {
        let width_bits = 8 * raw.len() as u32;
        let half = 1i128 << (width_bits - 1);
        if value >= half {
            value -= 1i128 << width_bits;
        }
    }
    Ok(value)
}

/// Divide `value` by `10^exponent`; exponent zero leaves it untouched.
pub fn scaled(value: i128, exponent: u32) -> f64 {
    if exponent == 0 {
        return value as f64;
    }
    value as f64 / 10f64.powi(exponent as i32)
}
