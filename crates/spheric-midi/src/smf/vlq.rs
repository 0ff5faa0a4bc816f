//! Variable-length quantities, the SMF encoding for delta-times and meta lengths.

use std::io::{self, Write};

/// Largest value a four-byte variable-length quantity can hold.
pub const VLQ_MAX: u32 = 0x0FFF_FFFF;

/// Maximum encoded length of a variable-length quantity.
pub const VLQ_MAX_BYTES: usize = 4;

/// Encode `value` as a variable-length quantity (most significant group first).
///
/// Values above [`VLQ_MAX`] are truncated to 28 bits; callers validate first.
pub fn encode_vlq(value: u32) -> Vec<u8> {
    let mut value = value & VLQ_MAX;
    let mut groups = [0u8; VLQ_MAX_BYTES];
    let mut start = VLQ_MAX_BYTES - 1;
    groups[start] = (value & 0x7F) as u8;
    value >>= 7;
    while value > 0 {
        start -= 1;
        groups[start] = ((value & 0x7F) as u8) | 0x80;
        value >>= 7;
    }
    groups[start..].to_vec()
}

/// Write `value` as a variable-length quantity.
pub fn write_vlq<W: Write>(writer: &mut W, value: u32) -> io::Result<()> {
    writer.write_all(&encode_vlq(value))
}

/// Decode a variable-length quantity starting at `offset`.
///
/// Returns the value and the number of bytes consumed, or `None` if the data
/// ends mid-quantity or the quantity runs longer than four bytes.
pub fn read_vlq(data: &[u8], offset: usize) -> Option<(u32, usize)> {
    let mut value: u32 = 0;
    for i in 0..VLQ_MAX_BYTES {
        let byte = *data.get(offset + i)?;
        value = (value << 7) | u32::from(byte & 0x7F);
        if byte & 0x80 == 0 {
            return Some((value, i + 1));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_encodings() {
        assert_eq!(encode_vlq(0), [0x00]);
        assert_eq!(encode_vlq(0x40), [0x40]);
        assert_eq!(encode_vlq(0x7F), [0x7F]);
        assert_eq!(encode_vlq(0x80), [0x81, 0x00]);
        assert_eq!(encode_vlq(240), [0x81, 0x70]);
        assert_eq!(encode_vlq(960), [0x87, 0x40]);
        assert_eq!(encode_vlq(0x3FFF), [0xFF, 0x7F]);
        assert_eq!(encode_vlq(0x4000), [0x81, 0x80, 0x00]);
        assert_eq!(encode_vlq(VLQ_MAX), [0xFF, 0xFF, 0xFF, 0x7F]);
    }

    #[test]
    fn test_read_reports_consumed_bytes() {
        let data = [0x90, 0x87, 0x40, 0x3C];
        assert_eq!(read_vlq(&data, 1), Some((960, 2)));
        assert_eq!(read_vlq(&data, 3), Some((0x3C, 1)));
    }

    #[test]
    fn test_read_rejects_truncated_and_overlong() {
        assert_eq!(read_vlq(&[0x81], 0), None);
        assert_eq!(read_vlq(&[0x81, 0x80, 0x80, 0x80, 0x00], 0), None);
        assert_eq!(read_vlq(&[], 0), None);
    }
}
