//! Fixed-offset buffer primitives and the header field table
//!
//! Every header field is described once, as a (offset, width) entry below, and
//! both the write path ([`CommandHeader`](super::CommandHeader) setters) and
//! the read-back accessors consult the same table, so the layout cannot drift
//! between the two.
//!
//! All multi-byte integers on the wire are big-endian.

use super::{Error, Result};

/// A fixed header field: byte offset and width within the 43-byte header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    /// Byte offset from the start of the header
    pub offset: usize,
    /// Field width in bytes
    pub width: usize,
    /// Field name, used in error reports
    pub name: &'static str,
}

/// Frame / sequence number (1 byte)
pub const FRAME: Field = Field { offset: 0, width: 1, name: "frame" };
/// Protocol opcode (1 byte)
pub const COMMAND_TYPE: Field = Field { offset: 2, width: 1, name: "command type" };
/// Hub MAC address, raw bytes (6 bytes)
pub const MAC: Field = Field { offset: 3, width: 6, name: "mac" };
/// Protocol version magic (4 bytes)
pub const MAGIC: Field = Field { offset: 9, width: 4, name: "magic" };
/// Target device / entity identifier (4 bytes)
pub const ENTITY_ID: Field = Field { offset: 29, width: 4, name: "entity id" };
/// Encrypted payload byte length (2 bytes)
pub const PAYLOAD_LEN: Field = Field { offset: 41, width: 2, name: "payload length" };

fn check_bounds(len: usize, offset: usize, width: usize) -> Result<()> {
    match offset.checked_add(width) {
        Some(end) if end <= len => Ok(()),
        _ => Err(Error::OutOfBounds { offset, width, len }),
    }
}

/// Write a `u8` at `offset`
pub fn insert_u8(buf: &mut [u8], value: u8, offset: usize) -> Result<()> {
    check_bounds(buf.len(), offset, 1)?;
    buf[offset] = value;
    Ok(())
}

/// Write a big-endian `u16` starting at `offset`
pub fn insert_u16(buf: &mut [u8], value: u16, offset: usize) -> Result<()> {
    check_bounds(buf.len(), offset, 2)?;
    buf[offset..offset + 2].copy_from_slice(&value.to_be_bytes());
    Ok(())
}

/// Write a big-endian `u32` starting at `offset`
pub fn insert_u32(buf: &mut [u8], value: u32, offset: usize) -> Result<()> {
    check_bounds(buf.len(), offset, 4)?;
    buf[offset..offset + 4].copy_from_slice(&value.to_be_bytes());
    Ok(())
}

/// Copy `data` verbatim starting at `offset`
pub fn insert_bytes(buf: &mut [u8], data: &[u8], offset: usize) -> Result<()> {
    check_bounds(buf.len(), offset, data.len())?;
    buf[offset..offset + data.len()].copy_from_slice(data);
    Ok(())
}

/// Write a big-endian unsigned integer into `field`
///
/// The caller guarantees the field lies inside `buf` and `value` fits the
/// field width; both hold for every entry in the table above against a
/// header-sized buffer.
pub(crate) fn put_uint(buf: &mut [u8], field: Field, value: u64) {
    debug_assert!(field.width <= 8 && field.offset + field.width <= buf.len());
    debug_assert!(field.width == 8 || value < 1 << (field.width * 8));
    let be = value.to_be_bytes();
    buf[field.offset..field.offset + field.width].copy_from_slice(&be[8 - field.width..]);
}

/// Read a big-endian unsigned integer from `field`
///
/// # Panics
///
/// Panics when the field lies outside `buf`; field table entries against a
/// header-sized buffer never do.
#[must_use]
pub fn read_uint(buf: &[u8], field: Field) -> u64 {
    buf[field.offset..field.offset + field.width]
        .iter()
        .fold(0u64, |acc, &b| (acc << 8) | u64::from(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_big_endian_order() {
        let mut buf = [0u8; 8];
        insert_u16(&mut buf, 0x0102, 1).unwrap();
        assert_eq!(buf, [0, 1, 2, 0, 0, 0, 0, 0]);

        let mut buf = [0u8; 8];
        insert_u32(&mut buf, 0x0A0B_0C0D, 2).unwrap();
        assert_eq!(buf, [0, 0, 0x0A, 0x0B, 0x0C, 0x0D, 0, 0]);
    }

    #[test]
    fn test_out_of_bounds_rejected() {
        let mut buf = [0u8; 4];
        assert!(matches!(
            insert_u32(&mut buf, 1, 1),
            Err(Error::OutOfBounds { offset: 1, width: 4, len: 4 })
        ));
        assert!(matches!(
            insert_u8(&mut buf, 1, 4),
            Err(Error::OutOfBounds { .. })
        ));
        assert!(matches!(
            insert_bytes(&mut buf, &[1, 2, 3], 2),
            Err(Error::OutOfBounds { .. })
        ));
        // Failed writes leave the buffer untouched
        assert_eq!(buf, [0u8; 4]);
    }

    #[test]
    fn test_bounds_overflow_does_not_wrap() {
        let mut buf = [0u8; 4];
        assert!(insert_u16(&mut buf, 1, usize::MAX).is_err());
    }

    #[test]
    fn test_insert_bytes_exact_span() {
        let mut buf = [0xFFu8; 6];
        insert_bytes(&mut buf, &[1, 2, 3], 2).unwrap();
        assert_eq!(buf, [0xFF, 0xFF, 1, 2, 3, 0xFF]);
    }

    #[test]
    fn test_put_read_uint_roundtrip() {
        let mut buf = [0u8; 43];
        put_uint(&mut buf, MAGIC, 653_213);
        assert_eq!(read_uint(&buf, MAGIC), 653_213);
        // Neighbouring bytes stay zero
        assert_eq!(buf[MAGIC.offset - 1], 0);
        assert_eq!(buf[MAGIC.offset + MAGIC.width], 0);
    }
}
