//! ICS-2000 command header
//!
//! The header is a fixed 43-byte prefix; the encrypted payload follows it
//! immediately, with no delimiter.
//!
//! # Wire Format
//!
//! ```text
//! offset  0       1      2      3..=8   9..=12  13..=28  29..=32    33..=40  41..=42
//!        +-------+------+------+-------+-------+--------+----------+--------+-------------+
//!        | frame | rsvd | type |  MAC  | magic |  rsvd  | entity id|  rsvd  | payload len |
//!        +-------+------+------+-------+-------+--------+----------+--------+-------------+
//! ```
//!
//! Multi-byte fields are big-endian. Reserved bytes are never written and
//! stay zero.

use super::layout;
use super::{Error, HEADER_SIZE, MAGIC_NUMBER, Result};

/// Fixed 43-byte command header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandHeader {
    bytes: [u8; HEADER_SIZE],
}

impl CommandHeader {
    /// Create an all-zero header
    #[must_use]
    pub const fn new() -> Self {
        Self {
            bytes: [0u8; HEADER_SIZE],
        }
    }

    /// Set the frame / sequence number (byte 0)
    pub fn set_frame(&mut self, frame: u8) {
        layout::put_uint(&mut self.bytes, layout::FRAME, u64::from(frame));
    }

    /// Set the protocol opcode (byte 2)
    pub fn set_command_type(&mut self, command_type: u8) {
        layout::put_uint(&mut self.bytes, layout::COMMAND_TYPE, u64::from(command_type));
    }

    /// Set the hub MAC address (bytes 3..=8) from a colon-separated hex string
    ///
    /// Fails with [`Error::MacFormat`] and leaves the header untouched when
    /// the input does not decode to exactly 6 bytes.
    pub fn set_mac(&mut self, mac: &str) -> Result<()> {
        let raw = parse_mac(mac)?;
        layout::insert_bytes(&mut self.bytes, &raw, layout::MAC.offset)
    }

    /// Write the protocol version magic (bytes 9..=12)
    ///
    /// The value is the fixed literal [`MAGIC_NUMBER`]; no caller input
    /// varies this field.
    pub fn set_magic(&mut self) {
        layout::put_uint(&mut self.bytes, layout::MAGIC, u64::from(MAGIC_NUMBER));
    }

    /// Set the target entity identifier (bytes 29..=32)
    pub fn set_entity_id(&mut self, entity_id: u32) {
        layout::put_uint(&mut self.bytes, layout::ENTITY_ID, u64::from(entity_id));
    }

    /// Record the encrypted payload byte length (bytes 41..=42)
    ///
    /// Fails with [`Error::ValueOutOfRange`] when `len` does not fit the
    /// two-byte field, leaving the header untouched.
    pub(crate) fn set_payload_len(&mut self, len: usize) -> Result<()> {
        let len = u16::try_from(len).map_err(|_| Error::ValueOutOfRange {
            field: layout::PAYLOAD_LEN.name,
            value: len as u64,
            max: u64::from(u16::MAX),
        })?;
        layout::insert_u16(&mut self.bytes, len, layout::PAYLOAD_LEN.offset)
    }

    /// Get the frame number
    #[must_use]
    pub fn frame(&self) -> u8 {
        layout::read_uint(&self.bytes, layout::FRAME) as u8
    }

    /// Get the protocol opcode
    #[must_use]
    pub fn command_type(&self) -> u8 {
        layout::read_uint(&self.bytes, layout::COMMAND_TYPE) as u8
    }

    /// Get the raw MAC field bytes
    #[must_use]
    pub fn mac(&self) -> [u8; 6] {
        let mut out = [0u8; 6];
        out.copy_from_slice(&self.bytes[layout::MAC.offset..layout::MAC.offset + layout::MAC.width]);
        out
    }

    /// Get the magic field value
    #[must_use]
    pub fn magic(&self) -> u32 {
        layout::read_uint(&self.bytes, layout::MAGIC) as u32
    }

    /// Get the entity identifier
    #[must_use]
    pub fn entity_id(&self) -> u32 {
        layout::read_uint(&self.bytes, layout::ENTITY_ID) as u32
    }

    /// Get the recorded payload length
    #[must_use]
    pub fn payload_len(&self) -> u16 {
        layout::read_uint(&self.bytes, layout::PAYLOAD_LEN) as u16
    }

    /// Borrow the raw header bytes
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; HEADER_SIZE] {
        &self.bytes
    }
}

impl Default for CommandHeader {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a colon-separated MAC string into its 6 raw bytes
///
/// Colons are optional; `"001122334455"` and `"00:11:22:33:44:55"` decode the
/// same. Anything that is not exactly 6 bytes of hex fails with
/// [`Error::MacFormat`].
pub fn parse_mac(mac: &str) -> Result<[u8; 6]> {
    let raw = hex::decode(mac.replace(':', "")).map_err(|_| Error::MacFormat {
        input: mac.to_owned(),
    })?;
    if raw.len() != layout::MAC.width {
        return Err(Error::MacFormat {
            input: mac.to_owned(),
        });
    }
    let mut out = [0u8; 6];
    out.copy_from_slice(&raw);
    Ok(out)
}
