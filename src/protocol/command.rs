//! Hub command packets
//!
//! A command packet is the fixed 43-byte [`CommandHeader`] followed by the
//! AES-encrypted JSON payload. [`Command`] builds one packet: header fields
//! may be set in any order and last write wins; the payload is attached
//! through [`Command::set_payload`], which encrypts and records the
//! ciphertext length in the header in one step, so the length field always
//! reflects the post-encryption size.
//!
//! A protocol-valid packet needs MAC, magic and entity id set before
//! serialization; the builder does not enforce that, the hub simply drops
//! packets missing them.

use bytes::Bytes;
use serde::Serialize;
use serde_json::Value;
use tracing::trace;

use super::{CommandHeader, FUNCTION_COMMAND_TYPE, HEADER_SIZE, Result};
use crate::crypto::{self, AesKey};

/// Builder for one hub command packet
#[derive(Debug, Clone)]
pub struct Command {
    header: CommandHeader,
    payload: Bytes,
}

impl Command {
    /// Create an empty command with frame number 1 and no payload
    #[must_use]
    pub fn new() -> Self {
        let mut header = CommandHeader::new();
        header.set_frame(1);
        Self {
            header,
            payload: Bytes::new(),
        }
    }

    /// Set the frame / sequence number
    pub fn set_frame(&mut self, frame: u8) {
        self.header.set_frame(frame);
    }

    /// Set the protocol opcode
    pub fn set_command_type(&mut self, command_type: u8) {
        self.header.set_command_type(command_type);
    }

    /// Set the hub MAC address from a colon-separated hex string
    pub fn set_mac(&mut self, mac: &str) -> Result<()> {
        self.header.set_mac(mac)
    }

    /// Write the protocol version magic
    pub fn set_magic(&mut self) {
        self.header.set_magic();
    }

    /// Set the target entity identifier
    pub fn set_entity_id(&mut self, entity_id: u32) {
        self.header.set_entity_id(entity_id);
    }

    /// Serialize `payload` to compact JSON, encrypt it under `key`, and store
    /// the ciphertext
    ///
    /// The payload-length header field is written in the same step and there
    /// is no other way to attach payload bytes, so length and ciphertext
    /// cannot drift apart. On error the command is left unchanged.
    pub fn set_payload<T: Serialize>(&mut self, payload: &T, key: &AesKey) -> Result<()> {
        let json = serde_json::to_string(payload)?;
        let ciphertext = crypto::encrypt(&json, key);
        self.header.set_payload_len(ciphertext.len())?;
        self.payload = Bytes::from(ciphertext);
        Ok(())
    }

    /// Concatenate header and payload into wire bytes
    ///
    /// Pure and repeatable; the payload follows the header with no delimiter.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(HEADER_SIZE + self.payload.len());
        bytes.extend_from_slice(self.header.as_bytes());
        bytes.extend_from_slice(&self.payload);
        trace!(len = bytes.len(), "encoded command packet");
        bytes
    }

    /// Lowercase hex form of the full packet, as the cloud command endpoint
    /// consumes it
    #[must_use]
    pub fn to_hex(&self) -> String {
        let mut out = hex::encode(self.header.as_bytes());
        out.push_str(&hex::encode(&self.payload));
        out
    }

    /// The command header
    #[must_use]
    pub const fn header(&self) -> &CommandHeader {
        &self.header
    }

    /// The encrypted payload bytes
    #[must_use]
    pub const fn payload(&self) -> &Bytes {
        &self.payload
    }

    /// Build a complete function-call packet: opcode 128, magic, entity id
    /// and an encrypted [`ModulePayload`]
    pub fn function_call(
        mac: &str,
        key: &AesKey,
        entity_id: u32,
        function: HubFunction,
        value: impl Into<Value>,
    ) -> Result<Self> {
        let mut command = Self::new();
        command.set_mac(mac)?;
        command.set_command_type(FUNCTION_COMMAND_TYPE);
        command.set_magic();
        command.set_entity_id(entity_id);
        command.set_payload(&ModulePayload::new(entity_id, function, value), key)?;
        Ok(command)
    }

    /// On/off command for a plain switch or lamp
    pub fn switch(mac: &str, key: &AesKey, entity_id: u32, on: bool) -> Result<Self> {
        Self::function_call(mac, key, entity_id, HubFunction::OnOff, i32::from(on))
    }

    /// Dim-level command; the hub expects levels 1..=10
    pub fn dim(mac: &str, key: &AesKey, entity_id: u32, level: u8) -> Result<Self> {
        Self::function_call(mac, key, entity_id, HubFunction::Dim, i32::from(level))
    }

    /// Zigbee on/off; the hub expects the value as the string `"0"` or `"1"`
    /// on this function, unlike every numeric function
    pub fn zigbee_switch(mac: &str, key: &AesKey, entity_id: u32, on: bool) -> Result<Self> {
        let value = if on { "1" } else { "0" };
        Self::function_call(mac, key, entity_id, HubFunction::ZigbeeSwitch, value)
    }

    /// Zigbee brightness, clamped to 1..=254
    pub fn zigbee_dim(mac: &str, key: &AesKey, entity_id: u32, level: u8) -> Result<Self> {
        let level = level.clamp(1, 254);
        Self::function_call(mac, key, entity_id, HubFunction::ZigbeeDim, i32::from(level))
    }

    /// Zigbee color temperature, clamped to 0..=600
    pub fn color_temperature(mac: &str, key: &AesKey, entity_id: u32, temperature: u16) -> Result<Self> {
        let temperature = temperature.min(600);
        Self::function_call(
            mac,
            key,
            entity_id,
            HubFunction::ColorTemperature,
            i32::from(temperature),
        )
    }
}

impl Default for Command {
    fn default() -> Self {
        Self::new()
    }
}

/// Function slots addressable through an opcode-128 module command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum HubFunction {
    /// Plain on/off relay (value 0 or 1)
    OnOff = 0,
    /// Legacy dim level (1..=10)
    Dim = 1,
    /// Zigbee on/off (value carried as a string)
    ZigbeeSwitch = 3,
    /// Zigbee brightness (1..=254)
    ZigbeeDim = 4,
    /// Zigbee color temperature (0..=600)
    ColorTemperature = 9,
}

impl HubFunction {
    /// Function slot number on the wire
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

/// JSON body of a module function call:
/// `{"module":{"id":..,"function":..,"value":..}}`
///
/// Serializes compactly with the exact key order the hub expects.
#[derive(Debug, Clone, Serialize)]
pub struct ModulePayload {
    module: ModuleBody,
}

#[derive(Debug, Clone, Serialize)]
struct ModuleBody {
    id: u32,
    function: u8,
    value: Value,
}

impl ModulePayload {
    /// Build a function-call payload
    #[must_use]
    pub fn new(entity_id: u32, function: HubFunction, value: impl Into<Value>) -> Self {
        Self {
            module: ModuleBody {
                id: entity_id,
                function: function.as_u8(),
                value: value.into(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn test_key() -> AesKey {
        AesKey::from_bytes(*b"0123456789abcdef")
    }

    #[test]
    fn test_new_defaults_frame_to_1() {
        let command = Command::new();
        assert_eq!(command.header().frame(), 1);
        assert!(command.payload().is_empty());
        assert_eq!(command.encode().len(), HEADER_SIZE);
    }

    #[test]
    fn test_module_payload_wire_json() {
        let payload = ModulePayload::new(7, HubFunction::OnOff, 1);
        assert_eq!(
            serde_json::to_string(&payload).unwrap(),
            r#"{"module":{"id":7,"function":0,"value":1}}"#
        );
    }

    #[test]
    fn test_zigbee_switch_value_is_string() {
        let payload = ModulePayload::new(3, HubFunction::ZigbeeSwitch, "1");
        assert_eq!(
            serde_json::to_string(&payload).unwrap(),
            r#"{"module":{"id":3,"function":3,"value":"1"}}"#
        );
    }

    #[test]
    fn test_payload_length_matches_ciphertext() {
        let mut command = Command::new();
        command
            .set_payload(&ModulePayload::new(7, HubFunction::OnOff, 1), &test_key())
            .unwrap();
        assert_eq!(
            usize::from(command.header().payload_len()),
            command.payload().len()
        );
    }

    #[test]
    fn test_set_payload_overwrites_previous() {
        let mut command = Command::new();
        command
            .set_payload(&ModulePayload::new(1, HubFunction::Dim, 4), &test_key())
            .unwrap();
        command
            .set_payload(&serde_json::json!({"module": {"id": 1}}), &test_key())
            .unwrap();
        assert_eq!(
            usize::from(command.header().payload_len()),
            command.payload().len()
        );
    }

    #[test]
    fn test_oversized_payload_rejected() {
        let mut command = Command::new();
        let filler = "x".repeat(70_000);
        let err = command
            .set_payload(&serde_json::json!({ "module": { "value": filler } }), &test_key())
            .unwrap_err();
        assert!(matches!(err, crate::protocol::Error::ValueOutOfRange { .. }));
        // Failed attach leaves the command unchanged
        assert!(command.payload().is_empty());
        assert_eq!(command.header().payload_len(), 0);
    }

    #[test]
    fn test_encode_is_header_then_payload() {
        let mut command = Command::new();
        command.set_entity_id(9);
        command
            .set_payload(&ModulePayload::new(9, HubFunction::OnOff, 0), &test_key())
            .unwrap();

        let bytes = command.encode();
        assert_eq!(&bytes[..HEADER_SIZE], command.header().as_bytes());
        assert_eq!(&bytes[HEADER_SIZE..], command.payload().as_ref());
        // Repeatable
        assert_eq!(command.encode(), bytes);
    }

    #[test]
    fn test_to_hex_is_lowercase_encode() {
        let mut command = Command::new();
        command.set_mac("AA:BB:CC:DD:EE:FF").unwrap();
        command
            .set_payload(&ModulePayload::new(2, HubFunction::OnOff, 1), &test_key())
            .unwrap();

        let hex_form = command.to_hex();
        assert_eq!(hex_form, hex::encode(command.encode()));
        assert_eq!(hex_form.len(), command.encode().len() * 2);
        assert!(!hex_form.contains(|c: char| c.is_ascii_uppercase()));
    }

    #[test]
    fn test_bad_mac_propagates() {
        let result = Command::switch("not-a-mac", &test_key(), 7, true);
        assert!(matches!(result, Err(crate::protocol::Error::MacFormat { .. })));
    }

    #[test]
    fn test_function_call_header_fields() {
        let command = Command::switch("00:11:22:33:44:55", &test_key(), 7, true).unwrap();
        let header = command.header();
        assert_eq!(header.frame(), 1);
        assert_eq!(header.command_type(), FUNCTION_COMMAND_TYPE);
        assert_eq!(header.mac(), [0x00, 0x11, 0x22, 0x33, 0x44, 0x55]);
        assert_eq!(header.magic(), super::super::MAGIC_NUMBER);
        assert_eq!(header.entity_id(), 7);
    }

    #[test]
    fn test_zigbee_dim_clamps() {
        let low = Command::zigbee_dim("00:11:22:33:44:55", &test_key(), 7, 0).unwrap();
        let clamped = Command::zigbee_dim("00:11:22:33:44:55", &test_key(), 7, 1).unwrap();
        assert_eq!(low.payload(), clamped.payload());

        let high = Command::color_temperature("00:11:22:33:44:55", &test_key(), 7, 9999).unwrap();
        let max = Command::color_temperature("00:11:22:33:44:55", &test_key(), 7, 600).unwrap();
        assert_eq!(high.payload(), max.payload());
    }

    proptest! {
        /// The recorded length always equals the stored ciphertext length,
        /// across payload sizes
        #[test]
        fn prop_payload_length_invariant(filler in ".{0,2048}") {
            let mut command = Command::new();
            command
                .set_payload(&serde_json::json!({ "module": { "value": filler } }), &test_key())
                .unwrap();
            prop_assert_eq!(
                usize::from(command.header().payload_len()),
                command.payload().len()
            );
        }

        /// Header setters never perturb each other's bytes
        #[test]
        fn prop_field_isolation(frame in any::<u8>(), ty in any::<u8>(), entity in any::<u32>()) {
            let mut command = Command::new();
            command.set_mac("01:02:03:04:05:06").unwrap();
            command.set_magic();
            command.set_frame(frame);
            command.set_command_type(ty);
            command.set_entity_id(entity);

            let header = command.header();
            prop_assert_eq!(header.frame(), frame);
            prop_assert_eq!(header.command_type(), ty);
            prop_assert_eq!(header.mac(), [1, 2, 3, 4, 5, 6]);
            prop_assert_eq!(header.magic(), super::super::MAGIC_NUMBER);
            prop_assert_eq!(header.entity_id(), entity);
            prop_assert_eq!(header.payload_len(), 0);
        }
    }
}
