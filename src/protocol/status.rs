//! Status and device-sync response decoding
//!
//! The cloud endpoints return device blobs as base64-wrapped AES ciphertext;
//! underneath is a JSON object keyed by `"module"`. A sync blob carries the
//! device descriptor (`info`, `name`, `id`, `device` kind code); a status
//! blob carries a `functions` array of numeric values. Slot 0 of `functions`
//! is the 0/1 lamp state; color-capable devices report packed color samples
//! in later slots, decoded through [`crate::color`].
//!
//! Absent keys mean "no data" in this protocol, so a missing shape yields an
//! empty result rather than an error. Decrypt and parse failures stay
//! per-message: one bad blob must not abort a batch poll.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::Deserialize;

use super::Result;
use crate::color::ColorSample;
use crate::crypto::{self, AesKey};

/// Device type codes reported in sync blobs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum DeviceKind {
    /// Plain on/off lamp
    Lamp = 1,
    /// Dimmer module
    Dimmer = 2,
    /// Open/close actuator
    OpenClose = 3,
    /// Dimmable lamp
    DimmableLamp = 24,
}

impl DeviceKind {
    /// Convert from the wire code; unknown codes yield `None` and are
    /// treated as plain devices by callers
    #[must_use]
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            1 => Some(Self::Lamp),
            2 => Some(Self::Dimmer),
            3 => Some(Self::OpenClose),
            24 => Some(Self::DimmableLamp),
            _ => None,
        }
    }

    /// The wire code
    #[must_use]
    pub const fn as_code(self) -> u32 {
        self as u32
    }

    /// Whether the device accepts dim levels
    #[must_use]
    pub const fn is_dimmable(self) -> bool {
        matches!(self, Self::Dimmer | Self::DimmableLamp)
    }
}

/// Device descriptor decoded from a sync blob
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceDescriptor {
    /// Human-readable device name
    pub name: String,
    /// Hub entity identifier
    pub entity_id: u32,
    /// Raw device kind code; may be a code this crate does not know
    pub kind_code: u32,
}

impl DeviceDescriptor {
    /// Typed device kind, when the code is known
    #[must_use]
    pub fn kind(&self) -> Option<DeviceKind> {
        DeviceKind::from_code(self.kind_code)
    }
}

#[derive(Deserialize)]
struct Envelope {
    module: Option<Module>,
}

#[derive(Deserialize)]
struct Module {
    info: Option<serde_json::Value>,
    name: Option<String>,
    id: Option<u32>,
    device: Option<u32>,
    functions: Option<Vec<i64>>,
}

fn decrypt_blob(data: &str, key: &AesKey) -> Result<Envelope> {
    let ciphertext = BASE64.decode(data)?;
    let plaintext = crypto::decrypt(&ciphertext, key)?;
    Ok(serde_json::from_str(&plaintext)?)
}

/// Decode a device-sync blob into a descriptor
///
/// Returns `Ok(None)` when the blob lacks the `module`/`info` shape or any
/// descriptor field; absence is not an error.
pub fn decode_device(data: &str, key: &AesKey) -> Result<Option<DeviceDescriptor>> {
    let Some(module) = decrypt_blob(data, key)?.module else {
        return Ok(None);
    };
    if module.info.is_none() {
        return Ok(None);
    }
    match (module.name, module.id, module.device) {
        (Some(name), Some(entity_id), Some(kind_code)) => Ok(Some(DeviceDescriptor {
            name,
            entity_id,
            kind_code,
        })),
        _ => Ok(None),
    }
}

/// Decode a status blob into its function values
///
/// Returns an empty vector when the `module`/`functions` shape is absent.
pub fn decode_status(data: &str, key: &AesKey) -> Result<Vec<i64>> {
    let envelope = decrypt_blob(data, key)?;
    Ok(envelope
        .module
        .and_then(|module| module.functions)
        .unwrap_or_default())
}

/// Interpret function slot 0 as a lamp on/off state
#[must_use]
pub fn lamp_state(functions: &[i64]) -> Option<bool> {
    functions.first().map(|&value| value == 1)
}

/// Interpret a function slot as a packed color sample
///
/// Returns `None` when the slot is absent or its value does not fit 32 bits.
#[must_use]
pub fn color_sample(functions: &[i64], slot: usize) -> Option<ColorSample> {
    functions
        .get(slot)
        .and_then(|&value| u32::try_from(value).ok())
        .map(ColorSample::new)
}
