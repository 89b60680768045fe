//! Client-side codec for the ICS-2000 smart hub command protocol
//!
//! This library builds the hub's fixed-layout binary command packets,
//! encrypts and decrypts their JSON payloads with the per-account AES key,
//! decodes device-sync and status responses, and converts reported color
//! samples to RGB. Talking to the vendor cloud (login, sync, command
//! submission) is the caller's job; the codec only produces and consumes the
//! bytes those endpoints exchange.
//!
//! # Quick Start
//!
//! ```rust
//! use ics2000_codec::{AesKey, Command};
//!
//! let key = AesKey::from_bytes(*b"0123456789abcdef");
//!
//! // Turn entity 7 on
//! let command = Command::switch("00:11:22:33:44:55", &key, 7, true)?;
//!
//! // Hex form, ready for the cloud command endpoint
//! let wire = command.to_hex();
//! assert!(wire.starts_with("01"));
//! # Ok::<(), ics2000_codec::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod color;
pub mod crypto;
pub mod protocol;

pub use color::{ColorSample, Rgb, Xyz, yxy_to_rgb};
pub use crypto::AesKey;
pub use protocol::{
    Command, CommandHeader, DeviceDescriptor, DeviceKind, Error, FUNCTION_COMMAND_TYPE,
    HEADER_SIZE, HubFunction, MAGIC_NUMBER, MAX_PAYLOAD_SIZE, ModulePayload, Result,
};
