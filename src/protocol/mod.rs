//! ICS-2000 protocol core
//!
//! Wire layout, the fixed command header, the command builder and the
//! response decoders.

mod command;
mod error;
mod header;
pub mod layout;
mod status;

pub use command::{Command, HubFunction, ModulePayload};
pub use error::{Error, Result};
pub use header::{CommandHeader, parse_mac};
pub use status::{
    DeviceDescriptor, DeviceKind, color_sample, decode_device, decode_status, lamp_state,
};

/// Protocol version magic, written at header offset 9 of every packet
pub const MAGIC_NUMBER: u32 = 653_213;

/// Header size in bytes
pub const HEADER_SIZE: usize = 43;

/// Opcode for module function-call commands
pub const FUNCTION_COMMAND_TYPE: u8 = 128;

/// Largest payload the two-byte length field can record
pub const MAX_PAYLOAD_SIZE: usize = u16::MAX as usize;
