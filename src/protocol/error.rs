//! ICS-2000 codec error types

use thiserror::Error;

/// ICS-2000 codec errors
#[derive(Error, Debug)]
pub enum Error {
    /// MAC address string does not decode to exactly 6 bytes
    #[error("malformed MAC address {input:?}: expected 6 colon-separated hex octets")]
    MacFormat {
        /// Offending input string
        input: String,
    },

    /// AES key string is not the hex form of 16 raw bytes
    #[error("malformed AES key: expected 32 hex characters")]
    KeyFormat,

    /// Header field value outside its representable width
    #[error("{field} value {value} out of range (max {max})")]
    ValueOutOfRange {
        /// Field name
        field: &'static str,
        /// Rejected value
        value: u64,
        /// Largest representable value
        max: u64,
    },

    /// Write past the end of the destination buffer
    #[error("write out of bounds: offset {offset} + width {width} exceeds buffer of {len}")]
    OutOfBounds {
        /// Requested start offset
        offset: usize,
        /// Requested write width
        width: usize,
        /// Destination buffer length
        len: usize,
    },

    /// Ciphertext did not decrypt cleanly under the given key
    #[error("decryption failed: {reason}")]
    Decryption {
        /// Failure detail
        reason: &'static str,
    },

    /// Decrypted payload is not valid UTF-8
    #[error("invalid UTF-8 in decrypted payload: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// Response blob is not valid base64
    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Payload is not the JSON shape the hub speaks
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Color sample with zero y chroma has no XYZ representation
    #[error("degenerate color sample: y chroma is zero")]
    DegenerateChromaticity,
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
