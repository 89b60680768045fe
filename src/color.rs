//! Color sample conversion
//!
//! Color-capable devices report their current color as one packed 32-bit xyY
//! sample inside the status `functions` array. The high 16 bits (big-endian)
//! carry the y chromaticity and the low 16 bits the x chromaticity, each as a
//! fraction of 65535. Conversion goes through CIE XYZ at full luminance and
//! lands in 8-bit sRGB.
//!
//! The x/y field order is fixed by the wire format; transposing it still
//! produces plausible colors, just the wrong ones, so the split is covered by
//! explicit tests.

use tracing::debug;

use crate::protocol::{Error, Result};

/// Largest raw chroma value; both sample halves normalize against it
pub const MAX_CHROMA: u16 = u16::MAX;

/// A packed 32-bit xyY color sample as reported by the hub
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorSample(u32);

impl ColorSample {
    /// Wrap a raw packed sample
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// The raw packed value
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Split into `(x, y)` chromaticity coordinates in `[0, 1]`
    ///
    /// The low half encodes x, the high half encodes y.
    #[must_use]
    pub fn chromaticity(self) -> (f64, f64) {
        let bytes = self.0.to_be_bytes();
        let x = u16::from_be_bytes([bytes[2], bytes[3]]);
        let y = u16::from_be_bytes([bytes[0], bytes[1]]);
        debug!(x, y, "raw chroma halves");
        (
            f64::from(x) / f64::from(MAX_CHROMA),
            f64::from(y) / f64::from(MAX_CHROMA),
        )
    }

    /// Convert to CIE XYZ at full luminance
    ///
    /// Fails with [`Error::DegenerateChromaticity`] when the y chroma is
    /// zero; the xyY model has no XYZ image there.
    pub fn to_xyz(self) -> Result<Xyz> {
        let (x, y) = self.chromaticity();
        debug!(x, y, "normalized chromaticity");
        if y == 0.0 {
            return Err(Error::DegenerateChromaticity);
        }
        let luminance = 1.0;
        Ok(Xyz {
            x: (x * luminance) / y,
            y: luminance,
            z: (1.0 - x - y) * (luminance / y),
        })
    }
}

/// CIE XYZ tristimulus triple
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Xyz {
    /// X tristimulus value
    pub x: f64,
    /// Y tristimulus value (luminance)
    pub y: f64,
    /// Z tristimulus value
    pub z: f64,
}

impl Xyz {
    /// Convert to 8-bit sRGB: standard linear XYZ→RGB matrix, gamma
    /// encoding, channels clamped to the displayable range
    #[must_use]
    pub fn to_rgb(self) -> Rgb {
        let r = 3.2406 * self.x - 1.5372 * self.y - 0.4986 * self.z;
        let g = -0.9689 * self.x + 1.8758 * self.y + 0.0415 * self.z;
        let b = 0.0557 * self.x - 0.2040 * self.y + 1.0570 * self.z;
        Rgb {
            r: encode_channel(r),
            g: encode_channel(g),
            b: encode_channel(b),
        }
    }
}

/// 8-bit sRGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
}

// sRGB gamma encode one linear channel and scale to 0..=255. Negative input
// takes the linear branch and clamps to zero, so no NaN can escape powf.
fn encode_channel(linear: f64) -> u8 {
    let gamma = if linear <= 0.003_130_8 {
        12.92 * linear
    } else {
        1.055 * linear.powf(1.0 / 2.4) - 0.055
    };
    (gamma.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Decode a packed yxY sample straight to 8-bit sRGB
pub fn yxy_to_rgb(sample: u32) -> Result<Rgb> {
    ColorSample::new(sample).to_xyz().map(Xyz::to_rgb)
}
