//! Color types and HSV conversion.

use libm::{floorf, roundf};
use smart_leds::RGB8;

pub type Rgb = RGB8;

/// All channels off.
pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };

/// A single color channel, addressed the way external callers do
/// (0 = red, 1 = green, 2 = blue).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ColorChannel {
    Red = 0,
    Green = 1,
    Blue = 2,
}

impl ColorChannel {
    pub const fn from_raw(value: u8) -> Option<Self> {
        Some(match value {
            0 => Self::Red,
            1 => Self::Green,
            2 => Self::Blue,
            _ => return None,
        })
    }

    /// Store `value` into the addressed channel of `pixel`.
    pub(crate) const fn write(self, pixel: &mut Rgb, value: u8) {
        match self {
            Self::Red => pixel.r = value,
            Self::Green => pixel.g = value,
            Self::Blue => pixel.b = value,
        }
    }
}

/// Convert HSV to RGB using the standard six-sector algorithm.
///
/// Hue is wrapped into `[0, 1)`, saturation and value are clamped to
/// `[0, 1]`. Output channels are rounded to the nearest integer.
/// Zero or negative saturation renders pure gray.
pub fn hsv_to_rgb(hue: f32, sat: f32, val: f32) -> Rgb {
    let val = val.clamp(0.0, 1.0);
    if sat <= 0.0 {
        let gray = unit_to_channel(val);
        return Rgb {
            r: gray,
            g: gray,
            b: gray,
        };
    }
    let sat = sat.min(1.0);

    let mut hue = hue - floorf(hue);
    if hue >= 1.0 {
        // Wrapping a tiny negative hue can round up to exactly 1.0.
        hue = 0.0;
    }
    let h = hue * 6.0;
    let sector = floorf(h);
    let frac = h - sector;

    let p = val * (1.0 - sat);
    let q = val * (1.0 - sat * frac);
    let t = val * (1.0 - sat * (1.0 - frac));

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let (r, g, b) = match sector as u8 {
        0 => (val, t, p),
        1 => (q, val, p),
        2 => (p, val, t),
        3 => (p, q, val),
        4 => (t, p, val),
        _ => (val, p, q),
    };

    Rgb {
        r: unit_to_channel(r),
        g: unit_to_channel(g),
        b: unit_to_channel(b),
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn unit_to_channel(value: f32) -> u8 {
    roundf(value * 255.0).clamp(0.0, 255.0) as u8
}
