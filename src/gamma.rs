//! Gamma correction lookup table.

use libm::{powf, roundf};

/// Default exponent for perceptual brightness shaping.
pub const DEFAULT_GAMMA: f32 = 2.2;

/// Precomputed 256-entry gamma lookup table.
///
/// Built once at construction so the per-pixel path is a plain index.
#[derive(Debug, Clone)]
pub struct GammaTable {
    table: [u8; 256],
}

impl GammaTable {
    /// Build a table for the given exponent.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn new(gamma: f32) -> Self {
        let mut table = [0u8; 256];
        for (i, slot) in table.iter_mut().enumerate() {
            #[allow(clippy::cast_precision_loss)]
            let normalized = i as f32 / 255.0;
            *slot = roundf(powf(normalized, gamma) * 255.0).clamp(0.0, 255.0) as u8;
        }
        Self { table }
    }

    /// Look up the corrected value for a channel.
    pub const fn correct(&self, value: u8) -> u8 {
        self.table[value as usize]
    }
}

impl Default for GammaTable {
    fn default() -> Self {
        Self::new(DEFAULT_GAMMA)
    }
}
