//! Traveling-hue rainbow shared by the ambient layer and the action overlay.

use embassy_time::{Duration, Instant};

use crate::color::{Rgb, hsv_to_rgb};

/// Hue rotation with a fixed cycle length.
///
/// The base hue advances linearly with elapsed time modulo the cycle;
/// individual LEDs are offset by their position fraction so the full
/// spectrum travels along the span.
#[derive(Debug, Clone, Copy)]
pub struct RainbowCycle {
    cycle: Duration,
}

impl RainbowCycle {
    pub const fn new(cycle: Duration) -> Self {
        Self { cycle }
    }

    #[allow(clippy::cast_precision_loss)]
    fn base_hue(self, now: Instant) -> f32 {
        let cycle_ms = self.cycle.as_millis().max(1);
        (now.as_millis() % cycle_ms) as f32 / cycle_ms as f32
    }

    /// Color at a position offset (fraction of the span, 0.0..1.0).
    pub fn shade(self, now: Instant, offset: f32) -> Rgb {
        hsv_to_rgb(self.base_hue(now) + offset, 1.0, 1.0)
    }

    /// Fill a span with the traveling rainbow.
    pub fn fill(self, now: Instant, leds: &mut [Rgb]) {
        if leds.is_empty() {
            return;
        }
        let base = self.base_hue(now);
        let len = leds.len();
        for (i, led) in leds.iter_mut().enumerate() {
            #[allow(clippy::cast_precision_loss)]
            let offset = i as f32 / len as f32;
            *led = hsv_to_rgb(base + offset, 1.0, 1.0);
        }
    }
}
