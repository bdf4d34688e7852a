//! WS2812 single-wire symbol encoding.
//!
//! Timings are expressed in 25 ns ticks (40 MHz resolution). Each data bit
//! is one high phase followed by one low phase; bytes go out most
//! significant bit first, pixels in green-red-blue order. A frame is
//! terminated by a reset symbol holding the line low for at least 50 us.

use crate::color::Rgb;

/// Hardware tick resolution required for these durations.
pub const TICK_HZ: u32 = 40_000_000;

// WS2812 (800kHz) timing in 25 ns ticks
const T0H: u16 = 16; // 0.40us
const T0L: u16 = 34; // 0.85us
const T1H: u16 = 32; // 0.80us
const T1L: u16 = 18; // 0.45us

/// Reset symbol duration: > 50us low.
pub const RESET_TICKS: u16 = 2000;

/// One wire symbol: a level held for a number of ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pulse {
    pub level: bool,
    pub ticks: u16,
}

/// The end-of-frame latch symbol.
pub const RESET_PULSE: Pulse = Pulse {
    level: false,
    ticks: RESET_TICKS,
};

/// The two symbols encoding a single data bit.
pub const fn bit_pulses(bit: bool) -> [Pulse; 2] {
    if bit {
        [
            Pulse {
                level: true,
                ticks: T1H,
            },
            Pulse {
                level: false,
                ticks: T1L,
            },
        ]
    } else {
        [
            Pulse {
                level: true,
                ticks: T0H,
            },
            Pulse {
                level: false,
                ticks: T0L,
            },
        ]
    }
}

/// Symbols for one byte, most significant bit first.
pub fn byte_pulses(byte: u8) -> impl Iterator<Item = Pulse> {
    (0..8u8).flat_map(move |bit| bit_pulses(byte & (0x80 >> bit) != 0))
}

/// Frame bytes in wire order: G, R, B per LED.
pub fn wire_bytes(frame: &[Rgb]) -> impl Iterator<Item = u8> + '_ {
    frame.iter().flat_map(|pixel| [pixel.g, pixel.r, pixel.b])
}

/// The full data pulse train for a frame, without the reset symbol.
pub fn frame_pulses(frame: &[Rgb]) -> impl Iterator<Item = Pulse> + '_ {
    wire_bytes(frame).flat_map(byte_pulses)
}
