//! Frame diffing and wire transmission.

use core::fmt;

use embassy_time::Duration;
use log::debug;

use crate::PulseDriver;
use crate::color::{BLACK, Rgb};
use crate::wire::{RESET_PULSE, frame_pulses};

const DATA_TIMEOUT_MS: u64 = 20;
const LATCH_TIMEOUT_MS: u64 = 10;

/// Failure while moving a pulse train onto the wire.
///
/// Both variants drop the current frame; the component stays usable and
/// the next dirty tick retries naturally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransmitError {
    /// The driver did not finish within its timeout.
    Timeout,
    /// The underlying peripheral rejected the transfer.
    Bus,
}

impl fmt::Display for TransmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => f.write_str("transmission timed out"),
            Self::Bus => f.write_str("bus error"),
        }
    }
}

impl core::error::Error for TransmitError {}

/// Result of handing a frame to the transmitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// The frame went onto the wire.
    Sent,
    /// Identical to the last transmitted frame, nothing sent.
    Unchanged,
}

/// Owns the wire and the last-sent frame.
///
/// A frame is only transmitted when it differs from the previous one.
/// Data and latch are two sequential blocking operations with independent
/// timeouts; the last-sent buffer is updated only after both succeed, so
/// a dropped frame is retried with current content on the next tick.
pub struct Transmitter<D, const MAX_LEDS: usize> {
    driver: D,
    last_sent: [Rgb; MAX_LEDS],
    primed: bool,
    data_timeout: Duration,
    latch_timeout: Duration,
}

impl<D: PulseDriver, const MAX_LEDS: usize> Transmitter<D, MAX_LEDS> {
    pub fn new(driver: D) -> Self {
        Self {
            driver,
            last_sent: [BLACK; MAX_LEDS],
            primed: false,
            data_timeout: Duration::from_millis(DATA_TIMEOUT_MS),
            latch_timeout: Duration::from_millis(LATCH_TIMEOUT_MS),
        }
    }

    /// Override the per-step timeouts.
    #[must_use]
    pub fn with_timeouts(mut self, data: Duration, latch: Duration) -> Self {
        self.data_timeout = data;
        self.latch_timeout = latch;
        self
    }

    /// Diff against the last-sent frame and transmit if anything changed.
    pub fn transmit_frame(&mut self, frame: &[Rgb; MAX_LEDS]) -> Result<FrameOutcome, TransmitError> {
        if self.primed && *frame == self.last_sent {
            return Ok(FrameOutcome::Unchanged);
        }

        self.driver.transmit(frame_pulses(frame), self.data_timeout)?;
        self.driver
            .transmit(core::iter::once(RESET_PULSE), self.latch_timeout)?;

        self.last_sent = *frame;
        self.primed = true;
        debug!("frame transmitted ({} LEDs)", MAX_LEDS);
        Ok(FrameOutcome::Sent)
    }

    /// The most recently transmitted frame, if any.
    pub fn last_sent(&self) -> Option<&[Rgb; MAX_LEDS]> {
        self.primed.then_some(&self.last_sent)
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }
}
