#![no_std]

pub mod color;
pub mod command;
pub mod compositor;
pub mod gamma;
pub mod group;
pub mod math8;
pub mod mode;
pub mod rainbow;
pub mod scheduler;
pub mod transition;
pub mod transmitter;
pub mod wire;

pub use color::{BLACK, ColorChannel, Rgb, hsv_to_rgb};
pub use command::{CommandQueue, CommandReceiver, CommandSender, StripCommand};
pub use compositor::{ComposerTimings, Compositor, CompositorConfig};
pub use gamma::GammaTable;
pub use group::{GroupId, GroupName, MAX_GROUP_LEDS, ScalingMode, cap_from_fraction};
pub use mode::{ArmSelectMode, RfidTransition, StripMode};
pub use scheduler::{DEFAULT_TICK_DURATION, TickResult, TickScheduler};
pub use transmitter::{FrameOutcome, TransmitError, Transmitter};
pub use wire::Pulse;

pub use embassy_time::{Duration, Instant};

/// Abstract single-wire driver trait
///
/// Implement this trait to support different hardware platforms.
/// The transmitter is generic over this trait and hands it fully encoded
/// pulse trains, so implementations only move symbols onto the wire.
///
/// `transmit` must block until the train has been sent or the timeout
/// expires. The wire is owned exclusively by the [`Transmitter`]; nothing
/// else in the system writes to it.
pub trait PulseDriver {
    /// Send a pulse train, blocking for at most `timeout`.
    fn transmit<I>(&mut self, pulses: I, timeout: Duration) -> Result<(), TransmitError>
    where
        I: IntoIterator<Item = Pulse>;
}
