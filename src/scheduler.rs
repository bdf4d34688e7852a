//! Tick scheduling and the render-transmit loop.
//!
//! Pairs the compositor with the transmitter and command queue. The host
//! calls [`TickScheduler::tick`] in a loop and sleeps for the returned
//! duration; everything mutates synchronously inside that call, so no
//! locking is needed around the pixel state.

use embassy_time::{Duration, Instant};
use log::warn;

use crate::PulseDriver;
use crate::command::{CommandReceiver, StripCommand};
use crate::compositor::Compositor;
use crate::transmitter::{FrameOutcome, Transmitter};

/// Default animation re-evaluation period.
pub const DEFAULT_TICK_DURATION: Duration = Duration::from_millis(40);

/// Result of a tick operation.
#[derive(Debug, Clone, Copy)]
pub struct TickResult {
    /// The deadline for the next tick.
    pub next_deadline: Instant,
    /// How long to wait until the next tick (zero if behind schedule).
    pub sleep_duration: Duration,
    /// Whether a frame went onto the wire this tick.
    pub transmitted: bool,
}

/// Drives the compositor and transmitter from a host loop.
///
/// ```ignore
/// static COMMANDS: CommandQueue<8> = CommandQueue::new();
///
/// let compositor = Compositor::new(&CompositorConfig::default());
/// let transmitter = Transmitter::new(driver);
/// let mut scheduler =
///     TickScheduler::new(compositor, transmitter, COMMANDS.receiver());
/// scheduler.clear(now());
///
/// loop {
///     let result = scheduler.tick(now());
///     sleep(result.sleep_duration);
/// }
/// ```
pub struct TickScheduler<'a, D, const MAX_LEDS: usize, const MAX_GROUPS: usize, const COMMANDS: usize>
{
    compositor: Compositor<MAX_LEDS, MAX_GROUPS>,
    transmitter: Transmitter<D, MAX_LEDS>,
    commands: CommandReceiver<'a, COMMANDS>,
    next_tick: Instant,
    tick_duration: Duration,
}

impl<'a, D: PulseDriver, const MAX_LEDS: usize, const MAX_GROUPS: usize, const COMMANDS: usize>
    TickScheduler<'a, D, MAX_LEDS, MAX_GROUPS, COMMANDS>
{
    pub fn new(
        compositor: Compositor<MAX_LEDS, MAX_GROUPS>,
        transmitter: Transmitter<D, MAX_LEDS>,
        commands: CommandReceiver<'a, COMMANDS>,
    ) -> Self {
        Self::with_tick_duration(compositor, transmitter, commands, DEFAULT_TICK_DURATION)
    }

    pub fn with_tick_duration(
        compositor: Compositor<MAX_LEDS, MAX_GROUPS>,
        transmitter: Transmitter<D, MAX_LEDS>,
        commands: CommandReceiver<'a, COMMANDS>,
        tick_duration: Duration,
    ) -> Self {
        Self {
            compositor,
            transmitter,
            commands,
            next_tick: Instant::from_millis(0),
            tick_duration,
        }
    }

    /// Process one tick: drain commands, render if needed, transmit.
    ///
    /// The caller is responsible for waiting until `next_deadline` before
    /// calling `tick` again.
    pub fn tick(&mut self, now: Instant) -> TickResult {
        self.drain_commands(now);

        // Drift correction: if we've fallen too far behind, reset to now.
        // This prevents catch-up bursts after long stalls.
        let max_drift_ms = self.tick_duration.as_millis() * 2;
        if now.as_millis() > self.next_tick.as_millis() + max_drift_ms {
            self.next_tick = now;
        }

        let transmitted = self.flush(now);

        self.next_tick += self.tick_duration;
        let sleep_duration = if self.next_tick.as_millis() > now.as_millis() {
            Duration::from_millis(self.next_tick.as_millis() - now.as_millis())
        } else {
            Duration::from_millis(0)
        };

        TickResult {
            next_deadline: self.next_tick,
            sleep_duration,
            transmitted,
        }
    }

    /// Render and transmit immediately, bypassing the dirty check.
    pub fn commit(&mut self, now: Instant) -> bool {
        self.compositor.mark_dirty();
        self.flush(now)
    }

    /// Transmit an initial frame so the strip starts from a known state.
    pub fn clear(&mut self, now: Instant) {
        self.commit(now);
    }

    /// Get a reference to the compositor.
    pub fn compositor(&self) -> &Compositor<MAX_LEDS, MAX_GROUPS> {
        &self.compositor
    }

    /// Get a mutable reference to the compositor.
    pub fn compositor_mut(&mut self) -> &mut Compositor<MAX_LEDS, MAX_GROUPS> {
        &mut self.compositor
    }

    pub fn transmitter(&self) -> &Transmitter<D, MAX_LEDS> {
        &self.transmitter
    }

    fn drain_commands(&mut self, now: Instant) {
        while let Some(command) = self.commands.try_receive() {
            match command {
                StripCommand::SetGroupChannel {
                    group,
                    channel,
                    value,
                } => {
                    self.compositor
                        .update_group_channel(group.as_str(), channel, value);
                }
                StripCommand::SetGroupCap { group, cap } => {
                    self.compositor.set_group_cap(group.as_str(), cap);
                }
                StripCommand::EnableRfidMode => self.compositor.enable_rfid_mode(now),
                StripCommand::DisableRfidMode => self.compositor.disable_rfid_mode(now),
                StripCommand::SetArmSelectMode(mode) => {
                    self.compositor.set_arm_select_mode(mode, now);
                }
                StripCommand::SetArmSelectModeByName(name) => {
                    self.compositor.set_arm_select_mode_by_name(name.as_str(), now);
                }
                StripCommand::Commit => self.compositor.mark_dirty(),
            }
        }
    }

    /// Render if anything changed and push the frame onto the wire.
    ///
    /// A transmission failure drops the frame; the last-sent buffer stays
    /// unchanged so the next dirty tick retries with current content.
    fn flush(&mut self, now: Instant) -> bool {
        let Some(frame) = self.compositor.render(now) else {
            return false;
        };
        match self.transmitter.transmit_frame(frame) {
            Ok(outcome) => outcome == FrameOutcome::Sent,
            Err(err) => {
                warn!("frame dropped: {err}");
                false
            }
        }
    }
}
