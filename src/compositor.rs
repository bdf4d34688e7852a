//! Layered frame compositing.
//!
//! Callers write per-group base colors; two animated layers can take over
//! the frame. The RFID ambient rainbow is authoritative whenever it is
//! visible, otherwise the working buffer is rebuilt from the base buffer
//! and the arm-select overlay is drawn on top. Group brightness shaping is
//! the last pass before transmission, over every layer's output.

use embassy_time::{Duration, Instant};
use log::{debug, warn};

use crate::color::{BLACK, ColorChannel, Rgb};
use crate::gamma::{DEFAULT_GAMMA, GammaTable};
use crate::group::{Group, GroupId, GroupRegistry, ScalingMode};
use crate::math8::{exact_scale8, scale8};
use crate::mode::{ArmSelectMode, RfidTransition, StripMode};
use crate::rainbow::RainbowCycle;
use crate::transition::ValueTransition;

const FLASH_ON_MS: u64 = 400;
const FLASH_OFF_MS: u64 = 400;
const RFID_FADE_MS: u64 = 500;
const AMBIENT_CYCLE_MS: u64 = 8_000;
const ACTION_CYCLE_MS: u64 = 3_000;

/// Timing parameters for the animated layers
#[derive(Debug, Clone, Copy)]
pub struct ComposerTimings {
    /// ON half of the flash duty cycle
    pub flash_on: Duration,
    /// OFF half of the flash duty cycle
    pub flash_off: Duration,
    /// RFID ambient fade-in and fade-out duration
    pub rfid_fade: Duration,
    /// Full hue rotation of the ambient rainbow
    pub ambient_cycle: Duration,
    /// Full hue rotation of the action overlay rainbow
    pub action_cycle: Duration,
}

impl Default for ComposerTimings {
    fn default() -> Self {
        Self {
            flash_on: Duration::from_millis(FLASH_ON_MS),
            flash_off: Duration::from_millis(FLASH_OFF_MS),
            rfid_fade: Duration::from_millis(RFID_FADE_MS),
            ambient_cycle: Duration::from_millis(AMBIENT_CYCLE_MS),
            action_cycle: Duration::from_millis(ACTION_CYCLE_MS),
        }
    }
}

/// Configuration for the compositor
#[derive(Debug, Clone)]
pub struct CompositorConfig {
    pub timings: ComposerTimings,
    /// Exponent for the perceptual scaling table
    pub gamma: f32,
}

impl Default for CompositorConfig {
    fn default() -> Self {
        Self {
            timings: ComposerTimings::default(),
            gamma: DEFAULT_GAMMA,
        }
    }
}

/// Compositor - the per-tick frame state machine
///
/// `MAX_LEDS` is the strip length, `MAX_GROUPS` the registry capacity.
pub struct Compositor<const MAX_LEDS: usize, const MAX_GROUPS: usize> {
    // Configuration
    timings: ComposerTimings,
    gamma: GammaTable,
    ambient: RainbowCycle,
    action: RainbowCycle,

    // Pixel state
    base: [Rgb; MAX_LEDS],
    working: [Rgb; MAX_LEDS],
    dirty: bool,
    groups: GroupRegistry<MAX_GROUPS>,

    // Mode state
    strip_mode: StripMode,
    rfid: RfidTransition,
    rfid_fade: ValueTransition<u8>,
    arm_mode: ArmSelectMode,
    disable_pending: bool,
    flash_epoch: Instant,
}

impl<const MAX_LEDS: usize, const MAX_GROUPS: usize> Compositor<MAX_LEDS, MAX_GROUPS> {
    pub fn new(config: &CompositorConfig) -> Self {
        Self {
            timings: config.timings,
            gamma: GammaTable::new(config.gamma),
            ambient: RainbowCycle::new(config.timings.ambient_cycle),
            action: RainbowCycle::new(config.timings.action_cycle),
            base: [BLACK; MAX_LEDS],
            working: [BLACK; MAX_LEDS],
            dirty: true,
            groups: GroupRegistry::new(),
            strip_mode: StripMode::Normal,
            rfid: RfidTransition::Inactive,
            rfid_fade: ValueTransition::new_u8(0),
            arm_mode: ArmSelectMode::None,
            disable_pending: false,
            flash_epoch: Instant::from_millis(0),
        }
    }

    /// Register or overwrite a group with linear scaling.
    pub fn add_group(&mut self, name: &str, leds: &[u16], cap: u8) {
        self.groups.add(name, leds, cap, ScalingMode::Linear);
    }

    /// Register or overwrite a group with an explicit scaling mode.
    pub fn add_group_with_scaling(
        &mut self,
        name: &str,
        leds: &[u16],
        cap: u8,
        scaling: ScalingMode,
    ) {
        self.groups.add(name, leds, cap, scaling);
    }

    /// Change a group's brightness cap at runtime.
    pub fn set_group_cap(&mut self, name: &str, cap: u8) {
        let Some(id) = self.groups.lookup(name) else {
            warn!("group '{name}' not found");
            return;
        };
        self.groups.get_mut(id).cap = cap;
        self.dirty = true;
    }

    /// Change a group's scaling mode at runtime.
    pub fn set_group_scaling(&mut self, name: &str, scaling: ScalingMode) {
        let Some(id) = self.groups.lookup(name) else {
            warn!("group '{name}' not found");
            return;
        };
        self.groups.get_mut(id).scaling = scaling;
        self.dirty = true;
    }

    /// Set one channel for every LED of a group.
    ///
    /// While the arm-select window is open for this exact group the value
    /// is staged instead of applied, so the committed state stays
    /// untouched until the workflow resolves.
    pub fn update_group_channel(&mut self, name: &str, channel: ColorChannel, value: u8) {
        let Some(id) = self.groups.lookup(name) else {
            warn!("group '{name}' not found");
            return;
        };

        if self.write_deferred(id) {
            self.groups.get_mut(id).pending.stage(channel, value);
            return;
        }

        let group = self.groups.get(id);
        for &led in group.leds() {
            if let Some(pixel) = self.base.get_mut(led as usize) {
                channel.write(pixel, value);
            }
        }
        self.dirty = true;
    }

    /// Raw-channel variant of
    /// [`update_group_channel`](Self::update_group_channel) for protocol
    /// decoders (0 = red, 1 = green, 2 = blue).
    pub fn update_group_channel_raw(&mut self, name: &str, channel: u8, value: u8) {
        let Some(channel) = ColorChannel::from_raw(channel) else {
            warn!("invalid channel {channel} for group '{name}'");
            return;
        };
        self.update_group_channel(name, channel, value);
    }

    /// Begin the ambient rainbow fade-in.
    pub fn enable_rfid_mode(&mut self, now: Instant) {
        debug!("rfid program mode enabled");
        self.strip_mode = StripMode::RfidProgram;
        self.rfid = RfidTransition::FadeIn;
        self.rfid_fade.set(255, self.timings.rfid_fade, now);
        self.dirty = true;
    }

    /// Begin the ambient rainbow fade-out.
    pub fn disable_rfid_mode(&mut self, now: Instant) {
        if self.strip_mode != StripMode::RfidProgram {
            return;
        }
        debug!("rfid program mode disabled, fading out");
        self.rfid = RfidTransition::FadeOut;
        self.rfid_fade.set(0, self.timings.rfid_fade, now);
        self.dirty = true;
    }

    /// Drive the arm-select overlay workflow.
    ///
    /// Setting `None` does not clear the mode immediately; the staged
    /// writes are flushed and the mode dropped once the flash reaches its
    /// OFF half, so the underlying base color never shows through
    /// mid-flash.
    pub fn set_arm_select_mode(&mut self, mode: ArmSelectMode, now: Instant) {
        if mode == ArmSelectMode::None {
            if self.arm_mode == ArmSelectMode::None {
                return;
            }
            if self.rfid_visible() {
                // Nothing shows through under the ambient layer, no need
                // to wait for the OFF phase.
                self.finalize_disable();
            } else if !self.disable_pending {
                debug!("arm select disable pending");
                self.disable_pending = true;
                self.dirty = true;
            }
            return;
        }

        let previous = self.arm_mode;
        if self.disable_pending {
            self.disable_pending = false;
            self.flush_pending_of(previous);
        } else if previous != ArmSelectMode::None && previous.group_name() != mode.group_name() {
            // Leaving a selection window applies whatever was staged.
            self.flush_pending_of(previous);
        }

        self.arm_mode = mode;
        self.flash_epoch = now;
        if previous.group_name() != mode.group_name() {
            self.clear_pending_of(mode);
        }

        if let Some(name) = mode.group_name() {
            if self.groups.lookup(name).is_none() {
                warn!("arm select group '{name}' not configured");
            }
        }
        debug!("arm select mode set to {}", mode.as_str());
        self.dirty = true;
    }

    /// Name-based variant of [`set_arm_select_mode`](Self::set_arm_select_mode).
    /// Unrecognized names map to `None`.
    pub fn set_arm_select_mode_by_name(&mut self, name: &str, now: Instant) {
        let mode = ArmSelectMode::parse_from_str(name).unwrap_or_else(|| {
            warn!("unknown arm select mode '{name}', treating as none");
            ArmSelectMode::None
        });
        self.set_arm_select_mode(mode, now);
    }

    /// Force a rebuild on the next render even if nothing changed.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Rebuild the working buffer if anything changed or animates.
    ///
    /// Returns the frame to transmit, or `None` when the strip is idle.
    /// The working buffer is always rebuilt from scratch, never patched.
    pub fn render(&mut self, now: Instant) -> Option<&[Rgb; MAX_LEDS]> {
        if !self.dirty && !self.is_animating() {
            return None;
        }
        self.dirty = false;

        self.rfid_fade.tick(now);
        self.advance_rfid();

        if self.rfid_visible() {
            self.render_ambient(now);
        } else {
            self.working = self.base;
            self.render_overlay(now);
        }

        self.shape_groups();
        Some(&self.working)
    }

    /// Committed color state, untouched by animations and overlays.
    pub fn base(&self) -> &[Rgb; MAX_LEDS] {
        &self.base
    }

    pub const fn strip_mode(&self) -> StripMode {
        self.strip_mode
    }

    pub const fn rfid_transition(&self) -> RfidTransition {
        self.rfid
    }

    /// Current ambient opacity (0-255).
    pub const fn rfid_fade(&self) -> u8 {
        self.rfid_fade.current()
    }

    pub const fn arm_select_mode(&self) -> ArmSelectMode {
        self.arm_mode
    }

    pub const fn is_disable_pending(&self) -> bool {
        self.disable_pending
    }

    pub fn group(&self, name: &str) -> Option<&Group> {
        self.groups.lookup(name).map(|id| self.groups.get(id))
    }

    /// Log the configured groups and current mode state.
    pub fn log_config(&self) {
        debug!("strip: {} LEDs, {} group(s)", MAX_LEDS, self.groups.len());
        for group in self.groups.iter() {
            debug!(
                "  group '{}': {} LED(s), cap={}, scaling={:?}",
                group.name(),
                group.leds().len(),
                group.cap(),
                group.scaling(),
            );
        }
    }

    const fn is_animating(&self) -> bool {
        matches!(self.strip_mode, StripMode::RfidProgram)
            || !matches!(self.arm_mode, ArmSelectMode::None)
            || self.disable_pending
    }

    fn rfid_visible(&self) -> bool {
        self.strip_mode == StripMode::RfidProgram && self.rfid != RfidTransition::Inactive
    }

    /// Advance the ambient fade lifecycle after a fade tick.
    fn advance_rfid(&mut self) {
        match self.rfid {
            RfidTransition::FadeIn if !self.rfid_fade.is_transitioning() => {
                self.rfid = RfidTransition::Active;
            }
            RfidTransition::FadeOut if !self.rfid_fade.is_transitioning() => {
                debug!("rfid ambient faded out");
                self.rfid = RfidTransition::Inactive;
                self.strip_mode = StripMode::Normal;
                self.dirty = true;
                if self.disable_pending {
                    // Nothing was visible, finalize without waiting for
                    // the flash OFF phase.
                    self.finalize_disable();
                }
            }
            _ => {}
        }
    }

    fn render_ambient(&mut self, now: Instant) {
        self.ambient.fill(now, &mut self.working);
        let fade = self.rfid_fade.current();
        if fade < 255 {
            for pixel in &mut self.working {
                pixel.r = scale8(pixel.r, fade);
                pixel.g = scale8(pixel.g, fade);
                pixel.b = scale8(pixel.b, fade);
            }
        }
    }

    fn render_overlay(&mut self, now: Instant) {
        let mode = self.arm_mode;
        let Some(group_name) = mode.group_name() else {
            return;
        };
        let Some(id) = self.groups.lookup(group_name) else {
            if self.disable_pending {
                self.finalize_disable();
            }
            return;
        };

        let phase_on = self.flash_phase_on(now);

        if mode == ArmSelectMode::Action {
            let group = self.groups.get(id);
            let len = group.leds().len().max(1);
            for (pos, &led) in group.leds().iter().enumerate() {
                let Some(pixel) = self.working.get_mut(led as usize) else {
                    continue;
                };
                #[allow(clippy::cast_precision_loss)]
                let offset = pos as f32 / len as f32;
                *pixel = self.action.shade(now, offset);
            }
        } else {
            let first = self.groups.get(id).leds().first().copied();
            if let Some(first) = first {
                if let Some(pixel) = self.working.get_mut(first as usize) {
                    *pixel = if phase_on { mode.highlight() } else { BLACK };
                }
            }
        }

        if self.disable_pending && !phase_on {
            self.finalize_disable();
        }
    }

    /// Per-group brightness shaping, the last pass before transmission.
    fn shape_groups(&mut self) {
        for group in self.groups.iter() {
            for &led in group.leds() {
                let Some(pixel) = self.working.get_mut(led as usize) else {
                    continue;
                };
                *pixel = shape_pixel(*pixel, group.cap(), group.scaling(), &self.gamma);
            }
        }
    }

    fn flash_phase_on(&self, now: Instant) -> bool {
        let on_ms = self.timings.flash_on.as_millis();
        let period = (on_ms + self.timings.flash_off.as_millis()).max(1);
        now.duration_since(self.flash_epoch).as_millis() % period < on_ms
    }

    /// Whether a write to this group must be staged instead of applied.
    fn write_deferred(&self, id: GroupId) -> bool {
        if self.disable_pending {
            return false;
        }
        let Some(name) = self.arm_mode.group_name() else {
            return false;
        };
        self.groups.get(id).name() == name
    }

    /// Apply staged writes and drop the overlay.
    fn finalize_disable(&mut self) {
        debug!("arm select mode finalized to none");
        self.flush_pending_of(self.arm_mode);
        self.arm_mode = ArmSelectMode::None;
        self.disable_pending = false;
        self.dirty = true;
    }

    fn flush_pending_of(&mut self, mode: ArmSelectMode) {
        let Some(name) = mode.group_name() else {
            return;
        };
        let Some(id) = self.groups.lookup(name) else {
            return;
        };
        self.flush_pending(id);
    }

    fn flush_pending(&mut self, id: GroupId) {
        let staged = self.groups.get_mut(id).pending.take();
        if staged.iter().all(Option::is_none) {
            return;
        }
        let group = self.groups.get(id);
        for &led in group.leds() {
            let Some(pixel) = self.base.get_mut(led as usize) else {
                continue;
            };
            if let Some(value) = staged[ColorChannel::Red as usize] {
                pixel.r = value;
            }
            if let Some(value) = staged[ColorChannel::Green as usize] {
                pixel.g = value;
            }
            if let Some(value) = staged[ColorChannel::Blue as usize] {
                pixel.b = value;
            }
        }
        self.dirty = true;
    }

    fn clear_pending_of(&mut self, mode: ArmSelectMode) {
        let Some(name) = mode.group_name() else {
            return;
        };
        let Some(id) = self.groups.lookup(name) else {
            return;
        };
        self.groups.get_mut(id).pending.clear();
    }
}

/// Shape one pixel by a group's cap and scaling mode.
///
/// A cap of 0 forces the pixel off regardless of mode.
fn shape_pixel(pixel: Rgb, cap: u8, scaling: ScalingMode, gamma: &GammaTable) -> Rgb {
    if cap == 0 {
        return BLACK;
    }
    match scaling {
        ScalingMode::Linear => Rgb {
            r: exact_scale8(pixel.r, cap),
            g: exact_scale8(pixel.g, cap),
            b: exact_scale8(pixel.b, cap),
        },
        ScalingMode::Clamp => Rgb {
            r: pixel.r.min(cap),
            g: pixel.g.min(cap),
            b: pixel.b.min(cap),
        },
        ScalingMode::Perceptual => Rgb {
            r: exact_scale8(gamma.correct(pixel.r), cap),
            g: exact_scale8(gamma.correct(pixel.g), cap),
            b: exact_scale8(gamma.correct(pixel.b), cap),
        },
    }
}
