//! Group registry and deferred writes.
//!
//! Groups bind a name to a set of LED indices plus a brightness cap and
//! scaling mode. They are configured once at startup; only the cap and
//! scaling mode may change afterwards. Names are resolved to a small
//! integer [`GroupId`] once, so the hot path never hashes strings.

use heapless::{String, Vec};
use libm::roundf;
use log::warn;

use crate::color::ColorChannel;

/// Maximum LEDs referenced by a single group.
pub const MAX_GROUP_LEDS: usize = 32;

/// Maximum length of a group name.
pub const MAX_GROUP_NAME: usize = 16;

/// Owned group name.
pub type GroupName = String<MAX_GROUP_NAME>;

/// How a group's brightness cap shapes its channel values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScalingMode {
    /// Rescale proportionally to `cap / 255`.
    #[default]
    Linear,
    /// Leave values untouched unless they exceed the cap.
    Clamp,
    /// Gamma-correct first, then rescale proportionally to `cap / 255`.
    Perceptual,
}

/// Handle to a registered group, valid for the registry that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupId(u8);

/// Channel values staged while writes to a group are deferred.
///
/// At most one value per channel; a later write to the same channel
/// overwrites the earlier one.
#[derive(Debug, Clone, Copy, Default)]
pub struct PendingWrite {
    channels: [Option<u8>; 3],
    used: bool,
}

impl PendingWrite {
    pub const fn new() -> Self {
        Self {
            channels: [None; 3],
            used: false,
        }
    }

    /// Stage a channel value, replacing any previously staged one.
    pub fn stage(&mut self, channel: ColorChannel, value: u8) {
        self.channels[channel as usize] = Some(value);
        self.used = true;
    }

    /// Return the staged values and reset the entry.
    pub fn take(&mut self) -> [Option<u8>; 3] {
        let staged = if self.used { self.channels } else { [None; 3] };
        self.clear();
        staged
    }

    /// Drop everything staged so a fresh session begins.
    pub fn clear(&mut self) {
        self.channels = [None; 3];
        self.used = false;
    }

    pub const fn is_used(&self) -> bool {
        self.used
    }
}

/// A named run of LEDs with its brightness shaping parameters.
#[derive(Debug, Clone)]
pub struct Group {
    pub(crate) name: GroupName,
    pub(crate) leds: Vec<u16, MAX_GROUP_LEDS>,
    pub(crate) cap: u8,
    pub(crate) scaling: ScalingMode,
    pub(crate) pending: PendingWrite,
}

impl Group {
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn leds(&self) -> &[u16] {
        &self.leds
    }

    pub const fn cap(&self) -> u8 {
        self.cap
    }

    pub const fn scaling(&self) -> ScalingMode {
        self.scaling
    }
}

/// Fixed-capacity registry mapping group names to LED runs.
#[derive(Debug, Default)]
pub struct GroupRegistry<const MAX_GROUPS: usize> {
    groups: Vec<Group, MAX_GROUPS>,
}

impl<const MAX_GROUPS: usize> GroupRegistry<MAX_GROUPS> {
    pub const fn new() -> Self {
        Self { groups: Vec::new() }
    }

    /// Register or overwrite a group.
    ///
    /// Indices beyond the strip length are kept and skipped at use.
    /// Returns `None` if the name does not fit or the registry is full.
    pub fn add(
        &mut self,
        name: &str,
        leds: &[u16],
        cap: u8,
        scaling: ScalingMode,
    ) -> Option<GroupId> {
        let Ok(name) = GroupName::try_from(name) else {
            warn!("group name '{name}' exceeds {MAX_GROUP_NAME} bytes, not registered");
            return None;
        };

        let mut indices: Vec<u16, MAX_GROUP_LEDS> = Vec::new();
        for &led in leds {
            if indices.push(led).is_err() {
                warn!(
                    "group '{}' references more than {MAX_GROUP_LEDS} LEDs, extra dropped",
                    name.as_str()
                );
                break;
            }
        }

        let group = Group {
            name,
            leds: indices,
            cap,
            scaling,
            pending: PendingWrite::new(),
        };

        if let Some(id) = self.lookup(group.name.as_str()) {
            self.groups[id.0 as usize] = group;
            return Some(id);
        }

        let id = self.groups.len();
        if self.groups.push(group).is_err() {
            warn!("group registry full ({MAX_GROUPS}), group not registered");
            return None;
        }
        #[allow(clippy::cast_possible_truncation)]
        Some(GroupId(id as u8))
    }

    /// Resolve a name to its id.
    pub fn lookup(&self, name: &str) -> Option<GroupId> {
        self.groups
            .iter()
            .position(|group| group.name.as_str() == name)
            .map(|idx| {
                #[allow(clippy::cast_possible_truncation)]
                GroupId(idx as u8)
            })
    }

    pub fn get(&self, id: GroupId) -> &Group {
        &self.groups[id.0 as usize]
    }

    pub fn get_mut(&mut self, id: GroupId) -> &mut Group {
        &mut self.groups[id.0 as usize]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Group> {
        self.groups.iter()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Normalize a legacy 0.0-1.0 max-brightness fraction to the canonical
/// 0-255 integer cap. Rounds half up, clamps out-of-range input.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn cap_from_fraction(fraction: f32) -> u8 {
    roundf(fraction.clamp(0.0, 1.0) * 255.0) as u8
}
