//! Strip, RFID and arm-select mode state.

use crate::color::Rgb;

const MODE_NAME_NONE: &str = "none";
const MODE_NAME_AWAY: &str = "away";
const MODE_NAME_HOME: &str = "home";
const MODE_NAME_NIGHT: &str = "night";
const MODE_NAME_VACATION: &str = "vacation";
const MODE_NAME_BYPASS: &str = "bypass";
const MODE_NAME_ACTION: &str = "action";

/// Top-level rendering mode of the strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StripMode {
    #[default]
    Normal,
    /// Tag programming in progress, ambient rainbow owns the frame.
    RfidProgram,
}

/// Opacity lifecycle of the RFID ambient rainbow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RfidTransition {
    #[default]
    Inactive,
    FadeIn,
    Active,
    FadeOut,
}

/// Arm-select overlay mode.
///
/// Each non-None mode is bound to one group and one highlight color. The
/// overlay flashes the group's first LED while the selection window is
/// open; `Action` runs a group-restricted rainbow instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArmSelectMode {
    #[default]
    None,
    Away,
    Home,
    Night,
    Vacation,
    Bypass,
    Action,
}

impl ArmSelectMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => MODE_NAME_NONE,
            Self::Away => MODE_NAME_AWAY,
            Self::Home => MODE_NAME_HOME,
            Self::Night => MODE_NAME_NIGHT,
            Self::Vacation => MODE_NAME_VACATION,
            Self::Bypass => MODE_NAME_BYPASS,
            Self::Action => MODE_NAME_ACTION,
        }
    }

    /// Case-insensitive name lookup. `custom` is accepted as an alias for
    /// the action overlay.
    pub fn parse_from_str(s: &str) -> Option<Self> {
        let names = [
            (MODE_NAME_NONE, Self::None),
            (MODE_NAME_AWAY, Self::Away),
            (MODE_NAME_HOME, Self::Home),
            (MODE_NAME_NIGHT, Self::Night),
            (MODE_NAME_VACATION, Self::Vacation),
            (MODE_NAME_BYPASS, Self::Bypass),
            (MODE_NAME_ACTION, Self::Action),
            ("custom", Self::Action),
        ];
        names
            .iter()
            .find(|(name, _)| s.eq_ignore_ascii_case(name))
            .map(|&(_, mode)| mode)
    }

    /// Name of the group the overlay renders on. `None` mode has no group.
    pub const fn group_name(self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Away => Some(MODE_NAME_AWAY),
            Self::Home => Some(MODE_NAME_HOME),
            Self::Night => Some(MODE_NAME_NIGHT),
            Self::Vacation => Some(MODE_NAME_VACATION),
            Self::Bypass => Some(MODE_NAME_BYPASS),
            Self::Action => Some(MODE_NAME_ACTION),
        }
    }

    /// Fixed highlight color used during the flash ON phase.
    pub const fn highlight(self) -> Rgb {
        match self {
            Self::None => Rgb { r: 0, g: 0, b: 0 },
            Self::Away => Rgb { r: 255, g: 0, b: 0 },
            Self::Home => Rgb { r: 0, g: 255, b: 0 },
            Self::Night => Rgb { r: 0, g: 0, b: 255 },
            Self::Vacation => Rgb {
                r: 255,
                g: 0,
                b: 255,
            },
            Self::Bypass => Rgb {
                r: 255,
                g: 160,
                b: 0,
            },
            // Action renders a rainbow; the highlight is only a fallback.
            Self::Action => Rgb {
                r: 255,
                g: 255,
                b: 255,
            },
        }
    }
}
