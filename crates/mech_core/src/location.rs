//! Chassis locations and their critical-slot capacities.
//!
//! A biped chassis has eight fixed locations. Capacities are static:
//! Head 6, torsos and arms 12, legs 6, for 78 slots in total.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Total critical slots on a biped chassis.
pub const TOTAL_CRITICAL_SLOTS: u32 = 78;

/// One of the eight body sections of a biped BattleMech.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Location {
    /// Head.
    Head,
    /// Center torso.
    CenterTorso,
    /// Left torso.
    LeftTorso,
    /// Right torso.
    RightTorso,
    /// Left arm.
    LeftArm,
    /// Right arm.
    RightArm,
    /// Left leg.
    LeftLeg,
    /// Right leg.
    RightLeg,
}

impl Location {
    /// Number of locations.
    pub const COUNT: usize = 8;

    /// All locations in canonical order.
    pub const ALL: [Location; Self::COUNT] = [
        Location::Head,
        Location::CenterTorso,
        Location::LeftTorso,
        Location::RightTorso,
        Location::LeftArm,
        Location::RightArm,
        Location::LeftLeg,
        Location::RightLeg,
    ];

    /// Critical-slot capacity of this location.
    #[must_use]
    pub const fn capacity(self) -> u32 {
        match self {
            Self::Head | Self::LeftLeg | Self::RightLeg => 6,
            Self::CenterTorso
            | Self::LeftTorso
            | Self::RightTorso
            | Self::LeftArm
            | Self::RightArm => 12,
        }
    }

    /// Whether the location carries a rear armor facet.
    #[must_use]
    pub const fn has_rear(self) -> bool {
        matches!(self, Self::CenterTorso | Self::LeftTorso | Self::RightTorso)
    }

    /// The symmetric partner of a paired location.
    #[must_use]
    pub const fn mirror(self) -> Option<Location> {
        match self {
            Self::LeftTorso => Some(Self::RightTorso),
            Self::RightTorso => Some(Self::LeftTorso),
            Self::LeftArm => Some(Self::RightArm),
            Self::RightArm => Some(Self::LeftArm),
            Self::LeftLeg => Some(Self::RightLeg),
            Self::RightLeg => Some(Self::LeftLeg),
            Self::Head | Self::CenterTorso => None,
        }
    }

    /// Short record-sheet abbreviation.
    #[must_use]
    pub const fn abbreviation(self) -> &'static str {
        match self {
            Self::Head => "HD",
            Self::CenterTorso => "CT",
            Self::LeftTorso => "LT",
            Self::RightTorso => "RT",
            Self::LeftArm => "LA",
            Self::RightArm => "RA",
            Self::LeftLeg => "LL",
            Self::RightLeg => "RL",
        }
    }

    /// Human-readable name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Head => "Head",
            Self::CenterTorso => "Center Torso",
            Self::LeftTorso => "Left Torso",
            Self::RightTorso => "Right Torso",
            Self::LeftArm => "Left Arm",
            Self::RightArm => "Right Arm",
            Self::LeftLeg => "Left Leg",
            Self::RightLeg => "Right Leg",
        }
    }

    /// Parse a location from its display name, abbreviation or
    /// upper-snake-case identifier (`"Left Arm"`, `"LA"`, `"LEFT_ARM"`).
    #[must_use]
    pub fn parse(name: &str) -> Option<Location> {
        let normalized: String = name
            .trim()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_uppercase();
        Self::ALL.into_iter().find(|loc| {
            normalized == loc.abbreviation()
                || normalized == loc.display_name().replace(' ', "").to_ascii_uppercase()
        })
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Critical-slot capacity of a location.
#[must_use]
pub const fn capacity(location: Location) -> u32 {
    location.capacity()
}

/// Total critical slots on the chassis (always 78).
#[must_use]
pub const fn total_capacity() -> u32 {
    TOTAL_CRITICAL_SLOTS
}

/// Check whether `requested` more slots fit next to `currently_used`.
///
/// Negative inputs are rejected outright.
#[must_use]
pub fn can_allocate(currently_used: i64, requested: i64, capacity: i64) -> bool {
    requested >= 0
        && currently_used >= 0
        && currently_used
            .checked_add(requested)
            .is_some_and(|total| total <= capacity)
}
