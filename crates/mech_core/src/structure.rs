//! Internal structure points and the armor caps derived from them.

use crate::location::Location;
use crate::unit::Tonnage;

/// Maximum armor on the head, regardless of tonnage.
pub const HEAD_ARMOR_MAX: u32 = 9;

/// Internal structure points of the head, for every tonnage.
pub const HEAD_STRUCTURE: u32 = 3;

/// Internal structure points per location class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StructurePoints {
    /// Center torso.
    pub center_torso: u32,
    /// Each side torso.
    pub side_torso: u32,
    /// Each arm.
    pub arm: u32,
    /// Each leg.
    pub leg: u32,
}

/// (center torso, side torso, arm, leg) for 10..=100 tons in 5-ton steps.
const STRUCTURE_TABLE: [(u32, u32, u32, u32); 19] = [
    (4, 3, 1, 2),
    (5, 4, 2, 3),
    (6, 5, 3, 4),
    (8, 6, 4, 6),
    (10, 7, 5, 7),
    (11, 8, 6, 8),
    (12, 10, 6, 10),
    (14, 11, 7, 11),
    (16, 12, 8, 12),
    (18, 13, 9, 13),
    (20, 14, 10, 14),
    (21, 15, 10, 15),
    (22, 15, 11, 15),
    (23, 16, 12, 16),
    (25, 17, 13, 17),
    (27, 18, 14, 18),
    (29, 19, 15, 19),
    (30, 20, 16, 20),
    (31, 21, 17, 21),
];

impl StructurePoints {
    /// Structure points for a tonnage.
    #[must_use]
    pub const fn for_tonnage(tonnage: Tonnage) -> Self {
        let (center_torso, side_torso, arm, leg) = STRUCTURE_TABLE[tonnage.table_index()];
        Self {
            center_torso,
            side_torso,
            arm,
            leg,
        }
    }

    /// Structure points of one location.
    #[must_use]
    pub const fn at(&self, location: Location) -> u32 {
        match location {
            Location::Head => HEAD_STRUCTURE,
            Location::CenterTorso => self.center_torso,
            Location::LeftTorso | Location::RightTorso => self.side_torso,
            Location::LeftArm | Location::RightArm => self.arm,
            Location::LeftLeg | Location::RightLeg => self.leg,
        }
    }

    /// Total structure points on the chassis.
    #[must_use]
    pub fn total(&self) -> u32 {
        Location::ALL.iter().map(|&loc| self.at(loc)).sum()
    }
}

/// Maximum armor (front + rear) on a location.
#[must_use]
pub const fn max_armor_for(location: Location, tonnage: Tonnage) -> u32 {
    match location {
        Location::Head => HEAD_ARMOR_MAX,
        _ => 2 * StructurePoints::for_tonnage(tonnage).at(location),
    }
}

/// Maximum armor on the whole chassis.
#[must_use]
pub fn max_armor(tonnage: Tonnage) -> u32 {
    Location::ALL
        .iter()
        .map(|&loc| max_armor_for(loc, tonnage))
        .sum()
}
