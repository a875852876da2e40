//! Critical-slot distribution for multi-slot special components.
//!
//! Endo Steel structure and Ferro-Fibrous armor each need
//! `ceil(tonnage / 5)` slots spread across the chassis. Both use the same
//! distribution walk; the kind only supplies the requirement formula and
//! the set of locations it may occupy.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::location::Location;
use crate::unit::Tonnage;

/// A component that occupies many single critical slots.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum SpecialComponentKind {
    /// Endo Steel internal structure.
    EndoSteel,
    /// Ferro-Fibrous armor.
    FerroFibrous,
}

/// Locations special components may use; the head is never one of them.
const BODY_LOCATIONS: [Location; 7] = [
    Location::CenterTorso,
    Location::LeftTorso,
    Location::RightTorso,
    Location::LeftArm,
    Location::RightArm,
    Location::LeftLeg,
    Location::RightLeg,
];

/// Walk order and per-location ceilings. The ceilings leave room for the
/// engine, gyro and actuators.
pub const DISTRIBUTION_ORDER: [(Location, u32); 7] = [
    (Location::CenterTorso, 6),
    (Location::LeftTorso, 6),
    (Location::RightTorso, 6),
    (Location::LeftArm, 4),
    (Location::RightArm, 4),
    (Location::LeftLeg, 3),
    (Location::RightLeg, 3),
];

impl SpecialComponentKind {
    /// Both kinds.
    pub const ALL: [SpecialComponentKind; 2] =
        [SpecialComponentKind::EndoSteel, SpecialComponentKind::FerroFibrous];

    /// Critical slots required for a tonnage.
    #[must_use]
    pub const fn requirement(self, tonnage: u32) -> u32 {
        match self {
            Self::EndoSteel | Self::FerroFibrous => tonnage.div_ceil(5),
        }
    }

    /// Locations this component may occupy.
    #[must_use]
    pub const fn valid_locations(self) -> &'static [Location] {
        match self {
            Self::EndoSteel | Self::FerroFibrous => &BODY_LOCATIONS,
        }
    }

    /// Display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::EndoSteel => "Endo Steel",
            Self::FerroFibrous => "Ferro-Fibrous",
        }
    }
}

impl fmt::Display for SpecialComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where a special component's slots ended up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialAllocation {
    /// Component kind.
    pub kind: SpecialComponentKind,
    /// Slots the component needs.
    pub required_slots: u32,
    /// Slots placed per location.
    pub placements: BTreeMap<Location, u32>,
    /// Whether every required slot was placed.
    pub is_complete: bool,
    /// Required slots that could not be placed.
    pub remaining_slots: u32,
}

impl SpecialAllocation {
    /// Build an allocation from placements, deriving the completeness fields.
    #[must_use]
    pub fn from_placements(
        kind: SpecialComponentKind,
        required_slots: u32,
        placements: BTreeMap<Location, u32>,
    ) -> Self {
        let placed: u32 = placements.values().sum();
        let remaining_slots = required_slots.saturating_sub(placed);
        Self {
            kind,
            required_slots,
            placements,
            is_complete: remaining_slots == 0,
            remaining_slots,
        }
    }

    /// Slots placed in total.
    #[must_use]
    pub fn placed_slots(&self) -> u32 {
        self.placements.values().sum()
    }

    /// Slots placed in one location.
    #[must_use]
    pub fn slots_in(&self, location: Location) -> u32 {
        self.placements.get(&location).copied().unwrap_or(0)
    }
}

/// A problem with a special component allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpecialConflict {
    /// Not every required slot was placed.
    Incomplete {
        /// Component kind.
        kind: SpecialComponentKind,
        /// Slots still unplaced.
        remaining: u32,
    },
    /// Slots were placed in a location the component may not use.
    InvalidLocation {
        /// Component kind.
        kind: SpecialComponentKind,
        /// Offending location.
        location: Location,
        /// Slots placed there.
        slots: u32,
    },
}

/// Distributes one kind of special component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecialComponentAllocator {
    kind: SpecialComponentKind,
}

impl SpecialComponentAllocator {
    /// Allocator for a component kind.
    #[must_use]
    pub const fn new(kind: SpecialComponentKind) -> Self {
        Self { kind }
    }

    /// Component kind this allocator places.
    #[must_use]
    pub const fn kind(&self) -> SpecialComponentKind {
        self.kind
    }

    /// Slots required for a tonnage.
    #[must_use]
    pub const fn requirement(&self, tonnage: Tonnage) -> u32 {
        self.kind.requirement(tonnage.get())
    }

    /// Compute the requirement for a tonnage and distribute it.
    #[must_use]
    pub fn allocate(&self, tonnage: Tonnage) -> SpecialAllocation {
        self.distribute(self.requirement(tonnage))
    }

    /// Distribute slots using only the per-location ceilings.
    #[must_use]
    pub fn distribute(&self, required_slots: u32) -> SpecialAllocation {
        self.distribute_with_occupancy(required_slots, |_| u32::MAX)
    }

    /// Distribute slots, bounding each location by its ceiling and by the
    /// free slots `free_slots` reports for it.
    #[must_use]
    pub fn distribute_with_occupancy<F>(&self, required_slots: u32, free_slots: F) -> SpecialAllocation
    where
        F: Fn(Location) -> u32,
    {
        let valid = self.kind.valid_locations();
        let mut remaining = required_slots;
        let mut placements = BTreeMap::new();

        for (location, ceiling) in DISTRIBUTION_ORDER {
            if remaining == 0 {
                break;
            }
            if !valid.contains(&location) {
                continue;
            }
            let take = remaining.min(ceiling).min(free_slots(location));
            if take > 0 {
                placements.insert(location, take);
                remaining -= take;
            }
        }

        let allocation = SpecialAllocation::from_placements(self.kind, required_slots, placements);
        if !allocation.is_complete {
            tracing::debug!(
                kind = %self.kind,
                required = required_slots,
                remaining = allocation.remaining_slots,
                "Special component allocation incomplete"
            );
        }
        allocation
    }

    /// Report incomplete allocations and placements outside the valid set.
    #[must_use]
    pub fn detect_conflicts(&self, allocation: &SpecialAllocation) -> Vec<SpecialConflict> {
        let mut conflicts = Vec::new();
        if !allocation.is_complete || allocation.remaining_slots > 0 {
            conflicts.push(SpecialConflict::Incomplete {
                kind: self.kind,
                remaining: allocation.remaining_slots,
            });
        }
        let valid = self.kind.valid_locations();
        for (&location, &slots) in &allocation.placements {
            if slots > 0 && !valid.contains(&location) {
                conflicts.push(SpecialConflict::InvalidLocation {
                    kind: self.kind,
                    location,
                    slots,
                });
            }
        }
        conflicts
    }
}
