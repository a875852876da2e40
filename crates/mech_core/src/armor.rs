//! Automatic armor distribution.
//!
//! The allocator spreads a point budget over the chassis so that:
//! - left/right pairs always match,
//! - no location exceeds its cap (head 9, others 2 × structure),
//! - every point up to the chassis maximum is placed.
//!
//! The policy:
//! 1. Cap the budget at the chassis maximum; the excess is `unallocated`.
//! 2. The head takes a quarter of the budget, at most 9 points.
//! 3. The rest is spread over the body *facets* (torso fronts and rears,
//!    arms, legs) in proportion to each facet's cap, rounding down. A torso's
//!    rear cap is a quarter of the location maximum, which yields the
//!    75/25 front/rear split and keeps rear armor at zero on thinly armored
//!    designs.
//! 4. Points lost to rounding go to symmetric pairs two at a time (side
//!    torso fronts, legs, arms, side torso rears), then one at a time to the
//!    center torso and head.
//! 5. A single point that only a pair could absorb is placed by moving one
//!    point off a single location and adding one to each side of the pair.

use serde::{Deserialize, Serialize};

use crate::components::ArmorType;
use crate::location::Location;
use crate::math::Fixed;
use crate::structure::{max_armor, max_armor_for, HEAD_ARMOR_MAX};
use crate::unit::{ArmorAllocation, LocationArmor, Tonnage};

/// The head receives `budget / HEAD_SHARE_DIVISOR` points, up to its cap.
const HEAD_SHARE_DIVISOR: u32 = 4;

/// Rear facets get `location max / REAR_SHARE_DIVISOR` of a torso's cap.
const REAR_SHARE_DIVISOR: u32 = 4;

/// Output of an allocation run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArmorAllocationResult {
    /// Points per location.
    pub allocation: ArmorAllocation,
    /// Points placed.
    pub total_allocated: u32,
    /// Requested points above the chassis maximum.
    pub unallocated: u32,
}

/// One armor facet the allocator fills.
#[derive(Debug, Clone, Copy)]
struct Facet {
    location: Location,
    rear: bool,
    cap: u32,
    points: u32,
}

impl Facet {
    const fn room(&self) -> u32 {
        self.cap - self.points
    }
}

// Facet indices.
const HD: usize = 0;
const CT_FRONT: usize = 1;
const CT_REAR: usize = 2;
const LT_FRONT: usize = 3;
const LT_REAR: usize = 4;
const RT_FRONT: usize = 5;
const RT_REAR: usize = 6;
const LA: usize = 7;
const RA: usize = 8;
const LL: usize = 9;
const RL: usize = 10;

/// Pairs that receive rounding leftovers, in priority order.
const PAIR_PRIORITY: [(usize, usize); 4] = [
    (LT_FRONT, RT_FRONT),
    (LL, RL),
    (LA, RA),
    (LT_REAR, RT_REAR),
];

/// Single facets that receive odd leftover points, in priority order.
const SINGLE_PRIORITY: [usize; 3] = [CT_FRONT, CT_REAR, HD];

/// Distributes armor points across the chassis.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArmorAllocator;

impl ArmorAllocator {
    /// Create an allocator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Allocate `total_points` on a unit of the given tonnage.
    #[must_use]
    pub fn allocate(&self, total_points: u32, tonnage: Tonnage) -> ArmorAllocationResult {
        let maximum = max_armor(tonnage);
        let budget = total_points.min(maximum);
        let unallocated = total_points - budget;

        let mut facets = build_facets(tonnage);

        facets[HD].points = (budget / HEAD_SHARE_DIVISOR).min(HEAD_ARMOR_MAX);
        let body_budget = budget - facets[HD].points;
        let body_capacity = maximum - HEAD_ARMOR_MAX;

        if body_capacity > 0 {
            for facet in facets.iter_mut().skip(1) {
                let share = u64::from(body_budget) * u64::from(facet.cap) / u64::from(body_capacity);
                facet.points = (share as u32).min(facet.cap);
            }
        }

        let placed: u32 = facets.iter().map(|f| f.points).sum();
        let leftover = distribute_leftover(&mut facets, budget - placed);

        let allocation = to_allocation(&facets);
        let total_allocated = allocation.total();

        #[cfg(feature = "debug-validation")]
        {
            debug_assert!(allocation.is_symmetric(), "armor allocation lost symmetry");
            debug_assert_eq!(leftover, 0, "armor allocation left points unplaced");
        }

        if leftover > 0 {
            tracing::debug!(
                leftover,
                tonnage = tonnage.get(),
                "Armor allocation could not place every point"
            );
        }

        ArmorAllocationResult {
            allocation,
            total_allocated,
            unallocated: unallocated + leftover,
        }
    }

    /// Allocate the points bought by an armor tonnage of a given type.
    #[must_use]
    pub fn allocate_tonnage(
        &self,
        armor_tons: Fixed,
        armor_type: ArmorType,
        tonnage: Tonnage,
    ) -> ArmorAllocationResult {
        let points = (armor_tons * Fixed::from_num(armor_type.points_per_ton()))
            .floor()
            .to_num::<i64>()
            .max(0) as u32;
        self.allocate(points, tonnage)
    }
}

fn build_facets(tonnage: Tonnage) -> [Facet; 11] {
    let facet = |location: Location, rear: bool| {
        let location_max = max_armor_for(location, tonnage);
        let cap = match (location.has_rear(), rear) {
            (true, true) => location_max / REAR_SHARE_DIVISOR,
            (true, false) => location_max - location_max / REAR_SHARE_DIVISOR,
            (false, _) => location_max,
        };
        Facet {
            location,
            rear,
            cap,
            points: 0,
        }
    };

    [
        facet(Location::Head, false),
        facet(Location::CenterTorso, false),
        facet(Location::CenterTorso, true),
        facet(Location::LeftTorso, false),
        facet(Location::LeftTorso, true),
        facet(Location::RightTorso, false),
        facet(Location::RightTorso, true),
        facet(Location::LeftArm, false),
        facet(Location::RightArm, false),
        facet(Location::LeftLeg, false),
        facet(Location::RightLeg, false),
    ]
}

/// Place rounding leftovers; returns the points that could not be placed.
fn distribute_leftover(facets: &mut [Facet; 11], mut leftover: u32) -> u32 {
    while leftover > 0 {
        let before = leftover;

        for (left, right) in PAIR_PRIORITY {
            while leftover >= 2 && facets[left].room() > 0 && facets[right].room() > 0 {
                facets[left].points += 1;
                facets[right].points += 1;
                leftover -= 2;
            }
        }

        for single in SINGLE_PRIORITY {
            while leftover >= 1 && facets[single].room() > 0 {
                facets[single].points += 1;
                leftover -= 1;
            }
        }

        if leftover == 1 {
            let donor = SINGLE_PRIORITY
                .into_iter()
                .find(|&i| facets[i].points > 0);
            let pair = PAIR_PRIORITY
                .into_iter()
                .find(|&(l, r)| facets[l].room() > 0 && facets[r].room() > 0);
            if let (Some(donor), Some((left, right))) = (donor, pair) {
                facets[donor].points -= 1;
                facets[left].points += 1;
                facets[right].points += 1;
                leftover = 0;
            }
        }

        if leftover == before {
            break;
        }
    }
    leftover
}

fn to_allocation(facets: &[Facet; 11]) -> ArmorAllocation {
    let mut allocation = ArmorAllocation::new();
    for facet in facets {
        let mut armor = allocation.get(facet.location);
        if facet.rear {
            armor.rear = facet.points;
        } else {
            armor.front = facet.points;
        }
        allocation.set(facet.location, LocationArmor::split(armor.front, armor.rear));
    }
    allocation
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(tons: u32) -> Tonnage {
        Tonnage::new(tons).unwrap()
    }

    #[test]
    fn test_zero_points() {
        let result = ArmorAllocator::new().allocate(0, t(50));
        assert_eq!(result.total_allocated, 0);
        assert_eq!(result.unallocated, 0);
    }

    #[test]
    fn test_single_point_goes_to_center_torso() {
        let result = ArmorAllocator::new().allocate(1, t(50));
        assert_eq!(result.allocation.get(Location::CenterTorso).front, 1);
        assert_eq!(result.total_allocated, 1);
    }

    #[test]
    fn test_two_points_stay_symmetric() {
        let result = ArmorAllocator::new().allocate(2, t(50));
        assert_eq!(result.allocation.get(Location::LeftTorso).front, 1);
        assert_eq!(result.allocation.get(Location::RightTorso).front, 1);
        assert!(result.allocation.is_symmetric());
    }

    #[test]
    fn test_low_armor_keeps_rear_empty() {
        let result = ArmorAllocator::new().allocate(12, t(50));
        for location in [Location::CenterTorso, Location::LeftTorso, Location::RightTorso] {
            assert_eq!(result.allocation.get(location).rear, 0, "{location}");
        }
        assert_eq!(result.total_allocated, 12);
    }

    #[test]
    fn test_allocate_tonnage() {
        // 8 tons of standard armor = 128 points
        let result = ArmorAllocator::new().allocate_tonnage(
            Fixed::from_num(8),
            ArmorType::Standard,
            t(50),
        );
        assert_eq!(result.total_allocated, 128);
        assert_eq!(result.unallocated, 0);
    }

    #[test]
    fn test_every_budget_is_conserved_for_light_mech() {
        let tonnage = t(20);
        let maximum = max_armor(tonnage);
        for points in 0..=maximum + 10 {
            let result = ArmorAllocator::new().allocate(points, tonnage);
            assert_eq!(result.total_allocated + result.unallocated, points);
            assert_eq!(result.total_allocated, points.min(maximum));
            assert!(result.allocation.is_symmetric());
            for location in Location::ALL {
                assert!(result.allocation.get(location).total() <= max_armor_for(location, tonnage));
            }
        }
    }
}
