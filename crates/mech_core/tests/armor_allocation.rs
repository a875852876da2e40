//! Armor allocation tests for mech_core.
//!
//! The literal scenarios pin the distribution policy; the property tests
//! cover every tonnage and budget.

use mech_core::armor::ArmorAllocator;
use mech_core::location::Location;
use mech_core::structure::{max_armor, max_armor_for, HEAD_ARMOR_MAX};
use mech_core::unit::{LocationArmor, Tonnage};
use mech_test_utils::fixtures::tonnage;
use mech_test_utils::idempotence::strategies::arb_armor_request;
use mech_test_utils::idempotence::verify_armor_idempotent;
use mech_test_utils::proptest::prelude::*;

// =============================================================================
// Fixture Scenarios
// =============================================================================

mod scenarios {
    use super::*;

    /// 32 points on a 50-ton chassis: low armor keeps side torso rears empty.
    #[test]
    fn test_32_points_on_50_tons() {
        let result = ArmorAllocator::new().allocate(32, tonnage(50));
        let a = &result.allocation;

        assert_eq!(a.get(Location::Head), LocationArmor::front(8));
        assert_eq!(a.get(Location::CenterTorso), LocationArmor::split(3, 1));
        assert_eq!(a.get(Location::LeftTorso), LocationArmor::split(5, 0));
        assert_eq!(a.get(Location::RightTorso), LocationArmor::split(5, 0));
        assert_eq!(a.get(Location::LeftArm), LocationArmor::front(2));
        assert_eq!(a.get(Location::RightArm), LocationArmor::front(2));
        assert_eq!(a.get(Location::LeftLeg), LocationArmor::front(3));
        assert_eq!(a.get(Location::RightLeg), LocationArmor::front(3));
        assert_eq!(result.total_allocated, 32);
        assert_eq!(result.unallocated, 0);
    }

    /// Maximum armor fills every location to its cap with a 75/25 torso split.
    #[test]
    fn test_169_points_on_50_tons() {
        let result = ArmorAllocator::new().allocate(169, tonnage(50));
        let a = &result.allocation;

        assert_eq!(a.get(Location::Head), LocationArmor::front(9));
        assert_eq!(a.get(Location::CenterTorso), LocationArmor::split(24, 8));
        assert_eq!(a.get(Location::LeftTorso), LocationArmor::split(18, 6));
        assert_eq!(a.get(Location::RightTorso), LocationArmor::split(18, 6));
        assert_eq!(a.get(Location::LeftArm), LocationArmor::front(16));
        assert_eq!(a.get(Location::RightArm), LocationArmor::front(16));
        assert_eq!(a.get(Location::LeftLeg), LocationArmor::front(24));
        assert_eq!(a.get(Location::RightLeg), LocationArmor::front(24));
        assert_eq!(result.total_allocated, 169);
        assert_eq!(result.unallocated, 0);
    }

    /// Requests above the chassis maximum are capped; the excess is reported.
    #[test]
    fn test_200_points_on_50_tons_is_capped() {
        let result = ArmorAllocator::new().allocate(200, tonnage(50));
        assert_eq!(result.total_allocated, 169);
        assert_eq!(result.unallocated, 31);
        assert_eq!(
            result.allocation,
            ArmorAllocator::new().allocate(169, tonnage(50)).allocation
        );
    }

    /// Allocation is a pure function of its inputs.
    #[test]
    fn test_allocation_is_idempotent() {
        for points in [0, 1, 32, 128, 169, 200] {
            verify_armor_idempotent(points, tonnage(50), 3).assert_idempotent();
        }
    }
}

// =============================================================================
// Properties
// =============================================================================

fn assert_invariants(points: u32, tonnage: Tonnage) {
    let result = ArmorAllocator::new().allocate(points, tonnage);
    let a = &result.allocation;

    assert_eq!(result.total_allocated + result.unallocated, points);
    assert_eq!(result.total_allocated, points.min(max_armor(tonnage)));
    assert!(a.is_symmetric(), "asymmetric for {points} on {tonnage}");
    assert!(a.get(Location::Head).front <= HEAD_ARMOR_MAX);
    for location in Location::ALL {
        let armor = a.get(location);
        assert!(armor.total() <= max_armor_for(location, tonnage));
        if location.has_rear() {
            assert!(armor.front >= armor.rear, "{location} rear exceeds front");
        } else {
            assert_eq!(armor.rear, 0);
        }
    }
}

proptest! {
    #[test]
    fn test_allocation_invariants((t, points) in arb_armor_request()) {
        assert_invariants(points, t);
    }

    #[test]
    fn test_head_never_exceeds_cap(points in 0u32..2000) {
        let result = ArmorAllocator::new().allocate(points, tonnage(100));
        prop_assert!(result.allocation.get(Location::Head).front <= HEAD_ARMOR_MAX);
    }
}

/// Exhaustive sweep over every tonnage and every budget up to the maximum.
#[test]
fn test_every_tonnage_and_budget() {
    for tons in (10..=100).step_by(5) {
        let t = tonnage(tons);
        for points in 0..=max_armor(t) + 5 {
            assert_invariants(points, t);
        }
    }
}
