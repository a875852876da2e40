//! Special component distribution and slot capacity tests for mech_core.

use std::collections::BTreeMap;

use mech_core::location::{Location, TOTAL_CRITICAL_SLOTS};
use mech_core::special::{SpecialComponentAllocator, SpecialComponentKind, SpecialConflict};
use mech_core::state::UnitStateManager;
use mech_core::system::system_layout;
use mech_test_utils::fixtures::{medium_endo_ferro, medium_laser, ppc, tonnage};
use mech_test_utils::idempotence::strategies::{arb_configuration, arb_tonnage};
use mech_test_utils::proptest::prelude::*;

// =============================================================================
// Distribution
// =============================================================================

#[test]
fn test_requirement_is_ceiling_of_tonnage_over_five() {
    let endo = SpecialComponentAllocator::new(SpecialComponentKind::EndoSteel);
    assert_eq!(endo.requirement(tonnage(20)), 4);
    assert_eq!(endo.requirement(tonnage(55)), 11);
    assert_eq!(endo.requirement(tonnage(100)), 20);
}

#[test]
fn test_walk_order_and_ceilings() {
    let allocation = SpecialComponentAllocator::new(SpecialComponentKind::FerroFibrous).distribute(30);
    let expected: BTreeMap<Location, u32> = [
        (Location::CenterTorso, 6),
        (Location::LeftTorso, 6),
        (Location::RightTorso, 6),
        (Location::LeftArm, 4),
        (Location::RightArm, 4),
        (Location::LeftLeg, 3),
        (Location::RightLeg, 1),
    ]
    .into_iter()
    .collect();
    assert_eq!(allocation.placements, expected);
    assert!(allocation.is_complete);
}

#[test]
fn test_shortfall_is_reported_not_fixed() {
    let allocator = SpecialComponentAllocator::new(SpecialComponentKind::EndoSteel);
    let allocation = allocator.distribute(40);
    assert!(!allocation.is_complete);
    assert_eq!(allocation.remaining_slots, 8);
    assert_eq!(
        allocator.detect_conflicts(&allocation),
        vec![SpecialConflict::Incomplete {
            kind: SpecialComponentKind::EndoSteel,
            remaining: 8,
        }]
    );
}

#[test]
fn test_both_kinds_behave_identically() {
    for required in 0..=40 {
        let endo = SpecialComponentAllocator::new(SpecialComponentKind::EndoSteel).distribute(required);
        let ferro = SpecialComponentAllocator::new(SpecialComponentKind::FerroFibrous).distribute(required);
        assert_eq!(endo.placements, ferro.placements);
        assert_eq!(endo.remaining_slots, ferro.remaining_slots);
    }
}

#[test]
fn test_head_is_never_used() {
    let allocation = SpecialComponentAllocator::new(SpecialComponentKind::EndoSteel).distribute(100);
    assert_eq!(allocation.slots_in(Location::Head), 0);
}

#[test]
fn test_both_kinds_tracked_separately_on_one_unit() {
    let state = UnitStateManager::with_standard_rules(medium_endo_ferro()).unwrap();
    let kinds: Vec<_> = state.special_allocations().iter().map(|a| a.kind).collect();
    assert_eq!(kinds, vec![SpecialComponentKind::EndoSteel, SpecialComponentKind::FerroFibrous]);
    for allocation in state.special_allocations() {
        assert_eq!(allocation.required_slots, 10);
        assert!(allocation.is_complete);
    }
}

// =============================================================================
// Capacity
// =============================================================================

fn assert_within_capacity(state: &UnitStateManager) {
    let slots = state.slots();
    for location in Location::ALL {
        assert!(slots.occupied(location) <= location.capacity(), "{location}");
    }
    assert!(slots.total_occupied() <= TOTAL_CRITICAL_SLOTS);
    assert!(slots.is_within_capacity());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Slot maps never exceed location or chassis capacity.
    #[test]
    fn test_capacity_invariant(config in arb_configuration(), placements in prop::collection::vec(0usize..8, 0..12)) {
        let Ok(mut state) = UnitStateManager::with_standard_rules(config) else {
            return Ok(());
        };
        for (i, location_index) in placements.into_iter().enumerate() {
            let record = if i % 3 == 0 { ppc() } else { medium_laser() };
            let id = state.add_equipment(&record);
            let _ = state.allocate_equipment(id, Location::ALL[location_index], None);
        }
        assert_within_capacity(&state);
        for allocation in state.special_allocations() {
            prop_assert_eq!(
                allocation.placed_slots() + allocation.remaining_slots,
                allocation.required_slots
            );
        }
    }

    /// System layouts alone always fit.
    #[test]
    fn test_system_layout_fits(config in arb_configuration()) {
        prop_assert!(system_layout(&config).is_within_capacity());
    }

    #[test]
    fn test_requirement_matches_formula(t in arb_tonnage()) {
        let allocator = SpecialComponentAllocator::new(SpecialComponentKind::EndoSteel);
        prop_assert_eq!(allocator.requirement(t), t.get().div_ceil(5));
    }
}
