//! Unit state manager tests for mech_core.
//!
//! These tests drive the manager the way an editor would: add equipment,
//! place it, change the design, save and restore.

use std::sync::Arc;

use mech_core::components::{EngineType, StructureType};
use mech_core::location::Location;
use mech_core::math::tons;
use mech_core::snapshot::UnitSnapshot;
use mech_core::state::UnitStateManager;
use mech_core::validation::{ConstructionValidator, IssueCode, RuleRegistry, ValidatorConfig};
use mech_test_utils::fixtures::{autocannon_20, medium_endo_ferro, medium_laser, medium_standard, ppc};
use mech_test_utils::idempotence::verify_snapshot_round_trip;

fn editor() -> UnitStateManager {
    UnitStateManager::with_standard_rules(medium_standard()).unwrap()
}

// =============================================================================
// Equipment Pool
// =============================================================================

mod equipment_pool {
    use super::*;

    #[test]
    fn test_pool_reflects_live_allocation() {
        let mut state = editor();
        let laser = state.add_equipment(&medium_laser());
        let cannon = state.add_equipment(&ppc());
        assert_eq!(state.unallocated_equipment().len(), 2);

        state.allocate_equipment(laser, Location::LeftArm, None).unwrap();
        let pool: Vec<_> = state.unallocated_equipment().iter().map(|e| e.instance_id).collect();
        assert_eq!(pool, vec![cannon]);

        state.deallocate_equipment(laser).unwrap();
        assert_eq!(state.unallocated_equipment().len(), 2);
    }

    /// Equipment whose slots are taken by a new engine is kept, not dropped.
    #[test]
    fn test_engine_change_moves_equipment_to_pool() {
        let mut state = editor();
        let cannon = state.add_equipment(&ppc());
        state.allocate_equipment(cannon, Location::RightTorso, Some(0)).unwrap();
        assert!(state.unallocated_equipment().is_empty());

        let xl = state
            .configuration()
            .clone()
            .with_engine(EngineType::XlInnerSphere, 200);
        state.update_configuration(xl).unwrap();

        let pool = state.unallocated_equipment();
        assert_eq!(pool.len(), 1);
        assert_eq!(pool[0].instance_id, cannon);
        assert!(state.equipment(cannon).is_some());
        assert_eq!(state.slots().occupied(Location::RightTorso), 3);
    }

    #[test]
    fn test_oversized_equipment_reports_location_full() {
        let mut state = editor();
        let cannon = state.add_equipment(&autocannon_20());
        assert!(state.allocate_equipment(cannon, Location::LeftArm, None).is_err());
        state.allocate_equipment(cannon, Location::LeftTorso, None).unwrap();
        assert_eq!(state.slots().occupied(Location::LeftTorso), 10);
    }
}

// =============================================================================
// Configuration
// =============================================================================

mod configuration {
    use super::*;

    /// Changing the design never touches the stored armor allocation.
    #[test]
    fn test_update_does_not_reallocate_armor() {
        let mut state = editor();
        state.auto_allocate_armor();
        let before = state.configuration().armor.allocation.clone();

        let mut heavier = state.configuration().clone();
        heavier.armor.tonnage = tons(10);
        state.update_configuration(heavier).unwrap();
        assert_eq!(state.configuration().armor.allocation, before);

        let result = state.auto_allocate_armor();
        assert_eq!(result.total_allocated, 160);
        assert_ne!(state.configuration().armor.allocation, before);
    }

    #[test]
    fn test_structure_change_redistributes_specials() {
        let mut state = editor();
        assert!(state.special_allocations().is_empty());

        let endo = state
            .configuration()
            .clone()
            .with_structure(StructureType::EndoSteelInnerSphere);
        state.update_configuration(endo).unwrap();

        assert_eq!(state.special_allocations().len(), 1);
        assert!(state.special_allocations()[0].is_complete);
        assert!(state.slots().is_within_capacity());
    }

    #[test]
    fn test_report_follows_every_mutation() {
        let mut state = editor();
        assert!(state.validation_report().is_valid);

        let mut bad = state.configuration().clone();
        bad.engine.rating = 203;
        state.update_configuration(bad).unwrap();
        assert!(state.validation_report().has_code(IssueCode::EngineRatingNotMultipleOf5));
    }

    #[test]
    fn test_shared_validator_configuration() {
        let mut config = ValidatorConfig::default();
        config.disabled_rules.insert("movement.engine".to_string());
        let validator = Arc::new(ConstructionValidator::new(RuleRegistry::with_config(&config)));

        let mut design = medium_standard();
        design.engine.rating = 250;
        let first = UnitStateManager::new(design.clone(), Arc::clone(&validator)).unwrap();
        let second = UnitStateManager::new(design, validator).unwrap();
        assert!(!first.validation_report().has_code(IssueCode::EngineRatingMismatch));
        assert!(Arc::ptr_eq(first.validator(), second.validator()));
    }
}

// =============================================================================
// Snapshots
// =============================================================================

mod snapshots {
    use super::*;

    fn furnished() -> UnitStateManager {
        let mut state = UnitStateManager::with_standard_rules(medium_endo_ferro()).unwrap();
        state.auto_allocate_armor();
        let laser = state.add_equipment(&medium_laser());
        let cannon = state.add_equipment(&ppc());
        state.add_equipment(&medium_laser());
        state.allocate_equipment(laser, Location::LeftArm, None).unwrap();
        state.allocate_equipment(cannon, Location::RightArm, None).unwrap();
        state
    }

    #[test]
    fn test_round_trip_in_both_encodings() {
        assert!(verify_snapshot_round_trip(&furnished()));
    }

    #[test]
    fn test_restore_replaces_state() {
        let source = furnished();
        let snapshot = source.serialize_complete_state();

        let mut target = editor();
        target.add_equipment(&autocannon_20());
        target.deserialize_complete_state(snapshot.clone()).unwrap();

        assert_eq!(target.configuration(), source.configuration());
        assert_eq!(target.all_equipment().count(), 3);
        assert_eq!(target.serialize_complete_state(), snapshot);
    }

    #[test]
    fn test_snapshot_is_plain_json() {
        let json = furnished().serialize_complete_state().to_json_pretty().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["version"], 1);
        assert_eq!(value["allocated_equipment"].as_array().unwrap().len(), 2);
        assert_eq!(value["unallocated_equipment"].as_array().unwrap().len(), 1);
        assert!(UnitSnapshot::from_json(&json).is_ok());
    }
}
