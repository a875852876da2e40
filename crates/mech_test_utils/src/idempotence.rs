//! Idempotence testing utilities.
//!
//! Provides a harness for verifying that allocation and validation
//! produce identical results given identical inputs.
//!
//! # Testing Strategy
//!
//! Allocation and validation must be pure functions of the configuration.
//! Sources of drift include:
//!
//! - **Floating-point math**: tonnages use [`mech_core::math::Fixed`].
//!
//! - **HashMap iteration order**: every map in the engine is a `BTreeMap`,
//!   so reports and slot maps come out in a stable order.
//!
//! - **Timestamps**: reports carry `checked_at`; compare findings with
//!   [`ValidationReport::same_findings`] or pin the time with
//!   [`ConstructionValidator::validate_at`].
//!
//! - **Stale derived state**: the state manager re-derives everything on
//!   each mutation, so a snapshot round trip must reproduce it exactly.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use mech_core::armor::ArmorAllocator;
use mech_core::snapshot::UnitSnapshot;
use mech_core::state::UnitStateManager;
use mech_core::unit::{Tonnage, UnitConfiguration};
use mech_core::validation::{ConstructionValidator, ValidationContext, ValidationReport};

/// Result of an idempotence test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdempotenceResult {
    /// Whether all runs produced identical results.
    pub is_idempotent: bool,
    /// Hashes from each run.
    pub hashes: Vec<u64>,
}

impl IdempotenceResult {
    /// Get all unique hashes (should be 1 for an idempotent operation).
    #[must_use]
    pub fn unique_hashes(&self) -> Vec<u64> {
        let mut unique: Vec<u64> = self.hashes.clone();
        unique.sort_unstable();
        unique.dedup();
        unique
    }

    /// Assert that every run matched, with a detailed error message.
    ///
    /// # Panics
    ///
    /// Panics if the runs produced different hashes.
    pub fn assert_idempotent(&self) {
        if !self.is_idempotent {
            let unique = self.unique_hashes();
            panic!(
                "Operation is not idempotent!\n\
                 Runs: {}\n\
                 Unique hashes: {} (expected 1)\n\
                 All hashes: {:?}",
                self.hashes.len(),
                unique.len(),
                self.hashes
            );
        }
    }
}

/// Run an operation several times on fresh input and compare the results.
///
/// # Arguments
///
/// * `runs` - Number of times to run the operation
/// * `setup` - Function to create the input
/// * `run` - The operation under test
/// * `hash` - Function to compute a hash of the output
///
/// # Example
///
/// ```ignore
/// use mech_test_utils::idempotence::verify_idempotent;
///
/// let result = verify_idempotent(
///     3,
///     || medium_standard(),
///     |config| ArmorAllocator::new().allocate(128, config.tonnage),
///     |result| compute_hash(&result.allocation),
/// );
/// result.assert_idempotent();
/// ```
pub fn verify_idempotent<S, O, Setup, Run, HashFn>(
    runs: usize,
    setup: Setup,
    run: Run,
    hash: HashFn,
) -> IdempotenceResult
where
    Setup: Fn() -> S,
    Run: Fn(&S) -> O,
    HashFn: Fn(&O) -> u64,
{
    let hashes: Vec<u64> = (0..runs)
        .map(|_| {
            let input = setup();
            hash(&run(&input))
        })
        .collect();

    IdempotenceResult {
        is_idempotent: hashes.windows(2).all(|w| w[0] == w[1]),
        hashes,
    }
}

/// Fixed timestamp for reproducible reports.
#[must_use]
pub fn fixed_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(3025, 1, 1, 0, 0, 0)
        .single()
        .expect("fixed timestamp is valid")
}

/// Hash of a report's findings, ignoring the timestamp.
///
/// # Panics
///
/// Panics if the report cannot be encoded as JSON.
#[must_use]
pub fn report_hash(report: &ValidationReport) -> u64 {
    let json = serde_json::to_string(&report.results).expect("report encodes as JSON");
    compute_hash(&json)
}

/// Validate a configuration `runs` times and compare findings.
#[must_use]
pub fn verify_validation_idempotent(config: &UnitConfiguration, runs: usize) -> IdempotenceResult {
    let validator = ConstructionValidator::standard();
    verify_idempotent(
        runs,
        || ValidationContext::for_unit(config, &[], Vec::new()),
        |context| validator.validate_at(context, fixed_timestamp()),
        report_hash,
    )
}

/// Allocate armor `runs` times and compare allocations.
#[must_use]
pub fn verify_armor_idempotent(points: u32, tonnage: Tonnage, runs: usize) -> IdempotenceResult {
    verify_idempotent(
        runs,
        ArmorAllocator::new,
        |allocator| allocator.allocate(points, tonnage),
        compute_hash,
    )
}

/// Check that a manager's state survives JSON and bincode round trips.
///
/// Returns `false` if encoding fails or any restored state differs.
#[must_use]
pub fn verify_snapshot_round_trip(manager: &UnitStateManager) -> bool {
    let snapshot = manager.serialize_complete_state();

    let via_json = snapshot
        .to_json()
        .and_then(|json| UnitSnapshot::from_json(&json));
    let via_bytes = snapshot
        .to_bytes()
        .and_then(|bytes| UnitSnapshot::from_bytes(&bytes));

    [via_json, via_bytes].into_iter().all(|decoded| {
        let Ok(decoded) = decoded else {
            return false;
        };
        match UnitStateManager::from_snapshot(decoded, Arc::clone(manager.validator())) {
            Ok(restored) => {
                restored.serialize_complete_state() == snapshot
                    && restored
                        .validation_report()
                        .same_findings(manager.validation_report())
            }
            Err(_) => false,
        }
    })
}

/// Compute a simple hash for any hashable value.
pub fn compute_hash<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Proptest strategies for construction testing.
///
/// These strategies generate random but reproducible unit designs for
/// property-based testing of the allocators and the validator.
pub mod strategies {
    use mech_core::components::{
        ArmorType, ComponentVariant, EngineType, HeatSinkType, StructureType,
    };
    use mech_core::math::{half_tons, Fixed};
    use mech_core::structure::max_armor;
    use mech_core::tech::TechBase;
    use mech_core::unit::{Tonnage, UnitConfiguration};
    use proptest::prelude::*;

    /// Generate a legal tonnage (10-100 in steps of 5).
    pub fn arb_tonnage() -> impl Strategy<Value = Tonnage> {
        (2u32..=20).prop_filter_map("legal tonnage", |n| Tonnage::new(n * 5).ok())
    }

    /// Generate an armor point budget, sometimes above the chassis maximum.
    pub fn arb_armor_points(tonnage: Tonnage) -> impl Strategy<Value = u32> {
        0u32..=max_armor(tonnage) + 40
    }

    /// Generate a tonnage together with an armor point budget for it.
    pub fn arb_armor_request() -> impl Strategy<Value = (Tonnage, u32)> {
        arb_tonnage().prop_flat_map(|t| (Just(t), arb_armor_points(t)))
    }

    /// Generate an armor tonnage in half-ton steps, 0 to 20 tons.
    pub fn arb_armor_tonnage() -> impl Strategy<Value = Fixed> {
        (0i32..=40).prop_map(half_tons)
    }

    /// Pick any variant of a component category.
    pub fn arb_variant<T: ComponentVariant>() -> impl Strategy<Value = T> {
        proptest::sample::select(T::variants())
    }

    /// Generate a tech base.
    pub fn arb_tech_base() -> impl Strategy<Value = TechBase> {
        prop_oneof![
            Just(TechBase::InnerSphere),
            Just(TechBase::Clan),
            Just(TechBase::Mixed),
        ]
    }

    /// Generate a complete design with arbitrary component choices.
    ///
    /// Designs are not necessarily legal; they exercise every rule.
    pub fn arb_configuration() -> impl Strategy<Value = UnitConfiguration> {
        (
            arb_tonnage(),
            1u32..=8,
            arb_tech_base(),
            arb_variant::<EngineType>(),
            arb_variant::<StructureType>(),
            arb_variant::<ArmorType>(),
            arb_variant::<HeatSinkType>(),
            0u32..=20,
            arb_armor_tonnage(),
        )
            .prop_map(
                |(tonnage, walk, tech_base, engine, structure, armor, sinks, count, armor_tons)| {
                    let rating = tonnage.get() * walk;
                    UnitConfiguration::new("Arbitrary", "ARB-1", tonnage)
                        .with_tech_base(tech_base)
                        .with_walk(walk)
                        .with_engine(engine, rating)
                        .with_structure(structure)
                        .with_heat_sinks(sinks, count)
                        .with_armor(armor, armor_tons)
                },
            )
    }
}
