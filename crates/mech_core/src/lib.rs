//! # Mech Core
//!
//! Deterministic construction engine for BattleMech designs.
//!
//! This crate contains **only** construction logic:
//! - No rendering
//! - No IO
//! - No randomness
//! - No floating-point tonnage math (uses fixed-point)
//!
//! Allocation and validation are pure functions of the configuration, so
//! running them twice on the same design yields the same result.
//!
//! ## Crate Structure
//!
//! - [`location`] - Chassis locations and slot capacities
//! - [`slots`] - Per-location critical slot contents
//! - [`special`] - Endo Steel / Ferro-Fibrous slot distribution
//! - [`armor`] - Automatic armor allocation
//! - [`validation`] - Construction rules, registry and reports
//! - [`tech`] - Tech base compatibility
//! - [`state`] - Unit state manager
//! - [`snapshot`] - Persistence snapshots
//! - [`math`] - Fixed-point tonnage utilities

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod armor;
pub mod components;
pub mod equipment;
pub mod error;
pub mod location;
pub mod math;
pub mod slots;
pub mod snapshot;
pub mod special;
pub mod state;
pub mod structure;
pub mod system;
pub mod tech;
pub mod unit;
pub mod validation;
pub mod weight;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::armor::{ArmorAllocationResult, ArmorAllocator};
    pub use crate::components::{
        ArmorType, CockpitType, ComponentCategory, ComponentVariant, EngineType, GyroType,
        HeatSinkType, StructureType,
    };
    pub use crate::equipment::{
        EquipmentAllocation, EquipmentCatalog, EquipmentCategory, EquipmentRecord, InstanceId,
        SlotAllocationError,
    };
    pub use crate::error::{ConstructionError, Result};
    pub use crate::location::{Location, TOTAL_CRITICAL_SLOTS};
    pub use crate::math::Fixed;
    pub use crate::slots::{CriticalSlotAllocation, SlotContent};
    pub use crate::snapshot::{UnitSnapshot, SNAPSHOT_VERSION};
    pub use crate::special::{SpecialAllocation, SpecialComponentAllocator, SpecialComponentKind};
    pub use crate::state::UnitStateManager;
    pub use crate::tech::{ComponentSelections, RulesLevel, TechBase};
    pub use crate::unit::{ArmorAllocation, LocationArmor, Tonnage, UnitConfiguration};
    pub use crate::validation::{
        ConstructionValidator, IssueCode, RuleRegistry, Severity, ValidationContext,
        ValidationIssue, ValidationReport, ValidatorConfig,
    };
}
