//! Construction-rule validation.
//!
//! A [`ConstructionValidator`] runs every rule in its [`RuleRegistry`] over
//! a [`ValidationContext`] and aggregates the findings into a
//! [`ValidationReport`]. Rules never short-circuit: every registered rule
//! runs on every call.
//!
//! [`integrity`] holds the separate check-and-repair pass for stored data.

mod context;
pub mod integrity;
mod issue;
mod registry;
mod rules;

pub use context::{
    ArmorSection, ComponentEra, ComponentTech, EngineSection, EraSection, HeatSinkSection,
    MovementSection, TechSection, ValidationContext,
};
pub use issue::{IssueCode, RuleCategory, RuleResult, Severity, ValidationIssue};
pub use registry::{ConstructionValidator, RuleRegistry, ValidationReport, ValidatorConfig};
pub use rules::{
    armor_overflows, ArmorSymmetryRule, ArmorTonnageRule, ConstructionRule, CriticalSlotsRule,
    EngineRatingRule, EraAvailabilityRule, HeatSinkMinimumRule, LocationArmorRule, MovementRule,
    SpecialComponentRule, TechBaseRule, TotalWeightRule, WeightRoundingRule,
};
