//! The standard construction rules.
//!
//! Each rule is a pure function of the [`ValidationContext`]. Rules never
//! read each other's results, so they can run in any order.

use std::fmt;

use crate::location::Location;
use crate::math::{format_tons, is_half_ton_multiple, round_up_to_half_ton, Fixed};
use crate::special::{SpecialComponentAllocator, SpecialConflict};
use crate::structure::{max_armor, max_armor_for};
use crate::tech::is_compatible;
use crate::unit::{ArmorAllocation, Tonnage};
use crate::weight::{ENGINE_RATING_STEP, MAX_ENGINE_RATING, MIN_ENGINE_RATING};

use super::context::ValidationContext;
use super::issue::{IssueCode, RuleCategory, RuleResult, ValidationIssue};

/// A single construction rule.
pub trait ConstructionRule: fmt::Debug + Send + Sync {
    /// Stable rule identifier.
    fn id(&self) -> &'static str;

    /// What the rule checks.
    fn category(&self) -> RuleCategory;

    /// Display priority; lower runs and reports first.
    fn priority(&self) -> u32;

    /// Check the context.
    fn validate(&self, context: &ValidationContext) -> RuleResult;
}

fn result(rule: &dyn ConstructionRule, issues: Vec<ValidationIssue>) -> RuleResult {
    RuleResult::from_issues(rule.id(), rule.category(), rule.priority(), issues)
}

// ============================================================================
// Weight
// ============================================================================

/// Total weight must not exceed tonnage.
#[derive(Debug, Clone, Copy)]
pub struct TotalWeightRule {
    near_limit_margin: Fixed,
}

impl TotalWeightRule {
    /// Rule id.
    pub const ID: &'static str = "weight.total";

    /// Create the rule; designs with less than `near_limit_margin` tons
    /// spare get a warning.
    #[must_use]
    pub const fn new(near_limit_margin: Fixed) -> Self {
        Self { near_limit_margin }
    }
}

impl ConstructionRule for TotalWeightRule {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Weight
    }

    fn priority(&self) -> u32 {
        10
    }

    fn validate(&self, context: &ValidationContext) -> RuleResult {
        let mut issues = Vec::new();
        if let (Some(tonnage), Some(weight)) = (context.tonnage, context.total_weight) {
            let limit = tonnage.as_fixed();
            if weight > limit {
                let excess = format_tons(weight.saturating_sub(limit));
                issues.push(
                    ValidationIssue::error(
                        Self::ID,
                        IssueCode::Overweight,
                        self.category(),
                        format!("Unit is overweight by {excess} tons"),
                    )
                    .at("weight")
                    .values(format!("<= {}", tonnage.get()), format_tons(weight))
                    .suggest(format!("Remove at least {excess} tons of equipment or armor")),
                );
            } else if limit.saturating_sub(weight) < self.near_limit_margin {
                let remaining = format_tons(limit.saturating_sub(weight));
                issues.push(
                    ValidationIssue::warning(
                        Self::ID,
                        IssueCode::NearWeightLimit,
                        self.category(),
                        format!("Only {remaining} tons remaining"),
                    )
                    .at("weight"),
                );
            }
        }
        result(self, issues)
    }
}

/// Total weight should be a half-ton multiple.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeightRoundingRule;

impl WeightRoundingRule {
    /// Rule id.
    pub const ID: &'static str = "weight.rounding";
}

impl ConstructionRule for WeightRoundingRule {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Weight
    }

    fn priority(&self) -> u32 {
        20
    }

    fn validate(&self, context: &ValidationContext) -> RuleResult {
        let mut issues = Vec::new();
        if let Some(weight) = context.total_weight {
            if !is_half_ton_multiple(weight) {
                let rounded = format_tons(round_up_to_half_ton(weight));
                issues.push(
                    ValidationIssue::warning(
                        Self::ID,
                        IssueCode::WeightNotRounded,
                        self.category(),
                        format!("Weight {} tons is not a multiple of 0.5", format_tons(weight)),
                    )
                    .at("weight")
                    .values(&rounded, format_tons(weight))
                    .suggest(format!("Round to {rounded} tons")),
                );
            }
        }
        result(self, issues)
    }
}

// ============================================================================
// Slots and heat sinks
// ============================================================================

/// Total critical slots must fit the chassis.
#[derive(Debug, Clone, Copy)]
pub struct CriticalSlotsRule {
    total_slots: u32,
}

impl CriticalSlotsRule {
    /// Rule id.
    pub const ID: &'static str = "slots.total";

    /// Create the rule for a chassis slot total.
    #[must_use]
    pub const fn new(total_slots: u32) -> Self {
        Self { total_slots }
    }
}

impl ConstructionRule for CriticalSlotsRule {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Slots
    }

    fn priority(&self) -> u32 {
        30
    }

    fn validate(&self, context: &ValidationContext) -> RuleResult {
        let mut issues = Vec::new();
        if let Some(used) = context.used_slots {
            if used > self.total_slots {
                let excess = used - self.total_slots;
                issues.push(
                    ValidationIssue::error(
                        Self::ID,
                        IssueCode::SlotsExceeded,
                        self.category(),
                        format!("Critical slots exceeded by {excess} ({used} of {})", self.total_slots),
                    )
                    .at("critical_slots")
                    .values(self.total_slots, used)
                    .suggest(format!("Free at least {excess} critical slots")),
                );
            }
        }
        result(self, issues)
    }
}

/// Designs need a minimum number of heat sinks.
#[derive(Debug, Clone, Copy)]
pub struct HeatSinkMinimumRule {
    minimum: u32,
}

impl HeatSinkMinimumRule {
    /// Rule id.
    pub const ID: &'static str = "heat_sinks.minimum";

    /// Create the rule for a minimum count.
    #[must_use]
    pub const fn new(minimum: u32) -> Self {
        Self { minimum }
    }
}

impl ConstructionRule for HeatSinkMinimumRule {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::HeatSinks
    }

    fn priority(&self) -> u32 {
        40
    }

    fn validate(&self, context: &ValidationContext) -> RuleResult {
        let mut issues = Vec::new();
        if let Some(section) = context.heat_sinks {
            match section.count {
                None => issues.push(
                    ValidationIssue::error(
                        Self::ID,
                        IssueCode::HeatSinksMissing,
                        self.category(),
                        "Heat sink configuration is missing",
                    )
                    .at("heat_sinks.count")
                    .suggest(format!("Specify at least {} heat sinks", self.minimum)),
                ),
                Some(count) if count < self.minimum => issues.push(
                    ValidationIssue::error(
                        Self::ID,
                        IssueCode::HeatSinksBelowMinimum,
                        self.category(),
                        format!("{count} heat sinks is below the minimum of {}", self.minimum),
                    )
                    .at("heat_sinks.count")
                    .values(self.minimum, count)
                    .suggest(format!("Add {} heat sinks", self.minimum - count))
                    .repairable(),
                ),
                Some(_) => {}
            }
        }
        result(self, issues)
    }
}

// ============================================================================
// Armor
// ============================================================================

/// Locations whose armor exceeds the location maximum, with (total, max).
#[must_use]
pub fn armor_overflows(allocation: &ArmorAllocation, tonnage: Tonnage) -> Vec<(Location, u32, u32)> {
    allocation
        .iter()
        .filter_map(|(location, armor)| {
            let max = max_armor_for(location, tonnage);
            (armor.total() > max).then_some((location, armor.total(), max))
        })
        .collect()
}

/// Armor on each location must not exceed its maximum.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocationArmorRule;

impl LocationArmorRule {
    /// Rule id.
    pub const ID: &'static str = "armor.location_max";
}

impl ConstructionRule for LocationArmorRule {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Armor
    }

    fn priority(&self) -> u32 {
        50
    }

    fn validate(&self, context: &ValidationContext) -> RuleResult {
        let mut issues = Vec::new();
        if let (Some(armor), Some(tonnage)) = (&context.armor, context.tonnage) {
            for (location, total, max) in armor_overflows(&armor.allocation, tonnage) {
                issues.push(
                    ValidationIssue::error(
                        Self::ID,
                        IssueCode::ArmorExceedsLocationMax,
                        self.category(),
                        format!("{location} armor {total} exceeds maximum of {max}"),
                    )
                    .at(format!("armor.{}", location.abbreviation()))
                    .values(max, total)
                    .suggest(format!("Reduce {location} armor to {max}"))
                    .repairable(),
                );
            }
        }
        result(self, issues)
    }
}

/// Mirrored locations should carry the same armor.
///
/// A warning only: asymmetric layouts are legal, but automatic allocation
/// never produces them.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArmorSymmetryRule;

impl ArmorSymmetryRule {
    /// Rule id.
    pub const ID: &'static str = "armor.symmetry";
}

impl ConstructionRule for ArmorSymmetryRule {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Armor
    }

    fn priority(&self) -> u32 {
        52
    }

    fn validate(&self, context: &ValidationContext) -> RuleResult {
        let mut issues = Vec::new();
        if let Some(armor) = &context.armor {
            for (location, ours) in armor.allocation.iter() {
                let Some(mirror) = location.mirror() else {
                    continue;
                };
                // report each pair once, from its left side
                if mirror < location {
                    continue;
                }
                let theirs = armor.allocation.get(mirror);
                if ours != theirs {
                    issues.push(
                        ValidationIssue::warning(
                            Self::ID,
                            IssueCode::ArmorAsymmetric,
                            self.category(),
                            format!(
                                "{location} armor {}/{} differs from {mirror} armor {}/{}",
                                ours.front, ours.rear, theirs.front, theirs.rear
                            ),
                        )
                        .at(format!("armor.{}", location.abbreviation()))
                        .values(
                            format!("{}/{}", theirs.front, theirs.rear),
                            format!("{}/{}", ours.front, ours.rear),
                        )
                        .suggest("Re-run automatic armor allocation"),
                    );
                }
            }
        }
        result(self, issues)
    }
}

/// Total armor must fit the armor tonnage and the chassis maximum.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArmorTonnageRule;

impl ArmorTonnageRule {
    /// Rule id.
    pub const ID: &'static str = "armor.tonnage";
}

impl ConstructionRule for ArmorTonnageRule {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Armor
    }

    fn priority(&self) -> u32 {
        55
    }

    fn validate(&self, context: &ValidationContext) -> RuleResult {
        let mut issues = Vec::new();
        let Some(armor) = &context.armor else {
            return result(self, issues);
        };
        let total = armor.allocation.total();

        if let (Some(armor_type), Some(armor_tons)) = (armor.armor_type, armor.armor_tonnage) {
            let budget = (armor_tons * Fixed::from_num(armor_type.points_per_ton()))
                .floor()
                .to_num::<i64>()
                .max(0) as u32;
            if total > budget {
                issues.push(
                    ValidationIssue::error(
                        Self::ID,
                        IssueCode::ArmorExceedsTonnage,
                        self.category(),
                        format!(
                            "{total} armor points exceed the {budget} bought by {} tons",
                            format_tons(armor_tons)
                        ),
                    )
                    .at("armor.tonnage")
                    .values(budget, total)
                    .suggest("Increase armor tonnage or remove armor points"),
                );
            }
        }

        if let Some(tonnage) = context.tonnage {
            let maximum = max_armor(tonnage);
            if total > maximum {
                issues.push(
                    ValidationIssue::error(
                        Self::ID,
                        IssueCode::ArmorExceedsMaximum,
                        self.category(),
                        format!(
                            "{total} armor points exceed the {maximum} a {}-ton unit can carry",
                            tonnage.get()
                        ),
                    )
                    .at("armor")
                    .values(maximum, total),
                );
            }
        }
        result(self, issues)
    }
}

// ============================================================================
// Engine and movement
// ============================================================================

/// Engine rating must be in range and on the 5-point grid.
#[derive(Debug, Clone, Copy, Default)]
pub struct EngineRatingRule;

impl EngineRatingRule {
    /// Rule id.
    pub const ID: &'static str = "engine.rating";
}

impl ConstructionRule for EngineRatingRule {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Engine
    }

    fn priority(&self) -> u32 {
        60
    }

    fn validate(&self, context: &ValidationContext) -> RuleResult {
        let mut issues = Vec::new();
        if let Some(engine) = context.engine {
            let rating = engine.rating;
            if !(MIN_ENGINE_RATING..=MAX_ENGINE_RATING).contains(&rating) {
                issues.push(
                    ValidationIssue::error(
                        Self::ID,
                        IssueCode::EngineRatingOutOfRange,
                        self.category(),
                        format!(
                            "Engine rating {rating} is outside {MIN_ENGINE_RATING}-{MAX_ENGINE_RATING}"
                        ),
                    )
                    .at("engine.rating")
                    .values(format!("{MIN_ENGINE_RATING}-{MAX_ENGINE_RATING}"), rating)
                    .repairable(),
                );
            }
            if rating % ENGINE_RATING_STEP != 0 {
                issues.push(
                    ValidationIssue::error(
                        Self::ID,
                        IssueCode::EngineRatingNotMultipleOf5,
                        self.category(),
                        format!("Engine rating {rating} must be a multiple of 5"),
                    )
                    .at("engine.rating")
                    .values("multiple of 5", rating)
                    .suggest(format!(
                        "Use a rating of {} or {}",
                        rating - rating % ENGINE_RATING_STEP,
                        (rating - rating % ENGINE_RATING_STEP).saturating_add(ENGINE_RATING_STEP)
                    ))
                    .repairable(),
                );
            }
        }
        result(self, issues)
    }
}

/// Engine rating must match tonnage × walk MP; jump MP cannot exceed walk MP.
#[derive(Debug, Clone, Copy, Default)]
pub struct MovementRule;

impl MovementRule {
    /// Rule id.
    pub const ID: &'static str = "movement.engine";
}

impl ConstructionRule for MovementRule {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Movement
    }

    fn priority(&self) -> u32 {
        65
    }

    fn validate(&self, context: &ValidationContext) -> RuleResult {
        let mut issues = Vec::new();
        let Some(movement) = context.movement else {
            return result(self, issues);
        };

        if let (Some(engine), Some(tonnage)) = (context.engine, context.tonnage) {
            let expected = tonnage.get().checked_mul(movement.walk);
            if expected != Some(engine.rating) {
                let (required, suggestion) = match expected {
                    Some(rating) => (rating.to_string(), format!("Use a {rating} rated engine")),
                    None => ("none".to_string(), "Reduce walk MP".to_string()),
                };
                issues.push(
                    ValidationIssue::error(
                        Self::ID,
                        IssueCode::EngineRatingMismatch,
                        self.category(),
                        format!(
                            "Engine rating {} does not give {} walk MP on a {}-ton unit",
                            engine.rating,
                            movement.walk,
                            tonnage.get()
                        ),
                    )
                    .at("engine.rating")
                    .values(required, engine.rating)
                    .suggest(suggestion),
                );
            }
        }

        if movement.jump > movement.walk {
            issues.push(
                ValidationIssue::error(
                    Self::ID,
                    IssueCode::JumpExceedsWalk,
                    self.category(),
                    format!("Jump MP {} exceeds walk MP {}", movement.jump, movement.walk),
                )
                .at("movement.jump")
                .values(format!("<= {}", movement.walk), movement.jump),
            );
        }
        result(self, issues)
    }
}

// ============================================================================
// Tech and era
// ============================================================================

/// Every component must be usable with the unit's tech base.
#[derive(Debug, Clone, Copy, Default)]
pub struct TechBaseRule;

impl TechBaseRule {
    /// Rule id.
    pub const ID: &'static str = "tech.compatibility";
}

impl ConstructionRule for TechBaseRule {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Tech
    }

    fn priority(&self) -> u32 {
        70
    }

    fn validate(&self, context: &ValidationContext) -> RuleResult {
        let mut issues = Vec::new();
        if let Some(tech) = &context.tech {
            for component in &tech.components {
                if !is_compatible(component.tech_base, tech.unit_tech_base, tech.mixed_tech_allowed) {
                    issues.push(
                        ValidationIssue::error(
                            Self::ID,
                            IssueCode::IncompatibleTechBase,
                            self.category(),
                            format!(
                                "{} ({}) cannot be mounted on a {} unit",
                                component.name, component.tech_base, tech.unit_tech_base
                            ),
                        )
                        .at(&component.path)
                        .values(tech.unit_tech_base, component.tech_base)
                        .suggest("Enable mixed tech or choose a compatible component"),
                    );
                }
            }
        }
        result(self, issues)
    }
}

/// Components must exist in the unit's year.
#[derive(Debug, Clone, Copy, Default)]
pub struct EraAvailabilityRule;

impl EraAvailabilityRule {
    /// Rule id.
    pub const ID: &'static str = "era.availability";
}

impl ConstructionRule for EraAvailabilityRule {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Era
    }

    fn priority(&self) -> u32 {
        80
    }

    fn validate(&self, context: &ValidationContext) -> RuleResult {
        let mut issues = Vec::new();
        if let Some(era) = &context.era {
            if let Some(year) = era.year {
                for component in era.components.iter().filter(|c| c.introduction_year > year) {
                    issues.push(
                        ValidationIssue::error(
                            Self::ID,
                            IssueCode::ComponentUnavailableInEra,
                            self.category(),
                            format!(
                                "{} is not available until {}",
                                component.name, component.introduction_year
                            ),
                        )
                        .at(&component.path)
                        .values(format!("<= {year}"), component.introduction_year),
                    );
                }
            }
        }
        result(self, issues)
    }
}

// ============================================================================
// Special components
// ============================================================================

/// Special components must be fully placed in valid locations.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpecialComponentRule;

impl SpecialComponentRule {
    /// Rule id.
    pub const ID: &'static str = "special.placement";
}

impl ConstructionRule for SpecialComponentRule {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::SpecialComponents
    }

    fn priority(&self) -> u32 {
        90
    }

    fn validate(&self, context: &ValidationContext) -> RuleResult {
        let mut issues = Vec::new();
        for allocation in &context.special_allocations {
            let allocator = SpecialComponentAllocator::new(allocation.kind);
            for conflict in allocator.detect_conflicts(allocation) {
                let issue = match conflict {
                    SpecialConflict::Incomplete { kind, remaining } => ValidationIssue::error(
                        Self::ID,
                        IssueCode::SpecialComponentIncomplete,
                        self.category(),
                        format!(
                            "{kind} needs {} slots, {remaining} could not be placed",
                            allocation.required_slots
                        ),
                    )
                    .values(allocation.required_slots, allocation.placed_slots())
                    .suggest(format!("Free {remaining} critical slots")),
                    SpecialConflict::InvalidLocation {
                        kind,
                        location,
                        slots,
                    } => ValidationIssue::error(
                        Self::ID,
                        IssueCode::SpecialComponentInvalidLocation,
                        self.category(),
                        format!("{kind} cannot occupy {location} ({slots} slots placed)"),
                    )
                    .at(format!("critical_slots.{}", location.abbreviation())),
                };
                issues.push(issue);
            }
        }
        result(self, issues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{half_tons, tons};
    use crate::special::SpecialComponentKind;
    use crate::tech::TechBase;
    use crate::unit::LocationArmor;
    use crate::validation::context::{ComponentEra, ComponentTech, EraSection, TechSection};

    fn fifty() -> Tonnage {
        Tonnage::new(50).unwrap()
    }

    fn codes(result: &RuleResult) -> Vec<IssueCode> {
        result.issues().map(|i| i.code).collect()
    }

    // ========================================================================
    // Weight
    // ========================================================================

    #[test]
    fn test_overweight_cites_excess() {
        let rule = TotalWeightRule::new(half_tons(1));
        let context = ValidationContext::new()
            .with_tonnage(fifty())
            .with_total_weight(tons(55));
        let result = rule.validate(&context);
        assert_eq!(codes(&result), vec![IssueCode::Overweight]);
        assert!(result.errors[0].message.contains('5'));
        assert!(result.errors[0].suggestion.as_deref().unwrap().contains('5'));
    }

    #[test]
    fn test_near_weight_limit_warns() {
        let rule = TotalWeightRule::new(half_tons(1));
        let context = ValidationContext::new()
            .with_tonnage(fifty())
            .with_total_weight(Fixed::from_num(49.75));
        let result = rule.validate(&context);
        assert!(result.passed);
        assert_eq!(codes(&result), vec![IssueCode::NearWeightLimit]);
    }

    #[test]
    fn test_weight_rule_skips_missing_sections() {
        let rule = TotalWeightRule::new(half_tons(1));
        let context = ValidationContext::new().with_total_weight(tons(500));
        assert!(codes(&rule.validate(&context)).is_empty());
    }

    #[test]
    fn test_extreme_weights_are_reported() {
        let rule = TotalWeightRule::new(half_tons(1));
        let heavy = ValidationContext::new()
            .with_tonnage(fifty())
            .with_total_weight(Fixed::MAX);
        assert_eq!(codes(&rule.validate(&heavy)), vec![IssueCode::Overweight]);

        let negative = ValidationContext::new()
            .with_tonnage(fifty())
            .with_total_weight(Fixed::MIN);
        assert!(codes(&rule.validate(&negative)).is_empty());
    }

    #[test]
    fn test_weight_rounding_warns() {
        let context = ValidationContext::new().with_total_weight(Fixed::from_num(42.25));
        let result = WeightRoundingRule.validate(&context);
        assert!(result.passed);
        assert_eq!(codes(&result), vec![IssueCode::WeightNotRounded]);
        assert_eq!(result.warnings[0].expected.as_deref(), Some("42.5"));
    }

    // ========================================================================
    // Slots and heat sinks
    // ========================================================================

    #[test]
    fn test_slots_exceeded() {
        let rule = CriticalSlotsRule::new(78);
        assert!(rule.validate(&ValidationContext::new().with_used_slots(78)).passed);
        let result = rule.validate(&ValidationContext::new().with_used_slots(80));
        assert_eq!(codes(&result), vec![IssueCode::SlotsExceeded]);
    }

    #[test]
    fn test_heat_sinks_missing_vs_below_minimum() {
        let rule = HeatSinkMinimumRule::new(10);
        let missing = rule.validate(&ValidationContext::new().with_heat_sinks(None, None));
        assert_eq!(codes(&missing), vec![IssueCode::HeatSinksMissing]);

        let below = rule.validate(&ValidationContext::new().with_heat_sinks(Some(8), None));
        assert_eq!(codes(&below), vec![IssueCode::HeatSinksBelowMinimum]);
        assert!(below.errors[0].auto_repairable);

        let absent = rule.validate(&ValidationContext::new());
        assert!(codes(&absent).is_empty());
    }

    // ========================================================================
    // Armor
    // ========================================================================

    #[test]
    fn test_location_armor_reports_each_location() {
        let allocation = ArmorAllocation::new()
            .with(Location::Head, LocationArmor::front(12))
            .with(Location::LeftArm, LocationArmor::front(17))
            .with(Location::RightArm, LocationArmor::front(16));
        let context = ValidationContext::new()
            .with_tonnage(fifty())
            .with_armor(allocation);
        let result = LocationArmorRule.validate(&context);
        assert_eq!(result.errors.len(), 2);
        assert_eq!(result.errors[0].path, "armor.HD");
        assert_eq!(result.errors[1].path, "armor.LA");
    }

    #[test]
    fn test_armor_symmetry_warns_once_per_pair() {
        let allocation = ArmorAllocation::new()
            .with(Location::LeftArm, LocationArmor::front(16))
            .with(Location::RightArm, LocationArmor::front(12))
            .with(Location::LeftTorso, LocationArmor::split(20, 4))
            .with(Location::RightTorso, LocationArmor::split(20, 4));
        let context = ValidationContext::new().with_armor(allocation);
        let result = ArmorSymmetryRule.validate(&context);

        assert!(result.passed);
        assert_eq!(codes(&result), vec![IssueCode::ArmorAsymmetric]);
        assert_eq!(result.warnings[0].path, "armor.LA");
        assert_eq!(result.warnings[0].expected.as_deref(), Some("12/0"));
    }

    #[test]
    fn test_armor_tonnage_budget() {
        let mut context = ValidationContext::new().with_armor(
            ArmorAllocation::new().with(Location::CenterTorso, LocationArmor::split(20, 0)),
        );
        if let Some(armor) = context.armor.as_mut() {
            armor.armor_type = Some(crate::components::ArmorType::Standard);
            armor.armor_tonnage = Some(tons(1));
        }
        let result = ArmorTonnageRule.validate(&context);
        assert_eq!(codes(&result), vec![IssueCode::ArmorExceedsTonnage]);
    }

    // ========================================================================
    // Engine and movement
    // ========================================================================

    #[test]
    fn test_engine_rating_not_multiple_of_five() {
        let result = EngineRatingRule.validate(&ValidationContext::new().with_engine_rating(123));
        assert_eq!(codes(&result), vec![IssueCode::EngineRatingNotMultipleOf5]);
        assert!(result.errors[0].message.contains("multiple of 5"));
    }

    #[test]
    fn test_engine_rating_reports_both_failures() {
        let result = EngineRatingRule.validate(&ValidationContext::new().with_engine_rating(503));
        assert_eq!(
            codes(&result),
            vec![IssueCode::EngineRatingOutOfRange, IssueCode::EngineRatingNotMultipleOf5]
        );
    }

    #[test]
    fn test_movement_rule() {
        let context = ValidationContext::new()
            .with_tonnage(fifty())
            .with_engine_rating(250)
            .with_movement(4, 5);
        let result = MovementRule.validate(&context);
        assert_eq!(
            codes(&result),
            vec![IssueCode::EngineRatingMismatch, IssueCode::JumpExceedsWalk]
        );
    }

    #[test]
    fn test_movement_overflow_is_a_mismatch() {
        let context = ValidationContext::new()
            .with_tonnage(fifty())
            .with_engine_rating(200)
            .with_movement(100_000_000, 0);
        let result = MovementRule.validate(&context);
        assert_eq!(codes(&result), vec![IssueCode::EngineRatingMismatch]);
        assert_eq!(result.errors[0].expected.as_deref(), Some("none"));
    }

    #[test]
    fn test_engine_rating_near_max_suggestion() {
        let result = EngineRatingRule.validate(&ValidationContext::new().with_engine_rating(u32::MAX - 1));
        assert_eq!(
            codes(&result),
            vec![IssueCode::EngineRatingOutOfRange, IssueCode::EngineRatingNotMultipleOf5]
        );
    }

    // ========================================================================
    // Tech, era, special components
    // ========================================================================

    #[test]
    fn test_tech_rule_flags_clan_part_on_inner_sphere_unit() {
        let mut context = ValidationContext::new();
        context.tech = Some(TechSection {
            unit_tech_base: TechBase::InnerSphere,
            mixed_tech_allowed: false,
            components: vec![ComponentTech {
                path: "engine.type".into(),
                name: "XL Engine (Clan)".into(),
                tech_base: TechBase::Clan,
            }],
        });
        let result = TechBaseRule.validate(&context);
        assert_eq!(codes(&result), vec![IssueCode::IncompatibleTechBase]);

        if let Some(tech) = context.tech.as_mut() {
            tech.mixed_tech_allowed = true;
        }
        assert!(TechBaseRule.validate(&context).passed);
    }

    #[test]
    fn test_era_rule() {
        let mut context = ValidationContext::new();
        context.era = Some(EraSection {
            year: Some(3025),
            components: vec![ComponentEra {
                path: "engine.type".into(),
                name: "XL Engine (IS)".into(),
                introduction_year: 3035,
            }],
        });
        assert_eq!(
            codes(&EraAvailabilityRule.validate(&context)),
            vec![IssueCode::ComponentUnavailableInEra]
        );

        if let Some(era) = context.era.as_mut() {
            era.year = None;
        }
        assert!(EraAvailabilityRule.validate(&context).passed);
    }

    #[test]
    fn test_special_component_rule() {
        let incomplete = SpecialComponentAllocator::new(SpecialComponentKind::EndoSteel).distribute(40);
        let context = ValidationContext::new().with_special_allocation(incomplete);
        let result = SpecialComponentRule.validate(&context);
        assert_eq!(codes(&result), vec![IssueCode::SpecialComponentIncomplete]);
    }
}
