//! Rule registry, validator and report.

use std::collections::BTreeSet;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ConstructionError, Result};
use crate::location::TOTAL_CRITICAL_SLOTS;
use crate::math::{half_tons, tons_serde, Fixed};
use crate::system::WEIGHT_FREE_HEAT_SINKS;

use super::context::ValidationContext;
use super::issue::{IssueCode, RuleResult, ValidationIssue};
use super::rules::{
    ArmorSymmetryRule, ArmorTonnageRule, ConstructionRule, CriticalSlotsRule, EngineRatingRule,
    EraAvailabilityRule, HeatSinkMinimumRule, LocationArmorRule, MovementRule,
    SpecialComponentRule, TechBaseRule, TotalWeightRule, WeightRoundingRule,
};

/// Tunables of the standard rule set.
///
/// # Example RON
///
/// ```ron
/// ValidatorConfig(
///     total_critical_slots: 78,
///     minimum_heat_sinks: 10,
///     near_weight_margin: 0.5,
///     disabled_rules: ["era.availability"],
/// )
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Critical slots on the chassis.
    pub total_critical_slots: u32,
    /// Minimum heat sinks.
    pub minimum_heat_sinks: u32,
    /// Spare tonnage below which the weight rule warns.
    #[serde(with = "tons_serde")]
    pub near_weight_margin: Fixed,
    /// Rule ids that are not registered.
    pub disabled_rules: BTreeSet<String>,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            total_critical_slots: TOTAL_CRITICAL_SLOTS,
            minimum_heat_sinks: WEIGHT_FREE_HEAT_SINKS,
            near_weight_margin: half_tons(1),
            disabled_rules: BTreeSet::new(),
        }
    }
}

impl ValidatorConfig {
    /// Parse a RON validator configuration.
    pub fn from_ron_str(source: &str) -> Result<Self> {
        ron::from_str(source).map_err(|e| ConstructionError::Serialization(e.to_string()))
    }
}

/// The set of rules a validator runs.
#[derive(Debug, Default)]
pub struct RuleRegistry {
    rules: Vec<Box<dyn ConstructionRule>>,
}

impl RuleRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard rules with default tunables.
    #[must_use]
    pub fn standard() -> Self {
        Self::with_config(&ValidatorConfig::default())
    }

    /// The standard rules, tuned and filtered by a configuration.
    #[must_use]
    pub fn with_config(config: &ValidatorConfig) -> Self {
        let candidates: Vec<Box<dyn ConstructionRule>> = vec![
            Box::new(TotalWeightRule::new(config.near_weight_margin)),
            Box::new(WeightRoundingRule),
            Box::new(CriticalSlotsRule::new(config.total_critical_slots)),
            Box::new(HeatSinkMinimumRule::new(config.minimum_heat_sinks)),
            Box::new(LocationArmorRule),
            Box::new(ArmorSymmetryRule),
            Box::new(ArmorTonnageRule),
            Box::new(EngineRatingRule),
            Box::new(MovementRule),
            Box::new(TechBaseRule),
            Box::new(EraAvailabilityRule),
            Box::new(SpecialComponentRule),
        ];

        let mut registry = Self::new();
        for rule in candidates {
            if !config.disabled_rules.contains(rule.id()) {
                registry.register(rule);
            }
        }
        registry
    }

    /// Add a rule. A rule with the same id replaces the existing one.
    pub fn register(&mut self, rule: Box<dyn ConstructionRule>) {
        self.rules.retain(|r| r.id() != rule.id());
        self.rules.push(rule);
    }

    /// Look up a rule by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&dyn ConstructionRule> {
        self.rules.iter().find(|r| r.id() == id).map(|r| r.as_ref())
    }

    /// Registered rule ids, in registration order.
    #[must_use]
    pub fn ids(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.id()).collect()
    }

    /// Number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether no rules are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Iterate over the rules.
    pub fn iter(&self) -> impl Iterator<Item = &dyn ConstructionRule> {
        self.rules.iter().map(|r| r.as_ref())
    }
}

/// Aggregated results of one validation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Whether no rule produced an error.
    pub is_valid: bool,
    /// Number of errors.
    pub error_count: usize,
    /// Number of warnings.
    pub warning_count: usize,
    /// Number of infos.
    pub info_count: usize,
    /// Per-rule results, by priority then id.
    pub results: Vec<RuleResult>,
    /// When the report was produced (RFC 3339).
    pub checked_at: String,
}

impl ValidationReport {
    /// Aggregate rule results.
    #[must_use]
    pub fn from_results(mut results: Vec<RuleResult>, checked_at: DateTime<Utc>) -> Self {
        results.sort_by(|a, b| a.priority.cmp(&b.priority).then_with(|| a.rule_id.cmp(&b.rule_id)));
        let error_count = results.iter().map(|r| r.errors.len()).sum();
        let warning_count = results.iter().map(|r| r.warnings.len()).sum();
        let info_count = results.iter().map(|r| r.infos.len()).sum();
        Self {
            is_valid: error_count == 0,
            error_count,
            warning_count,
            info_count,
            results,
            checked_at: checked_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    /// Every finding, in display order.
    pub fn issues(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.results.iter().flat_map(RuleResult::issues)
    }

    /// Error findings, in display order.
    pub fn errors(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.results.iter().flat_map(|r| r.errors.iter())
    }

    /// Whether any finding carries the code.
    #[must_use]
    pub fn has_code(&self, code: IssueCode) -> bool {
        self.issues().any(|i| i.code == code)
    }

    /// Compare findings, ignoring the timestamp.
    #[must_use]
    pub fn same_findings(&self, other: &Self) -> bool {
        self.results == other.results
    }
}

/// Runs every registered rule over a context.
#[derive(Debug, Default)]
pub struct ConstructionValidator {
    registry: RuleRegistry,
}

impl ConstructionValidator {
    /// Create a validator over a registry.
    #[must_use]
    pub fn new(registry: RuleRegistry) -> Self {
        Self { registry }
    }

    /// A validator with the standard rules.
    #[must_use]
    pub fn standard() -> Self {
        Self::new(RuleRegistry::standard())
    }

    /// The rule registry.
    #[must_use]
    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Run every rule; timestamp the report with the current time.
    #[must_use]
    pub fn validate(&self, context: &ValidationContext) -> ValidationReport {
        self.validate_at(context, Utc::now())
    }

    /// Run every rule; timestamp the report with `checked_at`.
    #[must_use]
    pub fn validate_at(&self, context: &ValidationContext, checked_at: DateTime<Utc>) -> ValidationReport {
        let results = self.registry.iter().map(|rule| rule.validate(context)).collect();
        let report = ValidationReport::from_results(results, checked_at);
        tracing::debug!(
            rules = self.registry.len(),
            errors = report.error_count,
            warnings = report.warning_count,
            "Validation complete"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::tons;
    use crate::unit::Tonnage;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(3067, 4, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_standard_registry_has_all_rules() {
        let registry = RuleRegistry::standard();
        assert_eq!(registry.len(), 12);
        assert!(registry.get(TotalWeightRule::ID).is_some());
        assert!(registry.get("missing").is_none());
    }

    #[test]
    fn test_disabled_rules_are_skipped() {
        let mut config = ValidatorConfig::default();
        config.disabled_rules.insert(EraAvailabilityRule::ID.to_string());
        let registry = RuleRegistry::with_config(&config);
        assert_eq!(registry.len(), 11);
        assert!(!registry.ids().contains(&EraAvailabilityRule::ID));
    }

    #[test]
    fn test_register_replaces_same_id() {
        let mut registry = RuleRegistry::new();
        registry.register(Box::new(HeatSinkMinimumRule::new(10)));
        registry.register(Box::new(HeatSinkMinimumRule::new(12)));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_config_from_ron() {
        let config = ValidatorConfig::from_ron_str(
            r#"ValidatorConfig(minimum_heat_sinks: 12, disabled_rules: ["movement.engine"])"#,
        )
        .unwrap();
        assert_eq!(config.minimum_heat_sinks, 12);
        assert_eq!(config.total_critical_slots, 78);
        assert!(config.disabled_rules.contains("movement.engine"));
    }

    #[test]
    fn test_report_counts_and_order() {
        let validator = ConstructionValidator::standard();
        let context = ValidationContext::new()
            .with_tonnage(Tonnage::new(50).unwrap())
            .with_total_weight(tons(55))
            .with_heat_sinks(Some(8), None);
        let report = validator.validate_at(&context, fixed_time());

        assert!(!report.is_valid);
        assert_eq!(report.error_count, 2);
        assert_eq!(report.warning_count, 0);
        assert_eq!(report.results.len(), 12);
        let first = report.errors().next().unwrap();
        assert_eq!(first.code, IssueCode::Overweight);
        assert_eq!(report.checked_at, "3067-04-01T12:00:00.000Z");
    }

    #[test]
    fn test_empty_context_is_valid() {
        let report = ConstructionValidator::standard().validate(&ValidationContext::new());
        assert!(report.is_valid);
        assert_eq!(report.issues().count(), 0);
    }
}
