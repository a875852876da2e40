//! Validation findings.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How serious a finding is. Only errors make a design invalid.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Severity {
    /// Blocks the design.
    Error,
    /// Advisory.
    Warning,
    /// Informational.
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        };
        f.write_str(name)
    }
}

/// What aspect of the design a rule checks.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum RuleCategory {
    /// Total weight and rounding.
    Weight,
    /// Critical slots.
    Slots,
    /// Heat sinks.
    HeatSinks,
    /// Armor points.
    Armor,
    /// Engine rating.
    Engine,
    /// Walk and jump MP.
    Movement,
    /// Tech base compatibility.
    Tech,
    /// Era availability.
    Era,
    /// Endo Steel and Ferro-Fibrous placement.
    SpecialComponents,
}

/// Machine-readable identity of a finding.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum IssueCode {
    /// Total weight exceeds tonnage.
    Overweight,
    /// Less than half a ton left.
    NearWeightLimit,
    /// Total weight is not a half-ton multiple.
    WeightNotRounded,
    /// More than 78 critical slots used.
    SlotsExceeded,
    /// Heat sink section has no count.
    HeatSinksMissing,
    /// Fewer than 10 heat sinks.
    HeatSinksBelowMinimum,
    /// Location armor over its maximum.
    ArmorExceedsLocationMax,
    /// More armor points than the armor tonnage buys.
    ArmorExceedsTonnage,
    /// More armor points than the chassis can carry.
    ArmorExceedsMaximum,
    /// Rear armor on a location without a rear facet.
    RearArmorOnNonTorso,
    /// Left and right armor differ.
    ArmorAsymmetric,
    /// Engine rating outside 10-500.
    EngineRatingOutOfRange,
    /// Engine rating not a multiple of 5.
    EngineRatingNotMultipleOf5,
    /// Engine rating does not equal tonnage × walk MP.
    EngineRatingMismatch,
    /// Jump MP exceeds walk MP.
    JumpExceedsWalk,
    /// Component tech base not usable on the unit.
    IncompatibleTechBase,
    /// Component introduced after the unit's year.
    ComponentUnavailableInEra,
    /// Special component not fully placed.
    SpecialComponentIncomplete,
    /// Special component placed in a forbidden location.
    SpecialComponentInvalidLocation,
}

impl IssueCode {
    /// Stable identifier, as used in configuration files and reports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Overweight => "OVERWEIGHT",
            Self::NearWeightLimit => "NEAR_WEIGHT_LIMIT",
            Self::WeightNotRounded => "WEIGHT_NOT_ROUNDED",
            Self::SlotsExceeded => "SLOTS_EXCEEDED",
            Self::HeatSinksMissing => "HEAT_SINKS_MISSING",
            Self::HeatSinksBelowMinimum => "HEAT_SINKS_BELOW_MINIMUM",
            Self::ArmorExceedsLocationMax => "ARMOR_EXCEEDS_LOCATION_MAX",
            Self::ArmorExceedsTonnage => "ARMOR_EXCEEDS_TONNAGE",
            Self::ArmorExceedsMaximum => "ARMOR_EXCEEDS_MAXIMUM",
            Self::RearArmorOnNonTorso => "REAR_ARMOR_ON_NON_TORSO",
            Self::ArmorAsymmetric => "ARMOR_ASYMMETRIC",
            Self::EngineRatingOutOfRange => "ENGINE_RATING_OUT_OF_RANGE",
            Self::EngineRatingNotMultipleOf5 => "ENGINE_RATING_NOT_MULTIPLE_OF_5",
            Self::EngineRatingMismatch => "ENGINE_RATING_MISMATCH",
            Self::JumpExceedsWalk => "JUMP_EXCEEDS_WALK",
            Self::IncompatibleTechBase => "INCOMPATIBLE_TECH_BASE",
            Self::ComponentUnavailableInEra => "COMPONENT_UNAVAILABLE_IN_ERA",
            Self::SpecialComponentIncomplete => "SPECIAL_COMPONENT_INCOMPLETE",
            Self::SpecialComponentInvalidLocation => "SPECIAL_COMPONENT_INVALID_LOCATION",
        }
    }
}

impl fmt::Display for IssueCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One finding produced by a rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// Rule that produced the finding.
    pub rule_id: String,
    /// Finding code.
    pub code: IssueCode,
    /// Severity.
    pub severity: Severity,
    /// Rule category.
    pub category: RuleCategory,
    /// Human-readable description.
    pub message: String,
    /// Configuration path the finding refers to (e.g. `armor.LA`).
    pub path: String,
    /// Expected value, when meaningful.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    /// Actual value, when meaningful.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual: Option<String>,
    /// How to fix it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    /// Whether [`crate::validation::integrity::repair`] can fix it.
    #[serde(default)]
    pub auto_repairable: bool,
}

impl ValidationIssue {
    /// Create a finding with the given severity.
    #[must_use]
    pub fn new(
        severity: Severity,
        rule_id: impl Into<String>,
        code: IssueCode,
        category: RuleCategory,
        message: impl Into<String>,
    ) -> Self {
        Self {
            rule_id: rule_id.into(),
            code,
            severity,
            category,
            message: message.into(),
            path: String::new(),
            expected: None,
            actual: None,
            suggestion: None,
            auto_repairable: false,
        }
    }

    /// Create an error.
    #[must_use]
    pub fn error(
        rule_id: impl Into<String>,
        code: IssueCode,
        category: RuleCategory,
        message: impl Into<String>,
    ) -> Self {
        Self::new(Severity::Error, rule_id, code, category, message)
    }

    /// Create a warning.
    #[must_use]
    pub fn warning(
        rule_id: impl Into<String>,
        code: IssueCode,
        category: RuleCategory,
        message: impl Into<String>,
    ) -> Self {
        Self::new(Severity::Warning, rule_id, code, category, message)
    }

    /// Set the configuration path.
    #[must_use]
    pub fn at(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Set the expected and actual values.
    #[must_use]
    pub fn values(mut self, expected: impl fmt::Display, actual: impl fmt::Display) -> Self {
        self.expected = Some(expected.to_string());
        self.actual = Some(actual.to_string());
        self
    }

    /// Set the suggestion.
    #[must_use]
    pub fn suggest(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Mark as fixable by the repair pass.
    #[must_use]
    pub fn repairable(mut self) -> Self {
        self.auto_repairable = true;
        self
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.code, self.message)
    }
}

/// Findings of one rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleResult {
    /// Rule id.
    pub rule_id: String,
    /// Rule category.
    pub category: RuleCategory,
    /// Rule priority (lower first).
    pub priority: u32,
    /// Whether the rule produced no errors.
    pub passed: bool,
    /// Error findings.
    pub errors: Vec<ValidationIssue>,
    /// Warning findings.
    pub warnings: Vec<ValidationIssue>,
    /// Info findings.
    pub infos: Vec<ValidationIssue>,
}

impl RuleResult {
    /// A passing result with no findings.
    #[must_use]
    pub fn pass(rule_id: impl Into<String>, category: RuleCategory, priority: u32) -> Self {
        Self::from_issues(rule_id, category, priority, Vec::new())
    }

    /// Sort findings into buckets by severity.
    #[must_use]
    pub fn from_issues(
        rule_id: impl Into<String>,
        category: RuleCategory,
        priority: u32,
        issues: Vec<ValidationIssue>,
    ) -> Self {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();
        let mut infos = Vec::new();
        for issue in issues {
            match issue.severity {
                Severity::Error => errors.push(issue),
                Severity::Warning => warnings.push(issue),
                Severity::Info => infos.push(issue),
            }
        }
        Self {
            rule_id: rule_id.into(),
            category,
            priority,
            passed: errors.is_empty(),
            errors,
            warnings,
            infos,
        }
    }

    /// Every finding, errors first.
    pub fn issues(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.errors
            .iter()
            .chain(self.warnings.iter())
            .chain(self.infos.iter())
    }
}
