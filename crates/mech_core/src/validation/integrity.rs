//! Data-integrity checks and repair for stored designs.
//!
//! Designs loaded from older files or hand-edited JSON can carry values the
//! editor would never produce. [`check`] finds them; [`repair`] fixes the
//! ones marked `auto_repairable`, selectively by code or as a dry run.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::location::Location;
use crate::system::WEIGHT_FREE_HEAT_SINKS;
use crate::unit::{LocationArmor, UnitConfiguration};
use crate::weight::{ENGINE_RATING_STEP, MAX_ENGINE_RATING, MIN_ENGINE_RATING};

use super::issue::{IssueCode, RuleCategory, ValidationIssue};
use super::rules::armor_overflows;

/// Rule id on integrity findings.
pub const INTEGRITY_RULE_ID: &str = "integrity";

/// Which repairs to run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepairOptions {
    /// Codes to repair; `None` repairs every repairable code.
    #[serde(default)]
    pub codes: Option<BTreeSet<IssueCode>>,
    /// Compute the repairs without applying them.
    #[serde(default)]
    pub dry_run: bool,
}

impl RepairOptions {
    /// Repair every repairable issue.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Repair only the given codes.
    #[must_use]
    pub fn only(codes: impl IntoIterator<Item = IssueCode>) -> Self {
        Self {
            codes: Some(codes.into_iter().collect()),
            dry_run: false,
        }
    }

    /// Switch to dry-run mode.
    #[must_use]
    pub fn dry_run(mut self) -> Self {
        self.dry_run = true;
        self
    }

    fn selects(&self, code: IssueCode) -> bool {
        self.codes.as_ref().map_or(true, |codes| codes.contains(&code))
    }
}

/// One applied (or, in a dry run, planned) fix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepairAction {
    /// Code of the fixed finding.
    pub code: IssueCode,
    /// Configuration path that changed.
    pub path: String,
    /// Value before the fix.
    pub before: String,
    /// Value after the fix.
    pub after: String,
}

/// Result of a repair pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepairOutcome {
    /// Fixes applied, or planned in a dry run.
    pub actions: Vec<RepairAction>,
    /// Findings that remain after the fixes.
    pub remaining: Vec<ValidationIssue>,
    /// Whether the configuration was left untouched.
    pub dry_run: bool,
}

fn issue(code: IssueCode, category: RuleCategory, message: String) -> ValidationIssue {
    ValidationIssue::error(INTEGRITY_RULE_ID, code, category, message)
}

fn armor_path(location: Location) -> String {
    format!("armor.{}", location.abbreviation())
}

/// Find integrity problems in a design.
#[must_use]
pub fn check(config: &UnitConfiguration) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    let allocation = &config.armor.allocation;

    for (location, armor) in allocation.iter() {
        if !location.has_rear() && armor.rear > 0 {
            issues.push(
                issue(
                    IssueCode::RearArmorOnNonTorso,
                    RuleCategory::Armor,
                    format!("{location} has {} rear armor but no rear facet", armor.rear),
                )
                .at(armor_path(location))
                .values(0, armor.rear)
                .suggest("Move the rear armor to the front facet")
                .repairable(),
            );
        }
    }

    for (location, total, max) in armor_overflows(allocation, config.tonnage) {
        issues.push(
            issue(
                IssueCode::ArmorExceedsLocationMax,
                RuleCategory::Armor,
                format!("{location} armor {total} exceeds maximum of {max}"),
            )
            .at(armor_path(location))
            .values(max, total)
            .suggest(format!("Reduce {location} armor to {max}"))
            .repairable(),
        );
    }

    if !allocation.is_symmetric() {
        issues.push(
            issue(
                IssueCode::ArmorAsymmetric,
                RuleCategory::Armor,
                "Left and right armor differ".to_string(),
            )
            .at("armor")
            .suggest("Re-run automatic armor allocation"),
        );
    }

    let count = config.heat_sinks.count;
    if count < WEIGHT_FREE_HEAT_SINKS {
        issues.push(
            issue(
                IssueCode::HeatSinksBelowMinimum,
                RuleCategory::HeatSinks,
                format!("{count} heat sinks is below the minimum of {WEIGHT_FREE_HEAT_SINKS}"),
            )
            .at("heat_sinks.count")
            .values(WEIGHT_FREE_HEAT_SINKS, count)
            .repairable(),
        );
    }

    let rating = config.engine.rating;
    if !(MIN_ENGINE_RATING..=MAX_ENGINE_RATING).contains(&rating) {
        issues.push(
            issue(
                IssueCode::EngineRatingOutOfRange,
                RuleCategory::Engine,
                format!("Engine rating {rating} is outside {MIN_ENGINE_RATING}-{MAX_ENGINE_RATING}"),
            )
            .at("engine.rating")
            .values(legal_rating(rating), rating)
            .repairable(),
        );
    }
    if rating % ENGINE_RATING_STEP != 0 {
        issues.push(
            issue(
                IssueCode::EngineRatingNotMultipleOf5,
                RuleCategory::Engine,
                format!("Engine rating {rating} must be a multiple of 5"),
            )
            .at("engine.rating")
            .values(legal_rating(rating), rating)
            .repairable(),
        );
    }

    issues
}

/// Nearest legal rating (halves round up), clamped to the legal range.
#[must_use]
pub fn legal_rating(rating: u32) -> u32 {
    let rounded = rating.saturating_add(ENGINE_RATING_STEP / 2) / ENGINE_RATING_STEP * ENGINE_RATING_STEP;
    rounded.clamp(MIN_ENGINE_RATING, MAX_ENGINE_RATING)
}

fn fold_rear_armor(config: &mut UnitConfiguration, actions: &mut Vec<RepairAction>) {
    for location in Location::ALL {
        let armor = config.armor.allocation.get(location);
        if !location.has_rear() && armor.rear > 0 {
            let fixed = LocationArmor::front(armor.total());
            config.armor.allocation.set(location, fixed);
            actions.push(RepairAction {
                code: IssueCode::RearArmorOnNonTorso,
                path: armor_path(location),
                before: format!("{}/{}", armor.front, armor.rear),
                after: format!("{}/0", fixed.front),
            });
        }
    }
}

fn clamp_location_armor(config: &mut UnitConfiguration, actions: &mut Vec<RepairAction>) {
    for (location, total, max) in armor_overflows(&config.armor.allocation, config.tonnage) {
        let armor = config.armor.allocation.get(location);
        // rear points go first
        let front = armor.front.min(max);
        let fixed = LocationArmor::split(front, max - front);
        config.armor.allocation.set(location, fixed);
        actions.push(RepairAction {
            code: IssueCode::ArmorExceedsLocationMax,
            path: armor_path(location),
            before: total.to_string(),
            after: fixed.total().to_string(),
        });
    }
}

/// Fix repairable issues.
///
/// Repairs run in a fixed order (rear armor, location caps, heat sinks,
/// engine rating) so that each sees the result of the previous one. In a dry
/// run `config` is left untouched and the outcome describes what would
/// change.
pub fn repair(config: &mut UnitConfiguration, options: &RepairOptions) -> RepairOutcome {
    let mut working = config.clone();
    let mut actions = Vec::new();

    if options.selects(IssueCode::RearArmorOnNonTorso) {
        fold_rear_armor(&mut working, &mut actions);
    }
    if options.selects(IssueCode::ArmorExceedsLocationMax) {
        clamp_location_armor(&mut working, &mut actions);
    }
    if options.selects(IssueCode::HeatSinksBelowMinimum) && working.heat_sinks.count < WEIGHT_FREE_HEAT_SINKS {
        actions.push(RepairAction {
            code: IssueCode::HeatSinksBelowMinimum,
            path: "heat_sinks.count".to_string(),
            before: working.heat_sinks.count.to_string(),
            after: WEIGHT_FREE_HEAT_SINKS.to_string(),
        });
        working.heat_sinks.count = WEIGHT_FREE_HEAT_SINKS;
    }

    let rating = working.engine.rating;
    let fixed_rating = legal_rating(rating);
    if fixed_rating != rating {
        let code = if rating % ENGINE_RATING_STEP == 0 {
            IssueCode::EngineRatingOutOfRange
        } else {
            IssueCode::EngineRatingNotMultipleOf5
        };
        if options.selects(code) {
            actions.push(RepairAction {
                code,
                path: "engine.rating".to_string(),
                before: rating.to_string(),
                after: fixed_rating.to_string(),
            });
            working.engine.rating = fixed_rating;
        }
    }

    let remaining = check(&working);
    if !options.dry_run {
        for action in &actions {
            tracing::warn!(
                code = %action.code,
                path = %action.path,
                before = %action.before,
                after = %action.after,
                "Repaired unit data"
            );
        }
        *config = working;
    }

    RepairOutcome {
        actions,
        remaining,
        dry_run: options.dry_run,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::HeatSinkType;
    use crate::unit::Tonnage;

    fn damaged() -> UnitConfiguration {
        let mut config = UnitConfiguration::new("Test", "T-1", Tonnage::new(50).unwrap())
            .with_engine(crate::components::EngineType::Standard, 203)
            .with_heat_sinks(HeatSinkType::Single, 6);
        config.armor.allocation.set(Location::Head, LocationArmor::front(12));
        config.armor.allocation.set(Location::LeftArm, LocationArmor::split(6, 2));
        config.armor.allocation.set(Location::RightArm, LocationArmor::front(8));
        config
    }

    fn codes(issues: &[ValidationIssue]) -> Vec<IssueCode> {
        issues.iter().map(|i| i.code).collect()
    }

    #[test]
    fn test_check_finds_every_problem() {
        let issues = check(&damaged());
        assert_eq!(
            codes(&issues),
            vec![
                IssueCode::RearArmorOnNonTorso,
                IssueCode::ArmorExceedsLocationMax,
                IssueCode::ArmorAsymmetric,
                IssueCode::HeatSinksBelowMinimum,
                IssueCode::EngineRatingNotMultipleOf5,
            ]
        );
        assert!(!issues[2].auto_repairable);
    }

    #[test]
    fn test_repair_everything() {
        let mut config = damaged();
        let outcome = repair(&mut config, &RepairOptions::all());

        assert_eq!(outcome.actions.len(), 4);
        assert_eq!(config.armor.allocation.get(Location::Head), LocationArmor::front(9));
        assert_eq!(config.armor.allocation.get(Location::LeftArm), LocationArmor::front(8));
        assert_eq!(config.heat_sinks.count, 10);
        assert_eq!(config.engine.rating, 205);
        // folding the rear armor made the arms symmetric again
        assert!(outcome.remaining.is_empty());
    }

    #[test]
    fn test_dry_run_does_not_mutate() {
        let mut config = damaged();
        let before = config.clone();
        let outcome = repair(&mut config, &RepairOptions::all().dry_run());
        assert!(outcome.dry_run);
        assert_eq!(outcome.actions.len(), 4);
        assert_eq!(config, before);
    }

    #[test]
    fn test_repair_selected_codes_only() {
        let mut config = damaged();
        let outcome = repair(&mut config, &RepairOptions::only([IssueCode::HeatSinksBelowMinimum]));
        assert_eq!(outcome.actions.len(), 1);
        assert_eq!(config.heat_sinks.count, 10);
        assert_eq!(config.engine.rating, 203);
        assert!(codes(&outcome.remaining).contains(&IssueCode::EngineRatingNotMultipleOf5));
        assert!(!codes(&outcome.remaining).contains(&IssueCode::HeatSinksBelowMinimum));
    }

    #[test]
    fn test_clamp_takes_rear_first() {
        let mut config = UnitConfiguration::new("Test", "T-1", Tonnage::new(50).unwrap());
        config.armor.allocation.set(Location::CenterTorso, LocationArmor::split(28, 8));
        config.armor.allocation.set(Location::Head, LocationArmor::front(0));
        repair(&mut config, &RepairOptions::only([IssueCode::ArmorExceedsLocationMax]));
        assert_eq!(config.armor.allocation.get(Location::CenterTorso), LocationArmor::split(28, 4));
    }

    #[test]
    fn test_legal_rating() {
        assert_eq!(legal_rating(203), 205);
        assert_eq!(legal_rating(202), 200);
        assert_eq!(legal_rating(3), 10);
        assert_eq!(legal_rating(620), 500);
        assert_eq!(legal_rating(u32::MAX), 500);
    }

    #[test]
    fn test_overflowing_armor_is_clamped() {
        let mut config = UnitConfiguration::new("Test", "T-1", Tonnage::new(50).unwrap());
        config.armor.allocation.set(Location::CenterTorso, LocationArmor::split(u32::MAX, 1));
        assert!(codes(&check(&config)).contains(&IssueCode::ArmorExceedsLocationMax));

        repair(&mut config, &RepairOptions::only([IssueCode::ArmorExceedsLocationMax]));
        assert_eq!(config.armor.allocation.get(Location::CenterTorso), LocationArmor::front(32));
    }
}
