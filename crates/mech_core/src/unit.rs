//! Unit configuration data model.
//!
//! A [`UnitConfiguration`] is plain data: the UI mutates it through
//! [`crate::state::UnitStateManager`], persistence stores it verbatim.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::components::{
    ArmorType, CockpitType, EngineType, GyroType, HeatSinkType, StructureType,
};
use crate::error::{ConstructionError, Result};
use crate::location::Location;
use crate::math::{self, tons_serde, Fixed};
use crate::special::SpecialComponentKind;
use crate::tech::{ComponentSelections, RulesLevel, TechBase};

/// Unit weight class driver: 10-100 tons in 5-ton steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Tonnage(u32);

impl Tonnage {
    /// Lightest legal tonnage.
    pub const MIN: u32 = 10;
    /// Heaviest legal tonnage.
    pub const MAX: u32 = 100;

    /// Create a tonnage, rejecting values outside 10-100 or off the 5-ton grid.
    pub fn new(tons: u32) -> Result<Self> {
        if (Self::MIN..=Self::MAX).contains(&tons) && tons % 5 == 0 {
            Ok(Self(tons))
        } else {
            Err(ConstructionError::InvalidTonnage(tons))
        }
    }

    /// Tonnage in whole tons.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Tonnage as a fixed-point weight.
    #[must_use]
    pub fn as_fixed(self) -> Fixed {
        Fixed::from_num(self.0)
    }

    /// Index into per-tonnage tables (0 for 10 tons).
    pub(crate) const fn table_index(self) -> usize {
        (self.0 / 5 - 2) as usize
    }
}

impl TryFrom<u32> for Tonnage {
    type Error = ConstructionError;

    fn try_from(value: u32) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Tonnage> for u32 {
    fn from(value: Tonnage) -> Self {
        value.0
    }
}

impl fmt::Display for Tonnage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} tons", self.0)
    }
}

/// Engine selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Engine type.
    pub engine_type: EngineType,
    /// Engine rating (10-500 in steps of 5 when legal).
    pub rating: u32,
}

/// Heat sink selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeatSinkConfig {
    /// Heat sink type.
    pub heat_sink_type: HeatSinkType,
    /// Total heat sinks, including engine-integral ones.
    pub count: u32,
}

/// Movement points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Movement {
    /// Walking MP.
    pub walk: u32,
    /// Jumping MP.
    #[serde(default)]
    pub jump: u32,
}

impl Movement {
    /// Running MP (walk × 1.5, rounded up).
    #[must_use]
    pub const fn run(self) -> u32 {
        self.walk.saturating_mul(3).div_ceil(2)
    }
}

/// Armor points on one location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct LocationArmor {
    /// Front facet.
    pub front: u32,
    /// Rear facet (torsos only).
    #[serde(default)]
    pub rear: u32,
}

impl LocationArmor {
    /// Armor with only a front facet.
    #[must_use]
    pub const fn front(front: u32) -> Self {
        Self { front, rear: 0 }
    }

    /// Armor with front and rear facets.
    #[must_use]
    pub const fn split(front: u32, rear: u32) -> Self {
        Self { front, rear }
    }

    /// Combined front and rear points, saturating at `u32::MAX`.
    #[must_use]
    pub const fn total(self) -> u32 {
        self.front.saturating_add(self.rear)
    }
}

/// Per-location armor points.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArmorAllocation {
    locations: BTreeMap<Location, LocationArmor>,
}

impl ArmorAllocation {
    /// Create an empty allocation.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Armor on a location (zero when unset).
    #[must_use]
    pub fn get(&self, location: Location) -> LocationArmor {
        self.locations.get(&location).copied().unwrap_or_default()
    }

    /// Set the armor on a location.
    pub fn set(&mut self, location: Location, armor: LocationArmor) {
        self.locations.insert(location, armor);
    }

    /// Builder-style [`Self::set`].
    #[must_use]
    pub fn with(mut self, location: Location, armor: LocationArmor) -> Self {
        self.set(location, armor);
        self
    }

    /// Total armor points across all locations.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.locations
            .values()
            .fold(0, |sum, a| sum.saturating_add(a.total()))
    }

    /// Iterate over every location in canonical order, including unset ones.
    pub fn iter(&self) -> impl Iterator<Item = (Location, LocationArmor)> + '_ {
        Location::ALL.into_iter().map(|loc| (loc, self.get(loc)))
    }

    /// Whether every left/right pair holds identical values.
    #[must_use]
    pub fn is_symmetric(&self) -> bool {
        Location::ALL.into_iter().all(|loc| match loc.mirror() {
            Some(partner) => self.get(loc) == self.get(partner),
            None => true,
        })
    }
}

/// Armor selection and allocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArmorConfig {
    /// Armor type.
    pub armor_type: ArmorType,
    /// Tons of armor carried.
    #[serde(with = "tons_serde")]
    pub tonnage: Fixed,
    /// Points placed on each location.
    #[serde(default)]
    pub allocation: ArmorAllocation,
}

impl ArmorConfig {
    /// Armor points bought by the armor tonnage (rounded down).
    #[must_use]
    pub fn point_budget(&self) -> u32 {
        let points = self
            .tonnage
            .saturating_mul(Fixed::from_num(self.armor_type.points_per_ton()));
        points.floor().to_num::<i64>().max(0) as u32
    }
}

/// Complete description of a BattleMech design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitConfiguration {
    /// Chassis name.
    pub chassis: String,
    /// Model designation.
    pub model: String,
    /// Unit tonnage.
    pub tonnage: Tonnage,
    /// Unit tech base.
    pub tech_base: TechBase,
    /// Whether mixed Inner Sphere / Clan parts are permitted.
    #[serde(default)]
    pub mixed_tech: bool,
    /// Rules level.
    #[serde(default)]
    pub rules_level: RulesLevel,
    /// Introduction year, used for era checks.
    #[serde(default)]
    pub year: Option<u32>,
    /// Engine.
    pub engine: EngineConfig,
    /// Gyro.
    pub gyro: GyroType,
    /// Internal structure.
    pub structure: StructureType,
    /// Cockpit.
    pub cockpit: CockpitType,
    /// Heat sinks.
    pub heat_sinks: HeatSinkConfig,
    /// Armor.
    pub armor: ArmorConfig,
    /// Movement points.
    pub movement: Movement,
}

impl UnitConfiguration {
    /// Create a standard-component design walking 4 MP with no armor.
    #[must_use]
    pub fn new(chassis: impl Into<String>, model: impl Into<String>, tonnage: Tonnage) -> Self {
        let walk = 4;
        Self {
            chassis: chassis.into(),
            model: model.into(),
            tonnage,
            tech_base: TechBase::InnerSphere,
            mixed_tech: false,
            rules_level: RulesLevel::Standard,
            year: None,
            engine: EngineConfig {
                engine_type: EngineType::Standard,
                rating: tonnage.get().saturating_mul(walk),
            },
            gyro: GyroType::Standard,
            structure: StructureType::Standard,
            cockpit: CockpitType::Standard,
            heat_sinks: HeatSinkConfig {
                heat_sink_type: HeatSinkType::Single,
                count: 10,
            },
            armor: ArmorConfig {
                armor_type: ArmorType::Standard,
                tonnage: Fixed::ZERO,
                allocation: ArmorAllocation::new(),
            },
            movement: Movement { walk, jump: 0 },
        }
    }

    /// Set the tech base.
    #[must_use]
    pub fn with_tech_base(mut self, tech_base: TechBase) -> Self {
        self.tech_base = tech_base;
        self
    }

    /// Set the walking MP and resize the engine to match.
    #[must_use]
    pub fn with_walk(mut self, walk: u32) -> Self {
        self.movement.walk = walk;
        self.engine.rating = self.tonnage.get().saturating_mul(walk);
        self
    }

    /// Set the engine.
    #[must_use]
    pub fn with_engine(mut self, engine_type: EngineType, rating: u32) -> Self {
        self.engine = EngineConfig {
            engine_type,
            rating,
        };
        self
    }

    /// Set the heat sinks.
    #[must_use]
    pub fn with_heat_sinks(mut self, heat_sink_type: HeatSinkType, count: u32) -> Self {
        self.heat_sinks = HeatSinkConfig {
            heat_sink_type,
            count,
        };
        self
    }

    /// Set the internal structure.
    #[must_use]
    pub fn with_structure(mut self, structure: StructureType) -> Self {
        self.structure = structure;
        self
    }

    /// Set the armor type and tonnage.
    #[must_use]
    pub fn with_armor(mut self, armor_type: ArmorType, tonnage: Fixed) -> Self {
        self.armor.armor_type = armor_type;
        self.armor.tonnage = tonnage;
        self
    }

    /// Whether Clan and Inner Sphere parts may be mixed.
    #[must_use]
    pub fn mixed_tech_allowed(&self) -> bool {
        self.mixed_tech || self.tech_base == TechBase::Mixed
    }

    /// Current structural component choices.
    #[must_use]
    pub fn selections(&self) -> ComponentSelections {
        ComponentSelections {
            engine: self.engine.engine_type,
            gyro: self.gyro,
            structure: self.structure,
            cockpit: self.cockpit,
            heat_sink: self.heat_sinks.heat_sink_type,
            armor: self.armor.armor_type,
        }
    }

    /// Apply structural component choices.
    pub fn apply_selections(&mut self, selections: ComponentSelections) {
        self.engine.engine_type = selections.engine;
        self.gyro = selections.gyro;
        self.structure = selections.structure;
        self.cockpit = selections.cockpit;
        self.heat_sinks.heat_sink_type = selections.heat_sink;
        self.armor.armor_type = selections.armor;
    }

    /// Special components this design must place, structure first.
    #[must_use]
    pub fn special_components(&self) -> Vec<SpecialComponentKind> {
        [
            self.structure.special_component(),
            self.armor.armor_type.special_component(),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// Check the boundary invariants that cannot be expressed in the types.
    pub fn check_boundary(&self) -> Result<()> {
        let armor_tons = self.armor.tonnage;
        if armor_tons < Fixed::ZERO || !math::is_half_ton_multiple(armor_tons) {
            return Err(ConstructionError::InvalidArmorTonnage(math::format_tons(
                armor_tons,
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{half_tons, tons};

    #[test]
    fn test_tonnage_bounds() {
        assert!(Tonnage::new(10).is_ok());
        assert!(Tonnage::new(100).is_ok());
        assert!(Tonnage::new(5).is_err());
        assert!(Tonnage::new(105).is_err());
        assert!(Tonnage::new(52).is_err());
    }

    #[test]
    fn test_tonnage_rejected_on_deserialize() {
        assert!(serde_json::from_str::<Tonnage>("50").is_ok());
        assert!(serde_json::from_str::<Tonnage>("53").is_err());
        assert!(serde_json::from_str::<Tonnage>("\"fifty\"").is_err());
    }

    #[test]
    fn test_point_budget_rounds_down() {
        let config = UnitConfiguration::new("Test", "T-1", Tonnage::new(50).unwrap())
            .with_armor(ArmorType::FerroFibrousInnerSphere, half_tons(21));
        // 10.5 t × 17 = 178.5
        assert_eq!(config.armor.point_budget(), 178);
    }

    #[test]
    fn test_armor_allocation_symmetry() {
        let mut armor = ArmorAllocation::new()
            .with(Location::LeftArm, LocationArmor::front(8))
            .with(Location::RightArm, LocationArmor::front(8));
        assert!(armor.is_symmetric());
        assert_eq!(armor.total(), 16);

        armor.set(Location::RightArm, LocationArmor::front(7));
        assert!(!armor.is_symmetric());
    }

    #[test]
    fn test_armor_totals_saturate() {
        assert_eq!(LocationArmor::split(u32::MAX, 1).total(), u32::MAX);
        let armor = ArmorAllocation::new()
            .with(Location::CenterTorso, LocationArmor::front(u32::MAX))
            .with(Location::Head, LocationArmor::front(9));
        assert_eq!(armor.total(), u32::MAX);

        let mut config = UnitConfiguration::new("Test", "T-1", Tonnage::new(50).unwrap());
        config.armor.tonnage = Fixed::MAX;
        assert_eq!(config.armor.point_budget(), i32::MAX as u32);
    }

    #[test]
    fn test_special_components_order() {
        let config = UnitConfiguration::new("Test", "T-1", Tonnage::new(50).unwrap())
            .with_structure(StructureType::EndoSteelInnerSphere)
            .with_armor(ArmorType::FerroFibrousInnerSphere, tons(8));
        assert_eq!(
            config.special_components(),
            vec![
                SpecialComponentKind::EndoSteel,
                SpecialComponentKind::FerroFibrous
            ]
        );
    }

    #[test]
    fn test_boundary_rejects_odd_armor_tonnage() {
        let config = UnitConfiguration::new("Test", "T-1", Tonnage::new(50).unwrap())
            .with_armor(ArmorType::Standard, Fixed::from_num(8.25));
        assert!(config.check_boundary().is_err());
    }

    #[test]
    fn test_run_mp() {
        assert_eq!(Movement { walk: 5, jump: 0 }.run(), 8);
        assert_eq!(Movement { walk: 4, jump: 0 }.run(), 6);
        assert_eq!(Movement { walk: u32::MAX, jump: 0 }.run(), u32::MAX / 2 + 1);
    }
}
