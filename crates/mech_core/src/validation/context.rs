//! Input to the rule set.
//!
//! Every section is optional so that partial designs (and isolated test
//! inputs) can be validated. Rules skip sections that are absent.

use serde::{Deserialize, Serialize};

use crate::components::{ArmorType, ComponentVariant, EngineType, HeatSinkType};
use crate::equipment::EquipmentAllocation;
use crate::math::{option_tons_serde, Fixed};
use crate::special::SpecialAllocation;
use crate::system::SlotBreakdown;
use crate::tech::TechBase;
use crate::unit::{ArmorAllocation, Tonnage, UnitConfiguration};
use crate::weight::WeightBreakdown;

/// Heat sink section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HeatSinkSection {
    /// Total heat sinks, `None` when the design does not say.
    pub count: Option<u32>,
    /// Heat sink type.
    pub heat_sink_type: Option<HeatSinkType>,
}

/// Armor section.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ArmorSection {
    /// Points per location.
    pub allocation: ArmorAllocation,
    /// Armor type, when known.
    pub armor_type: Option<ArmorType>,
    /// Armor tonnage, when known.
    #[serde(default, with = "option_tons_serde")]
    pub armor_tonnage: Option<Fixed>,
}

/// Engine section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSection {
    /// Engine rating.
    pub rating: u32,
    /// Engine type, when known.
    pub engine_type: Option<EngineType>,
}

/// One component's tech base, for compatibility checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentTech {
    /// Configuration path of the component.
    pub path: String,
    /// Display name.
    pub name: String,
    /// Tech base of the component.
    pub tech_base: TechBase,
}

/// Tech section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechSection {
    /// Unit tech base.
    pub unit_tech_base: TechBase,
    /// Whether mixed tech is allowed.
    pub mixed_tech_allowed: bool,
    /// Components that carry a tech base.
    pub components: Vec<ComponentTech>,
}

/// One component's introduction date, for era checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentEra {
    /// Configuration path of the component.
    pub path: String,
    /// Display name.
    pub name: String,
    /// Year the component becomes available.
    pub introduction_year: u32,
}

/// Era section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EraSection {
    /// Unit year, `None` when the design has no date.
    pub year: Option<u32>,
    /// Dated components.
    pub components: Vec<ComponentEra>,
}

/// Movement section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementSection {
    /// Walking MP.
    pub walk: u32,
    /// Jumping MP.
    pub jump: u32,
}

/// Everything a rule may look at.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ValidationContext {
    /// Unit tonnage.
    pub tonnage: Option<Tonnage>,
    /// Total weight in tons.
    #[serde(default, with = "option_tons_serde")]
    pub total_weight: Option<Fixed>,
    /// Critical slots demanded.
    pub used_slots: Option<u32>,
    /// Heat sinks.
    pub heat_sinks: Option<HeatSinkSection>,
    /// Armor.
    pub armor: Option<ArmorSection>,
    /// Engine.
    pub engine: Option<EngineSection>,
    /// Tech base data.
    pub tech: Option<TechSection>,
    /// Era data.
    pub era: Option<EraSection>,
    /// Movement.
    pub movement: Option<MovementSection>,
    /// Special component placements.
    #[serde(default)]
    pub special_allocations: Vec<SpecialAllocation>,
}

fn component_entry<T: ComponentVariant>(variant: T) -> (String, &'static str, Option<TechBase>, u32) {
    (
        T::CATEGORY.path().to_string(),
        variant.name(),
        variant.tech_base(),
        variant.introduction_year(),
    )
}

impl ValidationContext {
    /// An empty context; every rule passes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the tonnage.
    #[must_use]
    pub fn with_tonnage(mut self, tonnage: Tonnage) -> Self {
        self.tonnage = Some(tonnage);
        self
    }

    /// Set the total weight.
    #[must_use]
    pub fn with_total_weight(mut self, weight: Fixed) -> Self {
        self.total_weight = Some(weight);
        self
    }

    /// Set the used critical slots.
    #[must_use]
    pub fn with_used_slots(mut self, slots: u32) -> Self {
        self.used_slots = Some(slots);
        self
    }

    /// Set the heat sink section.
    #[must_use]
    pub fn with_heat_sinks(mut self, count: Option<u32>, heat_sink_type: Option<HeatSinkType>) -> Self {
        self.heat_sinks = Some(HeatSinkSection {
            count,
            heat_sink_type,
        });
        self
    }

    /// Set the engine rating.
    #[must_use]
    pub fn with_engine_rating(mut self, rating: u32) -> Self {
        self.engine = Some(EngineSection {
            rating,
            engine_type: None,
        });
        self
    }

    /// Set the armor allocation.
    #[must_use]
    pub fn with_armor(mut self, allocation: ArmorAllocation) -> Self {
        self.armor = Some(ArmorSection {
            allocation,
            ..ArmorSection::default()
        });
        self
    }

    /// Set the movement section.
    #[must_use]
    pub fn with_movement(mut self, walk: u32, jump: u32) -> Self {
        self.movement = Some(MovementSection { walk, jump });
        self
    }

    /// Add a special component placement.
    #[must_use]
    pub fn with_special_allocation(mut self, allocation: SpecialAllocation) -> Self {
        self.special_allocations.push(allocation);
        self
    }

    /// Build a fully populated context for a design.
    #[must_use]
    pub fn for_unit(
        config: &UnitConfiguration,
        equipment: &[EquipmentAllocation],
        special_allocations: Vec<SpecialAllocation>,
    ) -> Self {
        let structural = [
            component_entry(config.engine.engine_type),
            component_entry(config.gyro),
            component_entry(config.structure),
            component_entry(config.cockpit),
            component_entry(config.heat_sinks.heat_sink_type),
            component_entry(config.armor.armor_type),
        ];

        let mut tech_components: Vec<ComponentTech> = structural
            .iter()
            .filter_map(|(path, name, tech_base, _)| {
                tech_base.map(|tech_base| ComponentTech {
                    path: path.clone(),
                    name: (*name).to_string(),
                    tech_base,
                })
            })
            .collect();
        tech_components.extend(equipment.iter().filter_map(|e| {
            e.tech_base.map(|tech_base| ComponentTech {
                path: format!("equipment.{}", e.instance_id),
                name: e.name.clone(),
                tech_base,
            })
        }));

        let era_components = structural
            .iter()
            .map(|(path, name, _, year)| ComponentEra {
                path: path.clone(),
                name: (*name).to_string(),
                introduction_year: *year,
            })
            .collect();

        Self {
            tonnage: Some(config.tonnage),
            total_weight: Some(WeightBreakdown::for_unit(config, equipment).total()),
            used_slots: Some(SlotBreakdown::for_unit(config, equipment).total()),
            heat_sinks: Some(HeatSinkSection {
                count: Some(config.heat_sinks.count),
                heat_sink_type: Some(config.heat_sinks.heat_sink_type),
            }),
            armor: Some(ArmorSection {
                allocation: config.armor.allocation.clone(),
                armor_type: Some(config.armor.armor_type),
                armor_tonnage: Some(config.armor.tonnage),
            }),
            engine: Some(EngineSection {
                rating: config.engine.rating,
                engine_type: Some(config.engine.engine_type),
            }),
            tech: Some(TechSection {
                unit_tech_base: config.tech_base,
                mixed_tech_allowed: config.mixed_tech_allowed(),
                components: tech_components,
            }),
            era: Some(EraSection {
                year: config.year,
                components: era_components,
            }),
            movement: Some(MovementSection {
                walk: config.movement.walk,
                jump: config.movement.jump,
            }),
            special_allocations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::StructureType;

    #[test]
    fn test_new_context_is_empty() {
        let context = ValidationContext::new();
        assert!(context.tonnage.is_none());
        assert!(context.heat_sinks.is_none());
        assert!(context.special_allocations.is_empty());
    }

    #[test]
    fn test_for_unit_lists_tech_components() {
        let config = UnitConfiguration::new("Test", "T-1", Tonnage::new(50).unwrap())
            .with_engine(EngineType::XlClan, 200)
            .with_structure(StructureType::EndoSteelInnerSphere);
        let context = ValidationContext::for_unit(&config, &[], Vec::new());

        let tech = context.tech.unwrap();
        let paths: Vec<&str> = tech.components.iter().map(|c| c.path.as_str()).collect();
        assert_eq!(paths, vec!["engine.type", "structure"]);
        assert_eq!(tech.components[0].tech_base, TechBase::Clan);

        assert_eq!(context.era.unwrap().components.len(), 6);
        // system 35 (XL side torsos), endo steel 10, external heat sinks 2
        assert_eq!(context.used_slots, Some(47));
    }

    #[test]
    fn test_context_json_shape() {
        let context = ValidationContext::new()
            .with_tonnage(Tonnage::new(50).unwrap())
            .with_total_weight(Fixed::from_num(55));
        let json = serde_json::to_string(&context).unwrap();
        let back: ValidationContext = serde_json::from_str(&json).unwrap();
        assert_eq!(back, context);
    }
}
