//! Structural component variants: engine, gyro, structure, cockpit,
//! heat sinks and armor.
//!
//! Each variant knows its tech base (or is tech-neutral), its introduction
//! year and the numbers the weight and slot calculations need. The variant
//! tables double as the static catalog the tech-base resolver filters.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::special::SpecialComponentKind;
use crate::tech::TechBase;

/// Category of a structural component.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum ComponentCategory {
    /// Engine.
    Engine,
    /// Gyro.
    Gyro,
    /// Internal structure.
    Structure,
    /// Cockpit.
    Cockpit,
    /// Heat sinks.
    HeatSink,
    /// Armor.
    Armor,
}

impl ComponentCategory {
    /// All categories in selection order.
    pub const ALL: [ComponentCategory; 6] = [
        ComponentCategory::Engine,
        ComponentCategory::Gyro,
        ComponentCategory::Structure,
        ComponentCategory::Cockpit,
        ComponentCategory::HeatSink,
        ComponentCategory::Armor,
    ];

    /// Configuration path of the selection in a unit.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Engine => "engine.type",
            Self::Gyro => "gyro",
            Self::Structure => "structure",
            Self::Cockpit => "cockpit",
            Self::HeatSink => "heat_sinks.type",
            Self::Armor => "armor.type",
        }
    }
}

impl fmt::Display for ComponentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Engine => "engine",
            Self::Gyro => "gyro",
            Self::Structure => "structure",
            Self::Cockpit => "cockpit",
            Self::HeatSink => "heat sink",
            Self::Armor => "armor",
        };
        f.write_str(name)
    }
}

/// A selectable variant within one component category.
pub trait ComponentVariant: Copy + Eq + fmt::Debug + 'static {
    /// Category this variant belongs to.
    const CATEGORY: ComponentCategory;

    /// Every variant of the category, in catalog order.
    fn variants() -> &'static [Self];

    /// Tech base of the variant, `None` for tech-neutral ("Standard") parts.
    fn tech_base(self) -> Option<TechBase>;

    /// Year the variant becomes available.
    fn introduction_year(self) -> u32;

    /// Display name.
    fn name(self) -> &'static str;
}

/// Engine variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EngineType {
    /// Standard fusion engine.
    #[default]
    Standard,
    /// Inner Sphere extra-light fusion engine.
    XlInnerSphere,
    /// Clan extra-light fusion engine.
    XlClan,
    /// Light fusion engine.
    Light,
    /// Compact fusion engine.
    Compact,
    /// Internal combustion engine.
    Ice,
}

impl EngineType {
    /// Weight relative to a standard fusion engine, in percent.
    #[must_use]
    pub const fn weight_percent(self) -> u32 {
        match self {
            Self::Standard => 100,
            Self::XlInnerSphere | Self::XlClan => 50,
            Self::Light => 75,
            Self::Compact => 150,
            Self::Ice => 200,
        }
    }

    /// Critical slots taken in the center torso.
    #[must_use]
    pub const fn center_torso_slots(self) -> u32 {
        match self {
            Self::Compact => 3,
            _ => 6,
        }
    }

    /// Critical slots taken in each side torso.
    #[must_use]
    pub const fn side_torso_slots(self) -> u32 {
        match self {
            Self::XlInnerSphere => 3,
            Self::XlClan | Self::Light => 2,
            _ => 0,
        }
    }

    /// Whether the engine is a fusion design (grants integral heat sinks).
    #[must_use]
    pub const fn is_fusion(self) -> bool {
        !matches!(self, Self::Ice)
    }
}

impl ComponentVariant for EngineType {
    const CATEGORY: ComponentCategory = ComponentCategory::Engine;

    fn variants() -> &'static [Self] {
        &[
            Self::Standard,
            Self::XlInnerSphere,
            Self::XlClan,
            Self::Light,
            Self::Compact,
            Self::Ice,
        ]
    }

    fn tech_base(self) -> Option<TechBase> {
        match self {
            Self::Standard | Self::Ice => None,
            Self::XlInnerSphere | Self::Light | Self::Compact => Some(TechBase::InnerSphere),
            Self::XlClan => Some(TechBase::Clan),
        }
    }

    fn introduction_year(self) -> u32 {
        match self {
            Self::Ice => 1950,
            Self::Standard => 2300,
            Self::XlClan => 2827,
            Self::XlInnerSphere => 3035,
            Self::Light => 3062,
            Self::Compact => 3068,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Standard => "Standard Fusion Engine",
            Self::XlInnerSphere => "XL Engine (IS)",
            Self::XlClan => "XL Engine (Clan)",
            Self::Light => "Light Engine",
            Self::Compact => "Compact Engine",
            Self::Ice => "I.C.E.",
        }
    }
}

/// Gyro variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GyroType {
    /// Standard gyro.
    #[default]
    Standard,
    /// Extra-light gyro.
    Xl,
    /// Compact gyro.
    Compact,
    /// Heavy-duty gyro.
    HeavyDuty,
}

impl GyroType {
    /// Critical slots taken in the center torso.
    #[must_use]
    pub const fn slots(self) -> u32 {
        match self {
            Self::Standard | Self::HeavyDuty => 4,
            Self::Xl => 6,
            Self::Compact => 2,
        }
    }

    /// Weight relative to a standard gyro, in percent.
    #[must_use]
    pub const fn weight_percent(self) -> u32 {
        match self {
            Self::Standard => 100,
            Self::Xl => 50,
            Self::Compact => 150,
            Self::HeavyDuty => 200,
        }
    }
}

impl ComponentVariant for GyroType {
    const CATEGORY: ComponentCategory = ComponentCategory::Gyro;

    fn variants() -> &'static [Self] {
        &[Self::Standard, Self::Xl, Self::Compact, Self::HeavyDuty]
    }

    fn tech_base(self) -> Option<TechBase> {
        match self {
            Self::Standard => None,
            _ => Some(TechBase::InnerSphere),
        }
    }

    fn introduction_year(self) -> u32 {
        match self {
            Self::Standard => 2300,
            Self::Xl | Self::HeavyDuty => 3067,
            Self::Compact => 3068,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Standard => "Standard Gyro",
            Self::Xl => "XL Gyro",
            Self::Compact => "Compact Gyro",
            Self::HeavyDuty => "Heavy-Duty Gyro",
        }
    }
}

/// Internal structure variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum StructureType {
    /// Standard structure.
    #[default]
    Standard,
    /// Inner Sphere Endo Steel.
    EndoSteelInnerSphere,
    /// Clan Endo Steel.
    EndoSteelClan,
}

impl StructureType {
    /// Structure weight as a percentage of unit tonnage.
    #[must_use]
    pub const fn weight_percent(self) -> u32 {
        match self {
            Self::Standard => 10,
            Self::EndoSteelInnerSphere | Self::EndoSteelClan => 5,
        }
    }

    /// Multi-slot special component this structure requires, if any.
    #[must_use]
    pub const fn special_component(self) -> Option<SpecialComponentKind> {
        match self {
            Self::Standard => None,
            Self::EndoSteelInnerSphere | Self::EndoSteelClan => {
                Some(SpecialComponentKind::EndoSteel)
            }
        }
    }
}

impl ComponentVariant for StructureType {
    const CATEGORY: ComponentCategory = ComponentCategory::Structure;

    fn variants() -> &'static [Self] {
        &[
            Self::Standard,
            Self::EndoSteelInnerSphere,
            Self::EndoSteelClan,
        ]
    }

    fn tech_base(self) -> Option<TechBase> {
        match self {
            Self::Standard => None,
            Self::EndoSteelInnerSphere => Some(TechBase::InnerSphere),
            Self::EndoSteelClan => Some(TechBase::Clan),
        }
    }

    fn introduction_year(self) -> u32 {
        match self {
            Self::Standard => 2439,
            Self::EndoSteelClan => 2827,
            Self::EndoSteelInnerSphere => 3035,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Standard => "Standard Structure",
            Self::EndoSteelInnerSphere => "Endo Steel (IS)",
            Self::EndoSteelClan => "Endo Steel (Clan)",
        }
    }
}

/// Cockpit variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CockpitType {
    /// Standard cockpit.
    #[default]
    Standard,
    /// Small cockpit.
    Small,
    /// Torso-mounted cockpit.
    TorsoMounted,
}

impl CockpitType {
    /// Cockpit weight in whole tons.
    #[must_use]
    pub const fn weight_tons(self) -> i32 {
        match self {
            Self::Standard => 3,
            Self::Small => 2,
            Self::TorsoMounted => 4,
        }
    }
}

impl ComponentVariant for CockpitType {
    const CATEGORY: ComponentCategory = ComponentCategory::Cockpit;

    fn variants() -> &'static [Self] {
        &[Self::Standard, Self::Small, Self::TorsoMounted]
    }

    fn tech_base(self) -> Option<TechBase> {
        match self {
            Self::Standard => None,
            Self::Small | Self::TorsoMounted => Some(TechBase::InnerSphere),
        }
    }

    fn introduction_year(self) -> u32 {
        match self {
            Self::Standard => 2468,
            Self::TorsoMounted => 3053,
            Self::Small => 3067,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Standard => "Standard Cockpit",
            Self::Small => "Small Cockpit",
            Self::TorsoMounted => "Torso-Mounted Cockpit",
        }
    }
}

/// Heat sink variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum HeatSinkType {
    /// Single heat sink.
    #[default]
    Single,
    /// Inner Sphere double heat sink.
    DoubleInnerSphere,
    /// Clan double heat sink.
    DoubleClan,
}

impl HeatSinkType {
    /// Critical slots per heat sink mounted outside the engine.
    #[must_use]
    pub const fn slots(self) -> u32 {
        match self {
            Self::Single => 1,
            Self::DoubleInnerSphere => 3,
            Self::DoubleClan => 2,
        }
    }

    /// Heat dissipated per sink.
    #[must_use]
    pub const fn dissipation(self) -> u32 {
        match self {
            Self::Single => 1,
            Self::DoubleInnerSphere | Self::DoubleClan => 2,
        }
    }
}

impl ComponentVariant for HeatSinkType {
    const CATEGORY: ComponentCategory = ComponentCategory::HeatSink;

    fn variants() -> &'static [Self] {
        &[Self::Single, Self::DoubleInnerSphere, Self::DoubleClan]
    }

    fn tech_base(self) -> Option<TechBase> {
        match self {
            Self::Single => None,
            Self::DoubleInnerSphere => Some(TechBase::InnerSphere),
            Self::DoubleClan => Some(TechBase::Clan),
        }
    }

    fn introduction_year(self) -> u32 {
        match self {
            Self::Single => 2022,
            Self::DoubleClan => 2827,
            Self::DoubleInnerSphere => 3040,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Single => "Single Heat Sink",
            Self::DoubleInnerSphere => "Double Heat Sink (IS)",
            Self::DoubleClan => "Double Heat Sink (Clan)",
        }
    }
}

/// Armor variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ArmorType {
    /// Standard armor.
    #[default]
    Standard,
    /// Inner Sphere Ferro-Fibrous.
    FerroFibrousInnerSphere,
    /// Clan Ferro-Fibrous.
    FerroFibrousClan,
}

impl ArmorType {
    /// Armor points per ton relative to standard, in percent.
    #[must_use]
    pub const fn protection_percent(self) -> u32 {
        match self {
            Self::Standard => 100,
            Self::FerroFibrousInnerSphere => 112,
            Self::FerroFibrousClan => 120,
        }
    }

    /// Armor points per ton (16 × multiplier, rounded down).
    #[must_use]
    pub const fn points_per_ton(self) -> u32 {
        16 * self.protection_percent() / 100
    }

    /// Multi-slot special component this armor requires, if any.
    #[must_use]
    pub const fn special_component(self) -> Option<SpecialComponentKind> {
        match self {
            Self::Standard => None,
            Self::FerroFibrousInnerSphere | Self::FerroFibrousClan => {
                Some(SpecialComponentKind::FerroFibrous)
            }
        }
    }
}

impl ComponentVariant for ArmorType {
    const CATEGORY: ComponentCategory = ComponentCategory::Armor;

    fn variants() -> &'static [Self] {
        &[
            Self::Standard,
            Self::FerroFibrousInnerSphere,
            Self::FerroFibrousClan,
        ]
    }

    fn tech_base(self) -> Option<TechBase> {
        match self {
            Self::Standard => None,
            Self::FerroFibrousInnerSphere => Some(TechBase::InnerSphere),
            Self::FerroFibrousClan => Some(TechBase::Clan),
        }
    }

    fn introduction_year(self) -> u32 {
        match self {
            Self::Standard => 2470,
            Self::FerroFibrousClan => 2820,
            Self::FerroFibrousInnerSphere => 3040,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Standard => "Standard Armor",
            Self::FerroFibrousInnerSphere => "Ferro-Fibrous (IS)",
            Self::FerroFibrousClan => "Ferro-Fibrous (Clan)",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points_per_ton() {
        assert_eq!(ArmorType::Standard.points_per_ton(), 16);
        assert_eq!(ArmorType::FerroFibrousInnerSphere.points_per_ton(), 17);
        assert_eq!(ArmorType::FerroFibrousClan.points_per_ton(), 19);
    }

    #[test]
    fn test_engine_slot_footprint() {
        assert_eq!(EngineType::Standard.side_torso_slots(), 0);
        assert_eq!(EngineType::XlInnerSphere.side_torso_slots(), 3);
        assert_eq!(EngineType::XlClan.side_torso_slots(), 2);
        assert_eq!(EngineType::Compact.center_torso_slots(), 3);
    }

    #[test]
    fn test_standard_variants_are_tech_neutral() {
        assert_eq!(EngineType::Standard.tech_base(), None);
        assert_eq!(GyroType::Standard.tech_base(), None);
        assert_eq!(StructureType::Standard.tech_base(), None);
        assert_eq!(CockpitType::Standard.tech_base(), None);
        assert_eq!(HeatSinkType::Single.tech_base(), None);
        assert_eq!(ArmorType::Standard.tech_base(), None);
    }

    #[test]
    fn test_special_component_mapping() {
        assert_eq!(
            StructureType::EndoSteelClan.special_component(),
            Some(SpecialComponentKind::EndoSteel)
        );
        assert_eq!(
            ArmorType::FerroFibrousInnerSphere.special_component(),
            Some(SpecialComponentKind::FerroFibrous)
        );
        assert_eq!(ArmorType::Standard.special_component(), None);
    }

    #[test]
    fn test_variant_tables_start_with_default() {
        assert_eq!(EngineType::variants()[0], EngineType::default());
        assert_eq!(GyroType::variants()[0], GyroType::default());
        assert_eq!(HeatSinkType::variants()[0], HeatSinkType::default());
    }
}
