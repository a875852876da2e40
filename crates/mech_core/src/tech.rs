//! Tech base, rules level and component compatibility.
//!
//! Compatibility is deliberately asymmetric: Inner Sphere parts fit any
//! unit, Clan parts need a Clan unit or mixed tech.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::components::{
    ArmorType, CockpitType, ComponentCategory, ComponentVariant, EngineType, GyroType,
    HeatSinkType, StructureType,
};

/// Manufacturing lineage of a unit or component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TechBase {
    /// Inner Sphere.
    #[default]
    InnerSphere,
    /// Clan.
    Clan,
    /// Mixed Inner Sphere and Clan.
    Mixed,
}

impl fmt::Display for TechBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::InnerSphere => "Inner Sphere",
            Self::Clan => "Clan",
            Self::Mixed => "Mixed",
        };
        f.write_str(name)
    }
}

/// Tournament rules level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RulesLevel {
    /// Introductory.
    Introductory,
    /// Standard.
    #[default]
    Standard,
    /// Advanced.
    Advanced,
    /// Experimental.
    Experimental,
}

/// Check whether a component of one tech base may be mounted on a unit.
///
/// True when the bases match, when mixed tech is allowed, or when the
/// component is Inner Sphere. A Clan component on an Inner Sphere unit
/// without mixed tech is rejected.
#[must_use]
pub fn is_compatible(component: TechBase, unit: TechBase, mixed_tech_allowed: bool) -> bool {
    component == unit || mixed_tech_allowed || component == TechBase::InnerSphere
}

/// Check a variant's compatibility; tech-neutral variants always pass.
#[must_use]
pub fn is_variant_compatible<T: ComponentVariant>(
    variant: T,
    unit: TechBase,
    mixed_tech_allowed: bool,
) -> bool {
    variant
        .tech_base()
        .map_or(true, |base| is_compatible(base, unit, mixed_tech_allowed))
}

/// Variants of a category legal for the unit, in catalog order.
#[must_use]
pub fn available_options<T: ComponentVariant>(unit: TechBase, mixed_tech_allowed: bool) -> Vec<T> {
    T::variants()
        .iter()
        .copied()
        .filter(|v| is_variant_compatible(*v, unit, mixed_tech_allowed))
        .collect()
}

/// Display names of the legal variants of a category, for option lists.
#[must_use]
pub fn available_option_names(
    category: ComponentCategory,
    unit: TechBase,
    mixed_tech_allowed: bool,
) -> Vec<&'static str> {
    fn names<T: ComponentVariant>(unit: TechBase, mixed: bool) -> Vec<&'static str> {
        available_options::<T>(unit, mixed)
            .into_iter()
            .map(ComponentVariant::name)
            .collect()
    }

    match category {
        ComponentCategory::Engine => names::<EngineType>(unit, mixed_tech_allowed),
        ComponentCategory::Gyro => names::<GyroType>(unit, mixed_tech_allowed),
        ComponentCategory::Structure => names::<StructureType>(unit, mixed_tech_allowed),
        ComponentCategory::Cockpit => names::<CockpitType>(unit, mixed_tech_allowed),
        ComponentCategory::HeatSink => names::<HeatSinkType>(unit, mixed_tech_allowed),
        ComponentCategory::Armor => names::<ArmorType>(unit, mixed_tech_allowed),
    }
}

/// The structural component choices of a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ComponentSelections {
    /// Engine type.
    pub engine: EngineType,
    /// Gyro type.
    pub gyro: GyroType,
    /// Structure type.
    pub structure: StructureType,
    /// Cockpit type.
    pub cockpit: CockpitType,
    /// Heat sink type.
    pub heat_sink: HeatSinkType,
    /// Armor type.
    pub armor: ArmorType,
}

/// Result of [`validated_selections`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionOutcome {
    /// Selections with every incompatible choice replaced.
    pub selections: ComponentSelections,
    /// Categories whose selection was substituted.
    pub substituted: Vec<ComponentCategory>,
}

fn validate_one<T: ComponentVariant>(
    current: T,
    unit: TechBase,
    mixed: bool,
    substituted: &mut Vec<ComponentCategory>,
) -> T {
    if is_variant_compatible(current, unit, mixed) {
        return current;
    }
    match available_options::<T>(unit, mixed).first() {
        Some(&first) => {
            substituted.push(T::CATEGORY);
            first
        }
        None => current,
    }
}

/// Replace each incompatible selection with the first legal option of its
/// category.
#[must_use]
pub fn validated_selections(
    current: ComponentSelections,
    unit: TechBase,
    mixed_tech_allowed: bool,
) -> SelectionOutcome {
    let mut substituted = Vec::new();
    let selections = ComponentSelections {
        engine: validate_one(current.engine, unit, mixed_tech_allowed, &mut substituted),
        gyro: validate_one(current.gyro, unit, mixed_tech_allowed, &mut substituted),
        structure: validate_one(current.structure, unit, mixed_tech_allowed, &mut substituted),
        cockpit: validate_one(current.cockpit, unit, mixed_tech_allowed, &mut substituted),
        heat_sink: validate_one(current.heat_sink, unit, mixed_tech_allowed, &mut substituted),
        armor: validate_one(current.armor, unit, mixed_tech_allowed, &mut substituted),
    };
    SelectionOutcome {
        selections,
        substituted,
    }
}
