//! Test fixtures and helpers.
//!
//! Canonical unit configurations and equipment records for consistent
//! testing.

use fixed::types::I32F32;
use mech_core::components::{ArmorType, EngineType, HeatSinkType, StructureType};
use mech_core::equipment::{EquipmentCatalog, EquipmentCategory, EquipmentRecord};
use mech_core::tech::TechBase;
use mech_core::unit::{Tonnage, UnitConfiguration};

/// Create a fixed-point tonnage from whole tons.
#[must_use]
pub fn fixed(n: i32) -> I32F32 {
    I32F32::from_num(n)
}

/// Create a fixed-point tonnage from a float (for tests only).
///
/// Note: In engine code, never use floats.
/// This is only for convenient test setup.
#[must_use]
pub fn fixed_f(n: f64) -> I32F32 {
    I32F32::from_num(n)
}

/// A legal tonnage.
///
/// # Panics
///
/// Panics if `tons` is not a legal tonnage.
#[must_use]
pub fn tonnage(tons: u32) -> Tonnage {
    Tonnage::new(tons).expect("fixture tonnage must be legal")
}

/// Standard-component 50-ton design, walk 4, 8 tons of armor, no allocation.
#[must_use]
pub fn medium_standard() -> UnitConfiguration {
    UnitConfiguration::new("Centurion", "CN9-A", tonnage(50)).with_armor(ArmorType::Standard, fixed(8))
}

/// 100-ton assault design carrying the maximum standard armor.
#[must_use]
pub fn assault_max_armor() -> UnitConfiguration {
    UnitConfiguration::new("Atlas", "AS7-D", tonnage(100))
        .with_walk(3)
        .with_heat_sinks(HeatSinkType::Single, 20)
        .with_armor(ArmorType::Standard, fixed_f(19.5))
}

/// 50-ton Inner Sphere design using Endo Steel and Ferro-Fibrous.
#[must_use]
pub fn medium_endo_ferro() -> UnitConfiguration {
    UnitConfiguration::new("Hermes II", "HER-5S", tonnage(50))
        .with_structure(StructureType::EndoSteelInnerSphere)
        .with_armor(ArmorType::FerroFibrousInnerSphere, fixed(8))
}

/// 60-ton Clan design with an XL engine and double heat sinks.
#[must_use]
pub fn clan_heavy() -> UnitConfiguration {
    UnitConfiguration::new("Nova Cat", "Prime", tonnage(60))
        .with_tech_base(TechBase::Clan)
        .with_walk(5)
        .with_engine(EngineType::XlClan, 300)
        .with_heat_sinks(HeatSinkType::DoubleClan, 12)
        .with_armor(ArmorType::FerroFibrousClan, fixed(10))
}

/// Inner Sphere medium laser.
#[must_use]
pub fn medium_laser() -> EquipmentRecord {
    EquipmentRecord::new("is_medium_laser", "Medium Laser", EquipmentCategory::EnergyWeapon, fixed(1), 1)
        .with_heat(3)
        .with_tech_base(TechBase::InnerSphere)
}

/// Particle projector cannon.
#[must_use]
pub fn ppc() -> EquipmentRecord {
    EquipmentRecord::new("is_ppc", "PPC", EquipmentCategory::EnergyWeapon, fixed(7), 3)
        .with_heat(10)
        .with_tech_base(TechBase::InnerSphere)
}

/// Clan ER large laser.
#[must_use]
pub fn clan_er_large_laser() -> EquipmentRecord {
    EquipmentRecord::new("clan_er_large_laser", "ER Large Laser", EquipmentCategory::EnergyWeapon, fixed(4), 1)
        .with_heat(12)
        .with_tech_base(TechBase::Clan)
}

/// Autocannon/20.
#[must_use]
pub fn autocannon_20() -> EquipmentRecord {
    EquipmentRecord::new("is_ac20", "AC/20", EquipmentCategory::BallisticWeapon, fixed(14), 10)
        .with_heat(7)
        .with_tech_base(TechBase::InnerSphere)
}

/// Catalog holding every fixture record.
#[must_use]
pub fn sample_catalog() -> EquipmentCatalog {
    EquipmentCatalog::from_records([medium_laser(), ppc(), clan_er_large_laser(), autocannon_20()])
}
