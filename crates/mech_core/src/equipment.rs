//! Equipment catalog records and mounted equipment instances.
//!
//! Catalog records are read-only facts supplied from outside the engine.
//! Mounting a record creates an [`EquipmentAllocation`] with its own
//! [`InstanceId`]; the instance keeps that id across every re-derivation
//! and snapshot round trip.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ConstructionError, Result};
use crate::location::Location;
use crate::math::{tons_serde, Fixed};
use crate::tech::TechBase;

/// Identity of one mounted piece of equipment.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct InstanceId(pub u32);

impl InstanceId {
    /// Create an instance ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Broad equipment grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EquipmentCategory {
    /// Lasers, PPCs and other direct-fire energy weapons.
    EnergyWeapon,
    /// Autocannons, gauss rifles, machine guns.
    BallisticWeapon,
    /// Missile launchers.
    MissileWeapon,
    /// Ammunition bins.
    Ammunition,
    /// Heat sinks mounted outside the engine.
    HeatSink,
    /// Jump jets.
    JumpJet,
    /// Electronics, CASE, MASC and everything else.
    Misc,
}

/// Static catalog entry for a piece of equipment.
///
/// # Example RON
///
/// ```ron
/// EquipmentRecord(
///     id: "medium_laser",
///     name: "Medium Laser",
///     category: EnergyWeapon,
///     weight: 1.0,
///     critical_slots: 1,
///     heat: 3,
///     tech_base: Some(InnerSphere),
/// )
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentRecord {
    /// Unique catalog identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Equipment grouping.
    pub category: EquipmentCategory,
    /// Weight in tons.
    #[serde(with = "tons_serde")]
    pub weight: Fixed,
    /// Contiguous critical slots occupied.
    pub critical_slots: u32,
    /// Heat generated when fired.
    #[serde(default)]
    pub heat: u32,
    /// Tech base, `None` for tech-neutral equipment.
    #[serde(default)]
    pub tech_base: Option<TechBase>,
    /// Alternate names the record is known by in unit files.
    #[serde(default)]
    pub variants: Vec<String>,
}

impl EquipmentRecord {
    /// Create a record with no heat, tech base or variants.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: EquipmentCategory,
        weight: Fixed,
        critical_slots: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category,
            weight,
            critical_slots,
            heat: 0,
            tech_base: None,
            variants: Vec::new(),
        }
    }

    /// Set the heat.
    #[must_use]
    pub fn with_heat(mut self, heat: u32) -> Self {
        self.heat = heat;
        self
    }

    /// Set the tech base.
    #[must_use]
    pub fn with_tech_base(mut self, tech_base: TechBase) -> Self {
        self.tech_base = Some(tech_base);
        self
    }

    /// Whether `name` matches the display name, id or a variant name.
    #[must_use]
    pub fn is_known_as(&self, name: &str) -> bool {
        let name = name.trim();
        self.name.eq_ignore_ascii_case(name)
            || self.id.eq_ignore_ascii_case(name)
            || self.variants.iter().any(|v| v.eq_ignore_ascii_case(name))
    }
}

/// A mounted equipment instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentAllocation {
    /// Instance identity.
    pub instance_id: InstanceId,
    /// Catalog id of the record this instance was created from.
    pub equipment_id: String,
    /// Display name.
    pub name: String,
    /// Weight in tons.
    #[serde(with = "tons_serde")]
    pub weight: Fixed,
    /// Contiguous critical slots occupied.
    pub critical_slots: u32,
    /// Tech base, `None` for tech-neutral equipment.
    #[serde(default)]
    pub tech_base: Option<TechBase>,
    /// Location, when placed.
    #[serde(default)]
    pub location: Option<Location>,
    /// First slot index, when placed.
    #[serde(default)]
    pub start_slot: Option<usize>,
}

impl EquipmentAllocation {
    /// Create an unplaced instance of a record.
    #[must_use]
    pub fn from_record(instance_id: InstanceId, record: &EquipmentRecord) -> Self {
        Self {
            instance_id,
            equipment_id: record.id.clone(),
            name: record.name.clone(),
            weight: record.weight,
            critical_slots: record.critical_slots,
            tech_base: record.tech_base,
            location: None,
            start_slot: None,
        }
    }

    /// Whether the instance occupies critical slots.
    #[must_use]
    pub const fn is_allocated(&self) -> bool {
        self.location.is_some()
    }

    /// Clear the placement.
    pub fn unplace(&mut self) {
        self.location = None;
        self.start_slot = None;
    }
}

/// Read-only equipment catalog keyed by record id.
#[derive(Debug, Clone, Default)]
pub struct EquipmentCatalog {
    records: BTreeMap<String, EquipmentRecord>,
}

impl EquipmentCatalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from records; later records replace earlier ones
    /// with the same id.
    #[must_use]
    pub fn from_records(records: impl IntoIterator<Item = EquipmentRecord>) -> Self {
        let mut catalog = Self::new();
        for record in records {
            catalog.insert(record);
        }
        catalog
    }

    /// Parse a RON list of [`EquipmentRecord`]s.
    pub fn from_ron_str(source: &str) -> Result<Self> {
        let records: Vec<EquipmentRecord> =
            ron::from_str(source).map_err(|e| ConstructionError::CatalogParse(e.to_string()))?;
        Ok(Self::from_records(records))
    }

    /// Add or replace a record.
    pub fn insert(&mut self, record: EquipmentRecord) {
        self.records.insert(record.id.clone(), record);
    }

    /// Look up a record by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&EquipmentRecord> {
        self.records.get(id)
    }

    /// Look up a record by display name, id or variant name.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<&EquipmentRecord> {
        self.records.values().find(|r| r.is_known_as(name))
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate over records in id order.
    pub fn iter(&self) -> impl Iterator<Item = &EquipmentRecord> {
        self.records.values()
    }
}

/// Errors from placing equipment into critical slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotAllocationError {
    /// No equipment instance with that id.
    UnknownInstance,
    /// The instance already occupies slots.
    AlreadyAllocated,
    /// The slot range runs past the end of the location.
    InvalidSlotRange,
    /// Some slot in the range is occupied.
    SlotsOccupied,
    /// The location has too few free slots.
    LocationFull,
}

impl fmt::Display for SlotAllocationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownInstance => write!(f, "Equipment instance not found"),
            Self::AlreadyAllocated => write!(f, "Equipment is already allocated"),
            Self::InvalidSlotRange => write!(f, "Slot range exceeds location capacity"),
            Self::SlotsOccupied => write!(f, "Target slots are occupied"),
            Self::LocationFull => write!(f, "Location has no room for this equipment"),
        }
    }
}

impl std::error::Error for SlotAllocationError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::tons;

    const CATALOG_RON: &str = r#"[
        EquipmentRecord(
            id: "medium_laser",
            name: "Medium Laser",
            category: EnergyWeapon,
            weight: 1.0,
            critical_slots: 1,
            heat: 3,
            tech_base: Some(InnerSphere),
            variants: ["ISMediumLaser"],
        ),
        EquipmentRecord(
            id: "ac_20",
            name: "AC/20",
            category: BallisticWeapon,
            weight: 14.0,
            critical_slots: 10,
            heat: 7,
        ),
    ]"#;

    #[test]
    fn test_catalog_from_ron() {
        let catalog = EquipmentCatalog::from_ron_str(CATALOG_RON).unwrap();
        assert_eq!(catalog.len(), 2);

        let laser = catalog.get("medium_laser").unwrap();
        assert_eq!(laser.weight, tons(1));
        assert_eq!(laser.tech_base, Some(TechBase::InnerSphere));

        let ac = catalog.find_by_name("ac/20").unwrap();
        assert_eq!(ac.critical_slots, 10);
        assert_eq!(ac.tech_base, None);
    }

    #[test]
    fn test_catalog_rejects_garbage() {
        let result = EquipmentCatalog::from_ron_str("[EquipmentRecord(id: 3)]");
        assert!(matches!(result, Err(ConstructionError::CatalogParse(_))));
    }

    #[test]
    fn test_find_by_variant_name() {
        let catalog = EquipmentCatalog::from_ron_str(CATALOG_RON).unwrap();
        assert_eq!(
            catalog.find_by_name("ISMediumLaser").map(|r| r.id.as_str()),
            Some("medium_laser")
        );
        assert!(catalog.find_by_name("PPC").is_none());
    }

    #[test]
    fn test_allocation_from_record_is_unplaced() {
        let record = EquipmentRecord::new("ppc", "PPC", EquipmentCategory::EnergyWeapon, tons(7), 3)
            .with_heat(10);
        let mut allocation = EquipmentAllocation::from_record(InstanceId::new(4), &record);
        assert!(!allocation.is_allocated());
        assert_eq!(allocation.instance_id.to_string(), "#4");

        allocation.location = Some(Location::RightArm);
        allocation.start_slot = Some(4);
        assert!(allocation.is_allocated());
        allocation.unplace();
        assert!(!allocation.is_allocated());
    }

    #[test]
    fn test_slot_error_display() {
        assert_eq!(
            SlotAllocationError::LocationFull.to_string(),
            "Location has no room for this equipment"
        );
    }
}
