//! Persistence snapshot of a unit under construction.
//!
//! A snapshot is the complete state: configuration, every location's slot
//! contents and every equipment instance. Restoring one replaces the whole
//! state; instance ids survive the round trip.
//!
//! Two encodings are provided: JSON for unit files and bincode for compact
//! storage.

use serde::{Deserialize, Serialize};

use crate::equipment::EquipmentAllocation;
use crate::error::{ConstructionError, Result};
use crate::slots::CriticalSlotAllocation;
use crate::unit::UnitConfiguration;

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Complete, self-contained state of one unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitSnapshot {
    /// Format version.
    pub version: u32,
    /// Unit configuration, armor allocation included.
    pub configuration: UnitConfiguration,
    /// Slot contents of every location.
    pub sections: CriticalSlotAllocation,
    /// Equipment placed in the sections.
    pub allocated_equipment: Vec<EquipmentAllocation>,
    /// Equipment in the unallocated pool.
    pub unallocated_equipment: Vec<EquipmentAllocation>,
}

impl UnitSnapshot {
    /// Create a snapshot at the current format version.
    #[must_use]
    pub fn new(
        configuration: UnitConfiguration,
        sections: CriticalSlotAllocation,
        allocated_equipment: Vec<EquipmentAllocation>,
        unallocated_equipment: Vec<EquipmentAllocation>,
    ) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            configuration,
            sections,
            allocated_equipment,
            unallocated_equipment,
        }
    }

    /// Reject snapshots written by another format version.
    pub fn check_version(&self) -> Result<()> {
        if self.version != SNAPSHOT_VERSION {
            return Err(ConstructionError::SnapshotVersion {
                expected: SNAPSHOT_VERSION,
                found: self.version,
            });
        }
        Ok(())
    }

    /// Every equipment instance, placed first.
    pub fn equipment(&self) -> impl Iterator<Item = &EquipmentAllocation> {
        self.allocated_equipment
            .iter()
            .chain(self.unallocated_equipment.iter())
    }

    /// Encode as compact JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| ConstructionError::Serialization(format!("Failed to encode snapshot: {e}")))
    }

    /// Encode as indented JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ConstructionError::Serialization(format!("Failed to encode snapshot: {e}")))
    }

    /// Decode from JSON.
    ///
    /// # Errors
    ///
    /// Malformed input, an over-full section or a version mismatch.
    pub fn from_json(source: &str) -> Result<Self> {
        let snapshot: Self = serde_json::from_str(source)
            .map_err(|e| ConstructionError::Serialization(format!("Failed to decode snapshot: {e}")))?;
        snapshot.check_version()?;
        Ok(snapshot)
    }

    /// Encode with bincode.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        bincode::serialize(self)
            .map_err(|e| ConstructionError::Serialization(format!("Failed to encode snapshot: {e}")))
    }

    /// Decode from bincode.
    ///
    /// # Errors
    ///
    /// Malformed input, an over-full section or a version mismatch.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let snapshot: Self = bincode::deserialize(bytes)
            .map_err(|e| ConstructionError::Serialization(format!("Failed to decode snapshot: {e}")))?;
        snapshot.check_version()?;
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::ArmorType;
    use crate::equipment::{EquipmentCategory, EquipmentRecord, InstanceId};
    use crate::location::Location;
    use crate::math::tons;
    use crate::system::system_layout;
    use crate::unit::Tonnage;

    fn sample() -> UnitSnapshot {
        let config = UnitConfiguration::new("Hunchback", "HBK-4G", Tonnage::new(50).unwrap())
            .with_armor(ArmorType::Standard, tons(10));
        let mut sections = system_layout(&config);
        let record = EquipmentRecord::new("ml", "Medium Laser", EquipmentCategory::EnergyWeapon, tons(1), 1);
        let mut laser = EquipmentAllocation::from_record(InstanceId::new(1), &record);
        sections
            .place_equipment(laser.instance_id, Location::LeftArm, 4, 1)
            .unwrap();
        laser.location = Some(Location::LeftArm);
        laser.start_slot = Some(4);
        let spare = EquipmentAllocation::from_record(InstanceId::new(2), &record);
        UnitSnapshot::new(config, sections, vec![laser], vec![spare])
    }

    #[test]
    fn test_json_round_trip() {
        let snapshot = sample();
        let json = snapshot.to_json().unwrap();
        assert_eq!(UnitSnapshot::from_json(&json).unwrap(), snapshot);
    }

    #[test]
    fn test_bincode_round_trip() {
        let snapshot = sample();
        let bytes = snapshot.to_bytes().unwrap();
        assert_eq!(UnitSnapshot::from_bytes(&bytes).unwrap(), snapshot);
    }

    #[test]
    fn test_version_mismatch_rejected() {
        let mut snapshot = sample();
        snapshot.version = SNAPSHOT_VERSION + 1;
        let json = snapshot.to_json().unwrap();
        let err = UnitSnapshot::from_json(&json).unwrap_err();
        assert!(matches!(
            err,
            ConstructionError::SnapshotVersion { expected: SNAPSHOT_VERSION, .. }
        ));
    }

    #[test]
    fn test_overfull_section_rejected() {
        let json = sample().to_json().unwrap();
        let mut value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let head = value["sections"]["Head"].as_array_mut().unwrap();
        head.push(serde_json::json!("Empty"));
        let err = UnitSnapshot::from_json(&value.to_string()).unwrap_err();
        assert!(matches!(err, ConstructionError::Serialization(_)));
    }

    #[test]
    fn test_equipment_lists_placed_first() {
        let snapshot = sample();
        let ids: Vec<InstanceId> = snapshot.equipment().map(|e| e.instance_id).collect();
        assert_eq!(ids, vec![InstanceId::new(1), InstanceId::new(2)]);
    }
}
