//! Single source of truth for one unit under construction.
//!
//! [`UnitStateManager`] owns the configuration, the critical slot map and the
//! equipment instances. Every mutation re-derives the slot map (system
//! components, mounted equipment, special components) and re-validates, so
//! the derived views never go stale.
//!
//! Armor is the exception: changing the configuration keeps the stored armor
//! allocation. Armor is only recomputed through
//! [`UnitStateManager::auto_allocate_armor`] or
//! [`UnitStateManager::set_armor_tonnage`].

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::armor::{ArmorAllocationResult, ArmorAllocator};
use crate::equipment::{EquipmentAllocation, EquipmentRecord, InstanceId, SlotAllocationError};
use crate::error::{ConstructionError, Result};
use crate::location::Location;
use crate::math::Fixed;
use crate::slots::CriticalSlotAllocation;
use crate::snapshot::UnitSnapshot;
use crate::special::{SpecialAllocation, SpecialComponentAllocator};
use crate::system::{system_layout, SlotBreakdown};
use crate::unit::UnitConfiguration;
use crate::validation::{ConstructionValidator, ValidationContext, ValidationReport};
use crate::weight::WeightBreakdown;

/// Owns a unit's construction state and keeps derived data consistent.
#[derive(Debug, Clone)]
pub struct UnitStateManager {
    configuration: UnitConfiguration,
    slots: CriticalSlotAllocation,
    equipment: BTreeMap<InstanceId, EquipmentAllocation>,
    next_instance_id: u32,
    special_allocations: Vec<SpecialAllocation>,
    validator: Arc<ConstructionValidator>,
    report: ValidationReport,
}

impl UnitStateManager {
    /// Create a manager for a configuration.
    ///
    /// # Errors
    ///
    /// Rejects configurations that fail the boundary checks (armor tonnage
    /// not a non-negative multiple of half a ton).
    pub fn new(configuration: UnitConfiguration, validator: Arc<ConstructionValidator>) -> Result<Self> {
        configuration.check_boundary()?;
        let mut equipment = BTreeMap::new();
        let (slots, special_allocations) = derive_layout(&configuration, &mut equipment);
        let report = run_validation(&validator, &configuration, &equipment, &special_allocations);
        Ok(Self {
            configuration,
            slots,
            equipment,
            next_instance_id: 1,
            special_allocations,
            validator,
            report,
        })
    }

    /// Create a manager using the standard rule set.
    pub fn with_standard_rules(configuration: UnitConfiguration) -> Result<Self> {
        Self::new(configuration, Arc::new(ConstructionValidator::standard()))
    }

    /// Build a manager whose state is fully replaced by a snapshot.
    pub fn from_snapshot(snapshot: UnitSnapshot, validator: Arc<ConstructionValidator>) -> Result<Self> {
        let mut manager = Self::new(snapshot.configuration.clone(), validator)?;
        manager.deserialize_complete_state(snapshot)?;
        Ok(manager)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Current configuration.
    #[must_use]
    pub fn configuration(&self) -> &UnitConfiguration {
        &self.configuration
    }

    /// Current critical slot map.
    #[must_use]
    pub fn slots(&self) -> &CriticalSlotAllocation {
        &self.slots
    }

    /// Special component placements from the last re-derivation.
    #[must_use]
    pub fn special_allocations(&self) -> &[SpecialAllocation] {
        &self.special_allocations
    }

    /// One equipment instance.
    #[must_use]
    pub fn equipment(&self, id: InstanceId) -> Option<&EquipmentAllocation> {
        self.equipment.get(&id)
    }

    /// Every equipment instance, by id.
    pub fn all_equipment(&self) -> impl Iterator<Item = &EquipmentAllocation> {
        self.equipment.values()
    }

    /// The validator shared with other managers.
    #[must_use]
    pub fn validator(&self) -> &Arc<ConstructionValidator> {
        &self.validator
    }

    // ========================================================================
    // Equipment
    // ========================================================================

    /// Add an unplaced instance of a catalog record.
    pub fn add_equipment(&mut self, record: &EquipmentRecord) -> InstanceId {
        let id = self.claim_instance_id();
        self.equipment
            .insert(id, EquipmentAllocation::from_record(id, record));
        tracing::debug!(instance = %id, equipment = %record.id, "Equipment added");
        self.rederive();
        id
    }

    /// Next unused instance id. Ids wrap back to 1 past `u32::MAX`.
    fn claim_instance_id(&mut self) -> InstanceId {
        let mut candidate = self.next_instance_id;
        while self.equipment.contains_key(&InstanceId::new(candidate)) {
            candidate = next_id_after(candidate);
        }
        self.next_instance_id = next_id_after(candidate);
        InstanceId::new(candidate)
    }

    /// Place an instance in a location.
    ///
    /// With no `start_slot`, the first run of free slots long enough is
    /// used. Special component slots count as free; they move elsewhere
    /// when the slot map is re-derived.
    pub fn allocate_equipment(
        &mut self,
        id: InstanceId,
        location: Location,
        start_slot: Option<usize>,
    ) -> std::result::Result<(), SlotAllocationError> {
        let item = self
            .equipment
            .get(&id)
            .ok_or(SlotAllocationError::UnknownInstance)?;
        if item.is_allocated() {
            return Err(SlotAllocationError::AlreadyAllocated);
        }
        let len = item.critical_slots as usize;

        let start = if len == 0 {
            None
        } else {
            let start = match start_slot {
                Some(start) => start,
                None => self
                    .slots
                    .first_available_range(location, len)
                    .ok_or(SlotAllocationError::LocationFull)?,
            };
            self.slots.place_equipment(id, location, start, len)?;
            Some(start)
        };

        if let Some(item) = self.equipment.get_mut(&id) {
            item.location = Some(location);
            item.start_slot = start;
        }
        tracing::debug!(instance = %id, %location, start = ?start, "Equipment allocated");
        self.rederive();
        Ok(())
    }

    /// Move an instance back to the unallocated pool.
    pub fn deallocate_equipment(&mut self, id: InstanceId) -> std::result::Result<(), SlotAllocationError> {
        let item = self
            .equipment
            .get_mut(&id)
            .ok_or(SlotAllocationError::UnknownInstance)?;
        item.unplace();
        self.slots.clear_equipment(id);
        self.rederive();
        Ok(())
    }

    /// Remove an instance from the unit entirely.
    pub fn remove_equipment(
        &mut self,
        id: InstanceId,
    ) -> std::result::Result<EquipmentAllocation, SlotAllocationError> {
        let mut item = self
            .equipment
            .remove(&id)
            .ok_or(SlotAllocationError::UnknownInstance)?;
        item.unplace();
        self.slots.clear_equipment(id);
        tracing::debug!(instance = %id, "Equipment removed");
        self.rederive();
        Ok(item)
    }

    /// Instances not occupying slots, recomputed from the slot map.
    #[must_use]
    pub fn unallocated_equipment(&self) -> Vec<&EquipmentAllocation> {
        let positions = self.slots.equipment_positions();
        self.equipment
            .values()
            .filter(|item| !is_placed(item, &positions))
            .collect()
    }

    /// Instances occupying slots, recomputed from the slot map.
    #[must_use]
    pub fn allocated_equipment(&self) -> Vec<&EquipmentAllocation> {
        let positions = self.slots.equipment_positions();
        self.equipment
            .values()
            .filter(|item| is_placed(item, &positions))
            .collect()
    }

    // ========================================================================
    // Configuration and armor
    // ========================================================================

    /// Replace the configuration.
    ///
    /// Re-runs the special component distribution and validation. Equipment
    /// that no longer fits moves to the unallocated pool. The armor
    /// allocation is kept as given.
    pub fn update_configuration(&mut self, configuration: UnitConfiguration) -> Result<()> {
        configuration.check_boundary()?;
        tracing::debug!(
            chassis = %configuration.chassis,
            tonnage = %configuration.tonnage,
            "Configuration replaced"
        );
        self.configuration = configuration;
        self.rederive();
        Ok(())
    }

    /// Recompute the armor allocation from the armor tonnage.
    pub fn auto_allocate_armor(&mut self) -> ArmorAllocationResult {
        let result = ArmorAllocator::new().allocate(
            self.configuration.armor.point_budget(),
            self.configuration.tonnage,
        );
        self.configuration.armor.allocation = result.allocation.clone();
        self.rederive();
        result
    }

    /// Change the armor tonnage and recompute the armor allocation.
    ///
    /// # Errors
    ///
    /// [`ConstructionError::InvalidArmorTonnage`] for negative tonnage or a
    /// value that is not a multiple of half a ton. The state is unchanged.
    pub fn set_armor_tonnage(&mut self, tonnage: Fixed) -> Result<ArmorAllocationResult> {
        let mut candidate = self.configuration.clone();
        candidate.armor.tonnage = tonnage;
        candidate.check_boundary()?;
        self.configuration = candidate;
        Ok(self.auto_allocate_armor())
    }

    // ========================================================================
    // Snapshots
    // ========================================================================

    /// Capture the complete state.
    #[must_use]
    pub fn serialize_complete_state(&self) -> UnitSnapshot {
        UnitSnapshot::new(
            self.configuration.clone(),
            self.slots.clone(),
            self.allocated_equipment().into_iter().cloned().collect(),
            self.unallocated_equipment().into_iter().cloned().collect(),
        )
    }

    /// Replace the complete state with a snapshot.
    ///
    /// The snapshot's slot map is taken as stored; instance ids are kept.
    ///
    /// # Errors
    ///
    /// Version mismatch, a configuration failing the boundary checks, an
    /// instance listed twice, or a slot naming an instance the snapshot
    /// does not list. The state is unchanged on error.
    pub fn deserialize_complete_state(&mut self, snapshot: UnitSnapshot) -> Result<()> {
        snapshot.check_version()?;
        snapshot.configuration.check_boundary()?;

        let mut equipment = BTreeMap::new();
        for item in snapshot.equipment() {
            if equipment.insert(item.instance_id, item.clone()).is_some() {
                return Err(ConstructionError::DuplicateInstance(item.instance_id));
            }
        }

        let positions = snapshot.sections.equipment_positions();
        if let Some(&unknown) = positions.keys().find(|id| !equipment.contains_key(id)) {
            return Err(ConstructionError::UnknownInstance(unknown));
        }
        for item in equipment.values_mut() {
            if item.critical_slots == 0 {
                continue;
            }
            match positions.get(&item.instance_id) {
                Some(&(location, start)) => {
                    item.location = Some(location);
                    item.start_slot = Some(start);
                }
                None => item.unplace(),
            }
        }

        let special_allocations = snapshot
            .configuration
            .special_components()
            .into_iter()
            .map(|kind| {
                let required = kind.requirement(snapshot.configuration.tonnage.get());
                SpecialAllocation::from_placements(kind, required, snapshot.sections.special_counts(kind))
            })
            .collect();

        self.next_instance_id = equipment.keys().map(|id| id.0).max().map_or(1, next_id_after);
        self.configuration = snapshot.configuration;
        self.slots = snapshot.sections;
        self.equipment = equipment;
        self.special_allocations = special_allocations;
        self.report = self.run_validation();

        tracing::debug!(
            chassis = %self.configuration.chassis,
            equipment = self.equipment.len(),
            "Snapshot restored"
        );
        Ok(())
    }

    // ========================================================================
    // Derived views
    // ========================================================================

    /// Report from the last re-derivation.
    #[must_use]
    pub fn validation_report(&self) -> &ValidationReport {
        &self.report
    }

    /// Re-run validation and store the new report.
    pub fn validate(&mut self) -> &ValidationReport {
        self.report = self.run_validation();
        &self.report
    }

    /// Validation input for the current state.
    #[must_use]
    pub fn validation_context(&self) -> ValidationContext {
        let equipment: Vec<EquipmentAllocation> = self.equipment.values().cloned().collect();
        ValidationContext::for_unit(&self.configuration, &equipment, self.special_allocations.clone())
    }

    /// Weight by component.
    #[must_use]
    pub fn weight_breakdown(&self) -> WeightBreakdown {
        let equipment: Vec<EquipmentAllocation> = self.equipment.values().cloned().collect();
        WeightBreakdown::for_unit(&self.configuration, &equipment)
    }

    /// Total weight in tons.
    #[must_use]
    pub fn total_weight(&self) -> Fixed {
        self.weight_breakdown().total()
    }

    /// Critical slots demanded by the design.
    #[must_use]
    pub fn used_slots(&self) -> u32 {
        let equipment: Vec<EquipmentAllocation> = self.equipment.values().cloned().collect();
        SlotBreakdown::for_unit(&self.configuration, &equipment).total()
    }

    fn run_validation(&self) -> ValidationReport {
        run_validation(
            &self.validator,
            &self.configuration,
            &self.equipment,
            &self.special_allocations,
        )
    }

    fn rederive(&mut self) {
        let (slots, special_allocations) = derive_layout(&self.configuration, &mut self.equipment);
        self.slots = slots;
        self.special_allocations = special_allocations;
        self.report = self.run_validation();
    }
}

fn is_placed(item: &EquipmentAllocation, positions: &BTreeMap<InstanceId, (Location, usize)>) -> bool {
    if item.critical_slots == 0 {
        item.is_allocated()
    } else {
        positions.contains_key(&item.instance_id)
    }
}

/// Lay out system components, re-place equipment at its recorded position,
/// then distribute special components into what is left.
fn derive_layout(
    config: &UnitConfiguration,
    equipment: &mut BTreeMap<InstanceId, EquipmentAllocation>,
) -> (CriticalSlotAllocation, Vec<SpecialAllocation>) {
    let mut slots = system_layout(config);

    for item in equipment.values_mut() {
        if item.critical_slots == 0 {
            continue;
        }
        let (Some(location), Some(start)) = (item.location, item.start_slot) else {
            item.unplace();
            continue;
        };
        let placed = slots.place_equipment(item.instance_id, location, start, item.critical_slots as usize);
        if let Err(err) = placed {
            tracing::debug!(
                instance = %item.instance_id,
                %location,
                reason = %err,
                "Equipment displaced to unallocated pool"
            );
            item.unplace();
        }
    }

    let mut special_allocations = Vec::new();
    for kind in config.special_components() {
        let allocator = SpecialComponentAllocator::new(kind);
        let required = allocator.requirement(config.tonnage);
        let planned = allocator.distribute_with_occupancy(required, |location| slots.free(location));
        let mut placed = BTreeMap::new();
        for (&location, &count) in &planned.placements {
            let n = slots.place_special(kind, location, count);
            if n > 0 {
                placed.insert(location, n);
            }
        }
        special_allocations.push(SpecialAllocation::from_placements(kind, required, placed));
    }

    (slots, special_allocations)
}

fn run_validation(
    validator: &ConstructionValidator,
    config: &UnitConfiguration,
    equipment: &BTreeMap<InstanceId, EquipmentAllocation>,
    special_allocations: &[SpecialAllocation],
) -> ValidationReport {
    let equipment: Vec<EquipmentAllocation> = equipment.values().cloned().collect();
    let context = ValidationContext::for_unit(config, &equipment, special_allocations.to_vec());
    validator.validate(&context)
}

fn next_id_after(id: u32) -> u32 {
    id.checked_add(1).unwrap_or(1)
}
