//! Per-location critical slot contents.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::equipment::{InstanceId, SlotAllocationError};
use crate::error::{ConstructionError, Result};
use crate::location::{Location, TOTAL_CRITICAL_SLOTS};
use crate::special::SpecialComponentKind;
use crate::system::SystemComponent;

/// What occupies one critical slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SlotContent {
    /// Nothing.
    #[default]
    Empty,
    /// Fixed system component (engine, gyro, cockpit, actuators).
    System(SystemComponent),
    /// One slot of a special component.
    Special(SpecialComponentKind),
    /// Part of a mounted equipment instance.
    Equipment(InstanceId),
}

impl SlotContent {
    /// Whether the slot holds nothing.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Whether equipment may be placed here. Special component slots are
    /// redistributed around equipment, so they count as available.
    #[must_use]
    pub const fn is_available(self) -> bool {
        matches!(self, Self::Empty | Self::Special(_))
    }
}

/// Critical slot contents of every location.
///
/// Each section always holds exactly `capacity(location)` entries, so a
/// location can never be over-allocated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<Location, Vec<SlotContent>>",
    into = "BTreeMap<Location, Vec<SlotContent>>"
)]
pub struct CriticalSlotAllocation {
    sections: BTreeMap<Location, Vec<SlotContent>>,
}

impl Default for CriticalSlotAllocation {
    fn default() -> Self {
        Self::empty()
    }
}

impl CriticalSlotAllocation {
    /// Every location empty.
    #[must_use]
    pub fn empty() -> Self {
        let sections = Location::ALL
            .into_iter()
            .map(|loc| (loc, vec![SlotContent::Empty; loc.capacity() as usize]))
            .collect();
        Self { sections }
    }

    /// Build from explicit sections, padding short sections with empty slots.
    ///
    /// Fails when a section holds more entries than its location's capacity.
    pub fn from_sections(sections: BTreeMap<Location, Vec<SlotContent>>) -> Result<Self> {
        let mut allocation = Self::empty();
        for (location, contents) in sections {
            let capacity = location.capacity();
            if contents.len() > capacity as usize {
                return Err(ConstructionError::SectionOverflow {
                    location,
                    slots: contents.len(),
                    capacity,
                });
            }
            let section = allocation.section_mut(location);
            section[..contents.len()].copy_from_slice(&contents);
        }
        Ok(allocation)
    }

    fn section_mut(&mut self, location: Location) -> &mut Vec<SlotContent> {
        self.sections
            .entry(location)
            .or_insert_with(|| vec![SlotContent::Empty; location.capacity() as usize])
    }

    /// Contents of one location.
    #[must_use]
    pub fn section(&self, location: Location) -> &[SlotContent] {
        self.sections.get(&location).map_or(&[], Vec::as_slice)
    }

    /// Content of one slot, if the index is in range.
    #[must_use]
    pub fn slot(&self, location: Location, index: usize) -> Option<SlotContent> {
        self.section(location).get(index).copied()
    }

    /// Occupied slots in a location.
    #[must_use]
    pub fn occupied(&self, location: Location) -> u32 {
        self.section(location).iter().filter(|s| !s.is_empty()).count() as u32
    }

    /// Occupied slots across the chassis.
    #[must_use]
    pub fn total_occupied(&self) -> u32 {
        Location::ALL.iter().map(|&loc| self.occupied(loc)).sum()
    }

    /// Empty slots in a location.
    #[must_use]
    pub fn free(&self, location: Location) -> u32 {
        location.capacity() - self.occupied(location)
    }

    /// Whether `len` slots starting at `start` are available for equipment.
    #[must_use]
    pub fn is_range_available(&self, location: Location, start: usize, len: usize) -> bool {
        let section = self.section(location);
        start
            .checked_add(len)
            .and_then(|end| section.get(start..end))
            .is_some_and(|range| range.iter().all(|s| s.is_available()))
    }

    /// First start index where `len` contiguous slots are available.
    #[must_use]
    pub fn first_available_range(&self, location: Location, len: usize) -> Option<usize> {
        let capacity = self.section(location).len();
        if len == 0 || len > capacity {
            return None;
        }
        (0..=capacity - len).find(|&start| self.is_range_available(location, start, len))
    }

    /// Place equipment over an available range.
    pub fn place_equipment(
        &mut self,
        id: InstanceId,
        location: Location,
        start: usize,
        len: usize,
    ) -> std::result::Result<(), SlotAllocationError> {
        let end = match start.checked_add(len) {
            Some(end) if end <= location.capacity() as usize => end,
            _ => return Err(SlotAllocationError::InvalidSlotRange),
        };
        if !self.is_range_available(location, start, len) {
            return Err(SlotAllocationError::SlotsOccupied);
        }
        self.section_mut(location)[start..end].fill(SlotContent::Equipment(id));
        Ok(())
    }

    /// Remove an equipment instance; returns whether any slot held it.
    pub fn clear_equipment(&mut self, id: InstanceId) -> bool {
        let mut cleared = false;
        for section in self.sections.values_mut() {
            for slot in section.iter_mut() {
                if *slot == SlotContent::Equipment(id) {
                    *slot = SlotContent::Empty;
                    cleared = true;
                }
            }
        }
        cleared
    }

    /// Remove every special component slot.
    pub fn clear_specials(&mut self) {
        for section in self.sections.values_mut() {
            for slot in section.iter_mut() {
                if matches!(slot, SlotContent::Special(_)) {
                    *slot = SlotContent::Empty;
                }
            }
        }
    }

    /// Fill up to `count` empty slots of a location with a special component;
    /// returns the number placed.
    pub fn place_special(&mut self, kind: SpecialComponentKind, location: Location, count: u32) -> u32 {
        let mut placed = 0;
        for slot in self.section_mut(location).iter_mut() {
            if placed == count {
                break;
            }
            if slot.is_empty() {
                *slot = SlotContent::Special(kind);
                placed += 1;
            }
        }
        placed
    }

    /// Slots held by a special component, per location.
    #[must_use]
    pub fn special_counts(&self, kind: SpecialComponentKind) -> BTreeMap<Location, u32> {
        self.sections
            .iter()
            .filter_map(|(&loc, section)| {
                let count = section
                    .iter()
                    .filter(|&&s| s == SlotContent::Special(kind))
                    .count() as u32;
                (count > 0).then_some((loc, count))
            })
            .collect()
    }

    /// Placement (location, first slot) of every equipment instance.
    #[must_use]
    pub fn equipment_positions(&self) -> BTreeMap<InstanceId, (Location, usize)> {
        let mut positions = BTreeMap::new();
        for (&location, section) in &self.sections {
            for (index, slot) in section.iter().enumerate() {
                if let SlotContent::Equipment(id) = *slot {
                    positions.entry(id).or_insert((location, index));
                }
            }
        }
        positions
    }

    /// Whether every location is within capacity and the chassis within 78.
    #[must_use]
    pub fn is_within_capacity(&self) -> bool {
        Location::ALL
            .iter()
            .all(|&loc| self.section(loc).len() == loc.capacity() as usize)
            && self.total_occupied() <= TOTAL_CRITICAL_SLOTS
    }
}

impl TryFrom<BTreeMap<Location, Vec<SlotContent>>> for CriticalSlotAllocation {
    type Error = ConstructionError;

    fn try_from(sections: BTreeMap<Location, Vec<SlotContent>>) -> Result<Self> {
        Self::from_sections(sections)
    }
}

impl From<CriticalSlotAllocation> for BTreeMap<Location, Vec<SlotContent>> {
    fn from(value: CriticalSlotAllocation) -> Self {
        value.sections
    }
}
