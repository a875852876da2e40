//! Component weights.
//!
//! Every component weight is rounded up to the half ton before summing, so
//! a design assembled from legal parts always totals a half-ton multiple.

use serde::{Deserialize, Serialize};

use crate::components::{CockpitType, GyroType, StructureType};
use crate::equipment::EquipmentAllocation;
use crate::math::{self, half_tons, percent_of, round_up_to_half_ton, tons, Fixed};
use crate::system::WEIGHT_FREE_HEAT_SINKS;
use crate::unit::{EngineConfig, Tonnage, UnitConfiguration};

/// Lowest engine rating.
pub const MIN_ENGINE_RATING: u32 = 10;
/// Highest engine rating.
pub const MAX_ENGINE_RATING: u32 = 500;
/// Engine ratings come in steps of this size.
pub const ENGINE_RATING_STEP: u32 = 5;

/// Standard fusion engine weight in half tons, ratings 10..=500 in steps of 5.
const STANDARD_ENGINE_HALF_TONS: [u16; 99] = [
    1, 1, 1, 1, 2, 2, 2, 2, 3, 3, // 10-55
    3, 4, 4, 4, 5, 5, 6, 6, 6, 7, // 60-105
    7, 8, 8, 8, 9, 9, 10, 10, 11, 11, // 110-155
    12, 12, 12, 14, 14, 15, 15, 16, 17, 17, // 160-205
    18, 19, 20, 20, 21, 22, 23, 24, 25, 26, // 210-255
    27, 28, 29, 31, 32, 33, 35, 36, 38, 39, // 260-305
    41, 43, 45, 47, 49, 51, 54, 57, 59, 63, // 310-355
    66, 69, 73, 77, 82, 87, 92, 98, 105, 113, // 360-405
    122, 133, 145, 159, 175, 194, 215, 239, 267, 300, // 410-455
    337, 380, 429, 486, 551, 626, 712, 811, 925, // 460-500
];

/// Whether a rating is in range and on the 5-point grid.
#[must_use]
pub const fn is_legal_rating(rating: u32) -> bool {
    rating >= MIN_ENGINE_RATING && rating <= MAX_ENGINE_RATING && rating % ENGINE_RATING_STEP == 0
}

/// Weight of a standard fusion engine of a rating, `None` for illegal ratings.
#[must_use]
pub fn standard_engine_weight(rating: u32) -> Option<Fixed> {
    if !is_legal_rating(rating) {
        return None;
    }
    let index = ((rating - MIN_ENGINE_RATING) / ENGINE_RATING_STEP) as usize;
    STANDARD_ENGINE_HALF_TONS
        .get(index)
        .map(|&halves| half_tons(i32::from(halves)))
}

/// Engine weight, `None` for illegal ratings.
#[must_use]
pub fn engine_weight(engine: &EngineConfig) -> Option<Fixed> {
    standard_engine_weight(engine.rating)
        .map(|base| round_up_to_half_ton(percent_of(base, engine.engine_type.weight_percent())))
}

/// Gyro weight: one ton per started 100 rating points, scaled by type.
#[must_use]
pub fn gyro_weight(gyro: GyroType, rating: u32) -> Fixed {
    let base = tons(i32::try_from(rating.div_ceil(100)).unwrap_or(i32::MAX));
    round_up_to_half_ton(percent_of(base, gyro.weight_percent()))
}

/// Internal structure weight.
#[must_use]
pub fn structure_weight(structure: StructureType, tonnage: Tonnage) -> Fixed {
    round_up_to_half_ton(percent_of(tonnage.as_fixed(), structure.weight_percent()))
}

/// Cockpit weight.
#[must_use]
pub fn cockpit_weight(cockpit: CockpitType) -> Fixed {
    tons(cockpit.weight_tons())
}

/// Weight of heat sinks beyond the ten free ones.
#[must_use]
pub fn heat_sink_weight(count: u32) -> Fixed {
    let weighed = count.saturating_sub(WEIGHT_FREE_HEAT_SINKS);
    tons(i32::try_from(weighed).unwrap_or(i32::MAX))
}

/// Summed weight of mounted equipment, placed or not.
#[must_use]
pub fn equipment_weight(equipment: &[EquipmentAllocation]) -> Fixed {
    equipment
        .iter()
        .fold(Fixed::ZERO, |sum, e| sum.saturating_add(e.weight))
}

/// Weight of a design, by component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WeightBreakdown {
    /// Engine (zero when the rating has no weight).
    #[serde(with = "math::tons_serde")]
    pub engine: Fixed,
    /// Gyro.
    #[serde(with = "math::tons_serde")]
    pub gyro: Fixed,
    /// Internal structure.
    #[serde(with = "math::tons_serde")]
    pub structure: Fixed,
    /// Cockpit.
    #[serde(with = "math::tons_serde")]
    pub cockpit: Fixed,
    /// Heat sinks beyond the free ten.
    #[serde(with = "math::tons_serde")]
    pub heat_sinks: Fixed,
    /// Armor.
    #[serde(with = "math::tons_serde")]
    pub armor: Fixed,
    /// Mounted equipment.
    #[serde(with = "math::tons_serde")]
    pub equipment: Fixed,
}

impl WeightBreakdown {
    /// Compute the weight of a design and its equipment.
    #[must_use]
    pub fn for_unit(config: &UnitConfiguration, equipment: &[EquipmentAllocation]) -> Self {
        Self {
            engine: engine_weight(&config.engine).unwrap_or(Fixed::ZERO),
            gyro: gyro_weight(config.gyro, config.engine.rating),
            structure: structure_weight(config.structure, config.tonnage),
            cockpit: cockpit_weight(config.cockpit),
            heat_sinks: heat_sink_weight(config.heat_sinks.count),
            armor: config.armor.tonnage,
            equipment: equipment_weight(equipment),
        }
    }

    /// Total weight, saturating at the fixed-point range.
    #[must_use]
    pub fn total(&self) -> Fixed {
        [
            self.gyro,
            self.structure,
            self.cockpit,
            self.heat_sinks,
            self.armor,
            self.equipment,
        ]
        .into_iter()
        .fold(self.engine, Fixed::saturating_add)
    }
}
