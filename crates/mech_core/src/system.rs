//! Fixed system components and their critical slot layout.
//!
//! Every design carries the same skeleton: cockpit block in the head,
//! engine and gyro in the center torso, actuators in the limbs. The layout
//! is rebuilt from the configuration on every re-derivation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::components::CockpitType;
use crate::equipment::EquipmentAllocation;
use crate::location::Location;
use crate::slots::{CriticalSlotAllocation, SlotContent};
use crate::unit::{EngineConfig, UnitConfiguration};

/// Heat sinks every design carries without paying weight for them.
pub const WEIGHT_FREE_HEAT_SINKS: u32 = 10;

/// Engine rating per heat sink the engine holds internally.
const RATING_PER_INTEGRAL_SINK: u32 = 25;

/// A fixed, non-removable system component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SystemComponent {
    /// Engine.
    Engine,
    /// Gyro.
    Gyro,
    /// Cockpit.
    Cockpit,
    /// Life support.
    LifeSupport,
    /// Sensors.
    Sensors,
    /// Shoulder.
    Shoulder,
    /// Upper arm actuator.
    UpperArmActuator,
    /// Lower arm actuator.
    LowerArmActuator,
    /// Hand actuator.
    HandActuator,
    /// Hip.
    Hip,
    /// Upper leg actuator.
    UpperLegActuator,
    /// Lower leg actuator.
    LowerLegActuator,
    /// Foot actuator.
    FootActuator,
}

impl SystemComponent {
    /// Name as written in unit files.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Engine => "Fusion Engine",
            Self::Gyro => "Gyro",
            Self::Cockpit => "Cockpit",
            Self::LifeSupport => "Life Support",
            Self::Sensors => "Sensors",
            Self::Shoulder => "Shoulder",
            Self::UpperArmActuator => "Upper Arm Actuator",
            Self::LowerArmActuator => "Lower Arm Actuator",
            Self::HandActuator => "Hand Actuator",
            Self::Hip => "Hip",
            Self::UpperLegActuator => "Upper Leg Actuator",
            Self::LowerLegActuator => "Lower Leg Actuator",
            Self::FootActuator => "Foot Actuator",
        }
    }
}

fn head_layout(cockpit: CockpitType) -> Vec<SystemComponent> {
    use SystemComponent::{Cockpit, LifeSupport, Sensors};
    match cockpit {
        CockpitType::Standard => vec![LifeSupport, Sensors, Cockpit, Sensors, LifeSupport],
        CockpitType::Small => vec![LifeSupport, Sensors, Cockpit, Sensors],
        CockpitType::TorsoMounted => vec![Sensors, Sensors, LifeSupport],
    }
}

fn center_torso_layout(config: &UnitConfiguration) -> Vec<SystemComponent> {
    use SystemComponent::{Cockpit, Engine, Gyro};
    let engine_slots = config.engine.engine_type.center_torso_slots() as usize;
    let first_block = engine_slots.min(3);
    let mut layout = vec![Engine; first_block];
    layout.extend(std::iter::repeat(Gyro).take(config.gyro.slots() as usize));
    layout.extend(std::iter::repeat(Engine).take(engine_slots - first_block));
    if config.cockpit == CockpitType::TorsoMounted {
        layout.push(Cockpit);
    }
    layout
}

const ARM_ACTUATORS: [SystemComponent; 4] = [
    SystemComponent::Shoulder,
    SystemComponent::UpperArmActuator,
    SystemComponent::LowerArmActuator,
    SystemComponent::HandActuator,
];

const LEG_ACTUATORS: [SystemComponent; 4] = [
    SystemComponent::Hip,
    SystemComponent::UpperLegActuator,
    SystemComponent::LowerLegActuator,
    SystemComponent::FootActuator,
];

/// System components of one location, in slot order.
#[must_use]
pub fn location_layout(config: &UnitConfiguration, location: Location) -> Vec<SystemComponent> {
    match location {
        Location::Head => head_layout(config.cockpit),
        Location::CenterTorso => center_torso_layout(config),
        Location::LeftTorso | Location::RightTorso => {
            vec![SystemComponent::Engine; config.engine.engine_type.side_torso_slots() as usize]
        }
        Location::LeftArm | Location::RightArm => ARM_ACTUATORS.to_vec(),
        Location::LeftLeg | Location::RightLeg => LEG_ACTUATORS.to_vec(),
    }
}

/// Critical slots holding only the system components of a design.
///
/// The standard head leaves slot 4 empty between the sensors. Layouts longer
/// than a location (torso cockpit with an XL gyro) are cut at capacity.
#[must_use]
pub fn system_layout(config: &UnitConfiguration) -> CriticalSlotAllocation {
    let mut sections = BTreeMap::new();
    for location in Location::ALL {
        let mut contents: Vec<SlotContent> = location_layout(config, location)
            .into_iter()
            .map(SlotContent::System)
            .collect();
        if location == Location::Head && config.cockpit == CockpitType::Standard {
            contents.insert(3, SlotContent::Empty);
        }
        contents.truncate(location.capacity() as usize);
        sections.insert(location, contents);
    }
    CriticalSlotAllocation::from_sections(sections).unwrap_or_default()
}

/// Heat sinks the engine holds without using critical slots.
#[must_use]
pub const fn integral_heat_sinks(engine: &EngineConfig) -> u32 {
    if engine.engine_type.is_fusion() {
        engine.rating / RATING_PER_INTEGRAL_SINK
    } else {
        0
    }
}

/// Critical slots taken by heat sinks that do not fit inside the engine.
#[must_use]
pub fn heat_sink_slots(config: &UnitConfiguration) -> u32 {
    let external = config
        .heat_sinks
        .count
        .saturating_sub(integral_heat_sinks(&config.engine));
    external.saturating_mul(config.heat_sinks.heat_sink_type.slots())
}

/// Critical slot demand of a design, by source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SlotBreakdown {
    /// Engine, gyro, cockpit block and actuators.
    pub system: u32,
    /// Endo Steel and Ferro-Fibrous requirements.
    pub special: u32,
    /// Heat sinks outside the engine.
    pub heat_sinks: u32,
    /// Mounted equipment, placed or not.
    pub equipment: u32,
}

impl SlotBreakdown {
    /// Compute the slot demand of a design and its equipment.
    #[must_use]
    pub fn for_unit(config: &UnitConfiguration, equipment: &[EquipmentAllocation]) -> Self {
        let system = system_layout(config).total_occupied();
        let special = config
            .special_components()
            .into_iter()
            .map(|kind| kind.requirement(config.tonnage.get()))
            .sum();
        Self {
            system,
            special,
            heat_sinks: heat_sink_slots(config),
            equipment: equipment
                .iter()
                .fold(0, |sum, e| sum.saturating_add(e.critical_slots)),
        }
    }

    /// Total slots demanded, saturating at `u32::MAX`.
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.system
            .saturating_add(self.special)
            .saturating_add(self.heat_sinks)
            .saturating_add(self.equipment)
    }
}
