//! MegaMek `.mtf` import.
//!
//! The format is line oriented: `key:value` headers, a `Weapons:` list of
//! `name, location` lines, then one block per location listing its critical
//! slots in order. Fluff and unrecognized keys are skipped.

use std::collections::BTreeMap;
use std::sync::Arc;

use mech_core::components::{
    ArmorType, CockpitType, EngineType, GyroType, HeatSinkType, StructureType,
};
use mech_core::equipment::EquipmentCatalog;
use mech_core::error::ConstructionError;
use mech_core::location::Location;
use mech_core::math::{self, Fixed};
use mech_core::state::UnitStateManager;
use mech_core::tech::{RulesLevel, TechBase};
use mech_core::unit::{ArmorAllocation, Tonnage, UnitConfiguration};
use mech_core::validation::ConstructionValidator;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Marker for an unused critical slot.
pub const EMPTY_SLOT: &str = "-Empty-";

/// Suffix marking a rear-facing weapon.
const REAR_MARKER: &str = "(R)";

/// Errors raised while parsing a `.mtf` file.
#[derive(Debug, Error)]
pub enum MtfError {
    /// A field every unit must declare is absent.
    #[error("Missing required field '{0}'")]
    MissingField(&'static str),

    /// A field holds a value that cannot be interpreted.
    #[error("Invalid value '{value}' for '{field}'")]
    InvalidValue {
        /// Normalized key.
        field: String,
        /// Raw value.
        value: String,
    },

    /// A weapon names a location the chassis does not have.
    #[error("Unknown location '{0}'")]
    UnknownLocation(String),

    /// A critical block lists more occupied slots than the location holds.
    #[error("{location} lists {slots} critical slots, capacity is {capacity}")]
    SectionOverflow {
        /// Offending location.
        location: Location,
        /// Slots listed up to the last occupied one.
        slots: usize,
        /// Capacity of the location.
        capacity: u32,
    },

    /// The engine rejected a value (tonnage out of range).
    #[error(transparent)]
    Construction(#[from] ConstructionError),
}

/// A weapon listed in the `Weapons:` block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MountedWeapon {
    /// Name as written in the file.
    pub name: String,
    /// Mounting location.
    pub location: Location,
    /// Rear-facing mount.
    #[serde(default)]
    pub rear: bool,
}

/// A unit read from a `.mtf` file, in the JSON unit file layout.
///
/// # Example JSON
///
/// ```json
/// {
///   "configuration": { "chassis": "Hunchback", "model": "HBK-4G", ... },
///   "weapons": [{ "name": "Medium Laser", "location": "LeftArm", "rear": false }],
///   "criticals": { "Head": ["Life Support", "Sensors", "Cockpit", null, null, null] },
///   "source": "TRO 3025",
///   "quirks": []
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportedUnit {
    /// Structural configuration.
    pub configuration: UnitConfiguration,
    /// Weapons in file order.
    #[serde(default)]
    pub weapons: Vec<MountedWeapon>,
    /// Critical slot listing per location, padded to capacity.
    #[serde(default)]
    pub criticals: BTreeMap<Location, Vec<Option<String>>>,
    /// Source book.
    #[serde(default)]
    pub source: Option<String>,
    /// Design quirks.
    #[serde(default)]
    pub quirks: Vec<String>,
    /// Master Unit List id.
    #[serde(default)]
    pub mul_id: Option<u32>,
    /// Battlefield role.
    #[serde(default)]
    pub role: Option<String>,
    /// Myomer name as written.
    #[serde(default)]
    pub myomer: Option<String>,
    /// Manufacturer.
    #[serde(default)]
    pub manufacturer: Option<String>,
    /// Primary factory.
    #[serde(default)]
    pub primary_factory: Option<String>,
    /// Subsystem manufacturers keyed by system (`CHASSIS`, `ENGINE`, ...).
    #[serde(default)]
    pub system_manufacturers: BTreeMap<String, String>,
}

/// A unit loaded into a state manager with its weapons mounted.
#[derive(Debug)]
pub struct MountedUnit {
    /// The live unit.
    pub manager: UnitStateManager,
    /// Weapon names the catalog does not know.
    pub unresolved: Vec<String>,
    /// Weapons that did not fit in their listed location.
    pub unplaced: Vec<String>,
}

impl ImportedUnit {
    /// "Chassis Model" label.
    #[must_use]
    pub fn display_name(&self) -> String {
        let config = &self.configuration;
        if config.model.is_empty() {
            config.chassis.clone()
        } else {
            format!("{} {}", config.chassis, config.model)
        }
    }

    /// Build a state manager and mount every weapon the catalog knows.
    ///
    /// Unknown weapons and weapons that do not fit are reported, not fatal.
    pub fn mount(
        &self,
        catalog: &EquipmentCatalog,
        validator: Arc<ConstructionValidator>,
    ) -> mech_core::error::Result<MountedUnit> {
        let mut manager = UnitStateManager::new(self.configuration.clone(), validator)?;
        let mut unresolved = Vec::new();
        let mut unplaced = Vec::new();

        for weapon in &self.weapons {
            let Some(record) = catalog.find_by_name(&weapon.name) else {
                tracing::warn!(equipment = %weapon.name, "Equipment not in catalog");
                unresolved.push(weapon.name.clone());
                continue;
            };
            let id = manager.add_equipment(record);
            if let Err(e) = manager.allocate_equipment(id, weapon.location, None) {
                tracing::warn!(
                    equipment = %weapon.name,
                    location = %weapon.location,
                    error = %e,
                    "Equipment left unallocated"
                );
                unplaced.push(weapon.name.clone());
            }
        }

        Ok(MountedUnit {
            manager,
            unresolved,
            unplaced,
        })
    }
}

// ============================================================================
// Parsing
// ============================================================================

/// Block of the file the parser is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Block {
    Header,
    Weapons,
    Criticals(Location),
}

/// Header values as read, before interpretation.
#[derive(Debug, Default)]
struct RawUnit {
    chassis: Option<String>,
    model: Option<String>,
    config: Option<String>,
    tech_base: Option<String>,
    year: Option<u32>,
    rules_level: Option<String>,
    mass: Option<u32>,
    engine: Option<String>,
    structure: Option<String>,
    gyro: Option<String>,
    cockpit: Option<String>,
    heat_sinks: Option<String>,
    walk: Option<u32>,
    jump: Option<u32>,
    armor_type: Option<String>,
    armor: ArmorAllocation,
    source: Option<String>,
    quirks: Vec<String>,
    mul_id: Option<u32>,
    role: Option<String>,
    myomer: Option<String>,
    manufacturer: Option<String>,
    primary_factory: Option<String>,
    system_manufacturers: BTreeMap<String, String>,
}

impl RawUnit {
    fn apply(&mut self, key: &str, value: &str) -> Result<(), MtfError> {
        let text = || Some(value.to_string());
        match key {
            "chassis" => self.chassis = text(),
            "model" => self.model = text(),
            "config" => self.config = text(),
            "techbase" => self.tech_base = text(),
            "era" => self.year = Some(number(key, value)?),
            "rules_level" => self.rules_level = text(),
            "mass" => self.mass = Some(number(key, value)?),
            "engine" => self.engine = text(),
            "structure" => self.structure = text(),
            "gyro" => self.gyro = text(),
            "cockpit" => self.cockpit = text(),
            "heat_sinks" => self.heat_sinks = text(),
            "walk_mp" => self.walk = Some(number(key, value)?),
            "jump_mp" => self.jump = Some(number(key, value)?),
            "armor" => self.armor_type = text(),
            "source" => self.source = text(),
            "quirk" => self.quirks.push(value.to_string()),
            "mul_id" => match value.parse() {
                Ok(id) => self.mul_id = Some(id),
                Err(_) => tracing::warn!(value, "Ignoring malformed MUL id"),
            },
            "role" => self.role = text(),
            "myomer" => self.myomer = text(),
            "manufacturer" => self.manufacturer = text(),
            "primaryfactory" => self.primary_factory = text(),
            "systemmanufacturer" => match value.split_once(':') {
                Some((system, name)) => {
                    self.system_manufacturers
                        .insert(system.trim().to_string(), name.trim().to_string());
                }
                None => tracing::warn!(value, "Ignoring system manufacturer without a system"),
            },
            _ => match key.strip_suffix("_armor").and_then(armor_facet) {
                Some((location, rear)) => {
                    let points = number(key, value)?;
                    let mut armor = self.armor.get(location);
                    if rear {
                        armor.rear = points;
                    } else {
                        armor.front = points;
                    }
                    self.armor.set(location, armor);
                }
                None => tracing::trace!(key, "Skipping field"),
            },
        }
        Ok(())
    }
}

/// Parse the text of a `.mtf` file.
pub fn parse_mtf(source: &str) -> Result<ImportedUnit, MtfError> {
    let mut raw = RawUnit::default();
    let mut weapons = Vec::new();
    let mut criticals: BTreeMap<Location, Vec<Option<String>>> = BTreeMap::new();
    let mut block = Block::Header;

    for line in source.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(location) = line.strip_suffix(':').and_then(section_location) {
            block = Block::Criticals(location);
            criticals.entry(location).or_default();
            continue;
        }

        match block {
            Block::Weapons if line.contains(',') => {
                weapons.push(parse_weapon(line)?);
                continue;
            }
            Block::Criticals(location) if !line.contains(':') => {
                let slot = (line != EMPTY_SLOT).then(|| line.to_string());
                criticals.entry(location).or_default().push(slot);
                continue;
            }
            _ => {}
        }

        let Some((key, value)) = line.split_once(':') else {
            tracing::trace!(line, "Skipping line");
            continue;
        };
        let key = normalize_key(key);
        if key == "weapons" {
            block = Block::Weapons;
            continue;
        }
        block = Block::Header;
        raw.apply(&key, value.trim())?;
    }

    for (location, slots) in &mut criticals {
        fit_section(*location, slots)?;
    }

    build(raw, weapons, criticals)
}

fn build(
    raw: RawUnit,
    weapons: Vec<MountedWeapon>,
    criticals: BTreeMap<Location, Vec<Option<String>>>,
) -> Result<ImportedUnit, MtfError> {
    let chassis = raw.chassis.ok_or(MtfError::MissingField("chassis"))?;
    let tonnage = Tonnage::new(raw.mass.ok_or(MtfError::MissingField("mass"))?)?;

    if let Some(config) = &raw.config {
        if !config.to_ascii_lowercase().contains("biped") {
            return Err(invalid("config", config));
        }
    }

    let tech_text = raw.tech_base.unwrap_or_default().to_ascii_lowercase();
    let tech_base = if tech_text.starts_with("clan") {
        TechBase::Clan
    } else if tech_text.contains("mixed") {
        TechBase::Mixed
    } else {
        TechBase::InnerSphere
    };
    let clan_chassis = tech_base == TechBase::Clan || tech_text.contains("clan");

    let (rating, engine_type) = match &raw.engine {
        Some(engine) => {
            let (rating, name) = split_count("engine", engine)?;
            (rating, engine_type(name, clan_chassis))
        }
        None => (tonnage.get().saturating_mul(raw.walk.unwrap_or(0)), EngineType::Standard),
    };
    let walk = raw.walk.unwrap_or(rating / tonnage.get());

    let (sink_count, sink_type) = match &raw.heat_sinks {
        Some(sinks) => {
            let (count, name) = split_count("heat_sinks", sinks)?;
            (count, heat_sink_type(name, clan_chassis))
        }
        None => (10, HeatSinkType::Single),
    };

    let armor_type = raw
        .armor_type
        .as_deref()
        .map_or(ArmorType::Standard, |name| armor_type(name, clan_chassis));

    let mut configuration = UnitConfiguration::new(chassis, raw.model.unwrap_or_default(), tonnage)
        .with_tech_base(tech_base)
        .with_engine(engine_type, rating)
        .with_heat_sinks(sink_type, sink_count)
        .with_armor(armor_type, armor_tonnage(&raw.armor, armor_type));
    configuration.mixed_tech = tech_base == TechBase::Mixed;
    configuration.rules_level = match raw.rules_level.as_deref() {
        Some(level) => rules_level(level)?,
        None => RulesLevel::Standard,
    };
    configuration.year = raw.year;
    configuration.movement.walk = walk;
    configuration.movement.jump = raw.jump.unwrap_or(0);
    configuration.structure = raw
        .structure
        .as_deref()
        .map_or(StructureType::Standard, |name| structure_type(name, clan_chassis));
    configuration.gyro = raw.gyro.as_deref().map_or(GyroType::Standard, gyro_type);
    configuration.cockpit = raw.cockpit.as_deref().map_or(CockpitType::Standard, cockpit_type);
    configuration.armor.allocation = raw.armor;

    tracing::debug!(
        chassis = %configuration.chassis,
        model = %configuration.model,
        tonnage = %configuration.tonnage,
        weapons = weapons.len(),
        "Parsed unit"
    );

    Ok(ImportedUnit {
        configuration,
        weapons,
        criticals,
        source: raw.source,
        quirks: raw.quirks,
        mul_id: raw.mul_id,
        role: raw.role,
        myomer: raw.myomer,
        manufacturer: raw.manufacturer,
        primary_factory: raw.primary_factory,
        system_manufacturers: raw.system_manufacturers,
    })
}

// ============================================================================
// Field helpers
// ============================================================================

fn invalid(field: &str, value: &str) -> MtfError {
    MtfError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
    }
}

fn normalize_key(key: &str) -> String {
    key.trim().to_ascii_lowercase().replace(' ', "_")
}

/// Whole number, accepting a trailing `.0` as some files write masses.
fn number(field: &str, value: &str) -> Result<u32, MtfError> {
    let value = value.trim();
    if let Ok(n) = value.parse::<u32>() {
        return Ok(n);
    }
    match value.parse::<f64>() {
        Ok(n) if n >= 0.0 && n.fract() == 0.0 && n <= f64::from(u32::MAX) => Ok(n as u32),
        _ => Err(invalid(field, value)),
    }
}

/// Split a leading count from a name: `"300 Fusion Engine"` -> `(300, "Fusion Engine")`.
fn split_count<'a>(field: &str, value: &'a str) -> Result<(u32, &'a str), MtfError> {
    let value = value.trim();
    let digits = value
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(value.len());
    let count = value[..digits]
        .parse()
        .map_err(|_| invalid(field, value))?;
    Ok((count, value[digits..].trim()))
}

fn section_location(name: &str) -> Option<Location> {
    Location::ALL
        .into_iter()
        .find(|l| l.display_name().eq_ignore_ascii_case(name.trim()))
}

/// Armor key code (`la`, `rtc`, ...) to a location and facing.
fn armor_facet(code: &str) -> Option<(Location, bool)> {
    match code {
        "rtl" => Some((Location::LeftTorso, true)),
        "rtr" => Some((Location::RightTorso, true)),
        "rtc" => Some((Location::CenterTorso, true)),
        other => Location::parse(other).map(|location| (location, false)),
    }
}

fn parse_weapon(line: &str) -> Result<MountedWeapon, MtfError> {
    let mut parts = line.split(',').map(str::trim);
    let name = parts.next().unwrap_or_default();
    let location_name = parts.next().unwrap_or_default();
    let location = Location::parse(location_name)
        .ok_or_else(|| MtfError::UnknownLocation(location_name.to_string()))?;
    let (name, rear) = match name.strip_suffix(REAR_MARKER) {
        Some(stripped) => (stripped.trim(), true),
        None => (name, false),
    };
    Ok(MountedWeapon {
        name: name.to_string(),
        location,
        rear,
    })
}

/// Pad or trim a critical block to the location's capacity.
///
/// Files pad every block to twelve lines; trailing empties past capacity
/// are dropped, occupied slots past capacity are an error.
fn fit_section(location: Location, slots: &mut Vec<Option<String>>) -> Result<(), MtfError> {
    let capacity = location.capacity();
    let occupied = slots.iter().rposition(Option::is_some).map_or(0, |i| i + 1);
    if occupied > capacity as usize {
        return Err(MtfError::SectionOverflow {
            location,
            slots: occupied,
            capacity,
        });
    }
    slots.resize(capacity as usize, None);
    Ok(())
}

/// Half tons of armor needed to supply the listed points.
fn armor_tonnage(allocation: &ArmorAllocation, armor_type: ArmorType) -> Fixed {
    let points = Fixed::saturating_from_num(allocation.total());
    let per_ton = Fixed::from_num(armor_type.points_per_ton());
    math::round_up_to_half_ton(points / per_ton)
}

/// Whether a component name points at Clan manufacture.
fn is_clan(lower: &str, clan_chassis: bool) -> bool {
    if lower.contains("clan") {
        true
    } else if lower.contains("(is)") || lower.contains("inner sphere") || lower.starts_with("is ") {
        false
    } else {
        clan_chassis
    }
}

fn engine_type(name: &str, clan_chassis: bool) -> EngineType {
    let lower = name.to_ascii_lowercase();
    let words = || lower.split(|c: char| !c.is_ascii_alphanumeric());
    if words().any(|w| w == "xl") {
        if is_clan(&lower, clan_chassis) {
            EngineType::XlClan
        } else {
            EngineType::XlInnerSphere
        }
    } else if lower.contains("light") {
        EngineType::Light
    } else if lower.contains("compact") {
        EngineType::Compact
    } else if lower.contains("i.c.e") || words().any(|w| w == "ice") {
        EngineType::Ice
    } else {
        EngineType::Standard
    }
}

fn structure_type(name: &str, clan_chassis: bool) -> StructureType {
    let lower = name.to_ascii_lowercase();
    if !lower.contains("endo") {
        StructureType::Standard
    } else if is_clan(&lower, clan_chassis) {
        StructureType::EndoSteelClan
    } else {
        StructureType::EndoSteelInnerSphere
    }
}

fn armor_type(name: &str, clan_chassis: bool) -> ArmorType {
    let lower = name.to_ascii_lowercase();
    if lower.contains("ferro") {
        if is_clan(&lower, clan_chassis) {
            ArmorType::FerroFibrousClan
        } else {
            ArmorType::FerroFibrousInnerSphere
        }
    } else {
        if !lower.contains("standard") {
            tracing::warn!(armor = name, "Unsupported armor type, using standard");
        }
        ArmorType::Standard
    }
}

fn heat_sink_type(name: &str, clan_chassis: bool) -> HeatSinkType {
    let lower = name.to_ascii_lowercase();
    if !lower.contains("double") {
        HeatSinkType::Single
    } else if is_clan(&lower, clan_chassis) {
        HeatSinkType::DoubleClan
    } else {
        HeatSinkType::DoubleInnerSphere
    }
}

fn gyro_type(name: &str) -> GyroType {
    let lower = name.to_ascii_lowercase();
    if lower.starts_with("xl") {
        GyroType::Xl
    } else if lower.contains("compact") {
        GyroType::Compact
    } else if lower.contains("heavy") {
        GyroType::HeavyDuty
    } else {
        GyroType::Standard
    }
}

fn cockpit_type(name: &str) -> CockpitType {
    let lower = name.to_ascii_lowercase();
    if lower.contains("small") {
        CockpitType::Small
    } else if lower.contains("torso") {
        CockpitType::TorsoMounted
    } else {
        CockpitType::Standard
    }
}

fn rules_level(value: &str) -> Result<RulesLevel, MtfError> {
    match value.trim() {
        "1" => Ok(RulesLevel::Introductory),
        "2" => Ok(RulesLevel::Standard),
        "3" => Ok(RulesLevel::Advanced),
        "4" | "5" => Ok(RulesLevel::Experimental),
        other => Err(invalid("rules_level", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mech_core::unit::LocationArmor;

    const ATLAS_HEADER: &str = "\
chassis:Atlas
model:AS7-D
Config:Biped
techbase:Inner Sphere
era:2755
rules level:1
mass:100
engine:300 Fusion Engine
structure:IS Standard
heat sinks:20 Single
walk mp:3
jump mp:0
armor:Standard(Inner Sphere)
LA armor:34
RA armor:34
LT armor:32
RT armor:32
CT armor:47
HD armor:9
LL armor:41
RL armor:41
RTL armor:10
RTR armor:10
RTC armor:14
";

    fn parse(text: &str) -> ImportedUnit {
        parse_mtf(text).unwrap()
    }

    // ========================================================================
    // Header fields
    // ========================================================================

    #[test]
    fn test_header_fields() {
        let unit = parse(ATLAS_HEADER);
        let config = &unit.configuration;

        assert_eq!(config.chassis, "Atlas");
        assert_eq!(config.model, "AS7-D");
        assert_eq!(config.tonnage.get(), 100);
        assert_eq!(config.tech_base, TechBase::InnerSphere);
        assert_eq!(config.rules_level, RulesLevel::Introductory);
        assert_eq!(config.year, Some(2755));
        assert_eq!(config.engine.rating, 300);
        assert_eq!(config.engine.engine_type, EngineType::Standard);
        assert_eq!(config.heat_sinks.count, 20);
        assert_eq!(config.heat_sinks.heat_sink_type, HeatSinkType::Single);
        assert_eq!(config.movement.walk, 3);
        assert_eq!(config.movement.jump, 0);
        assert_eq!(unit.display_name(), "Atlas AS7-D");
    }

    #[test]
    fn test_rear_armor_merges_into_torsos() {
        let unit = parse(ATLAS_HEADER);
        let armor = &unit.configuration.armor.allocation;

        assert_eq!(armor.get(Location::CenterTorso), LocationArmor::split(47, 14));
        assert_eq!(armor.get(Location::LeftTorso), LocationArmor::split(32, 10));
        assert_eq!(armor.get(Location::Head), LocationArmor::front(9));
        assert_eq!(armor.total(), 304);
    }

    #[test]
    fn test_armor_tonnage_covers_points() {
        let unit = parse(ATLAS_HEADER);
        // 304 points at 16 per ton is 19 tons exactly
        assert_eq!(unit.configuration.armor.tonnage, math::tons(19));
    }

    #[test]
    fn test_missing_chassis_is_error() {
        let err = parse_mtf("mass:50\n").unwrap_err();
        assert!(matches!(err, MtfError::MissingField("chassis")));
    }

    #[test]
    fn test_illegal_mass_is_error() {
        let err = parse_mtf("chassis:Oddball\nmass:52\n").unwrap_err();
        assert!(matches!(
            err,
            MtfError::Construction(ConstructionError::InvalidTonnage(52))
        ));
    }

    #[test]
    fn test_quad_is_rejected() {
        let err = parse_mtf("chassis:Goliath\nConfig:Quad\nmass:80\n").unwrap_err();
        assert!(matches!(err, MtfError::InvalidValue { .. }));
    }

    #[test]
    fn test_bad_number_is_error() {
        let err = parse_mtf("chassis:Atlas\nmass:heavy\n").unwrap_err();
        assert!(matches!(err, MtfError::InvalidValue { ref field, .. } if field == "mass"));
    }

    // ========================================================================
    // Component names
    // ========================================================================

    #[test]
    fn test_engine_names() {
        assert_eq!(engine_type("Fusion Engine(IS)", false), EngineType::Standard);
        assert_eq!(engine_type("XL Engine(IS)", true), EngineType::XlInnerSphere);
        assert_eq!(engine_type("XL (Clan) Engine", false), EngineType::XlClan);
        assert_eq!(engine_type("XL Engine", true), EngineType::XlClan);
        assert_eq!(engine_type("Light Fusion Engine", false), EngineType::Light);
        assert_eq!(engine_type("Compact Fusion Engine", false), EngineType::Compact);
        assert_eq!(engine_type("ICE", false), EngineType::Ice);
    }

    #[test]
    fn test_component_names_follow_chassis() {
        assert_eq!(structure_type("Endo Steel", true), StructureType::EndoSteelClan);
        assert_eq!(structure_type("IS Endo Steel", true), StructureType::EndoSteelInnerSphere);
        assert_eq!(armor_type("Ferro-Fibrous(Clan)", false), ArmorType::FerroFibrousClan);
        assert_eq!(armor_type("Ferro-Fibrous", false), ArmorType::FerroFibrousInnerSphere);
        assert_eq!(heat_sink_type("Double", true), HeatSinkType::DoubleClan);
        assert_eq!(heat_sink_type("Double", false), HeatSinkType::DoubleInnerSphere);
        assert_eq!(heat_sink_type("Single", true), HeatSinkType::Single);
    }

    #[test]
    fn test_clan_unit() {
        let text = "\
chassis:Timber Wolf
model:Prime
techbase:Clan
mass:75
engine:375 XL Engine
structure:Endo Steel
heat sinks:17 Double
walk mp:5
jump mp:0
armor:Ferro-Fibrous
";
        let config = parse(text).configuration;
        assert_eq!(config.tech_base, TechBase::Clan);
        assert_eq!(config.engine.engine_type, EngineType::XlClan);
        assert_eq!(config.structure, StructureType::EndoSteelClan);
        assert_eq!(config.armor.armor_type, ArmorType::FerroFibrousClan);
        assert_eq!(config.heat_sinks.heat_sink_type, HeatSinkType::DoubleClan);
        assert!(!config.mixed_tech);
    }

    #[test]
    fn test_mixed_tech_enables_mixing() {
        let config = parse("chassis:Hybrid\ntechbase:Mixed (IS Chassis)\nmass:50\n").configuration;
        assert_eq!(config.tech_base, TechBase::Mixed);
        assert!(config.mixed_tech);
    }

    // ========================================================================
    // Weapons and criticals
    // ========================================================================

    #[test]
    fn test_weapons_block() {
        let text = "\
chassis:Hunchback
mass:50
Weapons:3
Autocannon/20, Right Torso
Medium Laser, Left Arm
Medium Laser (R), Center Torso
";
        let unit = parse(text);
        assert_eq!(unit.weapons.len(), 3);
        assert_eq!(unit.weapons[0].name, "Autocannon/20");
        assert_eq!(unit.weapons[0].location, Location::RightTorso);
        assert!(unit.weapons[2].rear);
        assert_eq!(unit.weapons[2].name, "Medium Laser");
    }

    #[test]
    fn test_unknown_weapon_location() {
        let err = parse_mtf("chassis:X\nmass:50\nWeapons:1\nLaser, Tail\n").unwrap_err();
        assert!(matches!(err, MtfError::UnknownLocation(ref l) if l == "Tail"));
    }

    #[test]
    fn test_critical_blocks_pad_and_trim() {
        let mut text = String::from("chassis:Atlas\nmass:100\n\nHead:\nLife Support\nSensors\nCockpit\n");
        for _ in 0..9 {
            text.push_str("-Empty-\n");
        }
        text.push_str("\nLeft Arm:\nShoulder\n");
        let unit = parse(&text);

        let head = &unit.criticals[&Location::Head];
        assert_eq!(head.len(), 6);
        assert_eq!(head[2].as_deref(), Some("Cockpit"));
        assert!(head[3..].iter().all(Option::is_none));

        let arm = &unit.criticals[&Location::LeftArm];
        assert_eq!(arm.len(), 12);
        assert_eq!(arm[0].as_deref(), Some("Shoulder"));
    }

    #[test]
    fn test_overfull_block_is_error() {
        let mut text = String::from("chassis:Atlas\nmass:100\nLeft Leg:\n");
        for _ in 0..7 {
            text.push_str("Jump Jet\n");
        }
        let err = parse_mtf(&text).unwrap_err();
        assert!(matches!(
            err,
            MtfError::SectionOverflow { location: Location::LeftLeg, slots: 7, capacity: 6 }
        ));
    }

    #[test]
    fn test_catalog_fields() {
        let text = "\
chassis:Atlas
model:AS7-D
mul_id:140
role:Juggernaut
mass:100
myomer:Standard
manufacturer:Defiance Industries
primaryfactory:Hesperus II
systemmanufacturer:CHASSIS:Foundation Type 10X
systemmanufacturer:ENGINE:Vlar 300
";
        let unit = parse(text);
        assert_eq!(unit.mul_id, Some(140));
        assert_eq!(unit.role.as_deref(), Some("Juggernaut"));
        assert_eq!(unit.myomer.as_deref(), Some("Standard"));
        assert_eq!(unit.manufacturer.as_deref(), Some("Defiance Industries"));
        assert_eq!(unit.primary_factory.as_deref(), Some("Hesperus II"));
        assert_eq!(unit.system_manufacturers.len(), 2);
        assert_eq!(unit.system_manufacturers["CHASSIS"], "Foundation Type 10X");
    }

    #[test]
    fn test_huge_values_do_not_overflow() {
        let text = "chassis:Atlas\nmass:100\nwalk mp:100000000\nCT armor:4294967295\nRTC armor:1\n";
        let unit = parse(text);
        assert_eq!(unit.configuration.engine.rating, u32::MAX);
        assert_eq!(unit.configuration.armor.allocation.total(), u32::MAX);
        assert!(unit.configuration.armor.tonnage > math::tons(100_000_000));
    }

    #[test]
    fn test_malformed_mul_id_is_ignored() {
        let unit = parse("chassis:Atlas\nmass:100\nmul_id:n/a\n");
        assert_eq!(unit.mul_id, None);
    }

    #[test]
    fn test_key_after_block_returns_to_header() {
        let text = "chassis:Atlas\nmass:100\nRight Leg:\nHip\nquirk:command_mech\n";
        let unit = parse(text);
        assert_eq!(unit.quirks, vec!["command_mech".to_string()]);
        assert_eq!(unit.criticals[&Location::RightLeg][0].as_deref(), Some("Hip"));
    }
}
