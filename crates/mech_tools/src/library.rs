//! Converted unit library layout.
//!
//! Converted files are filed as `<era>/<rules level>/<Chassis Model>.json`
//! under the output root, with an optional `index.json` at the root listing
//! every unit.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use mech_core::tech::{RulesLevel, TechBase};
use serde::{Deserialize, Serialize};

use crate::convert::{self, JSON_EXTENSION};
use crate::error::{Result, ToolError};
use crate::mtf::ImportedUnit;

/// Year assumed for units that do not declare one.
pub const DEFAULT_YEAR: u32 = 3025;

/// Name of the library index file.
pub const INDEX_FILE_NAME: &str = "index.json";

/// Version written into the index.
pub const INDEX_VERSION: &str = "1.0.0";

/// Characters that cannot appear in file names on common filesystems.
const RESERVED_CHARS: [char; 9] = ['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Historical era a unit was introduced in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Era {
    /// Up to 2570.
    AgeOfWar,
    /// 2571 to 2780.
    StarLeague,
    /// 2781 to 3049.
    SuccessionWars,
    /// 3050 to 3061.
    ClanInvasion,
    /// 3062 to 3067.
    CivilWar,
    /// 3068 to 3080.
    Jihad,
    /// 3081 onward.
    DarkAge,
}

impl Era {
    /// Every era, oldest first.
    pub const ALL: [Self; 7] = [
        Self::AgeOfWar,
        Self::StarLeague,
        Self::SuccessionWars,
        Self::ClanInvasion,
        Self::CivilWar,
        Self::Jihad,
        Self::DarkAge,
    ];

    /// Era containing a year.
    #[must_use]
    pub const fn from_year(year: u32) -> Self {
        match year {
            0..=2570 => Self::AgeOfWar,
            2571..=2780 => Self::StarLeague,
            2781..=3049 => Self::SuccessionWars,
            3050..=3061 => Self::ClanInvasion,
            3062..=3067 => Self::CivilWar,
            3068..=3080 => Self::Jihad,
            _ => Self::DarkAge,
        }
    }

    /// Folder name in the converted library.
    #[must_use]
    pub const fn folder_name(self) -> &'static str {
        match self {
            Self::AgeOfWar => "age-of-war",
            Self::StarLeague => "star-league",
            Self::SuccessionWars => "succession-wars",
            Self::ClanInvasion => "clan-invasion",
            Self::CivilWar => "civil-war",
            Self::Jihad => "jihad",
            Self::DarkAge => "dark-age",
        }
    }
}

impl fmt::Display for Era {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.folder_name())
    }
}

/// Folder name of a rules level in the converted library.
#[must_use]
pub const fn rules_level_folder(level: RulesLevel) -> &'static str {
    match level {
        RulesLevel::Introductory => "introductory",
        RulesLevel::Standard => "standard",
        RulesLevel::Advanced => "advanced",
        RulesLevel::Experimental => "experimental",
    }
}

/// Replace reserved file name characters with `-`.
#[must_use]
pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| if RESERVED_CHARS.contains(&c) { '-' } else { c })
        .collect()
}

/// Era of an imported unit, using [`DEFAULT_YEAR`] when it has none.
#[must_use]
pub fn unit_era(unit: &ImportedUnit) -> Era {
    Era::from_year(unit.configuration.year.unwrap_or(DEFAULT_YEAR))
}

/// Path of a unit relative to the library root.
#[must_use]
pub fn library_path(unit: &ImportedUnit) -> PathBuf {
    let mut path = PathBuf::from(unit_era(unit).folder_name());
    path.push(rules_level_folder(unit.configuration.rules_level));
    path.push(format!("{}.{JSON_EXTENSION}", sanitize_file_name(&unit.display_name())));
    path
}

// ============================================================================
// Index
// ============================================================================

/// One unit in the library index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    /// Chassis name.
    pub chassis: String,
    /// Model designation.
    pub model: String,
    /// Tonnage.
    pub tonnage: u32,
    /// Tech base.
    pub tech_base: TechBase,
    /// Introduction year.
    pub year: Option<u32>,
    /// Battlefield role.
    pub role: Option<String>,
    /// Rules level.
    pub rules_level: RulesLevel,
    /// Path relative to the library root, `/`-separated.
    pub path: String,
}

impl IndexEntry {
    fn new(unit: &ImportedUnit, path: String) -> Self {
        let config = &unit.configuration;
        Self {
            chassis: config.chassis.clone(),
            model: config.model.clone(),
            tonnage: config.tonnage.get(),
            tech_base: config.tech_base,
            year: config.year,
            role: unit.role.clone(),
            rules_level: config.rules_level,
            path,
        }
    }
}

/// Listing of every unit in a converted library.
///
/// # Example JSON
///
/// ```json
/// {
///   "version": "1.0.0",
///   "generated_at": "3067-04-01T12:00:00.000Z",
///   "total_units": 1,
///   "units": [{ "chassis": "Atlas", "model": "AS7-D", "path": "star-league/introductory/Atlas AS7-D.json", ... }]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitIndex {
    /// Index format version.
    pub version: String,
    /// RFC 3339 generation time.
    pub generated_at: String,
    /// Number of entries.
    pub total_units: usize,
    /// Entries sorted by chassis, then model.
    pub units: Vec<IndexEntry>,
}

/// Index every unit file under `root` and write `index.json` there.
pub fn generate_index(root: &Path) -> Result<UnitIndex> {
    generate_index_at(root, Utc::now())
}

/// Index every unit file under `root`, stamped with `generated_at`.
///
/// Files that do not read as imported units are skipped with a warning.
pub fn generate_index_at(root: &Path, generated_at: DateTime<Utc>) -> Result<UnitIndex> {
    let mut units = Vec::new();
    for path in convert::unit_files(root, JSON_EXTENSION)? {
        if is_index_file(&path) {
            continue;
        }
        let unit = match read_unit(&path) {
            Ok(unit) => unit,
            Err(e) => {
                tracing::warn!("Skipping {}: {e}", path.display());
                continue;
            }
        };
        let relative = path.strip_prefix(root).unwrap_or(&path);
        let relative = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        units.push(IndexEntry::new(&unit, relative));
    }
    units.sort_by(|a, b| a.chassis.cmp(&b.chassis).then_with(|| a.model.cmp(&b.model)));

    let index = UnitIndex {
        version: INDEX_VERSION.to_string(),
        generated_at: generated_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        total_units: units.len(),
        units,
    };

    let index_path = root.join(INDEX_FILE_NAME);
    let json = serde_json::to_string_pretty(&index).map_err(|source| ToolError::Json {
        path: index_path.clone(),
        source,
    })?;
    std::fs::write(&index_path, json).map_err(|e| ToolError::io(&index_path, e))?;
    tracing::info!(units = index.total_units, path = %index_path.display(), "Index written");
    Ok(index)
}

/// Whether a path names a library index rather than a unit.
#[must_use]
pub fn is_index_file(path: &Path) -> bool {
    path.file_name().is_some_and(|name| name == INDEX_FILE_NAME)
}

fn read_unit(path: &Path) -> Result<ImportedUnit> {
    let text = convert::read_text(path)?;
    serde_json::from_str(&text).map_err(|source| ToolError::Json {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mtf::parse_mtf;

    fn unit(year: Option<u32>, level: &str) -> ImportedUnit {
        let era = year.map(|y| format!("era:{y}\n")).unwrap_or_default();
        parse_mtf(&format!("chassis:Atlas\nmodel:AS7-D\nmass:100\nrules level:{level}\n{era}")).unwrap()
    }

    #[test]
    fn test_era_boundaries() {
        assert_eq!(Era::from_year(2570), Era::AgeOfWar);
        assert_eq!(Era::from_year(2571), Era::StarLeague);
        assert_eq!(Era::from_year(3049), Era::SuccessionWars);
        assert_eq!(Era::from_year(3050), Era::ClanInvasion);
        assert_eq!(Era::from_year(3067), Era::CivilWar);
        assert_eq!(Era::from_year(3080), Era::Jihad);
        assert_eq!(Era::from_year(3145), Era::DarkAge);
    }

    #[test]
    fn test_era_order_matches_years() {
        for pair in Era::ALL.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("Atlas AS7-D"), "Atlas AS7-D");
        assert_eq!(sanitize_file_name("Mad Cat (Timber Wolf) Prime/A"), "Mad Cat (Timber Wolf) Prime-A");
        assert_eq!(sanitize_file_name(r#"a:b*c?d"e<f>g|h\i"#), "a-b-c-d-e-f-g-h-i");
    }

    #[test]
    fn test_library_path() {
        assert_eq!(
            library_path(&unit(Some(2755), "1")),
            Path::new("star-league").join("introductory").join("Atlas AS7-D.json")
        );
        // no year falls back to 3025
        assert_eq!(
            library_path(&unit(None, "3")),
            Path::new("succession-wars").join("advanced").join("Atlas AS7-D.json")
        );
    }

    #[test]
    fn test_index_file_name() {
        assert!(is_index_file(Path::new("out/index.json")));
        assert!(!is_index_file(Path::new("out/Atlas AS7-D.json")));
    }
}
