//! Unit file validation.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use mech_core::equipment::EquipmentCatalog;
use mech_core::snapshot::UnitSnapshot;
use mech_core::state::UnitStateManager;
use mech_core::validation::{ConstructionValidator, RuleRegistry, ValidationReport, ValidatorConfig};

use crate::convert::{self, JSON_EXTENSION, MTF_EXTENSION};
use crate::error::{Result, ToolError};
use crate::library;
use crate::mtf::ImportedUnit;

/// Validator and catalog shared by every file in a run.
#[derive(Debug, Clone)]
pub struct ValidateOptions {
    /// Rule set to apply.
    pub validator: Arc<ConstructionValidator>,
    /// Catalog used to resolve weapon names in imported units.
    pub catalog: EquipmentCatalog,
}

impl Default for ValidateOptions {
    fn default() -> Self {
        Self {
            validator: Arc::new(ConstructionValidator::standard()),
            catalog: EquipmentCatalog::new(),
        }
    }
}

impl ValidateOptions {
    /// Load options from optional RON files.
    ///
    /// `config` holds a [`ValidatorConfig`], `catalog` an equipment catalog.
    pub fn load(config: Option<&Path>, catalog: Option<&Path>) -> Result<Self> {
        let mut options = Self::default();
        if let Some(path) = config {
            let config = ValidatorConfig::from_ron_str(&convert::read_text(path)?)?;
            tracing::debug!(path = %path.display(), disabled = ?config.disabled_rules, "Loaded validator config");
            options.validator = Arc::new(ConstructionValidator::new(RuleRegistry::with_config(&config)));
        }
        if let Some(path) = catalog {
            options.catalog = EquipmentCatalog::from_ron_str(&convert::read_text(path)?)?;
            tracing::debug!(path = %path.display(), records = options.catalog.len(), "Loaded catalog");
        }
        Ok(options)
    }
}

/// A unit file as stored on disk.
#[derive(Debug, Clone)]
pub enum UnitDocument {
    /// A converted `.mtf` unit.
    Imported(ImportedUnit),
    /// A saved editor state.
    Snapshot(UnitSnapshot),
}

/// Validation outcome for one file.
#[derive(Debug, Clone)]
pub struct FileReport {
    /// File checked.
    pub path: PathBuf,
    /// "Chassis Model" label.
    pub unit: String,
    /// Rule findings.
    pub report: ValidationReport,
    /// Weapon names the catalog does not know.
    pub unresolved: Vec<String>,
    /// Weapons that did not fit in their listed location.
    pub unplaced: Vec<String>,
}

impl FileReport {
    /// Whether the unit passed every rule.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.report.is_valid
    }
}

/// Read a `.mtf` or JSON unit file.
///
/// JSON files carrying a `version` field are snapshots; any other JSON
/// file is an imported unit.
pub fn load_unit(path: &Path) -> Result<UnitDocument> {
    if convert::has_extension(path, MTF_EXTENSION) {
        return convert::read_mtf(path).map(UnitDocument::Imported);
    }
    if !convert::has_extension(path, JSON_EXTENSION) {
        return Err(ToolError::UnsupportedFile(path.to_path_buf()));
    }

    let text = convert::read_text(path)?;
    let json_error = |source| ToolError::Json {
        path: path.to_path_buf(),
        source,
    };
    let value: serde_json::Value = serde_json::from_str(&text).map_err(json_error)?;
    if value.get("version").is_some() {
        Ok(UnitDocument::Snapshot(UnitSnapshot::from_json(&text)?))
    } else {
        serde_json::from_value(value)
            .map(UnitDocument::Imported)
            .map_err(json_error)
    }
}

/// Validate one unit file.
pub fn validate_file(path: &Path, options: &ValidateOptions) -> Result<FileReport> {
    let validator = Arc::clone(&options.validator);
    let file_report = match load_unit(path)? {
        UnitDocument::Imported(unit) => {
            let mounted = unit.mount(&options.catalog, validator)?;
            FileReport {
                path: path.to_path_buf(),
                unit: unit.display_name(),
                report: mounted.manager.validation_report().clone(),
                unresolved: mounted.unresolved,
                unplaced: mounted.unplaced,
            }
        }
        UnitDocument::Snapshot(snapshot) => {
            let manager = UnitStateManager::from_snapshot(snapshot, validator)?;
            let config = manager.configuration();
            FileReport {
                path: path.to_path_buf(),
                unit: format!("{} {}", config.chassis, config.model),
                report: manager.validation_report().clone(),
                unresolved: Vec::new(),
                unplaced: Vec::new(),
            }
        }
    };

    tracing::debug!(
        path = %path.display(),
        valid = file_report.report.is_valid,
        errors = file_report.report.error_count,
        warnings = file_report.report.warning_count,
        "Validated"
    );
    Ok(file_report)
}

/// Validate a unit file, or every unit file under a directory.
///
/// Library `index.json` files are skipped.
///
/// # Errors
///
/// Returns the first file that cannot be read or parsed. Rule violations
/// are not errors; they are carried in the reports.
pub fn validate_path(path: &Path, options: &ValidateOptions) -> Result<Vec<FileReport>> {
    if !path.is_dir() {
        return Ok(vec![validate_file(path, options)?]);
    }

    let mut files = convert::unit_files(path, JSON_EXTENSION)?;
    files.retain(|file| !library::is_index_file(file));
    files.extend(convert::unit_files(path, MTF_EXTENSION)?);
    files.sort();
    files
        .iter()
        .map(|file| validate_file(file, options))
        .collect()
}
