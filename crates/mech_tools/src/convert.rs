//! Conversion of `.mtf` files to JSON unit files.

use std::path::{Path, PathBuf};

use crate::error::{Result, ToolError};
use crate::library::{self, Era, UnitIndex};
use crate::mtf::{self, ImportedUnit};

/// Extension of MegaMek unit files.
pub const MTF_EXTENSION: &str = "mtf";

/// Extension of converted unit files.
pub const JSON_EXTENSION: &str = "json";

/// Directory conversion settings.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Only convert units whose era folder contains this text (case-insensitive).
    pub era_filter: Option<String>,
    /// Write `index.json` at the output root afterwards.
    pub write_index: bool,
}

impl ConvertOptions {
    /// Whether a unit of an era passes the era filter.
    #[must_use]
    pub fn accepts(&self, era: Era) -> bool {
        self.era_filter.as_deref().map_or(true, |filter| {
            era.folder_name()
                .contains(filter.trim().to_ascii_lowercase().as_str())
        })
    }
}

/// Outcome of converting a directory.
#[derive(Debug, Default)]
pub struct ConversionSummary {
    /// Files written.
    pub converted: Vec<PathBuf>,
    /// Files left out by the era filter.
    pub skipped: Vec<PathBuf>,
    /// Files that failed, with the reason.
    pub failed: Vec<(PathBuf, String)>,
    /// Index written afterwards, if requested.
    pub index: Option<UnitIndex>,
}

/// Read and parse a `.mtf` file.
pub fn read_mtf(path: &Path) -> Result<ImportedUnit> {
    let text = read_text(path)?;
    mtf::parse_mtf(&text).map_err(|source| ToolError::Mtf {
        path: path.to_path_buf(),
        source,
    })
}

/// Write a unit as pretty-printed JSON.
pub fn write_unit(unit: &ImportedUnit, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(unit).map_err(|source| ToolError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::write(path, json).map_err(|e| ToolError::io(path, e))
}

/// Convert one `.mtf` file to a JSON unit file.
pub fn convert_file(src: &Path, dst: &Path) -> Result<ImportedUnit> {
    let unit = read_mtf(src)?;
    write_unit(&unit, dst)?;
    tracing::info!(unit = %unit.display_name(), dst = %dst.display(), "Converted");
    Ok(unit)
}

/// Convert every `.mtf` file under `src` into a unit library at `dst`.
///
/// Units are filed as `<era>/<rules level>/<Chassis Model>.json`. A file
/// that fails to parse is recorded and the rest are still converted.
pub fn convert_directory(src: &Path, dst: &Path, options: &ConvertOptions) -> Result<ConversionSummary> {
    std::fs::create_dir_all(dst).map_err(|e| ToolError::io(dst, e))?;

    let mut summary = ConversionSummary::default();
    for path in unit_files(src, MTF_EXTENSION)? {
        let unit = match read_mtf(&path) {
            Ok(unit) => unit,
            Err(e) => {
                tracing::error!("Conversion failed: {e}");
                summary.failed.push((path, e.to_string()));
                continue;
            }
        };
        if !options.accepts(library::unit_era(&unit)) {
            tracing::debug!(unit = %unit.display_name(), "Outside era filter");
            summary.skipped.push(path);
            continue;
        }

        let target = dst.join(library::library_path(&unit));
        match write_into(&unit, &target) {
            Ok(()) => {
                tracing::info!(unit = %unit.display_name(), dst = %target.display(), "Converted");
                summary.converted.push(target);
            }
            Err(e) => {
                tracing::error!("Conversion failed: {e}");
                summary.failed.push((path, e.to_string()));
            }
        }
    }

    if options.write_index {
        summary.index = Some(library::generate_index(dst)?);
    }
    Ok(summary)
}

fn write_into(unit: &ImportedUnit, target: &Path) -> Result<()> {
    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ToolError::io(parent, e))?;
    }
    write_unit(unit, target)
}

pub(crate) fn read_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| ToolError::io(path, e))
}

/// Files under `dir`, at any depth, with the extension, sorted by path.
pub(crate) fn unit_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut pending = vec![dir.to_path_buf()];
    while let Some(current) = pending.pop() {
        let entries = std::fs::read_dir(&current).map_err(|e| ToolError::io(&current, e))?;
        for entry in entries {
            let path = entry.map_err(|e| ToolError::io(&current, e))?.path();
            if path.is_dir() {
                pending.push(path);
            } else if path.is_file() && has_extension(&path, extension) {
                files.push(path);
            }
        }
    }
    files.sort();
    Ok(files)
}

pub(crate) fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(extension))
}
