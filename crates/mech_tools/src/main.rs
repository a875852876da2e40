//! Mech Forge - Development Tools

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use mech_core::armor::ArmorAllocator;
use mech_core::location::Location;
use mech_core::unit::Tonnage;
use mech_tools::convert::ConvertOptions;
use mech_tools::validate::{FileReport, ValidateOptions};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "mech-tools")]
#[command(about = "Development tools for Mech Forge")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate unit files (.json or .mtf)
    Validate {
        /// Unit file or directory of unit files
        #[arg(default_value = "data/units")]
        path: PathBuf,
        /// RON validator configuration
        #[arg(long)]
        config: Option<PathBuf>,
        /// RON equipment catalog for resolving weapon names
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
    /// Convert MegaMek .mtf files to JSON unit files
    Convert {
        /// Source .mtf file or directory (searched recursively)
        src: PathBuf,
        /// Destination .json file or library directory
        dst: PathBuf,
        /// Only convert units whose era folder contains this text
        #[arg(long, short)]
        era: Option<String>,
        /// Write index.json at the library root after converting
        #[arg(long, short)]
        index: bool,
    },
    /// Print the automatic armor layout for a point budget
    Armor {
        /// Armor points to distribute
        points: u32,
        /// Chassis tonnage
        tonnage: u32,
    },
}

fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let ok = match cli.command {
        Commands::Validate {
            path,
            config,
            catalog,
        } => run_validate(&path, config.as_deref(), catalog.as_deref()),
        Commands::Convert {
            src,
            dst,
            era,
            index,
        } => run_convert(
            &src,
            &dst,
            &ConvertOptions {
                era_filter: era,
                write_index: index,
            },
        ),
        Commands::Armor { points, tonnage } => run_armor(points, tonnage),
    };

    if !ok {
        std::process::exit(1);
    }
}

fn run_validate(path: &Path, config: Option<&Path>, catalog: Option<&Path>) -> bool {
    tracing::info!("Validating unit files in: {}", path.display());
    let reports = ValidateOptions::load(config, catalog)
        .and_then(|options| mech_tools::validate::validate_path(path, &options));
    match reports {
        Ok(reports) => {
            reports.iter().for_each(print_report);
            let invalid = reports.iter().filter(|r| !r.is_valid()).count();
            if invalid == 0 {
                tracing::info!("Validation passed ({} files)", reports.len());
                true
            } else {
                tracing::error!("Validation failed: {invalid} of {} files invalid", reports.len());
                false
            }
        }
        Err(e) => {
            tracing::error!("Validation failed: {e}");
            false
        }
    }
}

fn print_report(file: &FileReport) {
    let status = if file.is_valid() { "OK" } else { "INVALID" };
    println!("{status:<8} {} ({})", file.unit, file.path.display());
    for issue in file.report.issues() {
        println!("    {issue}");
    }
    for name in &file.unresolved {
        println!("    unresolved equipment: {name}");
    }
    for name in &file.unplaced {
        println!("    unplaced equipment: {name}");
    }
}

fn run_convert(src: &Path, dst: &Path, options: &ConvertOptions) -> bool {
    if src.is_dir() {
        match mech_tools::convert::convert_directory(src, dst, options) {
            Ok(summary) => {
                tracing::info!(
                    "Converted {} files, {} skipped, {} failed",
                    summary.converted.len(),
                    summary.skipped.len(),
                    summary.failed.len()
                );
                if let Some(index) = &summary.index {
                    tracing::info!("Index generated with {} units", index.total_units);
                }
                summary.failed.is_empty()
            }
            Err(e) => {
                tracing::error!("Conversion failed: {e}");
                false
            }
        }
    } else {
        match mech_tools::convert::convert_file(src, dst) {
            Ok(_) => true,
            Err(e) => {
                tracing::error!("Conversion failed: {e}");
                false
            }
        }
    }
}

fn run_armor(points: u32, tonnage: u32) -> bool {
    let tonnage = match Tonnage::new(tonnage) {
        Ok(tonnage) => tonnage,
        Err(e) => {
            tracing::error!("{e}");
            return false;
        }
    };

    let result = ArmorAllocator::new().allocate(points, tonnage);
    println!("{points} points on {tonnage} tons");
    for location in Location::ALL {
        let armor = result.allocation.get(location);
        if location.has_rear() {
            println!("  {:<3} {:>3} / {:>3}", location.abbreviation(), armor.front, armor.rear);
        } else {
            println!("  {:<3} {:>3}", location.abbreviation(), armor.front);
        }
    }
    println!("  allocated {}, unallocated {}", result.total_allocated, result.unallocated);
    true
}
