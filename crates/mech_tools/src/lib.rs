//! # Mech Forge Development Tools
//!
//! Command-line tools for working with unit files:
//! - MegaMek `.mtf` importer and unit library builder
//! - Unit file validator
//! - Armor layout printer

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod convert;
pub mod error;
pub mod library;
pub mod mtf;
pub mod validate;
