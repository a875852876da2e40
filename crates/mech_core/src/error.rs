//! Error types for the construction engine.
//!
//! Only structural boundary problems are errors. Allocation shortfalls and
//! rule violations are reported as data (see [`crate::special`],
//! [`crate::armor`] and [`crate::validation`]).

use thiserror::Error;

use crate::equipment::InstanceId;
use crate::location::Location;

/// Result type alias using [`ConstructionError`].
pub type Result<T> = std::result::Result<T, ConstructionError>;

/// Top-level error type for malformed input rejected at the engine boundary.
#[derive(Debug, Error)]
pub enum ConstructionError {
    /// Tonnage outside 10-100 or not a multiple of 5.
    #[error("Invalid tonnage {0}: must be between 10 and 100 in steps of 5")]
    InvalidTonnage(u32),

    /// Armor tonnage negative or not a multiple of half a ton.
    #[error("Invalid armor tonnage {0}: must be a non-negative multiple of 0.5")]
    InvalidArmorTonnage(String),

    /// Snapshot written by an incompatible format version.
    #[error("Snapshot version mismatch: expected {expected}, got {found}")]
    SnapshotVersion {
        /// Version this build understands.
        expected: u32,
        /// Version found in the snapshot.
        found: u32,
    },

    /// A snapshot section holds more slots than the location provides.
    #[error("Section {location} holds {slots} slots, capacity is {capacity}")]
    SectionOverflow {
        /// Offending location.
        location: Location,
        /// Number of slots in the section.
        slots: usize,
        /// Capacity of the location.
        capacity: u32,
    },

    /// A slot references an equipment instance the snapshot does not define.
    #[error("Snapshot references unknown equipment instance {0}")]
    UnknownInstance(InstanceId),

    /// The same equipment instance appears twice in a snapshot.
    #[error("Duplicate equipment instance {0} in snapshot")]
    DuplicateInstance(InstanceId),

    /// Equipment catalog data could not be parsed.
    #[error("Failed to parse equipment catalog: {0}")]
    CatalogParse(String),

    /// Encoding or decoding failed.
    #[error("Serialization failed: {0}")]
    Serialization(String),
}
