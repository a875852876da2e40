//! Fixed-point tonnage utilities.
//!
//! Construction weights come in half-ton (and occasionally quarter-ton)
//! steps. Summing them in floating point drifts, so all weight math uses
//! fixed-point arithmetic and only converts to `f64` at the serialization
//! boundary, where every legal value is exactly representable.

use fixed::types::I32F32;

/// Fixed-point number type for all weight math.
///
/// Uses 32 bits for integer part and 32 bits for fractional part.
pub type Fixed = I32F32;

/// Create a fixed-point tonnage from whole tons.
#[must_use]
pub fn tons(n: i32) -> Fixed {
    Fixed::from_num(n)
}

/// Create a fixed-point tonnage from a count of half tons.
#[must_use]
pub fn half_tons(halves: i32) -> Fixed {
    Fixed::from_num(halves) / Fixed::from_num(2)
}

/// Round a weight up to the next half ton.
///
/// Weights too large to double saturate instead of overflowing.
#[must_use]
pub fn round_up_to_half_ton(weight: Fixed) -> Fixed {
    let two = Fixed::from_num(2);
    weight.saturating_mul(two).saturating_ceil() / two
}

/// Check whether a weight is an exact multiple of half a ton.
#[must_use]
pub fn is_half_ton_multiple(weight: Fixed) -> bool {
    weight
        .checked_mul(Fixed::from_num(2))
        .is_some_and(|halves| halves.frac() == Fixed::ZERO)
}

/// Scale a weight by a percentage (e.g. 50 for XL engines), saturating.
#[must_use]
pub fn percent_of(weight: Fixed, percent: u32) -> Fixed {
    weight.saturating_mul(Fixed::saturating_from_num(percent)) / Fixed::from_num(100)
}

/// Format a tonnage for messages: `5`, `5.5`, `0.25`.
#[must_use]
pub fn format_tons(weight: Fixed) -> String {
    format!("{}", weight.to_num::<f64>())
}

/// Serde support for tonnage values.
///
/// Serializes as a plain number of tons so snapshots stay readable JSON.
/// Half and quarter tons are exact in `f64`, so the round trip is lossless.
pub mod tons_serde {
    use super::Fixed;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serialize a tonnage as `f64`.
    pub fn serialize<S>(value: &Fixed, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        value.to_num::<f64>().serialize(serializer)
    }

    /// Deserialize a tonnage from `f64`.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Fixed, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = f64::deserialize(deserializer)?;
        Fixed::checked_from_num(raw)
            .ok_or_else(|| D::Error::custom(format!("tonnage {raw} is out of range")))
    }
}

/// Serde support for `Option<Fixed>` tonnages.
pub mod option_tons_serde {
    use super::Fixed;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serialize an optional tonnage as `Option<f64>`.
    pub fn serialize<S>(value: &Option<Fixed>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        value.map(|v| v.to_num::<f64>()).serialize(serializer)
    }

    /// Deserialize an optional tonnage from `Option<f64>`.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Fixed>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<f64>::deserialize(deserializer)? {
            Some(raw) => Fixed::checked_from_num(raw)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("tonnage {raw} is out of range"))),
            None => Ok(None),
        }
    }
}
