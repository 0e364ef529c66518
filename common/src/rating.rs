//! [`Rating`]-related definitions.

use std::str::FromStr;

use derive_more::Display;
use rust_decimal::{
    prelude::{FromPrimitive as _, ToPrimitive as _},
    Decimal,
};

/// Decimal rating within `[0, 5]`.
#[derive(
    Clone, Copy, Debug, Default, Display, Eq, Hash, Ord, PartialEq, PartialOrd,
)]
pub struct Rating(Decimal);

impl Rating {
    /// Highest possible [`Rating`].
    pub const MAX: Self = Self(Decimal::from_parts(5, 0, 0, false, 0));

    /// Creates a new [`Rating`] by checking the provided value is within
    /// `[0, 5]`.
    #[must_use]
    pub fn new(val: Decimal) -> Option<Self> {
        (Decimal::ZERO..=Self::MAX.0)
            .contains(&val)
            .then(|| Self(val.normalize()))
    }

    /// Creates a new [`Rating`] out of the provided floating-point value.
    #[must_use]
    pub fn from_f64(val: f64) -> Option<Self> {
        Decimal::from_f64(val).and_then(Self::new)
    }

    /// Returns the inner [`Decimal`] value.
    #[must_use]
    pub const fn get(self) -> Decimal {
        self.0
    }

    /// Returns this [`Rating`] as a floating-point value.
    #[must_use]
    pub fn to_f64(self) -> f64 {
        self.0.to_f64().unwrap_or_default()
    }

    /// Returns the number of fully filled stars of this [`Rating`].
    #[must_use]
    pub fn full_stars(self) -> u8 {
        self.0.floor().to_u8().unwrap_or_default()
    }
}

impl FromStr for Rating {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s.trim())
            .map_err(|_| "invalid rating value")
            .and_then(|d| Self::new(d).ok_or("rating must be within [0, 5]"))
    }
}

#[cfg(feature = "serde")]
mod serde {
    //! Module providing integration with [`serde`] crate.

    use serde::{de::Error, Deserialize, Deserializer, Serialize, Serializer};

    use super::Rating;

    /// Raw representation of a [`Rating`].
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    impl Serialize for Rating {
        fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
            s.serialize_f64(self.to_f64())
        }
    }

    impl<'de> Deserialize<'de> for Rating {
        fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
            match Raw::deserialize(d)? {
                Raw::Number(n) => {
                    Self::from_f64(n).ok_or("rating must be within [0, 5]")
                }
                Raw::Text(s) => s.parse(),
            }
            .map_err(Error::custom)
        }
    }
}
