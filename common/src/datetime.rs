//! Date and time utilities.

use std::{cmp::Ordering, marker::PhantomData};

use derive_more::Debug;

/// Untyped date and time.
pub type DateTime = DateTimeOf;

/// UTC date and time.
#[derive(Debug)]
pub struct DateTimeOf<Of: ?Sized = ()> {
    /// Inner representation of the date and time.
    inner: time::OffsetDateTime,

    /// Type parameter describing the kind of date and time.
    #[debug(skip)]
    _of: PhantomData<Of>,
}

impl<Of: ?Sized> DateTimeOf<Of> {
    /// Creates a new [`DateTime`] representing the current date and time.
    #[expect(clippy::missing_panics_doc, reason = "infallible")]
    #[must_use]
    pub fn now() -> Self {
        let inner = time::OffsetDateTime::now_utc();
        Self {
            _of: PhantomData,
            inner: inner
                .replace_millisecond(inner.millisecond())
                .expect("infallible"),
        }
    }

    /// Creates a new [`DateTime`] from the provided amount of milliseconds
    /// since the Unix epoch.
    ///
    /// [`None`] is returned if the timestamp is out of range.
    #[must_use]
    pub fn from_unix_millis(millis: i64) -> Option<Self> {
        let nanos = i128::from(millis) * 1_000_000;
        Some(Self {
            inner: time::OffsetDateTime::from_unix_timestamp_nanos(nanos)
                .ok()?,
            _of: PhantomData,
        })
    }

    /// Returns the amount of milliseconds since the Unix epoch of this
    /// [`DateTime`].
    #[expect(
        clippy::cast_possible_truncation,
        reason = "`OffsetDateTime` range fits `i64` milliseconds"
    )]
    #[must_use]
    pub fn unix_millis(&self) -> i64 {
        (self.inner.unix_timestamp_nanos() / 1_000_000) as i64
    }

    /// Coerces one kind of [`DateTime`] into another.
    #[must_use]
    pub fn coerce<NewOf: ?Sized>(self) -> DateTimeOf<NewOf> {
        DateTimeOf {
            inner: self.inner,
            _of: PhantomData,
        }
    }
}

impl<Of: ?Sized> Copy for DateTimeOf<Of> {}
impl<Of: ?Sized> Clone for DateTimeOf<Of> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<Of: ?Sized> Eq for DateTimeOf<Of> {}
impl<Of: ?Sized> PartialEq for DateTimeOf<Of> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<Of: ?Sized> Ord for DateTimeOf<Of> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.inner.cmp(&other.inner)
    }
}
impl<Of: ?Sized> PartialOrd for DateTimeOf<Of> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(feature = "serde")]
pub mod serde {
    //! Module providing integration with [`serde`] crate.

    use super::DateTimeOf;

    pub mod unix_millis {
        //! Module providing serialization and deserialization of
        //! [`DateTimeOf`] as milliseconds since Unix epoch.
        //!
        //! Deserialization accepts both numbers and numeric strings.

        use serde::{de::Error, Deserialize, Deserializer, Serializer};

        use super::DateTimeOf;

        /// Raw representation of milliseconds.
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(i64),
            Text(String),
        }

        /// Serializes the [`DateTimeOf`] as milliseconds since Unix epoch.
        ///
        /// # Errors
        ///
        /// Never errors on its own, only propagates [`Serializer`] errors.
        pub fn serialize<Of, S>(
            dt: &DateTimeOf<Of>,
            serializer: S,
        ) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
            Of: ?Sized,
        {
            serializer.serialize_i64(dt.unix_millis())
        }

        /// Deserializes milliseconds since Unix epoch into a [`DateTimeOf`].
        ///
        /// # Errors
        ///
        /// Returns an error if the timestamp is not a number or is out of
        /// range.
        pub fn deserialize<'de, D, Of>(
            deserializer: D,
        ) -> Result<DateTimeOf<Of>, D::Error>
        where
            D: Deserializer<'de>,
            Of: ?Sized,
        {
            let millis = match Raw::deserialize(deserializer)? {
                Raw::Number(n) => n,
                Raw::Text(s) => s.trim().parse().map_err(Error::custom)?,
            };
            DateTimeOf::from_unix_millis(millis)
                .ok_or_else(|| Error::custom("invalid timestamp"))
        }
    }
}

#[cfg(test)]
mod spec {
    use super::DateTime;

    #[test]
    fn converts_unix_millis() {
        let dt = DateTime::from_unix_millis(1_700_000_000_123).unwrap();

        assert_eq!(dt.unix_millis(), 1_700_000_000_123);
        assert!(DateTime::from_unix_millis(-1).is_some());
        assert!(DateTime::from_unix_millis(i64::MAX).is_none());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserializes_numbers_and_numeric_strings() {
        #[derive(serde::Deserialize)]
        struct At {
            #[serde(with = "super::serde::unix_millis")]
            at: DateTime,
        }

        let number: At = serde_json::from_str(r#"{"at": 1000}"#).unwrap();
        let text: At = serde_json::from_str(r#"{"at": "1000"}"#).unwrap();

        assert_eq!(number.at, text.at);
        assert_eq!(number.at.unix_millis(), 1000);
        assert!(serde_json::from_str::<At>(r#"{"at": "soon"}"#).is_err());
    }
}
