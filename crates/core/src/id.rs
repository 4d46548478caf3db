//! Strongly-typed numeric identifiers used across the domain.
//!
//! Entity keys are assigned by the backing store, so services pass them
//! around as plain `i64` surrogates wrapped in per-entity newtypes. The
//! newtype boundary keeps identifiers of different entities from mixing.

/// Define an `i64`-backed identifier newtype.
///
/// Domain crates use this for their own entity keys (plans, subscriptions,
/// app entries); the shared `AccountId` lives here because several crates
/// reference the owning account.
#[macro_export]
macro_rules! numeric_id {
    ($t:ident, $name:literal) => {
        #[derive(
            Debug,
            Copy,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            serde::Serialize,
            serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $t(i64);

        impl $t {
            pub fn from_raw(raw: i64) -> Self {
                Self(raw)
            }

            pub fn as_i64(&self) -> i64 {
                self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<i64> for $t {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl From<$t> for i64 {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl core::str::FromStr for $t {
            type Err = $crate::error::DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let raw: i64 = s
                    .parse()
                    .map_err(|e| $crate::error::DomainError::invalid_id(format!("{}: {}", $name, e)))?;
                Ok(Self(raw))
            }
        }
    };
}

numeric_id!(AccountId, "AccountId");

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DomainError;
    use core::str::FromStr;

    #[test]
    fn parses_from_string() {
        let id = AccountId::from_str("42").unwrap();
        assert_eq!(id.as_i64(), 42);
    }

    #[test]
    fn rejects_non_numeric_input() {
        let err = AccountId::from_str("abc").unwrap_err();
        assert!(matches!(err, DomainError::InvalidId(_)));
    }

    #[test]
    fn round_trips_through_i64() {
        let id = AccountId::from_raw(7);
        assert_eq!(AccountId::from(i64::from(id)), id);
    }
}
