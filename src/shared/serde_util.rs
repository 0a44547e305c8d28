//! Custom serde helpers for remote wire formats.

/// Deserializes a ledger `nat` that may arrive as a decimal string or as a
/// JSON number; serializes it back as a string.
pub mod nat_string {
    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};
    use std::fmt;

    pub fn serialize<S>(value: &u128, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<u128, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct NatVisitor;

        impl Visitor<'_> for NatVisitor {
            type Value = u128;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a non-negative integer or integer string")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<u128, E> {
                Ok(v as u128)
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<u128, E> {
                u128::try_from(v).map_err(|_| E::custom(format!("negative nat: {}", v)))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<u128, E> {
                v.replace('_', "")
                    .parse::<u128>()
                    .map_err(|e| E::custom(format!("invalid nat '{}': {}", v, e)))
            }
        }

        deserializer.deserialize_any(NatVisitor)
    }
}
