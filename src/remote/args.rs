//! Typed remote-call arguments.
//!
//! Arguments are compared structurally so a binding can tell whether a new
//! argument tuple is actually different from the last one. Large integers are
//! held as `u128`/`i128` so two values built from different source widths
//! still compare equal.

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

/// A single remote-procedure argument value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Arg {
    Null,
    Bool(bool),
    Nat(u128),
    Int(i128),
    Text(String),
    Principal(String),
    Opt(Option<Box<Arg>>),
    Vec(Vec<Arg>),
    Record(BTreeMap<String, Arg>),
    Variant(String, Box<Arg>),
}

impl Arg {
    pub fn record<K, I>(fields: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Arg)>,
    {
        Arg::Record(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// A variant with no payload, e.g. `{ "Forward": null }`.
    pub fn tag(name: impl Into<String>) -> Self {
        Arg::Variant(name.into(), Box::new(Arg::Null))
    }

    pub fn some(value: impl Into<Arg>) -> Self {
        Arg::Opt(Some(Box::new(value.into())))
    }

    pub fn none() -> Self {
        Arg::Opt(None)
    }
}

/// Nat and int are written as decimal strings; opt as a 0/1-element array.
impl Serialize for Arg {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Arg::Null => serializer.serialize_unit(),
            Arg::Bool(b) => serializer.serialize_bool(*b),
            Arg::Nat(n) => serializer.collect_str(n),
            Arg::Int(i) => serializer.collect_str(i),
            Arg::Text(s) | Arg::Principal(s) => serializer.serialize_str(s),
            Arg::Opt(inner) => {
                let mut seq = serializer.serialize_seq(Some(inner.is_some() as usize))?;
                if let Some(v) = inner {
                    seq.serialize_element(v.as_ref())?;
                }
                seq.end()
            }
            Arg::Vec(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Arg::Record(fields) => {
                let mut map = serializer.serialize_map(Some(fields.len()))?;
                for (k, v) in fields {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
            Arg::Variant(tag, payload) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(tag, payload.as_ref())?;
                map.end()
            }
        }
    }
}

impl From<bool> for Arg {
    fn from(v: bool) -> Self {
        Arg::Bool(v)
    }
}

macro_rules! nat_from {
    ($($t:ty),*) => {
        $(impl From<$t> for Arg {
            fn from(v: $t) -> Self {
                Arg::Nat(v as u128)
            }
        })*
    };
}

macro_rules! int_from {
    ($($t:ty),*) => {
        $(impl From<$t> for Arg {
            fn from(v: $t) -> Self {
                Arg::Int(v as i128)
            }
        })*
    };
}

nat_from!(u8, u16, u32, u64, u128, usize);
int_from!(i8, i16, i32, i64, i128);

impl From<&str> for Arg {
    fn from(v: &str) -> Self {
        Arg::Text(v.to_string())
    }
}

impl From<String> for Arg {
    fn from(v: String) -> Self {
        Arg::Text(v)
    }
}

impl<T: Into<Arg>> From<Option<T>> for Arg {
    fn from(v: Option<T>) -> Self {
        Arg::Opt(v.map(|inner| Box::new(inner.into())))
    }
}

impl<T: Into<Arg>> From<Vec<T>> for Arg {
    fn from(v: Vec<T>) -> Self {
        Arg::Vec(v.into_iter().map(Into::into).collect())
    }
}

/// An ordered argument tuple for one remote call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct CallArgs(Vec<Arg>);

impl CallArgs {
    pub fn new(args: Vec<Arg>) -> Self {
        Self(args)
    }

    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn one(arg: impl Into<Arg>) -> Self {
        Self(vec![arg.into()])
    }

    pub fn push(mut self, arg: impl Into<Arg>) -> Self {
        self.0.push(arg.into());
        self
    }

    pub fn as_slice(&self) -> &[Arg] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<Arg>> for CallArgs {
    fn from(v: Vec<Arg>) -> Self {
        Self(v)
    }
}

impl FromIterator<Arg> for CallArgs {
    fn from_iter<I: IntoIterator<Item = Arg>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
