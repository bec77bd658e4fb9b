//! Newtypes and parsers for game / player / season identifiers.

use core::fmt;
use core::str::FromStr;

use crate::errors::CoreError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Opaque id: non-empty, no control characters. Spaces and length are free.
fn is_opaque_id(s: &str) -> bool {
    !s.is_empty() && !s.chars().any(|c| c.is_control())
}

fn is_display_name(s: &str) -> bool {
    !s.trim().is_empty() && !s.chars().any(|c| c.is_control())
}

macro_rules! def_string_id {
    ($name:ident, $check:ident, $err:expr) => {
        #[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
        #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
        #[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
        pub struct $name(String);

        impl $name {
            pub fn as_str(&self) -> &str { &self.0 }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
        }

        impl FromStr for $name {
            type Err = CoreError;
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                if $check(s) { Ok(Self(s.to_string())) } else { Err($err) }
            }
        }

        impl TryFrom<String> for $name {
            type Error = CoreError;
            fn try_from(s: String) -> Result<Self, Self::Error> {
                if $check(&s) { Ok(Self(s)) } else { Err($err) }
            }
        }

        impl From<$name> for String {
            fn from(v: $name) -> String { v.0 }
        }
    };
}

def_string_id!(GameId, is_opaque_id, CoreError::InvalidToken);
def_string_id!(PlayerName, is_display_name, CoreError::InvalidName);

impl PlayerName {
    /// Full name as `"<first> <last>"`. Parts are taken verbatim, so names
    /// differing only in padding stay distinct players.
    pub fn from_parts(first: &str, last: &str) -> Result<Self, CoreError> {
        format!("{first} {last}").parse()
    }
}

/// League season labelled by its **ending** calendar year (e.g. 2023-24 → `2024`).
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct Season(i32);

impl Season {
    pub const fn from_ending_year(year: i32) -> Self { Season(year) }
    pub const fn ending_year(self) -> i32 { self.0 }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Season {
    type Err = CoreError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<i32>().map(Season).map_err(|_| CoreError::InvalidSeason)
    }
}

// Wire form is the decimal label string ("2024"), matching the rendered table.
#[cfg(feature = "serde")]
impl Serialize for Season {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for Season {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s = String::deserialize(d)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
