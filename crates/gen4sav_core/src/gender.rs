use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Trainer gender byte. Values other than 0/1 are preserved verbatim so a
/// read-modify-write of an unrelated field never normalizes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Unknown(u8),
}

impl Gender {
    pub fn from_raw(raw: u8) -> Self {
        match raw {
            0 => Self::Male,
            1 => Self::Female,
            other => Self::Unknown(other),
        }
    }

    pub fn raw(self) -> u8 {
        match self {
            Self::Male => 0,
            Self::Female => 1,
            Self::Unknown(other) => other,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::Male => "\u{2642}",
            Self::Female => "\u{2640}",
            Self::Unknown(_) => "?",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Male => f.write_str("Male"),
            Self::Female => f.write_str("Female"),
            Self::Unknown(v) => write!(f, "Unknown ({v})"),
        }
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "m" | "male" | "0" => Ok(Self::Male),
            "f" | "female" | "1" => Ok(Self::Female),
            _ => Err(format!(
                "invalid gender '{value}', expected one of: male, female, m, f, 0, 1"
            )),
        }
    }
}
