use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::offsets::table_for;
use super::{BLOCK_STRIDE, SAVE_SIZE};
use crate::reader::read_u32_at;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Version {
    DiamondPearl,
    Platinum,
    HeartGoldSoulSilver,
}

impl Version {
    /// Priority order; the first entry is the default for blank saves.
    pub const ALL: [Version; 3] = [
        Version::DiamondPearl,
        Version::Platinum,
        Version::HeartGoldSoulSilver,
    ];

    pub fn tag(self) -> u8 {
        match self {
            Self::DiamondPearl => 0,
            Self::Platinum => 1,
            Self::HeartGoldSoulSilver => 2,
        }
    }

    pub fn from_tag(tag: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.tag() == tag)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::DiamondPearl => "DP",
            Self::Platinum => "Pt",
            Self::HeartGoldSoulSilver => "HGSS",
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Version {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "0" | "dp" | "diamond" | "pearl" => Ok(Self::DiamondPearl),
            "1" | "pt" | "platinum" => Ok(Self::Platinum),
            "2" | "hgss" | "heartgold" | "soulsilver" => Ok(Self::HeartGoldSoulSilver),
            _ => Err(format!(
                "invalid version '{value}', expected one of: dp, pt, hgss (or 0, 1, 2)"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Known(Version),
    /// All-zero image; treated as a fresh save of the contained version.
    Blank(Version),
    Unresolved,
}

impl Resolution {
    pub fn version(self) -> Option<Version> {
        match self {
            Self::Known(v) | Self::Blank(v) => Some(v),
            Self::Unresolved => None,
        }
    }

    pub fn is_blank(self) -> bool {
        matches!(self, Self::Blank(_))
    }
}

/// Classify a raw image. Never fails: anything that cannot be pinned to a
/// single layout comes back as [`Resolution::Unresolved`].
pub fn resolve(bytes: &[u8], version_override: Option<Version>) -> Resolution {
    let blank = bytes.iter().all(|&b| b == 0);

    if let Some(version) = version_override {
        debug!(%version, "version forced by override");
        return if blank {
            Resolution::Blank(version)
        } else {
            Resolution::Known(version)
        };
    }

    if bytes.len() != SAVE_SIZE {
        debug!(len = bytes.len(), "image length does not match any layout");
        return Resolution::Unresolved;
    }

    if blank {
        debug!(version = %Version::ALL[0], "blank image, using default version");
        return Resolution::Blank(Version::ALL[0]);
    }

    let mut matches = Version::ALL
        .into_iter()
        .filter(|&version| has_marker(bytes, version));

    match (matches.next(), matches.next()) {
        (Some(version), None) => {
            debug!(%version, "resolved version from general block footer");
            Resolution::Known(version)
        }
        (Some(_), Some(_)) => {
            debug!("footer markers of several versions present");
            Resolution::Unresolved
        }
        (None, _) => Resolution::Unresolved,
    }
}

fn has_marker(bytes: &[u8], version: Version) -> bool {
    let marker = table_for(version).general_marker;
    (0..2).any(|copy| {
        read_u32_at(bytes, marker.offset + copy * BLOCK_STRIDE)
            .is_ok_and(|value| value == marker.value)
    })
}
