use serde::{Deserialize, Serialize};

use crate::sav4::FormatError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ByteRange {
    pub start: usize,
    pub end: usize,
}

impl ByteRange {
    pub const fn new(start: usize, len: usize) -> Self {
        Self {
            start,
            end: start + len,
        }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, offset: usize) -> bool {
        (self.start..self.end).contains(&offset)
    }

    pub fn shifted(&self, base: usize) -> Self {
        Self {
            start: self.start + base,
            end: self.end + base,
        }
    }
}

/// Which mirrored block a region or field lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockKind {
    General,
    Storage,
    HallOfFame,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegionId {
    Small,
    Large,
}

impl RegionId {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Large => "large",
        }
    }
}

/// A checksummed span plus the location of its stored CRC. Offsets are
/// relative to the base of `block`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChecksumRegion {
    pub id: RegionId,
    pub block: BlockKind,
    pub range: ByteRange,
    pub stored_at: usize,
}

#[derive(Debug, Clone)]
pub struct BlockLayout {
    pub block_len: usize,
    pub regions: Vec<ChecksumRegion>,
}

impl BlockLayout {
    pub fn validate(&self) -> Result<(), FormatError> {
        if self.regions.is_empty() {
            return Err(FormatError::Layout(
                "block layout must contain at least one checksum region".to_string(),
            ));
        }

        for region in &self.regions {
            if region.range.is_empty() {
                return Err(FormatError::Layout(format!(
                    "empty checksum region {:?}",
                    region.id
                )));
            }
            if region.range.end > self.block_len || region.stored_at + 2 > self.block_len {
                return Err(FormatError::Layout(format!(
                    "checksum region {:?} ({:#x}..{:#x}, stored at {:#x}) exceeds block length {:#x}",
                    region.id, region.range.start, region.range.end, region.stored_at, self.block_len
                )));
            }
            if region.range.contains(region.stored_at) || region.range.contains(region.stored_at + 1)
            {
                return Err(FormatError::Layout(format!(
                    "checksum region {:?} covers its own stored value at {:#x}",
                    region.id, region.stored_at
                )));
            }
        }

        Ok(())
    }
}
