use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::FormatError;
use super::offsets::OffsetTable;
use super::BLOCK_STRIDE;
use crate::reader::read_u16_at;

/// One of the two physical copies of a mirrored block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockCopy {
    First,
    Second,
}

impl BlockCopy {
    pub fn index(self) -> usize {
        match self {
            Self::First => 0,
            Self::Second => 1,
        }
    }

    pub fn base(self) -> usize {
        self.index() * BLOCK_STRIDE
    }
}

/// Pick the live copy of a block from the save counters stored at
/// `counter_offset` in each copy. Equal counters keep the first copy.
pub fn select_copy(bytes: &[u8], counter_offset: usize) -> Result<BlockCopy, FormatError> {
    let first = read_u16_at(bytes, counter_offset)?;
    let second = read_u16_at(bytes, counter_offset + BLOCK_STRIDE)?;
    Ok(if first >= second {
        BlockCopy::First
    } else {
        BlockCopy::Second
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockSelection {
    pub general: BlockCopy,
    pub storage: BlockCopy,
    /// Not mirrored by a counter in this layout; always the first copy.
    pub hall_of_fame: BlockCopy,
}

impl BlockSelection {
    pub fn select(bytes: &[u8], table: &OffsetTable) -> Result<Self, FormatError> {
        let general = select_copy(bytes, table.general_counter)?;
        let storage = select_copy(bytes, table.storage_counter)?;
        debug!(
            version = %table.version,
            general = general.index(),
            storage = storage.index(),
            "selected live blocks"
        );
        Ok(Self {
            general,
            storage,
            hall_of_fame: BlockCopy::First,
        })
    }
}
