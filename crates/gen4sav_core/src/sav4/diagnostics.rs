use std::fmt;

use serde::{Deserialize, Serialize};

use super::offsets::PouchKind;
use crate::layout::RegionId;

/// Best-effort anomalies absorbed during decode/encode. None of these stop
/// the pass that produced them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    ChecksumMismatch {
        region: RegionId,
        stored: u16,
        computed: u16,
    },
    /// Slot id has no entry in the item-name table; the slot was dropped.
    UnknownItem {
        pouch: PouchKind,
        slot: usize,
        item_id: u16,
    },
    /// Slot id is a real item but not legal for the pouch; it was blanked.
    IllegalItem {
        pouch: PouchKind,
        slot: usize,
        item_id: u16,
    },
    /// Edited count was not an integer and was stored as 1.
    MalformedCount {
        pouch: PouchKind,
        entry: usize,
        raw: String,
    },
    /// More surviving entries than slots; the tail was not written.
    PouchOverflow {
        pouch: PouchKind,
        capacity: usize,
        dropped: usize,
    },
    /// Record kind disagrees with its slab position; it was not written.
    RecordKindMismatch { index: usize },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ChecksumMismatch {
                region,
                stored,
                computed,
            } => write!(
                f,
                "{} block checksum is invalid (stored {stored:#06x}, computed {computed:#06x})",
                region.as_str()
            ),
            Self::UnknownItem {
                pouch,
                slot,
                item_id,
            } => write!(
                f,
                "unknown item id {item_id} in {} slot {slot} was removed",
                pouch.label()
            ),
            Self::IllegalItem {
                pouch,
                slot,
                item_id,
            } => write!(
                f,
                "item id {item_id} is not allowed in {} (slot {slot}) and was removed",
                pouch.label()
            ),
            Self::MalformedCount { pouch, entry, raw } => write!(
                f,
                "count '{raw}' for {} entry {entry} is not a number; stored as 1",
                pouch.label()
            ),
            Self::PouchOverflow {
                pouch,
                capacity,
                dropped,
            } => write!(
                f,
                "{} holds {capacity} slots; {dropped} entries were not written",
                pouch.label()
            ),
            Self::RecordKindMismatch { index } => {
                write!(f, "gift record {index} has the wrong kind and was skipped")
            }
        }
    }
}
