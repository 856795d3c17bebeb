//! Bag pouches: fixed arrays of `(item id, count)` slots.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::diagnostics::Diagnostic;
use super::error::FormatError;
use super::legal::LegalItems;
use super::offsets::{PouchKind, PouchLayout};
use super::SaveImage;
use crate::reader::{LittleEndianReader, slice_at_mut};

pub const NO_ITEM: u16 = 0;

/// Ordered item-name table; index 0 is "no item".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemNames {
    names: Vec<String>,
}

impl ItemNames {
    pub fn from_names(names: Vec<String>) -> Self {
        Self { names }
    }

    /// Placeholder names for every id up to `max_item_id`.
    pub fn numbered(max_item_id: u16) -> Self {
        let names = (0..=max_item_id)
            .map(|id| {
                if id == NO_ITEM {
                    "(None)".to_string()
                } else {
                    format!("Item #{id:03}")
                }
            })
            .collect();
        Self { names }
    }

    /// One name per line; blank lines keep their index.
    pub fn parse_lines(text: &str) -> Self {
        Self {
            names: text.lines().map(|line| line.trim().to_string()).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, id: u16) -> bool {
        usize::from(id) < self.names.len()
    }

    pub fn name(&self, id: u16) -> Option<&str> {
        self.names.get(usize::from(id)).map(String::as_str)
    }

    /// Case-insensitive lookup of the first id carrying `name`.
    pub fn id_of(&self, name: &str) -> Option<u16> {
        let wanted = name.trim();
        if wanted.is_empty() {
            return None;
        }
        self.names
            .iter()
            .position(|candidate| candidate.eq_ignore_ascii_case(wanted))
            .and_then(|index| u16::try_from(index).ok())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemRef {
    Id(u16),
    Name(String),
}

/// One row of a pouch as a host edits it. The count is kept as entered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditedSlot {
    pub item: ItemRef,
    pub count: String,
}

impl EditedSlot {
    pub fn new(item: ItemRef, count: impl Into<String>) -> Self {
        Self {
            item,
            count: count.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PouchSlot {
    pub item_id: u16,
    pub count: u16,
}

impl PouchSlot {
    pub fn is_empty(&self) -> bool {
        self.item_id == NO_ITEM
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PouchDecode {
    pub kind: PouchKind,
    pub slots: Vec<PouchSlot>,
    pub diagnostics: Vec<Diagnostic>,
}

pub fn decode_pouch(
    bytes: &[u8],
    base: usize,
    layout: &PouchLayout,
    legal: &LegalItems,
    names: &ItemNames,
) -> Result<PouchDecode, FormatError> {
    let mut reader = LittleEndianReader::at(bytes, base + layout.offset);
    let mut slots = Vec::with_capacity(layout.capacity);
    let mut diagnostics = Vec::new();

    for slot in 0..layout.capacity {
        let item_id = reader.read_u16()?;
        let count = reader.read_u16()?;

        if !names.contains(item_id) {
            warn!(pouch = layout.kind.as_str(), slot, item_id, "unknown item dropped");
            diagnostics.push(Diagnostic::UnknownItem {
                pouch: layout.kind,
                slot,
                item_id,
            });
            continue;
        }

        if !legal.allows(layout.kind, item_id) {
            warn!(pouch = layout.kind.as_str(), slot, item_id, "illegal item blanked");
            diagnostics.push(Diagnostic::IllegalItem {
                pouch: layout.kind,
                slot,
                item_id,
            });
            slots.push(PouchSlot::default());
            continue;
        }

        slots.push(PouchSlot { item_id, count });
    }

    Ok(PouchDecode {
        kind: layout.kind,
        slots,
        diagnostics,
    })
}

fn resolve_item(item: &ItemRef, names: &ItemNames) -> u16 {
    match item {
        ItemRef::Id(id) => *id,
        ItemRef::Name(name) => names.id_of(name).unwrap_or(NO_ITEM),
    }
}

fn normalize_count(raw: &str, max_count: u16) -> Option<u16> {
    let parsed = raw.trim().parse::<i64>().ok()?;
    Some(if parsed <= 0 {
        1
    } else if parsed > i64::from(max_count) {
        max_count
    } else {
        parsed as u16
    })
}

/// Drop "no item" rows, keep the rest in order and clamp counts into
/// `1..=max_count`.
pub fn compact(
    kind: PouchKind,
    max_count: u16,
    entries: &[EditedSlot],
    names: &ItemNames,
) -> (Vec<PouchSlot>, Vec<Diagnostic>) {
    let mut slots = Vec::with_capacity(entries.len());
    let mut diagnostics = Vec::new();

    for (entry, edited) in entries.iter().enumerate() {
        let item_id = resolve_item(&edited.item, names);
        if item_id == NO_ITEM {
            continue;
        }
        let count = normalize_count(&edited.count, max_count).unwrap_or_else(|| {
            diagnostics.push(Diagnostic::MalformedCount {
                pouch: kind,
                entry,
                raw: edited.count.clone(),
            });
            1
        });
        slots.push(PouchSlot { item_id, count });
    }

    (slots, diagnostics)
}

/// Write `slots` from the first slot on and zero the rest. Returns how many
/// slots did not fit.
fn write_slots(
    bytes: &mut [u8],
    base: usize,
    layout: &PouchLayout,
    slots: &[PouchSlot],
) -> Result<usize, FormatError> {
    let region = slice_at_mut(bytes, base + layout.offset, layout.byte_len(), "pouch")?;
    region.fill(0);
    for (chunk, slot) in region
        .chunks_exact_mut(PouchLayout::SLOT_SIZE)
        .zip(slots)
    {
        chunk[..2].copy_from_slice(&slot.item_id.to_le_bytes());
        chunk[2..].copy_from_slice(&slot.count.to_le_bytes());
    }
    Ok(slots.len().saturating_sub(layout.capacity))
}

pub fn encode_pouch(
    bytes: &mut [u8],
    base: usize,
    layout: &PouchLayout,
    entries: &[EditedSlot],
    names: &ItemNames,
) -> Result<Vec<Diagnostic>, FormatError> {
    let (slots, mut diagnostics) = compact(layout.kind, layout.max_count, entries, names);
    let dropped = write_slots(bytes, base, layout, &slots)?;
    if dropped > 0 {
        warn!(pouch = layout.kind.as_str(), dropped, "pouch overflow");
        diagnostics.push(Diagnostic::PouchOverflow {
            pouch: layout.kind,
            capacity: layout.capacity,
            dropped,
        });
    }
    Ok(diagnostics)
}

impl SaveImage {
    pub fn pouch(&self, kind: PouchKind, names: &ItemNames) -> Result<PouchDecode, FormatError> {
        decode_pouch(
            self.as_bytes(),
            self.general_base(),
            self.table().pouch(kind),
            self.legal_items(),
            names,
        )
    }

    pub fn set_pouch(
        &mut self,
        kind: PouchKind,
        entries: &[EditedSlot],
        names: &ItemNames,
    ) -> Result<Vec<Diagnostic>, FormatError> {
        let base = self.general_base();
        let layout = *self.table().pouch(kind);
        encode_pouch(self.bytes_mut(), base, &layout, entries, names)
    }

    /// Fill the pouch with every legal item the name table knows, each at
    /// `count` (clamped into the pouch's range).
    pub fn give_all(
        &mut self,
        kind: PouchKind,
        count: u16,
        names: &ItemNames,
    ) -> Result<usize, FormatError> {
        let base = self.general_base();
        let layout = *self.table().pouch(kind);
        let count = count.clamp(1, layout.max_count);
        let slots: Vec<PouchSlot> = self
            .legal_items()
            .ids(kind)
            .iter()
            .copied()
            .filter(|&id| id != NO_ITEM && names.contains(id))
            .take(layout.capacity)
            .map(|item_id| PouchSlot { item_id, count })
            .collect();
        write_slots(self.bytes_mut(), base, &layout, &slots)?;
        Ok(slots.len())
    }

    pub fn clear_pouch(&mut self, kind: PouchKind) -> Result<(), FormatError> {
        let base = self.general_base();
        let layout = *self.table().pouch(kind);
        write_slots(self.bytes_mut(), base, &layout, &[])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{EditedSlot, ItemNames, ItemRef, normalize_count};

    #[test]
    fn count_normalization_clamps_into_range() {
        assert_eq!(normalize_count("0", 995), Some(1));
        assert_eq!(normalize_count("-4", 995), Some(1));
        assert_eq!(normalize_count(" 12 ", 995), Some(12));
        assert_eq!(normalize_count("100000000000", 95), Some(95));
        assert_eq!(normalize_count("lots", 995), None);
    }

    #[test]
    fn names_resolve_case_insensitively() {
        let names = ItemNames::parse_lines("(None)\nMaster Ball\r\nUltra Ball\n");
        assert_eq!(names.len(), 3);
        assert_eq!(names.id_of("ultra ball"), Some(2));
        assert_eq!(names.id_of("Rare Candy"), None);
        assert_eq!(names.name(1), Some("Master Ball"));

        let edited = EditedSlot::new(ItemRef::Name("Master Ball".into()), "3");
        assert_eq!(edited.count, "3");
    }
}
