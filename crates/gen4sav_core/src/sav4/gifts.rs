//! Mystery-gift received flags and the stored gift card slab.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::diagnostics::Diagnostic;
use super::error::FormatError;
use super::SaveImage;
use crate::reader::{slice_at, slice_at_mut};

pub const GIFT_FLAG_COUNT: usize = 0x800;
pub const GIFT_FLAG_BYTES: usize = GIFT_FLAG_COUNT.div_ceil(8);

pub const PGT_COUNT: usize = 8;
pub const PCD_COUNT: usize = 3;
pub const SLAB_RECORDS: usize = PGT_COUNT + PCD_COUNT;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GiftKind {
    /// Wonder card received in-game, awaiting pickup.
    Pgt,
    /// Full wonder card including its display data.
    Pcd,
}

impl GiftKind {
    pub const fn size(self) -> usize {
        match self {
            Self::Pgt => 0x104,
            Self::Pcd => 0x358,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pgt => "pgt",
            Self::Pcd => "pcd",
        }
    }

    /// Kind expected at slab position `index`.
    pub fn at_position(index: usize) -> Option<Self> {
        match index {
            i if i < PGT_COUNT => Some(Self::Pgt),
            i if i < SLAB_RECORDS => Some(Self::Pcd),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GiftRecord {
    pub kind: GiftKind,
    pub data: Vec<u8>,
}

impl GiftRecord {
    pub fn empty(kind: GiftKind) -> Self {
        Self {
            kind,
            data: vec![0; kind.size()],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.iter().all(|&b| b == 0)
    }
}

/// Byte offset of record `index` relative to the slab start.
pub fn record_offset(index: usize) -> usize {
    if index < PGT_COUNT {
        index * GiftKind::Pgt.size()
    } else {
        PGT_COUNT * GiftKind::Pgt.size() + (index - PGT_COUNT) * GiftKind::Pcd.size()
    }
}

pub fn decode_flags(bytes: &[u8], offset: usize) -> Result<Vec<bool>, FormatError> {
    let packed = slice_at(bytes, offset, GIFT_FLAG_BYTES, "gift flags")?;
    Ok((0..GIFT_FLAG_COUNT)
        .map(|i| (packed[i / 8] >> (i % 8)) & 1 == 1)
        .collect())
}

pub fn encode_flags(bytes: &mut [u8], offset: usize, flags: &[bool]) -> Result<(), FormatError> {
    if flags.len() != GIFT_FLAG_COUNT {
        return Err(FormatError::FlagLengthMismatch {
            expected: GIFT_FLAG_COUNT,
            actual: flags.len(),
        });
    }
    let packed = slice_at_mut(bytes, offset, GIFT_FLAG_BYTES, "gift flags")?;
    for (byte, chunk) in packed.iter_mut().zip(flags.chunks(8)) {
        *byte = chunk
            .iter()
            .enumerate()
            .fold(0u8, |acc, (bit, &set)| acc | (u8::from(set) << bit));
    }
    Ok(())
}

pub fn decode_slab(bytes: &[u8], offset: usize) -> Result<Vec<GiftRecord>, FormatError> {
    (0..SLAB_RECORDS)
        .filter_map(|index| GiftKind::at_position(index).map(|kind| (index, kind)))
        .map(|(index, kind)| {
            let at = offset + record_offset(index);
            let data = slice_at(bytes, at, kind.size(), "gift record")?;
            Ok(GiftRecord {
                kind,
                data: data.to_vec(),
            })
        })
        .collect()
}

/// Write all eleven records. Records that do not match their position are
/// skipped and reported; their bytes stay as they were.
pub fn encode_slab(
    bytes: &mut [u8],
    offset: usize,
    records: &[GiftRecord],
) -> Result<Vec<Diagnostic>, FormatError> {
    if records.len() != SLAB_RECORDS {
        return Err(FormatError::SlabLengthMismatch {
            expected: SLAB_RECORDS,
            actual: records.len(),
        });
    }

    let mut diagnostics = Vec::new();
    for (index, record) in records.iter().enumerate() {
        let expected = GiftKind::at_position(index);
        if expected != Some(record.kind) || record.data.len() != record.kind.size() {
            warn!(
                index,
                kind = record.kind.as_str(),
                len = record.data.len(),
                "gift record does not fit its slot, skipped"
            );
            diagnostics.push(Diagnostic::RecordKindMismatch { index });
            continue;
        }
        let at = offset + record_offset(index);
        slice_at_mut(bytes, at, record.data.len(), "gift record")?.copy_from_slice(&record.data);
    }
    Ok(diagnostics)
}

impl SaveImage {
    fn gift_flags_offset(&self) -> usize {
        self.general_base() + self.table().gift_flags
    }

    fn gift_slab_offset(&self) -> usize {
        self.general_base() + self.table().gift_slab
    }

    pub fn gift_flags(&self) -> Result<Vec<bool>, FormatError> {
        decode_flags(self.as_bytes(), self.gift_flags_offset())
    }

    pub fn set_gift_flags(&mut self, flags: &[bool]) -> Result<(), FormatError> {
        let at = self.gift_flags_offset();
        encode_flags(self.bytes_mut(), at, flags)
    }

    pub fn set_gift_flag(&mut self, index: usize, received: bool) -> Result<(), FormatError> {
        if index >= GIFT_FLAG_COUNT {
            return Err(FormatError::InvalidIndex {
                what: "gift flag",
                index,
                limit: GIFT_FLAG_COUNT,
            });
        }
        let mut flags = self.gift_flags()?;
        flags[index] = received;
        self.set_gift_flags(&flags)
    }

    pub fn gift_records(&self) -> Result<Vec<GiftRecord>, FormatError> {
        decode_slab(self.as_bytes(), self.gift_slab_offset())
    }

    pub fn set_gift_records(
        &mut self,
        records: &[GiftRecord],
    ) -> Result<Vec<Diagnostic>, FormatError> {
        let at = self.gift_slab_offset();
        encode_slab(self.bytes_mut(), at, records)
    }
}
