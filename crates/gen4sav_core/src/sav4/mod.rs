pub mod blocks;
pub mod checksum;
pub mod diagnostics;
pub mod entity;
pub mod error;
pub mod fields;
pub mod gifts;
pub mod inventory;
pub mod legal;
pub mod offsets;
pub mod text;
pub mod version;

use tracing::debug;

pub use blocks::{BlockCopy, BlockSelection};
pub use checksum::{ChecksumPass, ChecksumReport, RegionStatus};
pub use diagnostics::Diagnostic;
pub use error::FormatError;
pub use legal::{LegalItems, LegalItemsConfig};
pub use offsets::{OffsetTable, PouchKind};
pub use version::{Resolution, Version};

use checksum::BoundRegion;
use crate::layout::BlockKind;

pub const SAVE_SIZE: usize = 0x80000;
pub const BLOCK_STRIDE: usize = 0x40000;

/// An owned save blob bound to the layout of one version.
#[derive(Debug, Clone)]
pub struct SaveImage {
    data: Vec<u8>,
    version: Version,
    table: &'static OffsetTable,
    legal: LegalItems,
    blocks: BlockSelection,
    blank: bool,
}

impl SaveImage {
    pub fn from_bytes(
        data: Vec<u8>,
        version_override: Option<Version>,
    ) -> Result<Self, FormatError> {
        if data.len() != SAVE_SIZE {
            return Err(FormatError::InvalidLength {
                expected: SAVE_SIZE,
                actual: data.len(),
            });
        }

        let resolution = version::resolve(&data, version_override);
        let version = resolution.version().ok_or(FormatError::UnresolvedVersion)?;
        let table = offsets::table_for(version);
        let blocks = BlockSelection::select(&data, table)?;

        let mut image = Self {
            data,
            version,
            table,
            legal: LegalItems::defaults(version),
            blocks,
            blank: resolution.is_blank(),
        };
        if image.blank {
            image.reset_boxes()?;
        }
        Ok(image)
    }

    /// A fresh all-zero image of `version`.
    pub fn blank(version: Version) -> Result<Self, FormatError> {
        Self::from_bytes(vec![0u8; SAVE_SIZE], Some(version))
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn table(&self) -> &'static OffsetTable {
        self.table
    }

    pub fn blocks(&self) -> BlockSelection {
        self.blocks
    }

    /// True until the first commit of an image that started out all-zero.
    pub fn is_blank(&self) -> bool {
        self.blank
    }

    pub fn legal_items(&self) -> &LegalItems {
        &self.legal
    }

    pub fn legal_items_mut(&mut self) -> &mut LegalItems {
        &mut self.legal
    }

    pub fn general_base(&self) -> usize {
        self.blocks.general.base()
    }

    pub fn storage_base(&self) -> usize {
        self.blocks.storage.base()
    }

    pub fn hall_of_fame_base(&self) -> usize {
        self.blocks.hall_of_fame.base()
    }

    pub fn block_base(&self, kind: BlockKind) -> usize {
        match kind {
            BlockKind::General => self.general_base(),
            BlockKind::Storage => self.storage_base(),
            BlockKind::HallOfFame => self.hall_of_fame_base(),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub(crate) fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    pub fn checksum_pass(&self) -> ChecksumPass {
        ChecksumPass::new(
            self.table
                .regions()
                .iter()
                .map(|region| {
                    let base = self.block_base(region.block);
                    BoundRegion {
                        id: region.id,
                        range: region.range.shifted(base),
                        stored_at: region.stored_at + base,
                    }
                })
                .collect(),
        )
    }

    pub fn verify_checksums(&self) -> Result<ChecksumReport, FormatError> {
        self.checksum_pass().verify(&self.data)
    }

    pub fn recompute_checksums(&mut self) -> Result<(), FormatError> {
        let pass = self.checksum_pass();
        pass.recompute(&mut self.data)
    }

    /// Recompute every checksum and hand out the finished image. Callers
    /// must run all pending encodes first.
    pub fn commit(&mut self) -> Result<&[u8], FormatError> {
        self.recompute_checksums()?;
        self.blank = false;
        debug!(version = %self.version, "committed save image");
        Ok(&self.data)
    }

    fn reset_boxes(&mut self) -> Result<(), FormatError> {
        let blank = entity::placeholder();
        for b in 0..fields::BOX_COUNT {
            for slot in 0..fields::BOX_SLOTS {
                self.set_box_record(b, slot, &blank)?;
            }
        }
        debug!(
            boxes = fields::BOX_COUNT,
            slots = fields::BOX_SLOTS,
            "filled blank box storage with placeholder records"
        );
        Ok(())
    }
}
