use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::diagnostics::Diagnostic;
use super::error::FormatError;
use crate::layout::{ByteRange, RegionId};
use crate::reader::{patch_u16, read_u16_at, slice_at};

const CCITT_POLY: u16 = 0x1021;

const CCITT_TABLE: [u16; 256] = build_table();

const fn build_table() -> [u16; 256] {
    let mut table = [0u16; 256];
    let mut i = 0;
    while i < 256 {
        let mut crc = (i as u16) << 8;
        let mut bit = 0;
        while bit < 8 {
            crc = if crc & 0x8000 != 0 {
                (crc << 1) ^ CCITT_POLY
            } else {
                crc << 1
            };
            bit += 1;
        }
        table[i] = crc;
        i += 1;
    }
    table
}

/// CRC-16/CCITT-FALSE: polynomial 0x1021, initial value 0xFFFF, MSB-first,
/// no final xor.
pub fn ccitt16(bytes: &[u8]) -> u16 {
    bytes.iter().fold(0xFFFFu16, |crc, &b| {
        (crc << 8) ^ CCITT_TABLE[usize::from((crc >> 8) as u8 ^ b)]
    })
}

pub fn checksum_at(bytes: &[u8], offset: usize, len: usize) -> Result<u16, FormatError> {
    Ok(ccitt16(slice_at(bytes, offset, len, "checksum span")?))
}

/// A checksum region with its block base already applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundRegion {
    pub id: RegionId,
    pub range: ByteRange,
    pub stored_at: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionStatus {
    pub region: RegionId,
    pub start: usize,
    pub len: usize,
    pub stored_at: usize,
    pub stored: u16,
    pub computed: u16,
}

impl RegionStatus {
    pub fn is_valid(&self) -> bool {
        self.stored == self.computed
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecksumReport {
    pub regions: Vec<RegionStatus>,
}

impl ChecksumReport {
    pub fn is_valid(&self) -> bool {
        self.regions.iter().all(RegionStatus::is_valid)
    }

    pub fn failed(&self) -> Vec<RegionId> {
        self.regions
            .iter()
            .filter(|status| !status.is_valid())
            .map(|status| status.region)
            .collect()
    }

    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.regions
            .iter()
            .filter(|status| !status.is_valid())
            .map(|status| Diagnostic::ChecksumMismatch {
                region: status.region,
                stored: status.stored,
                computed: status.computed,
            })
            .collect()
    }
}

/// Verifies or rewrites every checksum region of a bound layout.
#[derive(Debug, Clone)]
pub struct ChecksumPass {
    regions: Vec<BoundRegion>,
}

impl ChecksumPass {
    pub fn new(regions: Vec<BoundRegion>) -> Self {
        Self { regions }
    }

    pub fn regions(&self) -> &[BoundRegion] {
        &self.regions
    }

    pub fn verify(&self, bytes: &[u8]) -> Result<ChecksumReport, FormatError> {
        let mut regions = Vec::with_capacity(self.regions.len());
        for region in &self.regions {
            let computed = checksum_at(bytes, region.range.start, region.range.len())?;
            let stored = read_u16_at(bytes, region.stored_at)?;
            if stored != computed {
                warn!(
                    region = region.id.as_str(),
                    stored,
                    computed,
                    "checksum mismatch"
                );
            }
            regions.push(RegionStatus {
                region: region.id,
                start: region.range.start,
                len: region.range.len(),
                stored_at: region.stored_at,
                stored,
                computed,
            });
        }
        Ok(ChecksumReport { regions })
    }

    pub fn recompute(&self, bytes: &mut [u8]) -> Result<(), FormatError> {
        for region in &self.regions {
            let computed = checksum_at(bytes, region.range.start, region.range.len())?;
            patch_u16(bytes, region.stored_at, computed, "stored checksum")?;
            debug!(
                region = region.id.as_str(),
                value = computed,
                "stored checksum"
            );
        }
        Ok(())
    }
}
