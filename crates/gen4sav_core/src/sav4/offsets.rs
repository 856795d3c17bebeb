//! Per-version layout constants. Every downstream accessor reads positions
//! from the [`OffsetTable`] bound at resolution time and never branches on
//! the version itself.

use serde::{Deserialize, Serialize};

use super::version::Version;
use super::BLOCK_STRIDE;
use crate::layout::{BlockKind, BlockLayout, ByteRange, ChecksumRegion, RegionId};

/// Fixed-position u32 that identifies a layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Marker {
    pub offset: usize,
    pub value: u32,
}

/// A scalar stored at `primary`, mirrored to `shadow` on some versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShadowedField {
    pub primary: usize,
    pub shadow: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PouchKind {
    Items,
    KeyItems,
    TmHms,
    Medicine,
    Berries,
    Balls,
    BattleItems,
    MailItems,
}

impl PouchKind {
    pub const ALL: [PouchKind; 8] = [
        PouchKind::Items,
        PouchKind::KeyItems,
        PouchKind::TmHms,
        PouchKind::Medicine,
        PouchKind::Berries,
        PouchKind::Balls,
        PouchKind::BattleItems,
        PouchKind::MailItems,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Items => "items",
            Self::KeyItems => "key_items",
            Self::TmHms => "tm_hms",
            Self::Medicine => "medicine",
            Self::Berries => "berries",
            Self::Balls => "balls",
            Self::BattleItems => "battle_items",
            Self::MailItems => "mail_items",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Items => "Items",
            Self::KeyItems => "Key Items",
            Self::TmHms => "TMs & HMs",
            Self::Medicine => "Medicine",
            Self::Berries => "Berries",
            Self::Balls => "Balls",
            Self::BattleItems => "Battle Items",
            Self::MailItems => "Mail",
        }
    }
}

impl std::str::FromStr for PouchKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.to_ascii_lowercase().replace('-', "_");
        match normalized.as_str() {
            "items" => Ok(Self::Items),
            "key" | "key_items" => Ok(Self::KeyItems),
            "tm" | "tmhm" | "tm_hms" => Ok(Self::TmHms),
            "medicine" => Ok(Self::Medicine),
            "berries" => Ok(Self::Berries),
            "balls" => Ok(Self::Balls),
            "battle" | "battle_items" => Ok(Self::BattleItems),
            "mail" | "mail_items" => Ok(Self::MailItems),
            _ => Err(format!(
                "invalid pouch '{value}', expected one of: items, key, tm, medicine, berries, balls, battle, mail"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PouchLayout {
    pub kind: PouchKind,
    pub offset: usize,
    pub capacity: usize,
    pub max_count: u16,
}

impl PouchLayout {
    pub const SLOT_SIZE: usize = 4;

    pub fn byte_len(&self) -> usize {
        self.capacity * Self::SLOT_SIZE
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OffsetTable {
    pub version: Version,
    pub general_marker: Marker,
    pub general_counter: usize,
    pub storage_counter: usize,
    pub small_region: ChecksumRegion,
    pub large_region: ChecksumRegion,
    pub adventure_info: usize,
    pub trainer: usize,
    pub party: usize,
    pub gift_flags: usize,
    pub gift_slab: usize,
    pub daycare: usize,
    pub boxes: usize,
    pub box_padding: usize,
    /// Extra bytes between the last box and the box-name table.
    pub box_names_skip: usize,
    /// Extra bytes between the box data and the wallpaper table.
    pub wallpaper_skip: usize,
    pub map_id: usize,
    pub coord_x: ShadowedField,
    pub coord_y: ShadowedField,
    pub coord_z: ShadowedField,
    pub badges16: Option<usize>,
    pub max_item_id: u16,
    pub pouches: [PouchLayout; 8],
}

impl OffsetTable {
    pub fn pouch(&self, kind: PouchKind) -> &PouchLayout {
        // Tables list pouches in `PouchKind::ALL` order.
        &self.pouches[kind as usize]
    }

    pub fn regions(&self) -> [ChecksumRegion; 2] {
        [self.small_region, self.large_region]
    }

    pub fn block_layout(&self) -> BlockLayout {
        BlockLayout {
            block_len: BLOCK_STRIDE,
            regions: self.regions().to_vec(),
        }
    }
}

pub fn table_for(version: Version) -> &'static OffsetTable {
    match version {
        Version::DiamondPearl => &DIAMOND_PEARL,
        Version::Platinum => &PLATINUM,
        Version::HeartGoldSoulSilver => &HEART_GOLD_SOUL_SILVER,
    }
}

const fn pouch(kind: PouchKind, offset: usize, capacity: usize, max_count: u16) -> PouchLayout {
    PouchLayout {
        kind,
        offset,
        capacity,
        max_count,
    }
}

const fn region(
    id: RegionId,
    block: BlockKind,
    start: usize,
    len: usize,
    stored_at: usize,
) -> ChecksumRegion {
    ChecksumRegion {
        id,
        block,
        range: ByteRange::new(start, len),
        stored_at,
    }
}

const fn plain(primary: usize) -> ShadowedField {
    ShadowedField {
        primary,
        shadow: None,
    }
}

const fn shadowed(primary: usize, shadow: usize) -> ShadowedField {
    ShadowedField {
        primary,
        shadow: Some(shadow),
    }
}

pub static DIAMOND_PEARL: OffsetTable = OffsetTable {
    version: Version::DiamondPearl,
    general_marker: Marker {
        offset: 0xC0F4,
        value: 0xC100,
    },
    general_counter: 0xC0F0,
    storage_counter: 0x1E2D0,
    small_region: region(RegionId::Small, BlockKind::General, 0x0, 0xC0EC, 0xC0FE),
    large_region: region(RegionId::Large, BlockKind::Storage, 0xC100, 0x121CC, 0x1E2DE),
    adventure_info: 0x0,
    trainer: 0x64,
    party: 0x98,
    gift_flags: 0xA6D0,
    gift_slab: 0xA7FC,
    daycare: 0x141C,
    boxes: 0xC104,
    box_padding: 0,
    box_names_skip: 0,
    wallpaper_skip: 0,
    map_id: 0x1234,
    coord_x: shadowed(0x25FA, 0x123C),
    coord_y: shadowed(0x25FE, 0x1240),
    coord_z: plain(0x2602),
    badges16: None,
    max_item_id: 464,
    pouches: [
        pouch(PouchKind::Items, 0x624, 165, 995),
        pouch(PouchKind::KeyItems, 0x8B8, 50, 1),
        pouch(PouchKind::TmHms, 0x980, 100, 95),
        pouch(PouchKind::Medicine, 0xB40, 40, 995),
        pouch(PouchKind::Berries, 0xBE0, 64, 995),
        pouch(PouchKind::Balls, 0xCE0, 15, 995),
        pouch(PouchKind::BattleItems, 0xD1C, 13, 995),
        pouch(PouchKind::MailItems, 0xD50, 12, 995),
    ],
};

pub static PLATINUM: OffsetTable = OffsetTable {
    version: Version::Platinum,
    general_marker: Marker {
        offset: 0xCF20,
        value: 0xCF2C,
    },
    general_counter: 0xCF1C,
    storage_counter: 0x1F100,
    small_region: region(RegionId::Small, BlockKind::General, 0x0, 0xCF18, 0xCF2A),
    large_region: region(RegionId::Large, BlockKind::Storage, 0xCF2C, 0x121D0, 0x1F10E),
    adventure_info: 0x0,
    trainer: 0x68,
    party: 0xA0,
    gift_flags: 0xB4C0,
    gift_slab: 0xB5C0,
    daycare: 0x1654,
    boxes: 0xCF30,
    box_padding: 0,
    box_names_skip: 0,
    wallpaper_skip: 0,
    map_id: 0x1280,
    coord_x: plain(0x287E),
    coord_y: plain(0x2882),
    coord_z: plain(0x2886),
    badges16: None,
    max_item_id: 467,
    pouches: [
        pouch(PouchKind::Items, 0x630, 165, 995),
        pouch(PouchKind::KeyItems, 0x8C4, 50, 1),
        pouch(PouchKind::TmHms, 0x98C, 100, 95),
        pouch(PouchKind::Medicine, 0xB4C, 40, 995),
        pouch(PouchKind::Berries, 0xBEC, 64, 995),
        pouch(PouchKind::Balls, 0xCEC, 15, 995),
        pouch(PouchKind::BattleItems, 0xD28, 13, 995),
        pouch(PouchKind::MailItems, 0xB1C, 12, 995),
    ],
};

pub static HEART_GOLD_SOUL_SILVER: OffsetTable = OffsetTable {
    version: Version::HeartGoldSoulSilver,
    general_marker: Marker {
        offset: 0xF61C,
        value: 0xF628,
    },
    // Footer save counter, 0x10 before the block end as on DP and Pt.
    general_counter: 0xF618,
    storage_counter: 0x21A00,
    small_region: region(RegionId::Small, BlockKind::General, 0x0, 0xF618, 0xF626),
    large_region: region(RegionId::Large, BlockKind::Storage, 0xF700, 0x12300, 0x21A0E),
    adventure_info: 0x0,
    trainer: 0x64,
    party: 0x98,
    gift_flags: 0x9D3C,
    gift_slab: 0x9E3C,
    daycare: 0x15FC,
    boxes: 0xF700,
    box_padding: 0x10,
    box_names_skip: 0x8,
    wallpaper_skip: 0x18,
    map_id: 0x1234,
    coord_x: shadowed(0x236E, 0x123C),
    coord_y: shadowed(0x2372, 0x1240),
    coord_z: plain(0x2376),
    badges16: Some(0x1F),
    max_item_id: 536,
    pouches: [
        pouch(PouchKind::Items, 0x644, 165, 995),
        pouch(PouchKind::KeyItems, 0x8D8, 50, 1),
        pouch(PouchKind::TmHms, 0x9A0, 100, 95),
        pouch(PouchKind::Medicine, 0xB64, 40, 995),
        pouch(PouchKind::Berries, 0xC04, 64, 995),
        pouch(PouchKind::Balls, 0xD04, 24, 995),
        pouch(PouchKind::BattleItems, 0xD64, 13, 995),
        pouch(PouchKind::MailItems, 0xB34, 12, 995),
    ],
};
