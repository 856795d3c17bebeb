//! Typed accessors over the live blocks of a [`SaveImage`].

use serde::{Deserialize, Serialize};

use super::entity::{PARTY_SIZE, STORED_SIZE, StoredRecord};
use super::error::FormatError;
use super::offsets::ShadowedField;
use super::text::{GlyphTable, Utf16Glyphs, decode_string, encode_string};
use super::SaveImage;
use crate::gender::Gender;
use crate::reader::{
    LittleEndianReader, check_span, patch_i32, patch_u8, patch_u16, patch_u32, slice_at,
    slice_at_mut,
};

pub const TRAINER_NAME_LEN: usize = 0x10;
pub const TRAINER_NAME_CHARS: usize = 7;
pub const PARTY_CAPACITY: usize = 6;
pub const BOX_COUNT: usize = 18;
pub const BOX_SLOTS: usize = 30;
pub const BOX_NAME_LEN: usize = 0x28;
pub const BOX_NAME_CHARS: usize = 13;
pub const DAYCARE_SLOTS: usize = 2;

const TID: usize = 0x10;
const SID: usize = 0x12;
const MONEY: usize = 0x14;
const GENDER: usize = 0x18;
const LANGUAGE: usize = 0x19;
const BADGES: usize = 0x1A;
const SPRITE: usize = 0x1B;
const PLAY_HOURS: usize = 0x22;
const PLAY_MINUTES: usize = 0x24;
const PLAY_SECONDS: usize = 0x25;

const SECONDS_TO_START: usize = 0x34;
const SECONDS_TO_FAME: usize = 0x3C;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayTime {
    pub hours: u16,
    pub minutes: u8,
    pub seconds: u8,
}

impl std::fmt::Display for PlayTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{:02}:{:02}", self.hours, self.minutes, self.seconds)
    }
}

impl std::str::FromStr for PlayTime {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = value.split(':').collect();
        let [hours, minutes, seconds] = parts.as_slice() else {
            return Err(format!("invalid play time '{value}', expected H:M:S"));
        };
        let hours = hours
            .trim()
            .parse::<u16>()
            .map_err(|e| format!("invalid hours '{hours}': {e}"))?;
        let minutes = parse_sexagesimal(minutes, "minutes")?;
        let seconds = parse_sexagesimal(seconds, "seconds")?;
        Ok(Self {
            hours,
            minutes,
            seconds,
        })
    }
}

fn parse_sexagesimal(raw: &str, what: &str) -> Result<u8, String> {
    match raw.trim().parse::<u8>() {
        Ok(v) if v < 60 => Ok(v),
        Ok(v) => Err(format!("{what} must be below 60, got {v}")),
        Err(e) => Err(format!("invalid {what} '{raw}': {e}")),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coordinates {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl std::str::FromStr for Coordinates {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = value.split(',').map(str::trim).collect();
        let [x, y, z] = parts.as_slice() else {
            return Err(format!("invalid coordinates '{value}', expected X,Y,Z"));
        };
        let parse = |raw: &str| {
            raw.parse::<i32>()
                .map_err(|e| format!("invalid coordinate '{raw}': {e}"))
        };
        Ok(Self {
            x: parse(x)?,
            y: parse(y)?,
            z: parse(z)?,
        })
    }
}

impl SaveImage {
    fn general(&self, offset: usize) -> usize {
        self.general_base() + offset
    }

    fn trainer_field(&self, offset: usize) -> usize {
        self.general(self.table().trainer + offset)
    }

    fn read_u8(&self, at: usize) -> Result<u8, FormatError> {
        LittleEndianReader::at(self.as_bytes(), at).read_u8()
    }

    fn read_u16(&self, at: usize) -> Result<u16, FormatError> {
        LittleEndianReader::at(self.as_bytes(), at).read_u16()
    }

    fn read_u32(&self, at: usize) -> Result<u32, FormatError> {
        LittleEndianReader::at(self.as_bytes(), at).read_u32()
    }

    fn read_i32(&self, at: usize) -> Result<i32, FormatError> {
        LittleEndianReader::at(self.as_bytes(), at).read_i32()
    }

    pub fn trainer_name(&self) -> Result<String, FormatError> {
        self.trainer_name_with(&Utf16Glyphs)
    }

    pub fn trainer_name_with(&self, glyphs: &dyn GlyphTable) -> Result<String, FormatError> {
        let at = self.trainer_field(0);
        decode_string(self.as_bytes(), at, TRAINER_NAME_LEN / 2, glyphs)
    }

    /// Names longer than seven characters are truncated.
    pub fn set_trainer_name(&mut self, name: &str) -> Result<(), FormatError> {
        self.set_trainer_name_with(name, &Utf16Glyphs)
    }

    pub fn set_trainer_name_with(
        &mut self,
        name: &str,
        glyphs: &dyn GlyphTable,
    ) -> Result<(), FormatError> {
        let at = self.trainer_field(0);
        encode_string(
            self.bytes_mut(),
            at,
            TRAINER_NAME_LEN,
            TRAINER_NAME_CHARS,
            name,
            glyphs,
        )
    }

    pub fn tid(&self) -> Result<u16, FormatError> {
        self.read_u16(self.trainer_field(TID))
    }

    pub fn set_tid(&mut self, tid: u16) -> Result<(), FormatError> {
        let at = self.trainer_field(TID);
        patch_u16(self.bytes_mut(), at, tid, "trainer id")
    }

    pub fn sid(&self) -> Result<u16, FormatError> {
        self.read_u16(self.trainer_field(SID))
    }

    pub fn set_sid(&mut self, sid: u16) -> Result<(), FormatError> {
        let at = self.trainer_field(SID);
        patch_u16(self.bytes_mut(), at, sid, "secret id")
    }

    pub fn money(&self) -> Result<u32, FormatError> {
        self.read_u32(self.trainer_field(MONEY))
    }

    pub fn set_money(&mut self, money: u32) -> Result<(), FormatError> {
        let at = self.trainer_field(MONEY);
        patch_u32(self.bytes_mut(), at, money, "money")
    }

    pub fn gender(&self) -> Result<Gender, FormatError> {
        self.read_u8(self.trainer_field(GENDER)).map(Gender::from_raw)
    }

    pub fn set_gender(&mut self, gender: Gender) -> Result<(), FormatError> {
        let at = self.trainer_field(GENDER);
        patch_u8(self.bytes_mut(), at, gender.raw(), "gender")
    }

    pub fn language(&self) -> Result<u8, FormatError> {
        self.read_u8(self.trainer_field(LANGUAGE))
    }

    pub fn set_language(&mut self, language: u8) -> Result<(), FormatError> {
        let at = self.trainer_field(LANGUAGE);
        patch_u8(self.bytes_mut(), at, language, "language")
    }

    pub fn badges(&self) -> Result<u8, FormatError> {
        self.read_u8(self.trainer_field(BADGES))
    }

    pub fn set_badges(&mut self, badges: u8) -> Result<(), FormatError> {
        let at = self.trainer_field(BADGES);
        patch_u8(self.bytes_mut(), at, badges, "badges")
    }

    pub fn sprite(&self) -> Result<u8, FormatError> {
        self.read_u8(self.trainer_field(SPRITE))
    }

    pub fn set_sprite(&mut self, sprite: u8) -> Result<(), FormatError> {
        let at = self.trainer_field(SPRITE);
        patch_u8(self.bytes_mut(), at, sprite, "sprite")
    }

    fn badges16_field(&self) -> Result<usize, FormatError> {
        self.table()
            .badges16
            .map(|offset| self.trainer_field(offset))
            .ok_or(FormatError::FieldUnavailable {
                field: "second badge set",
                version: self.version(),
            })
    }

    pub fn badges16(&self) -> Result<u8, FormatError> {
        self.read_u8(self.badges16_field()?)
    }

    pub fn set_badges16(&mut self, badges: u8) -> Result<(), FormatError> {
        let at = self.badges16_field()?;
        patch_u8(self.bytes_mut(), at, badges, "second badge set")
    }

    pub fn play_time(&self) -> Result<PlayTime, FormatError> {
        Ok(PlayTime {
            hours: self.read_u16(self.trainer_field(PLAY_HOURS))?,
            minutes: self.read_u8(self.trainer_field(PLAY_MINUTES))?,
            seconds: self.read_u8(self.trainer_field(PLAY_SECONDS))?,
        })
    }

    pub fn set_play_time(&mut self, time: PlayTime) -> Result<(), FormatError> {
        let hours = self.trainer_field(PLAY_HOURS);
        let minutes = self.trainer_field(PLAY_MINUTES);
        let seconds = self.trainer_field(PLAY_SECONDS);
        let bytes = self.bytes_mut();
        patch_u16(bytes, hours, time.hours, "play hours")?;
        patch_u8(bytes, minutes, time.minutes, "play minutes")?;
        patch_u8(bytes, seconds, time.seconds, "play seconds")
    }

    fn adventure_field(&self, offset: usize) -> usize {
        self.general(self.table().adventure_info + offset)
    }

    pub fn seconds_to_start(&self) -> Result<i32, FormatError> {
        self.read_i32(self.adventure_field(SECONDS_TO_START))
    }

    pub fn set_seconds_to_start(&mut self, seconds: i32) -> Result<(), FormatError> {
        let at = self.adventure_field(SECONDS_TO_START);
        patch_i32(self.bytes_mut(), at, seconds, "adventure start time")
    }

    pub fn seconds_to_fame(&self) -> Result<i32, FormatError> {
        self.read_i32(self.adventure_field(SECONDS_TO_FAME))
    }

    pub fn set_seconds_to_fame(&mut self, seconds: i32) -> Result<(), FormatError> {
        let at = self.adventure_field(SECONDS_TO_FAME);
        patch_i32(self.bytes_mut(), at, seconds, "hall of fame time")
    }

    pub fn map_id(&self) -> Result<i32, FormatError> {
        self.read_i32(self.general(self.table().map_id))
    }

    pub fn set_map_id(&mut self, map: i32) -> Result<(), FormatError> {
        let at = self.general(self.table().map_id);
        patch_i32(self.bytes_mut(), at, map, "map id")
    }

    pub fn coordinates(&self) -> Result<Coordinates, FormatError> {
        let table = self.table();
        Ok(Coordinates {
            x: self.read_i32(self.general(table.coord_x.primary))?,
            y: self.read_i32(self.general(table.coord_y.primary))?,
            z: self.read_i32(self.general(table.coord_z.primary))?,
        })
    }

    pub fn set_x(&mut self, x: i32) -> Result<(), FormatError> {
        self.write_shadowed(self.table().coord_x, x, "x coordinate")
    }

    pub fn set_y(&mut self, y: i32) -> Result<(), FormatError> {
        self.write_shadowed(self.table().coord_y, y, "y coordinate")
    }

    pub fn set_z(&mut self, z: i32) -> Result<(), FormatError> {
        self.write_shadowed(self.table().coord_z, z, "z coordinate")
    }

    pub fn set_coordinates(&mut self, coords: Coordinates) -> Result<(), FormatError> {
        self.set_x(coords.x)?;
        self.set_y(coords.y)?;
        self.set_z(coords.z)
    }

    /// Both locations are checked before either is written.
    fn write_shadowed(
        &mut self,
        field: ShadowedField,
        value: i32,
        what: &'static str,
    ) -> Result<(), FormatError> {
        let primary = self.general(field.primary);
        let shadow = field.shadow.map(|offset| self.general(offset));
        let len = self.as_bytes().len();
        check_span(len, primary, 4, what)?;
        if let Some(shadow) = shadow {
            check_span(len, shadow, 4, what)?;
        }

        let bytes = self.bytes_mut();
        patch_i32(bytes, primary, value, what)?;
        if let Some(shadow) = shadow {
            patch_i32(bytes, shadow, value, what)?;
        }
        Ok(())
    }

    pub fn party_count(&self) -> Result<u8, FormatError> {
        self.read_u8(self.general(self.table().party - 4))
    }

    pub fn set_party_count(&mut self, count: u8) -> Result<(), FormatError> {
        check_index("party count", usize::from(count), PARTY_CAPACITY + 1)?;
        let at = self.general(self.table().party - 4);
        patch_u8(self.bytes_mut(), at, count, "party count")
    }

    pub fn party_offset(&self, slot: usize) -> Result<usize, FormatError> {
        check_index("party slot", slot, PARTY_CAPACITY)?;
        Ok(self.general(self.table().party + PARTY_SIZE * slot))
    }

    pub fn party_record(&self, slot: usize) -> Result<&[u8], FormatError> {
        let at = self.party_offset(slot)?;
        slice_at(self.as_bytes(), at, PARTY_SIZE, "party record")
    }

    pub fn box_offset(&self, index: usize) -> Result<usize, FormatError> {
        // One past the last box is where the box metadata begins.
        check_index("box", index, BOX_COUNT + 1)?;
        let table = self.table();
        Ok(self.storage_base()
            + table.boxes
            + STORED_SIZE * BOX_SLOTS * index
            + table.box_padding * index)
    }

    fn box_slot_offset(&self, index: usize, slot: usize) -> Result<usize, FormatError> {
        check_index("box", index, BOX_COUNT)?;
        check_index("box slot", slot, BOX_SLOTS)?;
        Ok(self.box_offset(index)? + STORED_SIZE * slot)
    }

    /// The raw, still-encrypted record in one box slot.
    pub fn box_record(&self, index: usize, slot: usize) -> Result<StoredRecord, FormatError> {
        let at = self.box_slot_offset(index, slot)?;
        let mut record = [0u8; STORED_SIZE];
        record.copy_from_slice(slice_at(self.as_bytes(), at, STORED_SIZE, "box record")?);
        Ok(record)
    }

    pub fn set_box_record(
        &mut self,
        index: usize,
        slot: usize,
        record: &StoredRecord,
    ) -> Result<(), FormatError> {
        let at = self.box_slot_offset(index, slot)?;
        slice_at_mut(self.bytes_mut(), at, STORED_SIZE, "box record")?.copy_from_slice(record);
        Ok(())
    }

    pub fn unlocked_boxes(&self) -> Result<u8, FormatError> {
        self.read_u8(self.storage_base() + self.table().boxes - 4)
    }

    pub fn set_unlocked_boxes(&mut self, count: u8) -> Result<(), FormatError> {
        check_index("unlocked box count", usize::from(count), BOX_COUNT + 1)?;
        let at = self.storage_base() + self.table().boxes - 4;
        patch_u8(self.bytes_mut(), at, count, "unlocked box count")
    }

    fn box_name_offset(&self, index: usize) -> Result<usize, FormatError> {
        check_index("box", index, BOX_COUNT)?;
        Ok(self.box_offset(BOX_COUNT)? + self.table().box_names_skip + index * BOX_NAME_LEN)
    }

    pub fn box_name(&self, index: usize) -> Result<String, FormatError> {
        let at = self.box_name_offset(index)?;
        decode_string(self.as_bytes(), at, BOX_NAME_LEN / 2, &Utf16Glyphs)
    }

    /// Names longer than thirteen characters are truncated.
    pub fn set_box_name(&mut self, index: usize, name: &str) -> Result<(), FormatError> {
        let at = self.box_name_offset(index)?;
        encode_string(
            self.bytes_mut(),
            at,
            BOX_NAME_LEN,
            BOX_NAME_CHARS,
            name,
            &Utf16Glyphs,
        )
    }

    fn wallpaper_offset(&self, index: usize) -> Result<usize, FormatError> {
        check_index("box", index, BOX_COUNT)?;
        Ok(self.box_offset(BOX_COUNT)?
            + self.table().wallpaper_skip
            + BOX_COUNT * BOX_NAME_LEN
            + index)
    }

    pub fn box_wallpaper(&self, index: usize) -> Result<u8, FormatError> {
        self.read_u8(self.wallpaper_offset(index)?)
    }

    pub fn set_box_wallpaper(&mut self, index: usize, wallpaper: u8) -> Result<(), FormatError> {
        let at = self.wallpaper_offset(index)?;
        patch_u8(self.bytes_mut(), at, wallpaper, "box wallpaper")
    }

    fn daycare_exp_offset(&self, slot: usize) -> Result<usize, FormatError> {
        check_index("daycare slot", slot, DAYCARE_SLOTS)?;
        Ok(self.general(self.table().daycare + (slot + 1) * PARTY_SIZE - 4))
    }

    pub fn daycare_exp(&self, slot: usize) -> Result<u32, FormatError> {
        self.read_u32(self.daycare_exp_offset(slot)?)
    }

    pub fn set_daycare_exp(&mut self, slot: usize, exp: u32) -> Result<(), FormatError> {
        let at = self.daycare_exp_offset(slot)?;
        patch_u32(self.bytes_mut(), at, exp, "daycare experience")
    }
}

fn check_index(what: &'static str, index: usize, limit: usize) -> Result<(), FormatError> {
    if index < limit {
        Ok(())
    } else {
        Err(FormatError::InvalidIndex { what, index, limit })
    }
}
