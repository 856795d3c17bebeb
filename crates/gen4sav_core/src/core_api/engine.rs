use tracing::debug;

use crate::gender::Gender;
use crate::sav4::checksum::ChecksumReport;
use crate::sav4::diagnostics::Diagnostic;
use crate::sav4::gifts::GiftRecord;
use crate::sav4::inventory::{EditedSlot, ItemNames};
use crate::sav4::offsets::PouchKind;
use crate::sav4::{LegalItemsConfig, SaveImage, Version};

use super::error::{CoreError, CoreErrorCode};
use super::item_catalog::ItemCatalog;
use super::types::{
    Capabilities, CapabilityIssue, Coordinates, GiftRecordSummary, GiftSummary, PlayTime,
    PouchEntry, PouchView, Snapshot,
};

#[derive(Debug, Default, Clone, Copy)]
pub struct Engine;

/// One opened save. Edits accumulate in the image; nothing is valid for
/// export until [`Session::commit`] has recomputed the checksums.
#[derive(Debug)]
pub struct Session {
    image: SaveImage,
    original: Vec<u8>,
    catalog: ItemCatalog,
    diagnostics: Vec<Diagnostic>,
}

impl Engine {
    pub fn new() -> Self {
        Self
    }

    pub fn open_bytes<B: AsRef<[u8]>>(
        &self,
        bytes: B,
        hint: Option<Version>,
    ) -> Result<Session, CoreError> {
        let original = bytes.as_ref().to_vec();
        let image = SaveImage::from_bytes(original.clone(), hint).map_err(|e| {
            let mut err = CoreError::from(e);
            err.message = format!("failed to open save: {}", err.message);
            err
        })?;
        Ok(Session::new(image, original))
    }

    pub fn new_blank(&self, version: Version) -> Result<Session, CoreError> {
        let image = SaveImage::blank(version)?;
        let original = image.as_bytes().to_vec();
        Ok(Session::new(image, original))
    }
}

impl Session {
    fn new(image: SaveImage, original: Vec<u8>) -> Self {
        debug!(
            version = %image.version(),
            blank = image.is_blank(),
            "opened session"
        );
        let catalog = ItemCatalog::numbered(image.version());
        Self {
            image,
            original,
            catalog,
            diagnostics: Vec::new(),
        }
    }

    pub fn version(&self) -> Version {
        self.image.version()
    }

    pub fn image(&self) -> &SaveImage {
        &self.image
    }

    pub fn item_catalog(&self) -> &ItemCatalog {
        &self.catalog
    }

    pub fn set_item_catalog(&mut self, catalog: ItemCatalog) {
        self.catalog = catalog;
    }

    fn names(&self) -> &ItemNames {
        self.catalog.names()
    }

    pub fn apply_legal_items(&mut self, config: &LegalItemsConfig) {
        self.image.legal_items_mut().apply(config);
    }

    /// Diagnostics raised by edits since the session was opened.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn snapshot(&self) -> Result<Snapshot, CoreError> {
        let image = &self.image;
        Ok(Snapshot {
            version: image.version(),
            blank: image.is_blank(),
            trainer_name: image.trainer_name()?,
            tid: image.tid()?,
            sid: image.sid()?,
            money: image.money()?,
            gender: image.gender()?,
            language: image.language()?,
            badges: image.badges()?,
            badges16: image
                .table()
                .badges16
                .map(|_| image.badges16())
                .transpose()?,
            sprite: image.sprite()?,
            play_time: image.play_time()?,
            seconds_to_start: image.seconds_to_start()?,
            seconds_to_fame: image.seconds_to_fame()?,
            map_id: image.map_id()?,
            coordinates: image.coordinates()?,
            party_count: image.party_count()?,
            unlocked_boxes: image.unlocked_boxes()?,
        })
    }

    pub fn capabilities(&self) -> Capabilities {
        let mut issues = Vec::new();
        if self.image.is_blank() {
            issues.push(CapabilityIssue::BlankImage);
        }
        let checksums_ok = self
            .image
            .verify_checksums()
            .is_ok_and(|report| report.is_valid());
        if !checksums_ok {
            issues.push(CapabilityIssue::ChecksumMismatch);
        }
        Capabilities::from_issues(issues)
    }

    pub fn checksums(&self) -> Result<ChecksumReport, CoreError> {
        Ok(self.image.verify_checksums()?)
    }

    pub fn set_trainer_name(&mut self, name: &str) -> Result<(), CoreError> {
        Ok(self.image.set_trainer_name(name)?)
    }

    pub fn set_tid(&mut self, tid: u16) -> Result<(), CoreError> {
        Ok(self.image.set_tid(tid)?)
    }

    pub fn set_sid(&mut self, sid: u16) -> Result<(), CoreError> {
        Ok(self.image.set_sid(sid)?)
    }

    pub fn set_money(&mut self, money: u32) -> Result<(), CoreError> {
        Ok(self.image.set_money(money)?)
    }

    pub fn set_gender(&mut self, gender: Gender) -> Result<(), CoreError> {
        Ok(self.image.set_gender(gender)?)
    }

    pub fn set_badges(&mut self, badges: u8) -> Result<(), CoreError> {
        Ok(self.image.set_badges(badges)?)
    }

    pub fn set_badges16(&mut self, badges: u8) -> Result<(), CoreError> {
        Ok(self.image.set_badges16(badges)?)
    }

    pub fn set_play_time(&mut self, time: PlayTime) -> Result<(), CoreError> {
        if time.minutes >= 60 || time.seconds >= 60 {
            return Err(CoreError::new(
                CoreErrorCode::InvalidInput,
                format!("invalid play time {time}, minutes and seconds must be below 60"),
            ));
        }
        Ok(self.image.set_play_time(time)?)
    }

    pub fn set_map_id(&mut self, map: i32) -> Result<(), CoreError> {
        Ok(self.image.set_map_id(map)?)
    }

    pub fn set_coordinates(&mut self, coords: Coordinates) -> Result<(), CoreError> {
        Ok(self.image.set_coordinates(coords)?)
    }

    pub fn pouch(&self, kind: PouchKind) -> Result<PouchView, CoreError> {
        let layout = self.image.table().pouch(kind);
        let decoded = self.image.pouch(kind, self.names())?;
        let entries = decoded
            .slots
            .iter()
            .filter(|slot| !slot.is_empty())
            .map(|slot| PouchEntry {
                item_id: slot.item_id,
                name: self.catalog.name(slot.item_id).map(str::to_string),
                count: slot.count,
            })
            .collect();
        Ok(PouchView {
            kind,
            label: kind.label().to_string(),
            capacity: layout.capacity,
            max_count: layout.max_count,
            entries,
            diagnostics: decoded.diagnostics,
        })
    }

    pub fn pouches(&self) -> Result<Vec<PouchView>, CoreError> {
        PouchKind::ALL
            .into_iter()
            .map(|kind| self.pouch(kind))
            .collect()
    }

    pub fn set_pouch(
        &mut self,
        kind: PouchKind,
        entries: &[EditedSlot],
    ) -> Result<Vec<Diagnostic>, CoreError> {
        let diagnostics = self
            .image
            .set_pouch(kind, entries, self.catalog.names())?;
        self.diagnostics.extend(diagnostics.iter().cloned());
        Ok(diagnostics)
    }

    /// Fill a pouch with every legal item; `count` defaults to the pouch cap.
    pub fn give_all(&mut self, kind: PouchKind, count: Option<u16>) -> Result<usize, CoreError> {
        let count = count.unwrap_or(self.image.table().pouch(kind).max_count);
        Ok(self.image.give_all(kind, count, self.catalog.names())?)
    }

    pub fn clear_pouch(&mut self, kind: PouchKind) -> Result<(), CoreError> {
        Ok(self.image.clear_pouch(kind)?)
    }

    pub fn gift_flags(&self) -> Result<Vec<bool>, CoreError> {
        Ok(self.image.gift_flags()?)
    }

    pub fn set_gift_flags(&mut self, flags: &[bool]) -> Result<(), CoreError> {
        Ok(self.image.set_gift_flags(flags)?)
    }

    pub fn set_gift_flag(&mut self, index: usize, received: bool) -> Result<(), CoreError> {
        Ok(self.image.set_gift_flag(index, received)?)
    }

    pub fn gift_records(&self) -> Result<Vec<GiftRecord>, CoreError> {
        Ok(self.image.gift_records()?)
    }

    pub fn set_gift_records(
        &mut self,
        records: &[GiftRecord],
    ) -> Result<Vec<Diagnostic>, CoreError> {
        let diagnostics = self.image.set_gift_records(records)?;
        self.diagnostics.extend(diagnostics.iter().cloned());
        Ok(diagnostics)
    }

    pub fn gift_summary(&self) -> Result<GiftSummary, CoreError> {
        let received = self
            .gift_flags()?
            .into_iter()
            .enumerate()
            .filter_map(|(index, set)| set.then_some(index))
            .collect();
        let records = self
            .gift_records()?
            .iter()
            .enumerate()
            .map(|(index, record)| GiftRecordSummary {
                index,
                kind: record.kind,
                empty: record.is_empty(),
            })
            .collect();
        Ok(GiftSummary { received, records })
    }

    /// Recompute checksums over the edited image and return its bytes.
    pub fn commit(&mut self) -> Result<Vec<u8>, CoreError> {
        let bytes = self.image.commit()?.to_vec();
        debug!(
            version = %self.image.version(),
            diagnostics = self.diagnostics.len(),
            "session committed"
        );
        Ok(bytes)
    }

    /// The bytes the session was opened from.
    pub fn to_bytes_unmodified(&self) -> Vec<u8> {
        self.original.clone()
    }
}
