use serde::{Deserialize, Serialize};

use crate::gender::Gender;
use crate::sav4::Version;
use crate::sav4::diagnostics::Diagnostic;
use crate::sav4::gifts::GiftKind;
use crate::sav4::offsets::PouchKind;

pub use crate::sav4::fields::{Coordinates, PlayTime};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: Version,
    pub blank: bool,
    pub trainer_name: String,
    pub tid: u16,
    pub sid: u16,
    pub money: u32,
    pub gender: Gender,
    pub language: u8,
    pub badges: u8,
    /// Only present on layouts with a second badge set.
    pub badges16: Option<u8>,
    pub sprite: u8,
    pub play_time: PlayTime,
    pub seconds_to_start: i32,
    pub seconds_to_fame: i32,
    pub map_id: i32,
    pub coordinates: Coordinates,
    pub party_count: u8,
    pub unlocked_boxes: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CapabilityIssue {
    /// The image was all-zero and has not been committed yet.
    BlankImage,
    ChecksumMismatch,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Capabilities {
    pub can_query: bool,
    pub can_apply_edits: bool,
    pub can_export: bool,
    pub issues: Vec<CapabilityIssue>,
}

impl Capabilities {
    pub fn from_issues(issues: Vec<CapabilityIssue>) -> Self {
        Self {
            can_query: true,
            can_apply_edits: true,
            can_export: !issues.contains(&CapabilityIssue::BlankImage),
            issues,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PouchEntry {
    pub item_id: u16,
    pub name: Option<String>,
    pub count: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PouchView {
    pub kind: PouchKind,
    pub label: String,
    pub capacity: usize,
    pub max_count: u16,
    /// Occupied slots only, in stored order.
    pub entries: Vec<PouchEntry>,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GiftRecordSummary {
    pub index: usize,
    pub kind: GiftKind,
    pub empty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GiftSummary {
    pub received: Vec<usize>,
    pub records: Vec<GiftRecordSummary>,
}
