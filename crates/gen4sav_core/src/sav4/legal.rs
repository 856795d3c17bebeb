use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::offsets::PouchKind;
use super::version::Version;

type IdRanges = &'static [(u16, u16)];

struct PouchDefaults {
    items: IdRanges,
    key_items: IdRanges,
    tm_hms: IdRanges,
    medicine: IdRanges,
    berries: IdRanges,
    balls: IdRanges,
    battle_items: IdRanges,
    mail_items: IdRanges,
}

impl PouchDefaults {
    fn ranges(&self, kind: PouchKind) -> IdRanges {
        match kind {
            PouchKind::Items => self.items,
            PouchKind::KeyItems => self.key_items,
            PouchKind::TmHms => self.tm_hms,
            PouchKind::Medicine => self.medicine,
            PouchKind::Berries => self.berries,
            PouchKind::Balls => self.balls,
            PouchKind::BattleItems => self.battle_items,
            PouchKind::MailItems => self.mail_items,
        }
    }
}

// Inclusive id ranges. Shared pouches are identical across the three
// versions; key items and balls differ.
const HELD_ITEMS: IdRanges = &[(68, 111), (135, 136), (213, 327)];
const TM_HMS: IdRanges = &[(328, 427)];
const MEDICINE: IdRanges = &[(17, 54)];
const BERRIES: IdRanges = &[(149, 212)];
const BATTLE_ITEMS: IdRanges = &[(55, 67)];
const MAIL_ITEMS: IdRanges = &[(137, 148)];

const DP_DEFAULTS: PouchDefaults = PouchDefaults {
    items: HELD_ITEMS,
    key_items: &[(428, 464)],
    tm_hms: TM_HMS,
    medicine: MEDICINE,
    berries: BERRIES,
    balls: &[(1, 15)],
    battle_items: BATTLE_ITEMS,
    mail_items: MAIL_ITEMS,
};

const PT_DEFAULTS: PouchDefaults = PouchDefaults {
    items: HELD_ITEMS,
    key_items: &[(428, 467)],
    tm_hms: TM_HMS,
    medicine: MEDICINE,
    berries: BERRIES,
    balls: &[(1, 15)],
    battle_items: BATTLE_ITEMS,
    mail_items: MAIL_ITEMS,
};

const HGSS_DEFAULTS: PouchDefaults = PouchDefaults {
    items: HELD_ITEMS,
    key_items: &[
        (434, 436),
        (445, 447),
        (450, 450),
        (468, 485),
        (501, 504),
        (532, 536),
    ],
    tm_hms: TM_HMS,
    medicine: MEDICINE,
    berries: BERRIES,
    balls: &[(1, 16), (492, 499)],
    battle_items: BATTLE_ITEMS,
    mail_items: MAIL_ITEMS,
};

fn defaults_for(version: Version) -> &'static PouchDefaults {
    match version {
        Version::DiamondPearl => &DP_DEFAULTS,
        Version::Platinum => &PT_DEFAULTS,
        Version::HeartGoldSoulSilver => &HGSS_DEFAULTS,
    }
}

/// Item ids each pouch may hold for one version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegalItems {
    sets: BTreeMap<PouchKind, Vec<u16>>,
}

impl LegalItems {
    pub fn defaults(version: Version) -> Self {
        let defaults = defaults_for(version);
        let sets = PouchKind::ALL
            .into_iter()
            .map(|kind| {
                let ids = defaults
                    .ranges(kind)
                    .iter()
                    .flat_map(|&(first, last)| first..=last)
                    .collect();
                (kind, ids)
            })
            .collect();
        Self { sets }
    }

    pub fn ids(&self, kind: PouchKind) -> &[u16] {
        self.sets.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Id 0 ("no item") is accepted in every pouch.
    pub fn allows(&self, kind: PouchKind, item_id: u16) -> bool {
        item_id == 0 || self.ids(kind).contains(&item_id)
    }

    /// Install `ids` as the set for `kind`. Zero and repeated ids are
    /// dropped; first occurrences keep their order.
    pub fn replace(&mut self, kind: PouchKind, mut ids: Vec<u16>) {
        let mut seen = BTreeSet::new();
        ids.retain(|&id| id != 0 && seen.insert(id));
        self.sets.insert(kind, ids);
    }

    pub fn apply(&mut self, config: &LegalItemsConfig) {
        for (kind, ids) in config.entries() {
            self.replace(kind, ids.to_vec());
        }
    }
}

/// Host-supplied overrides, e.g. `{"balls": [1, 2, 3]}`. Absent pouches keep
/// their built-in set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LegalItemsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<u16>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_items: Option<Vec<u16>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tm_hms: Option<Vec<u16>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medicine: Option<Vec<u16>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub berries: Option<Vec<u16>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balls: Option<Vec<u16>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub battle_items: Option<Vec<u16>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mail_items: Option<Vec<u16>>,
}

impl LegalItemsConfig {
    pub fn from_json_str(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    fn entries(&self) -> impl Iterator<Item = (PouchKind, &[u16])> {
        [
            (PouchKind::Items, &self.items),
            (PouchKind::KeyItems, &self.key_items),
            (PouchKind::TmHms, &self.tm_hms),
            (PouchKind::Medicine, &self.medicine),
            (PouchKind::Berries, &self.berries),
            (PouchKind::Balls, &self.balls),
            (PouchKind::BattleItems, &self.battle_items),
            (PouchKind::MailItems, &self.mail_items),
        ]
        .into_iter()
        .filter_map(|(kind, ids)| ids.as_deref().map(|ids| (kind, ids)))
    }
}
