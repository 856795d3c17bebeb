use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use gen4sav_core::core_api::{
    CapabilityIssue, Coordinates, CoreErrorCode, Engine, ItemCatalog, PlayTime,
};
use gen4sav_core::gender::Gender;
use gen4sav_core::sav4::inventory::{EditedSlot, ItemRef};
use gen4sav_core::sav4::offsets::table_for;
use gen4sav_core::sav4::{Diagnostic, LegalItemsConfig, PouchKind, SAVE_SIZE, SaveImage, Version};

fn temp_path(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before unix epoch")
        .as_nanos();
    std::env::temp_dir().join(format!("gen4sav_core_{name}_{}_{nanos}", std::process::id()))
}

/// A committed, non-blank save of `version` with a few trainer fields set.
fn synthetic_save(version: Version) -> Vec<u8> {
    let mut image = SaveImage::blank(version).expect("blank image");
    let marker = table_for(version).general_marker;
    image.set_trainer_name("Lucas").expect("name");
    image.set_tid(1111).expect("tid");
    image.set_sid(2222).expect("sid");
    image.set_money(3333).expect("money");
    image.commit().expect("commit");
    let mut bytes = image.into_bytes();
    bytes[marker.offset..marker.offset + 4].copy_from_slice(&marker.value.to_le_bytes());
    let mut image = SaveImage::from_bytes(bytes, None).expect("reopen");
    image.commit().expect("commit").to_vec()
}

#[test]
fn engine_detects_version_and_builds_snapshot() {
    let engine = Engine::new();
    for version in Version::ALL {
        let session = engine
            .open_bytes(synthetic_save(version), None)
            .expect("synthetic save should open");
        assert_eq!(session.version(), version);

        let snapshot = session.snapshot().expect("snapshot");
        assert_eq!(snapshot.trainer_name, "Lucas");
        assert_eq!(snapshot.tid, 1111);
        assert_eq!(snapshot.sid, 2222);
        assert_eq!(snapshot.money, 3333);
        assert!(!snapshot.blank);
        assert_eq!(
            snapshot.badges16.is_some(),
            version == Version::HeartGoldSoulSilver
        );

        let caps = session.capabilities();
        assert!(caps.can_query);
        assert!(caps.can_export);
        assert!(caps.issues.is_empty(), "{version}: {:?}", caps.issues);
    }
}

#[test]
fn snapshot_serializes_to_json() {
    let session = Engine::new()
        .open_bytes(synthetic_save(Version::Platinum), None)
        .expect("open");
    let value = serde_json::to_value(session.snapshot().expect("snapshot")).expect("json");
    assert_eq!(value["version"], "Platinum");
    assert_eq!(value["trainer_name"], "Lucas");
    assert_eq!(value["play_time"]["hours"], 0);
    assert!(value["badges16"].is_null());
}

#[test]
fn blank_sessions_cannot_export_until_committed() {
    let mut session = Engine::new()
        .new_blank(Version::DiamondPearl)
        .expect("blank session");
    let caps = session.capabilities();
    assert!(!caps.can_export);
    assert!(caps.issues.contains(&CapabilityIssue::BlankImage));

    let bytes = session.commit().expect("commit");
    assert_eq!(bytes.len(), SAVE_SIZE);
    let caps = session.capabilities();
    assert!(caps.can_export);
    assert!(caps.issues.is_empty());
}

#[test]
fn open_errors_map_to_core_codes() {
    let engine = Engine::new();

    let err = engine.open_bytes([0u8; 16], None).expect_err("short input");
    assert_eq!(err.code, CoreErrorCode::InvalidLength);

    let mut garbage = vec![0u8; SAVE_SIZE];
    garbage[0x100] = 1;
    let err = engine.open_bytes(&garbage, None).expect_err("unknown layout");
    assert_eq!(err.code, CoreErrorCode::UnresolvedVersion);
    assert!(err.message.contains("version override"));

    let session = engine
        .open_bytes(&garbage, Some(Version::Platinum))
        .expect("override opens unknown layout");
    assert!(session.capabilities().issues.contains(&CapabilityIssue::ChecksumMismatch));
}

#[test]
fn edits_commit_with_valid_checksums() {
    let engine = Engine::new();
    let mut session = engine
        .open_bytes(synthetic_save(Version::HeartGoldSoulSilver), None)
        .expect("open");

    session.set_trainer_name("Ethan").expect("name");
    session.set_gender(Gender::Male).expect("gender");
    session
        .set_play_time(PlayTime {
            hours: 10,
            minutes: 20,
            seconds: 30,
        })
        .expect("play time");
    session
        .set_coordinates(Coordinates { x: 1, y: 2, z: 3 })
        .expect("coords");
    session.set_badges16(0xFF).expect("kanto badges");
    assert!(session.capabilities().issues.contains(&CapabilityIssue::ChecksumMismatch));

    let bytes = session.commit().expect("commit");
    let reopened = engine.open_bytes(&bytes, None).expect("reopen");
    let snapshot = reopened.snapshot().expect("snapshot");
    assert_eq!(snapshot.trainer_name, "Ethan");
    assert_eq!(snapshot.coordinates, Coordinates { x: 1, y: 2, z: 3 });
    assert_eq!(snapshot.badges16, Some(0xFF));
    assert!(reopened.checksums().expect("checksums").is_valid());
    assert_eq!(reopened.to_bytes_unmodified(), bytes);
}

#[test]
fn unavailable_fields_are_unsupported_operations() {
    let mut session = Engine::new()
        .open_bytes(synthetic_save(Version::DiamondPearl), None)
        .expect("open");
    let err = session.set_badges16(1).expect_err("dp has no second badge set");
    assert_eq!(err.code, CoreErrorCode::UnsupportedOperation);
}

#[test]
fn invalid_inputs_are_rejected() {
    let mut session = Engine::new()
        .new_blank(Version::Platinum)
        .expect("blank session");
    let err = session.set_gift_flag(0x800, true).expect_err("flag out of range");
    assert_eq!(err.code, CoreErrorCode::InvalidInput);

    let err = session.set_gift_flags(&[true; 8]).expect_err("short flags");
    assert_eq!(err.code, CoreErrorCode::FlagLengthMismatch);

    let err = session.set_gift_records(&[]).expect_err("empty slab");
    assert_eq!(err.code, CoreErrorCode::SlabLengthMismatch);

    let err = session
        .set_play_time(PlayTime {
            hours: 1,
            minutes: 75,
            seconds: 0,
        })
        .expect_err("minutes out of range");
    assert_eq!(err.code, CoreErrorCode::InvalidInput);
}

#[test]
fn pouch_views_use_catalog_names_and_collect_edit_diagnostics() {
    let path = temp_path("items.txt");
    fs::write(&path, "(None)\nMaster Ball\nUltra Ball\nGreat Ball\nPoke Ball\n")
        .expect("write item list");
    let catalog = ItemCatalog::load_from_file(&path).expect("load catalog");
    let _ = fs::remove_file(&path);
    assert_eq!(catalog.names().len(), 5);

    let mut session = Engine::new()
        .new_blank(Version::DiamondPearl)
        .expect("blank session");
    session.set_item_catalog(catalog);

    let diagnostics = session
        .set_pouch(
            PouchKind::Balls,
            &[
                EditedSlot::new(ItemRef::Name("great ball".into()), "30"),
                EditedSlot::new(ItemRef::Id(1), "many"),
            ],
        )
        .expect("set pouch");
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(session.diagnostics(), diagnostics.as_slice());

    let view = session.pouch(PouchKind::Balls).expect("pouch view");
    assert_eq!(view.capacity, 15);
    assert_eq!(view.entries.len(), 2);
    assert_eq!(view.entries[0].name.as_deref(), Some("Great Ball"));
    assert_eq!(view.entries[0].count, 30);
    assert_eq!(view.entries[1].name.as_deref(), Some("Master Ball"));
    assert_eq!(view.entries[1].count, 1);
}

#[test]
fn missing_item_list_is_an_io_error() {
    let err = ItemCatalog::load_from_file(&temp_path("missing.txt")).expect_err("missing file");
    assert_eq!(err.code, CoreErrorCode::Io);
}

#[test]
fn give_all_defaults_to_the_pouch_cap() {
    let mut session = Engine::new()
        .new_blank(Version::HeartGoldSoulSilver)
        .expect("blank session");
    session.apply_legal_items(
        &LegalItemsConfig::from_json_str(r#"{"key_items": [434, 435, 436]}"#).expect("config"),
    );
    let written = session.give_all(PouchKind::KeyItems, None).expect("give all");
    assert_eq!(written, 3);

    let view = session.pouch(PouchKind::KeyItems).expect("pouch view");
    assert!(view.entries.iter().all(|e| e.count == 1));

    session.clear_pouch(PouchKind::KeyItems).expect("clear");
    assert!(session.pouch(PouchKind::KeyItems).expect("view").entries.is_empty());
}

#[test]
fn gift_summary_lists_received_flags_and_record_kinds() {
    let mut session = Engine::new()
        .new_blank(Version::Platinum)
        .expect("blank session");
    session.set_gift_flag(5, true).expect("flag");
    session.set_gift_flag(700, true).expect("flag");

    let summary = session.gift_summary().expect("summary");
    assert_eq!(summary.received, vec![5, 700]);
    assert_eq!(summary.records.len(), 11);
    assert!(summary.records.iter().all(|r| r.empty));

    let mut records = session.gift_records().expect("records");
    records[0].data[0] = 1;
    let kind = records[9].kind;
    records.swap(0, 9);
    let diagnostics = session.set_gift_records(&records).expect("encode");
    assert_eq!(
        diagnostics,
        vec![
            Diagnostic::RecordKindMismatch { index: 0 },
            Diagnostic::RecordKindMismatch { index: 9 },
        ]
    );
    assert_eq!(session.gift_records().expect("records")[9].kind, kind);
}
