use gen4sav_core::sav4::inventory::{EditedSlot, ItemNames, ItemRef, PouchSlot, compact};
use gen4sav_core::sav4::offsets::table_for;
use gen4sav_core::sav4::{Diagnostic, LegalItemsConfig, PouchKind, SaveImage, Version};

fn names_for(version: Version) -> ItemNames {
    ItemNames::numbered(table_for(version).max_item_id)
}

fn id(item: u16, count: &str) -> EditedSlot {
    EditedSlot::new(ItemRef::Id(item), count)
}

fn write_raw_slot(bytes: &mut [u8], image: &SaveImage, kind: PouchKind, slot: (usize, u16, u16)) {
    let (index, item, count) = slot;
    let at = image.general_base() + table_for(image.version()).pouch(kind).offset + index * 4;
    bytes[at..at + 2].copy_from_slice(&item.to_le_bytes());
    bytes[at + 2..at + 4].copy_from_slice(&count.to_le_bytes());
}

/// Blank image of `version` with raw slot writes applied before reopening.
fn image_with_slots(version: Version, kind: PouchKind, slots: &[(usize, u16, u16)]) -> SaveImage {
    let blank = SaveImage::blank(version).expect("blank image");
    let mut bytes = blank.as_bytes().to_vec();
    for &slot in slots {
        write_raw_slot(&mut bytes, &blank, kind, slot);
    }
    SaveImage::from_bytes(bytes, Some(version)).expect("reopen")
}

#[test]
fn blank_image_decodes_every_slot_as_empty() {
    let image = SaveImage::from_bytes(vec![0u8; 0x80000], None).expect("blank image");
    assert_eq!(image.version(), Version::DiamondPearl);
    let names = names_for(Version::DiamondPearl);

    for kind in PouchKind::ALL {
        let decoded = image.pouch(kind, &names).expect("decode");
        let capacity = table_for(Version::DiamondPearl).pouch(kind).capacity;
        assert_eq!(decoded.slots.len(), capacity, "{kind:?}");
        assert!(decoded.slots.iter().all(|s| *s == PouchSlot::default()));
        assert!(decoded.diagnostics.is_empty());
    }
}

#[test]
fn unknown_item_is_dropped_with_one_diagnostic() {
    let image = image_with_slots(
        Version::Platinum,
        PouchKind::Medicine,
        &[(0, 17, 3), (3, 9999, 1), (4, 18, 2)],
    );
    let decoded = image
        .pouch(PouchKind::Medicine, &names_for(Version::Platinum))
        .expect("decode");

    let capacity = table_for(Version::Platinum).pouch(PouchKind::Medicine).capacity;
    assert_eq!(decoded.slots.len(), capacity - 1);
    assert_eq!(
        decoded.diagnostics,
        vec![Diagnostic::UnknownItem {
            pouch: PouchKind::Medicine,
            slot: 3,
            item_id: 9999
        }]
    );
    assert_eq!(decoded.slots[0], PouchSlot { item_id: 17, count: 3 });
    assert_eq!(decoded.slots[3], PouchSlot { item_id: 18, count: 2 });
}

#[test]
fn illegal_item_becomes_an_empty_placeholder() {
    // 17 is medicine, not a ball.
    let image = image_with_slots(
        Version::DiamondPearl,
        PouchKind::Balls,
        &[(0, 4, 10), (1, 17, 5)],
    );
    let decoded = image
        .pouch(PouchKind::Balls, &names_for(Version::DiamondPearl))
        .expect("decode");

    assert_eq!(decoded.slots.len(), 15);
    assert_eq!(decoded.slots[0], PouchSlot { item_id: 4, count: 10 });
    assert_eq!(decoded.slots[1], PouchSlot::default());
    assert!(matches!(
        decoded.diagnostics.as_slice(),
        [Diagnostic::IllegalItem {
            pouch: PouchKind::Balls,
            slot: 1,
            item_id: 17
        }]
    ));
}

#[test]
fn legal_config_override_changes_decode_filtering() {
    let mut image = image_with_slots(Version::DiamondPearl, PouchKind::Balls, &[(0, 4, 10)]);
    let config = LegalItemsConfig::from_json_str(r#"{"balls": [1, 2, 3]}"#).expect("config");
    image.legal_items_mut().apply(&config);

    let decoded = image
        .pouch(PouchKind::Balls, &names_for(Version::DiamondPearl))
        .expect("decode");
    assert_eq!(decoded.slots[0], PouchSlot::default());
    assert_eq!(decoded.diagnostics.len(), 1);
}

#[test]
fn compaction_discards_empty_rows_and_keeps_order() {
    let names = names_for(Version::DiamondPearl);
    let entries = vec![
        id(0, "7"),
        id(70, "2"),
        EditedSlot::new(ItemRef::Name("No Such Item".into()), "9"),
        id(68, "1"),
        id(0, "0"),
        id(69, "4"),
    ];
    let (slots, diagnostics) = compact(PouchKind::Items, 995, &entries, &names);
    let ids: Vec<u16> = slots.iter().map(|s| s.item_id).collect();
    assert_eq!(ids, vec![70, 68, 69]);
    assert!(diagnostics.is_empty());
}

#[test]
fn counts_are_clamped_into_range() {
    let names = names_for(Version::DiamondPearl);
    let entries = vec![id(328, "0"), id(329, "500"), id(330, "twelve"), id(331, "-3")];
    let (slots, diagnostics) = compact(PouchKind::TmHms, 95, &entries, &names);
    let counts: Vec<u16> = slots.iter().map(|s| s.count).collect();
    assert_eq!(counts, vec![1, 95, 1, 1]);
    assert_eq!(
        diagnostics,
        vec![Diagnostic::MalformedCount {
            pouch: PouchKind::TmHms,
            entry: 2,
            raw: "twelve".to_string()
        }]
    );
}

#[test]
fn encode_writes_survivors_then_zeroes_the_tail() {
    let version = Version::HeartGoldSoulSilver;
    let names = names_for(version);
    let mut image = image_with_slots(
        version,
        PouchKind::Berries,
        &[(0, 149, 5), (1, 150, 5), (2, 151, 5)],
    );

    let diagnostics = image
        .set_pouch(PouchKind::Berries, &[id(160, "20"), id(0, "1")], &names)
        .expect("encode");
    assert!(diagnostics.is_empty());

    let decoded = image.pouch(PouchKind::Berries, &names).expect("decode");
    assert_eq!(decoded.slots[0], PouchSlot { item_id: 160, count: 20 });
    assert!(decoded.slots[1..].iter().all(|s| *s == PouchSlot::default()));
}

#[test]
fn decode_encode_decode_is_stable_after_normalization() {
    let version = Version::Platinum;
    let names = names_for(version);
    let mut image = image_with_slots(
        version,
        PouchKind::Items,
        &[(0, 68, 3), (2, 70, 1), (5, 213, 994)],
    );

    let first = image.pouch(PouchKind::Items, &names).expect("decode");
    let edited: Vec<EditedSlot> = first
        .slots
        .iter()
        .map(|s| id(s.item_id, &s.count.to_string()))
        .collect();
    image.set_pouch(PouchKind::Items, &edited, &names).expect("encode");

    let second = image.pouch(PouchKind::Items, &names).expect("decode");
    let occupied: Vec<PouchSlot> = second
        .slots
        .iter()
        .copied()
        .filter(|s| !s.is_empty())
        .collect();
    assert_eq!(
        occupied,
        vec![
            PouchSlot { item_id: 68, count: 3 },
            PouchSlot { item_id: 70, count: 1 },
            PouchSlot { item_id: 213, count: 994 },
        ]
    );
    assert!(second.slots[..3].iter().all(|s| !s.is_empty()));
}

#[test]
fn surplus_entries_are_reported_as_overflow() {
    let version = Version::DiamondPearl;
    let names = names_for(version);
    let mut image = SaveImage::blank(version).expect("blank image");

    let entries: Vec<EditedSlot> = (1..=20).map(|ball| id(ball, "1")).collect();
    let diagnostics = image
        .set_pouch(PouchKind::Balls, &entries, &names)
        .expect("encode");
    assert_eq!(
        diagnostics,
        vec![Diagnostic::PouchOverflow {
            pouch: PouchKind::Balls,
            capacity: 15,
            dropped: 5
        }]
    );

    let next_at = image.general_base() + table_for(version).pouch(PouchKind::BattleItems).offset;
    let bytes = image.as_bytes();
    assert!(bytes[next_at..next_at + 4].iter().all(|&b| b == 0));
}

#[test]
fn give_all_fills_legal_items_and_clear_empties() {
    let version = Version::DiamondPearl;
    let names = names_for(version);
    let mut image = SaveImage::blank(version).expect("blank image");

    let written = image.give_all(PouchKind::Medicine, 999, &names).expect("give all");
    let legal = image.legal_items().ids(PouchKind::Medicine).len();
    assert_eq!(written, legal);

    let decoded = image.pouch(PouchKind::Medicine, &names).expect("decode");
    let filled: Vec<&PouchSlot> = decoded.slots.iter().filter(|s| !s.is_empty()).collect();
    assert_eq!(filled.len(), legal);
    assert!(filled.iter().all(|s| s.count == 995));

    image.clear_pouch(PouchKind::Medicine).expect("clear");
    let cleared = image.pouch(PouchKind::Medicine, &names).expect("decode");
    assert!(cleared.slots.iter().all(PouchSlot::is_empty));
}

#[test]
fn give_all_writes_each_repeated_override_id_once() {
    let version = Version::DiamondPearl;
    let names = names_for(version);
    let mut image = SaveImage::blank(version).expect("blank image");
    let config = LegalItemsConfig::from_json_str(r#"{"balls": [1, 2, 1, 3, 2]}"#)
        .expect("config should parse");
    image.legal_items_mut().apply(&config);

    let written = image.give_all(PouchKind::Balls, 5, &names).expect("give all");
    assert_eq!(written, 3);

    let decoded = image.pouch(PouchKind::Balls, &names).expect("decode");
    let ids: Vec<u16> = decoded
        .slots
        .iter()
        .filter(|s| !s.is_empty())
        .map(|s| s.item_id)
        .collect();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[test]
fn names_resolve_through_the_item_table() {
    let names = ItemNames::from_names(vec![
        "(None)".to_string(),
        "Master Ball".to_string(),
        "Ultra Ball".to_string(),
    ]);
    let mut image = SaveImage::blank(Version::DiamondPearl).expect("blank image");
    let entries = vec![
        EditedSlot::new(ItemRef::Name("Ultra Ball".into()), "3"),
        EditedSlot::new(ItemRef::Name("Great Ball".into()), "3"),
    ];
    image.set_pouch(PouchKind::Balls, &entries, &names).expect("encode");

    let decoded = image.pouch(PouchKind::Balls, &names).expect("decode");
    assert_eq!(decoded.slots[0], PouchSlot { item_id: 2, count: 3 });
    assert!(decoded.slots[1].is_empty());
}
