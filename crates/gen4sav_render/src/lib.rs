use std::fmt::Write as _;

use gen4sav_core::core_api::{CoreError, PouchView, Session, Snapshot};
use gen4sav_core::sav4::{ChecksumReport, Version};
use serde_json::{Map as JsonMap, Value as JsonValue};

const CARD_WIDTH: usize = 60;
const LEFT_COL_WIDTH: usize = 26;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonStyle {
    #[default]
    CanonicalV1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextRenderOptions {
    /// Also list the contents of every non-empty pouch.
    pub verbose: bool,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FieldSelection {
    pub name: bool,
    pub tid: bool,
    pub sid: bool,
    pub money: bool,
    pub gender: bool,
    pub badges: bool,
    pub play_time: bool,
    pub map: bool,
    pub coords: bool,
    pub party_count: bool,
    pub checksums: bool,
    pub pouches: bool,
    pub gifts: bool,
}

impl FieldSelection {
    pub fn is_any_selected(&self) -> bool {
        self.name
            || self.tid
            || self.sid
            || self.money
            || self.gender
            || self.badges
            || self.play_time
            || self.map
            || self.coords
            || self.party_count
            || self.checksums
            || self.pouches
            || self.gifts
    }
}

pub fn render_json_full(session: &Session, style: JsonStyle) -> Result<JsonValue, CoreError> {
    match style {
        JsonStyle::CanonicalV1 => default_json(session).map(JsonValue::Object),
    }
}

pub fn render_json_selected(
    session: &Session,
    fields: &FieldSelection,
    style: JsonStyle,
) -> Result<JsonValue, CoreError> {
    match style {
        JsonStyle::CanonicalV1 => selected_json(fields, session).map(JsonValue::Object),
    }
}

pub fn render_trainer_card(session: &Session) -> Result<String, CoreError> {
    render_trainer_card_with_options(session, TextRenderOptions::default())
}

pub fn render_trainer_card_with_options(
    session: &Session,
    options: TextRenderOptions,
) -> Result<String, CoreError> {
    let snapshot = session.snapshot()?;
    let checksums = session.checksums()?;
    let pouches = if options.verbose {
        session.pouches()?
    } else {
        Vec::new()
    };
    Ok(trainer_card(&snapshot, &checksums, &pouches))
}

/// Selected fields as `(key, value)` pairs, in canonical field order.
/// Multi-valued fields repeat their key once per value.
pub fn render_selected_pairs(
    session: &Session,
    fields: &FieldSelection,
) -> Result<Vec<(&'static str, String)>, CoreError> {
    let snapshot = session.snapshot()?;
    let mut out = Vec::new();

    if fields.name {
        out.push(("name", snapshot.trainer_name.clone()));
    }
    if fields.tid {
        out.push(("tid", snapshot.tid.to_string()));
    }
    if fields.sid {
        out.push(("sid", snapshot.sid.to_string()));
    }
    if fields.money {
        out.push(("money", snapshot.money.to_string()));
    }
    if fields.gender {
        out.push(("gender", snapshot.gender.to_string()));
    }
    if fields.badges {
        out.push(("badges", format_badges(&snapshot)));
    }
    if fields.play_time {
        out.push(("play_time", snapshot.play_time.to_string()));
    }
    if fields.map {
        out.push(("map_id", snapshot.map_id.to_string()));
    }
    if fields.coords {
        let c = snapshot.coordinates;
        out.push(("coordinates", format!("{},{},{}", c.x, c.y, c.z)));
    }
    if fields.party_count {
        out.push(("party_count", snapshot.party_count.to_string()));
    }
    if fields.checksums {
        for status in session.checksums()?.regions {
            let state = if status.is_valid() { "ok" } else { "bad" };
            out.push((
                "checksum",
                format!(
                    "{} {state} stored={:#06x} computed={:#06x}",
                    status.region.as_str(),
                    status.stored,
                    status.computed
                ),
            ));
        }
    }
    if fields.pouches {
        for pouch in session.pouches()? {
            for entry in &pouch.entries {
                let name = entry
                    .name
                    .clone()
                    .unwrap_or_else(|| format!("#{}", entry.item_id));
                out.push((
                    "item",
                    format!("{}:{name} x{}", pouch.kind.as_str(), entry.count),
                ));
            }
        }
    }
    if fields.gifts {
        let summary = session.gift_summary()?;
        for index in &summary.received {
            out.push(("gift_received", index.to_string()));
        }
        for record in summary.records.iter().filter(|r| !r.empty) {
            out.push((
                "gift_record",
                format!("{} {}", record.index, record.kind.as_str()),
            ));
        }
    }

    Ok(out)
}

fn selected_json(
    fields: &FieldSelection,
    session: &Session,
) -> Result<JsonMap<String, JsonValue>, CoreError> {
    let snapshot = session.snapshot()?;
    let mut out = JsonMap::new();

    if fields.name {
        out.insert(
            "name".to_string(),
            JsonValue::String(snapshot.trainer_name.clone()),
        );
    }
    if fields.tid {
        out.insert("tid".to_string(), JsonValue::from(snapshot.tid));
    }
    if fields.sid {
        out.insert("sid".to_string(), JsonValue::from(snapshot.sid));
    }
    if fields.money {
        out.insert("money".to_string(), JsonValue::from(snapshot.money));
    }
    if fields.gender {
        out.insert(
            "gender".to_string(),
            JsonValue::String(snapshot.gender.to_string()),
        );
    }
    if fields.badges {
        insert_badges(&mut out, &snapshot);
    }
    if fields.play_time {
        out.insert(
            "play_time".to_string(),
            JsonValue::String(snapshot.play_time.to_string()),
        );
    }
    if fields.map {
        out.insert("map_id".to_string(), JsonValue::from(snapshot.map_id));
    }
    if fields.coords {
        out.insert("coordinates".to_string(), coordinates_to_json(&snapshot));
    }
    if fields.party_count {
        out.insert(
            "party_count".to_string(),
            JsonValue::from(snapshot.party_count),
        );
    }
    if fields.checksums {
        out.insert(
            "checksums".to_string(),
            checksums_to_json(&session.checksums()?),
        );
    }
    if fields.pouches {
        out.insert("pouches".to_string(), pouches_to_json(&session.pouches()?));
    }
    if fields.gifts {
        out.insert("gifts".to_string(), to_json(&session.gift_summary()?));
    }

    Ok(out)
}

fn default_json(session: &Session) -> Result<JsonMap<String, JsonValue>, CoreError> {
    let snapshot = session.snapshot()?;
    let mut out = JsonMap::new();

    out.insert(
        "version".to_string(),
        JsonValue::String(snapshot.version.as_str().to_string()),
    );
    out.insert("blank".to_string(), JsonValue::Bool(snapshot.blank));
    out.insert(
        "name".to_string(),
        JsonValue::String(snapshot.trainer_name.clone()),
    );
    out.insert("tid".to_string(), JsonValue::from(snapshot.tid));
    out.insert("sid".to_string(), JsonValue::from(snapshot.sid));
    out.insert("money".to_string(), JsonValue::from(snapshot.money));
    out.insert(
        "gender".to_string(),
        JsonValue::String(snapshot.gender.to_string()),
    );
    out.insert("language".to_string(), JsonValue::from(snapshot.language));
    insert_badges(&mut out, &snapshot);
    out.insert("sprite".to_string(), JsonValue::from(snapshot.sprite));
    out.insert(
        "play_time".to_string(),
        JsonValue::String(snapshot.play_time.to_string()),
    );
    out.insert(
        "seconds_to_start".to_string(),
        JsonValue::from(snapshot.seconds_to_start),
    );
    out.insert(
        "seconds_to_fame".to_string(),
        JsonValue::from(snapshot.seconds_to_fame),
    );
    out.insert("map_id".to_string(), JsonValue::from(snapshot.map_id));
    out.insert("coordinates".to_string(), coordinates_to_json(&snapshot));
    out.insert(
        "party_count".to_string(),
        JsonValue::from(snapshot.party_count),
    );
    out.insert(
        "unlocked_boxes".to_string(),
        JsonValue::from(snapshot.unlocked_boxes),
    );
    out.insert(
        "checksums".to_string(),
        checksums_to_json(&session.checksums()?),
    );
    out.insert("pouches".to_string(), pouches_to_json(&session.pouches()?));
    out.insert("gifts".to_string(), to_json(&session.gift_summary()?));
    out.insert("capabilities".to_string(), to_json(&session.capabilities()));

    Ok(out)
}

fn to_json<T: serde::Serialize>(value: &T) -> JsonValue {
    serde_json::to_value(value).unwrap_or(JsonValue::Null)
}

fn insert_badges(out: &mut JsonMap<String, JsonValue>, snapshot: &Snapshot) {
    out.insert("badges".to_string(), JsonValue::from(snapshot.badges));
    if let Some(badges16) = snapshot.badges16 {
        out.insert("badges16".to_string(), JsonValue::from(badges16));
    }
}

fn coordinates_to_json(snapshot: &Snapshot) -> JsonValue {
    let c = snapshot.coordinates;
    let mut map = JsonMap::new();
    map.insert("x".to_string(), JsonValue::from(c.x));
    map.insert("y".to_string(), JsonValue::from(c.y));
    map.insert("z".to_string(), JsonValue::from(c.z));
    JsonValue::Object(map)
}

fn checksums_to_json(report: &ChecksumReport) -> JsonValue {
    let regions = report
        .regions
        .iter()
        .map(|status| {
            let mut map = JsonMap::new();
            map.insert(
                "region".to_string(),
                JsonValue::String(status.region.as_str().to_string()),
            );
            map.insert(
                "stored".to_string(),
                JsonValue::String(format!("{:#06x}", status.stored)),
            );
            map.insert(
                "computed".to_string(),
                JsonValue::String(format!("{:#06x}", status.computed)),
            );
            map.insert("valid".to_string(), JsonValue::Bool(status.is_valid()));
            JsonValue::Object(map)
        })
        .collect();
    let mut out = JsonMap::new();
    out.insert("valid".to_string(), JsonValue::Bool(report.is_valid()));
    out.insert("regions".to_string(), JsonValue::Array(regions));
    JsonValue::Object(out)
}

fn pouches_to_json(pouches: &[PouchView]) -> JsonValue {
    let mut out = JsonMap::new();
    for pouch in pouches {
        let entries = pouch
            .entries
            .iter()
            .map(|entry| {
                let mut map = JsonMap::new();
                map.insert("item_id".to_string(), JsonValue::from(entry.item_id));
                map.insert(
                    "name".to_string(),
                    entry
                        .name
                        .clone()
                        .map_or(JsonValue::Null, JsonValue::String),
                );
                map.insert("count".to_string(), JsonValue::from(entry.count));
                JsonValue::Object(map)
            })
            .collect();
        let mut map = JsonMap::new();
        map.insert("capacity".to_string(), JsonValue::from(pouch.capacity));
        map.insert("entries".to_string(), JsonValue::Array(entries));
        if !pouch.diagnostics.is_empty() {
            map.insert("diagnostics".to_string(), to_json(&pouch.diagnostics));
        }
        out.insert(pouch.kind.as_str().to_string(), JsonValue::Object(map));
    }
    JsonValue::Object(out)
}

fn trainer_card(snapshot: &Snapshot, checksums: &ChecksumReport, pouches: &[PouchView]) -> String {
    let mut out = String::new();
    writeln!(&mut out).expect("writing to String cannot fail");
    writeln!(&mut out, "{}", centered_no_trailing("TRAINER CARD", CARD_WIDTH))
        .expect("writing to String cannot fail");
    writeln!(
        &mut out,
        "{}",
        centered_no_trailing(game_title(snapshot.version), CARD_WIDTH)
    )
    .expect("writing to String cannot fail");
    if snapshot.blank {
        writeln!(&mut out, "{}", centered_no_trailing("(blank save)", CARD_WIDTH))
            .expect("writing to String cannot fail");
    }
    writeln!(&mut out).expect("writing to String cannot fail");

    let rows = [
        (
            format!("Name: {}", snapshot.trainer_name),
            format!("TID: {:05}  SID: {:05}", snapshot.tid, snapshot.sid),
        ),
        (
            format!("Money: ${}", format_number_with_commas(snapshot.money)),
            format!("Gender: {}", snapshot.gender),
        ),
        (
            format!("Badges: {}", format_badges(snapshot)),
            format!("Play time: {}", snapshot.play_time),
        ),
        (
            format!("Map: {}", snapshot.map_id),
            format!(
                "Position: {}, {}, {}",
                snapshot.coordinates.x, snapshot.coordinates.y, snapshot.coordinates.z
            ),
        ),
        (
            format!("Party: {}", snapshot.party_count),
            format!("Boxes unlocked: {}", snapshot.unlocked_boxes),
        ),
    ];
    for (left, right) in rows {
        writeln!(&mut out, "  {}{right}", fit_column(&left, LEFT_COL_WIDTH))
            .expect("writing to String cannot fail");
    }

    writeln!(&mut out).expect("writing to String cannot fail");
    writeln!(&mut out, "  Checksums: {}", format_checksums(checksums))
        .expect("writing to String cannot fail");

    for pouch in pouches.iter().filter(|p| !p.entries.is_empty()) {
        writeln!(&mut out).expect("writing to String cannot fail");
        write_pouch(&mut out, pouch);
    }

    out
}

fn write_pouch(out: &mut String, pouch: &PouchView) {
    writeln!(
        out,
        "  {} ({}/{})",
        pouch.label,
        pouch.entries.len(),
        pouch.capacity
    )
    .expect("writing to String cannot fail");
    for entry in &pouch.entries {
        let name = entry
            .name
            .clone()
            .unwrap_or_else(|| format!("#{}", entry.item_id));
        writeln!(out, "    {} x{}", fit_column(&name, 24), entry.count)
            .expect("writing to String cannot fail");
    }
}

fn game_title(version: Version) -> &'static str {
    match version {
        Version::DiamondPearl => "POKEMON DIAMOND / PEARL",
        Version::Platinum => "POKEMON PLATINUM",
        Version::HeartGoldSoulSilver => "POKEMON HEARTGOLD / SOULSILVER",
    }
}

fn format_badges(snapshot: &Snapshot) -> String {
    let primary = snapshot.badges.count_ones();
    match snapshot.badges16 {
        Some(second) => format!("{primary}+{}/16", second.count_ones()),
        None => format!("{primary}/8"),
    }
}

fn format_checksums(report: &ChecksumReport) -> String {
    report
        .regions
        .iter()
        .map(|status| {
            let state = if status.is_valid() { "OK" } else { "BAD" };
            format!("{} {state}", status.region.as_str())
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn fit_column(value: &str, width: usize) -> String {
    let truncated: String = value.chars().take(width).collect();
    format!("{truncated:<width$}")
}

fn centered_no_trailing(value: &str, width: usize) -> String {
    let len = value.chars().count();
    if len >= width {
        return value.to_string();
    }
    let pad = (width - len) / 2;
    format!("{}{value}", " ".repeat(pad))
}

fn format_number_with_commas(n: u32) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{centered_no_trailing, fit_column, format_number_with_commas};

    #[test]
    fn number_grouping() {
        assert_eq!(format_number_with_commas(0), "0");
        assert_eq!(format_number_with_commas(999), "999");
        assert_eq!(format_number_with_commas(1000), "1,000");
        assert_eq!(format_number_with_commas(999_999), "999,999");
        assert_eq!(format_number_with_commas(1_234_567), "1,234,567");
    }

    #[test]
    fn column_helpers() {
        assert_eq!(fit_column("abc", 5), "abc  ");
        assert_eq!(fit_column("abcdef", 3), "abc");
        assert_eq!(centered_no_trailing("ab", 6), "  ab");
    }
}
