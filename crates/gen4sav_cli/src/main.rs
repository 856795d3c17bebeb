use std::fs;
use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Parser};
use gen4sav_core::core_api::{Coordinates, Engine, ItemCatalog, PlayTime, Session};
use gen4sav_core::sav4::{LegalItemsConfig, PouchKind, Version};
use gen4sav_render::{
    FieldSelection, JsonStyle, TextRenderOptions, render_json_full, render_json_selected,
    render_selected_pairs, render_trainer_card_with_options,
};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(author, about, disable_version_flag = true)]
struct Cli {
    #[arg(value_name = "SAVE")]
    path: PathBuf,
    /// Force the game version instead of detecting it.
    #[arg(long, value_name = "dp|pt|hgss")]
    version: Option<Version>,
    /// Item name list, one name per line.
    #[arg(long, value_name = "FILE")]
    items: Option<PathBuf>,
    /// JSON overrides for the legal item sets.
    #[arg(long, value_name = "FILE")]
    legal: Option<PathBuf>,
    /// Raise log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
    #[arg(long)]
    name: bool,
    #[arg(long)]
    tid: bool,
    #[arg(long)]
    sid: bool,
    #[arg(long)]
    money: bool,
    #[arg(long)]
    gender: bool,
    #[arg(long)]
    badges: bool,
    #[arg(long = "play-time")]
    play_time: bool,
    #[arg(long)]
    map: bool,
    #[arg(long)]
    coords: bool,
    #[arg(long = "party-count")]
    party_count: bool,
    #[arg(long)]
    checksums: bool,
    #[arg(long)]
    pouches: bool,
    #[arg(long)]
    gifts: bool,
    #[arg(long)]
    json: bool,
    #[arg(long = "set-name")]
    set_name: Option<String>,
    #[arg(long = "set-tid")]
    set_tid: Option<u16>,
    #[arg(long = "set-sid")]
    set_sid: Option<u16>,
    #[arg(long = "set-money")]
    set_money: Option<u32>,
    #[arg(long = "set-play-time", value_name = "H:M:S")]
    set_play_time: Option<PlayTime>,
    #[arg(long = "set-coords", value_name = "X,Y,Z", allow_hyphen_values = true)]
    set_coords: Option<Coordinates>,
    #[arg(long = "give-all", value_name = "POUCH")]
    give_all: Vec<PouchKind>,
    #[arg(long = "clear-pouch", value_name = "POUCH")]
    clear_pouch: Vec<PouchKind>,
    #[arg(long = "set-gift-flag", value_name = "N")]
    set_gift_flag: Vec<usize>,
    #[arg(long = "clear-gift-flag", value_name = "N")]
    clear_gift_flag: Vec<usize>,
    /// Rewrite the stored checksums without changing any field.
    #[arg(long = "fix-checksums")]
    fix_checksums: bool,
    #[arg(long)]
    output: Option<PathBuf>,
}

impl Cli {
    fn fields(&self) -> FieldSelection {
        FieldSelection {
            name: self.name,
            tid: self.tid,
            sid: self.sid,
            money: self.money,
            gender: self.gender,
            badges: self.badges,
            play_time: self.play_time,
            map: self.map,
            coords: self.coords,
            party_count: self.party_count,
            checksums: self.checksums,
            pouches: self.pouches,
            gifts: self.gifts,
        }
    }

    fn has_edits(&self) -> bool {
        self.set_name.is_some()
            || self.set_tid.is_some()
            || self.set_sid.is_some()
            || self.set_money.is_some()
            || self.set_play_time.is_some()
            || self.set_coords.is_some()
            || !self.give_all.is_empty()
            || !self.clear_pouch.is_empty()
            || !self.set_gift_flag.is_empty()
            || !self.clear_gift_flag.is_empty()
            || self.fix_checksums
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn fail(context: &str, err: impl std::fmt::Display) -> ! {
    eprintln!("Error {context}: {err}");
    process::exit(1);
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let fields = cli.fields();
    let has_edits = cli.has_edits();

    if has_edits && cli.output.is_none() {
        eprintln!("edit flags require --output <PATH>");
        process::exit(2);
    }
    if !has_edits && cli.output.is_some() {
        eprintln!("--output requires at least one edit flag");
        process::exit(2);
    }

    let bytes = fs::read(&cli.path)
        .unwrap_or_else(|e| fail(&format!("reading {}", cli.path.display()), e));

    let engine = Engine::new();
    let mut session = engine.open_bytes(bytes, cli.version).unwrap_or_else(|e| {
        eprintln!("Error parsing save file: {}", cli.path.display());
        eprintln!("  {e}");
        process::exit(1);
    });

    if let Some(path) = &cli.items {
        let catalog = ItemCatalog::load_from_file(path)
            .unwrap_or_else(|e| fail("loading item names", e));
        session.set_item_catalog(catalog);
    }
    if let Some(path) = &cli.legal {
        let raw = fs::read_to_string(path)
            .unwrap_or_else(|e| fail(&format!("reading {}", path.display()), e));
        let config = LegalItemsConfig::from_json_str(&raw)
            .unwrap_or_else(|e| fail(&format!("parsing {}", path.display()), e));
        session.apply_legal_items(&config);
    }

    apply_edits(&cli, &mut session);

    if has_edits {
        let Some(out_path) = cli.output.as_ref() else {
            process::exit(2);
        };
        let edited_bytes = session
            .commit()
            .unwrap_or_else(|e| fail("committing edits", e));
        fs::write(out_path, edited_bytes)
            .unwrap_or_else(|e| fail(&format!("writing {}", out_path.display()), e));
        debug!(path = %out_path.display(), "wrote edited save");
    }

    if cli.json {
        let json = if fields.is_any_selected() {
            render_json_selected(&session, &fields, JsonStyle::CanonicalV1)
        } else {
            render_json_full(&session, JsonStyle::CanonicalV1)
        }
        .unwrap_or_else(|e| fail("rendering JSON output", e));
        let rendered = serde_json::to_string_pretty(&json)
            .unwrap_or_else(|e| fail("rendering JSON output", e));
        println!("{rendered}");
        return;
    }

    if fields.is_any_selected() {
        let pairs = render_selected_pairs(&session, &fields)
            .unwrap_or_else(|e| fail("reading fields", e));
        for (key, value) in pairs {
            println!("{key}={value}");
        }
        return;
    }

    if let Some(out_path) = &cli.output {
        println!("Wrote edited save to {}", out_path.display());
        return;
    }

    let options = TextRenderOptions {
        verbose: cli.verbose > 0,
    };
    let card = render_trainer_card_with_options(&session, options)
        .unwrap_or_else(|e| fail("rendering trainer card", e));
    print!("{card}");
}

fn apply_edits(cli: &Cli, session: &mut Session) {
    if let Some(name) = &cli.set_name {
        session
            .set_trainer_name(name)
            .unwrap_or_else(|e| fail("applying name edit", e));
    }
    if let Some(tid) = cli.set_tid {
        session
            .set_tid(tid)
            .unwrap_or_else(|e| fail("applying TID edit", e));
    }
    if let Some(sid) = cli.set_sid {
        session
            .set_sid(sid)
            .unwrap_or_else(|e| fail("applying SID edit", e));
    }
    if let Some(money) = cli.set_money {
        session
            .set_money(money)
            .unwrap_or_else(|e| fail("applying money edit", e));
    }
    if let Some(time) = cli.set_play_time {
        session
            .set_play_time(time)
            .unwrap_or_else(|e| fail("applying play time edit", e));
    }
    if let Some(coords) = cli.set_coords {
        session
            .set_coordinates(coords)
            .unwrap_or_else(|e| fail("applying coordinates edit", e));
    }
    for &kind in &cli.clear_pouch {
        session
            .clear_pouch(kind)
            .unwrap_or_else(|e| fail("clearing pouch", e));
    }
    for &kind in &cli.give_all {
        let given = session
            .give_all(kind, None)
            .unwrap_or_else(|e| fail("filling pouch", e));
        info!(pouch = kind.as_str(), given, "filled pouch");
    }
    for &index in &cli.set_gift_flag {
        session
            .set_gift_flag(index, true)
            .unwrap_or_else(|e| fail("setting gift flag", e));
    }
    for &index in &cli.clear_gift_flag {
        session
            .set_gift_flag(index, false)
            .unwrap_or_else(|e| fail("clearing gift flag", e));
    }
    for diagnostic in session.diagnostics() {
        warn!(%diagnostic, "edit diagnostic");
    }
}
