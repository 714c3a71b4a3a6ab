//! Shorthand - a terminal text editor that expands abbreviations as you type.
//!
//! # Usage
//!
//! ```bash
//! shorthand notes.txt
//! shorthand --watch --abbreviations my-abbreviations.json notes.txt
//! shorthand --list
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use shorthand::abbrev::AbbreviationTable;
use shorthand::app::App;
use shorthand::config::{
    ConfigFlags, clear_config_flags, default_abbreviations_path, global_config_path,
    load_config_flags, local_override_path, parse_flag_tokens, save_config_flags,
};
use shorthand::logging::{self, LogMode};
use shorthand::store::AbbreviationStore;

/// A terminal text editor that expands abbreviations as you type
#[derive(Parser, Debug)]
#[command(name = "shorthand", version, about, long_about = None)]
struct Cli {
    /// File to edit (created on first save)
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Abbreviations file (JSON)
    #[arg(long, value_name = "PATH")]
    abbreviations: Option<PathBuf>,

    /// Reload abbreviations when their file changes
    #[arg(short, long)]
    watch: bool,

    /// Start with abbreviation expansion switched off
    #[arg(long)]
    no_expand: bool,

    /// Verbose development logging (also enabled by SHORTHAND_DEV=1)
    #[arg(long)]
    dev: bool,

    /// Write log output to a file
    #[arg(long, value_name = "PATH")]
    debug_log: Option<PathBuf>,

    /// Print the abbreviation table and exit
    #[arg(long)]
    list: bool,

    /// Restore the default abbreviations and exit
    #[arg(long)]
    reset_abbreviations: bool,

    /// Save current command-line flags as defaults
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,
}

fn print_table(table: &AbbreviationTable) {
    let width = table
        .iter()
        .map(|(key, _)| key.chars().count())
        .max()
        .unwrap_or(0)
        .max(2);
    for (key, expansion) in table.by_position() {
        let key = if key.is_empty() { "\"\"" } else { key };
        let mut notes = Vec::new();
        if !expansion.is_enabled {
            notes.push("disabled");
        }
        if expansion.is_case_sensitive {
            notes.push("case-sensitive");
        }
        if expansion.expansion_text.is_empty() {
            notes.push("empty");
        }
        let notes = if notes.is_empty() {
            String::new()
        } else {
            format!("  ({})", notes.join(", "))
        };
        println!("{key:<width$}  {}{notes}", expansion.expansion_text);
    }
}

fn main() -> Result<()> {
    let raw_args = std::env::args().collect::<Vec<_>>();
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = parse_flag_tokens(&raw_args);

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    let interactive = !(cli.list || cli.reset_abbreviations);
    let mode = LogMode::select(effective.dev);
    // Keep development output off the editor screen.
    let log_path = effective.debug_log.clone().or_else(|| {
        (mode == LogMode::Development && interactive).then(logging::default_log_path)
    });
    if let Err(err) = logging::init(mode, log_path.as_deref()) {
        eprintln!("[warn] {err:#}");
    }

    let abbreviations_path = effective
        .abbreviations
        .clone()
        .unwrap_or_else(default_abbreviations_path);
    let mut store = AbbreviationStore::open(&abbreviations_path).with_context(|| {
        format!(
            "Failed to load abbreviations from {}",
            abbreviations_path.display()
        )
    })?;

    if cli.reset_abbreviations {
        store.reset().context("Failed to reset abbreviations")?;
        println!(
            "Restored default abbreviations in {}",
            abbreviations_path.display()
        );
        return Ok(());
    }
    if cli.list {
        print_table(&store.snapshot());
        return Ok(());
    }

    let mut app = App::new(cli.file, store)
        .with_watch(effective.watch)
        .with_expansion_enabled(!effective.no_expand);

    app.run().context("Application error")
}
