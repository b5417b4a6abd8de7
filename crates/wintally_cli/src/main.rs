//! `wintally` command-line front end.
//!
//! # Responsibility
//! - Map subcommands onto ledger store and analytics calls.
//! - Render history and dashboard views as text or JSON.

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use log::info;
use std::path::PathBuf;
use uuid::Uuid;
use wintally_core::db::open_db;
use wintally_core::{
    default_log_level, format_signed_amount, init_logging, AmountTone, DashboardSnapshot,
    LedgerService, Record, SqliteLedgerRepository,
};

const DEFAULT_DB_FILE_NAME: &str = "wintally.sqlite3";

#[derive(Parser, Debug)]
#[command(name = "wintally", version, about = "Track wins and losses from game sessions")]
struct Cli {
    /// Ledger database file
    #[arg(long, env = "WINTALLY_DB", default_value = DEFAULT_DB_FILE_NAME)]
    db: PathBuf,

    /// Absolute directory for rolling log files (logging is off when unset)
    #[arg(long, env = "WINTALLY_LOG_DIR")]
    log_dir: Option<PathBuf>,

    /// trace|debug|info|warn|error
    #[arg(long, default_value_t = default_log_level().to_string())]
    log_level: String,

    /// Emit JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Record one session result
    Add {
        /// Signed amount, e.g. 1000 or -500
        #[arg(long, allow_hyphen_values = true)]
        amount: String,
        /// Game type; unseen labels are registered automatically
        #[arg(long)]
        category: String,
        /// Session day (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        note: Option<String>,
    },
    /// Show history, newest first
    List,
    /// Remove one record by id
    Delete { id: Uuid },
    /// Show balance, win rate and per-category totals
    Summary,
    /// Show known categories
    Categories,
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Self::Add { .. } => "add",
            Self::List => "list",
            Self::Delete { .. } => "delete",
            Self::Summary => "summary",
            Self::Categories => "categories",
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(log_dir) = &cli.log_dir {
        init_logging(&cli.log_level, log_dir)
            .map_err(|err| anyhow::anyhow!("failed to initialize logging: {err}"))?;
    }

    let mut conn = open_db(&cli.db)
        .with_context(|| format!("failed to open ledger at `{}`", cli.db.display()))?;
    let mut store = LedgerService::load(SqliteLedgerRepository::new(&mut conn));
    info!(
        "event=cli_command module=cli status=start command={}",
        cli.command.name()
    );

    match cli.command {
        Command::Add {
            amount,
            category,
            date,
            note,
        } => {
            let date = date.unwrap_or_else(|| Local::now().date_naive());
            let record = store.create_from_input(&amount, date, &category, note)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&record)?);
            } else {
                println!("added {}", record.id);
            }
        }
        Command::List => {
            let history = store.history();
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&history)?);
            } else if history.is_empty() {
                println!("no records yet");
            } else {
                for record in history {
                    println!("{}", history_line(record));
                }
            }
        }
        Command::Delete { id } => {
            let removed = store.delete(id)?;
            if cli.json {
                println!("{}", serde_json::json!({ "id": id, "removed": removed }));
            } else if removed {
                println!("deleted {id}");
            } else {
                println!("no record with id {id}");
            }
        }
        Command::Summary => {
            let snapshot = store.snapshot();
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
            } else {
                print_summary(&snapshot);
            }
        }
        Command::Categories => {
            if cli.json {
                println!("{}", serde_json::to_string_pretty(store.categories())?);
            } else {
                for label in store.categories().iter() {
                    println!("{label}");
                }
            }
        }
    }

    Ok(())
}

fn history_line(record: &Record) -> String {
    format!(
        "{}  {:<8}  {:>12} {}  {}  {}",
        record.date,
        record.category,
        format_signed_amount(record.amount),
        tone_marker(record.amount),
        record.note.as_deref().unwrap_or("-"),
        record.id
    )
}

fn print_summary(snapshot: &DashboardSnapshot) {
    if snapshot.is_empty() {
        println!("no records yet; add one with `wintally add`");
        return;
    }

    println!(
        "balance      {} {}",
        format_signed_amount(snapshot.total_balance),
        tone_marker(snapshot.total_balance)
    );
    println!(
        "win rate     {:.1}% ({} of {})",
        snapshot.win_rate, snapshot.win_count, snapshot.record_count
    );
    println!(
        "top category {}",
        snapshot.top_category.as_deref().unwrap_or("-")
    );

    println!();
    println!("by category");
    let (_, axis_max) = snapshot.axis_domain;
    for entry in &snapshot.category_ranking {
        println!(
            "  {:<8} {:<30} {}",
            entry.label,
            bar(entry.magnitude, axis_max),
            format_signed_amount(entry.net_value)
        );
    }

    println!();
    println!("balance over time");
    for point in &snapshot.cumulative {
        println!("  {}  {}", point.date, format_signed_amount(point.value));
    }
}

fn tone_marker(amount: f64) -> &'static str {
    match AmountTone::of(amount) {
        AmountTone::Gain => "▲",
        AmountTone::Loss => "▼",
    }
}

fn bar(magnitude: f64, axis_max: f64) -> String {
    const WIDTH: f64 = 30.0;
    if axis_max <= 0.0 {
        return String::new();
    }
    let cells = (magnitude / axis_max * WIDTH).round() as usize;
    "█".repeat(cells.max(1))
}

#[cfg(test)]
mod tests {
    use super::{bar, Cli};
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn bar_keeps_a_minimum_width() {
        assert_eq!(bar(0.0, 100.0).chars().count(), 1);
        assert_eq!(bar(100.0, 105.0).chars().count(), 29);
        assert!(bar(5.0, 0.0).is_empty());
    }
}
