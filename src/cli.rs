//! Command-line interface - the user actions of the ledger.
//!
//! Each subcommand mirrors one action of the tracker: show a tab, add an entry, delete
//! entries, show the total, import a file, export the collection. Output goes to a
//! caller-supplied writer so the actions can be exercised in tests.

use crate::{
    config::settings::{DEFAULT_SETTINGS_FILE, Settings},
    core::{
        item::{self, Sign},
        ledger::{self, LedgerView},
        transfer::{self, ImportSummary},
    },
    errors::Result,
};
use clap::{Parser, Subcommand, ValueEnum};
use sea_orm::DatabaseConnection;
use std::{collections::BTreeSet, io::Write, path::PathBuf};
use tracing::info;

/// Ledger tab selected on the command line.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Tab {
    /// Negative amounts
    Expenses,
    /// Positive amounts
    Incomes,
}

impl From<Tab> for Sign {
    fn from(tab: Tab) -> Self {
        match tab {
            Tab::Expenses => Self::Expenses,
            Tab::Incomes => Self::Incomes,
        }
    }
}

/// Top-level arguments.
#[derive(Parser, Debug)]
#[command(name = "purse", version, about = "Track expenses and incomes")]
pub struct Cli {
    /// Settings file
    #[arg(short = 'c', long = "config", default_value = DEFAULT_SETTINGS_FILE)]
    pub config: PathBuf,

    /// Action to run
    #[command(subcommand)]
    pub command: Command,
}

/// User actions.
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Show one tab, newest first, with row numbers
    List {
        /// Tab to show
        #[arg(value_enum)]
        tab: Tab,
    },
    /// Record an entry; the tab decides its sign
    Add {
        /// Tab to add to
        #[arg(value_enum)]
        tab: Tab,
        /// Whole amount
        #[arg(allow_hyphen_values = true)]
        amount: String,
        /// Description
        #[arg(required = true, num_args = 1..)]
        info: Vec<String>,
    },
    /// Delete rows of a tab by their row numbers
    Delete {
        /// Tab the rows belong to
        #[arg(value_enum)]
        tab: Tab,
        /// Row numbers as shown by `list`
        #[arg(required = true)]
        offsets: Vec<usize>,
    },
    /// Delete items by identifier
    DeleteIds {
        /// Item identifiers
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Show incomes minus expenses
    Total,
    /// Import a JSON file, replacing items with the same identifier
    Import {
        /// File to read
        file: PathBuf,
        /// Tab to show once the import is done
        #[arg(long = "show", value_enum)]
        show: Option<Tab>,
    },
    /// Export every item as pretty-printed JSON
    Export {
        /// Destination (defaults to the configured export file name)
        #[arg(short = 'o', long = "output")]
        output: Option<PathBuf>,
    },
}

/// Shared data available to every command.
pub struct AppContext {
    /// Store handle for all operations
    pub database: DatabaseConnection,
    /// Loaded settings
    pub settings: Settings,
}

impl AppContext {
    /// Creates a new context around an open store.
    #[must_use]
    pub const fn new(database: DatabaseConnection, settings: Settings) -> Self {
        Self { database, settings }
    }

    fn currency_suffix(&self) -> &str {
        &self.settings.display.currency_suffix
    }
}

/// Runs one command, writing its report to `out`.
pub async fn run<W: Write>(ctx: &AppContext, command: Command, out: &mut W) -> Result<()> {
    let db = &ctx.database;

    match command {
        Command::List { tab } => {
            let view = LedgerView::load(db, tab.into()).await?;
            write_view(ctx, &view, out)?;
        }
        Command::Add { tab, amount, info } => {
            let mut view = LedgerView::new(tab.into());
            let row = view.add_entry(db, &amount, &info.join(" ")).await?;
            writeln!(
                out,
                "Added {} to {}: {} ({})",
                row.display_amount(ctx.currency_suffix()),
                view.title(),
                row.info,
                row.item_id
            )?;
        }
        Command::Delete { tab, offsets } => {
            let mut view = LedgerView::load(db, tab.into()).await?;
            let removed = view.delete_at(db, &offsets).await?;
            writeln!(out, "Deleted {removed} item(s) from {}", view.title())?;
        }
        Command::DeleteIds { ids } => {
            let ids: BTreeSet<String> = ids.into_iter().collect();
            let removed = item::delete_items_by_ids(db, &ids).await?;
            writeln!(out, "Deleted {removed} item(s)")?;
        }
        Command::Total => {
            let total = ledger::total(db).await?;
            let suffix = ctx.currency_suffix();
            if suffix.is_empty() {
                writeln!(out, "Total: {total}")?;
            } else {
                writeln!(out, "Total: {total} {suffix}")?;
            }
        }
        Command::Import { file, show: Some(tab) } => {
            let mut view = LedgerView::load(db, tab.into()).await?;
            let summary = view.import_file(db, &file).await?;
            write_summary(&summary, out)?;
            write_view(ctx, &view, out)?;
        }
        Command::Import { file, show: None } => {
            let summary = transfer::import_file(db, &file).await?;
            write_summary(&summary, out)?;
        }
        Command::Export { output } => {
            let path =
                output.unwrap_or_else(|| PathBuf::from(&ctx.settings.transfer.export_file_name));
            let count = transfer::export_file(db, &path).await?;
            writeln!(out, "Exported {count} item(s) to {}", path.display())?;
        }
    }

    info!("Command finished");
    Ok(())
}

fn write_summary<W: Write>(summary: &ImportSummary, out: &mut W) -> Result<()> {
    writeln!(
        out,
        "Imported {} item(s), replaced {}, skipped {} malformed",
        summary.imported, summary.replaced, summary.skipped
    )?;
    Ok(())
}

fn write_view<W: Write>(ctx: &AppContext, view: &LedgerView, out: &mut W) -> Result<()> {
    writeln!(out, "{}", view.title())?;
    if view.rows().is_empty() {
        writeln!(out, "  (no entries)")?;
        return Ok(());
    }

    for (offset, row) in view.rows().iter().enumerate() {
        writeln!(
            out,
            "{offset:>4}  {:>14}  {}  {}",
            row.display_amount(ctx.currency_suffix()),
            row.display_date(),
            row.info
        )?;
    }
    Ok(())
}
