//! Ledger view logic - the display list behind the expenses and incomes tabs.
//!
//! A [`LedgerView`] keeps the rows of one tab in memory, newest first. Adding and
//! deleting patch the local list after the store write succeeds; anything else reloads
//! the list from the store. A failed write leaves the local rows as they were.

use crate::{
    core::{
        item::{self, NewItem, Sign},
        timestamp,
        transfer::{self, ImportSummary},
    },
    entities::item::Model,
    errors::{Error, Result},
};
use chrono::NaiveDateTime;
use sea_orm::DatabaseConnection;
use std::{collections::BTreeSet, path::Path};
use tracing::{debug, info};

/// One line of a ledger tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryRow {
    /// Identifier of the underlying item
    pub item_id: String,
    /// Description
    pub info: String,
    /// Signed amount
    pub amount: i64,
    /// Creation time
    pub created_at: NaiveDateTime,
}

impl EntryRow {
    /// Amount followed by the currency suffix, e.g. `-250 ₽`.
    #[must_use]
    pub fn display_amount(&self, currency_suffix: &str) -> String {
        if currency_suffix.is_empty() {
            self.amount.to_string()
        } else {
            format!("{} {currency_suffix}", self.amount)
        }
    }

    /// Creation time as `HH:MM:SS DD Month YYYY`.
    #[must_use]
    pub fn display_date(&self) -> String {
        self.created_at.format("%H:%M:%S %d %B %Y").to_string()
    }
}

impl From<Model> for EntryRow {
    fn from(model: Model) -> Self {
        Self {
            item_id: model.item_id,
            info: model.info,
            amount: model.amount,
            created_at: model.created_at,
        }
    }
}

/// In-memory list for one side of the ledger.
#[derive(Debug, Clone)]
pub struct LedgerView {
    sign: Sign,
    rows: Vec<EntryRow>,
}

impl LedgerView {
    /// Creates an empty view; call [`LedgerView::reload`] to fill it.
    #[must_use]
    pub const fn new(sign: Sign) -> Self {
        Self {
            sign,
            rows: Vec::new(),
        }
    }

    /// Creates a view already filled from the store.
    pub async fn load(db: &DatabaseConnection, sign: Sign) -> Result<Self> {
        let mut view = Self::new(sign);
        view.reload(db).await?;
        Ok(view)
    }

    /// Tab title.
    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self.sign {
            Sign::Expenses => "Expenses",
            Sign::Incomes => "Incomes",
        }
    }

    /// Current rows, newest first.
    #[must_use]
    pub fn rows(&self) -> &[EntryRow] {
        &self.rows
    }

    /// Recomputes every row from the store.
    pub async fn reload(&mut self, db: &DatabaseConnection) -> Result<()> {
        let rows = item::get_items(db, self.sign).await?;
        self.rows = rows.into_iter().map(EntryRow::from).collect();
        debug!(count = self.rows.len(), tab = self.title(), "Ledger view reloaded");
        Ok(())
    }

    /// Records a new entry from raw user input.
    ///
    /// Both inputs are trimmed. The amount must be an integer and the description must be
    /// non-empty. The sign of the typed amount is ignored: the tab decides it. Zero is
    /// accepted.
    ///
    /// # Errors
    /// [`Error::InvalidEntry`] for rejected input, [`Error::WriteFailure`] if the store
    /// write fails. In both cases the rows are left unchanged.
    pub async fn add_entry(
        &mut self,
        db: &DatabaseConnection,
        amount_text: &str,
        info_text: &str,
    ) -> Result<EntryRow> {
        let amount = self.signed_amount(amount_text)?;
        let info = info_text.trim();
        if info.is_empty() {
            return Err(Error::InvalidEntry {
                message: "Description cannot be empty".to_string(),
            });
        }

        let new_item = NewItem::new(info.to_string(), amount, timestamp::now());
        let stored = item::add_item(db, new_item).await?;
        let row = EntryRow::from(stored);
        self.rows.insert(0, row.clone());

        info!(amount, tab = self.title(), "Entry added");
        Ok(row)
    }

    fn signed_amount(&self, amount_text: &str) -> Result<i64> {
        let trimmed = amount_text.trim();
        let amount: i64 = trimmed.parse().map_err(|_| Error::InvalidEntry {
            message: format!("'{trimmed}' is not a whole number"),
        })?;
        let magnitude = amount.checked_abs().ok_or_else(|| Error::InvalidEntry {
            message: format!("{amount} is out of range"),
        })?;

        Ok(match self.sign {
            Sign::Expenses => -magnitude,
            Sign::Incomes => magnitude,
        })
    }

    /// Deletes the rows at `offsets`. Offsets past the end are ignored.
    ///
    /// Returns the number of stored items removed.
    pub async fn delete_at(&mut self, db: &DatabaseConnection, offsets: &[usize]) -> Result<u64> {
        let ids: BTreeSet<String> = offsets
            .iter()
            .filter_map(|&offset| self.rows.get(offset))
            .map(|row| row.item_id.clone())
            .collect();

        let removed = item::delete_items_by_ids(db, &ids).await?;
        self.rows.retain(|row| !ids.contains(&row.item_id));

        info!(removed, tab = self.title(), "Entries deleted");
        Ok(removed)
    }

    /// Imports a file and reloads the rows if anything was written.
    pub async fn import_file(
        &mut self,
        db: &DatabaseConnection,
        path: &Path,
    ) -> Result<ImportSummary> {
        let summary = transfer::import_file(db, path).await?;
        if summary.imported > 0 {
            self.reload(db).await?;
        }
        Ok(summary)
    }
}

/// Combined total of every entry, incomes minus expenses.
pub async fn total(db: &DatabaseConnection) -> Result<i64> {
    item::sum_amounts(db).await
}
