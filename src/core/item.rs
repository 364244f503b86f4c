//! Item store - CRUD, sign-filtered queries and aggregation over the ledger items.
//!
//! Every mutation runs inside a single write transaction. A transaction that is dropped
//! without being committed rolls back, so an error on any path leaves the store as it
//! was. Write-side failures are reported as [`Error::WriteFailure`]; read-side failures
//! as [`Error::Database`].

use crate::{
    entities::{Item, item},
    errors::{Error, Result},
};
use chrono::NaiveDateTime;
use sea_orm::{ConnectionTrait, QueryOrder, QuerySelect, Set, TransactionTrait, prelude::*};
use std::collections::BTreeSet;
use tracing::{debug, info, instrument};
use uuid::Uuid;

/// Which half of the ledger a list shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    /// Items with a negative amount
    Expenses,
    /// Items with a positive amount
    Incomes,
}

/// An item that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    /// Stable identifier
    pub item_id: String,
    /// Free-text description
    pub info: String,
    /// Signed amount
    pub amount: i64,
    /// Creation time
    pub created_at: NaiveDateTime,
}

impl NewItem {
    /// Builds an item with a freshly generated identifier.
    #[must_use]
    pub fn new(info: String, amount: i64, created_at: NaiveDateTime) -> Self {
        Self {
            item_id: generate_item_id(),
            info,
            amount,
            created_at,
        }
    }

    fn into_active_model(self) -> item::ActiveModel {
        item::ActiveModel {
            item_id: Set(self.item_id),
            info: Set(self.info),
            amount: Set(self.amount),
            created_at: Set(self.created_at),
            ..Default::default()
        }
    }
}

/// Rows written per statement. Keeps bulk writes under `SQLite`'s bound-variable limit.
const WRITE_CHUNK_SIZE: usize = 200;

/// Random identifier for a new item.
#[must_use]
pub fn generate_item_id() -> String {
    Uuid::new_v4().to_string()
}

/// Inserts one item in its own write transaction.
#[instrument(skip(db, new_item), fields(item_id = %new_item.item_id))]
pub async fn add_item(db: &DatabaseConnection, new_item: NewItem) -> Result<item::Model> {
    let txn = db.begin().await.map_err(Error::WriteFailure)?;

    let stored = new_item
        .into_active_model()
        .insert(&txn)
        .await
        .map_err(Error::WriteFailure)?;

    txn.commit().await.map_err(Error::WriteFailure)?;

    debug!(amount = stored.amount, "Item added");
    Ok(stored)
}

/// Removes every item whose `item_id` is in `ids`. Unknown ids are ignored.
///
/// Returns the number of rows removed.
#[instrument(skip(db, ids), fields(requested = ids.len()))]
pub async fn delete_items_by_ids(db: &DatabaseConnection, ids: &BTreeSet<String>) -> Result<u64> {
    if ids.is_empty() {
        return Ok(0);
    }

    let ids: Vec<String> = ids.iter().cloned().collect();
    let txn = db.begin().await.map_err(Error::WriteFailure)?;
    let removed = delete_in_chunks(&txn, &ids).await?;
    txn.commit().await.map_err(Error::WriteFailure)?;

    info!(removed, "Deleted items by id");
    Ok(removed)
}

async fn delete_in_chunks<C: ConnectionTrait>(conn: &C, ids: &[String]) -> Result<u64> {
    let mut removed = 0;
    for chunk in ids.chunks(WRITE_CHUNK_SIZE) {
        removed += Item::delete_many()
            .filter(item::Column::ItemId.is_in(chunk.iter().cloned()))
            .exec(conn)
            .await
            .map_err(Error::WriteFailure)?
            .rows_affected;
    }
    Ok(removed)
}

/// Outcome of a replace-by-id write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReplaceOutcome {
    /// Stored rows removed because an incoming item shared their id
    pub removed: u64,
    /// Incoming items inserted
    pub inserted: u64,
}

/// Replaces stored items by identifier: rows sharing an id with `items` are deleted, then
/// all of `items` are inserted, in one write transaction.
///
/// This is a whole-record upsert, never a field merge. An empty batch touches nothing.
/// Large batches are written in several statements; a failure in any of them rolls the
/// whole batch back, including the deletes.
#[instrument(skip(db, items), fields(incoming = items.len()))]
pub async fn replace_items_by_ids(
    db: &DatabaseConnection,
    items: Vec<NewItem>,
) -> Result<ReplaceOutcome> {
    if items.is_empty() {
        return Ok(ReplaceOutcome::default());
    }

    let ids: BTreeSet<String> = items.iter().map(|item| item.item_id.clone()).collect();
    let ids: Vec<String> = ids.into_iter().collect();
    let inserted = items.len() as u64;

    let txn = db.begin().await.map_err(Error::WriteFailure)?;

    let removed = delete_in_chunks(&txn, &ids).await?;

    let mut pending = items
        .into_iter()
        .map(NewItem::into_active_model)
        .peekable();
    while pending.peek().is_some() {
        Item::insert_many(pending.by_ref().take(WRITE_CHUNK_SIZE))
            .exec(&txn)
            .await
            .map_err(Error::WriteFailure)?;
    }

    txn.commit().await.map_err(Error::WriteFailure)?;

    info!(removed, inserted, "Replaced items by id");
    Ok(ReplaceOutcome { removed, inserted })
}

/// Retrieves one side of the ledger, newest first.
///
/// Items created in the same second keep their insertion order, latest first.
pub async fn get_items(db: &DatabaseConnection, sign: Sign) -> Result<Vec<item::Model>> {
    let condition = match sign {
        Sign::Expenses => item::Column::Amount.lt(0),
        Sign::Incomes => item::Column::Amount.gt(0),
    };

    Item::find()
        .filter(condition)
        .order_by_desc(item::Column::CreatedAt)
        .order_by_desc(item::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves every item, newest first.
pub async fn get_all_items(db: &DatabaseConnection) -> Result<Vec<item::Model>> {
    Item::find()
        .order_by_desc(item::Column::CreatedAt)
        .order_by_desc(item::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds the first item carrying `item_id`, if any.
pub async fn get_item_by_item_id(
    db: &DatabaseConnection,
    item_id: &str,
) -> Result<Option<item::Model>> {
    Item::find()
        .filter(item::Column::ItemId.eq(item_id))
        .order_by_asc(item::Column::Id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Sum of every amount in the store, incomes and expenses together. Zero when empty.
pub async fn sum_amounts(db: &DatabaseConnection) -> Result<i64> {
    let total: Option<Option<i64>> = Item::find()
        .select_only()
        .column_as(item::Column::Amount.sum(), "total")
        .into_tuple()
        .one(db)
        .await?;

    Ok(total.flatten().unwrap_or(0))
}
