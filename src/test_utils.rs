//! Shared test utilities for Purse.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test items with sensible defaults.

use crate::{
    core::item::{self, NewItem},
    entities,
    errors::Result,
};
use chrono::{NaiveDate, NaiveDateTime};
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Builds a wall-clock timestamp from its six components.
///
/// # Panics
/// On components that do not form a valid date; tests only pass literals.
#[allow(clippy::expect_used)]
pub fn at(hour: u32, minute: u32, second: u32, day: u32, month: u32, year: i32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, minute, second))
        .expect("test timestamp must be valid")
}

/// Stores an item with a generated id.
pub async fn create_test_item(
    db: &DatabaseConnection,
    info: &str,
    amount: i64,
    created_at: NaiveDateTime,
) -> Result<entities::item::Model> {
    item::add_item(db, NewItem::new(info.to_string(), amount, created_at)).await
}

/// Stores an item with a chosen id.
pub async fn create_item_with_id(
    db: &DatabaseConnection,
    item_id: &str,
    info: &str,
    amount: i64,
    created_at: NaiveDateTime,
) -> Result<entities::item::Model> {
    item::add_item(
        db,
        NewItem {
            item_id: item_id.to_string(),
            info: info.to_string(),
            amount,
            created_at,
        },
    )
    .await
}

/// Drops the store-internal row keys so collections can be compared by content.
pub fn strip_row_keys(
    items: Vec<entities::item::Model>,
) -> Vec<(String, String, i64, NaiveDateTime)> {
    items
        .into_iter()
        .map(|item| (item.item_id, item.info, item.amount, item.created_at))
        .collect()
}
