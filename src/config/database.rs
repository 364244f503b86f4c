//! Database configuration module for Purse.
//!
//! This module handles the `SQLite` connection and table creation using `SeaORM`. The
//! schema is generated from the entity definitions with
//! `Schema::create_table_from_entity`, so the table always matches the Rust model. The
//! connection is opened once at startup, passed explicitly to every operation and
//! closed at shutdown.

use crate::entities::Item;
use crate::errors::{Error, Result};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};
use std::path::Path;
use tracing::{debug, info};

/// Store used when neither the environment nor the settings file names one.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/purse.sqlite?mode=rwc";

/// Resolves the database URL.
///
/// `DATABASE_URL` in the environment wins, then the settings file value, then
/// [`DEFAULT_DATABASE_URL`].
pub fn get_database_url(configured: Option<&str>) -> Result<String> {
    match std::env::var("DATABASE_URL") {
        Ok(url) => Ok(url),
        Err(std::env::VarError::NotPresent) => Ok(configured
            .unwrap_or(DEFAULT_DATABASE_URL)
            .to_string()),
        Err(e) => Err(Error::EnvVar(e)),
    }
}

/// Path of the database file behind a `sqlite://` URL, if it names one.
fn sqlite_file_path(database_url: &str) -> Option<&Path> {
    let rest = database_url.strip_prefix("sqlite://")?;
    let path = rest.split('?').next().unwrap_or(rest);
    if path.is_empty() || path.contains(":memory:") {
        return None;
    }
    Some(Path::new(path))
}

/// Opens the store and makes sure its table exists.
///
/// For a file-backed `SQLite` URL the parent directory is created first.
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    if let Some(parent) = sqlite_file_path(database_url)
        .and_then(Path::parent)
        .filter(|parent| !parent.as_os_str().is_empty())
    {
        std::fs::create_dir_all(parent)?;
    }

    debug!("Connecting to {}", database_url);
    let db = Database::connect(database_url).await?;
    create_tables(&db).await?;
    info!("Store ready");
    Ok(db)
}

/// Creates the items table from the entity definition if it is missing.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut item_table = schema.create_table_from_entity(Item);
    item_table.if_not_exists();

    db.execute(builder.build(&item_table)).await?;

    Ok(())
}

/// Closes the store at shutdown.
pub async fn close_connection(db: DatabaseConnection) -> Result<()> {
    db.close().await?;
    debug!("Store closed");
    Ok(())
}
