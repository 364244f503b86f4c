//! Export and import of the whole ledger as a JSON array of interchange records.
//!
//! Import is tolerant: each array element is decoded on its own and a bad element is
//! logged and dropped instead of failing the batch. The surviving items are written with
//! replace-by-id, so importing the same file twice leaves the same collection.

use crate::{
    core::{
        item::{self, NewItem},
        record::{ItemRecord, from_interchange, to_interchange},
    },
    errors::{Error, Result},
};
use sea_orm::DatabaseConnection;
use std::path::Path;
use tracing::{info, warn};

/// File name used when exporting without an explicit destination.
pub const DEFAULT_EXPORT_FILE_NAME: &str = "data.json";

/// Result of decoding an import payload element by element.
#[derive(Debug, Default)]
pub struct DecodedBatch {
    /// Elements that decoded into items
    pub items: Vec<NewItem>,
    /// Elements that were dropped, as [`Error::DecodeFailure`]
    pub rejected: Vec<Error>,
}

/// What an import did to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImportSummary {
    /// Items written
    pub imported: u64,
    /// Previously stored items replaced because they shared an id with the payload
    pub replaced: u64,
    /// Payload elements dropped as malformed
    pub skipped: usize,
}

fn decode_element(value: serde_json::Value) -> Result<NewItem> {
    let record: ItemRecord = serde_json::from_value(value)?;
    from_interchange(record)
}

/// Decodes a JSON array of interchange records, keeping the good elements.
///
/// # Errors
/// Fails only when the payload as a whole is not a JSON array.
pub fn decode_batch(bytes: &[u8]) -> Result<DecodedBatch> {
    let elements: Vec<serde_json::Value> = serde_json::from_slice(bytes)?;

    let batch = elements
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            decode_element(value).map_err(|source| Error::DecodeFailure {
                index,
                source: Box::new(source),
            })
        })
        .fold(DecodedBatch::default(), |mut batch, decoded| {
            match decoded {
                Ok(item) => batch.items.push(item),
                Err(e) => {
                    warn!("Skipping import element: {}", e);
                    batch.rejected.push(e);
                }
            }
            batch
        });

    Ok(batch)
}

/// Imports a JSON payload into the store with replace-by-id.
///
/// A payload with no decodable element leaves the store untouched.
pub async fn import_items(db: &DatabaseConnection, bytes: &[u8]) -> Result<ImportSummary> {
    let DecodedBatch { items, rejected } = decode_batch(bytes)?;
    let skipped = rejected.len();

    if items.is_empty() {
        info!(skipped, "Import payload had nothing to store");
        return Ok(ImportSummary {
            skipped,
            ..ImportSummary::default()
        });
    }

    let outcome = item::replace_items_by_ids(db, items).await?;
    info!(
        imported = outcome.inserted,
        replaced = outcome.removed,
        skipped,
        "Import finished"
    );

    Ok(ImportSummary {
        imported: outcome.inserted,
        replaced: outcome.removed,
        skipped,
    })
}

/// Reads `path` and imports its contents.
pub async fn import_file(db: &DatabaseConnection, path: &Path) -> Result<ImportSummary> {
    info!("Importing items from {}", path.display());
    let bytes = tokio::fs::read(path).await?;
    import_items(db, &bytes).await
}

async fn export_records(db: &DatabaseConnection) -> Result<Vec<ItemRecord>> {
    Ok(item::get_all_items(db)
        .await?
        .iter()
        .map(to_interchange)
        .collect())
}

fn encode_records(records: &[ItemRecord]) -> Result<String> {
    serde_json::to_string_pretty(records).map_err(|e| Error::EncodeFailure {
        message: e.to_string(),
    })
}

/// Serializes the whole collection, newest first, as pretty-printed JSON.
///
/// # Errors
/// [`Error::EncodeFailure`] if serialization fails, or a database error from the read.
pub async fn export_items(db: &DatabaseConnection) -> Result<String> {
    encode_records(&export_records(db).await?)
}

/// Writes the export to `path`, returning the number of items written.
pub async fn export_file(db: &DatabaseConnection, path: &Path) -> Result<usize> {
    let records = export_records(db).await?;
    let json = encode_records(&records)?;

    tokio::fs::write(path, json).await?;
    info!(count = records.len(), "Exported items to {}", path.display());
    Ok(records.len())
}
