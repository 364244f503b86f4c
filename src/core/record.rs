//! Interchange form of an item - the JSON shape used by export and import.
//!
//! The stored model and the interchange record are plain data; the two functions here
//! convert between them. `createdAt` travels as text through the timestamp codec.

use crate::{
    core::{
        item::{NewItem, generate_item_id},
        timestamp::{format_timestamp, parse_timestamp},
    },
    entities::item,
    errors::Result,
};
use serde::{Deserialize, Serialize};

/// One item as it appears in an exported or imported file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemRecord {
    /// Free-text description
    pub info: String,
    /// Signed amount
    pub amount: i64,
    /// `HH:MM:SS DD.MM.YYYY`
    pub created_at: String,
    /// Missing on hand-written imports; always present on export
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_id: Option<String>,
}

/// Maps a stored item to its interchange record.
#[must_use]
pub fn to_interchange(item: &item::Model) -> ItemRecord {
    ItemRecord {
        info: item.info.clone(),
        amount: item.amount,
        created_at: format_timestamp(&item.created_at),
        item_id: Some(item.item_id.clone()),
    }
}

/// Maps an interchange record to an item ready for storage.
///
/// `info` and `amount` are taken as they are; an empty description or a zero amount is
/// accepted here even though the add flow would refuse it. A missing `itemId` gets a
/// fresh identifier.
///
/// # Errors
/// Propagates timestamp decode errors for `createdAt`.
pub fn from_interchange(record: ItemRecord) -> Result<NewItem> {
    let created_at = parse_timestamp(&record.created_at)?;

    Ok(NewItem {
        item_id: record.item_id.unwrap_or_else(generate_item_id),
        info: record.info,
        amount: record.amount,
        created_at,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::{errors::Error, test_utils::at};

    fn stored(item_id: &str, info: &str, amount: i64) -> item::Model {
        item::Model {
            id: 1,
            item_id: item_id.to_string(),
            info: info.to_string(),
            amount,
            created_at: at(18, 4, 9, 26, 9, 2022),
        }
    }

    #[test]
    fn test_to_interchange_emits_all_fields() {
        let record = to_interchange(&stored("abc", "Lunch", -350));
        assert_eq!(
            record,
            ItemRecord {
                info: "Lunch".to_string(),
                amount: -350,
                created_at: "18:04:09 26.09.2022".to_string(),
                item_id: Some("abc".to_string()),
            }
        );
    }

    #[test]
    fn test_record_json_uses_camel_case_keys() {
        let json = serde_json::to_value(to_interchange(&stored("abc", "Lunch", -350))).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "info": "Lunch",
                "amount": -350,
                "createdAt": "18:04:09 26.09.2022",
                "itemId": "abc",
            })
        );
    }

    #[test]
    fn test_from_interchange_keeps_given_id() {
        let item = from_interchange(ItemRecord {
            info: "Bonus".to_string(),
            amount: 900,
            created_at: "07:00:00 01.10.2022".to_string(),
            item_id: Some("given".to_string()),
        })
        .unwrap();

        assert_eq!(item.item_id, "given");
        assert_eq!(item.info, "Bonus");
        assert_eq!(item.amount, 900);
        assert_eq!(item.created_at, at(7, 0, 0, 1, 10, 2022));
    }

    #[test]
    fn test_from_interchange_generates_missing_id() {
        let record: ItemRecord = serde_json::from_value(serde_json::json!({
            "info": "",
            "amount": 0,
            "createdAt": "07:00:00 01.10.2022",
        }))
        .unwrap();

        let first = from_interchange(record.clone()).unwrap();
        let second = from_interchange(record).unwrap();

        assert!(!first.item_id.is_empty());
        assert_ne!(first.item_id, second.item_id);
        assert_eq!(first.info, "");
        assert_eq!(first.amount, 0);
    }

    #[test]
    fn test_from_interchange_rejects_bad_timestamp() {
        let result = from_interchange(ItemRecord {
            info: "Broken".to_string(),
            amount: 1,
            created_at: "garbage".to_string(),
            item_id: None,
        });
        assert!(matches!(result, Err(Error::MalformedTimestamp { .. })));
    }
}
