//! Item entity - One signed money entry in the ledger.
//!
//! Positive amounts are incomes, negative amounts are expenses. `item_id` is the
//! client-generated identifier used by deletion and by replace-on-import; it is not
//! a unique constraint because an import batch may legitimately repeat it.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Item database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "items")]
pub struct Model {
    /// Store-internal row key, also the tie-breaker for equal timestamps
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Stable identifier shared with exported files
    pub item_id: String,
    /// Free-text description
    pub info: String,
    /// Signed amount (positive for income, negative for expense)
    pub amount: i64,
    /// Local wall-clock creation time, whole seconds
    pub created_at: DateTime,
}

/// Items stand alone
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
