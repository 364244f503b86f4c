//! Core ledger logic - framework-agnostic item storage, interchange and view operations.

/// Store operations over ledger items
pub mod item;
/// Expenses and incomes tab logic
pub mod ledger;
/// Interchange record and its conversions
pub mod record;
/// `HH:MM:SS DD.MM.YYYY` codec
pub mod timestamp;
/// JSON export and tolerant import
pub mod transfer;
