//! Entity module - SeaORM entity definitions for the ledger store.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod item;

pub use item::Entity as Item;
