/// Store connection and schema management
pub mod database;

/// Settings loading from purse.toml
pub mod settings;
