// storage/mod.rs
// SQLite ledger backend

mod ledger;
pub mod media;
pub mod migrations;
pub mod panel;
pub mod pool;
pub mod state;
pub mod visits;

#[cfg(test)]
pub mod test_helpers;

// Re-export commonly used items
pub use ledger::SqliteLedger;
pub use migrations::run_migrations;
pub use pool::init_db_pool_with_path;
