//! # Storage Layer
//!
//! SQLite-backed persistence for the membership system. `db` owns the
//! connection pool and schema; `repositories` hold the per-table row
//! mapping between snake_case columns and the domain models.

pub mod db;
pub mod repositories;

pub use db::DbConnection;
pub use repositories::{PersonRepository, ScoutRepository, UserRepository};
