pub mod accounts;
mod repository;
pub mod transactions;

pub use repository::*;

/// SQL migration for the initial schema
pub const MIGRATION_001_INITIAL: &str = include_str!("migrations/001_initial.sql");
