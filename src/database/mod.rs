//! Database source support via DuckDB
//!
//! This module provides database connectivity using DuckDB as the query engine.
//! DuckDB can read PostgreSQL, MySQL, SQLite and its own database files; the
//! query results arrive as Arrow batches.

mod engine;

pub use engine::{DatabaseEngine, EngineQuery};
