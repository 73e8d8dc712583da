//! Shared test utilities for the Quill workspace
//!
//! This crate provides an in-memory mock of the storage layer for testing
//! batched fetch behavior without a database. The mock records every fetch
//! it serves (which keys, which fields) so tests can assert on batching,
//! deduplication, and projection behavior.
//!
//! # Example
//!
//! ```rust
//! use quill_test_utils::MockTable;
//!
//! let table: MockTable<i64, &'static str> = MockTable::new();
//! table.insert(1, "row one");
//!
//! let rows = table.fetch(&[1, 2], ["name"]).unwrap();
//! assert_eq!(rows.get(&1), Some(&"row one"));
//! assert!(!rows.contains_key(&2));
//! assert_eq!(table.fetch_count(), 1);
//! ```

mod table;

pub use table::{FetchCall, MockTable};
