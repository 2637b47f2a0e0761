//! Durable storage for Signoff records.
//!
//! # Layout
//!
//! ```text
//! records
//! ├── id          INTEGER PRIMARY KEY (assigned on insert)
//! ├── client_id   TEXT (always a directory key)
//! ├── field1..4   TEXT
//! └── approved    INTEGER 0/1
//! ```
//!
//! The store is single-writer: one connection, opened at startup and owned
//! by [`RecordStore`] for the life of the process.

mod fs_guard;
mod record_store;

pub use record_store::{RecordStore, StoreError};
