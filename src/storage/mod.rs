//! User Storage Module
//!
//! Durable CRUD over the user record set, persisted as one JSON file.
//!
//! ## Core Concepts
//! - **Record Set**: every user keyed by an opaque string id, plus the `increment`
//!   counter that mints new ids. Ids are never reused, even after a delete.
//! - **Read-Modify-Write**: each operation reads the whole file, applies one change
//!   in memory and writes the whole file back (temp file + rename).
//! - **Serialization**: a single mutex per store covers the entire cycle, including
//!   the lazy creation of a missing file.
//! - **Errors**: `NotFound` and `StorageUnavailable` are kept apart so the HTTP layer
//!   can map them to different status classes.

pub mod error;
pub mod json_file;
pub mod store;
pub mod types;
