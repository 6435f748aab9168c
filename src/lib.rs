//! User Registry Library
//!
//! A small HTTP service for CRUD over user records kept in a single JSON file.
//! The binary (`main.rs`) wires the modules below together.
//!
//! ## Modules
//! - **`config`**: Command-line configuration (bind address, data file, request deadline).
//! - **`storage`**: The record store. Owns the on-disk format, mints ids and runs every
//!   operation as one locked read-modify-write cycle over the whole file.
//! - **`api`**: Axum routes, request validation and error-to-status mapping.

pub mod api;
pub mod config;
pub mod storage;
