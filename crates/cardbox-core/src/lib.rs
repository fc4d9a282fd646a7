//! Core types and trait definitions for cardbox.
//!
//! This crate is deliberately free of database and file-format dependencies.
//! The reconciliation engine, the SQLite backend and the vCard file service
//! all depend on it; it depends on nothing of theirs.

pub mod error;
pub mod record;
pub mod service;
pub mod store;

pub use error::{Error, Result};
