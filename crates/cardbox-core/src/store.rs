//! The `CardStore` trait.
//!
//! Implemented by storage backends (e.g. `cardbox-store-sqlite`). The
//! reconciliation engine depends on this abstraction, not on any concrete
//! backend.

use std::future::Future;

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::record::{ContactListing, ContactRecord, FileRecord, NewContact};

/// Abstraction over the relational store holding FILE and CONTACT rows.
///
/// Every method is an independent unit of work; callers that need a
/// read-then-write sequence to be atomic must serialise it themselves.
///
/// All methods return `Send` futures so the trait can be used from a
/// multi-threaded tokio runtime.
pub trait CardStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Files ─────────────────────────────────────────────────────────────

  /// Look up a file record by its unique name.
  fn find_file_by_name<'a>(
    &'a self,
    file_name: &'a str,
  ) -> impl Future<Output = Result<Option<FileRecord>, Self::Error>> + Send + 'a;

  /// Insert a new file record and return it with its assigned id.
  ///
  /// Fails if a record with the same name already exists.
  fn insert_file<'a>(
    &'a self,
    file_name: &'a str,
    last_modified: NaiveDateTime,
    created_at: DateTime<Utc>,
  ) -> impl Future<Output = Result<FileRecord, Self::Error>> + Send + 'a;

  // ── Contacts ──────────────────────────────────────────────────────────

  /// Look up the contact belonging to `file_id`, if any.
  fn find_contact_by_file_id(
    &self,
    file_id: i64,
  ) -> impl Future<Output = Result<Option<ContactRecord>, Self::Error>> + Send + '_;

  /// Insert a contact row. Fails if `file_id` already owns a contact.
  fn insert_contact(
    &self,
    input: NewContact,
  ) -> impl Future<Output = Result<ContactRecord, Self::Error>> + Send + '_;

  /// Overwrite the name and dates of the contact owned by `input.file_id`.
  ///
  /// Returns `false` if no such contact exists.
  fn update_contact(
    &self,
    input: NewContact,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// All contacts joined with their file names, ordered by contact name.
  fn list_contacts(
    &self,
  ) -> impl Future<Output = Result<Vec<ContactListing>, Self::Error>> + Send + '_;
}
