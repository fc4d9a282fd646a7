//! Persisted records and the small domain rules attached to them.
//!
//! A [`FileRecord`] mirrors one card file on disk; a [`ContactRecord`] holds
//! the fields extracted from that file. Both are written only by the
//! reconciliation engine.

use std::path::Path;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ─── Card file names ─────────────────────────────────────────────────────────

/// File extensions recognised as card files, lowercase and without the dot.
pub const CARD_EXTENSIONS: [&str; 2] = ["vcf", "vcard"];

/// The extension appended to new card file names that lack one.
pub const DEFAULT_EXTENSION: &str = "vcf";

/// Returns `true` if `path` ends in one of [`CARD_EXTENSIONS`]
/// (case-insensitive).
pub fn has_card_extension(path: impl AsRef<Path>) -> bool {
  path
    .as_ref()
    .extension()
    .and_then(|e| e.to_str())
    .is_some_and(|e| CARD_EXTENSIONS.iter().any(|c| e.eq_ignore_ascii_case(c)))
}

/// Append [`DEFAULT_EXTENSION`] to `name` unless it already carries a card
/// extension.
pub fn with_card_extension(name: &str) -> String {
  if has_card_extension(name) {
    name.to_string()
  } else {
    format!("{name}.{DEFAULT_EXTENSION}")
  }
}

// ─── Date fields ─────────────────────────────────────────────────────────────

/// Placeholder the card service prints for an absent date.
pub const NULL_PLACEHOLDER: &str = "NULL";

/// Reduce a raw birthday/anniversary string to its stored form.
///
/// Empty strings and the `NULL` placeholder (any case) become `None`.
pub fn normalize_date_field(raw: &str) -> Option<String> {
  let trimmed = raw.trim();
  if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(NULL_PLACEHOLDER) {
    None
  } else {
    Some(trimmed.to_string())
  }
}

/// A calendar month, 1 through 12.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct BirthMonth(u32);

impl BirthMonth {
  pub fn get(self) -> u32 { self.0 }
}

impl TryFrom<u32> for BirthMonth {
  type Error = Error;

  fn try_from(month: u32) -> Result<Self> {
    if (1..=12).contains(&month) {
      Ok(Self(month))
    } else {
      Err(Error::InvalidMonth(month))
    }
  }
}

impl From<BirthMonth> for u32 {
  fn from(month: BirthMonth) -> Self { month.0 }
}

// ─── Records ─────────────────────────────────────────────────────────────────

/// One row of the FILE table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
  pub file_id:       i64,
  /// Unique within the store.
  pub file_name:     String,
  /// Modification time of the file on disk when it was first recorded.
  pub last_modified: NaiveDateTime,
  /// Set once, when the row is inserted.
  pub created_at:    DateTime<Utc>,
}

/// One row of the CONTACT table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRecord {
  pub contact_id:  i64,
  pub name:        String,
  pub birthday:    Option<String>,
  pub anniversary: Option<String>,
  pub file_id:     i64,
}

/// Input for inserting or updating a [`ContactRecord`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContact {
  pub file_id:     i64,
  pub name:        String,
  pub birthday:    Option<String>,
  pub anniversary: Option<String>,
}

impl NewContact {
  /// Build a contact for `file_id`, normalising both date fields.
  pub fn new(file_id: i64, name: &str, birthday: &str, anniversary: &str) -> Self {
    Self {
      file_id,
      name: name.trim().to_string(),
      birthday: normalize_date_field(birthday),
      anniversary: normalize_date_field(anniversary),
    }
  }
}

/// A contact joined with the name of the file it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactListing {
  pub name:        String,
  pub birthday:    Option<String>,
  pub anniversary: Option<String>,
  pub file_name:   String,
}
