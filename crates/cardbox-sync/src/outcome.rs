//! Outcome values returned by [`Engine`](crate::Engine) operations.

use cardbox_core::record::ContactRecord;
use serde::Serialize;
use thiserror::Error;

/// Why an operation declined to touch the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum RejectReason {
  #[error("could not parse a full name from the card summary")]
  UnparseableName,
  #[error("file name is empty")]
  EmptyFileName,
  #[error("file name must not contain a path: {0}")]
  InvalidFileName(String),
  #[error("contact name is empty")]
  EmptyContactName,
  #[error("card service failed: {0}")]
  Service(String),
}

// ─── Per-operation outcomes ──────────────────────────────────────────────────

/// Result of reconciling one scanned card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
  /// A contact row was created for the file.
  Inserted(ContactRecord),
  /// The file already has a contact; nothing was written.
  Skipped,
  Rejected(RejectReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
  /// `file_name` is the name actually used, extension included.
  Created {
    file_name: String,
    contact:   ContactRecord,
  },
  Rejected(RejectReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
  Updated,
  Rejected(RejectReason),
}

/// The fields of one card, ready for display.
///
/// Dates are run through [`cardbox_summary::format_date`]; an absent date is
/// an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CardDetails {
  pub file_name:            String,
  pub full_name:            String,
  pub birthday:             String,
  pub anniversary:          String,
  pub extra_property_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailsOutcome {
  Found(CardDetails),
  Rejected(RejectReason),
}

// ─── Folder scans ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rejection {
  pub file_name: String,
  pub reason:    RejectReason,
}

/// Per-file tally of a folder scan, in scan order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanReport {
  pub inserted: Vec<String>,
  pub skipped:  Vec<String>,
  pub rejected: Vec<Rejection>,
}

impl ScanReport {
  /// Number of files examined.
  pub fn total(&self) -> usize {
    self.inserted.len() + self.skipped.len() + self.rejected.len()
  }
}
