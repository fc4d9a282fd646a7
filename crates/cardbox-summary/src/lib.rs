//! Summary-text parser and date formatter for cardbox.
//!
//! Turns the human-readable summary a card service prints for one card into
//! a [`ParsedSummary`], and renders raw card dates for display. Pure
//! synchronous; no I/O.
//!
//! # Quick start
//!
//! ```
//! use cardbox_summary::{format_date, parse};
//!
//! let summary = "Full Name:\n- Jane Doe\nBirthday:\n2021-05-01T10:00:00Z\n";
//! let parsed = parse(summary);
//! assert_eq!(parsed.full_name, "Jane Doe");
//! assert_eq!(
//!   format_date(&parsed.birthday),
//!   "Date: 2021-05-01 Time: 10:00:00 (UTC)"
//! );
//! ```

mod date;
mod parse;

use serde::Serialize;

pub use date::{birth_month, format_date};
pub use parse::parse;

/// The fields extracted from one summary.
///
/// Absent or unrecognised fields are empty strings. `birthday` and
/// `anniversary` are carried verbatim, including the `NULL` placeholder;
/// normalisation is the caller's concern.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedSummary {
  pub full_name:            String,
  pub birthday:             String,
  pub anniversary:          String,
  /// Number of properties listed under the optional-properties section.
  pub extra_property_count: usize,
}

impl ParsedSummary {
  /// A summary without a full name cannot back a contact.
  pub fn is_viable(&self) -> bool { !self.full_name.is_empty() }
}
