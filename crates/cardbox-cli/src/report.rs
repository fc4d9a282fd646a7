//! Plain-text rendering for command output.

use std::fmt::Write as _;

use cardbox_core::record::ContactListing;
use cardbox_sync::{CardDetails, ScanReport};

const NAME_WIDTH: usize = 12;
const DATE_WIDTH: usize = 20;
const MISSING: &str = "N/A";

/// Cut `s` to `width` characters, marking the cut with `...`.
fn fit(s: &str, width: usize) -> String {
  if s.chars().count() <= width {
    s.to_string()
  } else {
    let kept: String = s.chars().take(width - 1).collect();
    format!("{kept}...")
  }
}

fn or_missing(value: Option<&str>) -> &str { value.unwrap_or(MISSING) }

/// The "all contacts" table.
pub fn contact_table(rows: &[ContactListing]) -> String {
  let mut out = String::new();
  let _ = writeln!(
    out,
    "{:<NAME_WIDTH$} | {:<DATE_WIDTH$} | {:<DATE_WIDTH$} | File",
    "Name", "Birthday", "Anniversary"
  );
  let _ = writeln!(
    out,
    "{}-|-{}-|-{}-|-{}",
    "-".repeat(NAME_WIDTH),
    "-".repeat(DATE_WIDTH),
    "-".repeat(DATE_WIDTH),
    "-".repeat(16)
  );
  for row in rows {
    let _ = writeln!(
      out,
      "{:<NAME_WIDTH$} | {:<DATE_WIDTH$} | {:<DATE_WIDTH$} | {}",
      fit(&row.name, NAME_WIDTH),
      fit(or_missing(row.birthday.as_deref()), DATE_WIDTH),
      fit(or_missing(row.anniversary.as_deref()), DATE_WIDTH),
      row.file_name,
    );
  }
  out
}

/// The "born in month" table: names and birthdays only.
pub fn birthday_table(rows: &[ContactListing]) -> String {
  let mut out = String::new();
  let _ = writeln!(out, "{:<NAME_WIDTH$} | Birthday", "Name");
  let _ = writeln!(out, "{}-|-{}", "-".repeat(NAME_WIDTH), "-".repeat(DATE_WIDTH));
  for row in rows {
    let _ = writeln!(
      out,
      "{:<NAME_WIDTH$} | {}",
      fit(&row.name, NAME_WIDTH),
      or_missing(row.birthday.as_deref())
    );
  }
  out
}

pub fn card_details(details: &CardDetails) -> String {
  format!(
    "File:        {}\nName:        {}\nBirthday:    {}\nAnniversary: {}\nOther properties: {}\n",
    details.file_name,
    details.full_name,
    details.birthday,
    details.anniversary,
    details.extra_property_count,
  )
}

pub fn scan_summary(report: &ScanReport) -> String {
  let mut out = format!(
    "Scanned {} card(s): {} inserted, {} already recorded, {} rejected\n",
    report.total(),
    report.inserted.len(),
    report.skipped.len(),
    report.rejected.len(),
  );
  for rejection in &report.rejected {
    let _ = writeln!(out, "  {}: {}", rejection.file_name, rejection.reason);
  }
  out
}
