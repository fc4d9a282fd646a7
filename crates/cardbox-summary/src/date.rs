//! Display formatting and month extraction for raw card dates.
//!
//! Card dates arrive as the service prints them: `19900101`, `2021-05-01`,
//! `19900101T101010Z`, `--0203`, or free text such as `circa 1800`.

use chrono::{Datelike, NaiveDate};

const DATE_TIME_DELIMITER: char = 'T';
const UTC_MARKER: char = 'Z';

/// Render a combined date-time token as `Date: … Time: …`.
///
/// A trailing `Z` is stripped and replaced by a ` (UTC)` tag. Input without
/// the `T` delimiter, or that does not split into exactly two parts, is
/// returned unchanged; this covers empty strings, the `NULL` placeholder and
/// text dates.
pub fn format_date(raw: &str) -> String {
  if !raw.contains(DATE_TIME_DELIMITER) {
    return raw.to_string();
  }

  let (trimmed, utc) = match raw.strip_suffix(UTC_MARKER) {
    Some(rest) => (rest, true),
    None => (raw, false),
  };

  let mut parts = trimmed.split(DATE_TIME_DELIMITER);
  let (Some(date), Some(time), None) = (parts.next(), parts.next(), parts.next())
  else {
    return raw.to_string();
  };

  if utc {
    format!("Date: {date} Time: {time} (UTC)")
  } else {
    format!("Date: {date} Time: {time}")
  }
}

/// The month of a stored birthday, if it has one.
///
/// Accepts `YYYYMMDD`, `YYYY-MM-DD` and the year-omitted `--MMDD` /
/// `--MM-DD`, each optionally followed by a `T…` time part. Text dates and
/// anything unparseable yield `None`.
pub fn birth_month(raw: &str) -> Option<u32> {
  let date = raw
    .trim()
    .split(DATE_TIME_DELIMITER)
    .next()
    .unwrap_or_default();

  if let Some(rest) = date.strip_prefix("--") {
    let month: u32 = rest.get(..2)?.parse().ok()?;
    return (1..=12).contains(&month).then_some(month);
  }

  NaiveDate::parse_from_str(date, "%Y-%m-%d")
    .or_else(|_| NaiveDate::parse_from_str(date, "%Y%m%d"))
    .ok()
    .map(|d| d.month())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn utc_token_gets_tag() {
    let out = format_date("2021-05-01T10:00:00Z");
    assert_eq!(out, "Date: 2021-05-01 Time: 10:00:00 (UTC)");
    assert!(out.ends_with("(UTC)"));
    assert!(!out.contains('Z'));
  }

  #[test]
  fn local_token_has_no_tag() {
    assert_eq!(
      format_date("19960415T231000"),
      "Date: 19960415 Time: 231000"
    );
  }

  #[test]
  fn basic_format_utc_token() {
    assert_eq!(
      format_date("19540203T123000Z"),
      "Date: 19540203 Time: 123000 (UTC)"
    );
  }

  #[test]
  fn inputs_without_delimiter_pass_through() {
    for raw in ["", "NULL", "19900101", "--0203", "circa 1800", "Z"] {
      assert_eq!(format_date(raw), raw);
      assert_eq!(format_date(&format_date(raw)), raw);
    }
  }

  #[test]
  fn more_than_two_parts_pass_through() {
    assert_eq!(format_date("2021T10T00"), "2021T10T00");
    assert_eq!(format_date("TTZ"), "TTZ");
  }

  #[test]
  fn time_only_token_splits_into_empty_date() {
    assert_eq!(format_date("T102200Z"), "Date:  Time: 102200 (UTC)");
  }

  #[test]
  fn month_from_common_layouts() {
    assert_eq!(birth_month("19900615"), Some(6));
    assert_eq!(birth_month("1990-06-15"), Some(6));
    assert_eq!(birth_month("19900615T101010Z"), Some(6));
    assert_eq!(birth_month("--0615"), Some(6));
    assert_eq!(birth_month("--06-15"), Some(6));
  }

  #[test]
  fn month_absent_for_text_and_garbage() {
    assert_eq!(birth_month("circa 1800"), None);
    assert_eq!(birth_month(""), None);
    assert_eq!(birth_month("--1315"), None);
    assert_eq!(birth_month("19901315"), None);
  }
}
