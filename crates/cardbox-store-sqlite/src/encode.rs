//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Creation timestamps are stored as RFC 3339 strings. File modification
//! times are stored as `YYYY-MM-DD HH:MM:SS` without an offset, matching
//! what the file system reports in local time.

use cardbox_core::record::FileRecord;
use chrono::{DateTime, NaiveDateTime, Utc};

use crate::{Error, Result};

const NAIVE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── NaiveDateTime ───────────────────────────────────────────────────────────

pub fn encode_naive(dt: NaiveDateTime) -> String { dt.format(NAIVE_FORMAT).to_string() }

pub fn decode_naive(s: &str) -> Result<NaiveDateTime> {
  NaiveDateTime::parse_from_str(s, NAIVE_FORMAT)
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Raw row types ───────────────────────────────────────────────────────────

/// A FILE row as read from SQLite, before timestamp decoding.
pub struct RawFile {
  pub file_id:       i64,
  pub file_name:     String,
  pub last_modified: String,
  pub created_at:    String,
}

impl RawFile {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      file_id:       row.get(0)?,
      file_name:     row.get(1)?,
      last_modified: row.get(2)?,
      created_at:    row.get(3)?,
    })
  }

  pub fn into_record(self) -> Result<FileRecord> {
    Ok(FileRecord {
      file_id:       self.file_id,
      file_name:     self.file_name,
      last_modified: decode_naive(&self.last_modified)?,
      created_at:    decode_dt(&self.created_at)?,
    })
  }
}

#[cfg(test)]
mod tests {
  use chrono::{NaiveDate, TimeZone, Timelike};

  use super::*;

  #[test]
  fn naive_roundtrip_drops_subseconds() {
    let dt = NaiveDate::from_ymd_opt(2025, 3, 7)
      .unwrap()
      .and_hms_milli_opt(14, 5, 9, 250)
      .unwrap();
    let encoded = encode_naive(dt);
    assert_eq!(encoded, "2025-03-07 14:05:09");
    assert_eq!(decode_naive(&encoded).unwrap(), dt.with_nanosecond(0).unwrap());
  }

  #[test]
  fn dt_roundtrip() {
    let dt = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
    assert_eq!(decode_dt(&encode_dt(dt)).unwrap(), dt);
  }

  #[test]
  fn bad_timestamps_are_errors() {
    assert!(matches!(decode_naive("yesterday"), Err(Error::DateParse(_))));
    assert!(matches!(decode_dt("2024-13-01"), Err(Error::DateParse(_))));
  }
}
