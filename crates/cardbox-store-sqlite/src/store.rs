//! [`SqliteStore`]: the SQLite implementation of [`CardStore`].

use std::path::Path;

use cardbox_core::{
  record::{ContactListing, ContactRecord, FileRecord, NewContact},
  store::CardStore,
};
use chrono::{DateTime, NaiveDateTime, Utc};
use rusqlite::OptionalExtension as _;
use tracing::debug;

use crate::{
  Result,
  encode::{RawFile, encode_dt, encode_naive},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A cardbox store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted. The
/// connection closes when the last clone is dropped, or explicitly through
/// [`SqliteStore::close`].
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    debug!(path = %path.as_ref().display(), "opening store");
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Close the underlying connection, flushing any pending work.
  pub async fn close(self) -> Result<()> {
    self.conn.close().await?;
    Ok(())
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── CardStore impl ──────────────────────────────────────────────────────────

impl CardStore for SqliteStore {
  type Error = crate::Error;

  // ── Files ─────────────────────────────────────────────────────────────────

  async fn find_file_by_name(&self, file_name: &str) -> Result<Option<FileRecord>> {
    let name = file_name.to_string();

    let raw: Option<RawFile> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT file_id, file_name, last_modified, created_at
             FROM FILE WHERE file_name = ?1",
            rusqlite::params![name],
            RawFile::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawFile::into_record).transpose()
  }

  async fn insert_file(
    &self,
    file_name:     &str,
    last_modified: NaiveDateTime,
    created_at:    DateTime<Utc>,
  ) -> Result<FileRecord> {
    let name = file_name.to_string();
    let modified_str = encode_naive(last_modified);
    let created_str = encode_dt(created_at);

    let file_id: i64 = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO FILE (file_name, last_modified, created_at) VALUES (?1, ?2, ?3)",
          rusqlite::params![name, modified_str, created_str],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    // Read back so the stored precision is what the caller sees.
    let raw: RawFile = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "SELECT file_id, file_name, last_modified, created_at
           FROM FILE WHERE file_id = ?1",
          rusqlite::params![file_id],
          RawFile::from_row,
        )?)
      })
      .await?;

    raw.into_record()
  }

  // ── Contacts ──────────────────────────────────────────────────────────────

  async fn find_contact_by_file_id(&self, file_id: i64) -> Result<Option<ContactRecord>> {
    let contact = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT contact_id, name, birthday, anniversary, file_id
             FROM CONTACT WHERE file_id = ?1",
            rusqlite::params![file_id],
            |row| {
              Ok(ContactRecord {
                contact_id:  row.get(0)?,
                name:        row.get(1)?,
                birthday:    row.get(2)?,
                anniversary: row.get(3)?,
                file_id:     row.get(4)?,
              })
            },
          )
          .optional()?)
      })
      .await?;

    Ok(contact)
  }

  async fn insert_contact(&self, input: NewContact) -> Result<ContactRecord> {
    let NewContact { file_id, name, birthday, anniversary } = input;

    let contact = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO CONTACT (name, birthday, anniversary, file_id)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![name, birthday, anniversary, file_id],
        )?;
        Ok(ContactRecord {
          contact_id: conn.last_insert_rowid(),
          name,
          birthday,
          anniversary,
          file_id,
        })
      })
      .await?;

    Ok(contact)
  }

  async fn update_contact(&self, input: NewContact) -> Result<bool> {
    let NewContact { file_id, name, birthday, anniversary } = input;

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE CONTACT SET name = ?1, birthday = ?2, anniversary = ?3
           WHERE file_id = ?4",
          rusqlite::params![name, birthday, anniversary, file_id],
        )?)
      })
      .await?;

    Ok(changed > 0)
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn list_contacts(&self) -> Result<Vec<ContactListing>> {
    let rows = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT c.name, c.birthday, c.anniversary, f.file_name
           FROM CONTACT c JOIN FILE f ON c.file_id = f.file_id
           ORDER BY c.name, f.file_name",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(ContactListing {
              name:        row.get(0)?,
              birthday:    row.get(1)?,
              anniversary: row.get(2)?,
              file_name:   row.get(3)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(rows)
  }
}
