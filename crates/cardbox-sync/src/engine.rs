//! [`Engine`]: reconciles card files with the contact store.

use std::{
  fs,
  path::{Component, Path},
};

use cardbox_core::{
  record::{
    BirthMonth, ContactListing, ContactRecord, NULL_PLACEHOLDER, NewContact,
    has_card_extension, with_card_extension,
  },
  service::{CardService, ERROR_MARKER},
  store::CardStore,
};
use cardbox_summary::{ParsedSummary, birth_month, format_date};
use chrono::{DateTime, Local, NaiveDateTime, Timelike as _, Utc};
use tracing::{debug, info, warn};

use crate::{
  Error, Result,
  locks::KeyedLocks,
  outcome::{
    CardDetails, CreateOutcome, DetailsOutcome, EditOutcome, RejectReason,
    Rejection, ScanReport, SyncOutcome,
  },
};

/// Owns the store handle, the card service and the per-file lock table.
///
/// Every read-then-write sequence on the store runs under the lock for its
/// file name, so concurrent calls for the same file are serialised.
pub struct Engine<S, C> {
  store:   S,
  service: C,
  locks:   KeyedLocks,
}

impl<S, C> Engine<S, C>
where
  S: CardStore,
  C: CardService,
{
  pub fn new(store: S, service: C) -> Self {
    Self { store, service, locks: KeyedLocks::default() }
  }

  pub fn store(&self) -> &S { &self.store }

  pub fn service(&self) -> &C { &self.service }

  /// Give back the collaborators, e.g. to close the store explicitly.
  pub fn into_parts(self) -> (S, C) { (self.store, self.service) }

  // ─── Scan-time sync ────────────────────────────────────────────────────────

  /// Reconcile one scanned card given its summary text.
  ///
  /// Inserts a FILE row if the name is new and a CONTACT row if the file has
  /// none. An existing contact is never overwritten.
  pub async fn sync_from_scan(
    &self,
    file_name: &str,
    file_path: &Path,
    summary: &str,
  ) -> Result<SyncOutcome> {
    if file_name.trim().is_empty() {
      return Ok(SyncOutcome::Rejected(RejectReason::EmptyFileName));
    }

    let Some(parsed) = parse_viable(summary) else {
      warn!(file = file_name, "could not parse a name from card; skipping");
      return Ok(SyncOutcome::Rejected(RejectReason::UnparseableName));
    };

    let _guard = self.locks.lock(file_name).await;
    let file_id = self.ensure_file(file_name, file_path).await?;

    if self
      .store
      .find_contact_by_file_id(file_id)
      .await
      .map_err(Error::store)?
      .is_some()
    {
      debug!(file = file_name, file_id, "contact already recorded");
      return Ok(SyncOutcome::Skipped);
    }

    let contact = self
      .store
      .insert_contact(NewContact::new(
        file_id,
        &parsed.full_name,
        &parsed.birthday,
        &parsed.anniversary,
      ))
      .await
      .map_err(Error::store)?;

    info!(file = file_name, contact_id = contact.contact_id, "recorded contact");
    Ok(SyncOutcome::Inserted(contact))
  }

  /// Sync every card file directly inside `folder`.
  ///
  /// Files are visited in name order. A card whose summary cannot be fetched
  /// is tallied as rejected and the scan moves on; store failures abort it.
  pub async fn scan_folder(&self, folder: &Path) -> Result<ScanReport> {
    let mut report = ScanReport::default();

    if !folder.is_dir() {
      warn!(folder = %folder.display(), "card folder does not exist");
      return Ok(report);
    }

    for file_name in card_file_names(folder)? {
      let path = folder.join(&file_name);

      let summary = match self.service.summary(&path) {
        Ok(summary) => summary,
        Err(e) => {
          warn!(file = %file_name, error = %e, "could not read card");
          report.rejected.push(Rejection {
            file_name,
            reason: RejectReason::Service(e.to_string()),
          });
          continue;
        }
      };

      match self.sync_from_scan(&file_name, &path, &summary).await? {
        SyncOutcome::Inserted(_) => report.inserted.push(file_name),
        SyncOutcome::Skipped => report.skipped.push(file_name),
        SyncOutcome::Rejected(reason) => {
          report.rejected.push(Rejection { file_name, reason })
        }
      }
    }

    info!(
      inserted = report.inserted.len(),
      skipped = report.skipped.len(),
      rejected = report.rejected.len(),
      "scan complete"
    );
    Ok(report)
  }

  // ─── Explicit create / edit ────────────────────────────────────────────────

  /// Create a new card file in `folder` and record it.
  ///
  /// `.vcf` is appended to `file_name` unless it already names a card file.
  /// Nothing is written to the store unless the card service succeeds.
  pub async fn apply_create(
    &self,
    file_name: &str,
    folder: &Path,
    contact_name: &str,
    birthday: &str,
    anniversary: &str,
  ) -> Result<CreateOutcome> {
    let file_name = file_name.trim();
    if file_name.is_empty() {
      return Ok(CreateOutcome::Rejected(RejectReason::EmptyFileName));
    }
    if !is_bare_file_name(file_name) {
      return Ok(CreateOutcome::Rejected(RejectReason::InvalidFileName(
        file_name.to_string(),
      )));
    }
    let contact_name = contact_name.trim();
    if contact_name.is_empty() {
      return Ok(CreateOutcome::Rejected(RejectReason::EmptyContactName));
    }

    let file_name = with_card_extension(file_name);
    let path = folder.join(&file_name);

    let _guard = self.locks.lock(&file_name).await;

    if let Err(e) = self.service.create_card(&path, contact_name) {
      warn!(file = %file_name, error = %e, "card creation failed");
      return Ok(CreateOutcome::Rejected(RejectReason::Service(e.to_string())));
    }

    let file_id = self.ensure_file(&file_name, &path).await?;
    let contact = self
      .upsert_contact(NewContact::new(file_id, contact_name, birthday, anniversary))
      .await?;

    info!(file = %file_name, contact_id = contact.contact_id, "created card");
    Ok(CreateOutcome::Created { file_name, contact })
  }

  /// Rename the contact on an existing card file and mirror the change.
  ///
  /// The store is left untouched if the card service fails.
  pub async fn apply_edit(
    &self,
    existing_file_name: &str,
    folder: &Path,
    contact_name: &str,
    birthday: &str,
    anniversary: &str,
  ) -> Result<EditOutcome> {
    let file_name = existing_file_name.trim();
    if file_name.is_empty() {
      return Ok(EditOutcome::Rejected(RejectReason::EmptyFileName));
    }
    if !is_bare_file_name(file_name) {
      return Ok(EditOutcome::Rejected(RejectReason::InvalidFileName(
        file_name.to_string(),
      )));
    }
    let contact_name = contact_name.trim();
    if contact_name.is_empty() {
      return Ok(EditOutcome::Rejected(RejectReason::EmptyContactName));
    }

    let path = folder.join(file_name);

    let _guard = self.locks.lock(file_name).await;

    if let Err(e) = self.service.update_name(&path, contact_name) {
      warn!(file = file_name, error = %e, "card update failed");
      return Ok(EditOutcome::Rejected(RejectReason::Service(e.to_string())));
    }

    let file_id = self.ensure_file(file_name, &path).await?;
    let contact = self
      .upsert_contact(NewContact::new(file_id, contact_name, birthday, anniversary))
      .await?;

    info!(file = file_name, contact_id = contact.contact_id, "updated contact");
    Ok(EditOutcome::Updated)
  }

  // ─── Reads ─────────────────────────────────────────────────────────────────

  /// Fetch and parse one card for display. Does not touch the store.
  pub async fn details(&self, file_name: &str, folder: &Path) -> Result<DetailsOutcome> {
    let file_name = file_name.trim();
    if file_name.is_empty() {
      return Ok(DetailsOutcome::Rejected(RejectReason::EmptyFileName));
    }
    if !is_bare_file_name(file_name) {
      return Ok(DetailsOutcome::Rejected(RejectReason::InvalidFileName(
        file_name.to_string(),
      )));
    }

    let summary = match self.service.summary(&folder.join(file_name)) {
      Ok(summary) => summary,
      Err(e) => {
        return Ok(DetailsOutcome::Rejected(RejectReason::Service(e.to_string())));
      }
    };
    let Some(parsed) = parse_viable(&summary) else {
      return Ok(DetailsOutcome::Rejected(RejectReason::UnparseableName));
    };

    Ok(DetailsOutcome::Found(CardDetails {
      file_name:            file_name.to_string(),
      full_name:            parsed.full_name,
      birthday:             display_date(&parsed.birthday),
      anniversary:          display_date(&parsed.anniversary),
      extra_property_count: parsed.extra_property_count,
    }))
  }

  /// All recorded contacts, ordered by name.
  pub async fn list_contacts(&self) -> Result<Vec<ContactListing>> {
    self.store.list_contacts().await.map_err(Error::store)
  }

  /// Recorded contacts whose birthday falls in `month` (1-12), ordered by
  /// birthday and then by name.
  ///
  /// Birthdays without a recognisable month (free text) never match.
  pub async fn contacts_born_in(&self, month: u32) -> Result<Vec<ContactListing>> {
    let month = BirthMonth::try_from(month)?;
    let mut contacts = self.list_contacts().await?;
    contacts.retain(|c| {
      c.birthday.as_deref().and_then(birth_month) == Some(month.get())
    });
    contacts.sort_by(|a, b| a.birthday.cmp(&b.birthday));
    Ok(contacts)
  }

  // ─── Helpers ───────────────────────────────────────────────────────────────

  /// The id of the FILE row for `file_name`, inserting it if needed.
  ///
  /// An existing row keeps its original timestamps.
  async fn ensure_file(&self, file_name: &str, path: &Path) -> Result<i64> {
    if let Some(file) = self
      .store
      .find_file_by_name(file_name)
      .await
      .map_err(Error::store)?
    {
      return Ok(file.file_id);
    }

    let last_modified = modified_at(path)?;
    let file = self
      .store
      .insert_file(file_name, last_modified, Utc::now())
      .await
      .map_err(Error::store)?;
    debug!(file = file_name, file_id = file.file_id, "recorded file");
    Ok(file.file_id)
  }

  async fn upsert_contact(&self, input: NewContact) -> Result<ContactRecord> {
    let existing = self
      .store
      .find_contact_by_file_id(input.file_id)
      .await
      .map_err(Error::store)?;

    match existing {
      Some(existing) => {
        self
          .store
          .update_contact(input.clone())
          .await
          .map_err(Error::store)?;
        Ok(ContactRecord {
          contact_id:  existing.contact_id,
          name:        input.name,
          birthday:    input.birthday,
          anniversary: input.anniversary,
          file_id:     input.file_id,
        })
      }
      None => self.store.insert_contact(input).await.map_err(Error::store),
    }
  }
}

/// Parse `summary`, or `None` if it reports a service error or has no name.
fn parse_viable(summary: &str) -> Option<ParsedSummary> {
  if summary.trim_start().starts_with(ERROR_MARKER) {
    return None;
  }
  let parsed = cardbox_summary::parse(summary);
  parsed.is_viable().then_some(parsed)
}

fn display_date(raw: &str) -> String {
  if raw.eq_ignore_ascii_case(NULL_PLACEHOLDER) {
    String::new()
  } else {
    format_date(raw)
  }
}

/// Whether `name` names a file directly inside the card folder.
fn is_bare_file_name(name: &str) -> bool {
  let mut components = Path::new(name).components();
  matches!(
    (components.next(), components.next()),
    (Some(Component::Normal(_)), None)
  ) && !name.contains(['/', '\\'])
}

/// Card files directly inside `folder`, sorted by name.
fn card_file_names(folder: &Path) -> Result<Vec<String>> {
  let entries = fs::read_dir(folder).map_err(|e| Error::io(folder, e))?;

  let mut names = Vec::new();
  for entry in entries {
    let entry = entry.map_err(|e| Error::io(folder, e))?;
    let path = entry.path();
    if !path.is_file() || !has_card_extension(&path) {
      continue;
    }
    match entry.file_name().into_string() {
      Ok(name) => names.push(name),
      Err(name) => warn!(file = ?name, "skipping card with non-UTF-8 name"),
    }
  }
  names.sort();
  Ok(names)
}

/// On-disk modification time of `path` in local time, to the second.
fn modified_at(path: &Path) -> Result<NaiveDateTime> {
  let modified = fs::metadata(path)
    .and_then(|m| m.modified())
    .map_err(|e| Error::io(path, e))?;
  let local = DateTime::<Local>::from(modified).naive_local();
  Ok(local.with_nanosecond(0).unwrap_or(local))
}
