//! The `CardService` trait: native operations on card files.

use std::path::Path;

/// Prefix of summary text that reports a failure instead of a card.
///
/// Services backed by a foreign library may return their errors in-band;
/// consumers treat such text as unparseable.
pub const ERROR_MARKER: &str = "Error:";

/// Reads, renames and creates card files.
///
/// Implementations are synchronous: each call runs to completion against the
/// file system before returning.
pub trait CardService: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Render the card at `path` as human-readable summary text.
  fn summary(&self, path: &Path) -> Result<String, Self::Error>;

  /// Replace the full name of the card at `path` and write it back.
  fn update_name(&self, path: &Path, new_name: &str) -> Result<(), Self::Error>;

  /// Create a new card file at `path` whose full name is `initial_name`.
  ///
  /// Fails if `path` already exists.
  fn create_card(&self, path: &Path, initial_name: &str) -> Result<(), Self::Error>;
}
