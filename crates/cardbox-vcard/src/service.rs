//! [`VcardFileService`]: the file-system implementation of [`CardService`].

use std::{fs, io::Write as _, path::Path};

use cardbox_core::{record::has_card_extension, service::CardService};
use tracing::debug;

use crate::{
  Card, Error, Result, parse_card, render_summary, serialize_card, validate_card,
};

/// Reads and writes cards as individual `.vcf` / `.vcard` files.
#[derive(Debug, Clone, Copy, Default)]
pub struct VcardFileService;

impl VcardFileService {
  /// Read and parse the card at `path`.
  pub fn read_card(&self, path: &Path) -> Result<Card> {
    check_extension(path)?;
    let text = fs::read_to_string(path)?;
    parse_card(&text)
  }

  /// Overwrite the card at `path` with `card`.
  pub fn write_card(&self, path: &Path, card: &Card) -> Result<()> {
    check_extension(path)?;
    fs::write(path, serialize_card(card))?;
    Ok(())
  }
}

fn check_extension(path: &Path) -> Result<()> {
  if has_card_extension(path) {
    Ok(())
  } else {
    Err(Error::UnsupportedExtension(path.to_path_buf()))
  }
}

fn check_name(name: &str) -> Result<&str> {
  let name = name.trim();
  if name.is_empty() {
    Err(Error::EmptyFullName)
  } else {
    Ok(name)
  }
}

impl CardService for VcardFileService {
  type Error = Error;

  fn summary(&self, path: &Path) -> Result<String> {
    let card = self.read_card(path)?;
    Ok(render_summary(&card))
  }

  fn update_name(&self, path: &Path, new_name: &str) -> Result<()> {
    let new_name = check_name(new_name)?;
    let mut card = self.read_card(path)?;
    card.set_full_name(new_name);
    validate_card(&card)?;
    self.write_card(path, &card)?;
    debug!(path = %path.display(), "rewrote card full name");
    Ok(())
  }

  fn create_card(&self, path: &Path, initial_name: &str) -> Result<()> {
    check_extension(path)?;
    let initial_name = check_name(initial_name)?;
    let card = Card::new(initial_name);
    validate_card(&card)?;

    let mut file = match fs::OpenOptions::new().write(true).create_new(true).open(path) {
      Ok(file) => file,
      Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
        return Err(Error::AlreadyExists(path.to_path_buf()));
      }
      Err(e) => return Err(e.into()),
    };
    file.write_all(serialize_card(&card).as_bytes())?;
    debug!(path = %path.display(), "created card");
    Ok(())
  }
}
