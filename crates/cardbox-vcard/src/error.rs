//! Error types for the cardbox-vcard file service.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("not a card file: {}", .0.display())]
  UnsupportedExtension(PathBuf),

  #[error("card file already exists: {}", .0.display())]
  AlreadyExists(PathBuf),

  #[error("vCard missing BEGIN/END:VCARD envelope")]
  MissingEnvelope,

  #[error("vCard missing VERSION property")]
  MissingVersion,

  #[error("vCard missing FN property")]
  MissingFullName,

  #[error("full name must not be empty")]
  EmptyFullName,

  #[error("invalid card: {0}")]
  InvalidCard(String),

  #[error("invalid property: {0}")]
  InvalidProperty(String),

  #[error("invalid date: {0}")]
  InvalidDate(String),

  #[error("malformed content-line: {0}")]
  MalformedContentLine(String),

  #[error("I/O error: {0}")]
  Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
