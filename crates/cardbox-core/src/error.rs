//! Error types for `cardbox-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("month out of range (expected 1-12): {0}")]
  InvalidMonth(u32),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
