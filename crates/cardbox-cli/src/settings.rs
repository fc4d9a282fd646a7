//! Layered configuration: defaults, then the TOML file, then `CARDBOX_*`
//! environment variables, then command-line flags.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Deserialize;

pub const DEFAULT_FOLDER: &str = "cards";
pub const DEFAULT_DATABASE: &str = "cardbox.db";
pub const ENV_PREFIX: &str = "CARDBOX";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
  /// Folder holding the card files.
  pub folder:   PathBuf,
  /// SQLite database file.
  pub database: PathBuf,
}

/// Flag values that take precedence over every other source.
#[derive(Debug, Default)]
pub struct Overrides {
  pub folder:   Option<PathBuf>,
  pub database: Option<PathBuf>,
}

impl Settings {
  pub fn load(config_file: &Path, overrides: Overrides) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .set_default("folder", DEFAULT_FOLDER)?
      .set_default("database", DEFAULT_DATABASE)?
      .add_source(config::File::from(config_file).required(false))
      .add_source(config::Environment::with_prefix(ENV_PREFIX))
      .set_override_option("folder", overrides.folder.map(path_value))?
      .set_override_option("database", overrides.database.map(path_value))?
      .build()
      .with_context(|| format!("failed to read config file {}", config_file.display()))?;

    let mut settings: Settings = settings
      .try_deserialize()
      .context("failed to deserialise settings")?;

    settings.folder = expand_tilde(&settings.folder);
    settings.database = expand_tilde(&settings.database);
    Ok(settings)
  }
}

fn path_value(path: PathBuf) -> String { path.to_string_lossy().into_owned() }

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use std::fs;

  use super::*;

  #[test]
  fn defaults_apply_without_a_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let s = Settings::load(&dir.path().join("absent.toml"), Overrides::default()).unwrap();
    assert_eq!(s.folder, PathBuf::from(DEFAULT_FOLDER));
    assert_eq!(s.database, PathBuf::from(DEFAULT_DATABASE));
  }

  #[test]
  fn file_values_then_flags() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("cardbox.toml");
    fs::write(&file, "folder = \"/srv/cards\"\ndatabase = \"/srv/cards.db\"\n").unwrap();

    let s = Settings::load(&file, Overrides::default()).unwrap();
    assert_eq!(s.folder, PathBuf::from("/srv/cards"));
    assert_eq!(s.database, PathBuf::from("/srv/cards.db"));

    let s = Settings::load(&file, Overrides {
      folder:   Some(PathBuf::from("/tmp/other")),
      database: None,
    })
    .unwrap();
    assert_eq!(s.folder, PathBuf::from("/tmp/other"));
    assert_eq!(s.database, PathBuf::from("/srv/cards.db"));
  }

  #[test]
  fn tilde_expands_to_home() {
    let Ok(home) = std::env::var("HOME") else { return };
    assert_eq!(
      expand_tilde(Path::new("~/cards.db")),
      PathBuf::from(home).join("cards.db")
    );
    assert_eq!(expand_tilde(Path::new("/abs/cards.db")), PathBuf::from("/abs/cards.db"));
  }
}
