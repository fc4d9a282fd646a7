//! `cardbox`: mirror a folder of vCard files into a contact database.
//!
//! # Usage
//!
//! ```text
//! cardbox scan
//! cardbox --folder ~/cards show alice.vcf
//! cardbox create bob "Bob Jones" --birthday 19800101
//! cardbox edit alice.vcf "Alice Jones"
//! cardbox list --json
//! cardbox born-in 6
//! ```
//!
//! Settings come from `cardbox.toml` (or `--config`), then `CARDBOX_*`
//! environment variables, then the `--folder` / `--database` flags.

mod report;
mod settings;

use std::path::{Path, PathBuf};

use anyhow::{Context as _, bail};
use cardbox_core::service::CardService as _;
use cardbox_store_sqlite::SqliteStore;
use cardbox_summary::ParsedSummary;
use cardbox_sync::{CreateOutcome, DetailsOutcome, EditOutcome, Engine};
use cardbox_vcard::VcardFileService;
use clap::{Parser, Subcommand};
use settings::{Overrides, Settings};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

type CardEngine = Engine<SqliteStore, VcardFileService>;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "cardbox", author, version, about = "Mirror vCard files into a contact database")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, env = "CARDBOX_CONFIG", default_value = "cardbox.toml")]
  config: PathBuf,

  /// Folder holding the card files (default: cards).
  #[arg(long, value_name = "DIR")]
  folder: Option<PathBuf>,

  /// SQLite database file (default: cardbox.db).
  #[arg(long, value_name = "FILE")]
  database: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Record every card in the folder that is not yet in the database.
  Scan,
  /// Print the parsed fields of one card.
  Show {
    file: String,
  },
  /// Create a new card file and record it.
  Create {
    file:        String,
    name:        String,
    #[arg(long, default_value = "")]
    birthday:    String,
    #[arg(long, default_value = "")]
    anniversary: String,
  },
  /// Rename the contact on an existing card.
  ///
  /// Birthday and anniversary default to the values on the card.
  Edit {
    file:        String,
    name:        String,
    #[arg(long)]
    birthday:    Option<String>,
    #[arg(long)]
    anniversary: Option<String>,
  },
  /// Display all recorded contacts.
  List {
    #[arg(long)]
    json: bool,
  },
  /// Recorded contacts whose birthday falls in MONTH (1-12).
  BornIn {
    month: u32,
    #[arg(long)]
    json:  bool,
  },
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();

  let settings = Settings::load(&cli.config, Overrides {
    folder:   cli.folder,
    database: cli.database,
  })?;

  let store = SqliteStore::open(&settings.database)
    .await
    .with_context(|| format!("failed to open store at {:?}", settings.database))?;
  let engine = Engine::new(store, VcardFileService);

  let result = run(&engine, &settings.folder, cli.command).await;

  let (store, _) = engine.into_parts();
  store.close().await.context("failed to close store")?;

  result
}

async fn run(engine: &CardEngine, folder: &Path, command: Command) -> anyhow::Result<()> {
  match command {
    Command::Scan => {
      let report = engine.scan_folder(folder).await.context("scan failed")?;
      print!("{}", report::scan_summary(&report));
    }

    Command::Show { file } => match engine.details(&file, folder).await? {
      DetailsOutcome::Found(details) => print!("{}", report::card_details(&details)),
      DetailsOutcome::Rejected(reason) => bail!("cannot show {file}: {reason}"),
    },

    Command::Create { file, name, birthday, anniversary } => {
      match engine
        .apply_create(&file, folder, &name, &birthday, &anniversary)
        .await?
      {
        CreateOutcome::Created { file_name, .. } => println!("Created {file_name}"),
        CreateOutcome::Rejected(reason) => bail!("cannot create {file}: {reason}"),
      }
    }

    Command::Edit { file, name, birthday, anniversary } => {
      let current = card_fields(engine.service(), &folder.join(&file));
      let birthday = birthday.unwrap_or(current.birthday);
      let anniversary = anniversary.unwrap_or(current.anniversary);

      match engine
        .apply_edit(&file, folder, &name, &birthday, &anniversary)
        .await?
      {
        EditOutcome::Updated => println!("Updated {file}"),
        EditOutcome::Rejected(reason) => bail!("cannot edit {file}: {reason}"),
      }
    }

    Command::List { json } => {
      let contacts = engine.list_contacts().await?;
      if json {
        println!("{}", serde_json::to_string_pretty(&contacts)?);
      } else {
        print!("{}", report::contact_table(&contacts));
      }
    }

    Command::BornIn { month, json } => {
      let contacts = engine.contacts_born_in(month).await?;
      if json {
        println!("{}", serde_json::to_string_pretty(&contacts)?);
      } else {
        print!("{}", report::birthday_table(&contacts));
      }
    }
  }
  Ok(())
}

/// The fields currently on the card at `path`, or empty ones if it cannot
/// be read.
fn card_fields(service: &VcardFileService, path: &Path) -> ParsedSummary {
  service
    .summary(path)
    .map(|text| cardbox_summary::parse(&text))
    .unwrap_or_default()
}

#[cfg(test)]
mod tests {
  use clap::CommandFactory as _;

  use super::*;

  #[test]
  fn cli_definition_is_consistent() { Cli::command().debug_assert(); }

  #[test]
  fn born_in_takes_a_month_and_json_flag() {
    let cli = Cli::try_parse_from(["cardbox", "born-in", "6", "--json"]).unwrap();
    assert!(matches!(cli.command, Command::BornIn { month: 6, json: true }));
    assert_eq!(cli.config, PathBuf::from("cardbox.toml"));
  }

  #[test]
  fn edit_dates_are_optional() {
    let cli = Cli::try_parse_from(["cardbox", "--folder", "/tmp/cards", "edit", "a.vcf", "Ann"])
      .unwrap();
    assert_eq!(cli.folder, Some(PathBuf::from("/tmp/cards")));
    let Command::Edit { birthday, anniversary, .. } = cli.command else {
      panic!("expected edit");
    };
    assert_eq!(birthday, None);
    assert_eq!(anniversary, None);
  }
}
