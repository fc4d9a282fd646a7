//! vCard file service for cardbox.
//!
//! Reads `.vcf` / `.vcard` files into a small [`Card`] model, renders the
//! summary text consumed by `cardbox-summary`, and writes cards back as
//! vCard 4.0. Only the subset needed by cardbox is modelled: the full name,
//! birthday, anniversary, and an ordered list of every other property.
//!
//! # Quick start
//!
//! ```no_run
//! use cardbox_core::service::CardService;
//! use cardbox_vcard::VcardFileService;
//!
//! let service = VcardFileService;
//! let summary = service.summary("cards/alice.vcf".as_ref()).unwrap();
//! println!("{summary}");
//! ```

pub mod error;
mod parse;
mod serialize;
mod service;
mod summary;
mod validate;

pub use error::{Error, Result};
pub use parse::parse_card;
pub use serialize::serialize_card;
pub use service::VcardFileService;
pub use summary::render_summary;
pub use validate::validate_card;

// ─── Card model ──────────────────────────────────────────────────────────────

/// A single parsed vCard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
  /// The first `FN` property.
  pub full_name:   Property,
  /// Every other property, in file order.
  pub optional:    Vec<Property>,
  pub birthday:    Option<CardDate>,
  pub anniversary: Option<CardDate>,
}

impl Card {
  /// A card carrying nothing but a full name.
  pub fn new(full_name: &str) -> Self {
    Self {
      full_name:   Property::single("FN", full_name),
      optional:    Vec::new(),
      birthday:    None,
      anniversary: None,
    }
  }

  /// The first value of the `FN` property.
  pub fn full_name(&self) -> &str {
    self
      .full_name
      .values
      .first()
      .map(String::as_str)
      .unwrap_or_default()
  }

  /// Replace the first value of the `FN` property.
  pub fn set_full_name(&mut self, name: &str) {
    match self.full_name.values.first_mut() {
      Some(first) => *first = name.to_string(),
      None => self.full_name.values.push(name.to_string()),
    }
  }
}

/// One content line: `group.NAME;PARAM=value:v1;v2`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
  pub group:  Option<String>,
  /// Uppercased property name.
  pub name:   String,
  pub params: Vec<Param>,
  /// Unescaped `;`-separated components.
  pub values: Vec<String>,
}

impl Property {
  pub(crate) fn single(name: &str, value: &str) -> Self {
    Self {
      group:  None,
      name:   name.to_string(),
      params: Vec::new(),
      values: vec![value.to_string()],
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
  pub name:  String,
  pub value: String,
}

/// A `BDAY` or `ANNIVERSARY` value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardDate {
  /// Free text, e.g. `circa 1800`.
  Text(String),
  /// A date with an optional time part; `time` keeps any `Z` or offset.
  DateTime { date: String, time: String },
}

impl CardDate {
  /// Classify a raw property value.
  ///
  /// Values starting with a digit or `--` are dates, split at the first `T`
  /// into date and time; everything else is text.
  pub fn from_value(value: &str) -> Self {
    if !(value.starts_with("--") || value.starts_with(|c: char| c.is_ascii_digit())) {
      return CardDate::Text(value.to_string());
    }
    match value.split_once('T') {
      Some((date, time)) => CardDate::DateTime {
        date: date.to_string(),
        time: time.to_string(),
      },
      None => CardDate::DateTime {
        date: value.to_string(),
        time: String::new(),
      },
    }
  }

  /// The value as written in the card and printed in summaries.
  pub fn to_value(&self) -> String {
    match self {
      CardDate::Text(text) => text.clone(),
      CardDate::DateTime { date, time } if time.is_empty() => date.clone(),
      CardDate::DateTime { date, time } => format!("{date}T{time}"),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn card_date_classification() {
    assert_eq!(
      CardDate::from_value("19540203T123000Z"),
      CardDate::DateTime {
        date: "19540203".into(),
        time: "123000Z".into(),
      }
    );
    assert_eq!(
      CardDate::from_value("--0203"),
      CardDate::DateTime {
        date: "--0203".into(),
        time: String::new(),
      }
    );
    assert_eq!(
      CardDate::from_value("circa 1800"),
      CardDate::Text("circa 1800".into())
    );
    assert_eq!(
      CardDate::from_value("Tuesday"),
      CardDate::Text("Tuesday".into())
    );
  }

  #[test]
  fn card_date_value_preserved() {
    for raw in ["19540203T123000Z", "--0203", "20090808", "circa 1800"] {
      assert_eq!(CardDate::from_value(raw).to_value(), raw);
    }
  }

  #[test]
  fn set_full_name_replaces_first_value() {
    let mut card = Card::new("Old");
    card.set_full_name("New");
    assert_eq!(card.full_name(), "New");
    assert_eq!(card.full_name.values.len(), 1);
  }
}
