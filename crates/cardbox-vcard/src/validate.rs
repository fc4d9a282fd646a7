//! Structural checks run on a [`Card`] before it is written to disk.

use crate::{Card, CardDate, Error, Property, Result};

/// Property names a written card may carry (RFC 6350).
const KNOWN_PROPERTIES: &[&str] = &[
  "FN", "N", "BDAY", "ANNIVERSARY", "GENDER", "ADR", "TEL", "EMAIL", "IMPP",
  "LANG", "TZ", "GEO", "TITLE", "ROLE", "LOGO", "ORG", "MEMBER", "RELATED",
  "CATEGORIES", "NOTE", "PRODID", "REV", "SOUND", "UID", "CLIENTPIDMAP", "URL",
  "KEY", "FBURL", "CALADRURI", "CALURI",
];

/// Properties that are meaningless without at least one value.
const VALUE_REQUIRED: &[&str] = &[
  "FN", "N", "TEL", "EMAIL", "IMPP", "LANG", "TZ", "GEO", "TITLE", "ROLE",
  "ORG", "MEMBER", "RELATED", "URL",
];

/// Number of components in a structured `N` value.
const N_COMPONENTS: usize = 5;

fn is_one_of(name: &str, list: &[&str]) -> bool {
  list.iter().any(|known| known.eq_ignore_ascii_case(name))
}

/// Check that `card` is fit to be serialised.
///
/// - `FN` has at least one value.
/// - Optional properties use known names and never `VERSION`, `BDAY` or
///   `ANNIVERSARY`.
/// - At most one `N`, with exactly five components.
/// - Dates are `YYYYMMDD` and times `HHMMSS` (optionally `Z`-suffixed);
///   text dates are non-empty.
pub fn validate_card(card: &Card) -> Result<()> {
  if card.full_name.values.is_empty() {
    return Err(Error::InvalidCard("FN has no value".into()));
  }

  let mut n_count = 0;
  for prop in &card.optional {
    validate_property(prop)?;
    if prop.name.eq_ignore_ascii_case("N") {
      n_count += 1;
    }
  }
  if n_count > 1 {
    return Err(Error::InvalidProperty(format!("N appears {n_count} times")));
  }

  if let Some(date) = &card.birthday {
    validate_date("BDAY", date)?;
  }
  if let Some(date) = &card.anniversary {
    validate_date("ANNIVERSARY", date)?;
  }
  Ok(())
}

fn validate_property(prop: &Property) -> Result<()> {
  let name = prop.name.as_str();

  if name.eq_ignore_ascii_case("VERSION") {
    return Err(Error::InvalidCard("VERSION among optional properties".into()));
  }
  if name.eq_ignore_ascii_case("BDAY") || name.eq_ignore_ascii_case("ANNIVERSARY") {
    return Err(Error::InvalidDate(format!("{name} among optional properties")));
  }
  if name.is_empty() || !is_one_of(name, KNOWN_PROPERTIES) {
    return Err(Error::InvalidProperty(format!("unknown property {name:?}")));
  }
  if name.eq_ignore_ascii_case("N") && prop.values.len() != N_COMPONENTS {
    return Err(Error::InvalidProperty(format!(
      "N has {} components, expected {N_COMPONENTS}",
      prop.values.len()
    )));
  }
  if prop.values.is_empty() && is_one_of(name, VALUE_REQUIRED) {
    return Err(Error::InvalidProperty(format!("{name} has no value")));
  }
  Ok(())
}

fn all_digits(s: &str, len: usize) -> bool {
  s.len() == len && s.bytes().all(|b| b.is_ascii_digit())
}

fn validate_date(label: &str, date: &CardDate) -> Result<()> {
  let ok = match date {
    CardDate::Text(text) => !text.trim().is_empty(),
    CardDate::DateTime { date, time } => {
      let time = time.strip_suffix('Z').unwrap_or(time.as_str());
      (date.is_empty() || all_digits(date, 8)) && (time.is_empty() || all_digits(time, 6))
    }
  };
  if ok {
    Ok(())
  } else {
    Err(Error::InvalidDate(format!("{label} value {:?}", date.to_value())))
  }
}
