//! vCard content-line parser.
//!
//! Pipeline:
//!   raw &str
//!     └─ unfold_lines()          → Vec<String>
//!          └─ parse_content_line() → Property
//!               └─ route by name   → Card

use crate::{
  Card, CardDate, Param, Property,
  error::{Error, Result},
};

// ─── Low-level helpers ───────────────────────────────────────────────────────

/// Join CRLF+SP (or LF+SP / LF+HT) continuation lines (RFC 6350 §3.2).
/// Tolerates bare LF line endings.
pub(crate) fn unfold_lines(s: &str) -> Vec<String> {
  let mut lines: Vec<String> = Vec::new();
  for raw in s.split('\n') {
    let line = raw.strip_suffix('\r').unwrap_or(raw);
    if line.starts_with(' ') || line.starts_with('\t') {
      if let Some(last) = lines.last_mut() {
        last.push_str(&line[1..]);
      }
      // else: leading continuation with no prior line, discarded
    } else {
      lines.push(line.to_string());
    }
  }
  lines.retain(|l| !l.is_empty());
  lines
}

/// Find the first `:` that is not inside a double-quoted string.
fn find_unquoted_colon(s: &str) -> Option<usize> {
  let mut in_quotes = false;
  for (i, c) in s.char_indices() {
    match c {
      '"' => in_quotes = !in_quotes,
      ':' if !in_quotes => return Some(i),
      _ => {}
    }
  }
  None
}

/// Split on `;` while respecting double-quoted strings.
fn split_semicolons_respecting_quotes(s: &str) -> Vec<&str> {
  let mut result = Vec::new();
  let mut start = 0usize;
  let mut in_quotes = false;
  for (i, c) in s.char_indices() {
    match c {
      '"' => in_quotes = !in_quotes,
      ';' if !in_quotes => {
        result.push(&s[start..i]);
        start = i + 1;
      }
      _ => {}
    }
  }
  result.push(&s[start..]);
  result
}

/// Split a value on unescaped `;` and unescape each component.
fn split_values(s: &str) -> Vec<String> {
  let mut result = Vec::new();
  let mut current = String::new();
  let mut chars = s.chars();
  while let Some(c) = chars.next() {
    match c {
      '\\' => match chars.next() {
        Some('n') | Some('N') => current.push('\n'),
        Some(other @ ('\\' | ',' | ';')) => current.push(other),
        Some(other) => {
          current.push('\\');
          current.push(other);
        }
        None => current.push('\\'),
      },
      ';' => result.push(std::mem::take(&mut current)),
      other => current.push(other),
    }
  }
  result.push(current);
  result
}

// ─── Content-line parser ─────────────────────────────────────────────────────

fn parse_content_line(line: &str) -> Result<Property> {
  let colon_pos = find_unquoted_colon(line)
    .ok_or_else(|| Error::MalformedContentLine(line.to_string()))?;

  let name_part = &line[..colon_pos];
  let value = &line[colon_pos + 1..];

  let tokens = split_semicolons_respecting_quotes(name_part);
  let name_raw = tokens[0].trim();
  if name_raw.is_empty() {
    return Err(Error::MalformedContentLine(line.to_string()));
  }

  // Split group prefix (e.g. "item1.TEL" → group "item1", name "TEL")
  let (group, name) = match name_raw.split_once('.') {
    Some((group, name)) => (Some(group.to_string()), name.to_uppercase()),
    None => (None, name_raw.to_uppercase()),
  };
  if name.is_empty() {
    return Err(Error::MalformedContentLine(line.to_string()));
  }

  let mut params = Vec::new();
  for token in &tokens[1..] {
    if let Some((param_name, param_val)) = token.split_once('=') {
      params.push(Param {
        name:  param_name.trim().to_uppercase(),
        value: param_val.trim().to_string(),
      });
    } else {
      // Bare token: TYPE=value (vCard 3.0 compat)
      let t = token.trim();
      if !t.is_empty() {
        params.push(Param {
          name:  "TYPE".to_string(),
          value: t.to_string(),
        });
      }
    }
  }

  Ok(Property {
    group,
    name,
    params,
    values: split_values(value),
  })
}

// ─── Card parser ─────────────────────────────────────────────────────────────

/// Parse a single vCard from `input`.
///
/// The card must be wrapped in `BEGIN:VCARD` / `END:VCARD`, carry a
/// `VERSION` line and a non-empty `FN`. Lines after `END:VCARD` are ignored.
pub fn parse_card(input: &str) -> Result<Card> {
  let lines = unfold_lines(input);

  let start = lines
    .iter()
    .position(|l| l.eq_ignore_ascii_case("BEGIN:VCARD"))
    .ok_or(Error::MissingEnvelope)?;
  let end = lines[start..]
    .iter()
    .position(|l| l.eq_ignore_ascii_case("END:VCARD"))
    .map(|offset| start + offset)
    .ok_or(Error::MissingEnvelope)?;

  let mut full_name: Option<Property> = None;
  let mut optional = Vec::new();
  let mut birthday = None;
  let mut anniversary = None;
  let mut has_version = false;

  for line in &lines[start + 1..end] {
    let prop = parse_content_line(line)?;

    match prop.name.as_str() {
      "VERSION" => has_version = true,
      "FN" if full_name.is_none() => {
        if prop.values.iter().all(|v| v.trim().is_empty()) {
          return Err(Error::EmptyFullName);
        }
        full_name = Some(prop);
      }
      "BDAY" => birthday = Some(date_from(&prop)),
      "ANNIVERSARY" => anniversary = Some(date_from(&prop)),
      _ => optional.push(prop),
    }
  }

  if !has_version {
    return Err(Error::MissingVersion);
  }

  Ok(Card {
    full_name: full_name.ok_or(Error::MissingFullName)?,
    optional,
    birthday,
    anniversary,
  })
}

fn date_from(prop: &Property) -> CardDate {
  CardDate::from_value(prop.values.first().map(String::as_str).unwrap_or_default())
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  // ── Envelope ───────────────────────────────────────────────────────────────

  #[test]
  fn missing_envelope_returns_error() {
    let r = parse_card("VERSION:4.0\r\nFN:Alice\r\n");
    assert!(matches!(r, Err(Error::MissingEnvelope)));
  }

  #[test]
  fn missing_end_returns_error() {
    let r = parse_card("BEGIN:VCARD\r\nVERSION:4.0\r\nFN:Alice\r\n");
    assert!(matches!(r, Err(Error::MissingEnvelope)));
  }

  #[test]
  fn missing_version_returns_error() {
    let r = parse_card("BEGIN:VCARD\r\nFN:Alice\r\nEND:VCARD\r\n");
    assert!(matches!(r, Err(Error::MissingVersion)));
  }

  #[test]
  fn missing_fn_returns_error() {
    let r = parse_card("BEGIN:VCARD\r\nVERSION:4.0\r\nN:Smith;Alice;;;\r\nEND:VCARD\r\n");
    assert!(matches!(r, Err(Error::MissingFullName)));
  }

  #[test]
  fn empty_fn_returns_error() {
    let r = parse_card("BEGIN:VCARD\r\nVERSION:4.0\r\nFN:\r\nEND:VCARD\r\n");
    assert!(matches!(r, Err(Error::EmptyFullName)));
  }

  #[test]
  fn malformed_line_returns_error() {
    let r = parse_card("BEGIN:VCARD\r\nVERSION:4.0\r\nFN:A\r\ngarbage\r\nEND:VCARD\r\n");
    assert!(matches!(r, Err(Error::MalformedContentLine(_))));
  }

  // ── Properties ─────────────────────────────────────────────────────────────

  #[test]
  fn fn_only_card() {
    let card = parse_card("BEGIN:VCARD\r\nVERSION:4.0\r\nFN:Alice Smith\r\nEND:VCARD\r\n")
      .unwrap();
    assert_eq!(card.full_name(), "Alice Smith");
    assert!(card.optional.is_empty());
    assert!(card.birthday.is_none());
    assert!(card.anniversary.is_none());
  }

  #[test]
  fn group_params_and_values() {
    let card = parse_card(
      "BEGIN:VCARD\r\nVERSION:4.0\r\nFN:A\r\nitem1.tel;TYPE=\"work,voice\";PREF=1:\
       +1-555;ext=102\r\nEND:VCARD\r\n",
    )
    .unwrap();
    let tel = &card.optional[0];
    assert_eq!(tel.group.as_deref(), Some("item1"));
    assert_eq!(tel.name, "TEL");
    assert_eq!(tel.params[0], Param {
      name:  "TYPE".into(),
      value: "\"work,voice\"".into(),
    });
    assert_eq!(tel.params[1].name, "PREF");
    assert_eq!(tel.values, vec!["+1-555", "ext=102"]);
  }

  #[test]
  fn escaped_separators_are_unescaped() {
    let card = parse_card(
      "BEGIN:VCARD\r\nVERSION:4.0\r\nFN:Doe\\, Jane\r\nNOTE:a\\;b\\nc\r\nEND:VCARD\r\n",
    )
    .unwrap();
    assert_eq!(card.full_name(), "Doe, Jane");
    assert_eq!(card.optional[0].values, vec!["a;b\nc"]);
  }

  #[test]
  fn dates_are_lifted_out_of_optional() {
    let card = parse_card(
      "BEGIN:VCARD\r\nVERSION:4.0\r\nFN:A\r\nBDAY:19540203T123000Z\r\n\
       ANNIVERSARY;VALUE=text:circa 1800\r\nEND:VCARD\r\n",
    )
    .unwrap();
    assert!(card.optional.is_empty());
    assert_eq!(
      card.birthday.unwrap().to_value(),
      "19540203T123000Z"
    );
    assert_eq!(
      card.anniversary,
      Some(CardDate::Text("circa 1800".into()))
    );
  }

  #[test]
  fn second_fn_is_kept_as_optional() {
    let card = parse_card(
      "BEGIN:VCARD\r\nVERSION:4.0\r\nFN:First\r\nFN:Second\r\nEND:VCARD\r\n",
    )
    .unwrap();
    assert_eq!(card.full_name(), "First");
    assert_eq!(card.optional.len(), 1);
    assert_eq!(card.optional[0].name, "FN");
  }

  #[test]
  fn folded_lines_unfolded_correctly() {
    let card = parse_card(
      "BEGIN:VCARD\r\nVERSION:4.0\r\nFN:Alice \r\n Smith\r\nEND:VCARD\r\n",
    )
    .unwrap();
    assert_eq!(card.full_name(), "Alice Smith");
  }

  #[test]
  fn bare_lf_line_endings() {
    let card = parse_card("BEGIN:VCARD\nVERSION:3.0\nFN:Alice\nEND:VCARD\n").unwrap();
    assert_eq!(card.full_name(), "Alice");
  }
}
