//! vCard 4.0 serializer.
//!
//! Produces CRLF line endings and folds at 75 octets per RFC 6350 §3.2.

use crate::{Card, Property};

// ─── RFC 6350 line folding ────────────────────────────────────────────────────

/// Emit `s` as one logical line, folding at 75 octets with CRLF + SP continuation.
pub(crate) fn fold_line(s: &str) -> String {
  if s.len() <= 75 {
    return format!("{}\r\n", s);
  }

  let mut result = String::new();
  let total = s.len();
  let mut pos = 0usize;
  let mut first = true;

  while pos < total {
    let limit = if first { 75 } else { 74 };
    let end   = if pos + limit >= total {
      total
    } else {
      // Walk back to the nearest valid UTF-8 char boundary
      let mut e = pos + limit;
      while e > pos && !s.is_char_boundary(e) {
        e -= 1;
      }
      // Guarantee at least one byte per segment
      if e == pos { pos + 1 } else { e }
    };

    if !first {
      result.push(' ');
    }
    result.push_str(&s[pos..end]);
    result.push_str("\r\n");
    pos   = end;
    first = false;
  }

  result
}

// ─── Value escaping ───────────────────────────────────────────────────────────

/// Escape one `;`-delimited component: `\`, `;`, `,`, `\n`.
fn escape_component(s: &str) -> String {
  s.replace('\\', "\\\\")
   .replace(';', "\\;")
   .replace(',', "\\,")
   .replace('\n', "\\n")
}

fn content_line(prop: &Property) -> String {
  let mut line = String::new();
  if let Some(group) = &prop.group {
    line.push_str(group);
    line.push('.');
  }
  line.push_str(&prop.name);
  for param in &prop.params {
    line.push(';');
    line.push_str(&param.name);
    line.push('=');
    line.push_str(&param.value);
  }
  line.push(':');
  let values: Vec<String> = prop.values.iter().map(|v| escape_component(v)).collect();
  line.push_str(&values.join(";"));
  line
}

// ─── Public entry point ──────────────────────────────────────────────────────

/// Serialize `card` as a vCard 4.0 string.
///
/// Property order: `VERSION`, `FN`, optional properties in stored order,
/// `BDAY`, `ANNIVERSARY`.
pub fn serialize_card(card: &Card) -> String {
  let mut out = String::new();
  out.push_str(&fold_line("BEGIN:VCARD"));
  out.push_str(&fold_line("VERSION:4.0"));
  out.push_str(&fold_line(&content_line(&card.full_name)));

  for prop in &card.optional {
    out.push_str(&fold_line(&content_line(prop)));
  }

  if let Some(birthday) = &card.birthday {
    out.push_str(&fold_line(&format!("BDAY:{}", birthday.to_value())));
  }
  if let Some(anniversary) = &card.anniversary {
    out.push_str(&fold_line(&format!("ANNIVERSARY:{}", anniversary.to_value())));
  }

  out.push_str(&fold_line("END:VCARD"));
  out
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{CardDate, Param, parse_card};

  #[test]
  fn short_line_not_folded() {
    assert_eq!(fold_line("FN:Alice"), "FN:Alice\r\n");
  }

  #[test]
  fn long_line_folded_at_75_octets() {
    let long = format!("NOTE:{}", "x".repeat(100));
    let folded = fold_line(&long);
    let lines: Vec<&str> = folded.trim_end_matches("\r\n").split("\r\n").collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].len(), 75);
    assert!(lines[1].starts_with(' '));
  }

  #[test]
  fn minimal_card_layout() {
    let out = serialize_card(&Card::new("Jane Doe"));
    assert_eq!(
      out,
      "BEGIN:VCARD\r\nVERSION:4.0\r\nFN:Jane Doe\r\nEND:VCARD\r\n"
    );
  }

  #[test]
  fn full_card_survives_reparse() {
    let mut card = Card::new("Doe, Jane");
    card.optional.push(Property {
      group:  Some("item1".into()),
      name:   "TEL".into(),
      params: vec![Param {
        name:  "TYPE".into(),
        value: "cell".into(),
      }],
      values: vec!["555-1234".into()],
    });
    card.optional.push(Property::single("NOTE", &"long note ".repeat(20)));
    card.birthday = Some(CardDate::from_value("19900101T101010Z"));
    card.anniversary = Some(CardDate::Text("circa 1800".into()));

    let reparsed = parse_card(&serialize_card(&card)).unwrap();
    assert_eq!(reparsed, card);
  }
}
