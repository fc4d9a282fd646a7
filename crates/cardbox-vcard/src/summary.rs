//! Human-readable card summaries.
//!
//! The layout is the contract with `cardbox-summary`: block labels on their
//! own line, property records introduced by `Name:`, list items as indented
//! `- ` bullets, and `NULL` for an absent date.

use std::fmt::Write as _;

use crate::{Card, CardDate, Property};

const BULLET_INDENT: &str = "     - ";

fn render_property(out: &mut String, prop: &Property) {
  let _ = writeln!(out, "Name: {}", prop.name);

  if !prop.params.is_empty() {
    out.push_str("Parameters:\n");
    for param in &prop.params {
      let _ = writeln!(out, "{BULLET_INDENT}{} = {}", param.name, param.value);
    }
  }

  out.push_str("Values:\n");
  for value in &prop.values {
    let _ = writeln!(out, "{BULLET_INDENT}{value}");
  }
}

fn render_date(out: &mut String, label: &str, date: Option<&CardDate>) {
  match date {
    Some(date) => {
      let _ = write!(out, "{label}:\n{}\n\n", date.to_value());
    }
    None => {
      let _ = write!(out, "{label}: NULL\n\n");
    }
  }
}

/// Render `card` as summary text.
pub fn render_summary(card: &Card) -> String {
  let mut out = String::new();

  out.push_str("Full Name:\n");
  render_property(&mut out, &card.full_name);
  out.push_str("\n\n");

  out.push_str("\n---Optional Properties---\n");
  for prop in &card.optional {
    render_property(&mut out, prop);
    out.push('\n');
  }

  render_date(&mut out, "Birthday", card.birthday.as_ref());
  render_date(&mut out, "Anniversary", card.anniversary.as_ref());

  out.push_str("\n---End of Card---\n");
  out
}
