//! Summary-text parser.
//!
//! Pipeline:
//!   raw &str
//!     └─ str::lines() + trim
//!          └─ classify()      → Line
//!               └─ State::step() → accumulate fields
//!
//! A summary is a sequence of labelled blocks:
//!
//! ```text
//! Full Name:
//! Name: FN
//! Values:
//!      - Jane Doe
//!
//! ---Optional Properties---
//! Name: TEL
//! Values:
//!      - 555-1234
//!
//! Birthday:
//! 19900101
//!
//! Anniversary: NULL
//!
//! ---End of Card---
//! ```

use crate::ParsedSummary;

// ─── Markers ─────────────────────────────────────────────────────────────────

const FULL_NAME_LABEL: &str = "Full Name:";
const BIRTHDAY_LABEL: &str = "Birthday:";
const ANNIVERSARY_LABEL: &str = "Anniversary:";
const OPTIONAL_MARKER: &str = "---Optional Properties---";
const END_MARKER: &str = "---End of Card---";
const SECTION_PREFIX: &str = "---";
const NAME_SUBLABEL: &str = "Name:";
const PARAMETERS_SUBLABEL: &str = "Parameters:";
const VALUES_SUBLABEL: &str = "Values:";
const BULLET: &str = "- ";

// ─── Line classification ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Line<'a> {
  FullNameLabel,
  BirthdayLabel,
  AnniversaryLabel,
  OptionalMarker,
  EndMarker,
  /// Any other `---` section line.
  Section,
  /// `Name:`, which also starts each property record.
  NameSublabel,
  ParametersSublabel,
  ValuesSublabel,
  /// `- value`; `value` is the trimmed remainder, `line` the whole line.
  Bullet { line: &'a str, value: &'a str },
  Blank,
  Text(&'a str),
}

/// Classify one already-trimmed line.
fn classify(line: &str) -> Line<'_> {
  if line.is_empty() {
    Line::Blank
  } else if line.starts_with(FULL_NAME_LABEL) {
    Line::FullNameLabel
  } else if line.starts_with(BIRTHDAY_LABEL) {
    Line::BirthdayLabel
  } else if line.starts_with(ANNIVERSARY_LABEL) {
    Line::AnniversaryLabel
  } else if line.starts_with(OPTIONAL_MARKER) {
    Line::OptionalMarker
  } else if line.starts_with(END_MARKER) {
    Line::EndMarker
  } else if line.starts_with(SECTION_PREFIX) {
    Line::Section
  } else if line.starts_with(NAME_SUBLABEL) {
    Line::NameSublabel
  } else if line.starts_with(PARAMETERS_SUBLABEL) {
    Line::ParametersSublabel
  } else if line.starts_with(VALUES_SUBLABEL) {
    Line::ValuesSublabel
  } else if let Some(rest) = line.strip_prefix(BULLET) {
    Line::Bullet { line, value: rest.trim() }
  } else {
    Line::Text(line)
  }
}

// ─── State machine ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum State {
  #[default]
  Idle,
  /// Inside the Full Name block, waiting for its first value bullet.
  AwaitingName,
  /// Inside the Full Name block's parameter list; bullets here are not names.
  SkippingNameParams,
  /// The next line is the birthday value, if it carries one.
  AwaitingBirthday,
  /// The next line is the anniversary value, if it carries one.
  AwaitingAnniversary,
  /// Inside the optional-properties section.
  CountingExtras,
}

#[derive(Default)]
struct Fields {
  full_name:   String,
  birthday:    String,
  anniversary: String,
  extras:      usize,
}

impl State {
  /// Consume one line and return the next state.
  ///
  /// Block labels and section markers take effect from every state, so a
  /// pending lookahead never swallows the label that follows it.
  fn step(self, line: Line<'_>, fields: &mut Fields) -> State {
    match line {
      Line::FullNameLabel => return State::AwaitingName,
      Line::BirthdayLabel => return State::AwaitingBirthday,
      Line::AnniversaryLabel => return State::AwaitingAnniversary,
      Line::OptionalMarker => return State::CountingExtras,
      Line::EndMarker => return State::Idle,
      _ => {}
    }

    match self {
      State::Idle => State::Idle,

      State::AwaitingName => match line {
        Line::Bullet { value, .. } => {
          fields.full_name = value.to_string();
          State::Idle
        }
        Line::ParametersSublabel => State::SkippingNameParams,
        Line::Blank | Line::Section => State::Idle,
        _ => State::AwaitingName,
      },

      State::SkippingNameParams => match line {
        Line::ValuesSublabel => State::AwaitingName,
        Line::Blank | Line::Section => State::Idle,
        _ => State::SkippingNameParams,
      },

      State::AwaitingBirthday => {
        if let Some(value) = lookahead_value(line) {
          fields.birthday = value.to_string();
        }
        State::Idle
      }

      State::AwaitingAnniversary => {
        if let Some(value) = lookahead_value(line) {
          fields.anniversary = value.to_string();
        }
        State::Idle
      }

      State::CountingExtras => {
        if line == Line::NameSublabel {
          fields.extras += 1;
        }
        State::CountingExtras
      }
    }
  }
}

/// The value carried by the line after a Birthday/Anniversary label.
///
/// Taken verbatim, bullet dash included. Blank lines and structural lines
/// carry none.
fn lookahead_value(line: Line<'_>) -> Option<&str> {
  match line {
    Line::Text(text) => Some(text),
    Line::Bullet { line, .. } => Some(line),
    _ => None,
  }
}

// ─── Public entry point ──────────────────────────────────────────────────────

/// Extract the main fields from a card summary.
///
/// Never fails: malformed or missing blocks leave the corresponding field
/// empty. An empty `full_name` marks the summary as non-viable.
pub fn parse(summary: &str) -> ParsedSummary {
  let mut fields = Fields::default();
  let mut state = State::default();

  for raw in summary.lines() {
    state = state.step(classify(raw.trim()), &mut fields);
  }

  ParsedSummary {
    full_name:            fields.full_name,
    birthday:             fields.birthday,
    anniversary:          fields.anniversary,
    extra_property_count: fields.extras,
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  const FULL_SUMMARY: &str = "Full Name:\n\
Name: FN\n\
Values:\n\
     - Simon Perreault\n\
\n\
\n\
\n\
---Optional Properties---\n\
Name: N\n\
Values:\n\
     - Perreault\n\
     - Simon\n\
\n\
Name: TEL\n\
Parameters:\n\
     - VALUE = uri\n\
     - TYPE = \"work,voice\"\n\
Values:\n\
     - tel:+1-418-656-9254;ext=102\n\
\n\
Name: EMAIL\n\
Parameters:\n\
     - TYPE = work\n\
Values:\n\
     - simon.perreault@viagenie.ca\n\
\n\
Birthday:\n\
--0203\n\
\n\
Anniversary:\n\
20090808T1430-0500\n\
\n\
\n\
---End of Card---\n";

  // ── Full name ──────────────────────────────────────────────────────────────

  #[test]
  fn worked_example() {
    let parsed =
      parse("Full Name:\n- Jane Doe\nBirthday:\n2021-05-01T10:00:00Z\n");
    assert_eq!(parsed, ParsedSummary {
      full_name:            "Jane Doe".into(),
      birthday:             "2021-05-01T10:00:00Z".into(),
      anniversary:          String::new(),
      extra_property_count: 0,
    });
  }

  #[test]
  fn name_bullet_after_sublabels() {
    let parsed = parse(FULL_SUMMARY);
    assert_eq!(parsed.full_name, "Simon Perreault");
    assert!(parsed.is_viable());
  }

  #[test]
  fn name_bullet_remainder_is_trimmed() {
    let parsed = parse("Full Name:\nValues:\n     -    Spaced Out   \n");
    assert_eq!(parsed.full_name, "Spaced Out");
  }

  #[test]
  fn missing_bullet_leaves_name_empty() {
    let parsed = parse("Full Name:\nName: FN\nValues:\n\n- Too Late\n");
    assert_eq!(parsed.full_name, "");
    assert!(!parsed.is_viable());
  }

  #[test]
  fn null_full_name_is_not_viable() {
    let parsed = parse("Full Name: NULL\n\n\n---Optional Properties---\n");
    assert_eq!(parsed.full_name, "");
  }

  #[test]
  fn optional_marker_disarms_name_block() {
    let parsed = parse(
      "Full Name:\nName: FN\n---Optional Properties---\nName: NOTE\nValues:\n     - \
       not a name\n",
    );
    assert_eq!(parsed.full_name, "");
    assert_eq!(parsed.extra_property_count, 1);
  }

  #[test]
  fn only_first_bullet_is_used() {
    let parsed = parse("Full Name:\nValues:\n- First\n- Second\n");
    assert_eq!(parsed.full_name, "First");
  }

  #[test]
  fn name_parameters_are_not_names() {
    let parsed = parse(
      "Full Name:\nName: FN\nParameters:\n     - LANGUAGE = en\n     - PREF = 1\nValues:\n     \
       - Jane Doe\n\n",
    );
    assert_eq!(parsed.full_name, "Jane Doe");
  }

  #[test]
  fn name_parameters_without_values_leave_name_empty() {
    let parsed = parse("Full Name:\nName: FN\nParameters:\n     - LANGUAGE = en\n\n");
    assert_eq!(parsed.full_name, "");
  }

  #[test]
  fn non_bullet_text_does_not_disarm_name_block() {
    let parsed = parse("Full Name:\nsomething odd\n- Jane\n");
    assert_eq!(parsed.full_name, "Jane");
  }

  // ── Dates ──────────────────────────────────────────────────────────────────

  #[test]
  fn birthday_and_anniversary_taken_verbatim() {
    let parsed = parse(FULL_SUMMARY);
    assert_eq!(parsed.birthday, "--0203");
    assert_eq!(parsed.anniversary, "20090808T1430-0500");
  }

  #[test]
  fn null_date_labels_yield_empty_values() {
    let parsed = parse(
      "Full Name:\n- Jane\n\nBirthday: NULL\n\nAnniversary: NULL\n\n\n---End of \
       Card---\n",
    );
    assert_eq!(parsed.birthday, "");
    assert_eq!(parsed.anniversary, "");
  }

  #[test]
  fn null_value_line_is_kept_for_the_caller() {
    let parsed = parse("Birthday:\nNULL\n");
    assert_eq!(parsed.birthday, "NULL");
  }

  #[test]
  fn date_lookahead_is_single_line() {
    let parsed = parse("Birthday:\n\n19900101\n");
    assert_eq!(parsed.birthday, "");
  }

  #[test]
  fn date_lookahead_skips_section_lines() {
    let parsed = parse("Anniversary:\n---End of Card---\n");
    assert_eq!(parsed.anniversary, "");
  }

  #[test]
  fn pending_lookahead_does_not_swallow_next_label() {
    let parsed = parse("Birthday:\nAnniversary:\n20000101\n");
    assert_eq!(parsed.birthday, "");
    assert_eq!(parsed.anniversary, "20000101");
  }

  #[test]
  fn bullet_date_line_is_kept_whole() {
    let parsed = parse("Birthday:\n- 1990\nAnniversary:\n   -   2001  \n");
    assert_eq!(parsed.birthday, "- 1990");
    assert_eq!(parsed.anniversary, "-   2001");
  }

  #[test]
  fn text_dates_are_kept() {
    let parsed = parse("Birthday:\ncirca 1800\n");
    assert_eq!(parsed.birthday, "circa 1800");
  }

  // ── Extra properties ───────────────────────────────────────────────────────

  #[test]
  fn counts_each_optional_property_once() {
    assert_eq!(parse(FULL_SUMMARY).extra_property_count, 3);
  }

  #[test]
  fn no_optional_properties() {
    let parsed = parse(
      "Full Name:\nName: FN\nValues:\n     - Jane\n\n\n---Optional \
       Properties---\nBirthday: NULL\n",
    );
    assert_eq!(parsed.extra_property_count, 0);
  }

  #[test]
  fn fn_name_sublabel_is_not_counted() {
    let parsed = parse("Full Name:\nName: FN\nValues:\n- Jane\n");
    assert_eq!(parsed.extra_property_count, 0);
  }

  #[test]
  fn counting_stops_at_end_marker() {
    let parsed =
      parse("---Optional Properties---\nName: TEL\n---End of Card---\nName: X\n");
    assert_eq!(parsed.extra_property_count, 1);
  }

  // ── Robustness ─────────────────────────────────────────────────────────────

  #[test]
  fn empty_and_garbage_input() {
    assert_eq!(parse(""), ParsedSummary::default());
    assert_eq!(
      parse("Error: Invalid file\n"),
      ParsedSummary::default()
    );
  }

  #[test]
  fn crlf_line_endings() {
    let parsed = parse("Full Name:\r\n- Jane Doe\r\nBirthday:\r\n19900101\r\n");
    assert_eq!(parsed.full_name, "Jane Doe");
    assert_eq!(parsed.birthday, "19900101");
  }
}
