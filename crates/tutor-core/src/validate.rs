//! Field-level input rules shared by the command types.
//!
//! Commands derive [`validator::Validate`]; [`check`] turns every failed rule
//! into a [`Violation`] so callers see all problems at once.

use std::collections::BTreeSet;

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::{Error, Result, language::Language};

/// A single failed field rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
  pub field:   String,
  pub message: String,
}

/// Validate `command`, collecting all failures into [`Error::Validation`].
pub fn check(command: &impl Validate) -> Result<()> {
  command
    .validate()
    .map_err(|errors| Error::Validation(violations(&errors)))
}

/// Flatten `errors` into violations, ordered by field then message.
pub fn violations(errors: &ValidationErrors) -> Vec<Violation> {
  let mut out: Vec<Violation> = errors
    .field_errors()
    .iter()
    .flat_map(|(field, errs)| {
      errs.iter().map(move |e| Violation {
        field:   field.to_string(),
        message: e
          .message
          .as_ref()
          .map(|m| m.to_string())
          .unwrap_or_else(|| format!("{field} is invalid")),
      })
    })
    .collect();
  out.sort_by(|a, b| a.field.cmp(&b.field).then_with(|| a.message.cmp(&b.message)));
  out
}

// ─── Rules ───────────────────────────────────────────────────────────────────

/// Names are one capital ASCII letter followed by 1–20 lowercase ones.
pub fn name_pattern(name: &str) -> Result<(), ValidationError> {
  let mut chars = name.chars();
  let head_ok = chars.next().is_some_and(|c| c.is_ascii_uppercase());
  let rest = chars.as_str();
  let rest_ok =
    (1..=20).contains(&rest.len()) && rest.chars().all(|c| c.is_ascii_lowercase());

  if head_ok && rest_ok {
    Ok(())
  } else {
    Err(ValidationError::new("pattern"))
  }
}

pub fn non_empty_languages(languages: &BTreeSet<Language>) -> Result<(), ValidationError> {
  if languages.is_empty() {
    Err(ValidationError::new("not_empty"))
  } else {
    Ok(())
  }
}

// ─── Terms ───────────────────────────────────────────────────────────────────

const TERM_FORMATS: &[&str] = &[
  "%Y-%m-%dT%H:%M:%S%.f",
  "%Y-%m-%dT%H:%M",
  "%Y-%m-%d %H:%M:%S%.f",
  "%Y-%m-%d %H:%M",
];

/// Parse a lesson term from ISO-8601 or `yyyy-MM-dd HH:mm` text.
pub fn parse_term(s: &str) -> Result<NaiveDateTime, chrono::ParseError> {
  let s = s.trim();
  TERM_FORMATS
    .iter()
    .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
    .map_or_else(|| NaiveDateTime::parse_from_str(s, TERM_FORMATS[0]), Ok)
}

/// Serde adapter for an optional term field; absent and `null` both map to
/// `None` so the `required` rule can report it as a violation.
pub fn deserialize_optional_term<'de, D>(
  deserializer: D,
) -> Result<Option<NaiveDateTime>, D::Error>
where
  D: Deserializer<'de>,
{
  let opt: Option<String> = Option::deserialize(deserializer)?;
  opt
    .map(|s| parse_term(&s).map_err(serde::de::Error::custom))
    .transpose()
}
