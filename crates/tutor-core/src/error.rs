//! Error types for `tutor-core`.

use std::fmt;

use chrono::NaiveDateTime;
use serde::Serialize;
use thiserror::Error;

use crate::{id::TeacherId, validate::Violation};

/// Which entity a [`Error::NotFound`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EntityKind {
  Teacher,
  Student,
  Lesson,
}

impl fmt::Display for EntityKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Self::Teacher => "Teacher",
      Self::Student => "Student",
      Self::Lesson => "Lesson",
    })
  }
}

/// Why a lesson term was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TermRejection {
  /// The proposed term is not strictly after the current time.
  #[error("Invalid date {0}")]
  NotInFuture(NaiveDateTime),

  /// The teacher already has an active lesson inside the conflict window.
  #[error("Invalid date {0}")]
  Conflict(NaiveDateTime),

  /// The lesson has already taken place and cannot be cancelled.
  #[error("The term is in the past")]
  PastTerm,
}

#[derive(Debug, Error)]
pub enum Error {
  #[error("{kind} with id={id} has not been found")]
  NotFound { kind: EntityKind, id: i64 },

  #[error(transparent)]
  InvalidTerm(#[from] TermRejection),

  /// The student's language is not taught by the teacher.
  #[error("Wrong teacher {0}")]
  InvalidTeacherAssignment(TeacherId),

  #[error("Validation errors")]
  Validation(Vec<Violation>),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub fn not_found(kind: EntityKind, id: impl Into<i64>) -> Self {
    Self::NotFound { kind, id: id.into() }
  }

  /// Wrap a backend error.
  pub fn store<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(err))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;

  use super::*;

  #[test]
  fn not_found_message_names_kind_and_id() {
    let err = Error::not_found(EntityKind::Teacher, 100);
    assert_eq!(err.to_string(), "Teacher with id=100 has not been found");
  }

  #[test]
  fn term_rejections_carry_the_literal_term() {
    let term = NaiveDate::from_ymd_opt(2030, 1, 2)
      .unwrap()
      .and_hms_opt(10, 30, 0)
      .unwrap();
    let err = Error::from(TermRejection::Conflict(term));
    assert_eq!(err.to_string(), "Invalid date 2030-01-02 10:30:00");
    assert_eq!(
      Error::from(TermRejection::PastTerm).to_string(),
      "The term is in the past"
    );
  }
}
