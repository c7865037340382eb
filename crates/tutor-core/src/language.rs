//! Taught languages and the student/teacher compatibility rule.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{Error, Result, id::TeacherId};

/// A programming language a teacher can teach and a student can study.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Language {
  C,
  Java,
  Js,
  Kobol,
  Python,
}

impl Language {
  pub const ALL: [Language; 5] =
    [Self::C, Self::Java, Self::Js, Self::Kobol, Self::Python];

  /// The upper-case wire name, e.g. `"JAVA"`.
  pub fn as_str(self) -> &'static str {
    match self {
      Self::C => "C",
      Self::Java => "JAVA",
      Self::Js => "JS",
      Self::Kobol => "KOBOL",
      Self::Python => "PYTHON",
    }
  }

  pub fn from_name(s: &str) -> Option<Self> {
    Self::ALL.into_iter().find(|l| l.as_str() == s)
  }
}

/// True iff `student_language` is one of `teacher_languages`.
pub fn is_compatible(teacher_languages: &BTreeSet<Language>, student_language: Language) -> bool {
  teacher_languages.contains(&student_language)
}

/// [`is_compatible`], raising [`Error::InvalidTeacherAssignment`] on mismatch.
pub fn ensure_compatible(
  teacher_id: TeacherId,
  teacher_languages: &BTreeSet<Language>,
  student_language: Language,
) -> Result<()> {
  if is_compatible(teacher_languages, student_language) {
    Ok(())
  } else {
    Err(Error::InvalidTeacherAssignment(teacher_id))
  }
}
