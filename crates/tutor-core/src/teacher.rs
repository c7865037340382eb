//! Teachers and the commands that create or edit them.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{id::TeacherId, language::Language};

/// A stored teacher. `deleted` is the soft-delete flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Teacher {
  pub id:         TeacherId,
  pub first_name: String,
  pub last_name:  String,
  pub languages:  BTreeSet<Language>,
  pub deleted:    bool,
}

impl Teacher {
  pub fn is_active(&self) -> bool { !self.deleted }
}

/// Input to [`SchedulingStore::insert_teacher`](crate::store::SchedulingStore::insert_teacher).
#[derive(Debug, Clone)]
pub struct NewTeacher {
  pub first_name: String,
  pub last_name:  String,
  pub languages:  BTreeSet<Language>,
}

/// Body of a teacher create or full update.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct TeacherInput {
  #[serde(default)]
  #[validate(
    length(min = 1, message = "first name cannot be blank"),
    custom(
      function = "crate::validate::name_pattern",
      message = "first name has to match the pattern"
    )
  )]
  pub first_name: String,

  #[serde(default)]
  #[validate(
    length(min = 1, message = "last name cannot be blank"),
    custom(
      function = "crate::validate::name_pattern",
      message = "last name has to match the pattern"
    )
  )]
  pub last_name: String,

  #[serde(default)]
  #[validate(custom(
    function = "crate::validate::non_empty_languages",
    message = "language list cannot be empty"
  ))]
  pub languages: BTreeSet<Language>,
}

impl From<TeacherInput> for NewTeacher {
  fn from(i: TeacherInput) -> Self {
    NewTeacher {
      first_name: i.first_name,
      last_name:  i.last_name,
      languages:  i.languages,
    }
  }
}

/// Body of a languages-only update.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateLanguages {
  #[serde(default)]
  #[validate(custom(
    function = "crate::validate::non_empty_languages",
    message = "language list cannot be empty"
  ))]
  pub languages: BTreeSet<Language>,
}
