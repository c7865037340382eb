//! Students and the commands that create, edit or reassign them.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
  id::{StudentId, TeacherId},
  language::Language,
};

/// A stored student. Each student studies one language with one teacher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
  pub id:         StudentId,
  pub first_name: String,
  pub last_name:  String,
  pub language:   Language,
  pub teacher_id: TeacherId,
  pub deleted:    bool,
}

impl Student {
  pub fn is_active(&self) -> bool { !self.deleted }
}

/// Input to [`SchedulingStore::insert_student`](crate::store::SchedulingStore::insert_student).
#[derive(Debug, Clone)]
pub struct NewStudent {
  pub first_name: String,
  pub last_name:  String,
  pub language:   Language,
  pub teacher_id: TeacherId,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateStudent {
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
  #[validate(required(message = "language cannot be null"))]
  pub language: Option<Language>,

  #[serde(default)]
  #[validate(range(min = 1, message = "teacher id must be equal to or greater than 1"))]
  pub teacher_id: i64,
}

/// Body of a student update; the teacher link is changed separately via
/// [`ReassignTeacher`].
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateStudent {
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
  #[validate(required(message = "language cannot be null"))]
  pub language: Option<Language>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ReassignTeacher {
  #[serde(default)]
  #[validate(range(min = 1, message = "teacher id must be equal to or greater than 1"))]
  pub teacher_id: i64,
}
