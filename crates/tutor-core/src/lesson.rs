//! Lessons: a teacher, a student, and a single point-in-time term.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::id::{LessonId, StudentId, TeacherId};

/// A stored lesson. There is no explicit duration; spacing between lessons
/// is governed by [`conflict_buffer`](crate::schedule::conflict_buffer).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
  pub id:         LessonId,
  pub teacher_id: TeacherId,
  pub student_id: StudentId,
  pub term:       NaiveDateTime,
  pub deleted:    bool,
}

impl Lesson {
  pub fn is_active(&self) -> bool { !self.deleted }
}

/// Input to [`SchedulingStore::insert_lesson`](crate::store::SchedulingStore::insert_lesson).
#[derive(Debug, Clone)]
pub struct NewLesson {
  pub teacher_id: TeacherId,
  pub student_id: StudentId,
  pub term:       NaiveDateTime,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateLesson {
  #[serde(default)]
  #[validate(range(min = 1, message = "teacher id must be equal to or greater than 1"))]
  pub teacher_id: i64,

  #[serde(default)]
  #[validate(range(min = 1, message = "student id must be equal to or greater than 1"))]
  pub student_id: i64,

  #[serde(default, deserialize_with = "crate::validate::deserialize_optional_term")]
  #[validate(required(message = "term cannot be null"))]
  pub term: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateLessonTerm {
  #[serde(default, deserialize_with = "crate::validate::deserialize_optional_term")]
  #[validate(required(message = "term cannot be null"))]
  pub term: Option<NaiveDateTime>,
}
