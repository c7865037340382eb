//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Terms are stored as a pair of integers, whole seconds since the Unix epoch
//! and the sub-second nanoseconds, so `(term_secs, term_nanos)` compares in
//! time order for every representable date. A teacher's language set is
//! stored as a compact JSON array.

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDateTime};
use tutor_core::{
  id::{LessonId, StudentId, TeacherId},
  language::Language,
  lesson::Lesson,
  student::Student,
  teacher::Teacher,
};

use crate::{Error, Result};

// ─── Terms ───────────────────────────────────────────────────────────────────

/// `(seconds, nanoseconds)` of `t` read as UTC wall time.
pub fn encode_term(t: NaiveDateTime) -> (i64, i64) {
  let utc = t.and_utc();
  (utc.timestamp(), i64::from(utc.timestamp_subsec_nanos()))
}

pub fn decode_term(secs: i64, nanos: i64) -> Result<NaiveDateTime> {
  u32::try_from(nanos)
    .ok()
    .and_then(|n| DateTime::from_timestamp(secs, n))
    .map(|dt| dt.naive_utc())
    .ok_or_else(|| Error::DateParse(format!("{secs}s + {nanos}ns is out of range")))
}

// ─── Languages ───────────────────────────────────────────────────────────────

pub fn encode_language(l: Language) -> &'static str { l.as_str() }

pub fn decode_language(s: &str) -> Result<Language> {
  Language::from_name(s).ok_or_else(|| Error::UnknownLanguage(s.to_owned()))
}

pub fn encode_languages(langs: &BTreeSet<Language>) -> Result<String> {
  Ok(serde_json::to_string(langs)?)
}

pub fn decode_languages(s: &str) -> Result<BTreeSet<Language>> { Ok(serde_json::from_str(s)?) }

// ─── Row types ───────────────────────────────────────────────────────────────

pub const TEACHER_COLUMNS: &str = "teacher_id, first_name, last_name, languages, deleted";
pub const STUDENT_COLUMNS: &str =
  "student_id, first_name, last_name, language, teacher_id, deleted";
pub const LESSON_COLUMNS: &str =
  "lesson_id, teacher_id, student_id, term_secs, term_nanos, deleted";

/// Raw values read directly from a `teachers` row.
pub struct RawTeacher {
  pub teacher_id: i64,
  pub first_name: String,
  pub last_name:  String,
  pub languages:  String,
  pub deleted:    bool,
}

impl RawTeacher {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      teacher_id: row.get(0)?,
      first_name: row.get(1)?,
      last_name:  row.get(2)?,
      languages:  row.get(3)?,
      deleted:    row.get(4)?,
    })
  }

  pub fn into_teacher(self) -> Result<Teacher> {
    Ok(Teacher {
      id:         TeacherId(self.teacher_id),
      first_name: self.first_name,
      last_name:  self.last_name,
      languages:  decode_languages(&self.languages)?,
      deleted:    self.deleted,
    })
  }
}

/// Raw values read directly from a `students` row.
pub struct RawStudent {
  pub student_id: i64,
  pub first_name: String,
  pub last_name:  String,
  pub language:   String,
  pub teacher_id: i64,
  pub deleted:    bool,
}

impl RawStudent {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      student_id: row.get(0)?,
      first_name: row.get(1)?,
      last_name:  row.get(2)?,
      language:   row.get(3)?,
      teacher_id: row.get(4)?,
      deleted:    row.get(5)?,
    })
  }

  pub fn into_student(self) -> Result<Student> {
    Ok(Student {
      id:         StudentId(self.student_id),
      first_name: self.first_name,
      last_name:  self.last_name,
      language:   decode_language(&self.language)?,
      teacher_id: TeacherId(self.teacher_id),
      deleted:    self.deleted,
    })
  }
}

/// Raw values read directly from a `lessons` row.
pub struct RawLesson {
  pub lesson_id:  i64,
  pub teacher_id: i64,
  pub student_id: i64,
  pub term_secs:  i64,
  pub term_nanos: i64,
  pub deleted:    bool,
}

impl RawLesson {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      lesson_id:  row.get(0)?,
      teacher_id: row.get(1)?,
      student_id: row.get(2)?,
      term_secs:  row.get(3)?,
      term_nanos: row.get(4)?,
      deleted:    row.get(5)?,
    })
  }

  pub fn into_lesson(self) -> Result<Lesson> {
    Ok(Lesson {
      id:         LessonId(self.lesson_id),
      teacher_id: TeacherId(self.teacher_id),
      student_id: StudentId(self.student_id),
      term:       decode_term(self.term_secs, self.term_nanos)?,
      deleted:    self.deleted,
    })
  }
}
