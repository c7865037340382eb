//! The lifecycle manager: create/read/update/soft-delete across entities.
//!
//! Every mutating operation runs its checks in the same order:
//!
//! 1. field validation of the command,
//! 2. resolution of every referenced entity (`NotFound` otherwise),
//! 3. the business rule (language compatibility or term scheduling),
//! 4. persistence.
//!
//! Reads and deletes address any stored row, soft-deleted or not. Creating a
//! link to, or mutating, a soft-deleted row reports it as not found.

use std::sync::Arc;

use chrono::NaiveDateTime;
use tracing::instrument;

use crate::{
  EntityKind, Error, Result,
  id::{LessonId, StudentId, TeacherId},
  language::{Language, ensure_compatible},
  lesson::{CreateLesson, Lesson, NewLesson, UpdateLessonTerm},
  schedule::{Clock, SystemClock, ensure_not_past, ensure_term_acceptable},
  store::SchedulingStore,
  student::{CreateStudent, NewStudent, ReassignTeacher, Student, UpdateStudent},
  teacher::{Teacher, TeacherInput, UpdateLanguages},
  validate::{Violation, check},
};

pub struct LifecycleManager<S> {
  store: S,
  clock: Arc<dyn Clock>,
}

impl<S> LifecycleManager<S>
where
  S: SchedulingStore,
{
  /// A manager reading time from the local system clock.
  pub fn new(store: S) -> Self { Self::with_clock(store, Arc::new(SystemClock)) }

  pub fn with_clock(store: S, clock: Arc<dyn Clock>) -> Self { Self { store, clock } }

  pub fn store(&self) -> &S { &self.store }

  pub fn now(&self) -> NaiveDateTime { self.clock.now() }

  // ── Teachers ──────────────────────────────────────────────────────────

  #[instrument(skip(self))]
  pub async fn create_teacher(&self, input: TeacherInput) -> Result<Teacher> {
    check(&input)?;
    let teacher = self
      .store
      .insert_teacher(input.into())
      .await
      .map_err(Error::store)?;
    tracing::info!(teacher_id = %teacher.id, "teacher created");
    Ok(teacher)
  }

  #[instrument(level = "debug", skip(self))]
  pub async fn find_teacher(&self, id: TeacherId) -> Result<Teacher> {
    self
      .store
      .get_teacher(id)
      .await
      .map_err(Error::store)?
      .ok_or_else(|| Error::not_found(EntityKind::Teacher, id))
  }

  pub async fn active_teachers(&self) -> Result<Vec<Teacher>> {
    self.store.list_active_teachers().await.map_err(Error::store)
  }

  pub async fn active_teachers_by_language(&self, language: Language) -> Result<Vec<Teacher>> {
    self
      .store
      .list_active_teachers_by_language(language)
      .await
      .map_err(Error::store)
  }

  /// Replace names and languages. Existing students are not re-checked
  /// against the new language set.
  #[instrument(skip(self))]
  pub async fn update_teacher(&self, id: TeacherId, input: TeacherInput) -> Result<Teacher> {
    check(&input)?;
    let mut teacher = self.active_teacher(id).await?;
    teacher.first_name = input.first_name;
    teacher.last_name = input.last_name;
    teacher.languages = input.languages;
    self.store.update_teacher(teacher).await.map_err(Error::store)
  }

  #[instrument(skip(self))]
  pub async fn update_teacher_languages(
    &self,
    id: TeacherId,
    input: UpdateLanguages,
  ) -> Result<Teacher> {
    check(&input)?;
    let mut teacher = self.active_teacher(id).await?;
    teacher.languages = input.languages;
    self.store.update_teacher(teacher).await.map_err(Error::store)
  }

  #[instrument(skip(self))]
  pub async fn delete_teacher(&self, id: TeacherId) -> Result<()> {
    let found = self
      .store
      .soft_delete_teacher(id)
      .await
      .map_err(Error::store)?;
    if !found {
      return Err(Error::not_found(EntityKind::Teacher, id));
    }
    tracing::info!(teacher_id = %id, "teacher soft-deleted");
    Ok(())
  }

  // ── Students ──────────────────────────────────────────────────────────

  #[instrument(skip(self))]
  pub async fn create_student(&self, cmd: CreateStudent) -> Result<Student> {
    check(&cmd)?;
    let language = required(cmd.language, "language", "language cannot be null")?;
    let teacher = self.active_teacher(TeacherId(cmd.teacher_id)).await?;
    ensure_compatible(teacher.id, &teacher.languages, language)?;

    let student = self
      .store
      .insert_student(NewStudent {
        first_name: cmd.first_name,
        last_name: cmd.last_name,
        language,
        teacher_id: teacher.id,
      })
      .await
      .map_err(Error::store)?;
    tracing::info!(student_id = %student.id, teacher_id = %teacher.id, "student created");
    Ok(student)
  }

  #[instrument(level = "debug", skip(self))]
  pub async fn find_student(&self, id: StudentId) -> Result<Student> {
    self
      .store
      .get_student(id)
      .await
      .map_err(Error::store)?
      .ok_or_else(|| Error::not_found(EntityKind::Student, id))
  }

  pub async fn active_students(&self) -> Result<Vec<Student>> {
    self.store.list_active_students().await.map_err(Error::store)
  }

  pub async fn active_students_of_teacher(&self, teacher_id: TeacherId) -> Result<Vec<Student>> {
    let teacher = self.find_teacher(teacher_id).await?;
    self
      .store
      .list_active_students_by_teacher(teacher.id)
      .await
      .map_err(Error::store)
  }

  /// Replace names and language; the language must still be taught by the
  /// student's current teacher.
  #[instrument(skip(self))]
  pub async fn update_student(&self, id: StudentId, cmd: UpdateStudent) -> Result<Student> {
    check(&cmd)?;
    let language = required(cmd.language, "language", "language cannot be null")?;
    let mut student = self.active_student(id).await?;
    let teacher = self.find_teacher(student.teacher_id).await?;
    ensure_compatible(teacher.id, &teacher.languages, language)?;

    student.first_name = cmd.first_name;
    student.last_name = cmd.last_name;
    student.language = language;
    self.store.update_student(student).await.map_err(Error::store)
  }

  #[instrument(skip(self))]
  pub async fn reassign_student_teacher(
    &self,
    id: StudentId,
    cmd: ReassignTeacher,
  ) -> Result<Student> {
    check(&cmd)?;
    let mut student = self.active_student(id).await?;
    let teacher = self.active_teacher(TeacherId(cmd.teacher_id)).await?;
    ensure_compatible(teacher.id, &teacher.languages, student.language)?;

    student.teacher_id = teacher.id;
    let student = self.store.update_student(student).await.map_err(Error::store)?;
    tracing::info!(student_id = %student.id, teacher_id = %teacher.id, "student reassigned");
    Ok(student)
  }

  #[instrument(skip(self))]
  pub async fn delete_student(&self, id: StudentId) -> Result<()> {
    let found = self
      .store
      .soft_delete_student(id)
      .await
      .map_err(Error::store)?;
    if !found {
      return Err(Error::not_found(EntityKind::Student, id));
    }
    tracing::info!(student_id = %id, "student soft-deleted");
    Ok(())
  }

  // ── Lessons ───────────────────────────────────────────────────────────

  #[instrument(skip(self))]
  pub async fn create_lesson(&self, cmd: CreateLesson) -> Result<Lesson> {
    check(&cmd)?;
    let term = required(cmd.term, "term", "term cannot be null")?;
    let teacher = self.active_teacher(TeacherId(cmd.teacher_id)).await?;
    let student = self.active_student(StudentId(cmd.student_id)).await?;
    ensure_term_acceptable(&self.store, self.clock.as_ref(), teacher.id, term, None).await?;

    let lesson = self
      .store
      .insert_lesson(NewLesson {
        teacher_id: teacher.id,
        student_id: student.id,
        term,
      })
      .await
      .map_err(Error::store)?;
    tracing::info!(lesson_id = %lesson.id, %term, "lesson booked");
    Ok(lesson)
  }

  #[instrument(level = "debug", skip(self))]
  pub async fn find_lesson(&self, id: LessonId) -> Result<Lesson> {
    self
      .store
      .get_lesson(id)
      .await
      .map_err(Error::store)?
      .ok_or_else(|| Error::not_found(EntityKind::Lesson, id))
  }

  pub async fn active_lessons(&self) -> Result<Vec<Lesson>> {
    self.store.list_active_lessons().await.map_err(Error::store)
  }

  pub async fn active_lessons_of_teacher(&self, teacher_id: TeacherId) -> Result<Vec<Lesson>> {
    let teacher = self.find_teacher(teacher_id).await?;
    self
      .store
      .list_active_lessons_by_teacher(teacher.id)
      .await
      .map_err(Error::store)
  }

  /// Move a lesson to a new term. The check runs against the proposed term
  /// before the record changes, with the lesson itself excluded from the
  /// conflict query.
  #[instrument(skip(self))]
  pub async fn update_lesson_term(&self, id: LessonId, cmd: UpdateLessonTerm) -> Result<Lesson> {
    check(&cmd)?;
    let term = required(cmd.term, "term", "term cannot be null")?;
    let mut lesson = self.active_lesson(id).await?;
    ensure_term_acceptable(
      &self.store,
      self.clock.as_ref(),
      lesson.teacher_id,
      term,
      Some(lesson.id),
    )
    .await?;

    lesson.term = term;
    let lesson = self.store.update_lesson(lesson).await.map_err(Error::store)?;
    tracing::info!(lesson_id = %lesson.id, %term, "lesson rescheduled");
    Ok(lesson)
  }

  /// Cancel a lesson that has not started yet. Cancelling an already
  /// cancelled lesson succeeds whatever its term.
  #[instrument(skip(self))]
  pub async fn delete_lesson(&self, id: LessonId) -> Result<()> {
    let lesson = self.find_lesson(id).await?;
    if lesson.deleted {
      return Ok(());
    }
    ensure_not_past(lesson.term, self.clock.now())?;

    let found = self
      .store
      .soft_delete_lesson(lesson.id)
      .await
      .map_err(Error::store)?;
    if !found {
      return Err(Error::not_found(EntityKind::Lesson, id));
    }
    tracing::info!(lesson_id = %id, "lesson cancelled");
    Ok(())
  }

  // ── Resolution helpers ────────────────────────────────────────────────

  async fn active_teacher(&self, id: TeacherId) -> Result<Teacher> {
    let teacher = self.find_teacher(id).await?;
    if teacher.is_active() {
      Ok(teacher)
    } else {
      Err(Error::not_found(EntityKind::Teacher, id))
    }
  }

  async fn active_student(&self, id: StudentId) -> Result<Student> {
    let student = self.find_student(id).await?;
    if student.is_active() {
      Ok(student)
    } else {
      Err(Error::not_found(EntityKind::Student, id))
    }
  }

  async fn active_lesson(&self, id: LessonId) -> Result<Lesson> {
    let lesson = self.find_lesson(id).await?;
    if lesson.is_active() {
      Ok(lesson)
    } else {
      Err(Error::not_found(EntityKind::Lesson, id))
    }
  }
}

/// Unwrap a field the `required` rule has already checked.
fn required<T>(value: Option<T>, field: &str, message: &str) -> Result<T> {
  value.ok_or_else(|| {
    Error::Validation(vec![Violation {
      field:   field.to_owned(),
      message: message.to_owned(),
    }])
  })
}
