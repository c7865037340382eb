//! The `SchedulingStore` trait: persistence for teachers, students, lessons.
//!
//! The trait is implemented by storage backends (e.g. `tutor-store-sqlite`).
//! The lifecycle manager and the REST layer depend on this abstraction, not on
//! any concrete backend.

use std::future::Future;

use crate::{
  id::{LessonId, StudentId, TeacherId},
  language::Language,
  lesson::{Lesson, NewLesson},
  schedule::ConflictWindow,
  student::{NewStudent, Student},
  teacher::{NewTeacher, Teacher},
};

/// Abstraction over a scheduling store backend.
///
/// Rows are never physically removed. `soft_delete_*` flips the record's
/// `deleted` flag and reports whether the id exists at all; flagging an
/// already-deleted row is not an error.
///
/// `get_*` return rows regardless of the flag. Every `list_*` and
/// [`exists_overlap`](Self::exists_overlap) only see active rows.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait SchedulingStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Teachers ──────────────────────────────────────────────────────────

  /// Persist a new teacher; the store assigns the id.
  fn insert_teacher(
    &self,
    input: NewTeacher,
  ) -> impl Future<Output = Result<Teacher, Self::Error>> + Send + '_;

  fn get_teacher(
    &self,
    id: TeacherId,
  ) -> impl Future<Output = Result<Option<Teacher>, Self::Error>> + Send + '_;

  fn list_active_teachers(
    &self,
  ) -> impl Future<Output = Result<Vec<Teacher>, Self::Error>> + Send + '_;

  /// Active teachers whose language set contains `language`.
  fn list_active_teachers_by_language(
    &self,
    language: Language,
  ) -> impl Future<Output = Result<Vec<Teacher>, Self::Error>> + Send + '_;

  /// Overwrite the stored row with `teacher` (matched by id).
  fn update_teacher(
    &self,
    teacher: Teacher,
  ) -> impl Future<Output = Result<Teacher, Self::Error>> + Send + '_;

  fn soft_delete_teacher(
    &self,
    id: TeacherId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Students ──────────────────────────────────────────────────────────

  fn insert_student(
    &self,
    input: NewStudent,
  ) -> impl Future<Output = Result<Student, Self::Error>> + Send + '_;

  fn get_student(
    &self,
    id: StudentId,
  ) -> impl Future<Output = Result<Option<Student>, Self::Error>> + Send + '_;

  fn list_active_students(
    &self,
  ) -> impl Future<Output = Result<Vec<Student>, Self::Error>> + Send + '_;

  /// Active students currently assigned to `teacher_id`.
  fn list_active_students_by_teacher(
    &self,
    teacher_id: TeacherId,
  ) -> impl Future<Output = Result<Vec<Student>, Self::Error>> + Send + '_;

  fn update_student(
    &self,
    student: Student,
  ) -> impl Future<Output = Result<Student, Self::Error>> + Send + '_;

  fn soft_delete_student(
    &self,
    id: StudentId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Lessons ───────────────────────────────────────────────────────────

  fn insert_lesson(
    &self,
    input: NewLesson,
  ) -> impl Future<Output = Result<Lesson, Self::Error>> + Send + '_;

  fn get_lesson(
    &self,
    id: LessonId,
  ) -> impl Future<Output = Result<Option<Lesson>, Self::Error>> + Send + '_;

  fn list_active_lessons(
    &self,
  ) -> impl Future<Output = Result<Vec<Lesson>, Self::Error>> + Send + '_;

  /// Active lessons of `teacher_id`, ordered by term.
  fn list_active_lessons_by_teacher(
    &self,
    teacher_id: TeacherId,
  ) -> impl Future<Output = Result<Vec<Lesson>, Self::Error>> + Send + '_;

  fn update_lesson(
    &self,
    lesson: Lesson,
  ) -> impl Future<Output = Result<Lesson, Self::Error>> + Send + '_;

  fn soft_delete_lesson(
    &self,
    id: LessonId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Whether `teacher_id` has an active lesson with a term inside `window`
  /// (both bounds inclusive), ignoring the lesson `exclude` if given.
  fn exists_overlap(
    &self,
    teacher_id: TeacherId,
    window: ConflictWindow,
    exclude: Option<LessonId>,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}
