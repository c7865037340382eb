//! [`SqliteStore`]: the SQLite implementation of [`SchedulingStore`].

use std::path::Path;

use rusqlite::{OptionalExtension as _, Row, types::Value};

use tutor_core::{
  id::{LessonId, StudentId, TeacherId},
  language::Language,
  lesson::{Lesson, NewLesson},
  schedule::ConflictWindow,
  store::SchedulingStore,
  student::{NewStudent, Student},
  teacher::{NewTeacher, Teacher},
};

use crate::{
  Error, Result,
  encode::{
    LESSON_COLUMNS, RawLesson, RawStudent, RawTeacher, STUDENT_COLUMNS, TEACHER_COLUMNS,
    encode_language, encode_languages, encode_term,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A scheduling store backed by a single SQLite file.
///
/// Clones share one background connection.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open a fresh in-memory store.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    tracing::debug!("schema initialised");
    Ok(())
  }

  /// Run a statement and return the number of affected rows.
  async fn execute(&self, sql: &'static str, args: Vec<Value>) -> Result<usize> {
    let n = self
      .conn
      .call(move |conn| Ok(conn.execute(sql, rusqlite::params_from_iter(args))?))
      .await?;
    Ok(n)
  }

  /// Run an INSERT and return the new row id.
  async fn insert(&self, sql: &'static str, args: Vec<Value>) -> Result<i64> {
    let id = self
      .conn
      .call(move |conn| {
        conn.execute(sql, rusqlite::params_from_iter(args))?;
        Ok(conn.last_insert_rowid())
      })
      .await?;
    Ok(id)
  }

  async fn fetch_one<R>(
    &self,
    sql: String,
    args: Vec<Value>,
    map: fn(&Row<'_>) -> rusqlite::Result<R>,
  ) -> Result<Option<R>>
  where
    R: Send + 'static,
  {
    let row = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(&sql, rusqlite::params_from_iter(args), map)
            .optional()?,
        )
      })
      .await?;
    Ok(row)
  }

  async fn fetch_all<R>(
    &self,
    sql: String,
    args: Vec<Value>,
    map: fn(&Row<'_>) -> rusqlite::Result<R>,
  ) -> Result<Vec<R>>
  where
    R: Send + 'static,
  {
    let rows = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(args), map)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }

  async fn teachers_where(&self, cond: &str, args: Vec<Value>) -> Result<Vec<Teacher>> {
    let sql = format!("SELECT {TEACHER_COLUMNS} FROM teachers t WHERE {cond} ORDER BY teacher_id");
    let raws = self.fetch_all(sql, args, RawTeacher::from_row).await?;
    raws.into_iter().map(RawTeacher::into_teacher).collect()
  }

  async fn students_where(&self, cond: &str, args: Vec<Value>) -> Result<Vec<Student>> {
    let sql = format!("SELECT {STUDENT_COLUMNS} FROM students WHERE {cond} ORDER BY student_id");
    let raws = self.fetch_all(sql, args, RawStudent::from_row).await?;
    raws.into_iter().map(RawStudent::into_student).collect()
  }

  async fn lessons_where(
    &self,
    cond: &str,
    order_by: &str,
    args: Vec<Value>,
  ) -> Result<Vec<Lesson>> {
    let sql = format!("SELECT {LESSON_COLUMNS} FROM lessons WHERE {cond} ORDER BY {order_by}");
    let raws = self.fetch_all(sql, args, RawLesson::from_row).await?;
    raws.into_iter().map(RawLesson::into_lesson).collect()
  }
}

fn ensure_updated(n: usize, table: &'static str, id: i64) -> Result<()> {
  if n == 0 {
    Err(Error::RowNotFound { table, id })
  } else {
    Ok(())
  }
}

// ─── SchedulingStore impl ────────────────────────────────────────────────────

impl SchedulingStore for SqliteStore {
  type Error = Error;

  // ── Teachers ──────────────────────────────────────────────────────────────

  async fn insert_teacher(&self, input: NewTeacher) -> Result<Teacher> {
    let langs = encode_languages(&input.languages)?;
    let id = self
      .insert(
        "INSERT INTO teachers (first_name, last_name, languages) VALUES (?1, ?2, ?3)",
        vec![
          Value::Text(input.first_name.clone()),
          Value::Text(input.last_name.clone()),
          Value::Text(langs),
        ],
      )
      .await?;

    Ok(Teacher {
      id:         TeacherId(id),
      first_name: input.first_name,
      last_name:  input.last_name,
      languages:  input.languages,
      deleted:    false,
    })
  }

  async fn get_teacher(&self, id: TeacherId) -> Result<Option<Teacher>> {
    let sql = format!("SELECT {TEACHER_COLUMNS} FROM teachers WHERE teacher_id = ?1");
    let raw = self
      .fetch_one(sql, vec![Value::Integer(id.0)], RawTeacher::from_row)
      .await?;
    raw.map(RawTeacher::into_teacher).transpose()
  }

  async fn list_active_teachers(&self) -> Result<Vec<Teacher>> {
    self.teachers_where("t.deleted = 0", vec![]).await
  }

  async fn list_active_teachers_by_language(&self, language: Language) -> Result<Vec<Teacher>> {
    self
      .teachers_where(
        "t.deleted = 0
           AND EXISTS (SELECT 1 FROM json_each(t.languages) j WHERE j.value = ?1)",
        vec![Value::Text(encode_language(language).to_owned())],
      )
      .await
  }

  async fn update_teacher(&self, teacher: Teacher) -> Result<Teacher> {
    let langs = encode_languages(&teacher.languages)?;
    let n = self
      .execute(
        "UPDATE teachers
            SET first_name = ?1, last_name = ?2, languages = ?3, deleted = ?4
          WHERE teacher_id = ?5",
        vec![
          Value::Text(teacher.first_name.clone()),
          Value::Text(teacher.last_name.clone()),
          Value::Text(langs),
          Value::Integer(teacher.deleted.into()),
          Value::Integer(teacher.id.0),
        ],
      )
      .await?;
    ensure_updated(n, "teachers", teacher.id.0)?;
    Ok(teacher)
  }

  async fn soft_delete_teacher(&self, id: TeacherId) -> Result<bool> {
    let n = self
      .execute(
        "UPDATE teachers SET deleted = 1 WHERE teacher_id = ?1",
        vec![Value::Integer(id.0)],
      )
      .await?;
    Ok(n > 0)
  }

  // ── Students ──────────────────────────────────────────────────────────────

  async fn insert_student(&self, input: NewStudent) -> Result<Student> {
    let id = self
      .insert(
        "INSERT INTO students (first_name, last_name, language, teacher_id)
         VALUES (?1, ?2, ?3, ?4)",
        vec![
          Value::Text(input.first_name.clone()),
          Value::Text(input.last_name.clone()),
          Value::Text(encode_language(input.language).to_owned()),
          Value::Integer(input.teacher_id.0),
        ],
      )
      .await?;

    Ok(Student {
      id:         StudentId(id),
      first_name: input.first_name,
      last_name:  input.last_name,
      language:   input.language,
      teacher_id: input.teacher_id,
      deleted:    false,
    })
  }

  async fn get_student(&self, id: StudentId) -> Result<Option<Student>> {
    let sql = format!("SELECT {STUDENT_COLUMNS} FROM students WHERE student_id = ?1");
    let raw = self
      .fetch_one(sql, vec![Value::Integer(id.0)], RawStudent::from_row)
      .await?;
    raw.map(RawStudent::into_student).transpose()
  }

  async fn list_active_students(&self) -> Result<Vec<Student>> {
    self.students_where("deleted = 0", vec![]).await
  }

  async fn list_active_students_by_teacher(&self, teacher_id: TeacherId) -> Result<Vec<Student>> {
    self
      .students_where("deleted = 0 AND teacher_id = ?1", vec![Value::Integer(teacher_id.0)])
      .await
  }

  async fn update_student(&self, student: Student) -> Result<Student> {
    let n = self
      .execute(
        "UPDATE students
            SET first_name = ?1, last_name = ?2, language = ?3, teacher_id = ?4, deleted = ?5
          WHERE student_id = ?6",
        vec![
          Value::Text(student.first_name.clone()),
          Value::Text(student.last_name.clone()),
          Value::Text(encode_language(student.language).to_owned()),
          Value::Integer(student.teacher_id.0),
          Value::Integer(student.deleted.into()),
          Value::Integer(student.id.0),
        ],
      )
      .await?;
    ensure_updated(n, "students", student.id.0)?;
    Ok(student)
  }

  async fn soft_delete_student(&self, id: StudentId) -> Result<bool> {
    let n = self
      .execute(
        "UPDATE students SET deleted = 1 WHERE student_id = ?1",
        vec![Value::Integer(id.0)],
      )
      .await?;
    Ok(n > 0)
  }

  // ── Lessons ───────────────────────────────────────────────────────────────

  async fn insert_lesson(&self, input: NewLesson) -> Result<Lesson> {
    let (secs, nanos) = encode_term(input.term);
    let id = self
      .insert(
        "INSERT INTO lessons (teacher_id, student_id, term_secs, term_nanos)
         VALUES (?1, ?2, ?3, ?4)",
        vec![
          Value::Integer(input.teacher_id.0),
          Value::Integer(input.student_id.0),
          Value::Integer(secs),
          Value::Integer(nanos),
        ],
      )
      .await?;

    Ok(Lesson {
      id:         LessonId(id),
      teacher_id: input.teacher_id,
      student_id: input.student_id,
      term:       input.term,
      deleted:    false,
    })
  }

  async fn get_lesson(&self, id: LessonId) -> Result<Option<Lesson>> {
    let sql = format!("SELECT {LESSON_COLUMNS} FROM lessons WHERE lesson_id = ?1");
    let raw = self
      .fetch_one(sql, vec![Value::Integer(id.0)], RawLesson::from_row)
      .await?;
    raw.map(RawLesson::into_lesson).transpose()
  }

  async fn list_active_lessons(&self) -> Result<Vec<Lesson>> {
    self.lessons_where("deleted = 0", "lesson_id", vec![]).await
  }

  async fn list_active_lessons_by_teacher(&self, teacher_id: TeacherId) -> Result<Vec<Lesson>> {
    self
      .lessons_where(
        "deleted = 0 AND teacher_id = ?1",
        "term_secs, term_nanos, lesson_id",
        vec![Value::Integer(teacher_id.0)],
      )
      .await
  }

  async fn update_lesson(&self, lesson: Lesson) -> Result<Lesson> {
    let (secs, nanos) = encode_term(lesson.term);
    let n = self
      .execute(
        "UPDATE lessons
            SET teacher_id = ?1, student_id = ?2, term_secs = ?3, term_nanos = ?4,
                deleted = ?5
          WHERE lesson_id = ?6",
        vec![
          Value::Integer(lesson.teacher_id.0),
          Value::Integer(lesson.student_id.0),
          Value::Integer(secs),
          Value::Integer(nanos),
          Value::Integer(lesson.deleted.into()),
          Value::Integer(lesson.id.0),
        ],
      )
      .await?;
    ensure_updated(n, "lessons", lesson.id.0)?;
    Ok(lesson)
  }

  async fn soft_delete_lesson(&self, id: LessonId) -> Result<bool> {
    let n = self
      .execute(
        "UPDATE lessons SET deleted = 1 WHERE lesson_id = ?1",
        vec![Value::Integer(id.0)],
      )
      .await?;
    Ok(n > 0)
  }

  async fn exists_overlap(
    &self,
    teacher_id: TeacherId,
    window: ConflictWindow,
    exclude: Option<LessonId>,
  ) -> Result<bool> {
    let (from_secs, from_nanos) = encode_term(window.from);
    let (to_secs, to_nanos) = encode_term(window.to);
    let args = vec![
      Value::Integer(teacher_id.0),
      Value::Integer(from_secs),
      Value::Integer(from_nanos),
      Value::Integer(to_secs),
      Value::Integer(to_nanos),
      exclude.map_or(Value::Null, |id| Value::Integer(id.0)),
    ];

    let taken = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "SELECT EXISTS (
             SELECT 1 FROM lessons
              WHERE teacher_id = ?1
                AND deleted = 0
                AND (term_secs, term_nanos) >= (?2, ?3)
                AND (term_secs, term_nanos) <= (?4, ?5)
                AND (?6 IS NULL OR lesson_id <> ?6)
           )",
          rusqlite::params_from_iter(args),
          |row| row.get::<_, bool>(0),
        )?)
      })
      .await?;
    Ok(taken)
  }
}
