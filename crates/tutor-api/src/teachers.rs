//! Handlers for `/teachers` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/teachers` | Optional `?language=JAVA` |
//! | `POST`   | `/teachers` | Body: [`TeacherInput`]; returns 201 |
//! | `GET`    | `/teachers/:id` | 404 if not found |
//! | `PUT`    | `/teachers/:id` | Body: [`TeacherInput`] |
//! | `PATCH`  | `/teachers/:id` | Body: `{"languages":[..]}` |
//! | `DELETE` | `/teachers/:id` | Soft delete; returns 204 |
//! | `GET`    | `/teachers/:id/students` | Active students |
//! | `GET`    | `/teachers/:id/lessons` | Active lessons, ordered by term |

use axum::{
  Json,
  extract::{
    Path, Query, State,
    rejection::{JsonRejection, PathRejection, QueryRejection},
  },
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use tutor_core::{
  id::TeacherId,
  language::Language,
  lesson::Lesson,
  store::SchedulingStore,
  student::Student,
  teacher::{Teacher, TeacherInput, UpdateLanguages},
};

use crate::{Manager, error::ApiError};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub language: Option<Language>,
}

/// `GET /teachers[?language=<LANGUAGE>]`
pub async fn list<S>(
  State(manager): State<Manager<S>>,
  params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<Teacher>>, ApiError>
where
  S: SchedulingStore,
{
  let Query(params) = params?;
  let teachers = match params.language {
    Some(language) => manager.active_teachers_by_language(language).await?,
    None => manager.active_teachers().await?,
  };
  Ok(Json(teachers))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /teachers`
pub async fn create<S>(
  State(manager): State<Manager<S>>,
  body: Result<Json<TeacherInput>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: SchedulingStore,
{
  let Json(input) = body?;
  let teacher = manager.create_teacher(input).await?;
  Ok((StatusCode::CREATED, Json(teacher)))
}

// ─── Single teacher ───────────────────────────────────────────────────────────

/// `GET /teachers/:id`
pub async fn get_one<S>(
  State(manager): State<Manager<S>>,
  id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Teacher>, ApiError>
where
  S: SchedulingStore,
{
  let Path(id) = id?;
  Ok(Json(manager.find_teacher(TeacherId(id)).await?))
}

/// `PUT /teachers/:id`
pub async fn update<S>(
  State(manager): State<Manager<S>>,
  id: Result<Path<i64>, PathRejection>,
  body: Result<Json<TeacherInput>, JsonRejection>,
) -> Result<Json<Teacher>, ApiError>
where
  S: SchedulingStore,
{
  let Path(id) = id?;
  let Json(input) = body?;
  Ok(Json(manager.update_teacher(TeacherId(id), input).await?))
}

/// `PATCH /teachers/:id`
pub async fn update_languages<S>(
  State(manager): State<Manager<S>>,
  id: Result<Path<i64>, PathRejection>,
  body: Result<Json<UpdateLanguages>, JsonRejection>,
) -> Result<Json<Teacher>, ApiError>
where
  S: SchedulingStore,
{
  let Path(id) = id?;
  let Json(input) = body?;
  Ok(Json(manager.update_teacher_languages(TeacherId(id), input).await?))
}

/// `DELETE /teachers/:id`
pub async fn remove<S>(
  State(manager): State<Manager<S>>,
  id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiError>
where
  S: SchedulingStore,
{
  let Path(id) = id?;
  manager.delete_teacher(TeacherId(id)).await?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Relations ────────────────────────────────────────────────────────────────

/// `GET /teachers/:id/students`
pub async fn students<S>(
  State(manager): State<Manager<S>>,
  id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Vec<Student>>, ApiError>
where
  S: SchedulingStore,
{
  let Path(id) = id?;
  Ok(Json(manager.active_students_of_teacher(TeacherId(id)).await?))
}

/// `GET /teachers/:id/lessons`
pub async fn lessons<S>(
  State(manager): State<Manager<S>>,
  id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Vec<Lesson>>, ApiError>
where
  S: SchedulingStore,
{
  let Path(id) = id?;
  Ok(Json(manager.active_lessons_of_teacher(TeacherId(id)).await?))
}
