//! Handlers for `/lessons` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/lessons` | Active lessons |
//! | `POST`   | `/lessons` | Body: [`CreateLesson`]; returns 201 |
//! | `GET`    | `/lessons/:id` | 404 if not found |
//! | `PATCH`  | `/lessons/:id` | Body: `{"term":"2030-01-01 10:00"}`; returns 202 |
//! | `DELETE` | `/lessons/:id` | Cancels a future lesson; returns 204 |

use axum::{
  Json,
  extract::{
    Path, State,
    rejection::{JsonRejection, PathRejection},
  },
  http::StatusCode,
  response::IntoResponse,
};
use tutor_core::{
  id::LessonId,
  lesson::{CreateLesson, Lesson, UpdateLessonTerm},
  store::SchedulingStore,
};

use crate::{Manager, error::ApiError};

/// `GET /lessons`
pub async fn list<S>(State(manager): State<Manager<S>>) -> Result<Json<Vec<Lesson>>, ApiError>
where
  S: SchedulingStore,
{
  Ok(Json(manager.active_lessons().await?))
}

/// `POST /lessons`
pub async fn create<S>(
  State(manager): State<Manager<S>>,
  body: Result<Json<CreateLesson>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: SchedulingStore,
{
  let Json(cmd) = body?;
  let lesson = manager.create_lesson(cmd).await?;
  Ok((StatusCode::CREATED, Json(lesson)))
}

/// `GET /lessons/:id`
pub async fn get_one<S>(
  State(manager): State<Manager<S>>,
  id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Lesson>, ApiError>
where
  S: SchedulingStore,
{
  let Path(id) = id?;
  Ok(Json(manager.find_lesson(LessonId(id)).await?))
}

/// `PATCH /lessons/:id`
pub async fn update_term<S>(
  State(manager): State<Manager<S>>,
  id: Result<Path<i64>, PathRejection>,
  body: Result<Json<UpdateLessonTerm>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: SchedulingStore,
{
  let Path(id) = id?;
  let Json(cmd) = body?;
  let lesson = manager.update_lesson_term(LessonId(id), cmd).await?;
  Ok((StatusCode::ACCEPTED, Json(lesson)))
}

/// `DELETE /lessons/:id`
pub async fn remove<S>(
  State(manager): State<Manager<S>>,
  id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiError>
where
  S: SchedulingStore,
{
  let Path(id) = id?;
  manager.delete_lesson(LessonId(id)).await?;
  Ok(StatusCode::NO_CONTENT)
}
