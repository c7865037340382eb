//! Handlers for `/students` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/students` | Active students |
//! | `POST`   | `/students` | Body: [`CreateStudent`]; returns 201 |
//! | `GET`    | `/students/:id` | 404 if not found |
//! | `PUT`    | `/students/:id` | Body: [`UpdateStudent`] |
//! | `PATCH`  | `/students/:id/teacher` | Body: `{"teacher_id":1}` |
//! | `DELETE` | `/students/:id` | Soft delete; returns 204 |

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
  id::StudentId,
  store::SchedulingStore,
  student::{CreateStudent, ReassignTeacher, Student, UpdateStudent},
};

use crate::{Manager, error::ApiError};

/// `GET /students`
pub async fn list<S>(State(manager): State<Manager<S>>) -> Result<Json<Vec<Student>>, ApiError>
where
  S: SchedulingStore,
{
  Ok(Json(manager.active_students().await?))
}

/// `POST /students`
pub async fn create<S>(
  State(manager): State<Manager<S>>,
  body: Result<Json<CreateStudent>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: SchedulingStore,
{
  let Json(cmd) = body?;
  let student = manager.create_student(cmd).await?;
  Ok((StatusCode::CREATED, Json(student)))
}

/// `GET /students/:id`
pub async fn get_one<S>(
  State(manager): State<Manager<S>>,
  id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Student>, ApiError>
where
  S: SchedulingStore,
{
  let Path(id) = id?;
  Ok(Json(manager.find_student(StudentId(id)).await?))
}

/// `PUT /students/:id`
pub async fn update<S>(
  State(manager): State<Manager<S>>,
  id: Result<Path<i64>, PathRejection>,
  body: Result<Json<UpdateStudent>, JsonRejection>,
) -> Result<Json<Student>, ApiError>
where
  S: SchedulingStore,
{
  let Path(id) = id?;
  let Json(cmd) = body?;
  Ok(Json(manager.update_student(StudentId(id), cmd).await?))
}

/// `PATCH /students/:id/teacher`
pub async fn reassign<S>(
  State(manager): State<Manager<S>>,
  id: Result<Path<i64>, PathRejection>,
  body: Result<Json<ReassignTeacher>, JsonRejection>,
) -> Result<Json<Student>, ApiError>
where
  S: SchedulingStore,
{
  let Path(id) = id?;
  let Json(cmd) = body?;
  Ok(Json(manager.reassign_student_teacher(StudentId(id), cmd).await?))
}

/// `DELETE /students/:id`
pub async fn remove<S>(
  State(manager): State<Manager<S>>,
  id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiError>
where
  S: SchedulingStore,
{
  let Path(id) = id?;
  manager.delete_student(StudentId(id)).await?;
  Ok(StatusCode::NO_CONTENT)
}
