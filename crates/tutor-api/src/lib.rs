//! JSON REST API for the tutoring scheduler.
//!
//! Exposes an axum [`Router`] driving a [`LifecycleManager`] over any
//! [`SchedulingStore`]. TLS and transport concerns are the caller's
//! responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api/v1", tutor_api::api_router(manager.clone()))
//! ```

pub mod error;
pub mod lessons;
pub mod students;
pub mod teachers;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, patch},
};
use tutor_core::{lifecycle::LifecycleManager, store::SchedulingStore};

pub use error::ApiError;

/// Handler state: the manager shared by every request.
pub type Manager<S> = Arc<LifecycleManager<S>>;

/// Build a fully-materialised API router for `manager`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(manager: Manager<S>) -> Router<()>
where
  S: SchedulingStore + 'static,
{
  Router::new()
    // Teachers
    .route("/teachers", get(teachers::list::<S>).post(teachers::create::<S>))
    .route(
      "/teachers/{id}",
      get(teachers::get_one::<S>)
        .put(teachers::update::<S>)
        .patch(teachers::update_languages::<S>)
        .delete(teachers::remove::<S>),
    )
    .route("/teachers/{id}/students", get(teachers::students::<S>))
    .route("/teachers/{id}/lessons", get(teachers::lessons::<S>))
    // Students
    .route("/students", get(students::list::<S>).post(students::create::<S>))
    .route(
      "/students/{id}",
      get(students::get_one::<S>)
        .put(students::update::<S>)
        .delete(students::remove::<S>),
    )
    .route("/students/{id}/teacher", patch(students::reassign::<S>))
    // Lessons
    .route("/lessons", get(lessons::list::<S>).post(lessons::create::<S>))
    .route(
      "/lessons/{id}",
      get(lessons::get_one::<S>)
        .patch(lessons::update_term::<S>)
        .delete(lessons::remove::<S>),
    )
    .with_state(manager)
}
