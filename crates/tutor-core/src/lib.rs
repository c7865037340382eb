//! Core types and rules for the tutoring scheduler.
//!
//! No HTTP or database code lives here. Storage backends implement
//! [`store::SchedulingStore`]; the REST layer drives the
//! [`lifecycle::LifecycleManager`].

// Backends implement the store trait with plain `async fn`.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod id;
pub mod language;
pub mod lesson;
pub mod lifecycle;
pub mod schedule;
pub mod store;
pub mod student;
pub mod teacher;
pub mod validate;

pub use error::{EntityKind, Error, Result, TermRejection};
