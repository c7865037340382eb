//! The scheduling engine.
//!
//! A proposed term is acceptable for a teacher when it lies strictly in the
//! future and no active lesson of that teacher falls inside the closed window
//! `[term - 59min, term + 59min]`. Nothing is cached: "now" is read once per
//! evaluation from the injected [`Clock`].

use chrono::{Local, NaiveDateTime, TimeDelta};
use serde::Serialize;

use crate::{
  Error, Result, TermRejection,
  id::{LessonId, TeacherId},
  store::SchedulingStore,
};

/// Half-width of the conflict window, in minutes.
pub const CONFLICT_BUFFER_MINUTES: i64 = 59;

pub fn conflict_buffer() -> TimeDelta { TimeDelta::minutes(CONFLICT_BUFFER_MINUTES) }

// ─── Clock ───────────────────────────────────────────────────────────────────

/// Source of the current wall-clock time.
pub trait Clock: Send + Sync {
  fn now(&self) -> NaiveDateTime;
}

/// The local system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
  fn now(&self) -> NaiveDateTime { Local::now().naive_local() }
}

/// A clock frozen at a given instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
  fn now(&self) -> NaiveDateTime { self.0 }
}

// ─── Window ──────────────────────────────────────────────────────────────────

/// Closed time range searched for competing lessons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConflictWindow {
  pub from: NaiveDateTime,
  pub to:   NaiveDateTime,
}

impl ConflictWindow {
  /// The window centred on `term`, saturating at the calendar limits.
  pub fn around(term: NaiveDateTime) -> Self {
    let buffer = conflict_buffer();
    Self {
      from: term.checked_sub_signed(buffer).unwrap_or(NaiveDateTime::MIN),
      to:   term.checked_add_signed(buffer).unwrap_or(NaiveDateTime::MAX),
    }
  }

  pub fn contains(&self, t: NaiveDateTime) -> bool { self.from <= t && t <= self.to }
}

// ─── Decisions ───────────────────────────────────────────────────────────────

/// A term equal to `now` is already too late.
pub fn is_in_future(term: NaiveDateTime, now: NaiveDateTime) -> bool { term > now }

/// Refuse to touch a lesson whose term has been reached.
pub fn ensure_not_past(term: NaiveDateTime, now: NaiveDateTime) -> Result<(), TermRejection> {
  if is_in_future(term, now) {
    Ok(())
  } else {
    Err(TermRejection::PastTerm)
  }
}

/// Check `term` for `teacher_id`, raising [`Error::InvalidTerm`] on refusal.
///
/// `exclude` names the lesson being re-scheduled so it cannot collide with
/// its own current term. The future check runs first and skips the store
/// query when it fails.
pub async fn ensure_term_acceptable<S>(
  store: &S,
  clock: &dyn Clock,
  teacher_id: TeacherId,
  term: NaiveDateTime,
  exclude: Option<LessonId>,
) -> Result<()>
where
  S: SchedulingStore,
{
  let now = clock.now();
  if !is_in_future(term, now) {
    tracing::debug!(%term, %now, "term is not in the future");
    return Err(TermRejection::NotInFuture(term).into());
  }

  let window = ConflictWindow::around(term);
  let taken = store
    .exists_overlap(teacher_id, window, exclude)
    .await
    .map_err(Error::store)?;
  if taken {
    tracing::debug!(%term, %teacher_id, "term collides with an existing lesson");
    return Err(TermRejection::Conflict(term).into());
  }

  Ok(())
}

/// Boolean form of [`ensure_term_acceptable`]; store failures still propagate.
pub async fn is_term_acceptable<S>(
  store: &S,
  clock: &dyn Clock,
  teacher_id: TeacherId,
  term: NaiveDateTime,
  exclude: Option<LessonId>,
) -> Result<bool>
where
  S: SchedulingStore,
{
  match ensure_term_acceptable(store, clock, teacher_id, term, exclude).await {
    Ok(()) => Ok(true),
    Err(Error::InvalidTerm(_)) => Ok(false),
    Err(e) => Err(e),
  }
}
