//! End-to-end behaviour of `LifecycleManager` over a real SQLite store.

use std::{collections::BTreeSet, sync::Arc};

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use tutor_core::{
  EntityKind, Error, TermRejection,
  id::{LessonId, StudentId, TeacherId},
  language::Language,
  lesson::{CreateLesson, Lesson, NewLesson, UpdateLessonTerm},
  lifecycle::LifecycleManager,
  schedule::{FixedClock, is_term_acceptable},
  store::SchedulingStore,
  student::{CreateStudent, ReassignTeacher, Student, UpdateStudent},
  teacher::{Teacher, TeacherInput, UpdateLanguages},
};
use tutor_store_sqlite::SqliteStore;

fn now() -> NaiveDateTime {
  NaiveDate::from_ymd_opt(2030, 5, 6)
    .unwrap()
    .and_hms_opt(8, 0, 0)
    .unwrap()
}

async fn manager() -> LifecycleManager<SqliteStore> {
  let store = SqliteStore::open_in_memory().await.expect("in-memory store");
  LifecycleManager::with_clock(store, Arc::new(FixedClock(now())))
}

fn teacher_input(first: &str, langs: &[Language]) -> TeacherInput {
  TeacherInput {
    first_name: first.into(),
    last_name:  "Nowak".into(),
    languages:  langs.iter().copied().collect(),
  }
}

async fn teacher(m: &LifecycleManager<SqliteStore>, langs: &[Language]) -> Teacher {
  m.create_teacher(teacher_input("Jan", langs)).await.unwrap()
}

async fn student(m: &LifecycleManager<SqliteStore>, t: TeacherId, l: Language) -> Student {
  m.create_student(CreateStudent {
    first_name: "Ola".into(),
    last_name:  "Lis".into(),
    language:   Some(l),
    teacher_id: t.get(),
  })
  .await
  .unwrap()
}

/// A Java teacher with one Java student.
async fn pair(m: &LifecycleManager<SqliteStore>) -> (TeacherId, StudentId) {
  let t = teacher(m, &[Language::Java]).await;
  let s = student(m, t.id, Language::Java).await;
  (t.id, s.id)
}

async fn book(
  m: &LifecycleManager<SqliteStore>,
  t: TeacherId,
  s: StudentId,
  term: NaiveDateTime,
) -> tutor_core::Result<Lesson> {
  m.create_lesson(CreateLesson {
    teacher_id: t.get(),
    student_id: s.get(),
    term:       Some(term),
  })
  .await
}

fn assert_conflict(result: tutor_core::Result<Lesson>, term: NaiveDateTime) {
  match result {
    Err(Error::InvalidTerm(TermRejection::Conflict(t))) => assert_eq!(t, term),
    other => panic!("expected a conflict at {term}, got {other:?}"),
  }
}

// ─── Scheduling ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn booking_scenario() {
  let m = manager().await;
  let (t, s) = pair(&m).await;
  let term = now() + TimeDelta::days(20);

  let first = book(&m, t, s, term).await.unwrap();
  assert_eq!(first.term, term);
  assert!(!first.deleted);

  let again = book(&m, t, s, term).await;
  assert_conflict(again, term);

  let later = term + TimeDelta::hours(2);
  assert_eq!(book(&m, t, s, later).await.unwrap().term, later);
}

#[tokio::test]
async fn conflict_window_is_fifty_nine_minutes_each_side() {
  let m = manager().await;
  let (t, s) = pair(&m).await;
  let t0 = now() + TimeDelta::days(3);
  book(&m, t, s, t0).await.unwrap();

  for offset in [-59, -30, -1, 0, 1, 30, 59] {
    let term = t0 + TimeDelta::minutes(offset);
    assert_conflict(book(&m, t, s, term).await, term);
  }

  let after = t0 + TimeDelta::minutes(59) + TimeDelta::seconds(1);
  assert!(book(&m, t, s, after).await.is_ok());
  let before = t0 - TimeDelta::minutes(60);
  assert!(book(&m, t, s, before).await.is_ok());
}

#[tokio::test]
async fn terms_at_or_before_now_are_rejected() {
  let m = manager().await;
  let (t, s) = pair(&m).await;

  for term in [now(), now() - TimeDelta::days(1)] {
    match book(&m, t, s, term).await {
      Err(e @ Error::InvalidTerm(TermRejection::NotInFuture(_))) => {
        assert_eq!(e.to_string(), format!("Invalid date {term}"));
      }
      other => panic!("expected a past-term rejection, got {other:?}"),
    }
  }

  assert!(book(&m, t, s, now() + TimeDelta::seconds(1)).await.is_ok());
}

#[tokio::test]
async fn other_teachers_do_not_conflict() {
  let m = manager().await;
  let (t1, s1) = pair(&m).await;
  let (t2, s2) = pair(&m).await;
  let term = now() + TimeDelta::days(1);

  book(&m, t1, s1, term).await.unwrap();
  assert!(book(&m, t2, s2, term).await.is_ok());
}

#[tokio::test]
async fn acceptability_predicate_reflects_bookings() {
  let m = manager().await;
  let (t, s) = pair(&m).await;
  let term = now() + TimeDelta::days(2);
  let clock = FixedClock(now());

  assert!(is_term_acceptable(m.store(), &clock, t, term, None).await.unwrap());
  let lesson = book(&m, t, s, term).await.unwrap();
  assert!(!is_term_acceptable(m.store(), &clock, t, term, None).await.unwrap());
  assert!(
    is_term_acceptable(m.store(), &clock, t, term, Some(lesson.id))
      .await
      .unwrap()
  );
  assert!(!is_term_acceptable(m.store(), &clock, t, now(), None).await.unwrap());
}

#[tokio::test]
async fn conflicts_are_detected_across_the_year_ten_thousand_boundary() {
  let m = manager().await;
  let (t, s) = pair(&m).await;
  let last_of_9999 = NaiveDate::from_ymd_opt(9999, 12, 31)
    .unwrap()
    .and_hms_opt(23, 50, 0)
    .unwrap();
  let first_of_10000 = last_of_9999 + TimeDelta::minutes(20);

  book(&m, t, s, last_of_9999).await.unwrap();
  assert_conflict(book(&m, t, s, first_of_10000).await, first_of_10000);

  let next_day = first_of_10000 + TimeDelta::days(1);
  book(&m, t, s, next_day).await.unwrap();
  let agenda: Vec<_> = m
    .active_lessons_of_teacher(t)
    .await
    .unwrap()
    .into_iter()
    .map(|l| l.term)
    .collect();
  assert_eq!(agenda, vec![last_of_9999, next_day]);
}

// ─── Rescheduling ────────────────────────────────────────────────────────────

#[tokio::test]
async fn update_term_stores_the_exact_term() {
  let m = manager().await;
  let (t, s) = pair(&m).await;
  let lesson = book(&m, t, s, now() + TimeDelta::days(1)).await.unwrap();

  let moved_to = now() + TimeDelta::days(4) + TimeDelta::milliseconds(250);
  let moved = m
    .update_lesson_term(lesson.id, UpdateLessonTerm { term: Some(moved_to) })
    .await
    .unwrap();
  assert_eq!(moved.term, moved_to);
  assert_eq!(m.find_lesson(lesson.id).await.unwrap().term, moved_to);
}

#[tokio::test]
async fn update_term_may_shift_within_its_own_window() {
  let m = manager().await;
  let (t, s) = pair(&m).await;
  let term = now() + TimeDelta::days(1);
  let lesson = book(&m, t, s, term).await.unwrap();

  let nudged = term + TimeDelta::minutes(15);
  let moved = m
    .update_lesson_term(lesson.id, UpdateLessonTerm { term: Some(nudged) })
    .await
    .unwrap();
  assert_eq!(moved.term, nudged);
}

#[tokio::test]
async fn update_term_conflicting_with_another_lesson_keeps_the_old_term() {
  let m = manager().await;
  let (t, s) = pair(&m).await;
  let a = book(&m, t, s, now() + TimeDelta::days(1)).await.unwrap();
  let b = book(&m, t, s, now() + TimeDelta::days(2)).await.unwrap();

  let result = m
    .update_lesson_term(a.id, UpdateLessonTerm { term: Some(b.term) })
    .await;
  assert_conflict(result, b.term);
  assert_eq!(m.find_lesson(a.id).await.unwrap().term, a.term);
}

#[tokio::test]
async fn update_term_of_unknown_lesson_is_not_found() {
  let m = manager().await;
  let err = m
    .update_lesson_term(LessonId(42), UpdateLessonTerm {
      term: Some(now() + TimeDelta::days(1)),
    })
    .await
    .unwrap_err();
  assert_eq!(err.to_string(), "Lesson with id=42 has not been found");
}

// ─── Cancelling ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn cancelling_a_future_lesson_frees_the_slot() {
  let m = manager().await;
  let (t, s) = pair(&m).await;
  let term = now() + TimeDelta::days(7);
  let lesson = book(&m, t, s, term).await.unwrap();

  m.delete_lesson(lesson.id).await.unwrap();

  let found = m.find_lesson(lesson.id).await.unwrap();
  assert!(found.deleted);
  assert!(m.active_lessons().await.unwrap().is_empty());
  assert!(m.active_lessons_of_teacher(t).await.unwrap().is_empty());

  let rebooked = book(&m, t, s, term).await.unwrap();
  assert_ne!(rebooked.id, lesson.id);
}

#[tokio::test]
async fn cancelling_a_past_lesson_is_refused() {
  let m = manager().await;
  let (t, s) = pair(&m).await;
  let past = m
    .store()
    .insert_lesson(NewLesson {
      teacher_id: t,
      student_id: s,
      term:       now() - TimeDelta::hours(3),
    })
    .await
    .unwrap();

  let err = m.delete_lesson(past.id).await.unwrap_err();
  assert!(matches!(err, Error::InvalidTerm(TermRejection::PastTerm)));
  assert_eq!(err.to_string(), "The term is in the past");
  assert!(!m.find_lesson(past.id).await.unwrap().deleted);
}

#[tokio::test]
async fn cancelling_twice_succeeds_even_after_the_term_passes() {
  let m = manager().await;
  let (t, s) = pair(&m).await;
  let term = now() + TimeDelta::hours(2);
  let lesson = book(&m, t, s, term).await.unwrap();
  m.delete_lesson(lesson.id).await.unwrap();

  let later = LifecycleManager::with_clock(
    m.store().clone(),
    Arc::new(FixedClock(term + TimeDelta::days(1))),
  );
  later.delete_lesson(lesson.id).await.unwrap();
  assert!(later.find_lesson(lesson.id).await.unwrap().deleted);
}

#[tokio::test]
async fn cancelling_an_unknown_lesson_is_not_found() {
  let m = manager().await;
  let err = m.delete_lesson(LessonId(9)).await.unwrap_err();
  assert!(matches!(err, Error::NotFound { kind: EntityKind::Lesson, id: 9 }));
}

// ─── Entity resolution ───────────────────────────────────────────────────────

#[tokio::test]
async fn booking_with_unknown_teacher_or_student_is_not_found() {
  let m = manager().await;
  let (t, s) = pair(&m).await;
  let term = now() + TimeDelta::days(1);

  let err = book(&m, TeacherId(100), s, term).await.unwrap_err();
  assert_eq!(err.to_string(), "Teacher with id=100 has not been found");

  let err = book(&m, t, StudentId(100), term).await.unwrap_err();
  assert_eq!(err.to_string(), "Student with id=100 has not been found");
}

#[tokio::test]
async fn unknown_entity_wins_over_a_bad_term() {
  let m = manager().await;
  let (_, s) = pair(&m).await;
  let err = book(&m, TeacherId(100), s, now()).await.unwrap_err();
  assert!(matches!(err, Error::NotFound { kind: EntityKind::Teacher, .. }));
}

#[tokio::test]
async fn soft_deleted_teacher_cannot_take_new_lessons() {
  let m = manager().await;
  let (t, s) = pair(&m).await;
  m.delete_teacher(t).await.unwrap();

  let err = book(&m, t, s, now() + TimeDelta::days(1)).await.unwrap_err();
  assert!(matches!(err, Error::NotFound { kind: EntityKind::Teacher, .. }));
  assert!(m.find_teacher(t).await.unwrap().deleted);
}

// ─── Students ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn student_language_must_be_taught() {
  let m = manager().await;
  let t = teacher(&m, &[Language::Java, Language::Js]).await;

  let err = m
    .create_student(CreateStudent {
      first_name: "Ola".into(),
      last_name:  "Lis".into(),
      language:   Some(Language::Python),
      teacher_id: t.id.get(),
    })
    .await
    .unwrap_err();
  assert!(matches!(err, Error::InvalidTeacherAssignment(id) if id == t.id));
  assert_eq!(err.to_string(), format!("Wrong teacher {}", t.id));
  assert!(m.active_students().await.unwrap().is_empty());
}

#[tokio::test]
async fn update_student_checks_the_current_teacher() {
  let m = manager().await;
  let t = teacher(&m, &[Language::Java, Language::C]).await;
  let s = student(&m, t.id, Language::Java).await;

  let ok = m
    .update_student(s.id, UpdateStudent {
      first_name: "Alicja".into(),
      last_name:  "Lis".into(),
      language:   Some(Language::C),
    })
    .await
    .unwrap();
  assert_eq!(ok.language, Language::C);
  assert_eq!(ok.first_name, "Alicja");

  let err = m
    .update_student(s.id, UpdateStudent {
      first_name: "Alicja".into(),
      last_name:  "Lis".into(),
      language:   Some(Language::Kobol),
    })
    .await
    .unwrap_err();
  assert!(matches!(err, Error::InvalidTeacherAssignment(_)));
}

#[tokio::test]
async fn reassign_student_to_compatible_teacher() {
  let m = manager().await;
  let (t1, s) = pair(&m).await;
  let t2 = teacher(&m, &[Language::Java]).await;
  let t3 = teacher(&m, &[Language::Python]).await;

  let moved = m
    .reassign_student_teacher(s, ReassignTeacher { teacher_id: t2.id.get() })
    .await
    .unwrap();
  assert_eq!(moved.teacher_id, t2.id);
  assert!(m.active_students_of_teacher(t1).await.unwrap().is_empty());
  assert_eq!(m.active_students_of_teacher(t2.id).await.unwrap().len(), 1);

  let err = m
    .reassign_student_teacher(s, ReassignTeacher { teacher_id: t3.id.get() })
    .await
    .unwrap_err();
  assert!(matches!(err, Error::InvalidTeacherAssignment(id) if id == t3.id));
}

#[tokio::test]
async fn deleted_student_is_hidden_but_addressable() {
  let m = manager().await;
  let (t, s) = pair(&m).await;
  m.delete_student(s).await.unwrap();
  m.delete_student(s).await.unwrap();

  assert!(m.find_student(s).await.unwrap().deleted);
  assert!(m.active_students_of_teacher(t).await.unwrap().is_empty());

  let err = m.delete_student(StudentId(55)).await.unwrap_err();
  assert_eq!(err.to_string(), "Student with id=55 has not been found");
}

// ─── Teachers ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn teachers_by_language_and_updates() {
  let m = manager().await;
  let java = teacher(&m, &[Language::Java]).await;
  let py = teacher(&m, &[Language::Python]).await;

  let found = m.active_teachers_by_language(Language::Java).await.unwrap();
  assert_eq!(found.iter().map(|t| t.id).collect::<Vec<_>>(), vec![java.id]);

  let updated = m
    .update_teacher_languages(py.id, UpdateLanguages {
      languages: BTreeSet::from([Language::Java, Language::Python]),
    })
    .await
    .unwrap();
  assert_eq!(updated.languages.len(), 2);
  assert_eq!(m.active_teachers_by_language(Language::Java).await.unwrap().len(), 2);

  let renamed = m
    .update_teacher(java.id, teacher_input("Marek", &[Language::Js]))
    .await
    .unwrap();
  assert_eq!(renamed.first_name, "Marek");
  assert!(m.active_teachers_by_language(Language::Java).await.unwrap().len() == 1);
}

#[tokio::test]
async fn teacher_lookups_report_missing_ids() {
  let m = manager().await;
  let err = m.find_teacher(TeacherId(1)).await.unwrap_err();
  assert_eq!(err.to_string(), "Teacher with id=1 has not been found");

  let err = m.active_lessons_of_teacher(TeacherId(3)).await.unwrap_err();
  assert!(matches!(err, Error::NotFound { kind: EntityKind::Teacher, id: 3 }));
}

// ─── Validation ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn invalid_teacher_is_rejected_before_touching_the_store() {
  let m = manager().await;
  let err = m
    .create_teacher(TeacherInput {
      first_name: "jan".into(),
      last_name:  String::new(),
      languages:  BTreeSet::new(),
    })
    .await
    .unwrap_err();

  let violations = match err {
    Error::Validation(violations) => violations,
    other => panic!("expected validation errors, got {other:?}"),
  };
  let fields: BTreeSet<_> = violations.iter().map(|v| v.field.as_str()).collect();
  assert_eq!(fields, BTreeSet::from(["first_name", "languages", "last_name"]));
  assert!(m.active_teachers().await.unwrap().is_empty());
}

#[tokio::test]
async fn missing_term_is_a_validation_error() {
  let m = manager().await;
  let (t, s) = pair(&m).await;
  let err = m
    .create_lesson(CreateLesson {
      teacher_id: t.get(),
      student_id: s.get(),
      term:       None,
    })
    .await
    .unwrap_err();

  let violations = match err {
    Error::Validation(violations) => violations,
    other => panic!("expected validation errors, got {other:?}"),
  };
  assert_eq!(violations.len(), 1);
  assert_eq!(violations[0].field, "term");
  assert_eq!(violations[0].message, "term cannot be null");
}

#[tokio::test]
async fn validation_runs_before_entity_resolution() {
  let m = manager().await;
  let err = m
    .create_lesson(CreateLesson {
      teacher_id: 0,
      student_id: 12,
      term:       Some(now() + TimeDelta::days(1)),
    })
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Validation(_)));
}
