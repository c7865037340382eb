//! SQL schema for the scheduler's SQLite store.
//!
//! Executed on every open: three soft-delete tables plus the indexes the
//! per-teacher listings and the overlap query use.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- No DELETE is ever issued against these tables; removal flips `deleted`.
CREATE TABLE IF NOT EXISTS teachers (
    teacher_id  INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name  TEXT    NOT NULL,
    last_name   TEXT    NOT NULL,
    languages   TEXT    NOT NULL DEFAULT '[]',  -- JSON array, e.g. [\"JAVA\"]
    deleted     INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS students (
    student_id  INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name  TEXT    NOT NULL,
    last_name   TEXT    NOT NULL,
    language    TEXT    NOT NULL,
    teacher_id  INTEGER NOT NULL REFERENCES teachers(teacher_id),
    deleted     INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS lessons (
    lesson_id   INTEGER PRIMARY KEY AUTOINCREMENT,
    teacher_id  INTEGER NOT NULL REFERENCES teachers(teacher_id),
    student_id  INTEGER NOT NULL REFERENCES students(student_id),
    term_secs   INTEGER NOT NULL,  -- seconds since the Unix epoch
    term_nanos  INTEGER NOT NULL,  -- 0..=1_999_999_999 (leap seconds)
    deleted     INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS students_teacher_idx     ON students(teacher_id);
CREATE INDEX IF NOT EXISTS lessons_teacher_term_idx ON lessons(teacher_id, term_secs, term_nanos);

PRAGMA user_version = 1;
";
