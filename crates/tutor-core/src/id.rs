//! Strongly-typed integer ids for the three entities.
//!
//! Ids are assigned by the store. Wrapping them keeps a `StudentId` from being
//! passed where a `TeacherId` is expected.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! define_id {
  ($(#[$meta:meta])* $name:ident) => {
    $(#[$meta])*
    #[derive(
      Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
    )]
    #[serde(transparent)]
    pub struct $name(pub i64);

    impl $name {
      #[inline]
      pub const fn get(self) -> i64 { self.0 }
    }

    impl From<i64> for $name {
      fn from(v: i64) -> Self { Self(v) }
    }

    impl From<$name> for i64 {
      fn from(v: $name) -> Self { v.0 }
    }

    impl fmt::Display for $name {
      fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
      }
    }
  };
}

define_id!(
  /// Identity of a [`Teacher`](crate::teacher::Teacher).
  TeacherId
);
define_id!(
  /// Identity of a [`Student`](crate::student::Student).
  StudentId
);
define_id!(
  /// Identity of a [`Lesson`](crate::lesson::Lesson).
  LessonId
);
