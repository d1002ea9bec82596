// ── Student domain types ──
//
// The remote service owns every student record. Nothing here outlives the
// screen that fetched it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── StudentId ───────────────────────────────────────────────────────

/// Opaque identifier assigned by the remote service.
///
/// Usually a MongoDB ObjectId, but the client never relies on that.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StudentId(String);

impl StudentId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for StudentId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_owned()))
    }
}

impl From<String> for StudentId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for StudentId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl AsRef<str> for StudentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ── Student ─────────────────────────────────────────────────────────

/// The canonical Student type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    /// Unique, set at creation and never edited afterwards.
    pub student_code: String,
    pub name: String,
    pub is_active: bool,

    // Server-owned timestamps
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Student {
    /// `"Active"` or `"Inactive"`.
    pub fn status_label(&self) -> &'static str {
        status_label(self.is_active)
    }
}

// ── Write payloads ──────────────────────────────────────────────────

/// The in-progress field set held by a form before submission.
///
/// Also the body of a create call: the code is sent only here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draft {
    pub student_code: String,
    pub name: String,
    pub is_active: bool,
}

impl Default for Draft {
    fn default() -> Self {
        Self {
            student_code: String::new(),
            name: String::new(),
            is_active: true,
        }
    }
}

impl From<&Student> for Draft {
    fn from(s: &Student) -> Self {
        Self {
            student_code: s.student_code.clone(),
            name: s.name.clone(),
            is_active: s.is_active,
        }
    }
}

/// The mutable fields of an existing student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentPatch {
    pub name: String,
    pub is_active: bool,
}

impl StudentPatch {
    /// Same name, flipped active flag.
    pub fn toggled(student: &Student) -> Self {
        Self {
            name: student.name.clone(),
            is_active: !student.is_active,
        }
    }
}

pub(crate) fn status_label(active: bool) -> &'static str {
    if active { "Active" } else { "Inactive" }
}
