// ── Navigable routes ──

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::model::StudentId;

/// Every location the shell can show.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    /// `/`
    List,
    /// `/student/{id}`
    Detail(StudentId),
    /// `/add-student`
    Add,
    /// `/edit-student/{id}`
    Edit(StudentId),
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::List => f.write_str("/"),
            Self::Detail(id) => write!(f, "/student/{id}"),
            Self::Add => f.write_str("/add-student"),
            Self::Edit(id) => write!(f, "/edit-student/{id}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown route: {0}")]
pub struct RouteError(String);

impl FromStr for Route {
    type Err = RouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        let path = match raw.strip_suffix('/') {
            Some(p) if !p.is_empty() => p,
            _ => raw,
        };
        let rest = path
            .strip_prefix('/')
            .ok_or_else(|| RouteError(raw.to_owned()))?;

        let segments: Vec<&str> = rest.split('/').collect();
        match segments.as_slice() {
            [""] => Ok(Self::List),
            ["add-student"] => Ok(Self::Add),
            ["student", id] if !id.is_empty() => Ok(Self::Detail(StudentId::from(*id))),
            ["edit-student", id] if !id.is_empty() => Ok(Self::Edit(StudentId::from(*id))),
            _ => Err(RouteError(raw.to_owned())),
        }
    }
}
