//! Domain layer between `roster-api` and the front ends (CLI / TUI).
//!
//! - **[`StudentApi`]**: the seam over the remote student collection, with
//!   [`RemoteStudents`] as the HTTP implementation.
//! - **View models** ([`view`]): [`ListViewModel`], [`DetailViewModel`] and
//!   [`FormViewModel`]. Each screen owns one, created fresh on navigation.
//!   Operations come as sync `begin_*`/`complete_*` pairs for event-loop
//!   front ends and as `async` conveniences for sequential callers.
//! - **[`Notice`] / [`ViewState`]**: per-screen loading flag and
//!   self-clearing success/error banners.
//! - **[`Route`]**: the four navigable locations.

pub mod api;
pub mod convert;
pub mod error;
pub mod model;
pub mod notice;
pub mod route;
pub mod view;

// ── Primary re-exports ──────────────────────────────────────────────
pub use api::{RemoteStudents, StudentApi};
pub use error::CoreError;
pub use model::{Draft, Student, StudentId, StudentPatch};
pub use notice::{NOTICE_TTL, Notice, ViewState};
pub use route::{Route, RouteError};
pub use view::{
    DELETE_CONFIRMATION, DetailState, DetailViewModel, FormMode, FormViewModel, ListViewModel,
    SortDirection, SortField, Submission,
};
