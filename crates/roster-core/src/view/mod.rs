// ── Screen view models ──
//
// One view model per screen. Each is created fresh on navigation and owns
// its own `ViewState`; nothing is shared across screens.

pub mod detail;
pub mod form;
pub mod list;

pub use detail::{DetailState, DetailViewModel};
pub use form::{FormMode, FormViewModel, Submission};
pub use list::{DELETE_CONFIRMATION, ListViewModel, SortDirection, SortField};
