// ── List screen ──
//
// Holds the fetched collection plus search and sort state. The visible rows
// are derived on every read and never stored. Mutations go to the remote
// service first and are followed by a full refresh; nothing is patched
// locally.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tracing::warn;

use crate::api::StudentApi;
use crate::error::CoreError;
use crate::model::student::status_label;
use crate::model::{Student, StudentId, StudentPatch};
use crate::notice::ViewState;

/// Prompt the front end shows before a delete.
pub const DELETE_CONFIRMATION: &str = "Are you sure you want to delete this student?";

const FETCH_FAILED: &str = "Error fetching students";
const DELETED: &str = "Student deleted successfully!";
const DELETE_FAILED: &str = "Error deleting student";
const TOGGLE_FAILED: &str = "Error updating student status";

/// Sortable column.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[strum(serialize_all = "kebab-case")]
pub enum SortField {
    #[strum(to_string = "code", serialize = "student-code")]
    StudentCode,
    #[default]
    Name,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[strum(serialize_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    #[must_use]
    pub fn flipped(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

impl SortField {
    fn key(self, student: &Student) -> &str {
        match self {
            Self::StudentCode => &student.student_code,
            Self::Name => &student.name,
        }
    }
}

pub struct ListViewModel<A> {
    api: A,
    students: Vec<Student>,
    search_term: String,
    sort_field: SortField,
    sort_direction: SortDirection,
    state: ViewState,
}

impl<A: StudentApi> ListViewModel<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            students: Vec::new(),
            search_term: String::new(),
            sort_field: SortField::default(),
            sort_direction: SortDirection::default(),
            state: ViewState::default(),
        }
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn api(&self) -> &A {
        &self.api
    }

    /// The authoritative collection, in server order.
    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn find(&self, id: &StudentId) -> Option<&Student> {
        self.students.iter().find(|s| &s.id == id)
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    pub fn sort_field(&self) -> SortField {
        self.sort_field
    }

    pub fn sort_direction(&self) -> SortDirection {
        self.sort_direction
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.state.error.current()
    }

    pub fn success(&self) -> Option<&str> {
        self.state.success.current()
    }

    /// The latest success message, expired or not. One-shot front ends read
    /// it after the follow-up refresh, which may outlast the notice.
    pub fn last_success(&self) -> Option<&str> {
        self.state.success.last()
    }

    /// Expire banners. Returns `true` if a redraw is needed.
    pub fn tick(&mut self) -> bool {
        self.state.tick()
    }

    // ── Derived projection ───────────────────────────────────────────

    /// Rows matching the search term, in the current sort order.
    ///
    /// Matching is a case-insensitive substring test on name or code. The
    /// sort is stable in both directions, so equal keys keep server order.
    pub fn derived_rows(&self) -> Vec<&Student> {
        let needle = self.search_term.to_lowercase();
        let mut rows: Vec<&Student> = self
            .students
            .iter()
            .filter(|s| {
                needle.is_empty()
                    || s.name.to_lowercase().contains(&needle)
                    || s.student_code.to_lowercase().contains(&needle)
            })
            .collect();

        let field = self.sort_field;
        let direction = self.sort_direction;
        rows.sort_by(|a, b| {
            let ord = field.key(a).cmp(field.key(b));
            match direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            }
        });
        rows
    }

    /// Same column flips direction; a new column starts ascending.
    pub fn toggle_sort(&mut self, field: SortField) {
        if field == self.sort_field {
            self.sort_direction = self.sort_direction.flipped();
        } else {
            self.sort_field = field;
            self.sort_direction = SortDirection::Asc;
        }
    }

    // ── Refresh ──────────────────────────────────────────────────────

    pub fn begin_refresh(&mut self) {
        self.state.begin();
    }

    pub fn complete_refresh(&mut self, result: Result<Vec<Student>, CoreError>) {
        match result {
            Ok(students) => {
                self.students = students;
                self.state.settle();
            }
            Err(e) => {
                warn!(error = %e, "list fetch failed");
                self.state.fail(FETCH_FAILED);
            }
        }
    }

    /// Fetch the collection. The error is also recorded in the view state.
    pub async fn refresh(&mut self) -> Result<(), CoreError> {
        self.begin_refresh();
        let result = self.api.list().await;
        let outcome = result.as_ref().map(|_| ()).map_err(Clone::clone);
        self.complete_refresh(result);
        outcome
    }

    // ── Delete ───────────────────────────────────────────────────────

    /// Record the outcome of a confirmed delete. Returns `true` when the
    /// caller should refresh.
    pub fn complete_delete(&mut self, result: Result<(), CoreError>) -> bool {
        match result {
            Ok(()) => {
                self.state.success.show(DELETED);
                true
            }
            Err(e) => {
                warn!(error = %e, "delete failed");
                self.state.error.show(DELETE_FAILED);
                false
            }
        }
    }

    /// Delete a student the user has already confirmed, then refresh on
    /// success.
    pub async fn delete_student(&mut self, id: &StudentId) -> Result<(), CoreError> {
        let result = self.api.remove(id).await;
        let outcome = result.clone();
        if self.complete_delete(result) {
            let _ = self.refresh().await;
        }
        outcome
    }

    // ── Toggle status ────────────────────────────────────────────────

    /// Record the outcome of a status flip to `now_active`. Returns `true`
    /// when the caller should refresh.
    pub fn complete_toggle(
        &mut self,
        now_active: bool,
        result: Result<Option<Student>, CoreError>,
    ) -> bool {
        match result {
            Ok(_) => {
                self.state.success.show(format!(
                    "Student status updated to {}!",
                    status_label(now_active)
                ));
                true
            }
            Err(e) => {
                warn!(error = %e, "status toggle failed");
                self.state.error.show(TOGGLE_FAILED);
                false
            }
        }
    }

    /// Flip the active flag remotely. The local row is left untouched until
    /// the follow-up refresh.
    pub async fn toggle_status(&mut self, student: &Student) -> Result<(), CoreError> {
        let patch = StudentPatch::toggled(student);
        let result = self.api.update(&student.id, &patch).await;
        let outcome = result.clone().map(|_| ());
        if self.complete_toggle(patch.is_active, result) {
            let _ = self.refresh().await;
        }
        outcome
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::api::fake::{FakeApi, student};
    use crate::notice::NOTICE_TTL;

    fn names<A: StudentApi>(vm: &ListViewModel<A>) -> Vec<&str> {
        vm.derived_rows().iter().map(|s| s.name.as_str()).collect()
    }

    async fn bob_and_amy() -> (FakeApi, ListViewModel<FakeApi>) {
        let api = FakeApi::with_students(vec![
            student("1", "A1", "Bob", true),
            student("2", "A2", "Amy", false),
        ]);
        let mut vm = ListViewModel::new(api.clone());
        vm.refresh().await.unwrap();
        (api, vm)
    }

    #[tokio::test]
    async fn sorts_by_name_and_searches_by_code() {
        let (_, mut vm) = bob_and_amy().await;

        assert_eq!(names(&vm), vec!["Amy", "Bob"]);

        vm.toggle_sort(SortField::Name);
        assert_eq!(vm.sort_direction(), SortDirection::Desc);
        assert_eq!(names(&vm), vec!["Bob", "Amy"]);

        vm.set_search_term("a2");
        assert_eq!(names(&vm), vec!["Amy"]);
    }

    #[tokio::test]
    async fn search_matches_name_or_code_case_insensitively() {
        let api = FakeApi::with_students(vec![
            student("1", "CS101", "Linh", true),
            student("2", "MA200", "Csaba", true),
            student("3", "PH300", "Omar", true),
        ]);
        let mut vm = ListViewModel::new(api);
        vm.refresh().await.unwrap();

        vm.set_search_term("cs");
        assert_eq!(names(&vm), vec!["Csaba", "Linh"]);

        vm.set_search_term("");
        assert_eq!(vm.derived_rows().len(), 3);

        vm.set_search_term("zzz");
        assert!(vm.derived_rows().is_empty());
    }

    #[tokio::test]
    async fn sort_is_stable_in_both_directions() {
        let api = FakeApi::with_students(vec![
            student("1", "B", "Same", true),
            student("2", "A", "Same", true),
            student("3", "C", "Other", true),
        ]);
        let mut vm = ListViewModel::new(api);
        vm.refresh().await.unwrap();

        let ids = |vm: &ListViewModel<FakeApi>| -> Vec<String> {
            vm.derived_rows().iter().map(|s| s.id.to_string()).collect()
        };

        assert_eq!(ids(&vm), vec!["3", "1", "2"]);
        vm.toggle_sort(SortField::Name);
        assert_eq!(ids(&vm), vec!["1", "2", "3"]);
    }

    #[tokio::test]
    async fn toggling_same_field_twice_restores_order() {
        let (_, mut vm) = bob_and_amy().await;
        vm.toggle_sort(SortField::StudentCode);
        let before: Vec<String> = names(&vm).into_iter().map(String::from).collect();

        vm.toggle_sort(SortField::StudentCode);
        vm.toggle_sort(SortField::StudentCode);

        assert_eq!(names(&vm), before);
    }

    #[tokio::test]
    async fn switching_field_resets_to_ascending() {
        let (_, mut vm) = bob_and_amy().await;
        vm.toggle_sort(SortField::Name);
        assert_eq!(vm.sort_direction(), SortDirection::Desc);

        vm.toggle_sort(SortField::StudentCode);
        assert_eq!(vm.sort_field(), SortField::StudentCode);
        assert_eq!(vm.sort_direction(), SortDirection::Asc);
        assert_eq!(names(&vm), vec!["Bob", "Amy"]);
    }

    #[tokio::test]
    async fn derived_rows_leave_collection_untouched() {
        let (_, mut vm) = bob_and_amy().await;
        vm.toggle_sort(SortField::Name);
        let _ = vm.derived_rows();
        let order: Vec<&str> = vm.students().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(order, vec!["Bob", "Amy"]);
    }

    #[tokio::test]
    async fn refresh_failure_sets_error_and_keeps_rows() {
        let (api, mut vm) = bob_and_amy().await;
        api.fail_next(CoreError::Network {
            message: "connection refused".into(),
        });

        assert!(vm.refresh().await.is_err());

        assert!(!vm.is_loading());
        assert_eq!(vm.error(), Some("Error fetching students"));
        assert_eq!(vm.students().len(), 2);
    }

    #[tokio::test]
    async fn delete_then_refresh_drops_the_row() {
        let (api, mut vm) = bob_and_amy().await;

        tokio_test::assert_ok!(vm.delete_student(&StudentId::from("1")).await);

        assert_eq!(vm.success(), Some("Student deleted successfully!"));
        assert!(vm.derived_rows().iter().all(|s| s.id.as_str() != "1"));
        assert_eq!(api.calls(), vec!["list", "remove 1", "list"]);
    }

    #[tokio::test]
    async fn failed_delete_does_not_refresh() {
        let (api, mut vm) = bob_and_amy().await;

        tokio_test::assert_err!(vm.delete_student(&StudentId::from("missing")).await);

        assert_eq!(vm.error(), Some("Error deleting student"));
        assert_eq!(api.calls(), vec!["list", "remove missing"]);
    }

    #[tokio::test]
    async fn toggle_names_the_new_state() {
        let (api, mut vm) = bob_and_amy().await;

        let bob = vm.find(&StudentId::from("1")).cloned().unwrap();
        vm.toggle_status(&bob).await.unwrap();
        assert_eq!(vm.success(), Some("Student status updated to Inactive!"));
        assert!(!vm.find(&bob.id).unwrap().is_active);

        let amy = vm.find(&StudentId::from("2")).cloned().unwrap();
        vm.toggle_status(&amy).await.unwrap();
        assert_eq!(vm.success(), Some("Student status updated to Active!"));

        assert_eq!(
            api.calls(),
            vec!["list", "update 1", "list", "update 2", "list"]
        );
    }

    #[tokio::test]
    async fn toggle_is_not_applied_locally_before_completion() {
        let (_, mut vm) = bob_and_amy().await;
        let bob = vm.find(&StudentId::from("1")).cloned().unwrap();

        let refresh = vm.complete_toggle(false, Err(CoreError::validation("nope")));

        assert!(!refresh);
        assert!(vm.find(&bob.id).unwrap().is_active);
        assert_eq!(vm.error(), Some("Error updating student status"));
    }

    #[tokio::test(start_paused = true)]
    async fn success_banner_expires() {
        let (_, mut vm) = bob_and_amy().await;
        vm.complete_delete(Ok(()));
        assert!(vm.success().is_some());

        tokio::time::advance(NOTICE_TTL).await;
        assert!(vm.tick());
        assert_eq!(vm.success(), None);
    }

    #[test]
    fn sort_field_parses_cli_spellings() {
        assert_eq!("code".parse::<SortField>().unwrap(), SortField::StudentCode);
        assert_eq!("name".parse::<SortField>().unwrap(), SortField::Name);
        assert_eq!("desc".parse::<SortDirection>().unwrap(), SortDirection::Desc);
    }
}
