// ── Detail screen ──

use tracing::warn;

use crate::api::StudentApi;
use crate::error::CoreError;
use crate::model::{Student, StudentId};

const FETCH_FAILED: &str = "Error fetching student details";

/// Exactly one of these renders at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailState<'a> {
    Loading,
    Error(&'a str),
    /// The fetch succeeded but carried no student.
    NotFound,
    Present(&'a Student),
}

/// Read-only view of a single student.
///
/// Starts in the loading state because mounting the screen issues the
/// fetch. A failed fetch stays on screen until the identifier changes, so
/// this view carries no expiring notices.
pub struct DetailViewModel<A> {
    api: A,
    id: StudentId,
    student: Option<Student>,
    failure: Option<String>,
    loading: bool,
}

impl<A: StudentApi> DetailViewModel<A> {
    pub fn new(api: A, id: StudentId) -> Self {
        Self {
            api,
            id,
            student: None,
            failure: None,
            loading: true,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn id(&self) -> &StudentId {
        &self.id
    }

    pub fn student(&self) -> Option<&Student> {
        self.student.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn render_state(&self) -> DetailState<'_> {
        if self.loading {
            return DetailState::Loading;
        }
        if let Some(message) = &self.failure {
            return DetailState::Error(message);
        }
        match &self.student {
            Some(student) => DetailState::Present(student),
            None => DetailState::NotFound,
        }
    }

    /// Start a fetch of the current id and return it.
    pub fn begin_load(&mut self) -> StudentId {
        self.loading = true;
        self.failure = None;
        self.id.clone()
    }

    /// Apply a fetch result. Results for an id other than the current one
    /// are dropped.
    pub fn complete_load(&mut self, id: &StudentId, result: Result<Option<Student>, CoreError>) {
        if id != &self.id {
            return;
        }
        self.loading = false;
        match result {
            Ok(student) => {
                self.student = student;
                self.failure = None;
            }
            Err(e) => {
                warn!(%id, error = %e, "detail fetch failed");
                self.student = None;
                self.failure = Some(FETCH_FAILED.to_owned());
            }
        }
    }

    /// Fetch the current id. A transport or server failure is returned as
    /// well as recorded; an empty payload is not an error.
    pub async fn load(&mut self) -> Result<(), CoreError> {
        let id = self.begin_load();
        let result = self.api.get(&id).await;
        let outcome = result.as_ref().map(|_| ()).map_err(Clone::clone);
        self.complete_load(&id, result);
        outcome
    }

    /// Point the screen at `id`. Returns `true` if it differs from the
    /// current one, in which case previous data is discarded.
    pub fn retarget(&mut self, id: StudentId) -> bool {
        if id == self.id {
            return false;
        }
        self.id = id;
        self.student = None;
        self.failure = None;
        true
    }

    /// Re-fetch only when the identifier actually changed.
    pub async fn load_if_changed(&mut self, id: StudentId) -> Result<bool, CoreError> {
        if !self.retarget(id) {
            return Ok(false);
        }
        self.load().await?;
        Ok(true)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::api::fake::{FakeApi, student};

    fn api() -> FakeApi {
        FakeApi::with_students(vec![student("s1", "C100", "Amy", true)])
    }

    #[test]
    fn starts_loading() {
        let vm = DetailViewModel::new(api(), "s1".into());
        assert_eq!(vm.render_state(), DetailState::Loading);
    }

    #[tokio::test]
    async fn present_after_successful_load() {
        let mut vm = DetailViewModel::new(api(), "s1".into());
        vm.load().await.unwrap();
        match vm.render_state() {
            DetailState::Present(s) => assert_eq!(s.name, "Amy"),
            other => panic!("expected Present, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_payload_renders_not_found() {
        let api = api();
        api.empty_gets();
        let mut vm = DetailViewModel::new(api, "ghost".into());
        vm.load().await.unwrap();
        assert_eq!(vm.render_state(), DetailState::NotFound);
    }

    #[tokio::test(start_paused = true)]
    async fn failure_renders_error_and_sticks() {
        let mut vm = DetailViewModel::new(api(), "missing".into());
        let err = vm.load().await.unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert_eq!(
            vm.render_state(),
            DetailState::Error("Error fetching student details")
        );

        tokio::time::advance(std::time::Duration::from_secs(10)).await;
        assert_eq!(
            vm.render_state(),
            DetailState::Error("Error fetching student details")
        );
    }

    #[tokio::test]
    async fn reloads_only_when_id_changes() {
        let api = api();
        let mut vm = DetailViewModel::new(api.clone(), "s1".into());
        vm.load().await.unwrap();

        assert!(!vm.load_if_changed("s1".into()).await.unwrap());
        assert!(vm.load_if_changed("missing".into()).await.is_err());
        assert_eq!(api.calls(), vec!["get s1", "get missing"]);
    }

    #[test]
    fn stale_result_is_dropped() {
        let mut vm = DetailViewModel::new(api(), "s1".into());
        let stale = vm.begin_load();
        vm.retarget("s2".into());
        vm.complete_load(&stale, Ok(Some(student("s1", "C100", "Amy", true))));
        assert_eq!(vm.render_state(), DetailState::Loading);
    }

    #[tokio::test]
    async fn reload_after_failure_shows_loading_then_student() {
        let mut vm = DetailViewModel::new(api(), "s1".into());
        vm.complete_load(
            &StudentId::from("s1"),
            Err(CoreError::Network {
                message: "refused".into(),
            }),
        );
        assert!(!vm.is_loading());
        assert!(matches!(vm.render_state(), DetailState::Error(_)));

        vm.begin_load();
        assert!(vm.is_loading());
        assert_eq!(vm.render_state(), DetailState::Loading);

        vm.load().await.unwrap();
        assert!(matches!(vm.render_state(), DetailState::Present(s) if s.name == "Amy"));
    }
}
