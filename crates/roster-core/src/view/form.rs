// ── Add / edit form ──
//
// One view model serves both modes. Add starts from an empty draft; edit
// prefills from the service and never sends the student code back.

use std::fmt;

use tokio::time::Instant;
use tracing::warn;

use crate::api::StudentApi;
use crate::error::CoreError;
use crate::model::{Draft, Student, StudentId, StudentPatch};
use crate::notice::{NOTICE_TTL, ViewState};
use crate::route::Route;

const CODE_REQUIRED: &str = "Student Code is required";
const NAME_REQUIRED: &str = "Name is required";
const CODE_TOO_SHORT: &str = "Student Code must be at least 3 characters (min. 3 characters)";
const NAME_TOO_SHORT: &str = "Name must be at least 2 characters (min. 2 characters)";
const PREFILL_FAILED: &str = "Error fetching student data";

pub const MIN_CODE_LEN: usize = 3;
pub const MIN_NAME_LEN: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Add,
    Edit(StudentId),
}

impl FormMode {
    pub fn is_add(&self) -> bool {
        matches!(self, Self::Add)
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Add => "Add New Student",
            Self::Edit(_) => "Edit Student",
        }
    }

    fn verb(&self) -> &'static str {
        match self {
            Self::Add => "creating",
            Self::Edit(_) => "updating",
        }
    }

    fn done(&self) -> &'static str {
        match self {
            Self::Add => "Student created successfully!",
            Self::Edit(_) => "Student updated successfully!",
        }
    }
}

impl fmt::Display for FormMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.is_add() { "add" } else { "edit" })
    }
}

/// First violated rule wins; errors are not aggregated.
pub fn validate(draft: &Draft, mode: &FormMode) -> Result<(), CoreError> {
    let add = mode.is_add();
    if add && draft.student_code.trim().is_empty() {
        return Err(CoreError::validation(CODE_REQUIRED));
    }
    if draft.name.trim().is_empty() {
        return Err(CoreError::validation(NAME_REQUIRED));
    }
    if add && draft.student_code.chars().count() < MIN_CODE_LEN {
        return Err(CoreError::validation(CODE_TOO_SHORT));
    }
    if draft.name.chars().count() < MIN_NAME_LEN {
        return Err(CoreError::validation(NAME_TOO_SHORT));
    }
    Ok(())
}

/// A validated request ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Create(Draft),
    Update(StudentId, StudentPatch),
}

impl Submission {
    pub async fn send<A: StudentApi>(&self, api: &A) -> Result<Option<Student>, CoreError> {
        match self {
            Self::Create(draft) => api.create(draft).await,
            Self::Update(id, patch) => api.update(id, patch).await,
        }
    }
}

pub struct FormViewModel<A> {
    api: A,
    mode: FormMode,
    draft: Draft,
    state: ViewState,
    prefilling: bool,
    redirect_at: Option<Instant>,
}

impl<A: StudentApi> FormViewModel<A> {
    /// Edit mode starts in the prefill-loading state.
    pub fn new(api: A, mode: FormMode) -> Self {
        let prefilling = !mode.is_add();
        Self {
            api,
            mode,
            draft: Draft::default(),
            state: ViewState {
                loading: prefilling,
                ..ViewState::default()
            },
            prefilling,
            redirect_at: None,
        }
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn is_loading(&self) -> bool {
        self.state.loading
    }

    /// Edit-mode prefill outstanding: show only a loading indicator.
    pub fn is_fetching(&self) -> bool {
        self.prefilling
    }

    /// Off while a submit is outstanding and while the post-submit redirect
    /// is pending.
    pub fn submit_enabled(&self) -> bool {
        !self.state.loading && self.redirect_at.is_none()
    }

    pub fn error(&self) -> Option<&str> {
        self.state.error.current()
    }

    pub fn success(&self) -> Option<&str> {
        self.state.success.current()
    }

    pub fn tick(&mut self) -> bool {
        self.state.tick()
    }

    // ── Field edits ──────────────────────────────────────────────────
    //
    // Every edit clears a visible error but leaves a success message.

    /// Ignored in edit mode; the code is immutable once created.
    pub fn set_student_code(&mut self, code: impl Into<String>) {
        if self.mode.is_add() {
            self.draft.student_code = code.into();
        }
        self.state.error.clear();
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.draft.name = name.into();
        self.state.error.clear();
    }

    pub fn set_active(&mut self, active: bool) {
        self.draft.is_active = active;
        self.state.error.clear();
    }

    pub fn toggle_active(&mut self) {
        self.set_active(!self.draft.is_active);
    }

    // ── Prefill (edit mode) ──────────────────────────────────────────

    /// Start the prefill fetch. `None` in add mode.
    pub fn begin_prefill(&mut self) -> Option<StudentId> {
        let FormMode::Edit(id) = &self.mode else {
            return None;
        };
        self.prefilling = true;
        self.state.begin();
        Some(id.clone())
    }

    /// Apply a prefill result; results for another id are dropped.
    pub fn complete_prefill(&mut self, id: &StudentId, result: Result<Option<Student>, CoreError>) {
        if self.mode != FormMode::Edit(id.clone()) {
            return;
        }
        self.prefilling = false;
        match result {
            Ok(Some(student)) => {
                self.draft = Draft::from(&student);
                self.state.settle();
            }
            Ok(None) => {
                warn!(%id, "prefill returned no student");
                self.state.fail(PREFILL_FAILED);
            }
            Err(e) => {
                warn!(%id, error = %e, "prefill failed");
                self.state.fail(PREFILL_FAILED);
            }
        }
    }

    /// Prefill the draft in edit mode; no-op in add mode. A missing
    /// payload comes back as [`CoreError::NotFound`].
    pub async fn load(&mut self) -> Result<(), CoreError> {
        let Some(id) = self.begin_prefill() else {
            return Ok(());
        };
        let result = self.api.get(&id).await;
        let outcome = match &result {
            Ok(Some(_)) => Ok(()),
            Ok(None) => Err(CoreError::not_found(id.as_str())),
            Err(e) => Err(e.clone()),
        };
        self.complete_prefill(&id, result);
        outcome
    }

    /// Switch an edit form to another student. Returns `true` if a prefill
    /// is now needed.
    pub fn retarget(&mut self, id: StudentId) -> bool {
        match &self.mode {
            FormMode::Edit(current) if *current != id => {
                self.mode = FormMode::Edit(id);
                self.draft = Draft::default();
                self.redirect_at = None;
                true
            }
            _ => false,
        }
    }

    pub async fn reload_if_changed(&mut self, id: StudentId) -> Result<bool, CoreError> {
        if !self.retarget(id) {
            return Ok(false);
        }
        self.load().await?;
        Ok(true)
    }

    // ── Submit ───────────────────────────────────────────────────────

    /// Validate and build the request. A validation failure is shown and
    /// returned; no request should be sent.
    pub fn prepare_submit(&mut self) -> Result<Submission, CoreError> {
        if let Err(e) = validate(&self.draft, &self.mode) {
            self.state.error.show(e.user_message());
            return Err(e);
        }
        self.state.begin();
        Ok(match &self.mode {
            FormMode::Add => Submission::Create(self.draft.clone()),
            FormMode::Edit(id) => Submission::Update(
                id.clone(),
                StudentPatch {
                    name: self.draft.name.clone(),
                    is_active: self.draft.is_active,
                },
            ),
        })
    }

    pub fn complete_submit(&mut self, result: &Result<Option<Student>, CoreError>) {
        match result {
            Ok(_) => {
                self.state.succeed(self.mode.done());
                self.redirect_at = Some(Instant::now() + NOTICE_TTL);
            }
            Err(e) => {
                warn!(mode = %self.mode, error = %e, "submit failed");
                self.state.fail(format!(
                    "Error {} student: {}",
                    self.mode.verb(),
                    e.user_message()
                ));
            }
        }
    }

    /// Validate, send, and record the outcome.
    pub async fn submit(&mut self) -> Result<Option<Student>, CoreError> {
        let submission = self.prepare_submit()?;
        let result = submission.send(&self.api).await;
        self.complete_submit(&result);
        result
    }

    // ── Redirect ─────────────────────────────────────────────────────

    pub fn redirect_pending(&self) -> bool {
        self.redirect_at.is_some()
    }

    /// The list route once the post-submit delay has elapsed. Fires once.
    pub fn due_redirect(&mut self) -> Option<Route> {
        match self.redirect_at {
            Some(at) if Instant::now() >= at => {
                self.redirect_at = None;
                Some(Route::List)
            }
            _ => None,
        }
    }
}
