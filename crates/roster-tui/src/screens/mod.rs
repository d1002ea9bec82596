//! Screen implementations, one per route. Each is a top-level Component.

pub mod detail;
pub mod form;
pub mod list;

use std::future::Future;

use roster_core::{FormMode, Route, StudentApi};
use tokio::sync::mpsc::UnboundedSender;

use crate::action::{Action, Payload};
use crate::component::Component;

/// Mount a fresh screen for `route`. Every navigation builds a new one, so
/// no state survives from the previous mount.
pub fn mount<A>(route: &Route, api: A, generation: u64) -> Box<dyn Component>
where
    A: StudentApi + Clone + 'static,
{
    match route {
        Route::List => Box::new(list::ListScreen::new(api, generation)),
        Route::Detail(id) => Box::new(detail::DetailScreen::new(api, id.clone(), generation)),
        Route::Add => Box::new(form::FormScreen::new(api, FormMode::Add, generation)),
        Route::Edit(id) => Box::new(form::FormScreen::new(
            api,
            FormMode::Edit(id.clone()),
            generation,
        )),
    }
}

/// Issues requests on behalf of one mounted screen and tags their results
/// with its generation.
#[derive(Debug, Clone)]
pub struct Requests {
    generation: u64,
    tx: Option<UnboundedSender<Action>>,
}

impl Requests {
    pub fn new(generation: u64) -> Self {
        Self {
            generation,
            tx: None,
        }
    }

    pub fn attach(&mut self, tx: UnboundedSender<Action>) {
        self.tx = Some(tx);
    }

    /// Run `request` in the background and post its payload. No-op until a
    /// sender is attached.
    pub fn spawn<F>(&self, request: F)
    where
        F: Future<Output = Payload> + Send + 'static,
    {
        let Some(tx) = self.tx.clone() else {
            return;
        };
        let generation = self.generation;
        tokio::spawn(async move {
            let payload = request.await;
            let _ = tx.send(Action::Loaded {
                generation,
                payload,
            });
        });
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod stub {
    use std::sync::{Arc, Mutex};

    use roster_core::{CoreError, Draft, Student, StudentApi, StudentId, StudentPatch};

    pub fn student(id: &str, code: &str, name: &str, active: bool) -> Student {
        Student {
            id: StudentId::new(id),
            student_code: code.into(),
            name: name.into(),
            is_active: active,
            created_at: None,
            updated_at: None,
        }
    }

    /// Canned in-memory collection. Mutations are recorded, not applied.
    #[derive(Debug, Clone, Default)]
    pub struct StubApi {
        students: Vec<Student>,
        calls: Arc<Mutex<Vec<String>>>,
    }

    impl StubApi {
        pub fn with_students(students: Vec<Student>) -> Self {
            Self {
                students,
                calls: Arc::default(),
            }
        }

        #[allow(clippy::unwrap_used)]
        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        #[allow(clippy::unwrap_used)]
        fn record(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }
    }

    impl StudentApi for StubApi {
        async fn list(&self) -> Result<Vec<Student>, CoreError> {
            self.record("list".into());
            Ok(self.students.clone())
        }

        async fn get(&self, id: &StudentId) -> Result<Option<Student>, CoreError> {
            self.record(format!("get {id}"));
            Ok(self.students.iter().find(|s| &s.id == id).cloned())
        }

        async fn create(&self, draft: &Draft) -> Result<Option<Student>, CoreError> {
            self.record(format!("create {}", draft.student_code));
            Ok(None)
        }

        async fn update(
            &self,
            id: &StudentId,
            _patch: &StudentPatch,
        ) -> Result<Option<Student>, CoreError> {
            self.record(format!("update {id}"));
            Ok(None)
        }

        async fn remove(&self, id: &StudentId) -> Result<(), CoreError> {
            self.record(format!("remove {id}"));
            Ok(())
        }
    }
}
