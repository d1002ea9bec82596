// ── Remote resource seam ──
//
// View models talk to the student collection only through `StudentApi`.
// `RemoteStudents` is the HTTP implementation; tests substitute an
// in-memory fake.

use std::future::Future;

use roster_api::{CreateStudentRequest, StudentClient, UpdateStudentRequest};
use tracing::{debug, info};

use crate::error::CoreError;
use crate::model::{Draft, Student, StudentId, StudentPatch};

/// The five operations over the student collection.
///
/// Every failure arrives as a [`CoreError`]; nothing is retried.
pub trait StudentApi: Send + Sync {
    fn list(&self) -> impl Future<Output = Result<Vec<Student>, CoreError>> + Send;

    /// `Ok(None)` when the call succeeded but carried no student.
    fn get(
        &self,
        id: &StudentId,
    ) -> impl Future<Output = Result<Option<Student>, CoreError>> + Send;

    fn create(
        &self,
        draft: &Draft,
    ) -> impl Future<Output = Result<Option<Student>, CoreError>> + Send;

    fn update(
        &self,
        id: &StudentId,
        patch: &StudentPatch,
    ) -> impl Future<Output = Result<Option<Student>, CoreError>> + Send;

    fn remove(&self, id: &StudentId) -> impl Future<Output = Result<(), CoreError>> + Send;
}

/// [`StudentApi`] over HTTP.
#[derive(Debug, Clone)]
pub struct RemoteStudents {
    client: StudentClient,
}

impl RemoteStudents {
    pub fn new(client: StudentClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &StudentClient {
        &self.client
    }
}

impl StudentApi for RemoteStudents {
    async fn list(&self) -> Result<Vec<Student>, CoreError> {
        let rows = self.client.list_students().await?;
        debug!(count = rows.len(), "fetched students");
        Ok(rows.into_iter().map(Student::from).collect())
    }

    async fn get(&self, id: &StudentId) -> Result<Option<Student>, CoreError> {
        let found = self.client.get_student(id.as_str()).await?;
        Ok(found.map(Student::from))
    }

    async fn create(&self, draft: &Draft) -> Result<Option<Student>, CoreError> {
        let created = self
            .client
            .create_student(&CreateStudentRequest::from(draft))
            .await?;
        info!(code = %draft.student_code, "student created");
        Ok(created.map(Student::from))
    }

    async fn update(
        &self,
        id: &StudentId,
        patch: &StudentPatch,
    ) -> Result<Option<Student>, CoreError> {
        let updated = self
            .client
            .update_student(id.as_str(), &UpdateStudentRequest::from(patch))
            .await?;
        info!(%id, active = patch.is_active, "student updated");
        Ok(updated.map(Student::from))
    }

    async fn remove(&self, id: &StudentId) -> Result<(), CoreError> {
        self.client.delete_student(id.as_str()).await?;
        info!(%id, "student deleted");
        Ok(())
    }
}

// ── In-memory fake ──────────────────────────────────────────────────
