// Async HTTP client for the student resource.
//
// Base path: {base}/students
// Auth: none

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::Error;
use crate::transport::TransportConfig;
use crate::types::{self, CreateStudentRequest, StudentResponse, UpdateStudentRequest};

/// Path segment of the student collection.
const COLLECTION: &str = "students";

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the remote student collection.
///
/// Five operations over a single resource: list, get, create, update,
/// delete. Failures are returned once; nothing is retried.
#[derive(Debug, Clone)]
pub struct StudentClient {
    http: reqwest::Client,
    base_url: Url,
}

impl StudentClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from a base URL and transport config.
    ///
    /// `base_url` is the service root (e.g. `https://host`); a trailing
    /// `/students` is tolerated and stripped.
    pub fn new(base_url: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::from_reqwest(base_url, http)
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self { http, base_url })
    }

    /// The normalized service root, always ending in `/`.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/');
        let path = path
            .strip_suffix(&format!("/{COLLECTION}"))
            .unwrap_or(path)
            .to_owned();
        url.set_path(&format!("{path}/"));
        url.set_query(None);
        Ok(url)
    }

    // ── URL builders ─────────────────────────────────────────────────

    fn collection_url(&self) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(COLLECTION);
        }
        url
    }

    /// `{base}/students/{id}` with the id percent-encoded as one segment.
    fn item_url(&self, id: &str) -> Url {
        let mut url = self.collection_url();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(id);
        }
        url
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    async fn get(&self, url: Url) -> Result<Value, Error> {
        debug!("GET {url}");
        let resp = self.http.get(url).send().await?;
        Self::handle_response(resp).await
    }

    async fn post<B: Serialize + Sync>(&self, url: Url, body: &B) -> Result<Value, Error> {
        debug!("POST {url}");
        let resp = self.http.post(url).json(body).send().await?;
        Self::handle_response(resp).await
    }

    async fn put<B: Serialize + Sync>(&self, url: Url, body: &B) -> Result<Value, Error> {
        debug!("PUT {url}");
        let resp = self.http.put(url).json(body).send().await?;
        Self::handle_response(resp).await
    }

    async fn delete(&self, url: Url) -> Result<(), Error> {
        debug!("DELETE {url}");
        let resp = self.http.delete(url).send().await?;
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    // ── Response handling ────────────────────────────────────────────

    /// Read a 2xx body as JSON. An empty or non-JSON body yields `Null`,
    /// which the envelope helpers treat as "no payload".
    async fn handle_response(resp: reqwest::Response) -> Result<Value, Error> {
        let status = resp.status();
        if !status.is_success() {
            return Err(Self::parse_error(status, resp).await);
        }

        let body = resp.text().await?;
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&body).unwrap_or_else(|e| {
            let preview: String = body.chars().take(200).collect();
            warn!(error = %e, %preview, "response body is not JSON");
            Value::Null
        }))
    }

    async fn parse_error(status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        let raw = resp.text().await.unwrap_or_default();
        Error::Api {
            status: status.as_u16(),
            message: types::extract_message(&raw),
        }
    }

    fn decode<T>(result: Result<T, serde_json::Error>, body: &Value) -> Result<T, Error> {
        result.map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body: body.to_string(),
        })
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// `GET /students`. Accepts a bare array or a `{ data: [...] }`
    /// envelope; any other shape yields an empty list.
    pub async fn list_students(&self) -> Result<Vec<StudentResponse>, Error> {
        let body = self.get(self.collection_url()).await?;
        Self::decode(types::extract_list(body.clone()), &body)
    }

    /// `GET /students/{id}`. `Ok(None)` when the call succeeded but carried
    /// no student.
    pub async fn get_student(&self, id: &str) -> Result<Option<StudentResponse>, Error> {
        let body = self.get(self.item_url(id)).await?;
        Self::decode(types::extract_single(body.clone()), &body)
    }

    /// `POST /students`. The service assigns the id and timestamps.
    pub async fn create_student(
        &self,
        request: &CreateStudentRequest,
    ) -> Result<Option<StudentResponse>, Error> {
        debug!(code = %request.student_code, "creating student");
        let body = self.post(self.collection_url(), request).await?;
        Self::decode(types::extract_single(body.clone()), &body)
    }

    /// `PUT /students/{id}` with `{ name, isActive }`.
    pub async fn update_student(
        &self,
        id: &str,
        request: &UpdateStudentRequest,
    ) -> Result<Option<StudentResponse>, Error> {
        debug!(id, active = request.is_active, "updating student");
        let body = self.put(self.item_url(id), request).await?;
        Self::decode(types::extract_single(body.clone()), &body)
    }

    /// `DELETE /students/{id}`.
    pub async fn delete_student(&self, id: &str) -> Result<(), Error> {
        debug!(id, "deleting student");
        self.delete(self.item_url(id)).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base: &str) -> StudentClient {
        StudentClient::from_reqwest(base, reqwest::Client::new()).unwrap()
    }

    #[test]
    fn collection_url_from_bare_host() {
        let c = client("https://example.com");
        assert_eq!(c.collection_url().as_str(), "https://example.com/students");
    }

    #[test]
    fn trailing_collection_segment_is_stripped() {
        let c = client("https://example.com/api/students/");
        assert_eq!(c.base_url().as_str(), "https://example.com/api/");
        assert_eq!(
            c.collection_url().as_str(),
            "https://example.com/api/students"
        );
    }

    #[test]
    fn item_url_encodes_identifier() {
        let c = client("https://example.com");
        assert_eq!(
            c.item_url("abc123").as_str(),
            "https://example.com/students/abc123"
        );
        assert_eq!(
            c.item_url("a/b").as_str(),
            "https://example.com/students/a%2Fb"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let err = StudentClient::from_reqwest("not a url", reqwest::Client::new()).unwrap_err();
        assert!(matches!(err, Error::InvalidUrl(_)));
    }
}
