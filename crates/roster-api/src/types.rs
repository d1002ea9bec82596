// Wire types for the `/students` resource.
//
// Field names follow the remote service's camelCase JSON. The service is
// inconsistent about envelopes: list responses may be a bare array or a
// `{ data: [...] }` wrapper, single-entity responses usually come wrapped.
// The `extract_*` helpers normalize both shapes.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A student record as returned by the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentResponse {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub student_code: String,
    pub name: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

const fn default_active() -> bool {
    true
}

/// `POST /students` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStudentRequest {
    pub student_code: String,
    pub name: String,
    pub is_active: bool,
}

/// `PUT /students/{id}` body. The student code is immutable after creation
/// and is never sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStudentRequest {
    pub name: String,
    pub is_active: bool,
}

// ── Error body ───────────────────────────────────────────────────────

/// The service reports either a single message or a list of validation
/// messages.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MessageField {
    One(String),
    Many(Vec<String>),
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<MessageField>,
}

/// Pull the `message` field out of an error body, if present and non-empty.
pub(crate) fn extract_message(raw: &str) -> Option<String> {
    let body: ErrorBody = serde_json::from_str(raw).ok()?;
    let text = match body.message? {
        MessageField::One(s) => s,
        MessageField::Many(items) => items.join(", "),
    };
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_owned())
}

// ── Envelope normalization ───────────────────────────────────────────

/// Normalize a list body: bare array, `{ data: [...] }`, or anything else
/// (treated as empty).
pub(crate) fn extract_list<T: DeserializeOwned>(body: Value) -> Result<Vec<T>, serde_json::Error> {
    match body {
        Value::Array(_) => serde_json::from_value(body),
        Value::Object(mut map) => match map.remove("data") {
            Some(data @ Value::Array(_)) => serde_json::from_value(data),
            _ => Ok(Vec::new()),
        },
        _ => Ok(Vec::new()),
    }
}

/// Normalize a single-entity body: `{ data: {...} }`, a bare object carrying
/// an identifier, or nothing.
pub(crate) fn extract_single<T: DeserializeOwned>(
    body: Value,
) -> Result<Option<T>, serde_json::Error> {
    let Value::Object(mut map) = body else {
        return Ok(None);
    };
    match map.remove("data") {
        Some(data @ Value::Object(_)) => serde_json::from_value(data).map(Some),
        Some(_) => Ok(None),
        None if map.contains_key("_id") || map.contains_key("id") => {
            serde_json::from_value(Value::Object(map)).map(Some)
        }
        None => Ok(None),
    }
}
