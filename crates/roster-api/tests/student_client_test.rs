#![allow(clippy::unwrap_used)]
// Integration tests for `StudentClient` using wiremock.

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use roster_api::{CreateStudentRequest, Error, StudentClient, UpdateStudentRequest};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, StudentClient) {
    let server = MockServer::start().await;
    let client = StudentClient::from_reqwest(&server.uri(), reqwest::Client::new()).unwrap();
    (server, client)
}

fn student(id: &str, code: &str, name: &str, active: bool) -> serde_json::Value {
    json!({
        "_id": id,
        "studentCode": code,
        "name": name,
        "isActive": active,
        "createdAt": "2024-06-15T10:30:00.000Z",
        "updatedAt": "2024-06-15T10:30:00.000Z"
    })
}

// ── List ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_bare_array() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/students"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            student("1", "A1", "Bob", true),
            student("2", "A2", "Amy", false),
        ])))
        .mount(&server)
        .await;

    let students = client.list_students().await.unwrap();

    assert_eq!(students.len(), 2);
    assert_eq!(students[0].student_code, "A1");
    assert_eq!(students[1].name, "Amy");
    assert!(!students[1].is_active);
}

#[tokio::test]
async fn test_list_data_envelope() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/students"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "data": [student("1", "A1", "Bob", true)] })),
        )
        .mount(&server)
        .await;

    let students = client.list_students().await.unwrap();

    assert_eq!(students.len(), 1);
    assert_eq!(students[0].id, "1");
}

#[tokio::test]
async fn test_list_unrecognized_shape_is_empty() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/students"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "total": 0 })))
        .mount(&server)
        .await;

    let students = client.list_students().await.unwrap();

    assert!(students.is_empty());
}

// ── Get ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_get_student() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/students/abc"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({
                "data": student("abc", "S100", "Carol", true)
            })),
        )
        .mount(&server)
        .await;

    let found = client.get_student("abc").await.unwrap().unwrap();

    assert_eq!(found.id, "abc");
    assert_eq!(found.student_code, "S100");
    assert!(found.created_at.is_some());
}

#[tokio::test]
async fn test_get_missing_payload_is_none() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/students/ghost"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": null })))
        .mount(&server)
        .await;

    let found = client.get_student("ghost").await.unwrap();

    assert!(found.is_none());
}

#[tokio::test]
async fn test_get_404_is_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/students/ghost"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "statusCode": 404,
            "message": "Student not found"
        })))
        .mount(&server)
        .await;

    let err = client.get_student("ghost").await.unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(err.server_message(), Some("Student not found"));
}

// ── Create / update / delete ────────────────────────────────────────

#[tokio::test]
async fn test_create_posts_full_draft() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/students"))
        .and(body_json(json!({
            "studentCode": "C123",
            "name": "Dana",
            "isActive": true
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(student("n1", "C123", "Dana", true)))
        .expect(1)
        .mount(&server)
        .await;

    let created = client
        .create_student(&CreateStudentRequest {
            student_code: "C123".into(),
            name: "Dana".into(),
            is_active: true,
        })
        .await
        .unwrap()
        .unwrap();

    assert_eq!(created.id, "n1");
}

#[tokio::test]
async fn test_update_puts_name_and_flag_only() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/students/s1"))
        .and(body_json(json!({ "name": "Eve", "isActive": false })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "data": student("s1", "E1", "Eve", false) })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let updated = client
        .update_student(
            "s1",
            &UpdateStudentRequest {
                name: "Eve".into(),
                is_active: false,
            },
        )
        .await
        .unwrap()
        .unwrap();

    assert!(!updated.is_active);
}

#[tokio::test]
async fn test_delete_student() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/students/s1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client.delete_student("s1").await.unwrap();
}

// ── Error tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_validation_messages_are_joined() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/students"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "statusCode": 400,
            "message": ["studentCode must be unique", "name should not be empty"],
            "error": "Bad Request"
        })))
        .mount(&server)
        .await;

    let err = client
        .create_student(&CreateStudentRequest {
            student_code: "DUP".into(),
            name: "X".into(),
            is_active: true,
        })
        .await
        .unwrap_err();

    match err {
        Error::Api { status, ref message } => {
            assert_eq!(status, 400);
            assert_eq!(
                message.as_deref(),
                Some("studentCode must be unique, name should not be empty")
            );
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_error_without_message_body() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&server)
        .await;

    let err = client.delete_student("s1").await.unwrap_err();

    assert_eq!(err.status(), Some(500));
    assert_eq!(err.server_message(), None);
    assert_eq!(err.to_string(), "Request failed with status code 500");
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);

    let client = StudentClient::from_reqwest(&uri, reqwest::Client::new()).unwrap();
    let err = client.list_students().await.unwrap_err();

    assert!(err.is_transport(), "expected transport error, got: {err:?}");
}

#[tokio::test]
async fn test_failed_call_is_not_retried() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/students"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    assert!(client.list_students().await.is_err());
}
