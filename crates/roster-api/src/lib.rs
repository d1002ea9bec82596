// roster-api: Async Rust client for the student roster REST API

pub mod client;
pub mod error;
pub mod transport;
pub mod types;

pub use client::StudentClient;
pub use error::Error;
pub use transport::TransportConfig;
pub use types::{CreateStudentRequest, StudentResponse, UpdateStudentRequest};
