// ── Domain model ──

pub mod student;

pub use student::{Draft, Student, StudentId, StudentPatch};
