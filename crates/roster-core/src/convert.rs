// ── API-to-domain type conversions ──
//
// Bridges `roster_api` wire types into `roster_core::model` and back.

use roster_api::{CreateStudentRequest, StudentResponse, UpdateStudentRequest};

use crate::model::{Draft, Student, StudentId, StudentPatch};

impl From<StudentResponse> for Student {
    fn from(r: StudentResponse) -> Self {
        Self {
            id: StudentId::from(r.id),
            student_code: r.student_code,
            name: r.name,
            is_active: r.is_active,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

impl From<&Draft> for CreateStudentRequest {
    fn from(d: &Draft) -> Self {
        Self {
            student_code: d.student_code.clone(),
            name: d.name.clone(),
            is_active: d.is_active,
        }
    }
}

impl From<&StudentPatch> for UpdateStudentRequest {
    fn from(p: &StudentPatch) -> Self {
        Self {
            name: p.name.clone(),
            is_active: p.is_active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_maps_every_field() {
        let r = StudentResponse {
            id: "s1".into(),
            student_code: "C100".into(),
            name: "Amy".into(),
            is_active: false,
            created_at: None,
            updated_at: None,
        };
        let s = Student::from(r);
        assert_eq!(s.id.as_str(), "s1");
        assert_eq!(s.student_code, "C100");
        assert!(!s.is_active);
    }

    #[test]
    fn toggled_patch_flips_flag_and_keeps_name() {
        let s = Student {
            id: "s1".into(),
            student_code: "C100".into(),
            name: "Amy".into(),
            is_active: true,
            created_at: None,
            updated_at: None,
        };
        let req = UpdateStudentRequest::from(&StudentPatch::toggled(&s));
        assert_eq!(req.name, "Amy");
        assert!(!req.is_active);
    }
}
