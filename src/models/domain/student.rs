use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A student registered for one test. Students have no credentials; the
/// registration itself is the ticket to take the test.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Student {
    pub id: String,
    pub test_id: String,
    pub first_name: String,
    pub last_name: String,
    pub speciality: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registered_at: Option<DateTime<Utc>>,
}

impl Student {
    pub fn new(test_id: &str, first_name: &str, last_name: &str, speciality: &str) -> Self {
        Student {
            id: Uuid::new_v4().to_string(),
            test_id: test_id.to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            speciality: speciality.to_string(),
            registered_at: Some(Utc::now()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn student_is_bound_to_test() {
        let student = Student::new("test-1", "Ann", "Lee", "Mathematics");
        assert_eq!(student.test_id, "test-1");
        assert!(!student.id.is_empty());
    }
}
