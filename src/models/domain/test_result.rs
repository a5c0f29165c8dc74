use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A graded submission: one per student per test.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct TestResult {
    pub id: String,
    pub test_id: String,
    pub student_id: String,
    pub points_earned: i16,
    pub total_possible: i16,
    /// Percentage in [0, 100].
    pub grade: f64,
    pub answers: Vec<AnswerRecord>,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct AnswerRecord {
    pub question_id: String,
    pub selected_option_ids: Vec<String>,
    pub is_correct: bool,
}

impl TestResult {
    pub fn new(
        test_id: &str,
        student_id: &str,
        points_earned: i16,
        total_possible: i16,
        answers: Vec<AnswerRecord>,
    ) -> Self {
        let grade = if total_possible > 0 {
            f64::from(points_earned) * 100.0 / f64::from(total_possible)
        } else {
            0.0
        };

        TestResult {
            id: Uuid::new_v4().to_string(),
            test_id: test_id.to_string(),
            student_id: student_id.to_string(),
            points_earned,
            total_possible,
            grade,
            answers,
            submitted_at: Utc::now(),
        }
    }
}
