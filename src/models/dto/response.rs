use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::domain::{Question, QuestionOption, Student, Test, TestResult};

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub refresh_token: String,
    pub username: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct RefreshTokenResponse {
    pub token: String,
    pub refresh_token: String,
}

/// Question as the authoring frontend sees it: `question`/`option` field
/// names, options in stored order.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionDto {
    pub id: String,
    pub question: String,
    pub is_multiple_choice: bool,
    pub options: Vec<OptionDto>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OptionDto {
    pub id: String,
    pub option: String,
    pub is_correct: bool,
}

impl From<Question> for QuestionDto {
    fn from(question: Question) -> Self {
        QuestionDto {
            id: question.id,
            question: question.text,
            is_multiple_choice: question.is_multiple_choice,
            options: question.options.into_iter().map(OptionDto::from).collect(),
        }
    }
}

impl From<QuestionOption> for OptionDto {
    fn from(option: QuestionOption) -> Self {
        OptionDto {
            id: option.id,
            option: option.text,
            is_correct: option.is_correct,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TestSummaryDto {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_grade: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl TestSummaryDto {
    pub fn from_test(test: Test, average_grade: Option<f64>) -> Self {
        TestSummaryDto {
            id: test.id,
            title: test.title,
            description: test.description,
            average_grade,
            created_at: test.created_at,
        }
    }
}

/// Admin review page for one test: questions plus the student roster with
/// each student's grade, when they have one.
#[derive(Debug, Serialize)]
pub struct TestDetailDto {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub questions: Vec<QuestionDto>,
    pub students: Vec<StudentRowDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_grade: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct StudentRowDto {
    pub student_id: String,
    pub first_name: String,
    pub last_name: String,
    pub speciality: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_id: Option<String>,
}

impl StudentRowDto {
    pub fn from_student(student: Student, result: Option<&TestResult>) -> Self {
        StudentRowDto {
            student_id: student.id,
            first_name: student.first_name,
            last_name: student.last_name,
            speciality: student.speciality,
            grade: result.map(|r| r.grade),
            result_id: result.map(|r| r.id.clone()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ResultDto {
    pub id: String,
    pub test_id: String,
    pub student_id: String,
    pub points_earned: i16,
    pub total_possible: i16,
    pub grade: f64,
    pub submitted_at: DateTime<Utc>,
}

impl From<TestResult> for ResultDto {
    fn from(result: TestResult) -> Self {
        ResultDto {
            id: result.id,
            test_id: result.test_id,
            student_id: result.student_id,
            points_earned: result.points_earned,
            total_possible: result.total_possible,
            grade: result.grade,
            submitted_at: result.submitted_at,
        }
    }
}
