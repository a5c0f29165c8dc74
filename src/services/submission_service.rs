use std::sync::Arc;

use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{Student, TestResult},
        dto::request::{RegisterStudentRequest, SubmitTestRequest},
    },
    repositories::{QuestionRepository, ResultRepository, StudentRepository, TestRepository},
    services::GradingService,
};

/// The student-facing side: registering for a test and handing in answers.
pub struct SubmissionService {
    tests: Arc<dyn TestRepository>,
    questions: Arc<dyn QuestionRepository>,
    students: Arc<dyn StudentRepository>,
    results: Arc<dyn ResultRepository>,
}

impl SubmissionService {
    pub fn new(
        tests: Arc<dyn TestRepository>,
        questions: Arc<dyn QuestionRepository>,
        students: Arc<dyn StudentRepository>,
        results: Arc<dyn ResultRepository>,
    ) -> Self {
        Self {
            tests,
            questions,
            students,
            results,
        }
    }

    pub async fn register_student(
        &self,
        test_id: &str,
        request: RegisterStudentRequest,
    ) -> AppResult<Student> {
        request.validate()?;
        self.require_test(test_id).await?;

        let student = Student::new(
            test_id,
            &request.first_name,
            &request.last_name,
            &request.speciality,
        );
        self.students.create(student).await
    }

    /// Grade and store a submission. Each student gets one attempt per test.
    pub async fn submit(
        &self,
        test_id: &str,
        request: SubmitTestRequest,
    ) -> AppResult<TestResult> {
        self.require_test(test_id).await?;

        let student = self
            .students
            .find_by_id(&request.student_id)
            .await?
            .filter(|s| s.test_id == test_id)
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "Student with id '{}' is not registered for this test",
                    request.student_id
                ))
            })?;

        if self
            .results
            .find_by_student_and_test(&student.id, test_id)
            .await?
            .is_some()
        {
            return Err(AppError::AlreadyExists(
                "Student has already submitted this test".to_string(),
            ));
        }

        let questions = self.questions.list_by_test(test_id).await?;
        if questions.is_empty() {
            return Err(AppError::BadRequest(
                "Test does not have any questions".to_string(),
            ));
        }

        let (points, records) = GradingService::grade_submission(&questions, &request.answers)?;
        let result = TestResult::new(
            test_id,
            &student.id,
            points,
            questions.len() as i16,
            records,
        );

        let result = self.results.create(result).await?;
        log::info!(
            "Student {} scored {}/{} on test {}",
            result.student_id,
            result.points_earned,
            result.total_possible,
            test_id
        );
        Ok(result)
    }

    async fn require_test(&self, test_id: &str) -> AppResult<()> {
        self.tests
            .find_by_id(test_id)
            .await?
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("Test with id '{}' not found", test_id)))
    }
}
