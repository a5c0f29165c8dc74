use std::sync::Arc;

use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{Test, TestResult},
        dto::{
            request::CreateTestRequest,
            response::{QuestionDto, StudentRowDto, TestDetailDto, TestSummaryDto},
        },
    },
    repositories::{QuestionRepository, ResultRepository, StudentRepository, TestRepository},
};

pub struct TestService {
    tests: Arc<dyn TestRepository>,
    questions: Arc<dyn QuestionRepository>,
    students: Arc<dyn StudentRepository>,
    results: Arc<dyn ResultRepository>,
}

impl TestService {
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

    pub async fn create_test(
        &self,
        request: CreateTestRequest,
        author_id: &str,
    ) -> AppResult<Test> {
        request.validate()?;

        let test = Test::new(&request.title, request.description, author_id);
        self.tests.create(test).await
    }

    /// Public lookup, used by student registration and submission.
    pub async fn get_test(&self, test_id: &str) -> AppResult<Test> {
        self.tests
            .find_by_id(test_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Test with id '{}' not found", test_id)))
    }

    /// Ownership guard for every admin operation on a test. A test owned by
    /// someone else answers exactly like a missing one.
    pub async fn get_owned_test(&self, test_id: &str, subject: &str) -> AppResult<Test> {
        let test = self.get_test(test_id).await?;

        if !test.is_owned_by(subject) {
            return Err(AppError::NotFound(format!(
                "Test with id '{}' not found",
                test_id
            )));
        }

        Ok(test)
    }

    pub async fn list_tests(&self, author_id: &str) -> AppResult<Vec<TestSummaryDto>> {
        let tests = self.tests.list_by_author(author_id).await?;

        let mut summaries = Vec::with_capacity(tests.len());
        for test in tests {
            let results = self.results.list_by_test(&test.id).await?;
            summaries.push(TestSummaryDto::from_test(test, average_grade(&results)));
        }

        Ok(summaries)
    }

    /// The review page: questions, the student roster with grades where
    /// students have submitted, and the average grade over all results.
    pub async fn get_test_detail(&self, test_id: &str, subject: &str) -> AppResult<TestDetailDto> {
        let test = self.get_owned_test(test_id, subject).await?;

        let questions = self.questions.list_by_test(&test.id).await?;
        let students = self.students.list_by_test(&test.id).await?;
        let results = self.results.list_by_test(&test.id).await?;

        let rows = students
            .into_iter()
            .map(|student| {
                let result = results.iter().find(|r| r.student_id == student.id);
                StudentRowDto::from_student(student, result)
            })
            .collect();

        Ok(TestDetailDto {
            id: test.id,
            title: test.title,
            description: test.description,
            questions: questions.into_iter().map(QuestionDto::from).collect(),
            students: rows,
            average_grade: average_grade(&results),
        })
    }

    /// Deleting a test takes its questions, students and results with it.
    pub async fn delete_test(&self, test_id: &str, subject: &str) -> AppResult<()> {
        let test = self.get_owned_test(test_id, subject).await?;

        let questions = self.questions.delete_by_test(&test.id).await?;
        let students = self.students.delete_by_test(&test.id).await?;
        let results = self.results.delete_by_test(&test.id).await?;
        self.tests.delete(&test.id).await?;

        log::info!(
            "Deleted test {} ({} questions, {} students, {} results)",
            test.id,
            questions,
            students,
            results
        );
        Ok(())
    }

    pub async fn get_result(
        &self,
        test_id: &str,
        subject: &str,
        result_id: &str,
    ) -> AppResult<TestResult> {
        let test = self.get_owned_test(test_id, subject).await?;

        let result = self
            .results
            .find_by_id(result_id)
            .await?
            .filter(|r| r.test_id == test.id)
            .ok_or_else(|| {
                AppError::NotFound(format!("Result with id '{}' not found", result_id))
            })?;

        Ok(result)
    }
}

fn average_grade(results: &[TestResult]) -> Option<f64> {
    if results.is_empty() {
        return None;
    }
    let sum: f64 = results.iter().map(|r| r.grade).sum();
    Some(sum / results.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::question_repository::MockQuestionRepository;
    use crate::repositories::result_repository::MockResultRepository;
    use crate::repositories::student_repository::MockStudentRepository;
    use crate::repositories::test_repository::MockTestRepository;

    fn service_with_tests(tests: MockTestRepository) -> TestService {
        TestService::new(
            Arc::new(tests),
            Arc::new(MockQuestionRepository::new()),
            Arc::new(MockStudentRepository::new()),
            Arc::new(MockResultRepository::new()),
        )
    }

    #[tokio::test]
    async fn foreign_test_is_reported_as_missing() {
        let mut tests = MockTestRepository::new();
        tests
            .expect_find_by_id()
            .returning(|_| Ok(Some(Test::new("Midterm", None, "owner"))));

        let service = service_with_tests(tests);
        let result = service.get_owned_test("any", "intruder").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn owner_can_fetch_their_test() {
        let mut tests = MockTestRepository::new();
        tests
            .expect_find_by_id()
            .returning(|_| Ok(Some(Test::new("Midterm", None, "owner"))));

        let service = service_with_tests(tests);
        let test = service.get_owned_test("any", "owner").await.unwrap();

        assert_eq!(test.title, "Midterm");
    }

    #[tokio::test]
    async fn create_test_rejects_blank_title() {
        let mut tests = MockTestRepository::new();
        tests.expect_create().never();

        let service = service_with_tests(tests);
        let result = service
            .create_test(
                CreateTestRequest {
                    title: String::new(),
                    description: None,
                },
                "owner",
            )
            .await;

        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[test]
    fn average_grade_over_results() {
        let results = vec![
            TestResult::new("t", "s1", 1, 2, vec![]),
            TestResult::new("t", "s2", 2, 2, vec![]),
        ];

        let average = average_grade(&results).unwrap();
        assert!((average - 75.0).abs() < f64::EPSILON);

        assert!(average_grade(&[]).is_none());
    }
}
