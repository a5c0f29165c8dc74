#![allow(dead_code)]

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use secrecy::SecretString;
use tokio::sync::RwLock;

use questionnaire_server::{
    app_state::AppState,
    auth::JwtService,
    config::Config,
    errors::{AppError, AppResult},
    models::domain::{Question, RefreshToken, Student, Test, TestResult, User},
    repositories::{
        QuestionRepository, RefreshTokenRepository, ResultRepository, StudentRepository,
        TestRepository, UserRepository,
    },
    services::{QuestionService, SubmissionService, TestService, UserService},
};

pub struct InMemoryTestRepository {
    tests: RwLock<HashMap<String, Test>>,
}

impl InMemoryTestRepository {
    pub fn new() -> Self {
        Self {
            tests: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl TestRepository for InMemoryTestRepository {
    async fn create(&self, test: Test) -> AppResult<Test> {
        let mut tests = self.tests.write().await;
        if tests.contains_key(&test.id) {
            return Err(AppError::AlreadyExists(format!(
                "Test with id '{}' already exists",
                test.id
            )));
        }
        tests.insert(test.id.clone(), test.clone());
        Ok(test)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Test>> {
        let tests = self.tests.read().await;
        Ok(tests.get(id).cloned())
    }

    async fn list_by_author(&self, author_id: &str) -> AppResult<Vec<Test>> {
        let tests = self.tests.read().await;
        let mut items: Vec<_> = tests
            .values()
            .filter(|t| t.author_id == author_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(items)
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        let mut tests = self.tests.write().await;
        if tests.remove(id).is_none() {
            return Err(AppError::NotFound(format!(
                "Test with id '{}' not found",
                id
            )));
        }
        Ok(())
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}

pub struct InMemoryQuestionRepository {
    questions: RwLock<HashMap<String, Question>>,
}

impl InMemoryQuestionRepository {
    pub fn new() -> Self {
        Self {
            questions: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl QuestionRepository for InMemoryQuestionRepository {
    async fn create(&self, question: Question) -> AppResult<Question> {
        let mut questions = self.questions.write().await;
        if questions.contains_key(&question.id) {
            return Err(AppError::AlreadyExists(format!(
                "Question with id '{}' already exists",
                question.id
            )));
        }
        questions.insert(question.id.clone(), question.clone());
        Ok(question)
    }

    async fn insert_batch(&self, batch: Vec<Question>) -> AppResult<usize> {
        let mut questions = self.questions.write().await;

        // All-or-nothing, like the transactional Mongo implementation
        if batch.iter().any(|q| questions.contains_key(&q.id)) {
            return Err(AppError::AlreadyExists(
                "Duplicate question id in batch".to_string(),
            ));
        }

        let count = batch.len();
        for question in batch {
            questions.insert(question.id.clone(), question);
        }
        Ok(count)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Question>> {
        let questions = self.questions.read().await;
        Ok(questions.get(id).cloned())
    }

    async fn list_by_test(&self, test_id: &str) -> AppResult<Vec<Question>> {
        let questions = self.questions.read().await;
        let mut items: Vec<_> = questions
            .values()
            .filter(|q| q.test_id == test_id)
            .cloned()
            .collect();
        items.sort_by_key(|q| q.position);
        Ok(items)
    }

    async fn count_by_test(&self, test_id: &str) -> AppResult<u64> {
        let questions = self.questions.read().await;
        Ok(questions.values().filter(|q| q.test_id == test_id).count() as u64)
    }

    async fn update(&self, question: Question) -> AppResult<Question> {
        let mut questions = self.questions.write().await;
        if !questions.contains_key(&question.id) {
            return Err(AppError::NotFound(format!(
                "Question with id '{}' not found",
                question.id
            )));
        }
        questions.insert(question.id.clone(), question.clone());
        Ok(question)
    }

    async fn delete_by_test(&self, test_id: &str) -> AppResult<u64> {
        let mut questions = self.questions.write().await;
        let before = questions.len();
        questions.retain(|_, q| q.test_id != test_id);
        Ok((before - questions.len()) as u64)
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}

pub struct InMemoryStudentRepository {
    students: RwLock<HashMap<String, Student>>,
}

impl InMemoryStudentRepository {
    pub fn new() -> Self {
        Self {
            students: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl StudentRepository for InMemoryStudentRepository {
    async fn create(&self, student: Student) -> AppResult<Student> {
        let mut students = self.students.write().await;
        students.insert(student.id.clone(), student.clone());
        Ok(student)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Student>> {
        let students = self.students.read().await;
        Ok(students.get(id).cloned())
    }

    async fn list_by_test(&self, test_id: &str) -> AppResult<Vec<Student>> {
        let students = self.students.read().await;
        let mut items: Vec<_> = students
            .values()
            .filter(|s| s.test_id == test_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| {
            (a.first_name.as_str(), a.last_name.as_str())
                .cmp(&(b.first_name.as_str(), b.last_name.as_str()))
        });
        Ok(items)
    }

    async fn delete_by_test(&self, test_id: &str) -> AppResult<u64> {
        let mut students = self.students.write().await;
        let before = students.len();
        students.retain(|_, s| s.test_id != test_id);
        Ok((before - students.len()) as u64)
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}

pub struct InMemoryResultRepository {
    results: RwLock<HashMap<String, TestResult>>,
}

impl InMemoryResultRepository {
    pub fn new() -> Self {
        Self {
            results: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl ResultRepository for InMemoryResultRepository {
    async fn create(&self, result: TestResult) -> AppResult<TestResult> {
        let mut results = self.results.write().await;
        let duplicate = results
            .values()
            .any(|r| r.student_id == result.student_id && r.test_id == result.test_id);
        if duplicate {
            return Err(AppError::AlreadyExists(
                "Result for this student and test already exists".to_string(),
            ));
        }
        results.insert(result.id.clone(), result.clone());
        Ok(result)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<TestResult>> {
        let results = self.results.read().await;
        Ok(results.get(id).cloned())
    }

    async fn find_by_student_and_test(
        &self,
        student_id: &str,
        test_id: &str,
    ) -> AppResult<Option<TestResult>> {
        let results = self.results.read().await;
        Ok(results
            .values()
            .find(|r| r.student_id == student_id && r.test_id == test_id)
            .cloned())
    }

    async fn list_by_test(&self, test_id: &str) -> AppResult<Vec<TestResult>> {
        let results = self.results.read().await;
        let mut items: Vec<_> = results
            .values()
            .filter(|r| r.test_id == test_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        Ok(items)
    }

    async fn delete_by_test(&self, test_id: &str) -> AppResult<u64> {
        let mut results = self.results.write().await;
        let before = results.len();
        results.retain(|_, r| r.test_id != test_id);
        Ok((before - results.len()) as u64)
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}

pub struct InMemoryUserRepository {
    users: RwLock<HashMap<String, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> AppResult<User> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.username) {
            return Err(AppError::AlreadyExists(format!(
                "User with username '{}' already exists",
                user.username
            )));
        }
        users.insert(user.username.clone(), user.clone());
        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(username).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}

pub struct InMemoryRefreshTokenRepository {
    tokens: RwLock<HashMap<String, RefreshToken>>,
}

impl InMemoryRefreshTokenRepository {
    pub fn new() -> Self {
        Self {
            tokens: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl RefreshTokenRepository for InMemoryRefreshTokenRepository {
    async fn create(&self, token: RefreshToken) -> AppResult<RefreshToken> {
        let mut tokens = self.tokens.write().await;
        tokens.insert(token.token_hash.clone(), token.clone());
        Ok(token)
    }

    async fn find_by_token_hash(&self, hash: &str) -> AppResult<Option<RefreshToken>> {
        let tokens = self.tokens.read().await;
        Ok(tokens.get(hash).cloned())
    }

    async fn revoke_by_token_hash(&self, hash: &str) -> AppResult<()> {
        let mut tokens = self.tokens.write().await;
        if let Some(token) = tokens.get_mut(hash) {
            token.revoked = true;
        }
        Ok(())
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}

pub fn test_config() -> Config {
    Config {
        mongo_conn_string: "mongodb://localhost:27017".to_string(),
        mongo_db_name: "questionnaire-test".to_string(),
        web_server_host: "127.0.0.1".to_string(),
        web_server_port: 8080,
        cors_allowed_origin: "http://localhost:5173".to_string(),
        jwt_secret: SecretString::from("test_jwt_secret_key".to_string()),
        jwt_expiration_hours: 1,
        refresh_expiration_hours: 168,
    }
}

/// In-memory application wiring plus direct repository handles for seeding
/// and asserting on stored state.
pub struct TestContext {
    pub state: AppState,
    pub tests: Arc<InMemoryTestRepository>,
    pub questions: Arc<InMemoryQuestionRepository>,
    pub students: Arc<InMemoryStudentRepository>,
    pub results: Arc<InMemoryResultRepository>,
    pub jwt_service: Arc<JwtService>,
}

pub fn test_context() -> TestContext {
    let config = test_config();

    let tests = Arc::new(InMemoryTestRepository::new());
    let questions = Arc::new(InMemoryQuestionRepository::new());
    let students = Arc::new(InMemoryStudentRepository::new());
    let results = Arc::new(InMemoryResultRepository::new());
    let users = Arc::new(InMemoryUserRepository::new());
    let refresh_tokens = Arc::new(InMemoryRefreshTokenRepository::new());

    let jwt_service = Arc::new(JwtService::new(
        &config.jwt_secret,
        config.jwt_expiration_hours,
        config.refresh_expiration_hours,
    ));

    let tests_dyn: Arc<dyn TestRepository> = tests.clone();
    let questions_dyn: Arc<dyn QuestionRepository> = questions.clone();
    let students_dyn: Arc<dyn StudentRepository> = students.clone();
    let results_dyn: Arc<dyn ResultRepository> = results.clone();

    let user_service = Arc::new(UserService::new(
        users,
        refresh_tokens,
        Arc::clone(&jwt_service),
    ));
    let test_service = Arc::new(TestService::new(
        Arc::clone(&tests_dyn),
        Arc::clone(&questions_dyn),
        Arc::clone(&students_dyn),
        Arc::clone(&results_dyn),
    ));
    let question_service = Arc::new(QuestionService::new(Arc::clone(&questions_dyn)));
    let submission_service = Arc::new(SubmissionService::new(
        Arc::clone(&tests_dyn),
        Arc::clone(&questions_dyn),
        Arc::clone(&students_dyn),
        Arc::clone(&results_dyn),
    ));

    let state = AppState::from_parts(
        user_service,
        test_service,
        question_service,
        submission_service,
        Arc::clone(&jwt_service),
        config,
    );

    TestContext {
        state,
        tests,
        questions,
        students,
        results,
        jwt_service,
    }
}
