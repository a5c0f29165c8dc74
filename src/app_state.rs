use std::sync::Arc;

use crate::{
    auth::JwtService,
    config::Config,
    db::Database,
    errors::AppResult,
    repositories::{
        MongoQuestionRepository, MongoRefreshTokenRepository, MongoResultRepository,
        MongoStudentRepository, MongoTestRepository, MongoUserRepository, QuestionRepository,
        RefreshTokenRepository, ResultRepository, StudentRepository, TestRepository,
        UserRepository,
    },
    services::{QuestionService, SubmissionService, TestService, UserService},
};

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService>,
    pub test_service: Arc<TestService>,
    pub question_service: Arc<QuestionService>,
    pub submission_service: Arc<SubmissionService>,
    pub jwt_service: Arc<JwtService>,
    pub config: Arc<Config>,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let db = Database::connect(&config).await?;

        let user_repository: Arc<dyn UserRepository> = Arc::new(MongoUserRepository::new(&db));
        user_repository.ensure_indexes().await?;
        let test_repository: Arc<dyn TestRepository> = Arc::new(MongoTestRepository::new(&db));
        test_repository.ensure_indexes().await?;
        let question_repository: Arc<dyn QuestionRepository> =
            Arc::new(MongoQuestionRepository::new(&db));
        question_repository.ensure_indexes().await?;
        let student_repository: Arc<dyn StudentRepository> =
            Arc::new(MongoStudentRepository::new(&db));
        student_repository.ensure_indexes().await?;
        let result_repository: Arc<dyn ResultRepository> =
            Arc::new(MongoResultRepository::new(&db));
        result_repository.ensure_indexes().await?;
        let refresh_token_repository: Arc<dyn RefreshTokenRepository> =
            Arc::new(MongoRefreshTokenRepository::new(&db));
        refresh_token_repository.ensure_indexes().await?;

        let jwt_service = Arc::new(JwtService::new(
            &config.jwt_secret,
            config.jwt_expiration_hours,
            config.refresh_expiration_hours,
        ));

        let user_service = Arc::new(UserService::new(
            user_repository,
            refresh_token_repository,
            Arc::clone(&jwt_service),
        ));
        let test_service = Arc::new(TestService::new(
            Arc::clone(&test_repository),
            Arc::clone(&question_repository),
            Arc::clone(&student_repository),
            Arc::clone(&result_repository),
        ));
        let question_service = Arc::new(QuestionService::new(Arc::clone(&question_repository)));
        let submission_service = Arc::new(SubmissionService::new(
            test_repository,
            question_repository,
            student_repository,
            result_repository,
        ));

        Ok(Self {
            user_service,
            test_service,
            question_service,
            submission_service,
            jwt_service,
            config: Arc::new(config),
        })
    }

    /// Wire a state from prebuilt services. Integration tests use this with
    /// in-memory repositories instead of a running MongoDB.
    pub fn from_parts(
        user_service: Arc<UserService>,
        test_service: Arc<TestService>,
        question_service: Arc<QuestionService>,
        submission_service: Arc<SubmissionService>,
        jwt_service: Arc<JwtService>,
        config: Config,
    ) -> Self {
        Self {
            user_service,
            test_service,
            question_service,
            submission_service,
            jwt_service,
            config: Arc::new(config),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_is_cloneable() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }
}
