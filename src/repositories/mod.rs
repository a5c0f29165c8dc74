pub mod question_repository;
pub mod refresh_token_repository;
pub mod result_repository;
pub mod student_repository;
pub mod test_repository;
pub mod user_repository;

pub use question_repository::{MongoQuestionRepository, QuestionRepository};
pub use refresh_token_repository::{MongoRefreshTokenRepository, RefreshTokenRepository};
pub use result_repository::{MongoResultRepository, ResultRepository};
pub use student_repository::{MongoStudentRepository, StudentRepository};
pub use test_repository::{MongoTestRepository, TestRepository};
pub use user_repository::{MongoUserRepository, UserRepository};
