pub mod grading_service;
pub mod question_service;
pub mod submission_service;
pub mod test_locks;
pub mod test_service;
pub mod user_service;

pub use grading_service::GradingService;
pub use question_service::{BatchError, BatchOutcome, QuestionService};
pub use submission_service::SubmissionService;
pub use test_locks::TestLocks;
pub use test_service::TestService;
pub use user_service::UserService;
