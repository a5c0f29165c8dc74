pub mod question;
pub mod refresh_token;
pub mod student;
pub mod test_result;
pub mod user;

pub use question::{Question, QuestionOption};
pub use refresh_token::RefreshToken;
pub use student::Student;
pub use test::Test;
pub use test_result::{AnswerRecord, TestResult};
pub use user::User;
