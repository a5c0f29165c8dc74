use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,

    #[validate(length(min = 1, max = 100))]
    pub last_name: String,

    #[validate(length(min = 3, max = 50))]
    pub username: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub username: String,

    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTestRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[validate(length(max = 2000))]
    pub description: Option<String>,
}

/// One proposed question in a batch-creation payload. Field names are the
/// wire contract of the authoring frontend; a missing field fails
/// deserialization before any business rule runs.
#[derive(Debug, Clone, Deserialize)]
pub struct QuestionDraft {
    pub question: String,
    pub is_multiple_choice: bool,
    pub options: Vec<OptionDraft>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OptionDraft {
    pub option: String,
    pub is_correct: bool,
}

/// Full-state update of one question: new text plus new text/correctness for
/// each existing option, addressed by option id.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateQuestionRequest {
    pub question: String,
    pub options: Vec<UpdateOptionRequest>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateOptionRequest {
    pub id: String,
    pub option: String,
    pub is_correct: bool,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterStudentRequest {
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,

    #[validate(length(min = 1, max = 100))]
    pub last_name: String,

    #[validate(length(min = 1, max = 100))]
    pub speciality: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmitTestRequest {
    pub student_id: String,
    pub answers: Vec<AnswerInput>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnswerInput {
    pub question_id: String,
    pub selected_option_ids: Vec<String>,
}
