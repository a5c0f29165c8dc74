use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const PLACEHOLDER_QUESTION_TEXT: &str = "Enter the question";

/// A question belonging to one test. Options are embedded: an option lives
/// and dies with its question.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Question {
    pub id: String,
    pub test_id: String,
    pub text: String,
    pub is_multiple_choice: bool,
    pub options: Vec<QuestionOption>,
    pub position: i32,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuestionOption {
    pub id: String,
    pub text: String,
    pub is_correct: bool,
}

impl Question {
    pub fn new(
        test_id: &str,
        text: &str,
        is_multiple_choice: bool,
        options: Vec<QuestionOption>,
        position: i32,
    ) -> Self {
        Question {
            id: Uuid::new_v4().to_string(),
            test_id: test_id.to_string(),
            text: text.to_string(),
            is_multiple_choice,
            options,
            position,
        }
    }

    /// The blank question an author gets when appending to or seeding a test:
    /// placeholder text, two incorrect placeholder options, single-choice.
    pub fn placeholder(test_id: &str, position: i32) -> Self {
        Question::new(
            test_id,
            PLACEHOLDER_QUESTION_TEXT,
            false,
            vec![QuestionOption::placeholder(1), QuestionOption::placeholder(2)],
            position,
        )
    }

    pub fn correct_option_count(&self) -> usize {
        self.options.iter().filter(|o| o.is_correct).count()
    }
}

impl QuestionOption {
    pub fn new(text: &str, is_correct: bool) -> Self {
        QuestionOption {
            id: Uuid::new_v4().to_string(),
            text: text.to_string(),
            is_correct,
        }
    }

    /// Auto-numbered incorrect option, "Option {n}".
    pub fn placeholder(number: usize) -> Self {
        QuestionOption::new(&format!("Option {}", number), false)
    }
}
