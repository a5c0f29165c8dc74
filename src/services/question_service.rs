use std::sync::Arc;

use serde::Serialize;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{Question, QuestionOption},
        dto::request::{QuestionDraft, UpdateQuestionRequest},
    },
    repositories::QuestionRepository,
    services::test_locks::TestLocks,
};

const SINGLE_CHOICE_OPTIONS_MIN: usize = 2;
const SINGLE_CHOICE_OPTIONS_MAX: usize = 6;
const SINGLE_CHOICE_CORRECT_MAX: usize = 1;
const MULTIPLE_CHOICE_OPTIONS_MIN: usize = 3;
const MULTIPLE_CHOICE_OPTIONS_MAX: usize = 8;
const MULTIPLE_CHOICE_CORRECT_MIN: usize = 2;

/// One rejection from batch validation. Batch-level errors carry no question
/// index and serialize without the `question` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchError {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<usize>,
}

impl BatchError {
    fn batch(error: impl Into<String>) -> Self {
        BatchError {
            error: error.into(),
            question: None,
        }
    }

    fn question(error: impl Into<String>, index: usize) -> Self {
        BatchError {
            error: error.into(),
            question: Some(index),
        }
    }
}

#[derive(Debug)]
pub enum BatchOutcome {
    Created(usize),
    Rejected(Vec<BatchError>),
}

pub struct QuestionService {
    repository: Arc<dyn QuestionRepository>,
    locks: TestLocks,
}

impl QuestionService {
    pub fn new(repository: Arc<dyn QuestionRepository>) -> Self {
        Self {
            repository,
            locks: TestLocks::new(),
        }
    }

    /// Check a proposed batch against the authoring rules, in input order.
    /// Each question gets at most one error: the first failing rule wins and
    /// the remaining rules are skipped for that question. The whole batch is
    /// accepted or rejected as one; there is no partial acceptance.
    pub fn validate_batch(drafts: &[QuestionDraft]) -> Result<(), Vec<BatchError>> {
        let mut errors = Vec::new();

        if drafts.is_empty() {
            errors.push(BatchError::batch("Test does not have any questions"));
            return Err(errors);
        }

        for (index, draft) in drafts.iter().enumerate() {
            let options_len = draft.options.len();

            if options_len == 0 {
                errors.push(BatchError::question(
                    "Question does not have any options",
                    index,
                ));
                continue;
            }

            if draft.is_multiple_choice {
                if options_len < MULTIPLE_CHOICE_OPTIONS_MIN {
                    errors.push(BatchError::question(
                        format!(
                            "Multiple choice question should have at least {} options",
                            MULTIPLE_CHOICE_OPTIONS_MIN
                        ),
                        index,
                    ));
                    continue;
                } else if options_len > MULTIPLE_CHOICE_OPTIONS_MAX {
                    errors.push(BatchError::question(
                        format!(
                            "Multiple choice question can't have more than {} options",
                            MULTIPLE_CHOICE_OPTIONS_MAX
                        ),
                        index,
                    ));
                    continue;
                }
            } else {
                if options_len < SINGLE_CHOICE_OPTIONS_MIN {
                    errors.push(BatchError::question(
                        format!(
                            "Single choice question should have at least {} options",
                            SINGLE_CHOICE_OPTIONS_MIN
                        ),
                        index,
                    ));
                    continue;
                } else if options_len > SINGLE_CHOICE_OPTIONS_MAX {
                    errors.push(BatchError::question(
                        format!(
                            "Single choice question can't have more than {} options",
                            SINGLE_CHOICE_OPTIONS_MAX
                        ),
                        index,
                    ));
                    continue;
                }
            }

            let correct_options = draft.options.iter().filter(|o| o.is_correct).count();

            if draft.is_multiple_choice {
                if correct_options < MULTIPLE_CHOICE_CORRECT_MIN {
                    errors.push(BatchError::question(
                        format!(
                            "Multiple choice question should have at least {} correct options",
                            MULTIPLE_CHOICE_CORRECT_MIN
                        ),
                        index,
                    ));
                    continue;
                }
            } else {
                if correct_options == 0 {
                    errors.push(BatchError::question(
                        format!(
                            "Single choice question should have {} correct option",
                            SINGLE_CHOICE_CORRECT_MAX
                        ),
                        index,
                    ));
                    continue;
                }
                if correct_options > SINGLE_CHOICE_CORRECT_MAX {
                    errors.push(BatchError::question(
                        format!(
                            "Single choice question can't have more than {} correct option",
                            SINGLE_CHOICE_CORRECT_MAX
                        ),
                        index,
                    ));
                    continue;
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validate and persist a batch. The per-test lock is held across both
    /// steps so two simultaneous submissions cannot interleave their inserts.
    pub async fn create_batch(
        &self,
        test_id: &str,
        drafts: Vec<QuestionDraft>,
    ) -> AppResult<BatchOutcome> {
        let _guard = self.locks.acquire(test_id).await;

        if let Err(errors) = Self::validate_batch(&drafts) {
            return Ok(BatchOutcome::Rejected(errors));
        }

        let next_position = self.repository.count_by_test(test_id).await? as i32 + 1;
        let questions: Vec<Question> = drafts
            .into_iter()
            .enumerate()
            .map(|(offset, draft)| {
                let options = draft
                    .options
                    .into_iter()
                    .map(|o| QuestionOption::new(&o.option, o.is_correct))
                    .collect();
                Question::new(
                    test_id,
                    &draft.question,
                    draft.is_multiple_choice,
                    options,
                    next_position + offset as i32,
                )
            })
            .collect();

        let created = self.repository.insert_batch(questions).await?;
        log::info!("Created {} questions for test {}", created, test_id);
        Ok(BatchOutcome::Created(created))
    }

    /// Questions in stored order; an empty test is seeded with one
    /// placeholder question so the editor never opens blank.
    pub async fn list_for_editor(&self, test_id: &str) -> AppResult<Vec<Question>> {
        let questions = self.repository.list_by_test(test_id).await?;
        if !questions.is_empty() {
            return Ok(questions);
        }

        let seeded = self.repository.create(Question::placeholder(test_id, 1)).await?;
        Ok(vec![seeded])
    }

    pub async fn list(&self, test_id: &str) -> AppResult<Vec<Question>> {
        self.repository.list_by_test(test_id).await
    }

    pub async fn add_default_question(&self, test_id: &str) -> AppResult<Question> {
        let _guard = self.locks.acquire(test_id).await;

        let position = self.repository.count_by_test(test_id).await? as i32 + 1;
        self.repository
            .create(Question::placeholder(test_id, position))
            .await
    }

    /// Append one auto-numbered incorrect option. The option-count bound is
    /// intentionally not re-checked here.
    pub async fn add_default_option(
        &self,
        test_id: &str,
        question_id: &str,
    ) -> AppResult<(Question, QuestionOption)> {
        let mut question = self.get_test_question(test_id, question_id).await?;

        let option = QuestionOption::placeholder(question.options.len() + 1);
        question.options.push(option.clone());

        let updated = self.repository.update(question).await?;
        Ok((updated, option))
    }

    /// Apply new text/correctness values, persisting only when something
    /// changed, then recompute the choice type from the observed correct
    /// count: more than one correct option makes the question multiple
    /// choice, anything else makes it single choice. The [min,max] option
    /// bounds from batch validation are not re-enforced on this path.
    pub async fn update_question(
        &self,
        test_id: &str,
        question_id: &str,
        request: UpdateQuestionRequest,
    ) -> AppResult<Question> {
        let mut question = self.get_test_question(test_id, question_id).await?;
        let mut changed = false;

        if question.text != request.question {
            question.text = request.question.clone();
            changed = true;
        }

        for patch in &request.options {
            let option = question
                .options
                .iter_mut()
                .find(|o| o.id == patch.id)
                .ok_or_else(|| {
                    AppError::NotFound(format!("Option with id '{}' not found", patch.id))
                })?;

            if option.text != patch.option {
                option.text = patch.option.clone();
                changed = true;
            }
            if option.is_correct != patch.is_correct {
                option.is_correct = patch.is_correct;
                changed = true;
            }
        }

        let is_multiple_choice = question.correct_option_count() > SINGLE_CHOICE_CORRECT_MAX;
        if question.is_multiple_choice != is_multiple_choice {
            question.is_multiple_choice = is_multiple_choice;
            changed = true;
        }

        if changed {
            question = self.repository.update(question).await?;
        }

        Ok(question)
    }

    async fn get_test_question(&self, test_id: &str, question_id: &str) -> AppResult<Question> {
        let question = self
            .repository
            .find_by_id(question_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Question with id '{}' not found", question_id))
            })?;

        // A question reached through the wrong test is treated as absent
        if question.test_id != test_id {
            return Err(AppError::NotFound(format!(
                "Question with id '{}' not found",
                question_id
            )));
        }

        Ok(question)
    }
}
