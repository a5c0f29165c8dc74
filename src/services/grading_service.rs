use std::collections::HashMap;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{AnswerRecord, Question},
        dto::request::AnswerInput,
    },
};

pub struct GradingService;

impl GradingService {
    /// Grade a submission against the test's questions. One point per fully
    /// correct question; unanswered questions earn nothing.
    pub fn grade_submission(
        questions: &[Question],
        answers: &[AnswerInput],
    ) -> AppResult<(i16, Vec<AnswerRecord>)> {
        let question_map: HashMap<&str, &Question> =
            questions.iter().map(|q| (q.id.as_str(), q)).collect();

        let mut points: i16 = 0;
        let mut records = Vec::with_capacity(answers.len());

        for answer in answers {
            let question = question_map
                .get(answer.question_id.as_str())
                .ok_or_else(|| {
                    AppError::BadRequest(format!(
                        "Answer references unknown question '{}'",
                        answer.question_id
                    ))
                })?;

            let is_correct = Self::grade_question(question, &answer.selected_option_ids);
            if is_correct {
                points += 1;
            }

            records.push(AnswerRecord {
                question_id: answer.question_id.clone(),
                selected_option_ids: answer.selected_option_ids.clone(),
                is_correct,
            });
        }

        Ok((points, records))
    }

    fn grade_question(question: &Question, selected_option_ids: &[String]) -> bool {
        let correct_option_ids: Vec<&str> = question
            .options
            .iter()
            .filter(|opt| opt.is_correct)
            .map(|opt| opt.id.as_str())
            .collect();

        if question.is_multiple_choice {
            // All correct options selected and nothing else
            if correct_option_ids.is_empty() {
                return false;
            }

            let has_all_correct = correct_option_ids
                .iter()
                .all(|id| selected_option_ids.iter().any(|s| s == id));
            let has_no_incorrect = selected_option_ids
                .iter()
                .all(|s| correct_option_ids.contains(&s.as_str()));
            has_all_correct && has_no_incorrect
        } else {
            // Exactly one option selected and it is the correct one
            selected_option_ids.len() == 1
                && correct_option_ids.len() == 1
                && selected_option_ids[0] == correct_option_ids[0]
        }
    }
}
