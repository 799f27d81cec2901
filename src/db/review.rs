use std::collections::HashMap;

use color_eyre::Result;

use super::models::{AnswerRow, AttemptRow, QuestionRow};
use super::Db;
use crate::models::{Review, ReviewAnswerChoice, ReviewAttempt, ReviewQuestion};

const NO_ANSWER: &str = "Not answered";
const NO_CORRECT_ANSWER: &str = "N/A";
const NO_EXPLANATION: &str = "No explanation provided.";

impl Db {
    /// Rejoin quiz, questions, options, and recorded answers for a finished
    /// attempt into a display-ready structure. Pure read; calling it twice
    /// with no intervening writes yields identical output.
    pub async fn build_review(&self, attempt_public_id: &str) -> Result<Option<Review>> {
        let attempt = sqlx::query_as::<_, AttemptRow>(
            r#"
            SELECT id, public_id, quiz_id, score, total_questions, percentage, time_spent, completed_at
            FROM quiz_attempts
            WHERE public_id = ?
            "#,
        )
        .bind(attempt_public_id)
        .fetch_optional(&self.pool)
        .await?;

        let attempt = match attempt {
            Some(attempt) => attempt,
            None => return Ok(None),
        };

        // question_order re-establishes display sequence and numbering
        let questions = sqlx::query_as::<_, QuestionRow>(
            r#"
            SELECT id, question_text, correct_answer_index, explanation
            FROM questions
            WHERE quiz_id = ?
            ORDER BY question_order ASC
            "#,
        )
        .bind(attempt.quiz_id)
        .fetch_all(&self.pool)
        .await?;

        let mut options_by_question = self.quiz_options_by_question(attempt.quiz_id).await?;

        let answers: HashMap<i64, Option<i64>> = sqlx::query_as::<_, AnswerRow>(
            "SELECT question_id, selected_option_index FROM attempt_answers WHERE attempt_id = ?",
        )
        .bind(attempt.id)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(|row| (row.question_id, row.selected_option_index))
        .collect();

        let review_questions = questions
            .into_iter()
            .enumerate()
            .map(|(index, question)| {
                let options: Vec<String> = options_by_question
                    .remove(&question.id)
                    .unwrap_or_default()
                    .into_iter()
                    .map(|(_, text)| text)
                    .collect();

                // option counts are capped at save time, so labels stay in A..J
                let choices = options
                    .iter()
                    .enumerate()
                    .map(|(i, text)| ReviewAnswerChoice {
                        label: char::from(b'A' + i as u8).to_string(),
                        text: text.clone(),
                    })
                    .collect();

                let correct_answer = option_at(&options, Some(question.correct_answer_index))
                    .unwrap_or_else(|| NO_CORRECT_ANSWER.to_string());

                let user_answer = answers
                    .get(&question.id)
                    .and_then(|selected| option_at(&options, *selected))
                    .unwrap_or_else(|| NO_ANSWER.to_string());

                let explanation = question
                    .explanation
                    .filter(|e| !e.is_empty())
                    .unwrap_or_else(|| NO_EXPLANATION.to_string());

                ReviewQuestion {
                    number: index as i64 + 1,
                    text: question.question_text,
                    answers: choices,
                    correct_answer,
                    user_answer,
                    explanation,
                }
            })
            .collect();

        Ok(Some(Review {
            questions: review_questions,
            attempt: ReviewAttempt {
                id: attempt.public_id,
                score: attempt.score,
                total_questions: attempt.total_questions,
                percentage: attempt.percentage,
                time_spent: attempt.time_spent,
                completed_at: attempt.completed_at,
            },
        }))
    }
}

/// Option text at a 0-based position; None when the index is absent or out
/// of range.
fn option_at(options: &[String], index: Option<i64>) -> Option<String> {
    let index = usize::try_from(index?).ok()?;
    options.get(index).cloned()
}
