use std::collections::{HashMap, HashSet};

use color_eyre::Result;
use ulid::Ulid;

use super::models::HistoryRow;
use super::Db;
use crate::models::AnswerPayload;
use crate::pagination::PageParams;

/// Result of an attempt submission.
pub enum RecordOutcome {
    /// Attempt persisted; carries its public id.
    Saved(String),
    QuizNotFound,
    /// An answer referenced a question outside the quiz.
    UnknownQuestion,
    /// Two answers referenced the same question.
    DuplicateAnswer,
}

impl Db {
    /// Persist one completed pass through a quiz. Correctness and score are
    /// recomputed here from the stored correct answer indices; client-supplied
    /// scoring is never trusted. The attempt row and its answer rows are
    /// written in one transaction.
    pub async fn record_attempt(
        &self,
        user_id: i64,
        quiz_public_id: &str,
        answers: &[AnswerPayload],
        time_spent: i64,
    ) -> Result<RecordOutcome> {
        let (quiz_id, total_questions) = match self.resolve_quiz(quiz_public_id).await? {
            Some(quiz) => quiz,
            None => return Ok(RecordOutcome::QuizNotFound),
        };

        let correct_indices: HashMap<i64, i64> = sqlx::query_as::<_, (i64, i64)>(
            "SELECT id, correct_answer_index FROM questions WHERE quiz_id = ?",
        )
        .bind(quiz_id)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .collect();

        // One answer per question at most; duplicates would inflate the score
        let mut seen = HashSet::with_capacity(answers.len());
        for answer in answers {
            if !correct_indices.contains_key(&answer.question_id) {
                return Ok(RecordOutcome::UnknownQuestion);
            }
            if !seen.insert(answer.question_id) {
                return Ok(RecordOutcome::DuplicateAnswer);
            }
        }

        let score = answers
            .iter()
            .filter(|a| a.selected_option_index == correct_indices.get(&a.question_id).copied())
            .count() as i64;

        let percentage = if total_questions > 0 {
            (score as f64 * 100.0 / total_questions as f64).round()
        } else {
            0.0
        };

        let public_id = Ulid::new().to_string();
        let mut tx = self.pool.begin().await?;

        let attempt_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO quiz_attempts (public_id, user_id, quiz_id, score, total_questions, percentage, time_spent)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(&public_id)
        .bind(user_id)
        .bind(quiz_id)
        .bind(score)
        .bind(total_questions)
        .bind(percentage)
        .bind(time_spent)
        .fetch_one(&mut *tx)
        .await?;

        for answer in answers {
            let is_correct =
                answer.selected_option_index == correct_indices.get(&answer.question_id).copied();

            sqlx::query(
                r#"
                INSERT INTO attempt_answers (attempt_id, question_id, selected_option_index, is_correct, time_spent)
                VALUES (?, ?, ?, ?, ?)
                "#,
            )
            .bind(attempt_id)
            .bind(answer.question_id)
            .bind(answer.selected_option_index)
            .bind(is_correct)
            .bind(answer.time_spent)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::info!(
            "attempt recorded for quiz={quiz_id} user_id={user_id}: score={score}/{total_questions}"
        );
        Ok(RecordOutcome::Saved(public_id))
    }

    pub async fn attempts_count(&self, user_id: i64) -> Result<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM quiz_attempts WHERE user_id = ?")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }

    /// One page of the caller's past attempts, newest first.
    pub async fn attempt_history(
        &self,
        user_id: i64,
        params: PageParams,
    ) -> Result<Vec<HistoryRow>> {
        let rows = sqlx::query_as::<_, HistoryRow>(
            r#"
            SELECT
                a.public_id AS id,
                q.title AS title,
                a.completed_at AS date,
                a.score AS score,
                a.total_questions AS total_questions,
                a.percentage AS percentage
            FROM quiz_attempts a
            JOIN quizzes q ON q.id = a.quiz_id
            WHERE a.user_id = ?
            ORDER BY a.completed_at DESC, a.id DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(user_id)
        .bind(params.size)
        .bind(params.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
