use std::collections::{BTreeSet, HashMap};

use color_eyre::{eyre::eyre, Result};
use ulid::Ulid;

use super::models::{OptionRow, QuestionRow, QuizRow};
use super::Db;
use crate::models::{
    first_bad_option_count, first_invalid_question, Difficulty, GeneratedQuestion, NewQuiz,
    QuizDetail, QuizQuestion, QuizSummary,
};

impl Db {
    /// Insert a quiz with all its questions and options atomically in a
    /// transaction. Question order is 1-based from input position, option
    /// order 0-based within each question; the correct answer is a position
    /// into that option order, validated against bounds before any write.
    /// Returns the public_id (ULID) of the newly created quiz.
    pub async fn save_quiz(
        &self,
        owner_id: i64,
        meta: NewQuiz,
        questions: &[GeneratedQuestion],
    ) -> Result<String> {
        if let Some(position) = first_bad_option_count(questions) {
            return Err(eyre!(
                "question {} has an option count outside the allowed range",
                position + 1
            ));
        }
        if let Some(position) = first_invalid_question(questions) {
            return Err(eyre!(
                "question {} has a correct answer index outside its options",
                position + 1
            ));
        }

        let public_id = Ulid::new().to_string();
        let title = meta
            .title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| format!("Custom Exercise: {}", meta.interests));

        let mut tx = self.pool.begin().await?;

        let quiz_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO quizzes (public_id, owner_id, title, interests, difficulty, total_questions)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(&public_id)
        .bind(owner_id)
        .bind(&title)
        .bind(&meta.interests)
        .bind(meta.difficulty.as_str())
        .bind(questions.len() as i64)
        .fetch_one(&mut *tx)
        .await?;

        // De-duplicate tags; skills are a set
        let skills: BTreeSet<&str> = meta.skills.iter().map(String::as_str).collect();
        for skill in skills {
            sqlx::query("INSERT INTO quiz_skills (quiz_id, skill) VALUES (?, ?)")
                .bind(quiz_id)
                .bind(skill)
                .execute(&mut *tx)
                .await?;
        }

        for (index, question) in questions.iter().enumerate() {
            let question_id: i64 = sqlx::query_scalar(
                r#"
                INSERT INTO questions (quiz_id, question_text, question_order, correct_answer_index, explanation)
                VALUES (?, ?, ?, ?, ?)
                RETURNING id
                "#,
            )
            .bind(quiz_id)
            .bind(&question.question_text)
            .bind(index as i64 + 1)
            .bind(question.correct_answer_index)
            .bind(&question.explanation)
            .fetch_one(&mut *tx)
            .await?;

            for (opt_index, option_text) in question.options.iter().enumerate() {
                sqlx::query(
                    "INSERT INTO question_options (question_id, option_text, option_order) VALUES (?, ?, ?)",
                )
                .bind(question_id)
                .bind(option_text)
                .bind(opt_index as i64)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;

        tracing::info!("new quiz created with id: {quiz_id} for owner_id: {owner_id}");
        Ok(public_id)
    }

    /// Resolve a public_id (ULID) to the internal quiz id and its question
    /// count. Returns None when no such quiz exists.
    pub async fn resolve_quiz(&self, public_id: &str) -> Result<Option<(i64, i64)>> {
        let row = sqlx::query_as::<_, (i64, i64)>(
            "SELECT id, total_questions FROM quizzes WHERE public_id = ?",
        )
        .bind(public_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Full quiz for the taking UI: questions in ascending question_order,
    /// options in ascending option_order, correct index unchanged.
    pub async fn get_quiz(&self, public_id: &str) -> Result<Option<QuizDetail>> {
        let quiz = sqlx::query_as::<_, QuizRow>(
            r#"
            SELECT id, public_id, title, interests, difficulty, total_questions, created_at
            FROM quizzes
            WHERE public_id = ?
            "#,
        )
        .bind(public_id)
        .fetch_optional(&self.pool)
        .await?;

        let quiz = match quiz {
            Some(quiz) => quiz,
            None => return Ok(None),
        };

        let skills = self.quiz_skills(quiz.id).await?;

        let question_rows = sqlx::query_as::<_, QuestionRow>(
            r#"
            SELECT id, question_text, correct_answer_index, explanation
            FROM questions
            WHERE quiz_id = ?
            ORDER BY question_order ASC
            "#,
        )
        .bind(quiz.id)
        .fetch_all(&self.pool)
        .await?;

        let mut options_by_question = self.quiz_options_by_question(quiz.id).await?;

        let questions = question_rows
            .into_iter()
            .map(|q| {
                let options = options_by_question.remove(&q.id).unwrap_or_default();
                QuizQuestion {
                    id: q.id,
                    question_text: q.question_text,
                    options: options.into_iter().map(|(_, text)| text).collect(),
                    correct_answer_index: q.correct_answer_index,
                    explanation: q.explanation,
                }
            })
            .collect();

        Ok(Some(QuizDetail {
            id: quiz.public_id,
            title: quiz.title,
            interests: quiz.interests,
            difficulty: Difficulty::from_db(&quiz.difficulty),
            skills,
            total_questions: quiz.total_questions,
            created_at: quiz.created_at,
            questions,
        }))
    }

    /// All quizzes whose skill set contains the given tag (unordered beyond
    /// newest-first).
    pub async fn quizzes_by_skill(&self, skill: &str) -> Result<Vec<QuizSummary>> {
        let rows = sqlx::query_as::<_, QuizRow>(
            r#"
            SELECT q.id, q.public_id, q.title, q.interests, q.difficulty, q.total_questions, q.created_at
            FROM quizzes q
            JOIN quiz_skills qs ON qs.quiz_id = q.id
            WHERE qs.skill = ?
            ORDER BY q.id DESC
            "#,
        )
        .bind(skill)
        .fetch_all(&self.pool)
        .await?;

        let mut summaries = Vec::with_capacity(rows.len());
        for quiz in rows {
            let skills = self.quiz_skills(quiz.id).await?;
            summaries.push(QuizSummary {
                id: quiz.public_id,
                title: quiz.title,
                interests: quiz.interests,
                difficulty: Difficulty::from_db(&quiz.difficulty),
                skills,
                total_questions: quiz.total_questions,
                created_at: quiz.created_at,
            });
        }

        Ok(summaries)
    }

    async fn quiz_skills(&self, quiz_id: i64) -> Result<Vec<String>> {
        let skills: Vec<String> =
            sqlx::query_scalar("SELECT skill FROM quiz_skills WHERE quiz_id = ? ORDER BY skill")
                .bind(quiz_id)
                .fetch_all(&self.pool)
                .await?;

        Ok(skills)
    }

    /// All options of a quiz grouped by question, each group sorted by
    /// option_order with malformed rows (missing order) last.
    pub(super) async fn quiz_options_by_question(
        &self,
        quiz_id: i64,
    ) -> Result<HashMap<i64, Vec<(Option<i64>, String)>>> {
        let option_rows = sqlx::query_as::<_, OptionRow>(
            r#"
            SELECT o.question_id, o.option_text, o.option_order
            FROM question_options o
            JOIN questions q ON q.id = o.question_id
            WHERE q.quiz_id = ?
            "#,
        )
        .bind(quiz_id)
        .fetch_all(&self.pool)
        .await?;

        let mut grouped: HashMap<i64, Vec<(Option<i64>, String)>> = HashMap::new();
        for row in option_rows {
            grouped
                .entry(row.question_id)
                .or_default()
                .push((row.option_order, row.option_text));
        }
        for options in grouped.values_mut() {
            options.sort_by_key(|(order, _)| order.unwrap_or(999));
        }

        Ok(grouped)
    }
}
