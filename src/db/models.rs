// Database model structs

use serde::Serialize;

#[derive(Clone, Serialize, sqlx::FromRow)]
pub struct AuthUser {
    pub id: i64,
    pub email: String,
    pub display_name: String,
}

#[derive(sqlx::FromRow)]
pub struct QuizRow {
    pub id: i64,
    pub public_id: String,
    pub title: String,
    pub interests: String,
    pub difficulty: String,
    pub total_questions: i64,
    pub created_at: String,
}

#[derive(sqlx::FromRow)]
pub struct QuestionRow {
    pub id: i64,
    pub question_text: String,
    pub correct_answer_index: i64,
    pub explanation: Option<String>,
}

#[derive(sqlx::FromRow)]
pub struct OptionRow {
    pub question_id: i64,
    pub option_text: String,
    pub option_order: Option<i64>,
}

#[derive(sqlx::FromRow)]
pub struct AttemptRow {
    pub id: i64,
    pub public_id: String,
    pub quiz_id: i64,
    pub score: i64,
    pub total_questions: i64,
    pub percentage: f64,
    pub time_spent: i64,
    pub completed_at: String,
}

#[derive(sqlx::FromRow)]
pub struct AnswerRow {
    pub question_id: i64,
    pub selected_option_index: Option<i64>,
}

#[derive(Serialize, sqlx::FromRow)]
pub struct HistoryRow {
    pub id: String,
    pub title: String,
    pub date: String,
    pub score: i64,
    pub total_questions: i64,
    pub percentage: f64,
}
