//! Request/response payload types shared between the HTTP surface, the
//! generator, and the quiz store. Field casing follows the web client's
//! contract (camelCase throughout).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    pub fn from_db(value: &str) -> Self {
        match value {
            "easy" => Difficulty::Easy,
            "hard" => Difficulty::Hard,
            _ => Difficulty::Medium,
        }
    }
}

/// One question as produced by the generator or authored by a user.
/// `correct_answer_index` is a 0-based position into `options`, not a
/// reference to a stored row.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedQuestion {
    pub question_text: String,
    pub options: Vec<String>,
    pub correct_answer_index: i64,
    #[serde(default)]
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneratedQuiz {
    pub questions: Vec<GeneratedQuestion>,
}

/// Position of the first question whose correct answer index falls outside
/// its own option list, if any.
pub fn first_invalid_question(questions: &[GeneratedQuestion]) -> Option<usize> {
    questions
        .iter()
        .position(|q| q.correct_answer_index < 0 || q.correct_answer_index >= q.options.len() as i64)
}

/// Position of the first question whose option count falls outside the
/// 4-10 range the generation schema promises, if any.
pub fn first_bad_option_count(questions: &[GeneratedQuestion]) -> Option<usize> {
    questions.iter().position(|q| {
        q.options.len() < crate::names::MIN_QUESTION_OPTIONS
            || q.options.len() > crate::names::MAX_QUESTION_OPTIONS
    })
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Toggles {
    #[serde(default)]
    pub answer_key: bool,
    #[serde(default)]
    pub explanation: bool,
}

/// Parameters for LLM quiz generation.
#[derive(Debug, Clone, Deserialize)]
pub struct ExercisePayload {
    #[serde(default)]
    pub skills: Vec<String>,
    pub interests: String,
    #[serde(default)]
    pub difficulty: Difficulty,
    pub number: i64,
    #[serde(default)]
    pub toggles: Toggles,
    #[serde(default)]
    pub additional: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuizPayload {
    #[serde(default)]
    pub title: Option<String>,
    pub interests: String,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub skills: Vec<String>,
    pub questions: Vec<GeneratedQuestion>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerPayload {
    pub question_id: i64,
    #[serde(default)]
    pub selected_option_index: Option<i64>,
    #[serde(default)]
    pub time_spent: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptPayload {
    pub quiz_id: String,
    #[serde(default)]
    pub time_spent: i64,
    #[serde(default)]
    pub answers: Vec<AnswerPayload>,
}

/// Metadata for a quiz about to be persisted.
#[derive(Debug, Clone)]
pub struct NewQuiz {
    pub title: Option<String>,
    pub interests: String,
    pub difficulty: Difficulty,
    pub skills: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub id: i64,
    pub question_text: String,
    pub options: Vec<String>,
    pub correct_answer_index: i64,
    pub explanation: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizDetail {
    pub id: String,
    pub title: String,
    pub interests: String,
    pub difficulty: Difficulty,
    pub skills: Vec<String>,
    pub total_questions: i64,
    pub created_at: String,
    pub questions: Vec<QuizQuestion>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizSummary {
    pub id: String,
    pub title: String,
    pub interests: String,
    pub difficulty: Difficulty,
    pub skills: Vec<String>,
    pub total_questions: i64,
    pub created_at: String,
}

#[derive(Debug, Serialize)]
pub struct ReviewAnswerChoice {
    pub label: String,
    pub text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewQuestion {
    pub number: i64,
    pub text: String,
    pub answers: Vec<ReviewAnswerChoice>,
    pub correct_answer: String,
    pub user_answer: String,
    pub explanation: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewAttempt {
    pub id: String,
    pub score: i64,
    pub total_questions: i64,
    pub percentage: f64,
    pub time_spent: i64,
    pub completed_at: String,
}

/// Display-ready reconstruction of a finished attempt.
#[derive(Debug, Serialize)]
pub struct Review {
    pub questions: Vec<ReviewQuestion>,
    #[serde(flatten)]
    pub attempt: ReviewAttempt,
}

#[derive(Debug, Deserialize)]
pub struct RegisterPayload {
    pub email: String,
    pub password: String,
    #[serde(rename = "fullName")]
    pub full_name: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginPayload {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfilePayload {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordPayload {
    pub current_password: String,
    pub new_password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(options: usize, correct: i64) -> GeneratedQuestion {
        GeneratedQuestion {
            question_text: "q".to_string(),
            options: (0..options).map(|i| format!("option {i}")).collect(),
            correct_answer_index: correct,
            explanation: None,
        }
    }

    #[test]
    fn in_bounds_indices_pass_validation() {
        let questions = vec![question(4, 0), question(4, 3)];
        assert_eq!(first_invalid_question(&questions), None);
    }

    #[test]
    fn out_of_range_index_is_flagged() {
        let questions = vec![question(4, 1), question(4, 4), question(4, 2)];
        assert_eq!(first_invalid_question(&questions), Some(1));
    }

    #[test]
    fn negative_index_is_flagged() {
        let questions = vec![question(4, -1)];
        assert_eq!(first_invalid_question(&questions), Some(0));
    }

    #[test]
    fn option_counts_outside_four_to_ten_are_flagged() {
        assert_eq!(first_bad_option_count(&[question(4, 0), question(10, 9)]), None);
        assert_eq!(first_bad_option_count(&[question(4, 0), question(3, 0)]), Some(1));
        assert_eq!(first_bad_option_count(&[question(11, 0)]), Some(0));
        assert_eq!(first_bad_option_count(&[question(0, 0)]), Some(0));
    }

    #[test]
    fn exercise_payload_defaults() {
        let payload: ExercisePayload =
            serde_json::from_str(r#"{"interests": "space travel", "number": 5}"#).unwrap();
        assert_eq!(payload.difficulty, Difficulty::Medium);
        assert!(payload.skills.is_empty());
        assert!(!payload.toggles.explanation);
    }
}
