use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use crate::{
    db::RecordOutcome,
    extractors::AuthGuard,
    models::{
        first_bad_option_count, first_invalid_question, AttemptPayload, CreateQuizPayload,
        ExercisePayload, NewQuiz,
    },
    names,
    pagination::{ensure_in_range, PageParams, PaginationMeta},
    rejections::{AppError, OptionExt, ResultExt},
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(names::QUIZ_URL, post(create_quiz).get(list_by_skill))
        .route(names::QUIZ_ATTEMPT_URL, post(submit_attempt))
        .route(names::QUIZ_REVIEW_URL, get(review))
        .route(names::QUIZ_HISTORY_URL, get(history))
        .route(names::GENERATE_EXERCISE_URL, post(generate_exercise))
        .route("/fetch-exercise/{id}", get(fetch_exercise))
}

async fn create_quiz(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
    Json(body): Json<CreateQuizPayload>,
) -> Result<Json<serde_json::Value>, AppError> {
    if body.interests.trim().is_empty() {
        return Err(AppError::Input("Interests are required"));
    }
    if body.questions.is_empty() {
        return Err(AppError::Input("At least one question is required"));
    }
    if let Some(position) = first_bad_option_count(&body.questions) {
        return Err(AppError::Validation(
            "Questions must have between 4 and 10 options",
            json!({ "question": position + 1 }),
        ));
    }
    if let Some(position) = first_invalid_question(&body.questions) {
        return Err(AppError::Validation(
            "Correct answer index out of range",
            json!({ "question": position + 1 }),
        ));
    }

    let meta = NewQuiz {
        title: body.title,
        interests: body.interests,
        difficulty: body.difficulty,
        skills: body.skills,
    };
    let quiz_id = state
        .db
        .save_quiz(user.id, meta, &body.questions)
        .await
        .reject("Failed to save quiz")?;

    Ok(Json(json!({ "success": true, "quizId": quiz_id })))
}

#[derive(Deserialize)]
struct SkillQuery {
    skill: Option<String>,
}

async fn list_by_skill(
    State(state): State<AppState>,
    Query(query): Query<SkillQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let skill = query
        .skill
        .filter(|s| !s.trim().is_empty())
        .ok_or(AppError::Input("Skill query parameter is required"))?;

    let quizzes = state
        .db
        .quizzes_by_skill(&skill)
        .await
        .reject("Failed to fetch quizzes")?;

    Ok(Json(json!({ "data": quizzes })))
}

async fn submit_attempt(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
    Json(body): Json<AttemptPayload>,
) -> Result<Json<serde_json::Value>, AppError> {
    if body.quiz_id.trim().is_empty() {
        return Err(AppError::Input("Missing required fields"));
    }

    let outcome = state
        .db
        .record_attempt(user.id, &body.quiz_id, &body.answers, body.time_spent)
        .await
        .reject("Failed to save quiz attempt")?;

    match outcome {
        RecordOutcome::Saved(attempt_id) => {
            Ok(Json(json!({ "success": true, "attemptId": attempt_id })))
        }
        RecordOutcome::QuizNotFound => Err(AppError::NotFound("Quiz not found")),
        RecordOutcome::UnknownQuestion => {
            Err(AppError::Input("Answer references an unknown question"))
        }
        RecordOutcome::DuplicateAnswer => {
            Err(AppError::Input("Duplicate answer for a question"))
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReviewQuery {
    attempt_id: Option<String>,
}

async fn review(
    State(state): State<AppState>,
    Query(query): Query<ReviewQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let attempt_id = query
        .attempt_id
        .ok_or(AppError::Input("Missing attemptId in query params"))?;

    let review = state
        .db
        .build_review(&attempt_id)
        .await
        .reject("Failed to build review")?
        .reject_not_found("Attempt not found")?;

    Ok(Json(serde_json::to_value(review).reject("Failed to build review")?))
}

#[derive(Deserialize)]
struct HistoryQuery {
    page: Option<i64>,
    size: Option<i64>,
}

async fn history(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let params = PageParams::new(query.page, query.size, names::DEFAULT_HISTORY_PAGE_SIZE)
        .map_err(AppError::Input)?;

    let total = state
        .db
        .attempts_count(user.id)
        .await
        .reject("Failed to fetch quiz history")?;
    ensure_in_range(total, params).map_err(AppError::Input)?;

    let histories = state
        .db
        .attempt_history(user.id, params)
        .await
        .reject("Failed to fetch quiz history")?;

    Ok(Json(json!({
        "message": "Fetch quiz history data successful",
        "data": { "histories": histories },
        "pagination": PaginationMeta::build(total, params),
    })))
}

async fn generate_exercise(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
    Json(body): Json<ExercisePayload>,
) -> Result<Json<serde_json::Value>, AppError> {
    if body.interests.trim().is_empty() {
        return Err(AppError::Input("Interests are required"));
    }
    if body.number < 1 {
        return Err(AppError::Input("Question count must be positive"));
    }

    let generated = state
        .generator
        .generate(&body)
        .await
        .reject("Failed to generate exercise")?;

    let mut questions = generated.questions;
    // The explanation toggle wins over whatever the generator returned
    if !body.toggles.explanation {
        for question in &mut questions {
            question.explanation = None;
        }
    }

    if first_bad_option_count(&questions).is_some() || first_invalid_question(&questions).is_some()
    {
        return Err(AppError::Internal("Generator produced an invalid quiz"));
    }

    let meta = NewQuiz {
        title: None,
        interests: body.interests,
        difficulty: body.difficulty,
        skills: body.skills,
    };
    let quiz_id = state
        .db
        .save_quiz(user.id, meta, &questions)
        .await
        .reject("Failed to save generated quiz")?;

    Ok(Json(json!({ "success": true, "quizId": quiz_id })))
}

async fn fetch_exercise(
    AuthGuard(_user): AuthGuard,
    State(state): State<AppState>,
    Path(public_id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let quiz = state
        .db
        .get_quiz(&public_id)
        .await
        .reject("Failed to fetch quiz")?
        .reject_not_found("Quiz not found")?;

    Ok(Json(serde_json::to_value(quiz).reject("Failed to fetch quiz")?))
}
