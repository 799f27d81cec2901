use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use crate::{
    content::{filter_lesson_skills, flatten_lesson_skills, LessonFilter},
    names,
    pagination::{ensure_in_range, PageParams, PaginationMeta},
    rejections::{AppError, ResultExt},
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new().route(names::LESSONS_URL, get(lessons))
}

#[derive(Deserialize)]
struct LessonsQuery {
    section: Option<String>,
    chapter: Option<String>,
    topic: Option<String>,
    q: Option<String>,
    search: Option<String>,
    page: Option<i64>,
    size: Option<i64>,
    #[serde(rename = "pageSize")]
    page_size: Option<i64>,
}

async fn lessons(
    State(state): State<AppState>,
    Query(query): Query<LessonsQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let params = PageParams::new(
        query.page,
        query.size.or(query.page_size),
        names::DEFAULT_LESSON_PAGE_SIZE,
    )
    .map_err(AppError::Input)?;

    let sections = state
        .content
        .sections()
        .await
        .reject("Failed to fetch lessons data")?;

    let filter = LessonFilter {
        section: query.section,
        chapter: query.chapter,
        topic: query.topic,
        search: query.q.or(query.search),
    };
    let items = filter_lesson_skills(flatten_lesson_skills(&sections), &filter);

    let total = items.len() as i64;
    ensure_in_range(total, params).map_err(AppError::Input)?;

    let page_items: Vec<_> = items
        .into_iter()
        .skip(params.offset() as usize)
        .take(params.size as usize)
        .collect();

    Ok(Json(json!({
        "data": page_items,
        "pagination": PaginationMeta::build(total, params),
    })))
}
