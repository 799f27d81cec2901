pub mod content;
pub mod db;
pub mod extractors;
pub mod generator;
pub mod handlers;
pub mod models;
pub mod names;
pub mod pagination;
pub mod rejections;
pub mod utils;

use std::sync::Arc;

use axum::Router;

use content::ContentProvider;
use generator::QuizGenerator;

#[derive(Clone)]
pub struct AppState {
    pub db: db::Db,
    pub generator: Arc<dyn QuizGenerator>,
    pub content: Arc<dyn ContentProvider>,
    pub secure_cookies: bool,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(handlers::auth::routes())
        .merge(handlers::quiz::routes())
        .merge(handlers::lessons::routes())
        .with_state(state)
}
