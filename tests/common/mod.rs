#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use color_eyre::Result;
use toeflprep::content::{Chapter, ContentProvider, Section, Skill, TopicGroup};
use toeflprep::db::Db;
use toeflprep::generator::QuizGenerator;
use toeflprep::models::{ExercisePayload, GeneratedQuestion, GeneratedQuiz};
use toeflprep::AppState;

pub async fn create_test_db() -> Db {
    use std::sync::atomic::{AtomicU32, Ordering};
    static COUNTER: AtomicU32 = AtomicU32::new(0);
    let id = COUNTER.fetch_add(1, Ordering::SeqCst);
    let path =
        std::env::temp_dir().join(format!("toeflprep_test_{}_{}.db", std::process::id(), id));
    // Clean up leftover file from previous runs
    let _ = std::fs::remove_file(&path);
    let url = format!("sqlite://{}", path.display());
    Db::new(&url).await.expect("failed to create test database")
}

pub struct StubGenerator {
    pub quiz: GeneratedQuiz,
}

#[async_trait]
impl QuizGenerator for StubGenerator {
    async fn generate(&self, _params: &ExercisePayload) -> Result<GeneratedQuiz> {
        Ok(self.quiz.clone())
    }
}

pub struct StubContent {
    pub sections: Vec<Section>,
}

#[async_trait]
impl ContentProvider for StubContent {
    async fn sections(&self) -> Result<Vec<Section>> {
        Ok(self.sections.clone())
    }
}

pub fn state_with(db: Db, quiz: GeneratedQuiz, sections: Vec<Section>) -> AppState {
    AppState {
        db,
        generator: Arc::new(StubGenerator { quiz }),
        content: Arc::new(StubContent { sections }),
        secure_cookies: false,
    }
}

pub fn test_state(db: Db) -> AppState {
    state_with(db, GeneratedQuiz::default(), Vec::new())
}

/// n questions with 4 options each; the correct option cycles through
/// positions 0..4 by question index.
pub fn sample_questions(n: usize, with_explanations: bool) -> Vec<GeneratedQuestion> {
    (0..n)
        .map(|i| GeneratedQuestion {
            question_text: format!("Question {}", i + 1),
            options: (0..4).map(|o| format!("Q{} option {o}", i + 1)).collect(),
            correct_answer_index: (i % 4) as i64,
            explanation: with_explanations.then(|| format!("Because of rule {}", i + 1)),
        })
        .collect()
}

pub fn sample_sections() -> Vec<Section> {
    vec![Section {
        name: "Reading".to_string(),
        slug: "reading".to_string(),
        chapters: vec![Chapter {
            name: "Main Ideas".to_string(),
            slug: "main-ideas".to_string(),
            topic_groups: vec![TopicGroup {
                name: "Skimming".to_string(),
                slug: "skimming".to_string(),
                skills: vec![
                    Skill {
                        name: "Topic Sentences".to_string(),
                        slug: "topic-sentences".to_string(),
                        description: "Find the controlling idea.".to_string(),
                    },
                    Skill {
                        name: "Paragraph Structure".to_string(),
                        slug: "paragraph-structure".to_string(),
                        description: "Follow how ideas develop.".to_string(),
                    },
                ],
            }],
        }],
    }]
}
