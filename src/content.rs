//! Read-only lesson content: sections, chapters, topic groups, and skills
//! fetched from the structured-content service, flattened into the lesson
//! listing the client renders.

use async_trait::async_trait;
use color_eyre::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct Section {
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub chapters: Vec<Chapter>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub topic_groups: Vec<TopicGroup>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TopicGroup {
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub skills: Vec<Skill>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Skill {
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: String,
}

/// One row of the lesson listing, carrying its ancestry in the content tree.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonSkill {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub section: String,
    pub chapter: String,
    pub topic: String,
}

#[derive(Debug, Default)]
pub struct LessonFilter {
    pub section: Option<String>,
    pub chapter: Option<String>,
    pub topic: Option<String>,
    pub search: Option<String>,
}

#[async_trait]
pub trait ContentProvider: Send + Sync {
    /// The full section tree. This system never writes to the content store.
    async fn sections(&self) -> Result<Vec<Section>>;
}

pub struct HttpContentProvider {
    base_url: String,
    client: reqwest::Client,
}

impl HttpContentProvider {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl ContentProvider for HttpContentProvider {
    async fn sections(&self) -> Result<Vec<Section>> {
        let url = format!("{}/sections", self.base_url.trim_end_matches('/'));
        let sections = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<Section>>()
            .await?;

        Ok(sections)
    }
}

/// Flatten the section tree into lesson rows, one per skill.
pub fn flatten_lesson_skills(sections: &[Section]) -> Vec<LessonSkill> {
    let mut items = Vec::new();

    for section in sections {
        for chapter in &section.chapters {
            for topic in &chapter.topic_groups {
                for skill in &topic.skills {
                    if skill.slug.is_empty() || skill.name.is_empty() {
                        continue;
                    }
                    items.push(LessonSkill {
                        id: skill.slug.clone(),
                        title: skill.name.clone(),
                        slug: skill.slug.clone(),
                        description: skill.description.clone(),
                        section: section.slug.clone(),
                        chapter: chapter.slug.clone(),
                        topic: topic.slug.clone(),
                    });
                }
            }
        }
    }

    items
}

/// Narrow the flattened listing by ancestry slugs and a case-insensitive
/// free-text search over title and description.
pub fn filter_lesson_skills(items: Vec<LessonSkill>, filter: &LessonFilter) -> Vec<LessonSkill> {
    let search = filter.search.as_ref().map(|s| s.to_lowercase());

    items
        .into_iter()
        .filter(|item| {
            if let Some(section) = &filter.section {
                if &item.section != section {
                    return false;
                }
            }
            if let Some(chapter) = &filter.chapter {
                if &item.chapter != chapter {
                    return false;
                }
            }
            if let Some(topic) = &filter.topic {
                if &item.topic != topic {
                    return false;
                }
            }
            if let Some(search) = &search {
                if !item.title.to_lowercase().contains(search)
                    && !item.description.to_lowercase().contains(search)
                {
                    return false;
                }
            }
            true
        })
        .collect()
}
