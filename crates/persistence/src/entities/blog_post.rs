//! Blog post entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

pub const BLOG_COLUMNS: &str = "id, slug, title, excerpt, content, cover_image, author, tags, \
     is_published, published_at, created_at, updated_at";

/// Database row mapping for the blog_posts table.
#[derive(Debug, Clone, FromRow)]
pub struct BlogPostEntity {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub excerpt: Option<String>,
    pub content: String,
    pub cover_image: Option<String>,
    pub author: String,
    pub tags: Vec<String>,
    pub is_published: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<BlogPostEntity> for domain::models::BlogPost {
    fn from(e: BlogPostEntity) -> Self {
        domain::models::BlogPost {
            id: e.id,
            slug: e.slug,
            title: e.title,
            excerpt: e.excerpt,
            content: e.content,
            cover_image: e.cover_image,
            author: e.author,
            tags: e.tags,
            is_published: e.is_published,
            published_at: e.published_at,
            created_at: e.created_at,
            updated_at: e.updated_at,
        }
    }
}
