//! Blog post domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A blog article. Drafts are only visible through the admin API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub excerpt: Option<String>,
    pub content: String,
    pub cover_image: Option<String>,
    pub author: String,
    pub tags: Vec<String>,
    pub is_published: bool,
    /// Set the first time the post is published and never changed after.
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BlogPost {
    /// Estimated reading time at 200 words per minute, minimum one minute.
    pub fn reading_minutes(&self) -> u32 {
        let words = self.content.split_whitespace().count() as u32;
        words.div_ceil(200).max(1)
    }

    pub fn summary(&self) -> BlogPostSummary {
        BlogPostSummary {
            id: self.id,
            slug: self.slug.clone(),
            title: self.title.clone(),
            excerpt: self
                .excerpt
                .clone()
                .unwrap_or_else(|| excerpt_from(&self.content, 200)),
            cover_image: self.cover_image.clone(),
            author: self.author.clone(),
            tags: self.tags.clone(),
            reading_minutes: self.reading_minutes(),
            published_at: self.published_at,
        }
    }
}

/// List item for the blog index (no body).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPostSummary {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    pub cover_image: Option<String>,
    pub author: String,
    pub tags: Vec<String>,
    pub reading_minutes: u32,
    pub published_at: Option<DateTime<Utc>>,
}

/// Cuts plain text to at most `max_chars`, on a word boundary, with an ellipsis.
pub fn excerpt_from(content: &str, max_chars: usize) -> String {
    let text = content.split_whitespace().collect::<Vec<_>>().join(" ");
    if text.chars().count() <= max_chars {
        return text;
    }
    let cut: String = text.chars().take(max_chars).collect();
    let trimmed = match cut.rfind(' ') {
        Some(idx) if idx > 0 => &cut[..idx],
        _ => cut.as_str(),
    };
    format!("{}…", trimmed.trim_end_matches(|c: char| c.is_ascii_punctuation()))
}

/// Request payload for creating a post.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBlogPostRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    /// Derived from the title when omitted.
    #[validate(regex(path = *shared::slug::SLUG_REGEX, message = "Slug may only contain lowercase letters, digits and hyphens"))]
    pub slug: Option<String>,

    #[validate(length(max = 500, message = "Excerpt must be at most 500 characters"))]
    pub excerpt: Option<String>,

    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,

    #[validate(url(message = "Cover image must be a valid URL"))]
    pub cover_image: Option<String>,

    #[validate(length(min = 1, max = 100, message = "Author must be 1-100 characters"))]
    pub author: String,

    #[serde(default)]
    #[validate(length(max = 20, message = "At most 20 tags"))]
    pub tags: Vec<String>,

    #[serde(default)]
    pub is_published: bool,
}

/// Request payload for editing a post (partial update).
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBlogPostRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,

    #[validate(regex(path = *shared::slug::SLUG_REGEX, message = "Slug may only contain lowercase letters, digits and hyphens"))]
    pub slug: Option<String>,

    #[validate(length(max = 500, message = "Excerpt must be at most 500 characters"))]
    pub excerpt: Option<String>,

    #[validate(length(min = 1, message = "Content is required"))]
    pub content: Option<String>,

    #[validate(url(message = "Cover image must be a valid URL"))]
    pub cover_image: Option<String>,

    #[validate(length(min = 1, max = 100, message = "Author must be 1-100 characters"))]
    pub author: Option<String>,

    #[validate(length(max = 20, message = "At most 20 tags"))]
    pub tags: Option<Vec<String>>,

    pub is_published: Option<bool>,
}

/// Query parameters for blog listings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListBlogPostsQuery {
    pub tag: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Lowercases, trims and dedupes tags, dropping empties. Order of first
/// appearance is kept.
pub fn normalize_tags(tags: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim().to_lowercase();
        if !tag.is_empty() && !out.contains(&tag) {
            out.push(tag);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(content: &str) -> BlogPost {
        BlogPost {
            id: Uuid::new_v4(),
            slug: "spring-service-specials".to_string(),
            title: "Spring Service Specials".to_string(),
            excerpt: None,
            content: content.to_string(),
            cover_image: None,
            author: "Service Team".to_string(),
            tags: vec!["service".to_string()],
            is_published: true,
            published_at: Some(Utc::now()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_reading_minutes() {
        assert_eq!(post("short").reading_minutes(), 1);
        let long = "word ".repeat(401);
        assert_eq!(post(&long).reading_minutes(), 3);
    }

    #[test]
    fn test_summary_derives_excerpt() {
        let body = "Tire rotation. ".repeat(40);
        let summary = post(&body).summary();
        assert!(summary.excerpt.chars().count() <= 201);
        assert!(summary.excerpt.ends_with('…'));
        assert_eq!(summary.slug, "spring-service-specials");
    }

    #[test]
    fn test_excerpt_short_text_untouched() {
        assert_eq!(excerpt_from("  Hello   world ", 50), "Hello world");
    }

    #[test]
    fn test_normalize_tags() {
        let tags = vec![
            " Financing ".to_string(),
            "financing".to_string(),
            "".to_string(),
            "EV".to_string(),
        ];
        assert_eq!(normalize_tags(&tags), vec!["financing", "ev"]);
    }

    #[test]
    fn test_create_request_rejects_bad_slug() {
        let json = r#"{
            "title": "Hello",
            "slug": "Not A Slug",
            "content": "Body",
            "author": "Sam"
        }"#;
        let request: CreateBlogPostRequest = serde_json::from_str(json).unwrap();
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("slug"));
    }

    #[test]
    fn test_create_request_slug_optional() {
        let json = r#"{"title": "Hello", "content": "Body", "author": "Sam"}"#;
        let request: CreateBlogPostRequest = serde_json::from_str(json).unwrap();
        assert!(request.validate().is_ok());
        assert!(!request.is_published);
    }
}
