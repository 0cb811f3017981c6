//! Blog endpoint handlers.
//!
//! Public reads only ever see published posts and are cached under `blog:`.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::info;
use uuid::Uuid;

use domain::models::blog_post::{
    normalize_tags, CreateBlogPostRequest, ListBlogPostsQuery, UpdateBlogPostRequest,
};
use domain::models::{ApiResponse, BlogPost, BlogPostSummary};
use persistence::repositories::{BlogPostInput, BlogPostPatch, BlogPostRepository};
use shared::pagination::PageMeta;
use shared::slug::{is_valid_slug, slugify, MAX_SLUG_LENGTH};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::ValidatedJson;
use crate::routes::{cache_keys, CachedPage};

/// Numbered variants tried for a title-derived slug before giving up.
const MAX_SLUG_SUFFIX: u32 = 50;

/// `base-n`, cutting `base` so the result stays within the slug length limit.
fn with_suffix(base: &str, n: u32) -> String {
    let suffix = format!("-{}", n);
    let keep = MAX_SLUG_LENGTH.saturating_sub(suffix.len()).min(base.len());
    format!("{}{}", base[..keep].trim_end_matches('-'), suffix)
}

async fn unique_slug(repo: &BlogPostRepository, base: &str) -> Result<String, ApiError> {
    if !repo.slug_exists(base).await? {
        return Ok(base.to_string());
    }
    for n in 2..=MAX_SLUG_SUFFIX {
        let candidate = with_suffix(base, n);
        if !repo.slug_exists(&candidate).await? {
            return Ok(candidate);
        }
    }
    Err(ApiError::Conflict(
        "Could not derive a unique slug; please provide one".to_string(),
    ))
}

fn check_slug(slug: &str) -> Result<(), ApiError> {
    if is_valid_slug(slug) {
        Ok(())
    } else {
        Err(ApiError::field(
            "slug",
            format!(
                "Slug must be lowercase letters, digits and single hyphens, at most {} characters",
                MAX_SLUG_LENGTH
            ),
        ))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// GET /api/blog
pub async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<ListBlogPostsQuery>,
) -> Result<Json<ApiResponse<Vec<BlogPostSummary>>>, ApiError> {
    let page = state.page(query.page, query.limit);
    let tag = query
        .tag
        .as_deref()
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty());
    let key = format!(
        "{}list:{}:{}:{}",
        cache_keys::BLOG,
        tag.as_deref().unwrap_or(""),
        page.page,
        page.limit
    );

    let cached: CachedPage<BlogPostSummary> = state
        .cache
        .get_or_set(&key, state.cache_ttl(), || async {
            let (rows, total) = BlogPostRepository::new(state.pool.clone())
                .list(true, tag.as_deref(), page)
                .await?;
            Ok::<_, ApiError>(CachedPage {
                items: rows
                    .into_iter()
                    .map(|row| BlogPost::from(row).summary())
                    .collect(),
                meta: PageMeta::new(page, total),
            })
        })
        .await?;

    Ok(Json(ApiResponse::paginated(cached.items, cached.meta)))
}

/// GET /api/blog/:slug
pub async fn get_post(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<ApiResponse<BlogPost>>, ApiError> {
    if !is_valid_slug(&slug) {
        return Err(ApiError::NotFound("Post not found".to_string()));
    }

    let key = format!("{}post:{}", cache_keys::BLOG, slug);
    let post = state
        .cache
        .get_or_set(&key, state.cache_ttl(), || async {
            BlogPostRepository::new(state.pool.clone())
                .find_published_by_slug(&slug)
                .await?
                .map(BlogPost::from)
                .ok_or_else(|| ApiError::NotFound("Post not found".to_string()))
        })
        .await?;

    Ok(Json(ApiResponse::ok(post)))
}

/// GET /api/admin/blog
///
/// Drafts included, never cached.
pub async fn list_all_posts(
    State(state): State<AppState>,
    Query(query): Query<ListBlogPostsQuery>,
) -> Result<Json<ApiResponse<Vec<BlogPost>>>, ApiError> {
    let page = state.page(query.page, query.limit);
    let tag = query.tag.as_deref().map(|t| t.trim().to_lowercase());
    let (rows, total) = BlogPostRepository::new(state.pool.clone())
        .list(false, tag.as_deref().filter(|t| !t.is_empty()), page)
        .await?;

    Ok(Json(ApiResponse::paginated(
        rows.into_iter().map(BlogPost::from).collect(),
        PageMeta::new(page, total),
    )))
}

/// POST /api/admin/blog
pub async fn create_post(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateBlogPostRequest>,
) -> Result<(StatusCode, Json<ApiResponse<BlogPost>>), ApiError> {
    let repo = BlogPostRepository::new(state.pool.clone());

    let slug = match non_empty(request.slug.clone()) {
        Some(slug) => {
            check_slug(&slug)?;
            if repo.slug_exists(&slug).await? {
                return Err(ApiError::Conflict(format!(
                    "A post with slug '{}' already exists",
                    slug
                )));
            }
            slug
        }
        None => {
            let base = slugify(&request.title);
            if base.is_empty() {
                return Err(ApiError::field(
                    "title",
                    "Title must contain letters or digits",
                ));
            }
            unique_slug(&repo, &base).await?
        }
    };

    let input = BlogPostInput {
        slug,
        title: request.title.trim().to_string(),
        excerpt: non_empty(request.excerpt),
        content: request.content,
        cover_image: non_empty(request.cover_image),
        author: request.author.trim().to_string(),
        tags: normalize_tags(&request.tags),
        is_published: request.is_published,
    };

    let post = BlogPost::from(repo.create(&input).await?);
    state.cache.invalidate_prefix(cache_keys::BLOG).await;

    info!(
        post_id = %post.id,
        slug = %post.slug,
        published = post.is_published,
        "Blog post created"
    );
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(post))))
}

/// PATCH /api/admin/blog/:id
pub async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateBlogPostRequest>,
) -> Result<Json<ApiResponse<BlogPost>>, ApiError> {
    let repo = BlogPostRepository::new(state.pool.clone());
    let current = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Post not found".to_string()))?;

    let slug = non_empty(request.slug);
    if let Some(slug) = slug.as_deref() {
        check_slug(slug)?;
        if slug != current.slug && repo.slug_exists(slug).await? {
            return Err(ApiError::Conflict(format!(
                "A post with slug '{}' already exists",
                slug
            )));
        }
    }

    let patch = BlogPostPatch {
        slug,
        title: request.title.map(|t| t.trim().to_string()),
        excerpt: request.excerpt.map(|e| e.trim().to_string()),
        content: request.content,
        cover_image: request.cover_image,
        author: request.author.map(|a| a.trim().to_string()),
        tags: request.tags.as_deref().map(normalize_tags),
        is_published: request.is_published,
    };

    let post = repo
        .update(id, &patch)
        .await?
        .map(BlogPost::from)
        .ok_or_else(|| ApiError::NotFound("Post not found".to_string()))?;
    state.cache.invalidate_prefix(cache_keys::BLOG).await;

    info!(post_id = %post.id, slug = %post.slug, "Blog post updated");
    Ok(Json(ApiResponse::ok(post)))
}

/// DELETE /api/admin/blog/:id
pub async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if !BlogPostRepository::new(state.pool.clone())
        .delete(id)
        .await?
    {
        return Err(ApiError::NotFound("Post not found".to_string()));
    }
    state.cache.invalidate_prefix(cache_keys::BLOG).await;

    info!(post_id = %id, "Blog post deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_suffix() {
        assert_eq!(with_suffix("spring-sale", 2), "spring-sale-2");
    }

    #[test]
    fn test_with_suffix_respects_max_length() {
        let base = "a".repeat(MAX_SLUG_LENGTH);
        let slug = with_suffix(&base, 12);
        assert_eq!(slug.len(), MAX_SLUG_LENGTH);
        assert!(slug.ends_with("-12"));
        assert!(is_valid_slug(&slug));
    }

    #[test]
    fn test_with_suffix_does_not_leave_double_hyphen() {
        let base = format!("{}-b", "a".repeat(MAX_SLUG_LENGTH - 3));
        let slug = with_suffix(&base, 7);
        assert!(!slug.contains("--"));
        assert!(is_valid_slug(&slug));
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty(Some("  ".to_string())), None);
        assert_eq!(non_empty(Some(" x ".to_string())), Some("x".to_string()));
        assert_eq!(non_empty(None), None);
    }
}
