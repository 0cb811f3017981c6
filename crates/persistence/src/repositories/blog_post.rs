//! Blog post repository.

use sqlx::PgPool;
use uuid::Uuid;

use shared::pagination::PageRequest;

use crate::entities::blog_post::BLOG_COLUMNS;
use crate::entities::BlogPostEntity;
use crate::metrics::QueryTimer;

/// Normalized values for inserting a post.
#[derive(Debug, Clone)]
pub struct BlogPostInput {
    pub slug: String,
    pub title: String,
    pub excerpt: Option<String>,
    pub content: String,
    pub cover_image: Option<String>,
    pub author: String,
    pub tags: Vec<String>,
    pub is_published: bool,
}

/// Partial update; `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct BlogPostPatch {
    pub slug: Option<String>,
    pub title: Option<String>,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub cover_image: Option<String>,
    pub author: Option<String>,
    pub tags: Option<Vec<String>>,
    pub is_published: Option<bool>,
}

#[derive(Clone)]
pub struct BlogPostRepository {
    pool: PgPool,
}

impl BlogPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// `published_at` is stamped when created as published.
    pub async fn create(&self, input: &BlogPostInput) -> Result<BlogPostEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_blog_post");
        let sql = format!(
            r#"
            INSERT INTO blog_posts (
                slug, title, excerpt, content, cover_image, author, tags, is_published,
                published_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, CASE WHEN $8 THEN NOW() END)
            RETURNING {}
            "#,
            BLOG_COLUMNS
        );
        let result = sqlx::query_as::<_, BlogPostEntity>(&sql)
            .bind(&input.slug)
            .bind(&input.title)
            .bind(input.excerpt.as_deref())
            .bind(&input.content)
            .bind(input.cover_image.as_deref())
            .bind(&input.author)
            .bind(&input.tags)
            .bind(input.is_published)
            .fetch_one(&self.pool)
            .await;
        timer.record();
        result
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<BlogPostEntity>, sqlx::Error> {
        let sql = format!("SELECT {} FROM blog_posts WHERE id = $1", BLOG_COLUMNS);
        sqlx::query_as::<_, BlogPostEntity>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn find_published_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<BlogPostEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_blog_post_by_slug");
        let sql = format!(
            "SELECT {} FROM blog_posts WHERE slug = $1 AND is_published",
            BLOG_COLUMNS
        );
        let result = sqlx::query_as::<_, BlogPostEntity>(&sql)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await;
        timer.record();
        result
    }

    pub async fn slug_exists(&self, slug: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM blog_posts WHERE slug = $1)")
            .bind(slug)
            .fetch_one(&self.pool)
            .await
    }

    /// Posts newest first. `published_only` hides drafts; `tag` is matched exactly.
    pub async fn list(
        &self,
        published_only: bool,
        tag: Option<&str>,
        page: PageRequest,
    ) -> Result<(Vec<BlogPostEntity>, i64), sqlx::Error> {
        let timer = QueryTimer::new("list_blog_posts");

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM blog_posts
            WHERE (NOT $1 OR is_published)
              AND ($2::text IS NULL OR $2 = ANY(tags))
            "#,
        )
        .bind(published_only)
        .bind(tag)
        .fetch_one(&self.pool)
        .await?;

        let sql = format!(
            r#"
            SELECT {} FROM blog_posts
            WHERE (NOT $1 OR is_published)
              AND ($2::text IS NULL OR $2 = ANY(tags))
            ORDER BY COALESCE(published_at, created_at) DESC, id
            LIMIT $3 OFFSET $4
            "#,
            BLOG_COLUMNS
        );
        let rows = sqlx::query_as::<_, BlogPostEntity>(&sql)
            .bind(published_only)
            .bind(tag)
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

        timer.record();
        Ok((rows, total))
    }

    /// Applies a patch. `published_at` is set the first time the post is
    /// published and never overwritten.
    pub async fn update(
        &self,
        id: Uuid,
        patch: &BlogPostPatch,
    ) -> Result<Option<BlogPostEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_blog_post");
        let sql = format!(
            r#"
            UPDATE blog_posts SET
                slug = COALESCE($2, slug),
                title = COALESCE($3, title),
                excerpt = COALESCE($4, excerpt),
                content = COALESCE($5, content),
                cover_image = COALESCE($6, cover_image),
                author = COALESCE($7, author),
                tags = COALESCE($8, tags),
                is_published = COALESCE($9, is_published),
                published_at = CASE
                    WHEN published_at IS NULL AND COALESCE($9, is_published) THEN NOW()
                    ELSE published_at
                END
            WHERE id = $1
            RETURNING {}
            "#,
            BLOG_COLUMNS
        );
        let result = sqlx::query_as::<_, BlogPostEntity>(&sql)
            .bind(id)
            .bind(patch.slug.as_deref())
            .bind(patch.title.as_deref())
            .bind(patch.excerpt.as_deref())
            .bind(patch.content.as_deref())
            .bind(patch.cover_image.as_deref())
            .bind(patch.author.as_deref())
            .bind(patch.tags.as_ref())
            .bind(patch.is_published)
            .fetch_optional(&self.pool)
            .await;
        timer.record();
        result
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM blog_posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
