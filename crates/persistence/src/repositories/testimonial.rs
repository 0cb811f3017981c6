//! Testimonial repository.

use sqlx::PgPool;
use uuid::Uuid;

use domain::models::testimonial::{
    CreateTestimonialRequest, ModerateTestimonialRequest, TestimonialFilter,
};
use shared::pagination::PageRequest;

use crate::entities::{RatingSummaryEntity, TestimonialEntity};
use crate::metrics::QueryTimer;

const TESTIMONIAL_COLUMNS: &str = "id, customer_name, location, rating, content, \
     vehicle_purchased, is_approved, is_public, created_at, updated_at";

fn approval_filter(filter: TestimonialFilter) -> Option<bool> {
    match filter {
        TestimonialFilter::Pending => Some(false),
        TestimonialFilter::Approved => Some(true),
        TestimonialFilter::All => None,
    }
}

#[derive(Clone)]
pub struct TestimonialRepository {
    pool: PgPool,
}

impl TestimonialRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// New submissions always start unapproved.
    pub async fn create(
        &self,
        input: &CreateTestimonialRequest,
    ) -> Result<TestimonialEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_testimonial");
        let sql = format!(
            r#"
            INSERT INTO testimonials (
                customer_name, location, rating, content, vehicle_purchased, is_approved, is_public
            )
            VALUES ($1, $2, $3, $4, $5, FALSE, $6)
            RETURNING {}
            "#,
            TESTIMONIAL_COLUMNS
        );
        let result = sqlx::query_as::<_, TestimonialEntity>(&sql)
            .bind(input.customer_name.trim())
            .bind(input.location.as_deref().map(str::trim))
            .bind(input.rating)
            .bind(input.content.trim())
            .bind(input.vehicle_purchased.as_deref().map(str::trim))
            .bind(input.is_public)
            .fetch_one(&self.pool)
            .await;
        timer.record();
        result
    }

    /// Approved and public, newest first.
    pub async fn list_visible(&self, limit: i64) -> Result<Vec<TestimonialEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_visible_testimonials");
        let sql = format!(
            r#"
            SELECT {} FROM testimonials
            WHERE is_approved AND is_public
            ORDER BY created_at DESC, id
            LIMIT $1
            "#,
            TESTIMONIAL_COLUMNS
        );
        let result = sqlx::query_as::<_, TestimonialEntity>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await;
        timer.record();
        result
    }

    pub async fn rating_summary(&self) -> Result<RatingSummaryEntity, sqlx::Error> {
        sqlx::query_as::<_, RatingSummaryEntity>(
            r#"
            SELECT AVG(rating)::float8 AS average, COUNT(*) AS count
            FROM testimonials
            WHERE is_approved AND is_public
            "#,
        )
        .fetch_one(&self.pool)
        .await
    }

    pub async fn list_for_admin(
        &self,
        filter: TestimonialFilter,
        page: PageRequest,
    ) -> Result<(Vec<TestimonialEntity>, i64), sqlx::Error> {
        let timer = QueryTimer::new("list_testimonials_admin");
        let approved = approval_filter(filter);

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM testimonials WHERE ($1::bool IS NULL OR is_approved = $1)",
        )
        .bind(approved)
        .fetch_one(&self.pool)
        .await?;

        let sql = format!(
            r#"
            SELECT {} FROM testimonials
            WHERE ($1::bool IS NULL OR is_approved = $1)
            ORDER BY created_at DESC, id
            LIMIT $2 OFFSET $3
            "#,
            TESTIMONIAL_COLUMNS
        );
        let rows = sqlx::query_as::<_, TestimonialEntity>(&sql)
            .bind(approved)
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

        timer.record();
        Ok((rows, total))
    }

    pub async fn moderate(
        &self,
        id: Uuid,
        input: &ModerateTestimonialRequest,
    ) -> Result<Option<TestimonialEntity>, sqlx::Error> {
        let sql = format!(
            r#"
            UPDATE testimonials SET
                is_approved = COALESCE($2, is_approved),
                is_public = COALESCE($3, is_public)
            WHERE id = $1
            RETURNING {}
            "#,
            TESTIMONIAL_COLUMNS
        );
        sqlx::query_as::<_, TestimonialEntity>(&sql)
            .bind(id)
            .bind(input.is_approved)
            .bind(input.is_public)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM testimonials WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_approval_filter() {
        assert_eq!(approval_filter(TestimonialFilter::Pending), Some(false));
        assert_eq!(approval_filter(TestimonialFilter::Approved), Some(true));
        assert_eq!(approval_filter(TestimonialFilter::All), None);
    }
}
