//! Testimonial entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the testimonials table.
#[derive(Debug, Clone, FromRow)]
pub struct TestimonialEntity {
    pub id: Uuid,
    pub customer_name: String,
    pub location: Option<String>,
    pub rating: i32,
    pub content: String,
    pub vehicle_purchased: Option<String>,
    pub is_approved: bool,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<TestimonialEntity> for domain::models::Testimonial {
    fn from(e: TestimonialEntity) -> Self {
        domain::models::Testimonial {
            id: e.id,
            customer_name: e.customer_name,
            location: e.location,
            rating: e.rating,
            content: e.content,
            vehicle_purchased: e.vehicle_purchased,
            is_approved: e.is_approved,
            is_public: e.is_public,
            created_at: e.created_at,
            updated_at: e.updated_at,
        }
    }
}

/// Average rating row.
#[derive(Debug, Clone, FromRow)]
pub struct RatingSummaryEntity {
    pub average: Option<f64>,
    pub count: i64,
}

impl From<RatingSummaryEntity> for domain::models::testimonial::RatingSummary {
    /// Average rounded to one decimal; 0.0 when there are no reviews.
    fn from(e: RatingSummaryEntity) -> Self {
        let average = e.average.map(|a| (a * 10.0).round() / 10.0).unwrap_or(0.0);
        domain::models::testimonial::RatingSummary {
            average,
            count: e.count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::models::testimonial::RatingSummary;

    #[test]
    fn test_rating_summary_rounds_and_defaults() {
        let summary = RatingSummary::from(RatingSummaryEntity {
            average: Some(4.666),
            count: 3,
        });
        assert_eq!(summary.average, 4.7);
        assert_eq!(summary.count, 3);

        let empty = RatingSummary::from(RatingSummaryEntity {
            average: None,
            count: 0,
        });
        assert_eq!(empty.average, 0.0);
    }
}
