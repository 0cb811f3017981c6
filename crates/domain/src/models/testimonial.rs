//! Testimonial domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A customer review. New submissions wait for admin approval.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Testimonial {
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

impl Testimonial {
    /// Shown on the public site only when approved and public.
    pub fn is_visible(&self) -> bool {
        self.is_approved && self.is_public
    }
}

/// Request payload for submitting a testimonial.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTestimonialRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub customer_name: String,

    #[validate(length(max = 100, message = "Location must be at most 100 characters"))]
    pub location: Option<String>,

    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i32,

    #[validate(length(min = 20, max = 2000, message = "Review must be 20-2000 characters"))]
    pub content: String,

    #[validate(length(max = 100, message = "Vehicle must be at most 100 characters"))]
    pub vehicle_purchased: Option<String>,

    /// Customer consent to show the review publicly.
    #[serde(default = "default_public")]
    pub is_public: bool,
}

fn default_public() -> bool {
    true
}

/// Admin moderation (partial update).
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ModerateTestimonialRequest {
    pub is_approved: Option<bool>,
    pub is_public: Option<bool>,
}

/// Filter for the admin testimonial listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestimonialFilter {
    #[default]
    Pending,
    Approved,
    All,
}

/// Query parameters for the admin testimonial listing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTestimonialsQuery {
    #[serde(default)]
    pub status: TestimonialFilter,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Average rating across visible testimonials.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RatingSummary {
    pub average: f64,
    pub count: i64,
}
