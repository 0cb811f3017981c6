//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod admin_notification;
pub mod admin_api_key;
pub mod blog_post;
pub mod inventory_alert;
pub mod lead;
pub mod pricing_rule;
pub mod testimonial;
pub mod vehicle;

pub use admin_notification::AdminNotificationEntity;
pub use admin_api_key::AdminApiKeyEntity;
pub use blog_post::BlogPostEntity;
pub use inventory_alert::InventoryAlertEntity;
pub use lead::{ContactEntity, InquiryEntity};
pub use pricing_rule::PricingRuleEntity;
pub use testimonial::{RatingSummaryEntity, TestimonialEntity};
pub use vehicle::{MakeCountEntity, VehicleEntity};
