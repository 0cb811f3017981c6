//! Repository implementations for database operations.

pub mod admin_notification;
pub mod admin_api_key;
pub mod blog_post;
pub mod inventory_alert;
pub mod lead;
pub mod pricing_rule;
pub mod testimonial;
pub mod vehicle;

pub use admin_notification::AdminNotificationRepository;
pub use admin_api_key::AdminApiKeyRepository;
pub use blog_post::{BlogPostInput, BlogPostPatch, BlogPostRepository};
pub use inventory_alert::{InventoryAlertRepository, RecordedMatches};
pub use lead::{ContactRepository, InquiryRepository};
pub use pricing_rule::PricingRuleRepository;
pub use testimonial::TestimonialRepository;
pub use vehicle::{VehicleListParams, VehicleRepository};
