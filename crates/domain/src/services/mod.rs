//! Domain services for the dealership backend.
//!
//! Services contain business logic that operates on domain models.

pub mod catalog;
pub mod notification;
pub mod pricing;

pub use catalog::similar_price_range;
pub use notification::{AlertMatchMessage, CustomerNotifier, DeliveryResult, MockCustomerNotifier};
pub use pricing::{apply_pricing_rules, AppliedRule, PricePreview};
