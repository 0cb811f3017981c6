//! Domain models for the dealership backend.

/// Declares a closed string enum stored as TEXT in the database.
///
/// Generates `as_str`, `Display`, `FromStr` (case-insensitive) and serde
/// (de)serialization using the given wire names.
macro_rules! text_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($(#[$vmeta:meta])* $variant:ident => $text:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Returns the string representation for database storage.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let lowered = s.trim().to_ascii_lowercase();
                $name::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str() == lowered)
                    .ok_or_else(|| {
                        format!(
                            "Invalid {}: {}. Must be one of: {}",
                            stringify!($name),
                            s,
                            $name::ALL
                                .iter()
                                .map(|v| v.as_str())
                                .collect::<Vec<_>>()
                                .join(", ")
                        )
                    })
            }
        }
    };
}

pub mod admin_notification;
pub mod api_response;
pub mod blog_post;
pub mod inventory_alert;
pub mod lead;
pub mod pricing_rule;
pub mod testimonial;
pub mod vehicle;

pub use admin_notification::{AdminNotification, NewAdminNotification, NotificationKind};
pub use api_response::ApiResponse;
pub use blog_post::{BlogPost, BlogPostSummary};
pub use inventory_alert::{AlertCriteria, AlertMatchOutcome, InventoryAlert};
pub use lead::{Contact, ContactMethod, InquiryType, LeadStatus, VehicleInquiry};
pub use pricing_rule::{AdjustmentKind, PricingConditions, PricingRule};
pub use testimonial::{Testimonial, TestimonialFilter};
pub use vehicle::{
    BodyType, FuelType, Transmission, Vehicle, VehicleFilters, VehicleSort, VehicleStatus,
};
