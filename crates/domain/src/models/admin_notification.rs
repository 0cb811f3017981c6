//! Back-office notification model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use super::inventory_alert::AlertMatchOutcome;
use super::lead::{Contact, VehicleInquiry};
use super::testimonial::Testimonial;
use super::vehicle::Vehicle;

text_enum! {
    /// What triggered an admin notification.
    NotificationKind {
        NewContact => "new_contact",
        NewInquiry => "new_inquiry",
        NewTestimonial => "new_testimonial",
        AlertMatch => "alert_match",
        System => "system",
    }
}

/// A notification shown in the admin dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminNotification {
    pub id: Uuid,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    /// Relative admin URL to the related record, if any.
    pub link: Option<String>,
    /// Structured context for the dashboard (ids, counts).
    pub data: Option<serde_json::Value>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
}

/// A notification to insert.
#[derive(Debug, Clone, PartialEq, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewAdminNotification {
    #[serde(default = "default_kind")]
    pub kind: NotificationKind,

    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    #[validate(length(min = 1, max = 2000, message = "Message must be 1-2000 characters"))]
    pub message: String,

    #[validate(length(max = 500, message = "Link must be at most 500 characters"))]
    pub link: Option<String>,

    pub data: Option<serde_json::Value>,
}

fn default_kind() -> NotificationKind {
    NotificationKind::System
}

impl NewAdminNotification {
    pub fn new_contact(contact: &Contact) -> Self {
        let subject = contact
            .subject
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or("General enquiry");
        Self {
            kind: NotificationKind::NewContact,
            title: format!("New contact from {}", contact.name),
            message: format!("{} ({})", subject, contact.email),
            link: Some(format!("/admin/contacts/{}", contact.id)),
            data: Some(json!({ "contactId": contact.id, "vehicleId": contact.vehicle_id })),
        }
    }

    pub fn new_inquiry(inquiry: &VehicleInquiry, vehicle: &Vehicle) -> Self {
        let label = match inquiry.inquiry_type {
            super::lead::InquiryType::TestDrive => "Test drive request",
            super::lead::InquiryType::Financing => "Financing inquiry",
            super::lead::InquiryType::TradeIn => "Trade-in inquiry",
            super::lead::InquiryType::General => "Vehicle inquiry",
        };
        let when = inquiry
            .preferred_date
            .map(|d| format!(" for {}", d))
            .unwrap_or_default();
        Self {
            kind: NotificationKind::NewInquiry,
            title: format!("{}: {}", label, vehicle.title()),
            message: format!("{} ({}){}", inquiry.name, inquiry.email, when),
            link: Some(format!("/admin/inquiries/{}", inquiry.id)),
            data: Some(json!({
                "inquiryId": inquiry.id,
                "vehicleId": vehicle.id,
                "inquiryType": inquiry.inquiry_type,
            })),
        }
    }

    pub fn new_testimonial(testimonial: &Testimonial) -> Self {
        Self {
            kind: NotificationKind::NewTestimonial,
            title: format!("New {}-star review awaiting approval", testimonial.rating),
            message: format!("Submitted by {}", testimonial.customer_name),
            link: Some(format!("/admin/testimonials/{}", testimonial.id)),
            data: Some(json!({ "testimonialId": testimonial.id, "rating": testimonial.rating })),
        }
    }

    pub fn alert_match(vehicle: &Vehicle, outcome: &AlertMatchOutcome) -> Self {
        Self {
            kind: NotificationKind::AlertMatch,
            title: format!("{} matched inventory alerts", vehicle.title()),
            message: format!(
                "{} alert(s) matched, {} customer(s) notified",
                outcome.matched_alerts, outcome.notifications_created
            ),
            link: Some(format!("/admin/vehicles/{}", vehicle.id)),
            data: Some(serde_json::to_value(outcome).unwrap_or_default()),
        }
    }
}

/// Query parameters for listing notifications.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListNotificationsQuery {
    #[serde(default)]
    pub unread: bool,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Response for bulk mark-as-read.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkAllReadResponse {
    pub updated: u64,
}

/// Unread badge count.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnreadCount {
    pub unread: i64,
}
