//! Lead domain models: contact form submissions and vehicle inquiries.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

text_enum! {
    /// Follow-up status of a lead, moved forward by admin action.
    LeadStatus {
        New => "new",
        Contacted => "contacted",
        Scheduled => "scheduled",
        Completed => "completed",
        Closed => "closed",
    }
}

impl LeadStatus {
    /// Whether the lead still needs attention from sales staff.
    pub fn is_open(&self) -> bool {
        matches!(
            self,
            LeadStatus::New | LeadStatus::Contacted | LeadStatus::Scheduled
        )
    }
}

text_enum! {
    /// How the customer prefers to be reached.
    ContactMethod {
        Email => "email",
        Phone => "phone",
        Text => "text",
    }
}

text_enum! {
    /// Kind of vehicle inquiry.
    InquiryType {
        General => "general",
        TestDrive => "test_drive",
        Financing => "financing",
        TradeIn => "trade_in",
    }
}

/// A contact-form lead.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: Option<String>,
    pub message: String,
    pub preferred_contact: ContactMethod,
    pub vehicle_id: Option<Uuid>,
    pub status: LeadStatus,
    pub admin_notes: Option<String>,
    #[serde(skip_serializing)]
    pub source_ip: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A lead tied to a specific vehicle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleInquiry {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub inquiry_type: InquiryType,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: Option<String>,
    pub preferred_date: Option<NaiveDate>,
    pub status: LeadStatus,
    pub admin_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Contact form submission.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateContactRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,

    #[validate(custom(function = "shared::validation::validate_phone"))]
    pub phone: Option<String>,

    #[validate(length(max = 200, message = "Subject must be at most 200 characters"))]
    pub subject: Option<String>,

    #[validate(length(min = 10, max = 5000, message = "Message must be 10-5000 characters"))]
    pub message: String,

    #[serde(default = "default_contact_method")]
    pub preferred_contact: ContactMethod,

    pub vehicle_id: Option<Uuid>,
}

fn default_contact_method() -> ContactMethod {
    ContactMethod::Email
}

impl CreateContactRequest {
    /// Phone/text contact requires a phone number.
    pub fn check_contact_method(&self) -> Result<(), String> {
        let needs_phone = matches!(
            self.preferred_contact,
            ContactMethod::Phone | ContactMethod::Text
        );
        if needs_phone && self.phone.as_deref().map(str::trim).unwrap_or("").is_empty() {
            return Err("A phone number is required for phone or text contact".to_string());
        }
        Ok(())
    }
}

/// Vehicle inquiry submission (`POST /api/vehicles/:id/inquiries`).
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateInquiryRequest {
    #[serde(default = "default_inquiry_type")]
    pub inquiry_type: InquiryType,

    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,

    #[validate(custom(function = "shared::validation::validate_phone"))]
    pub phone: Option<String>,

    #[validate(length(max = 5000, message = "Message must be at most 5000 characters"))]
    pub message: Option<String>,

    pub preferred_date: Option<NaiveDate>,
}

fn default_inquiry_type() -> InquiryType {
    InquiryType::General
}

impl CreateInquiryRequest {
    /// Test drives need a preferred date that is not in the past.
    pub fn check_schedule(&self, today: NaiveDate) -> Result<(), String> {
        match (self.inquiry_type, self.preferred_date) {
            (InquiryType::TestDrive, None) => {
                Err("A preferred date is required for test drive requests".to_string())
            }
            (_, Some(date)) if date < today => {
                Err("Preferred date cannot be in the past".to_string())
            }
            _ => Ok(()),
        }
    }
}

/// Admin status update for a contact or inquiry.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLeadRequest {
    pub status: Option<LeadStatus>,

    #[validate(length(max = 5000, message = "Notes must be at most 5000 characters"))]
    pub admin_notes: Option<String>,
}

/// Query parameters for admin lead listings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListLeadsQuery {
    pub status: Option<LeadStatus>,
    /// Inquiries only.
    pub vehicle_id: Option<Uuid>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}
