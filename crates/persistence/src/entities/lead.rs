//! Contact and vehicle inquiry entities (database row mappings).

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::lead::{ContactMethod, InquiryType, LeadStatus};

/// Database row mapping for the contacts table.
#[derive(Debug, Clone, FromRow)]
pub struct ContactEntity {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: Option<String>,
    pub message: String,
    pub preferred_contact: String,
    pub vehicle_id: Option<Uuid>,
    pub status: String,
    pub admin_notes: Option<String>,
    pub source_ip: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ContactEntity {
    pub fn into_domain(self) -> domain::models::Contact {
        domain::models::Contact {
            id: self.id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            subject: self.subject,
            message: self.message,
            preferred_contact: self
                .preferred_contact
                .parse()
                .unwrap_or(ContactMethod::Email),
            vehicle_id: self.vehicle_id,
            status: self.status.parse().unwrap_or(LeadStatus::New),
            admin_notes: self.admin_notes,
            source_ip: self.source_ip,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl From<ContactEntity> for domain::models::Contact {
    fn from(entity: ContactEntity) -> Self {
        entity.into_domain()
    }
}

/// Database row mapping for the vehicle_inquiries table.
#[derive(Debug, Clone, FromRow)]
pub struct InquiryEntity {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub inquiry_type: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: Option<String>,
    pub preferred_date: Option<NaiveDate>,
    pub status: String,
    pub admin_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InquiryEntity {
    pub fn into_domain(self) -> domain::models::VehicleInquiry {
        domain::models::VehicleInquiry {
            id: self.id,
            vehicle_id: self.vehicle_id,
            inquiry_type: self.inquiry_type.parse().unwrap_or(InquiryType::General),
            name: self.name,
            email: self.email,
            phone: self.phone,
            message: self.message,
            preferred_date: self.preferred_date,
            status: self.status.parse().unwrap_or(LeadStatus::New),
            admin_notes: self.admin_notes,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl From<InquiryEntity> for domain::models::VehicleInquiry {
    fn from(entity: InquiryEntity) -> Self {
        entity.into_domain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inquiry_entity_to_domain() {
        let entity = InquiryEntity {
            id: Uuid::new_v4(),
            vehicle_id: Uuid::new_v4(),
            inquiry_type: "trade_in".to_string(),
            name: "Lee".to_string(),
            email: "lee@example.com".to_string(),
            phone: None,
            message: Some("What's my Civic worth?".to_string()),
            preferred_date: None,
            status: "contacted".to_string(),
            admin_notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let inquiry: domain::models::VehicleInquiry = entity.into();
        assert_eq!(inquiry.inquiry_type, InquiryType::TradeIn);
        assert_eq!(inquiry.status, LeadStatus::Contacted);
    }

    #[test]
    fn test_contact_entity_falls_back_on_unknown_values() {
        let entity = ContactEntity {
            id: Uuid::new_v4(),
            name: "Lee".to_string(),
            email: "lee@example.com".to_string(),
            phone: None,
            subject: None,
            message: "Hello".to_string(),
            preferred_contact: "pigeon".to_string(),
            vehicle_id: None,
            status: "???".to_string(),
            admin_notes: None,
            source_ip: Some("198.51.100.4".to_string()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let contact = entity.into_domain();
        assert_eq!(contact.preferred_contact, ContactMethod::Email);
        assert_eq!(contact.status, LeadStatus::New);
        assert_eq!(contact.source_ip.as_deref(), Some("198.51.100.4"));
    }
}
