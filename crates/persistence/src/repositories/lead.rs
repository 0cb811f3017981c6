//! Contact and vehicle inquiry repositories.

use sqlx::PgPool;
use uuid::Uuid;

use domain::models::lead::{
    CreateContactRequest, CreateInquiryRequest, LeadStatus, UpdateLeadRequest,
};
use shared::pagination::PageRequest;

use crate::entities::{ContactEntity, InquiryEntity};
use crate::metrics::QueryTimer;

const CONTACT_COLUMNS: &str = "id, name, email, phone, subject, message, preferred_contact, \
     vehicle_id, status, admin_notes, source_ip, created_at, updated_at";

const INQUIRY_COLUMNS: &str = "id, vehicle_id, inquiry_type, name, email, phone, message, \
     preferred_date, status, admin_notes, created_at, updated_at";

/// Repository for contact-form leads.
#[derive(Clone)]
pub struct ContactRepository {
    pool: PgPool,
}

impl ContactRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        input: &CreateContactRequest,
        source_ip: Option<&str>,
    ) -> Result<ContactEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_contact");
        let sql = format!(
            r#"
            INSERT INTO contacts (
                name, email, phone, subject, message, preferred_contact, vehicle_id, source_ip
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            CONTACT_COLUMNS
        );
        let result = sqlx::query_as::<_, ContactEntity>(&sql)
            .bind(input.name.trim())
            .bind(input.email.trim())
            .bind(input.phone.as_deref().map(str::trim))
            .bind(input.subject.as_deref().map(str::trim))
            .bind(&input.message)
            .bind(input.preferred_contact.as_str())
            .bind(input.vehicle_id)
            .bind(source_ip)
            .fetch_one(&self.pool)
            .await;
        timer.record();
        result
    }

    /// Newest first, optionally filtered by status.
    pub async fn list(
        &self,
        status: Option<LeadStatus>,
        page: PageRequest,
    ) -> Result<(Vec<ContactEntity>, i64), sqlx::Error> {
        let timer = QueryTimer::new("list_contacts");
        let status = status.map(|s| s.as_str());

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM contacts WHERE ($1::text IS NULL OR status = $1)",
        )
        .bind(status)
        .fetch_one(&self.pool)
        .await?;

        let sql = format!(
            r#"
            SELECT {} FROM contacts
            WHERE ($1::text IS NULL OR status = $1)
            ORDER BY created_at DESC, id
            LIMIT $2 OFFSET $3
            "#,
            CONTACT_COLUMNS
        );
        let rows = sqlx::query_as::<_, ContactEntity>(&sql)
            .bind(status)
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

        timer.record();
        Ok((rows, total))
    }

    pub async fn update(
        &self,
        id: Uuid,
        input: &UpdateLeadRequest,
    ) -> Result<Option<ContactEntity>, sqlx::Error> {
        let sql = format!(
            r#"
            UPDATE contacts SET
                status = COALESCE($2, status),
                admin_notes = COALESCE($3, admin_notes)
            WHERE id = $1
            RETURNING {}
            "#,
            CONTACT_COLUMNS
        );
        sqlx::query_as::<_, ContactEntity>(&sql)
            .bind(id)
            .bind(input.status.map(|s| s.as_str()))
            .bind(input.admin_notes.as_deref())
            .fetch_optional(&self.pool)
            .await
    }
}

/// Repository for vehicle inquiries.
#[derive(Clone)]
pub struct InquiryRepository {
    pool: PgPool,
}

impl InquiryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        vehicle_id: Uuid,
        input: &CreateInquiryRequest,
    ) -> Result<InquiryEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_inquiry");
        let sql = format!(
            r#"
            INSERT INTO vehicle_inquiries (
                vehicle_id, inquiry_type, name, email, phone, message, preferred_date
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            INQUIRY_COLUMNS
        );
        let result = sqlx::query_as::<_, InquiryEntity>(&sql)
            .bind(vehicle_id)
            .bind(input.inquiry_type.as_str())
            .bind(input.name.trim())
            .bind(input.email.trim())
            .bind(input.phone.as_deref().map(str::trim))
            .bind(input.message.as_deref())
            .bind(input.preferred_date)
            .fetch_one(&self.pool)
            .await;
        timer.record();
        result
    }

    pub async fn list(
        &self,
        status: Option<LeadStatus>,
        vehicle_id: Option<Uuid>,
        page: PageRequest,
    ) -> Result<(Vec<InquiryEntity>, i64), sqlx::Error> {
        let timer = QueryTimer::new("list_inquiries");
        let status = status.map(|s| s.as_str());

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM vehicle_inquiries
            WHERE ($1::text IS NULL OR status = $1)
              AND ($2::uuid IS NULL OR vehicle_id = $2)
            "#,
        )
        .bind(status)
        .bind(vehicle_id)
        .fetch_one(&self.pool)
        .await?;

        let sql = format!(
            r#"
            SELECT {} FROM vehicle_inquiries
            WHERE ($1::text IS NULL OR status = $1)
              AND ($2::uuid IS NULL OR vehicle_id = $2)
            ORDER BY created_at DESC, id
            LIMIT $3 OFFSET $4
            "#,
            INQUIRY_COLUMNS
        );
        let rows = sqlx::query_as::<_, InquiryEntity>(&sql)
            .bind(status)
            .bind(vehicle_id)
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

        timer.record();
        Ok((rows, total))
    }

    pub async fn update(
        &self,
        id: Uuid,
        input: &UpdateLeadRequest,
    ) -> Result<Option<InquiryEntity>, sqlx::Error> {
        let sql = format!(
            r#"
            UPDATE vehicle_inquiries SET
                status = COALESCE($2, status),
                admin_notes = COALESCE($3, admin_notes)
            WHERE id = $1
            RETURNING {}
            "#,
            INQUIRY_COLUMNS
        );
        sqlx::query_as::<_, InquiryEntity>(&sql)
            .bind(id)
            .bind(input.status.map(|s| s.as_str()))
            .bind(input.admin_notes.as_deref())
            .fetch_optional(&self.pool)
            .await
    }
}
