//! Lead capture (contact form, vehicle inquiries) and admin follow-up.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use domain::models::lead::{
    CreateContactRequest, CreateInquiryRequest, ListLeadsQuery, UpdateLeadRequest,
};
use domain::models::{ApiResponse, Contact, Vehicle, VehicleInquiry};
use persistence::repositories::{ContactRepository, InquiryRepository, VehicleRepository};
use shared::pagination::PageMeta;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{ClientIp, ValidatedJson};
use crate::middleware::metrics::record_lead_created;

/// POST /api/contact
///
/// Rate limited per client IP by the route layer.
pub async fn submit_contact(
    State(state): State<AppState>,
    client_ip: ClientIp,
    ValidatedJson(request): ValidatedJson<CreateContactRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Contact>>), ApiError> {
    request
        .check_contact_method()
        .map_err(|msg| ApiError::field("phone", msg))?;

    let source_ip = client_ip.is_known().then_some(client_ip.0.as_str());
    let contact = Contact::from(
        ContactRepository::new(state.pool.clone())
            .create(&request, source_ip)
            .await?,
    );

    info!(
        contact_id = %contact.id,
        preferred_contact = %contact.preferred_contact,
        "Contact form submitted"
    );
    record_lead_created("contact");
    state.leads.new_contact(&contact).await;

    Ok((
        StatusCode::CREATED,
        Json(
            ApiResponse::ok(contact)
                .with_message("Thanks for reaching out. We'll be in touch shortly."),
        ),
    ))
}

/// POST /api/vehicles/:id/inquiries
pub async fn submit_inquiry(
    State(state): State<AppState>,
    Path(vehicle_id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<CreateInquiryRequest>,
) -> Result<(StatusCode, Json<ApiResponse<VehicleInquiry>>), ApiError> {
    let vehicle = VehicleRepository::new(state.pool.clone())
        .find_by_id(vehicle_id)
        .await?
        .map(Vehicle::from)
        .ok_or_else(|| ApiError::NotFound("Vehicle not found".to_string()))?;

    request
        .check_schedule(Utc::now().date_naive())
        .map_err(|msg| ApiError::field("preferredDate", msg))?;

    let inquiry = VehicleInquiry::from(
        InquiryRepository::new(state.pool.clone())
            .create(vehicle.id, &request)
            .await?,
    );

    info!(
        inquiry_id = %inquiry.id,
        vehicle_id = %vehicle.id,
        inquiry_type = %inquiry.inquiry_type,
        "Vehicle inquiry submitted"
    );
    record_lead_created("inquiry");
    state.leads.new_inquiry(&inquiry, &vehicle).await;

    Ok((
        StatusCode::CREATED,
        Json(
            ApiResponse::ok(inquiry)
                .with_message("Thanks! Our sales team will contact you about this vehicle."),
        ),
    ))
}

/// GET /api/admin/contacts
pub async fn list_contacts(
    State(state): State<AppState>,
    Query(query): Query<ListLeadsQuery>,
) -> Result<Json<ApiResponse<Vec<Contact>>>, ApiError> {
    let page = state.page(query.page, query.limit);
    let (rows, total) = ContactRepository::new(state.pool.clone())
        .list(query.status, page)
        .await?;

    Ok(Json(ApiResponse::paginated(
        rows.into_iter().map(Contact::from).collect(),
        PageMeta::new(page, total),
    )))
}

/// PATCH /api/admin/contacts/:id
pub async fn update_contact(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateLeadRequest>,
) -> Result<Json<ApiResponse<Contact>>, ApiError> {
    let contact = ContactRepository::new(state.pool.clone())
        .update(id, &request)
        .await?
        .map(Contact::from)
        .ok_or_else(|| ApiError::NotFound("Contact not found".to_string()))?;

    info!(contact_id = %contact.id, status = %contact.status, "Contact updated");
    Ok(Json(ApiResponse::ok(contact)))
}

/// GET /api/admin/inquiries
pub async fn list_inquiries(
    State(state): State<AppState>,
    Query(query): Query<ListLeadsQuery>,
) -> Result<Json<ApiResponse<Vec<VehicleInquiry>>>, ApiError> {
    let page = state.page(query.page, query.limit);
    let (rows, total) = InquiryRepository::new(state.pool.clone())
        .list(query.status, query.vehicle_id, page)
        .await?;

    Ok(Json(ApiResponse::paginated(
        rows.into_iter().map(VehicleInquiry::from).collect(),
        PageMeta::new(page, total),
    )))
}

/// PATCH /api/admin/inquiries/:id
pub async fn update_inquiry(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateLeadRequest>,
) -> Result<Json<ApiResponse<VehicleInquiry>>, ApiError> {
    let inquiry = InquiryRepository::new(state.pool.clone())
        .update(id, &request)
        .await?
        .map(VehicleInquiry::from)
        .ok_or_else(|| ApiError::NotFound("Inquiry not found".to_string()))?;

    info!(inquiry_id = %inquiry.id, status = %inquiry.status, "Inquiry updated");
    Ok(Json(ApiResponse::ok(inquiry)))
}
