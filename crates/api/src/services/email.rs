//! Email delivery for lead notifications and inventory alert matches.
//!
//! Providers:
//! - `console`: logs the message (development)
//! - `sendgrid`: SendGrid v3 HTTP API
//!
//! A disabled service accepts and drops every message.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, error, info};

use domain::models::{Contact, Vehicle, VehicleInquiry};
use domain::services::AlertMatchMessage;

use crate::config::EmailConfig;

const SENDGRID_URL: &str = "https://api.sendgrid.com/v3/mail/send";

#[derive(Debug, Error)]
pub enum EmailError {
    #[error("Email service not configured")]
    NotConfigured,

    #[error("Unknown email provider: {0}")]
    UnknownProvider(String),

    #[error("Failed to send email: {0}")]
    SendFailed(String),

    #[error("Provider error: {0}")]
    ProviderError(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub to_name: Option<String>,
    pub subject: String,
    pub body_text: String,
    /// Address replies should go to, e.g. the customer on a lead notification.
    pub reply_to: Option<String>,
}

#[derive(Clone)]
pub struct EmailService {
    config: Arc<EmailConfig>,
    client: reqwest::Client,
}

impl EmailService {
    pub fn new(config: EmailConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Falling back to default HTTP client for email");
                reqwest::Client::new()
            });
        Self {
            config: Arc::new(config),
            client,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Enabled and has the credentials its provider needs.
    pub fn is_configured(&self) -> bool {
        self.config.enabled
            && match self.config.provider.as_str() {
                "console" => true,
                "sendgrid" => !self.config.sendgrid_api_key.is_empty(),
                _ => false,
            }
    }

    pub fn provider(&self) -> &str {
        &self.config.provider
    }

    pub async fn send(&self, message: EmailMessage) -> Result<(), EmailError> {
        if !self.config.enabled {
            debug!(
                to = %message.to,
                subject = %message.subject,
                "Email service disabled, skipping send"
            );
            return Ok(());
        }

        match self.config.provider.as_str() {
            "console" => {
                self.send_console(&message);
                Ok(())
            }
            "sendgrid" => self.send_sendgrid(&message).await,
            provider => {
                error!(provider = %provider, "Unknown email provider");
                Err(EmailError::UnknownProvider(provider.to_string()))
            }
        }
    }

    fn send_console(&self, message: &EmailMessage) {
        info!(
            to = %message.to,
            to_name = ?message.to_name,
            reply_to = ?message.reply_to,
            subject = %message.subject,
            from = %self.config.sender_email,
            "Email (console provider)"
        );
        debug!(body_text = %message.body_text, "Email body");
    }

    async fn send_sendgrid(&self, message: &EmailMessage) -> Result<(), EmailError> {
        if self.config.sendgrid_api_key.is_empty() {
            return Err(EmailError::NotConfigured);
        }

        let body = sendgrid_payload(&self.config, message);

        let response = self
            .client
            .post(SENDGRID_URL)
            .bearer_auth(&self.config.sendgrid_api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| EmailError::SendFailed(format!("SendGrid request failed: {}", e)))?;

        if response.status().is_success() {
            info!(to = %message.to, subject = %message.subject, "Email sent via SendGrid");
            Ok(())
        } else {
            let status = response.status();
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, error = %error_body, "SendGrid API error");
            Err(EmailError::ProviderError(format!(
                "SendGrid returned {}: {}",
                status, error_body
            )))
        }
    }
}

fn sendgrid_payload(config: &EmailConfig, message: &EmailMessage) -> serde_json::Value {
    let mut to = serde_json::json!({ "email": message.to });
    if let Some(name) = &message.to_name {
        to["name"] = serde_json::json!(name);
    }

    let mut body = serde_json::json!({
        "personalizations": [{ "to": [to] }],
        "from": {
            "email": config.sender_email,
            "name": config.sender_name
        },
        "subject": message.subject,
        "content": [{
            "type": "text/plain",
            "value": message.body_text
        }]
    });

    if let Some(reply_to) = &message.reply_to {
        body["reply_to"] = serde_json::json!({ "email": reply_to });
    }
    body
}

/// Dealership-facing notice for a new contact form submission.
pub fn contact_notification(contact: &Contact, to: &str) -> EmailMessage {
    let subject = contact
        .subject
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or("General enquiry");

    let body_text = format!(
        "New contact form submission\n\n\
         Name: {name}\n\
         Email: {email}\n\
         Phone: {phone}\n\
         Preferred contact: {method}\n\
         Subject: {subject}\n\n\
         {message}\n",
        name = contact.name,
        email = contact.email,
        phone = contact.phone.as_deref().unwrap_or("-"),
        method = contact.preferred_contact,
        subject = subject,
        message = contact.message,
    );

    EmailMessage {
        to: to.to_string(),
        to_name: None,
        subject: format!("New lead: {} - {}", contact.name, subject),
        body_text,
        reply_to: Some(contact.email.clone()),
    }
}

/// Dealership-facing notice for a vehicle inquiry.
pub fn inquiry_notification(inquiry: &VehicleInquiry, vehicle: &Vehicle, to: &str) -> EmailMessage {
    let preferred = inquiry
        .preferred_date
        .map(|d| d.to_string())
        .unwrap_or_else(|| "-".to_string());

    let body_text = format!(
        "New {kind} inquiry\n\n\
         Vehicle: {title} (stock {stock})\n\
         Price: ${price}\n\n\
         Name: {name}\n\
         Email: {email}\n\
         Phone: {phone}\n\
         Preferred date: {preferred}\n\n\
         {message}\n",
        kind = inquiry.inquiry_type,
        title = vehicle.title(),
        stock = vehicle.stock_number,
        price = vehicle.price,
        name = inquiry.name,
        email = inquiry.email,
        phone = inquiry.phone.as_deref().unwrap_or("-"),
        preferred = preferred,
        message = inquiry.message.as_deref().unwrap_or(""),
    );

    EmailMessage {
        to: to.to_string(),
        to_name: None,
        subject: format!("{} inquiry: {}", inquiry.inquiry_type, vehicle.title()),
        body_text,
        reply_to: Some(inquiry.email.clone()),
    }
}

impl From<&AlertMatchMessage> for EmailMessage {
    fn from(message: &AlertMatchMessage) -> Self {
        EmailMessage {
            to: message.to_email.clone(),
            to_name: None,
            subject: message.subject.clone(),
            body_text: message.body.clone(),
            reply_to: None,
        }
    }
}
