//! SMS delivery through the Twilio REST API.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, error, info};

use domain::models::{Vehicle, VehicleInquiry};

use crate::config::SmsConfig;

const TWILIO_API_BASE: &str = "https://api.twilio.com/2010-04-01";

/// Twilio rejects bodies longer than this.
const MAX_SMS_CHARS: usize = 1600;

#[derive(Debug, Error)]
pub enum SmsError {
    #[error("SMS service not configured")]
    NotConfigured,

    #[error("Failed to send SMS: {0}")]
    SendFailed(String),

    #[error("Provider error: {0}")]
    ProviderError(String),
}

#[derive(Clone)]
pub struct SmsService {
    config: Arc<SmsConfig>,
    client: reqwest::Client,
}

impl SmsService {
    pub fn new(config: SmsConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Falling back to default HTTP client for SMS");
                reqwest::Client::new()
            });
        Self {
            config: Arc::new(config),
            client,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.config.enabled
            && !self.config.twilio_account_sid.is_empty()
            && !self.config.twilio_auth_token.is_empty()
            && !self.config.from_number.is_empty()
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/Accounts/{}/Messages.json",
            TWILIO_API_BASE, self.config.twilio_account_sid
        )
    }

    pub async fn send(&self, to: &str, body: &str) -> Result<(), SmsError> {
        if !self.is_configured() {
            debug!(to = %to, "SMS not configured, skipping send");
            return Err(SmsError::NotConfigured);
        }

        let body = truncate_body(body);
        let form = [
            ("To", to),
            ("From", self.config.from_number.as_str()),
            ("Body", body.as_str()),
        ];

        let response = self
            .client
            .post(self.messages_url())
            .basic_auth(
                &self.config.twilio_account_sid,
                Some(&self.config.twilio_auth_token),
            )
            .form(&form)
            .send()
            .await
            .map_err(|e| SmsError::SendFailed(format!("Twilio request failed: {}", e)))?;

        if response.status().is_success() {
            info!(to = %to, "SMS sent via Twilio");
            Ok(())
        } else {
            let status = response.status();
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, error = %error_body, "Twilio API error");
            Err(SmsError::ProviderError(format!(
                "Twilio returned {}: {}",
                status, error_body
            )))
        }
    }
}

fn truncate_body(body: &str) -> String {
    if body.chars().count() <= MAX_SMS_CHARS {
        return body.to_string();
    }
    let mut cut: String = body.chars().take(MAX_SMS_CHARS - 1).collect();
    cut.push('…');
    cut
}

/// Short text for the sales line about a new inquiry.
pub fn inquiry_sms(inquiry: &VehicleInquiry, vehicle: &Vehicle) -> String {
    let phone = inquiry
        .phone
        .as_deref()
        .map(|p| format!(", {}", p))
        .unwrap_or_default();
    let when = inquiry
        .preferred_date
        .map(|d| format!(" on {}", d))
        .unwrap_or_default();
    format!(
        "New {} inquiry{}: {} (stock {}) from {}{}",
        inquiry.inquiry_type,
        when,
        vehicle.title(),
        vehicle.stock_number,
        inquiry.name,
        phone
    )
}
