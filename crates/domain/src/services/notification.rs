//! Customer notifications for inventory alert matches.
//!
//! The domain builds the message; delivery (email, SMS) lives behind the
//! [`CustomerNotifier`] trait so the API layer can plug in real providers.

use serde::Serialize;
use uuid::Uuid;

use crate::models::inventory_alert::InventoryAlert;
use crate::models::vehicle::Vehicle;

/// Outcome of a single delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryResult {
    /// Handed off to the provider.
    Sent,
    /// Channel disabled or the customer has no address for it.
    Skipped,
    /// Provider rejected or was unreachable. Never fails the request.
    Failed(String),
}

impl DeliveryResult {
    pub fn is_sent(&self) -> bool {
        matches!(self, DeliveryResult::Sent)
    }
}

/// Rendered alert-match message for one customer.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AlertMatchMessage {
    pub alert_id: Uuid,
    pub vehicle_id: Uuid,
    pub to_email: String,
    pub to_phone: Option<String>,
    pub subject: String,
    pub body: String,
    pub sms_body: String,
}

impl AlertMatchMessage {
    /// Builds the message for `alert`. `site_base_url` has no trailing slash.
    pub fn build(
        alert: &InventoryAlert,
        vehicle: &Vehicle,
        dealership_name: &str,
        site_base_url: &str,
    ) -> Self {
        let url = format!(
            "{}/inventory/{}",
            site_base_url.trim_end_matches('/'),
            vehicle.id
        );
        let greeting = alert
            .name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .map(|n| format!("Hi {},", n.trim()))
            .unwrap_or_else(|| "Hi,".to_string());
        let unsubscribe = format!(
            "{}/inventory-alerts/unsubscribe/{}",
            site_base_url.trim_end_matches('/'),
            alert.id
        );

        let body = format!(
            "{greeting}\n\n\
             A vehicle matching your alert ({criteria}) just arrived at {dealer}:\n\n\
             {title}\n\
             Price: ${price}\n\
             Mileage: {mileage} miles\n\n\
             View it here: {url}\n\n\
             To stop receiving these alerts: {unsubscribe}\n",
            greeting = greeting,
            criteria = alert.criteria.describe(),
            dealer = dealership_name,
            title = vehicle.title(),
            price = vehicle.price,
            mileage = vehicle.mileage,
            url = url,
            unsubscribe = unsubscribe,
        );

        let sms_body = format!(
            "{}: {} now available for ${}. {}",
            dealership_name,
            vehicle.title(),
            vehicle.price,
            url
        );

        Self {
            alert_id: alert.id,
            vehicle_id: vehicle.id,
            to_email: alert.email.clone(),
            to_phone: alert.phone.clone().filter(|p| !p.trim().is_empty()),
            subject: format!("New arrival: {}", vehicle.title()),
            body,
            sms_body,
        }
    }
}

/// Delivers alert-match messages to customers.
#[async_trait::async_trait]
pub trait CustomerNotifier: Send + Sync {
    /// Sends the email copy of the message.
    async fn send_email(&self, message: &AlertMatchMessage) -> DeliveryResult;

    /// Sends the SMS copy. Implementations skip when there is no phone.
    async fn send_sms(&self, message: &AlertMatchMessage) -> DeliveryResult;
}

/// Notifier that only logs. Used in development and tests.
#[derive(Debug, Clone, Default)]
pub struct MockCustomerNotifier {
    /// Whether to simulate provider failures.
    pub simulate_failure: bool,
}

impl MockCustomerNotifier {
    pub fn new() -> Self {
        Self {
            simulate_failure: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            simulate_failure: true,
        }
    }
}

#[async_trait::async_trait]
impl CustomerNotifier for MockCustomerNotifier {
    async fn send_email(&self, message: &AlertMatchMessage) -> DeliveryResult {
        if self.simulate_failure {
            tracing::warn!(alert_id = %message.alert_id, "Mock notifier simulating email failure");
            return DeliveryResult::Failed("Simulated failure".to_string());
        }
        tracing::info!(
            alert_id = %message.alert_id,
            vehicle_id = %message.vehicle_id,
            subject = %message.subject,
            "Mock: Would send alert match email"
        );
        DeliveryResult::Sent
    }

    async fn send_sms(&self, message: &AlertMatchMessage) -> DeliveryResult {
        if message.to_phone.is_none() {
            return DeliveryResult::Skipped;
        }
        if self.simulate_failure {
            return DeliveryResult::Failed("Simulated failure".to_string());
        }
        tracing::info!(alert_id = %message.alert_id, "Mock: Would send alert match SMS");
        DeliveryResult::Sent
    }
}
