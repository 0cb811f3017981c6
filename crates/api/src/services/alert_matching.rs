//! Runs the inventory alert matcher for a vehicle and fans out notifications.
//!
//! Matching and recording happen in the database (one transaction per
//! vehicle). Customer deliveries run afterwards on spawned tasks, so a slow
//! or failing provider never holds up the admin request that triggered it.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;

use domain::models::{AlertMatchOutcome, InventoryAlert, NewAdminNotification, Vehicle};
use domain::services::{AlertMatchMessage, CustomerNotifier, DeliveryResult};
use persistence::repositories::{AdminNotificationRepository, InventoryAlertRepository};

use crate::middleware::metrics::{record_alert_matches, record_delivery};
use crate::services::email::{EmailError, EmailMessage, EmailService};
use crate::services::sms::{SmsError, SmsService};

/// Real-provider notifier: email through [`EmailService`], SMS through [`SmsService`].
#[derive(Clone)]
pub struct ProviderNotifier {
    email: EmailService,
    sms: SmsService,
}

impl ProviderNotifier {
    pub fn new(email: EmailService, sms: SmsService) -> Self {
        Self { email, sms }
    }
}

#[async_trait]
impl CustomerNotifier for ProviderNotifier {
    async fn send_email(&self, message: &AlertMatchMessage) -> DeliveryResult {
        if !self.email.is_configured() {
            return DeliveryResult::Skipped;
        }
        match self.email.send(EmailMessage::from(message)).await {
            Ok(()) => DeliveryResult::Sent,
            Err(EmailError::NotConfigured) => DeliveryResult::Skipped,
            Err(e) => DeliveryResult::Failed(e.to_string()),
        }
    }

    async fn send_sms(&self, message: &AlertMatchMessage) -> DeliveryResult {
        let Some(phone) = message.to_phone.as_deref() else {
            return DeliveryResult::Skipped;
        };
        match self.sms.send(phone, &message.sms_body).await {
            Ok(()) => DeliveryResult::Sent,
            Err(SmsError::NotConfigured) => DeliveryResult::Skipped,
            Err(e) => DeliveryResult::Failed(e.to_string()),
        }
    }
}

fn outcome_label(result: &DeliveryResult) -> &'static str {
    match result {
        DeliveryResult::Sent => "sent",
        DeliveryResult::Skipped => "skipped",
        DeliveryResult::Failed(_) => "failed",
    }
}

#[derive(Clone)]
pub struct AlertMatcher {
    pool: PgPool,
    notifier: Arc<dyn CustomerNotifier>,
    dealership_name: String,
    site_base_url: String,
}

impl AlertMatcher {
    pub fn new(
        pool: PgPool,
        notifier: Arc<dyn CustomerNotifier>,
        dealership_name: impl Into<String>,
        site_base_url: impl Into<String>,
    ) -> Self {
        Self {
            pool,
            notifier,
            dealership_name: dealership_name.into(),
            site_base_url: site_base_url.into(),
        }
    }

    /// Matches `vehicle` against active alerts and records new pairs.
    ///
    /// Unavailable vehicles match nothing. Alerts already notified about this
    /// vehicle count as matched but are not notified again.
    pub async fn run(&self, vehicle: &Vehicle) -> Result<AlertMatchOutcome, sqlx::Error> {
        if !vehicle.is_available() {
            tracing::debug!(vehicle_id = %vehicle.id, status = %vehicle.status, "Vehicle not available, skipping alert match");
            return Ok(AlertMatchOutcome {
                vehicle_id: vehicle.id,
                matched_alerts: 0,
                notifications_created: 0,
            });
        }

        let repo = InventoryAlertRepository::new(self.pool.clone());
        let alerts: Vec<InventoryAlert> = repo
            .find_matching_alerts(vehicle)
            .await?
            .into_iter()
            .map(InventoryAlert::from)
            .filter(|alert| alert.matches(vehicle))
            .collect();

        let ids: Vec<_> = alerts.iter().map(|a| a.id).collect();
        let (recorded, newly_notified) = repo.record_matches(vehicle.id, &ids).await?;

        let outcome = AlertMatchOutcome {
            vehicle_id: vehicle.id,
            matched_alerts: recorded.matched,
            notifications_created: recorded.inserted,
        };
        record_alert_matches(recorded.matched, recorded.inserted);

        tracing::info!(
            vehicle_id = %vehicle.id,
            matched = recorded.matched,
            notified = recorded.inserted,
            "Inventory alert match complete"
        );

        let messages: Vec<AlertMatchMessage> = alerts
            .iter()
            .filter(|a| newly_notified.contains(&a.id))
            .map(|a| {
                AlertMatchMessage::build(a, vehicle, &self.dealership_name, &self.site_base_url)
            })
            .collect();
        self.spawn_deliveries(messages);

        if outcome.notifications_created > 0 {
            let notifications = AdminNotificationRepository::new(self.pool.clone());
            if let Err(e) = notifications
                .create(&NewAdminNotification::alert_match(vehicle, &outcome))
                .await
            {
                tracing::warn!(vehicle_id = %vehicle.id, error = %e, "Failed to record alert match notification");
            }
        }

        Ok(outcome)
    }

    fn spawn_deliveries(&self, messages: Vec<AlertMatchMessage>) {
        for message in messages {
            let notifier = self.notifier.clone();
            tokio::spawn(async move {
                deliver(notifier.as_ref(), &message).await;
            });
        }
    }
}

/// Sends one message on every channel and logs the results.
pub async fn deliver(notifier: &dyn CustomerNotifier, message: &AlertMatchMessage) -> (DeliveryResult, DeliveryResult) {
    let email = notifier.send_email(message).await;
    record_delivery("email", outcome_label(&email));
    if let DeliveryResult::Failed(reason) = &email {
        tracing::warn!(alert_id = %message.alert_id, error = %reason, "Alert email delivery failed");
    }

    let sms = notifier.send_sms(message).await;
    record_delivery("sms", outcome_label(&sms));
    if let DeliveryResult::Failed(reason) = &sms {
        tracing::warn!(alert_id = %message.alert_id, error = %reason, "Alert SMS delivery failed");
    }

    (email, sms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EmailConfig, SmsConfig};
    use domain::services::MockCustomerNotifier;
    use uuid::Uuid;

    fn message(phone: Option<&str>) -> AlertMatchMessage {
        AlertMatchMessage {
            alert_id: Uuid::new_v4(),
            vehicle_id: Uuid::new_v4(),
            to_email: "buyer@example.com".to_string(),
            to_phone: phone.map(str::to_string),
            subject: "New arrival".to_string(),
            body: "Body".to_string(),
            sms_body: "Short".to_string(),
        }
    }

    #[tokio::test]
    async fn test_deliver_with_mock_notifier() {
        let notifier = MockCustomerNotifier::new();
        let (email, sms) = deliver(&notifier, &message(Some("+15551112222"))).await;
        assert_eq!(email, DeliveryResult::Sent);
        assert_eq!(sms, DeliveryResult::Sent);

        let (_, sms) = deliver(&notifier, &message(None)).await;
        assert_eq!(sms, DeliveryResult::Skipped);
    }

    #[tokio::test]
    async fn test_deliver_failures_are_reported_not_raised() {
        let notifier = MockCustomerNotifier::failing();
        let (email, _) = deliver(&notifier, &message(Some("+15551112222"))).await;
        assert!(matches!(email, DeliveryResult::Failed(_)));
    }

    #[tokio::test]
    async fn test_provider_notifier_skips_unconfigured_channels() {
        let notifier = ProviderNotifier::new(
            EmailService::new(EmailConfig::default()),
            SmsService::new(SmsConfig::default()),
        );
        let msg = message(Some("+15551112222"));
        assert_eq!(notifier.send_email(&msg).await, DeliveryResult::Skipped);
        assert_eq!(notifier.send_sms(&msg).await, DeliveryResult::Skipped);
    }

    #[tokio::test]
    async fn test_provider_notifier_console_email_sends() {
        let notifier = ProviderNotifier::new(
            EmailService::new(EmailConfig {
                enabled: true,
                ..EmailConfig::default()
            }),
            SmsService::new(SmsConfig::default()),
        );
        assert_eq!(
            notifier.send_email(&message(None)).await,
            DeliveryResult::Sent
        );
    }
}
