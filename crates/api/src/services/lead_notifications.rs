//! Side effects of a captured lead: admin notification row, dealership email
//! and, for inquiries, a text to the sales line.
//!
//! The lead is already stored when these run. Failures are logged and never
//! reach the customer.

use sqlx::PgPool;

use domain::models::{Contact, NewAdminNotification, Testimonial, Vehicle, VehicleInquiry};
use persistence::repositories::AdminNotificationRepository;

use crate::config::DealershipConfig;
use crate::services::email::{contact_notification, inquiry_notification, EmailService};
use crate::services::sms::{inquiry_sms, SmsService};

#[derive(Clone)]
pub struct LeadNotifier {
    pool: PgPool,
    email: EmailService,
    sms: SmsService,
    notification_email: Option<String>,
    sales_phone: Option<String>,
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl LeadNotifier {
    pub fn new(pool: PgPool, email: EmailService, sms: SmsService, dealership: &DealershipConfig) -> Self {
        Self {
            pool,
            email,
            sms,
            notification_email: non_empty(&dealership.notification_email),
            sales_phone: non_empty(&dealership.sales_phone),
        }
    }

    async fn record(&self, notification: NewAdminNotification) {
        let repo = AdminNotificationRepository::new(self.pool.clone());
        if let Err(e) = repo.create(&notification).await {
            tracing::warn!(kind = %notification.kind, error = %e, "Failed to create admin notification");
        }
    }

    pub async fn new_contact(&self, contact: &Contact) {
        self.record(NewAdminNotification::new_contact(contact)).await;

        if let Some(to) = self.notification_email.as_deref() {
            let email = self.email.clone();
            let message = contact_notification(contact, to);
            let contact_id = contact.id;
            tokio::spawn(async move {
                if let Err(e) = email.send(message).await {
                    tracing::warn!(contact_id = %contact_id, error = %e, "Contact notification email failed");
                }
            });
        }
    }

    pub async fn new_inquiry(&self, inquiry: &VehicleInquiry, vehicle: &Vehicle) {
        self.record(NewAdminNotification::new_inquiry(inquiry, vehicle))
            .await;

        if let Some(to) = self.notification_email.as_deref() {
            let email = self.email.clone();
            let message = inquiry_notification(inquiry, vehicle, to);
            let inquiry_id = inquiry.id;
            tokio::spawn(async move {
                if let Err(e) = email.send(message).await {
                    tracing::warn!(inquiry_id = %inquiry_id, error = %e, "Inquiry notification email failed");
                }
            });
        }

        if let Some(phone) = self.sales_phone.clone() {
            if self.sms.is_configured() {
                let sms = self.sms.clone();
                let body = inquiry_sms(inquiry, vehicle);
                let inquiry_id = inquiry.id;
                tokio::spawn(async move {
                    if let Err(e) = sms.send(&phone, &body).await {
                        tracing::warn!(inquiry_id = %inquiry_id, error = %e, "Inquiry SMS failed");
                    }
                });
            }
        }
    }

    pub async fn new_testimonial(&self, testimonial: &Testimonial) {
        self.record(NewAdminNotification::new_testimonial(testimonial))
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty(""), None);
        assert_eq!(non_empty("   "), None);
        assert_eq!(non_empty(" leads@dealer.test "), Some("leads@dealer.test".to_string()));
    }
}
