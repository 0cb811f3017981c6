//! External integrations and request side effects.

pub mod admin_bootstrap;
pub mod alert_matching;
pub mod email;
pub mod lead_notifications;
pub mod sms;

pub use alert_matching::{AlertMatcher, ProviderNotifier};
pub use email::{EmailError, EmailMessage, EmailService};
pub use lead_notifications::LeadNotifier;
pub use sms::{SmsError, SmsService};
