//! Local mirror of the customer's inventory alerts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::storage::PersistentStore;
use crate::models::inventory_alert::AlertCriteria;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalAlert {
    /// Server-side alert id.
    pub id: Uuid,
    pub criteria: AlertCriteria,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertStore {
    alerts: Vec<LocalAlert>,
}

impl AlertStore {
    pub fn alerts(&self) -> &[LocalAlert] {
        &self.alerts
    }

    pub fn active(&self) -> impl Iterator<Item = &LocalAlert> {
        self.alerts.iter().filter(|a| a.is_active)
    }

    pub fn len(&self) -> usize {
        self.alerts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }

    /// Adds an alert; an existing id has its criteria replaced and is reactivated.
    pub fn add(&mut self, id: Uuid, criteria: AlertCriteria) {
        if let Some(existing) = self.alerts.iter_mut().find(|a| a.id == id) {
            existing.criteria = criteria;
            existing.is_active = true;
            return;
        }
        self.alerts.push(LocalAlert {
            id,
            criteria,
            is_active: true,
            created_at: Utc::now(),
        });
    }

    pub fn remove(&mut self, id: Uuid) -> bool {
        let before = self.alerts.len();
        self.alerts.retain(|a| a.id != id);
        self.alerts.len() != before
    }

    /// Flips the active flag; `None` when the id is unknown.
    pub fn toggle_active(&mut self, id: Uuid) -> Option<bool> {
        let alert = self.alerts.iter_mut().find(|a| a.id == id)?;
        alert.is_active = !alert.is_active;
        Some(alert.is_active)
    }

    pub fn clear(&mut self) {
        self.alerts.clear();
    }
}

impl PersistentStore for AlertStore {
    const STORAGE_KEY: &'static str = "alert-store";
}
