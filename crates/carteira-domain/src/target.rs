//! Domain model for monthly receivable goals.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::Identifiable;

/// A user-set goal for receivables collected in a given month.
///
/// One row per `(user_id, year, month)` triple; setters upsert by that key.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyTarget {
    pub id: Uuid,
    pub user_id: String,
    pub year: i32,
    pub month: u32,
    pub target: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MonthlyTarget {
    pub fn new(user_id: impl Into<String>, year: i32, month: u32, target: f64) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            year,
            month,
            target,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn matches(&self, user_id: &str, year: i32, month: u32) -> bool {
        self.user_id == user_id && self.year == year && self.month == month
    }

    /// Replaces the goal amount, refreshing the modification timestamp.
    pub fn set_target(&mut self, target: f64) {
        self.target = target;
        self.updated_at = Utc::now();
    }
}

impl Identifiable for MonthlyTarget {
    fn id(&self) -> Uuid {
        self.id
    }
}
