//! Domain model for scheduled installments (receivables).

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::*;

/// One scheduled partial payment of a sale's total value.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Installment {
    pub id: Uuid,
    pub sale_id: Uuid,
    /// 1-based position in the schedule, unique within a sale.
    pub installment_number: u32,
    pub amount: f64,
    pub due_date: NaiveDate,
    pub status: InstallmentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub received_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Installment {
    /// Creates a pending installment with a deterministic identity derived
    /// from `(sale_id, installment_number)`, so regeneration is idempotent.
    pub fn new(sale_id: Uuid, installment_number: u32, amount: f64, due_date: NaiveDate) -> Self {
        let now = Utc::now();
        Self {
            id: Self::derive_id(sale_id, installment_number),
            sale_id,
            installment_number,
            amount,
            due_date,
            status: InstallmentStatus::Pending,
            received_date: None,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Deterministic v5 id from the owning sale and schedule position.
    pub fn derive_id(sale_id: Uuid, installment_number: u32) -> Uuid {
        Uuid::new_v5(&sale_id, &installment_number.to_be_bytes())
    }

    /// Refreshes the modification timestamp. Call after every mutation.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Overdue is a view-level judgement, never a stored status.
    pub fn is_overdue(&self, reference: NaiveDate) -> bool {
        self.status == InstallmentStatus::Pending && self.due_date < reference
    }

    pub fn is_pending(&self) -> bool {
        self.status == InstallmentStatus::Pending
    }

    /// Marks the installment as collected on `received_date`.
    pub fn mark_received(&mut self, received_date: NaiveDate, notes: Option<String>) {
        self.status = InstallmentStatus::Received;
        self.received_date = Some(received_date);
        self.notes = notes;
        self.touch();
    }

    /// Reverts a receipt back to pending, clearing the collection record.
    pub fn revert_receipt(&mut self) {
        self.status = InstallmentStatus::Pending;
        self.received_date = None;
        self.notes = None;
        self.touch();
    }

    pub fn cancel(&mut self) {
        self.status = InstallmentStatus::Cancelled;
        self.touch();
    }
}

impl Identifiable for Installment {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Displayable for Installment {
    fn display_label(&self) -> String {
        format!("#{} due {} [{}]", self.installment_number, self.due_date, self.status)
    }
}

/// Collection state of an installment.
///
/// Legacy documents persisted an `overdue` value; it maps onto `Pending`
/// on load since overdue is derived from the due date at query time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum InstallmentStatus {
    #[default]
    #[serde(alias = "overdue")]
    Pending,
    Received,
    Cancelled,
}

impl fmt::Display for InstallmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            InstallmentStatus::Pending => "Pending",
            InstallmentStatus::Received => "Received",
            InstallmentStatus::Cancelled => "Cancelled",
        };
        f.write_str(label)
    }
}
