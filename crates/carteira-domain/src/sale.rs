//! Domain model for recorded sales.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::*;

/// Smallest allowed installment count for a sale.
pub const MIN_INSTALLMENTS: u32 = 1;
/// Largest allowed installment count for a sale (20 years of monthly payments).
pub const MAX_INSTALLMENTS: u32 = 240;

/// A recorded transaction with a total value to be collected in installments.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: Uuid,
    /// Owning user; partitions every query.
    pub user_id: String,
    pub property_name: String,
    pub client_name: String,
    pub total_value: f64,
    pub sale_date: NaiveDate,
    pub total_installments: u32,
    pub status: SaleStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Sale {
    pub fn new(
        user_id: impl Into<String>,
        property_name: impl Into<String>,
        client_name: impl Into<String>,
        total_value: f64,
        sale_date: NaiveDate,
        total_installments: u32,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            property_name: property_name.into(),
            client_name: client_name.into(),
            total_value,
            sale_date,
            total_installments,
            status: SaleStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    /// Refreshes the modification timestamp. Call after every mutation.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self.status, SaleStatus::Cancelled)
    }
}

impl Identifiable for Sale {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Displayable for Sale {
    fn display_label(&self) -> String {
        format!("{} / {} [{}]", self.property_name, self.client_name, self.status)
    }
}

/// Lifecycle state of a sale. `Cancelled` is terminal for collection purposes
/// but reversible back to `Active`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum SaleStatus {
    #[default]
    Active,
    Completed,
    Cancelled,
}

impl SaleStatus {
    /// Fixed display label used by status breakdown reports.
    pub fn report_label(self) -> &'static str {
        match self {
            SaleStatus::Active => "Ativas",
            SaleStatus::Completed => "Concluídas",
            SaleStatus::Cancelled => "Canceladas",
        }
    }

    pub const ALL: [SaleStatus; 3] = [
        SaleStatus::Active,
        SaleStatus::Completed,
        SaleStatus::Cancelled,
    ];
}

impl fmt::Display for SaleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SaleStatus::Active => "Active",
            SaleStatus::Completed => "Completed",
            SaleStatus::Cancelled => "Cancelled",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_label_names_property_client_and_status() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let mut sale = Sale::new("u1", "Residencial Aurora", "Maria Souza", 120_000.0, date, 12);
        assert_eq!(
            sale.display_label(),
            "Residencial Aurora / Maria Souza [Active]"
        );

        sale.status = SaleStatus::Cancelled;
        assert_eq!(
            sale.display_label(),
            "Residencial Aurora / Maria Souza [Cancelled]"
        );
    }
}
