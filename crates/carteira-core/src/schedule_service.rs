//! Installment schedule generation for new sales.

use chrono::{Datelike, NaiveDate};

use carteira_domain::{shift_month, Installment, Sale};

/// Generates a sale's installment schedule. Pure: no store access, and
/// deterministic output (installment ids derive from the sale and position).
pub struct ScheduleService;

/// Commission is paid the month after the sale closes, on this day.
const DEFAULT_DUE_DAY: u32 = 15;

impl ScheduleService {
    /// Produces the full ordered schedule for `sale`: exactly
    /// `total_installments` pending entries of `total_value / N` each, one
    /// calendar month apart starting at `first_due` (or the default lag).
    pub fn generate(sale: &Sale, first_due: Option<NaiveDate>) -> Vec<Installment> {
        let first_due = first_due.unwrap_or_else(|| Self::default_first_due(sale.sale_date));
        let amount = sale.total_value / sale.total_installments as f64;

        (1..=sale.total_installments)
            .map(|number| {
                // Always shift from the first due date so a month-end start
                // does not drift shorter month after month.
                let due_date = shift_month(first_due, number as i32 - 1);
                Installment::new(sale.id, number, amount, due_date)
            })
            .collect()
    }

    /// Default first due date: the 15th of the month following the sale,
    /// wrapping December into January of the next year.
    pub fn default_first_due(sale_date: NaiveDate) -> NaiveDate {
        let (year, month) = if sale_date.month() == 12 {
            (sale_date.year() + 1, 1)
        } else {
            (sale_date.year(), sale_date.month() + 1)
        };
        NaiveDate::from_ymd_opt(year, month, DEFAULT_DUE_DAY).unwrap()
    }
}
