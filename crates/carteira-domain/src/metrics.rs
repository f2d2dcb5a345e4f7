//! Read-only dashboard snapshot types produced by the metrics aggregator.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::common::MonthKey;

/// Narrows the sale working set for the filtered subset of metrics.
///
/// Calendar-anchored figures (trends, this/next-month receivables, targets,
/// projections) are always computed over full history regardless of filter.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardFilters {
    pub period: PeriodFilter,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum PeriodFilter {
    Week,
    Month,
    Quarter,
    Year,
    #[default]
    All,
}

impl fmt::Display for PeriodFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PeriodFilter::Week => "week",
            PeriodFilter::Month => "month",
            PeriodFilter::Quarter => "quarter",
            PeriodFilter::Year => "year",
            PeriodFilter::All => "all",
        };
        f.write_str(label)
    }
}

/// Sales volume for one calendar month, chart-shaped.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonthlySales {
    pub month: MonthKey,
    pub amount: f64,
    pub count: usize,
}

/// Pending receivables grouped under one due month.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReceivableBucket {
    pub month: MonthKey,
    pub amount: f64,
}

/// Aggregate standing of one property across non-cancelled sales.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PropertyPerformance {
    pub name: String,
    pub sales: usize,
    pub revenue: f64,
}

/// Count and value of sales sharing one lifecycle status.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusBreakdown {
    pub status: String,
    pub count: usize,
    pub value: f64,
}

/// Per-month sale/cancellation activity for the trailing year.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonthlyTrend {
    pub month: MonthKey,
    pub sales: usize,
    pub cancelled: usize,
    pub revenue: f64,
}

/// Complete dashboard snapshot. Pure function of store state and the
/// reference date; identical inputs always yield an identical snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    pub total_sales: f64,
    pub total_to_receive: f64,
    pub total_received: f64,
    pub pending_installments: usize,
    pub overdue_installments: usize,
    pub sales_this_month: f64,
    pub received_this_month: f64,
    pub to_receive_this_month: f64,
    pub to_receive_next_month: f64,
    pub sales_by_month: Vec<MonthlySales>,
    pub receivables_by_month: Vec<ReceivableBucket>,
    pub cancelled_sales_count: usize,
    pub cancelled_sales_value: f64,
    pub cancellation_rate: f64,
    pub average_ticket: f64,
    pub conversion_rate: f64,
    pub projected_monthly_revenue: f64,
    pub projected_yearly_revenue: f64,
    pub monthly_target: f64,
    pub monthly_growth_rate: f64,
    pub target_achievement: f64,
    pub top_performing_properties: Vec<PropertyPerformance>,
    pub sales_by_status: Vec<StatusBreakdown>,
    pub monthly_trends: Vec<MonthlyTrend>,
}
