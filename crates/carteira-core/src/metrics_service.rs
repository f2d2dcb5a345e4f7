//! Dashboard metrics aggregation.
//!
//! A read-only snapshot computed from the full record collections. The
//! period filter narrows the sale working set for the headline totals;
//! calendar-anchored figures (month receivables, targets, projections,
//! trends) are always computed against full history, because they are tied
//! to the reference date rather than the selected period.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{Datelike, Duration, NaiveDate};
use uuid::Uuid;

use carteira_domain::{
    DashboardFilters, DashboardMetrics, Installment, InstallmentStatus, MonthKey, MonthlySales,
    MonthlyTrend, PeriodFilter, PropertyPerformance, ReceivableBucket, Sale, SaleStatus,
    StatusBreakdown,
};

use crate::{store::RecordStore, target_service::TargetService, CoreError};

/// Months of received-revenue history feeding the projection average.
const PROJECTION_WINDOW_MONTHS: usize = 6;
/// Months covered by the trailing trend series.
const TREND_WINDOW_MONTHS: i32 = 12;
/// Entries kept in the top-properties ranking.
const TOP_PROPERTIES: usize = 5;

/// Aggregates sales and installments into a [`DashboardMetrics`] snapshot.
///
/// Pure function of store state and `reference` (the caller's "today"):
/// recomputing without intervening mutations yields an identical snapshot,
/// and empty collections produce an all-zero snapshot rather than an error.
pub struct MetricsService;

impl MetricsService {
    pub fn compute(
        store: &dyn RecordStore,
        user_id: &str,
        filters: &DashboardFilters,
        reference: NaiveDate,
    ) -> Result<DashboardMetrics, CoreError> {
        let all_sales: Vec<Sale> = store
            .load_sales()?
            .into_iter()
            .filter(|s| s.user_id == user_id)
            .collect();

        let user_sale_ids: HashSet<Uuid> = all_sales.iter().map(|s| s.id).collect();
        let all_installments: Vec<Installment> = store
            .load_installments()?
            .into_iter()
            .filter(|i| user_sale_ids.contains(&i.sale_id))
            .collect();

        let sales = Self::apply_period_filter(&all_sales, filters, reference);
        let filtered_ids: HashSet<Uuid> = sales.iter().map(|s| s.id).collect();
        let installments: Vec<&Installment> = all_installments
            .iter()
            .filter(|i| filtered_ids.contains(&i.sale_id))
            .collect();

        // Headline totals over the filtered set. Cancelled sales never count
        // toward monetary totals.
        let total_sales = sales
            .iter()
            .filter(|s| !s.is_cancelled())
            .map(|s| s.total_value)
            .sum();
        let total_received = Self::sum_by_status(&installments, InstallmentStatus::Received);
        let total_to_receive = Self::sum_by_status(&installments, InstallmentStatus::Pending);
        let pending_installments = installments.iter().filter(|i| i.is_pending()).count();
        let overdue_installments = installments.iter().filter(|i| i.is_overdue(reference)).count();

        let this_month = MonthKey::from_date(reference);
        let next_month = this_month.next();

        let sales_this_month = all_sales
            .iter()
            .filter(|s| !s.is_cancelled() && this_month.contains(s.sale_date))
            .map(|s| s.total_value)
            .sum();
        let received_this_month: f64 = all_installments
            .iter()
            .filter(|i| {
                i.status == InstallmentStatus::Received
                    && i.received_date.is_some_and(|d| this_month.contains(d))
            })
            .map(|i| i.amount)
            .sum();
        let to_receive_this_month = Self::pending_due_in(&all_installments, this_month);
        let to_receive_next_month = Self::pending_due_in(&all_installments, next_month);

        // Cancellation figures always use the unfiltered count as denominator.
        let cancelled: Vec<&Sale> = all_sales.iter().filter(|s| s.is_cancelled()).collect();
        let cancelled_sales_count = cancelled.len();
        let cancelled_sales_value = cancelled.iter().map(|s| s.total_value).sum();
        let cancellation_rate = if all_sales.is_empty() {
            0.0
        } else {
            cancelled_sales_count as f64 / all_sales.len() as f64 * 100.0
        };

        let active: Vec<&Sale> = all_sales
            .iter()
            .filter(|s| s.status == SaleStatus::Active)
            .collect();
        let average_ticket = if active.is_empty() {
            0.0
        } else {
            active.iter().map(|s| s.total_value).sum::<f64>() / active.len() as f64
        };

        let monthly_target =
            TargetService::get(store, user_id, reference.year(), reference.month())?;
        let target_achievement = if monthly_target > 0.0 {
            received_this_month / monthly_target * 100.0
        } else {
            0.0
        };

        // Trailing received revenue by due month, newest first, feeding both
        // the projection average and the growth rate.
        let cancelled_ids: HashSet<Uuid> = cancelled.iter().map(|s| s.id).collect();
        let recent_revenue: Vec<f64> = (0..PROJECTION_WINDOW_MONTHS)
            .map(|offset| {
                let month = this_month.shift(-(offset as i32));
                all_installments
                    .iter()
                    .filter(|i| {
                        i.status == InstallmentStatus::Received
                            && month.contains(i.due_date)
                            && !cancelled_ids.contains(&i.sale_id)
                    })
                    .map(|i| i.amount)
                    .sum()
            })
            .collect();
        let average_monthly_revenue =
            recent_revenue.iter().sum::<f64>() / PROJECTION_WINDOW_MONTHS as f64;
        let projected_monthly_revenue = if monthly_target > 0.0 {
            monthly_target
        } else {
            average_monthly_revenue
        };
        let projected_yearly_revenue = projected_monthly_revenue * 12.0;

        let this_month_revenue = recent_revenue[0];
        let last_month_revenue = recent_revenue[1];
        let monthly_growth_rate = if last_month_revenue > 0.0 {
            (this_month_revenue - last_month_revenue) / last_month_revenue * 100.0
        } else {
            0.0
        };

        let top_performing_properties = Self::top_properties(&all_sales);
        let sales_by_status = Self::status_breakdown(&all_sales);
        let monthly_trends = Self::monthly_trends(&all_sales, this_month);
        let sales_by_month = monthly_trends
            .iter()
            .map(|trend| MonthlySales {
                month: trend.month,
                amount: trend.revenue,
                count: trend.sales,
            })
            .collect();
        let receivables_by_month = Self::receivables_by_month(&all_installments);

        Ok(DashboardMetrics {
            total_sales,
            total_to_receive,
            total_received,
            pending_installments,
            overdue_installments,
            sales_this_month,
            received_this_month,
            to_receive_this_month,
            to_receive_next_month,
            sales_by_month,
            receivables_by_month,
            cancelled_sales_count,
            cancelled_sales_value,
            cancellation_rate,
            average_ticket,
            conversion_rate: 100.0 - cancellation_rate,
            projected_monthly_revenue,
            projected_yearly_revenue,
            monthly_target,
            monthly_growth_rate,
            target_achievement,
            top_performing_properties,
            sales_by_status,
            monthly_trends,
        })
    }

    fn apply_period_filter<'a>(
        sales: &'a [Sale],
        filters: &DashboardFilters,
        reference: NaiveDate,
    ) -> Vec<&'a Sale> {
        let in_range: Box<dyn Fn(NaiveDate) -> bool> = match filters.period {
            PeriodFilter::All => return sales.iter().collect(),
            PeriodFilter::Week => {
                let start = reference - Duration::days(7);
                Box::new(move |date| date >= start)
            }
            PeriodFilter::Month => {
                let month = match (filters.year, filters.month) {
                    (Some(year), Some(month)) => MonthKey::new(year, month),
                    _ => MonthKey::from_date(reference),
                };
                Box::new(move |date| month.contains(date))
            }
            PeriodFilter::Quarter => {
                let quarter_start_month = (reference.month0() / 3) * 3 + 1;
                let start =
                    NaiveDate::from_ymd_opt(reference.year(), quarter_start_month, 1).unwrap();
                let end = carteira_domain::shift_month(start, 3);
                Box::new(move |date| date >= start && date < end)
            }
            PeriodFilter::Year => {
                let year = filters.year.unwrap_or_else(|| reference.year());
                Box::new(move |date| date.year() == year)
            }
        };
        sales.iter().filter(|s| in_range(s.sale_date)).collect()
    }

    fn sum_by_status(installments: &[&Installment], status: InstallmentStatus) -> f64 {
        installments
            .iter()
            .filter(|i| i.status == status)
            .map(|i| i.amount)
            .sum()
    }

    fn pending_due_in(installments: &[Installment], month: MonthKey) -> f64 {
        installments
            .iter()
            .filter(|i| i.is_pending() && month.contains(i.due_date))
            .map(|i| i.amount)
            .sum()
    }

    fn top_properties(sales: &[Sale]) -> Vec<PropertyPerformance> {
        let mut by_property: BTreeMap<&str, (usize, f64)> = BTreeMap::new();
        for sale in sales.iter().filter(|s| !s.is_cancelled()) {
            let entry = by_property.entry(sale.property_name.as_str()).or_default();
            entry.0 += 1;
            entry.1 += sale.total_value;
        }
        let mut ranked: Vec<PropertyPerformance> = by_property
            .into_iter()
            .map(|(name, (sales, revenue))| PropertyPerformance {
                name: name.to_owned(),
                sales,
                revenue,
            })
            .collect();
        // Stable sort over the name-ordered rows keeps ties deterministic.
        ranked.sort_by(|a, b| b.revenue.total_cmp(&a.revenue));
        ranked.truncate(TOP_PROPERTIES);
        ranked
    }

    fn status_breakdown(sales: &[Sale]) -> Vec<StatusBreakdown> {
        SaleStatus::ALL
            .into_iter()
            .map(|status| {
                let matching: Vec<&Sale> = sales.iter().filter(|s| s.status == status).collect();
                StatusBreakdown {
                    status: status.report_label().to_owned(),
                    count: matching.len(),
                    value: matching.iter().map(|s| s.total_value).sum(),
                }
            })
            .collect()
    }

    fn monthly_trends(sales: &[Sale], this_month: MonthKey) -> Vec<MonthlyTrend> {
        let mut buckets: HashMap<MonthKey, MonthlyTrend> = HashMap::new();
        for sale in sales {
            let month = MonthKey::from_date(sale.sale_date);
            let bucket = buckets.entry(month).or_insert_with(|| MonthlyTrend {
                month,
                sales: 0,
                cancelled: 0,
                revenue: 0.0,
            });
            if sale.is_cancelled() {
                bucket.cancelled += 1;
            } else {
                bucket.sales += 1;
                bucket.revenue += sale.total_value;
            }
        }
        (1 - TREND_WINDOW_MONTHS..=0)
            .map(|offset| {
                let month = this_month.shift(offset);
                buckets.remove(&month).unwrap_or(MonthlyTrend {
                    month,
                    sales: 0,
                    cancelled: 0,
                    revenue: 0.0,
                })
            })
            .collect()
    }

    fn receivables_by_month(installments: &[Installment]) -> Vec<ReceivableBucket> {
        let mut buckets: BTreeMap<MonthKey, f64> = BTreeMap::new();
        for installment in installments.iter().filter(|i| i.is_pending()) {
            *buckets
                .entry(MonthKey::from_date(installment.due_date))
                .or_default() += installment.amount;
        }
        buckets
            .into_iter()
            .map(|(month, amount)| ReceivableBucket { month, amount })
            .collect()
    }
}
