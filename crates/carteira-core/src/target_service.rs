//! Monthly receivable goal registry.

use carteira_domain::MonthlyTarget;

use crate::{store::RecordStore, CoreError};

/// Upsert/lookup over the monthly target collection, keyed by
/// `(user_id, year, month)`.
pub struct TargetService;

impl TargetService {
    /// Sets the goal for the given month, replacing any existing row for the
    /// same key while preserving its identity and creation timestamp.
    pub fn set(
        store: &dyn RecordStore,
        user_id: &str,
        year: i32,
        month: u32,
        amount: f64,
    ) -> Result<MonthlyTarget, CoreError> {
        let mut targets = store.load_targets()?;
        let target = match targets.iter_mut().find(|t| t.matches(user_id, year, month)) {
            Some(existing) => {
                existing.set_target(amount);
                existing.clone()
            }
            None => {
                let created = MonthlyTarget::new(user_id, year, month, amount);
                targets.push(created.clone());
                created
            }
        };
        store.save_targets(&targets)?;
        Ok(target)
    }

    /// Returns the goal for the given month, or 0 when none is set.
    pub fn get(
        store: &dyn RecordStore,
        user_id: &str,
        year: i32,
        month: u32,
    ) -> Result<f64, CoreError> {
        let targets = store.load_targets()?;
        Ok(targets
            .iter()
            .find(|t| t.matches(user_id, year, month))
            .map(|t| t.target)
            .unwrap_or(0.0))
    }
}
