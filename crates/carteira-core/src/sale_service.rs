//! Sale lifecycle operations and their installment cascades.

use chrono::NaiveDate;
use tracing::{debug, info};
use uuid::Uuid;

use carteira_domain::{
    Installment, InstallmentStatus, Sale, SaleStatus, MAX_INSTALLMENTS, MIN_INSTALLMENTS,
};

use crate::{store::RecordStore, CoreError, ScheduleService};

/// Input for recording a new sale. Validation here is a last-resort guard;
/// the calling surface is expected to pre-validate user input.
#[derive(Debug, Clone)]
pub struct SaleDraft {
    pub user_id: String,
    pub property_name: String,
    pub client_name: String,
    pub total_value: f64,
    pub sale_date: NaiveDate,
    pub total_installments: u32,
    /// Overrides the default one-month payment lag when set.
    pub first_installment_date: Option<NaiveDate>,
}

/// Restricted field patch for an existing sale. Status is deliberately not
/// patchable: lifecycle transitions go through the dedicated operations so
/// their cascades cannot be triggered by a stray field value.
#[derive(Debug, Clone, Default)]
pub struct SaleUpdate {
    pub property_name: Option<String>,
    pub client_name: Option<String>,
    pub total_value: Option<f64>,
    pub sale_date: Option<NaiveDate>,
}

/// Result of cancelling a sale, including what the cascade touched.
#[derive(Debug, Clone, PartialEq)]
pub struct CancellationOutcome {
    pub success: bool,
    pub cancelled_installments: usize,
    pub cancelled_amount: f64,
}

impl CancellationOutcome {
    fn failed() -> Self {
        Self {
            success: false,
            cancelled_installments: 0,
            cancelled_amount: 0.0,
        }
    }
}

/// Result of archiving a sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchiveOutcome {
    pub success: bool,
}

/// Mutations over sales and their installments. Each operation is a single
/// synchronous read-modify-write against the record store.
pub struct SaleService;

impl SaleService {
    /// Validates the draft, persists the sale, and generates and persists
    /// its full installment schedule.
    pub fn create(store: &dyn RecordStore, draft: SaleDraft) -> Result<Sale, CoreError> {
        Self::validate_draft(&draft)?;

        let sale = Sale::new(
            draft.user_id,
            draft.property_name.trim(),
            draft.client_name.trim(),
            draft.total_value,
            draft.sale_date,
            draft.total_installments,
        );
        let schedule = ScheduleService::generate(&sale, draft.first_installment_date);

        let mut sales = store.load_sales()?;
        sales.push(sale.clone());
        store.save_sales(&sales)?;

        let mut installments = store.load_installments()?;
        installments.extend(schedule);
        store.save_installments(&installments)?;

        info!(sale = %sale.id, installments = sale.total_installments, "sale recorded");
        Ok(sale)
    }

    /// Merges a restricted patch into an existing sale.
    pub fn update(
        store: &dyn RecordStore,
        sale_id: Uuid,
        patch: SaleUpdate,
    ) -> Result<Sale, CoreError> {
        if let Some(value) = patch.total_value {
            if !(value > 0.0) || !value.is_finite() {
                return Err(CoreError::Validation(
                    "total value must be positive".into(),
                ));
            }
        }

        let mut sales = store.load_sales()?;
        let sale = sales
            .iter_mut()
            .find(|s| s.id == sale_id)
            .ok_or(CoreError::SaleNotFound(sale_id))?;

        if let Some(name) = patch.property_name {
            sale.property_name = name;
        }
        if let Some(name) = patch.client_name {
            sale.client_name = name;
        }
        if let Some(value) = patch.total_value {
            sale.total_value = value;
        }
        if let Some(date) = patch.sale_date {
            sale.sale_date = date;
        }
        sale.touch();

        let updated = sale.clone();
        store.save_sales(&sales)?;
        Ok(updated)
    }

    /// Cancels the sale and cascades every pending installment to cancelled.
    /// Already-received installments are left untouched: collected money is
    /// not reversed. Unknown ids report failure instead of erroring.
    pub fn cancel(store: &dyn RecordStore, sale_id: Uuid) -> Result<CancellationOutcome, CoreError> {
        let mut sales = store.load_sales()?;
        let Some(sale) = sales.iter_mut().find(|s| s.id == sale_id) else {
            return Ok(CancellationOutcome::failed());
        };
        sale.status = SaleStatus::Cancelled;
        sale.touch();
        store.save_sales(&sales)?;

        let mut installments = store.load_installments()?;
        let mut cancelled_installments = 0;
        let mut cancelled_amount = 0.0;
        for installment in installments
            .iter_mut()
            .filter(|i| i.sale_id == sale_id && i.is_pending())
        {
            installment.cancel();
            cancelled_installments += 1;
            cancelled_amount += installment.amount;
        }
        store.save_installments(&installments)?;

        debug!(
            sale = %sale_id,
            cancelled_installments,
            cancelled_amount,
            "cancellation cascade applied"
        );
        Ok(CancellationOutcome {
            success: true,
            cancelled_installments,
            cancelled_amount,
        })
    }

    /// Flips the sale back to active. Cancelled installments stay cancelled;
    /// restoring them is a deliberate non-behavior (see DESIGN notes).
    pub fn reactivate(store: &dyn RecordStore, sale_id: Uuid) -> Result<(), CoreError> {
        Self::set_status(store, sale_id, SaleStatus::Active)
    }

    /// Archives the sale as completed. No installment cascade.
    pub fn archive(store: &dyn RecordStore, sale_id: Uuid) -> Result<ArchiveOutcome, CoreError> {
        match Self::set_status(store, sale_id, SaleStatus::Completed) {
            Ok(()) => Ok(ArchiveOutcome { success: true }),
            Err(CoreError::SaleNotFound(_)) => Ok(ArchiveOutcome { success: false }),
            Err(err) => Err(err),
        }
    }

    /// Hard-deletes the sale and every installment it owns.
    pub fn delete(store: &dyn RecordStore, sale_id: Uuid) -> Result<(), CoreError> {
        let mut sales = store.load_sales()?;
        let before = sales.len();
        sales.retain(|s| s.id != sale_id);
        if sales.len() == before {
            return Err(CoreError::SaleNotFound(sale_id));
        }
        store.save_sales(&sales)?;

        let mut installments = store.load_installments()?;
        installments.retain(|i| i.sale_id != sale_id);
        store.save_installments(&installments)?;

        info!(sale = %sale_id, "sale and schedule deleted");
        Ok(())
    }

    /// Records a collection: pending → received with date and optional notes.
    pub fn receive_installment(
        store: &dyn RecordStore,
        installment_id: Uuid,
        received_date: NaiveDate,
        notes: Option<String>,
    ) -> Result<Installment, CoreError> {
        Self::update_installment(store, installment_id, |installment| {
            if installment.status != InstallmentStatus::Pending {
                return Err(CoreError::InvalidOperation(format!(
                    "installment {} is {}, only pending installments can be received",
                    installment.id, installment.status
                )));
            }
            installment.mark_received(received_date, notes);
            Ok(())
        })
    }

    /// Undoes a receipt: received → pending, clearing date and notes.
    pub fn revert_receipt(
        store: &dyn RecordStore,
        installment_id: Uuid,
    ) -> Result<Installment, CoreError> {
        Self::update_installment(store, installment_id, |installment| {
            if installment.status != InstallmentStatus::Received {
                return Err(CoreError::InvalidOperation(format!(
                    "installment {} is {}, only received installments can be reverted",
                    installment.id, installment.status
                )));
            }
            installment.revert_receipt();
            Ok(())
        })
    }

    /// All sales belonging to `user_id`, in stored order.
    pub fn sales_for_user(store: &dyn RecordStore, user_id: &str) -> Result<Vec<Sale>, CoreError> {
        let sales = store.load_sales()?;
        Ok(sales.into_iter().filter(|s| s.user_id == user_id).collect())
    }

    /// The sale's schedule ordered by installment number.
    pub fn installments_for_sale(
        store: &dyn RecordStore,
        sale_id: Uuid,
    ) -> Result<Vec<Installment>, CoreError> {
        let mut installments: Vec<Installment> = store
            .load_installments()?
            .into_iter()
            .filter(|i| i.sale_id == sale_id)
            .collect();
        installments.sort_by_key(|i| i.installment_number);
        Ok(installments)
    }

    fn set_status(
        store: &dyn RecordStore,
        sale_id: Uuid,
        status: SaleStatus,
    ) -> Result<(), CoreError> {
        let mut sales = store.load_sales()?;
        let sale = sales
            .iter_mut()
            .find(|s| s.id == sale_id)
            .ok_or(CoreError::SaleNotFound(sale_id))?;
        sale.status = status;
        sale.touch();
        store.save_sales(&sales)?;
        Ok(())
    }

    fn update_installment(
        store: &dyn RecordStore,
        installment_id: Uuid,
        apply: impl FnOnce(&mut Installment) -> Result<(), CoreError>,
    ) -> Result<Installment, CoreError> {
        let mut installments = store.load_installments()?;
        let installment = installments
            .iter_mut()
            .find(|i| i.id == installment_id)
            .ok_or(CoreError::InstallmentNotFound(installment_id))?;
        apply(installment)?;
        let updated = installment.clone();
        store.save_installments(&installments)?;
        Ok(updated)
    }

    fn validate_draft(draft: &SaleDraft) -> Result<(), CoreError> {
        if draft.property_name.trim().is_empty() {
            return Err(CoreError::Validation("property name is required".into()));
        }
        if draft.client_name.trim().is_empty() {
            return Err(CoreError::Validation("client name is required".into()));
        }
        if !(draft.total_value > 0.0) || !draft.total_value.is_finite() {
            return Err(CoreError::Validation(
                "total value must be positive".into(),
            ));
        }
        if !(MIN_INSTALLMENTS..=MAX_INSTALLMENTS).contains(&draft.total_installments) {
            return Err(CoreError::Validation(format!(
                "installment count must be between {} and {}",
                MIN_INSTALLMENTS, MAX_INSTALLMENTS
            )));
        }
        Ok(())
    }
}
