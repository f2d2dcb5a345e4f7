use std::sync::Mutex;

use carteira_domain::{Installment, MonthlyTarget, Sale};

use crate::CoreError;

/// Abstraction over persistence backends holding the three record
/// collections. Every operation is a whole-collection read or write; the
/// store is assumed durable, synchronous, and single-process.
pub trait RecordStore: Send + Sync {
    fn load_sales(&self) -> Result<Vec<Sale>, CoreError>;
    fn save_sales(&self, sales: &[Sale]) -> Result<(), CoreError>;
    fn load_installments(&self) -> Result<Vec<Installment>, CoreError>;
    fn save_installments(&self, installments: &[Installment]) -> Result<(), CoreError>;
    fn load_targets(&self) -> Result<Vec<MonthlyTarget>, CoreError>;
    fn save_targets(&self, targets: &[MonthlyTarget]) -> Result<(), CoreError>;

    /// Removes every record from all three collections. Backends may
    /// override this to drop their underlying storage instead of writing
    /// empty collections.
    fn clear(&self) -> Result<(), CoreError> {
        self.save_sales(&[])?;
        self.save_installments(&[])?;
        self.save_targets(&[])
    }
}

/// Volatile in-memory store for tests and demo sessions.
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    sales: Mutex<Vec<Sale>>,
    installments: Mutex<Vec<Installment>>,
    targets: Mutex<Vec<MonthlyTarget>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for MemoryRecordStore {
    fn load_sales(&self) -> Result<Vec<Sale>, CoreError> {
        Ok(self.sales.lock().expect("sales lock poisoned").clone())
    }

    fn save_sales(&self, sales: &[Sale]) -> Result<(), CoreError> {
        *self.sales.lock().expect("sales lock poisoned") = sales.to_vec();
        Ok(())
    }

    fn load_installments(&self) -> Result<Vec<Installment>, CoreError> {
        Ok(self
            .installments
            .lock()
            .expect("installments lock poisoned")
            .clone())
    }

    fn save_installments(&self, installments: &[Installment]) -> Result<(), CoreError> {
        *self
            .installments
            .lock()
            .expect("installments lock poisoned") = installments.to_vec();
        Ok(())
    }

    fn load_targets(&self) -> Result<Vec<MonthlyTarget>, CoreError> {
        Ok(self.targets.lock().expect("targets lock poisoned").clone())
    }

    fn save_targets(&self, targets: &[MonthlyTarget]) -> Result<(), CoreError> {
        *self.targets.lock().expect("targets lock poisoned") = targets.to_vec();
        Ok(())
    }
}
