//! carteira-domain
//!
//! Pure domain models (Sale, Installment, MonthlyTarget, dashboard metrics).
//! No I/O, no storage. Only data types, core enums, and calendar helpers.

pub mod common;
pub mod installment;
pub mod metrics;
pub mod sale;
pub mod target;

pub use common::*;
pub use installment::*;
pub use metrics::*;
pub use sale::*;
pub use target::*;
