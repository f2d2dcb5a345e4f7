//! carteira-core
//!
//! Business logic and services for Carteira.
//! Depends on carteira-domain. No CLI, no terminal I/O, no direct storage
//! interactions beyond the [`RecordStore`] abstraction.

pub mod error;
pub mod metrics_service;
pub mod sale_service;
pub mod schedule_service;
pub mod store;
pub mod target_service;

pub use error::CoreError;
pub use metrics_service::*;
pub use sale_service::*;
pub use schedule_service::*;
pub use store::*;
pub use target_service::*;
