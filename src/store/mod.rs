//! Persistence layer
//!
//! - [`RecordStore`]: in-memory map and id counter
//! - [`DurableLog`]: the CSV file on disk, via [`codec`]
//! - [`reconciler`]: reloads the log into the store before mutations
//! - [`PersonService`]: the lock that ties them together per request

pub mod codec;
mod durable_log;
mod errors;
pub mod reconciler;
mod record_store;
mod service;

pub use durable_log::DurableLog;
pub use errors::{IdOverflow, LogError, LogResult, PersistOp, StoreError, StoreResult};
pub use reconciler::ReloadReport;
pub use record_store::{RecordStore, FIRST_ID};
pub use service::PersonService;
