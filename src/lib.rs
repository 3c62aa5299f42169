//! persondb - A person registry served over HTTP and persisted to a CSV log
//!
//! The interesting part is [`store`]: an in-memory map and a flat-file log
//! kept consistent under one reader/writer lock, with the log reloaded into
//! memory before every create and update.

pub mod cli;
pub mod http_server;
pub mod observability;
pub mod person;
pub mod store;
