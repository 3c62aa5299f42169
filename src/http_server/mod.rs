//! # persondb HTTP Server Module
//!
//! Axum server exposing the person registry.
//!
//! # Endpoints
//!
//! - `/health` - Health check
//! - `/api` - List (GET) and create (POST) persons
//! - `/api/:id` - Read (GET), rename (PUT/PATCH) and delete (DELETE) one person

pub mod config;
pub mod health_routes;
pub mod person_routes;
pub mod server;

pub use config::HttpServerConfig;
pub use person_routes::{ErrorResponse, MessageResponse, PersonState};
pub use server::HttpServer;
