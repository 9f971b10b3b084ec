//! # Posts Service Library
//!
//! This library exposes the service's modules for integration testing.

pub mod clients;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod routes;
pub mod server;
