//! # Observability & Tracing
//!
//! [`setup_tracing`] initializes structured logging with the `tracing` crate.
//!
//! ## Configuration
//!
//! The compact format hides the crate/module prefix (`with_target(false)`); store logs carry an
//! `entity_type` field and pipeline logs carry `method`/`path`/`stage` instead.
//!
//! ```bash
//! # Request outcomes and store mutations
//! RUST_LOG=info cargo run
//!
//! # Every dispatched stage and full payloads
//! RUST_LOG=debug cargo run
//!
//! # Only the pipeline
//! RUST_LOG=rest_framework::pipeline=debug cargo run
//! ```
//!
//! ## Trace Example
//!
//! **With `RUST_LOG=info`**, a create followed by the redirect target:
//!
//! ```text
//! INFO Actor started entity_type="Record" size=3
//! INFO Request method=POST host=localhost path=/posts time="Sun Oct 18 2026"
//! INFO Created entity_type="Record" id=6f1c2a0e-… size=4
//! INFO Responded method=POST path=/posts status=302 stage=POST /posts
//! INFO Request method=GET host=localhost path=/posts time="Sun Oct 18 2026"
//! INFO Responded method=GET path=/posts status=200 stage=GET /posts
//! ```

/// Installs the global subscriber. Call once, at startup.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
