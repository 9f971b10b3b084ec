//! # REST Framework
//!
//! Building blocks for small CRUD web services: an ordered in-memory **resource store** owned by
//! an actor, and a **request pipeline** of middleware, routes and error handlers that reaches the
//! store through a cloneable client.
//!
//! ## Architecture Overview
//!
//! 1. **Entity Layer** ([`ResourceEntity`], [`Record`]) - what is stored and how updates apply
//! 2. **Store Layer** ([`ResourceStore`], [`ResourceActor`]) - ordered records, one operation at a time
//! 3. **Interface Layer** ([`ResourceClient`], [`EntityClient`]) - typed async access to the store
//! 4. **Pipeline Layer** ([`Pipeline`]) - routes requests through stages to a [`Response`]
//!
//! ## Resource Store
//!
//! Records keep creation order. Ids come from a generator injected at construction and are never
//! handed out twice, even after the record holding one is deleted.
//!
//! | Operation | Result | Failure |
//! |-----------|--------|---------|
//! | `create(fields)` | new record, appended | `DuplicateId` if the generator repeats |
//! | `list_all()` | every record in creation order | - |
//! | `get_by_id(id)` | the record | `NotFound` |
//! | `update(id, fields)` | record with fields merged in | `NotFound` |
//! | `delete_by_id(id)` | the removed record | `NotFound` |
//!
//! ## Request Pipeline
//!
//! ```rust
//! use rest_framework::pipeline::handler::{default_error_handler, handler_fn, Flow};
//! use rest_framework::{HttpError, Pipeline, Request, Response};
//!
//! #[tokio::main]
//! async fn main() {
//!     let pipeline = Pipeline::new()
//!         .get("/", handler_fn(|_req: &mut Request, _: &()| Ok(Response::text("Root Route").into())))
//!         .get("/admin", handler_fn(|_req: &mut Request, _: &()| -> Result<Flow, HttpError> {
//!             Err(HttpError::forbidden("Access to admin forbidden"))
//!         }))
//!         .on_error(default_error_handler());
//!
//!     let ok = pipeline.handle(Request::get("/"), &()).await;
//!     assert_eq!(ok.text_body(), Some("Root Route"));
//!
//!     let denied = pipeline.handle(Request::get("/admin"), &()).await;
//!     assert_eq!(denied.status, 403);
//! }
//! ```
//!
//! ## Concurrency Model
//!
//! - The store lives inside one Tokio task; every operation is a message
//! - Requests may be suspended at any `.await` inside a stage while others make progress
//! - No store operation is ever interleaved with another
//!
//! ## Testing
//!
//! [`mock::MockClient`] answers store requests from scripted expectations, so route handlers can
//! be tested without spawning an actor.

pub mod actor;
pub mod client;
pub mod client_trait;
pub mod entity;
pub mod error;
pub mod message;
pub mod mock;
pub mod pipeline;
pub mod record;
pub mod store;
pub mod tracing;

pub use actor::ResourceActor;
pub use client::ResourceClient;
pub use client_trait::EntityClient;
pub use entity::ResourceEntity;
pub use error::{FrameworkError, StoreError};
pub use pipeline::error::{ErrorKind, HttpError};
pub use pipeline::request::{Method, Request};
pub use pipeline::response::{Body, Response};
pub use pipeline::Pipeline;
pub use record::{Fields, Record};
pub use store::ResourceStore;
