//! # Posts Service
//!
//! A small web service built on [`rest_framework`].
//!
//! ## 🚀 Core Components
//!
//! - **[lifecycle](rest_sample::lifecycle)**: Starts the posts store with its three sample posts and stops it on exit.
//! - **[clients](rest_sample::clients)**: [`PostsClient`](rest_sample::clients::PostsClient) hides the store's message passing.
//! - **[routes](rest_sample::routes)**: The `posts`, `basics` and `errors` pipelines.
//! - **[server](rest_sample::server)**: axum adapter, static files and graceful shutdown.
//!
//! ## 📚 Quick Start
//!
//! ```bash
//! RUST_LOG=info cargo run -p rest-sample
//! curl -i localhost:8080/posts
//! curl -i -X POST -d 'username=Bob&content=hi' localhost:8080/posts
//! RUST_APP=errors cargo run -p rest-sample   # then GET /api, /admin, /err, /asyncExample
//! ```
//!
//! ## 🧪 Testing
//!
//! See [`rest_framework::mock`] for utilities to test routes without spawning the store.

use rest_framework::tracing::setup_tracing;
use rest_sample::config::Config;
use rest_sample::error::AppError;
use rest_sample::lifecycle::PostSystem;
use rest_sample::routes::{self, AppState};
use rest_sample::server::{self, JsonViews};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Setup tracing once for the entire application
    setup_tracing();

    let config = Config::load()?;
    info!(?config, "Starting application");

    let system = PostSystem::new(config.store_buffer)?;
    let state = AppState {
        posts: system.posts_client.clone(),
    };

    let app = server::router(
        routes::build(config.app),
        state,
        JsonViews,
        config.public_dir.as_deref(),
    );
    server::serve(config.port, app).await?;

    // The router and its state are gone; stop the store
    system.shutdown().await?;

    info!("Application stopped");
    Ok(())
}
