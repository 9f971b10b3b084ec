//! # System Lifecycle
//!
//! Starting, seeding and stopping the posts store.
//!
//! ## Startup
//!
//! 1. **Create** - `ResourceActor::<Record>::new` returns the store actor and its client
//! 2. **Seed** - the three sample posts are inserted before the loop starts, so they are first
//!    in every listing
//! 3. **Spawn** - the actor runs in its own task; the client is cloned into the server state
//!
//! ## Graceful Shutdown
//!
//! 1. **Stop accepting requests** - the server returns after Ctrl+C / SIGTERM
//! 2. **Drop all clients** - the router (and its cloned state) is dropped, then
//!    [`PostSystem::shutdown`] drops the last one
//! 3. **Actor detects closure** - `receiver.recv()` returns `None`, the final size is logged
//! 4. **Await completion** - the store task is joined
//!
//! ```rust
//! use rest_sample::lifecycle::PostSystem;
//! use rest_framework::EntityClient;
//! use std::num::NonZeroUsize;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let buffer = NonZeroUsize::new(32).ok_or("buffer must be non-zero")?;
//!     let system = PostSystem::new(buffer)?;
//!     let posts = system.posts_client.list().await?;
//!     assert_eq!(posts.len(), 3);
//!     system.shutdown().await?;
//!     Ok(())
//! }
//! ```

pub mod post_system;

pub use post_system::*;
