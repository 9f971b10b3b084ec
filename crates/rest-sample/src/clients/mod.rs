//! Domain clients over the framework's generic `ResourceClient`.

pub mod posts_client;

pub use posts_client::{PostsClient, PostsError};
