//! # Route Sets
//!
//! - [`posts`] - the posts CRUD resource
//! - [`basics`] - middleware, parameters and a token-protected route
//! - [`errors`] - the error channel and its ordering pitfall
//!
//! Only `posts` touches the store; the other two are generic over the state.

pub mod basics;
pub mod errors;
pub mod posts;

use crate::clients::PostsClient;
use crate::config::AppKind;
use rest_framework::Pipeline;

/// Handed by reference to every stage.
#[derive(Clone)]
pub struct AppState {
    pub posts: PostsClient,
}

pub fn build(app: AppKind) -> Pipeline<AppState> {
    match app {
        AppKind::Posts => posts::pipeline(),
        AppKind::Basics => basics::pipeline(),
        AppKind::Errors => errors::pipeline(),
    }
}
