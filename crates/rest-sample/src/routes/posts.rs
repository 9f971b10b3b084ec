//! # Posts
//!
//! | Method | Path | Does | Responds |
//! |--------|------|------|----------|
//! | GET | `/posts` | list | view `index` with `{posts}` |
//! | GET | `/posts/new` | - | view `new` |
//! | POST | `/posts` | create from `username`, `content` | redirect `/posts` |
//! | GET | `/posts/:id` | get | view `show` with `{post}` (`null` when absent) |
//! | GET | `/posts/:id/edit` | get | view `edit` with `{post}` (`null` when absent) |
//! | PATCH | `/posts/:id` | replace `content` | redirect `/posts`, 404 when absent |
//! | DELETE | `/posts/:id` | delete | redirect `/posts`, 404 when absent |
//!
//! HTML forms reach PATCH and DELETE by posting with `?_method=PATCH` / `?_method=DELETE`.

use super::AppState;
use async_trait::async_trait;
use rest_framework::pipeline::builtins::{method_override, request_logger};
use rest_framework::pipeline::handler::{
    default_error_handler, handler_fn, FallibleHandler, Flow, WrapAsync,
};
use rest_framework::{EntityClient, HttpError, Pipeline, Request, Response};
use serde_json::json;

pub const INDEX: &str = "/posts";

pub fn pipeline() -> Pipeline<AppState> {
    Pipeline::new()
        .use_handler(request_logger())
        .use_handler(method_override("_method"))
        .get("/posts", WrapAsync::new(ListPosts))
        .get(
            "/posts/new",
            handler_fn(|_req: &mut Request, _: &AppState| {
                Ok(Response::render("new", json!({})).into())
            }),
        )
        .post("/posts", WrapAsync::new(CreatePost))
        .get("/posts/:id", WrapAsync::new(ShowPost { template: "show" }))
        .patch("/posts/:id", WrapAsync::new(UpdatePost))
        .get("/posts/:id/edit", WrapAsync::new(ShowPost { template: "edit" }))
        .delete("/posts/:id", WrapAsync::new(DeletePost))
        .on_error(default_error_handler())
}

fn post_id(req: &Request) -> String {
    req.param("id").unwrap_or_default().to_string()
}

struct ListPosts;

#[async_trait]
impl FallibleHandler<AppState> for ListPosts {
    async fn try_call(&self, _req: &mut Request, state: &AppState) -> Result<Flow, HttpError> {
        let posts = state.posts.list().await?;
        Ok(Response::render("index", json!({ "posts": posts })).into())
    }
}

struct CreatePost;

#[async_trait]
impl FallibleHandler<AppState> for CreatePost {
    async fn try_call(&self, req: &mut Request, state: &AppState) -> Result<Flow, HttpError> {
        state.posts.create_post(req.body.clone()).await?;
        Ok(Response::redirect(INDEX).into())
    }
}

/// Renders one post. An unknown id renders with `post: null` rather than failing.
struct ShowPost {
    template: &'static str,
}

#[async_trait]
impl FallibleHandler<AppState> for ShowPost {
    async fn try_call(&self, req: &mut Request, state: &AppState) -> Result<Flow, HttpError> {
        let post = state.posts.get(post_id(req)).await?;
        Ok(Response::render(self.template, json!({ "post": post })).into())
    }
}

struct UpdatePost;

#[async_trait]
impl FallibleHandler<AppState> for UpdatePost {
    async fn try_call(&self, req: &mut Request, state: &AppState) -> Result<Flow, HttpError> {
        let content = req.field("content").map(str::to_string);
        let post = state.posts.update_content(post_id(req), content).await?;
        tracing::info!(id = %post.id, content = ?post.get("content"), "Post updated");
        Ok(Response::redirect(INDEX).into())
    }
}

struct DeletePost;

#[async_trait]
impl FallibleHandler<AppState> for DeletePost {
    async fn try_call(&self, req: &mut Request, state: &AppState) -> Result<Flow, HttpError> {
        state.posts.delete(post_id(req)).await?;
        Ok(Response::redirect(INDEX).into())
    }
}
