//! Logger, prefix middleware, a token-protected route, path and query parameters, a register
//! form read from the query on GET and from the body on POST, and a catch-all page.

use rest_framework::pipeline::boxed;
use rest_framework::pipeline::builtins::request_logger;
use rest_framework::pipeline::handler::{handler_fn, Flow, Handler};
use rest_framework::{HttpError, Method, Pipeline, Request, Response};
use serde_json::json;
use tracing::info;

pub const TOKEN: &str = "giveaccess";

pub fn pipeline<S: Send + Sync + 'static>() -> Pipeline<S> {
    Pipeline::new()
        .use_handler(request_logger())
        .use_at(
            "/random",
            handler_fn(|req: &mut Request, _: &S| {
                info!(path = %req.path, "Middleware working for /random route");
                Ok(Flow::Next)
            }),
        )
        .get(
            "/access",
            handler_fn(|_req: &mut Request, _: &S| {
                Ok(Response::render("access", json!({})).into())
            }),
        )
        .route_chain(
            Method::Get,
            "/api",
            [
                boxed(check_token()),
                boxed(text("Access granted! Here's your data.")),
            ],
        )
        .get("/", text("Root Route"))
        .get("/random", text("Random Page"))
        .get(
            "/search",
            handler_fn(|req: &mut Request, _: &S| {
                let body = match req.query_param("q") {
                    Some(q) if !q.is_empty() => format!("searched results for query: {q}"),
                    _ => "no results found".to_string(),
                };
                Ok(Response::text(body).into())
            }),
        )
        .get(
            "/register",
            handler_fn(|req: &mut Request, _: &S| {
                let user = req.query_param("user").unwrap_or_default();
                info!(user, "Register via query");
                Ok(Response::text("standard GET response").into())
            }),
        )
        .post(
            "/register",
            handler_fn(|req: &mut Request, _: &S| {
                let user = req.field("user").unwrap_or_default();
                info!(user, "Register via body");
                Ok(Response::text("standard POST response").into())
            }),
        )
        .get(
            "/:username/:id",
            handler_fn(|req: &mut Request, _: &S| {
                let username = req.param("username").unwrap_or_default();
                let id = req.param("id").unwrap_or_default();
                Ok(Response::text(format!("welcome to the page {username} with id {id}")).into())
            }),
        )
        .use_handler(text("Page not Found!"))
}

/// Guards a route on the `token` query parameter.
///
/// - missing or empty: answers with a prompt and stops
/// - [`TOKEN`], ignoring case and surrounding whitespace: continues
/// - anything else: fails with no status
pub fn check_token<S: Send + Sync + 'static>() -> impl Handler<S> {
    handler_fn(|req: &mut Request, _: &S| match req.query_param("token") {
        None | Some("") => Ok(Response::text("Please provide an access token.").into()),
        Some(token) if token.trim().eq_ignore_ascii_case(TOKEN) => Ok(Flow::Next),
        Some(_) => Err(HttpError::msg("ACCESS DENIED!")),
    })
}

fn text<S: Send + Sync + 'static>(body: &'static str) -> impl Handler<S> {
    handler_fn(move |_req: &mut Request, _: &S| Ok(Response::text(body).into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn get(req: Request) -> Response {
        pipeline::<()>().handle(req, &()).await
    }

    #[tokio::test]
    async fn token_guard() {
        let granted = get(Request::get("/api").with_query("token", " GiveAccess ")).await;
        assert_eq!(granted.status, 200);
        assert_eq!(granted.text_body(), Some("Access granted! Here's your data."));

        let missing = get(Request::get("/api")).await;
        assert_eq!(missing.status, 200);
        assert_eq!(missing.text_body(), Some("Please provide an access token."));

        let denied = get(Request::get("/api").with_query("token", "wrong")).await;
        assert_eq!(denied.status, 500);
        assert_eq!(denied.text_body(), Some("ACCESS DENIED!"));
    }

    #[tokio::test]
    async fn parameters() {
        let search = get(Request::get("/search").with_query("q", "rust")).await;
        assert_eq!(search.text_body(), Some("searched results for query: rust"));

        let empty = get(Request::get("/search")).await;
        assert_eq!(empty.text_body(), Some("no results found"));

        let user = get(Request::get("/govind/123")).await;
        assert_eq!(user.text_body(), Some("welcome to the page govind with id 123"));

        let encoded = get(Request::get("/john%20doe/1")).await;
        assert_eq!(encoded.text_body(), Some("welcome to the page john doe with id 1"));
    }

    #[tokio::test]
    async fn register_by_method() {
        let query = get(Request::get("/register").with_query("user", "ann")).await;
        assert_eq!(query.text_body(), Some("standard GET response"));

        let form = get(Request::post("/register").with_field("user", "ann")).await;
        assert_eq!(form.text_body(), Some("standard POST response"));

        let other = get(Request::delete("/register")).await;
        assert_eq!(other.text_body(), Some("Page not Found!"));
    }

    #[tokio::test]
    async fn catch_all() {
        let page = get(Request::get("/random")).await;
        assert_eq!(page.text_body(), Some("Random Page"));

        let missing = get(Request::get("/a/b/c")).await;
        assert_eq!(missing.status, 200);
        assert_eq!(missing.text_body(), Some("Page not Found!"));

        let post = get(Request::post("/")).await;
        assert_eq!(post.text_body(), Some("Page not Found!"));
    }
}
