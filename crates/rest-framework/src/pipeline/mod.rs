//! # Request Pipeline
//!
//! An ordered list of stages every request walks through, in registration order:
//!
//! ```text
//!   use_handler(logger) ──▶ get("/posts") ──▶ use_handler(guard) ──▶ on_error(h) ──▶ (404)
//!        │ Next                │ Respond ────────────────────────────────────────▶ done
//!        ▼                     ▼
//!   Fail(err) skips every normal stage until the next on_error stage
//! ```
//!
//! - A normal stage runs when it matches (method and pattern for routes, prefix for mounted
//!   middleware) and no error is pending.
//! - An error stage runs only while an error is pending. It either resolves it with a response
//!   or hands it on.
//! - The first response ends traversal.
//! - Nothing responded and no error pending: `404 Cannot <METHOD> <path>`.
//! - Error still pending at the end: status from the error (500 when unset), message as body.
//!
//! An error stage registered *before* the stage that fails never sees that error.
//!
//! The shared state `S` is passed by reference to every stage; it is how handlers reach the
//! store (see `rest_sample::routes`).

pub mod builtins;
pub mod error;
pub mod handler;
pub mod pattern;
pub mod request;
pub mod response;

use self::error::HttpError;
use self::handler::{error_response, ErrorHandler, Flow, Handler};
use self::pattern::{prefix_matches, PathPattern};
use self::request::{Method, Request};
use self::response::Response;
use tracing::{debug, info, warn};

enum Stage<S> {
    Middleware {
        prefix: Option<String>,
        handler: Box<dyn Handler<S>>,
    },
    Route {
        method: Method,
        pattern: PathPattern,
        handler: Box<dyn Handler<S>>,
    },
    Error(Box<dyn ErrorHandler<S>>),
}

impl<S> Stage<S> {
    fn describe(&self) -> String {
        match self {
            Stage::Middleware { prefix: None, .. } => "middleware".to_string(),
            Stage::Middleware {
                prefix: Some(prefix),
                ..
            } => format!("middleware {prefix}"),
            Stage::Route {
                method, pattern, ..
            } => format!("{method} {}", pattern.as_str()),
            Stage::Error(_) => "error handler".to_string(),
        }
    }
}

/// Boxes a handler for [`Pipeline::route_chain`].
pub fn boxed<S, H>(handler: H) -> Box<dyn Handler<S>>
where
    S: Send + Sync + 'static,
    H: Handler<S> + 'static,
{
    Box::new(handler)
}

pub struct Pipeline<S> {
    stages: Vec<Stage<S>>,
}

impl<S: Send + Sync + 'static> Default for Pipeline<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Send + Sync + 'static> Pipeline<S> {
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// Middleware that runs for every request.
    pub fn use_handler(mut self, handler: impl Handler<S> + 'static) -> Self {
        self.stages.push(Stage::Middleware {
            prefix: None,
            handler: Box::new(handler),
        });
        self
    }

    /// Middleware that runs for `prefix` and every path below it.
    pub fn use_at(mut self, prefix: &str, handler: impl Handler<S> + 'static) -> Self {
        self.stages.push(Stage::Middleware {
            prefix: Some(prefix.to_string()),
            handler: Box::new(handler),
        });
        self
    }

    pub fn route(self, method: Method, pattern: &str, handler: impl Handler<S> + 'static) -> Self {
        self.route_chain(method, pattern, [boxed(handler)])
    }

    /// Several handlers for one route, run in order while each returns `Flow::Next`.
    pub fn route_chain(
        mut self,
        method: Method,
        pattern: &str,
        handlers: impl IntoIterator<Item = Box<dyn Handler<S>>>,
    ) -> Self {
        let pattern = PathPattern::parse(pattern);
        for handler in handlers {
            self.stages.push(Stage::Route {
                method,
                pattern: pattern.clone(),
                handler,
            });
        }
        self
    }

    pub fn get(self, pattern: &str, handler: impl Handler<S> + 'static) -> Self {
        self.route(Method::Get, pattern, handler)
    }

    pub fn post(self, pattern: &str, handler: impl Handler<S> + 'static) -> Self {
        self.route(Method::Post, pattern, handler)
    }

    pub fn put(self, pattern: &str, handler: impl Handler<S> + 'static) -> Self {
        self.route(Method::Put, pattern, handler)
    }

    pub fn patch(self, pattern: &str, handler: impl Handler<S> + 'static) -> Self {
        self.route(Method::Patch, pattern, handler)
    }

    pub fn delete(self, pattern: &str, handler: impl Handler<S> + 'static) -> Self {
        self.route(Method::Delete, pattern, handler)
    }

    pub fn on_error(mut self, handler: impl ErrorHandler<S> + 'static) -> Self {
        self.stages.push(Stage::Error(Box::new(handler)));
        self
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Runs `req` through the stages until one responds. Always produces a response.
    pub async fn handle(&self, mut req: Request, state: &S) -> Response {
        let mut pending: Option<HttpError> = None;

        for (index, stage) in self.stages.iter().enumerate() {
            let flow = match (stage, pending.take()) {
                (Stage::Error(handler), Some(err)) => {
                    debug!(stage = index, status = ?err.status(), "Dispatching error handler");
                    match handler.handle(err, &req, state).await {
                        Ok(response) => Flow::Respond(response),
                        Err(err) => Flow::Fail(err),
                    }
                }
                (Stage::Error(_), None) => continue,
                (_, Some(err)) => {
                    pending = Some(err);
                    continue;
                }
                (Stage::Middleware { prefix, handler }, None) => {
                    if let Some(prefix) = prefix {
                        if !prefix_matches(prefix, &req.path) {
                            continue;
                        }
                    }
                    debug!(stage = index, kind = %stage.describe(), "Dispatching");
                    handler.call(&mut req, state).await
                }
                (
                    Stage::Route {
                        method,
                        pattern,
                        handler,
                    },
                    None,
                ) => {
                    if *method != req.method {
                        continue;
                    }
                    let Some(params) = pattern.matches(&req.path) else {
                        continue;
                    };
                    req.params = params;
                    debug!(stage = index, kind = %stage.describe(), "Dispatching");
                    handler.call(&mut req, state).await
                }
            };

            match flow {
                Flow::Respond(response) => {
                    info!(
                        method = %req.method,
                        path = %req.path,
                        status = response.status,
                        stage = %stage.describe(),
                        "Responded"
                    );
                    return response;
                }
                Flow::Next => {}
                Flow::Fail(err) => {
                    debug!(stage = index, error = %err, "Failing to error chain");
                    pending = Some(err);
                }
            }
        }

        match pending {
            Some(err) => {
                warn!(
                    method = %req.method,
                    path = %req.path,
                    status = err.status_or_default(),
                    error = %err,
                    "Unhandled error"
                );
                error_response(&err)
            }
            None => {
                debug!(method = %req.method, path = %req.path, "No stage responded");
                Response::text(format!("Cannot {} {}", req.method, req.path)).with_status(404)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::handler::{async_fn, default_error_handler, error_fn, handler_fn, wrap_async};
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counting(counter: &Arc<AtomicUsize>) -> impl Handler<()> {
        let counter = Arc::clone(counter);
        handler_fn(move |_req: &mut Request, _: &()| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Flow::Next)
        })
    }

    fn respond(body: &'static str) -> impl Handler<()> {
        handler_fn(move |_req: &mut Request, _: &()| Ok(Response::text(body).into()))
    }

    fn fail(err: HttpError) -> impl Handler<()> {
        handler_fn(move |_req: &mut Request, _: &()| Ok(Flow::Fail(err.clone())))
    }

    #[tokio::test]
    async fn first_response_stops_traversal() {
        let counter = Arc::new(AtomicUsize::new(0));
        let pipeline = Pipeline::new()
            .use_handler(counting(&counter))
            .use_handler(counting(&counter))
            .get("/", respond("Root Route"))
            .use_handler(counting(&counter))
            .use_handler(counting(&counter));

        let response = pipeline.handle(Request::get("/"), &()).await;

        assert_eq!(response.text_body(), Some("Root Route"));
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn fail_skips_to_nearest_later_error_handler() {
        let counter = Arc::new(AtomicUsize::new(0));
        let pipeline = Pipeline::new()
            .on_error(error_fn(|_err: HttpError, _req: &Request, _: &()| {
                Ok(Response::text("too early"))
            }))
            .use_handler(fail(HttpError::forbidden("nope")))
            .use_handler(counting(&counter))
            .get("/", respond("unreachable"))
            .on_error(error_fn(|err: HttpError, _req: &Request, _: &()| {
                Ok(Response::text(format!("caught {}", err.message())).with_status(418))
            }))
            .on_error(error_fn(|_err: HttpError, _req: &Request, _: &()| {
                Ok(Response::text("too late"))
            }));

        let response = pipeline.handle(Request::get("/"), &()).await;

        assert_eq!(response.status, 418);
        assert_eq!(response.text_body(), Some("caught nope"));
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn error_handlers_are_skipped_without_pending_error() {
        let pipeline = Pipeline::new()
            .on_error(default_error_handler())
            .get("/", respond("ok"));

        let response = pipeline.handle(Request::get("/"), &()).await;
        assert_eq!(response.text_body(), Some("ok"));
    }

    #[tokio::test]
    async fn error_handler_can_repropagate() {
        let pipeline = Pipeline::new()
            .use_handler(fail(HttpError::msg("first")))
            .on_error(error_fn(|err: HttpError, _req: &Request, _: &()| {
                Err(HttpError::new(401, format!("{} then second", err.message())))
            }))
            .on_error(default_error_handler());

        let response = pipeline.handle(Request::get("/"), &()).await;
        assert_eq!(response.status, 401);
        assert_eq!(response.text_body(), Some("first then second"));
    }

    #[tokio::test]
    async fn synchronous_err_becomes_fail() {
        let pipeline = Pipeline::new()
            .get(
                "/admin",
                handler_fn(|_req: &mut Request, _: &()| {
                    Err(HttpError::forbidden("Access to admin forbidden"))
                }),
            )
            .on_error(default_error_handler());

        let response = pipeline.handle(Request::get("/admin"), &()).await;
        assert_eq!(response.status, 403);
        assert_eq!(response.text_body(), Some("Access to admin forbidden"));
    }

    #[tokio::test]
    async fn async_failures_reach_errors_only_when_forwarded() {
        let pipeline = Pipeline::new()
            .get(
                "/forwarded",
                async_fn(|_req: &mut Request, _: &()| {
                    Box::pin(async move {
                        tokio::task::yield_now().await;
                        Flow::Fail(HttpError::msg("something went wrong!"))
                    })
                }),
            )
            .get(
                "/wrapped",
                wrap_async(|_req: &mut Request, _: &()| {
                    Box::pin(async move {
                        tokio::task::yield_now().await;
                        Err::<Flow, _>(HttpError::msg("Async operation failed"))
                    })
                }),
            )
            .on_error(default_error_handler());

        let response = pipeline.handle(Request::get("/forwarded"), &()).await;
        assert_eq!(response.status, 500);
        assert_eq!(response.text_body(), Some("something went wrong!"));

        let response = pipeline.handle(Request::get("/wrapped"), &()).await;
        assert_eq!(response.status, 500);
        assert_eq!(response.text_body(), Some("Async operation failed"));
    }

    #[tokio::test]
    async fn route_chain_runs_in_order_and_sees_params() {
        let pipeline = Pipeline::new().route_chain(
            Method::Get,
            "/users/:name",
            [
                boxed(handler_fn(|req: &mut Request, _: &()| {
                    req.set_local("greeting", "hello");
                    Ok(Flow::Next)
                })),
                boxed(handler_fn(|req: &mut Request, _: &()| {
                    let greeting = req.local("greeting").unwrap_or_default().to_string();
                    let name = req.param("name").unwrap_or_default().to_string();
                    Ok(Response::text(format!("{greeting} {name}")).into())
                })),
            ],
        );

        let response = pipeline.handle(Request::get("/users/bob"), &()).await;
        assert_eq!(response.text_body(), Some("hello bob"));
    }

    #[tokio::test]
    async fn prefix_middleware_only_runs_below_prefix() {
        let counter = Arc::new(AtomicUsize::new(0));
        let pipeline = Pipeline::new()
            .use_at("/random", counting(&counter))
            .get("/random", respond("Random Page"))
            .get("/randomness", respond("other"));

        pipeline.handle(Request::get("/random"), &()).await;
        pipeline.handle(Request::get("/randomness"), &()).await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn method_mismatch_falls_through() {
        let pipeline = Pipeline::new().post("/posts", respond("created"));
        let response = pipeline.handle(Request::get("/posts"), &()).await;
        assert_eq!(response.status, 404);
        assert_eq!(response.text_body(), Some("Cannot GET /posts"));
    }

    #[tokio::test]
    async fn unhandled_error_still_responds() {
        let pipeline = Pipeline::new().use_handler(fail(HttpError::msg("ACCESS DENIED!")));
        let response = pipeline.handle(Request::get("/api"), &()).await;
        assert_eq!(response.status, 500);
        assert_eq!(response.text_body(), Some("ACCESS DENIED!"));
    }
}
