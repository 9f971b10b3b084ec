//! The error channel, stage by stage.
//!
//! The first error handler is registered ahead of every route, so it is never reached by their
//! errors. `/err` and `/asyncExample` come after the last error handler and fall through to the
//! pipeline's own unhandled-error response.

use async_trait::async_trait;
use rest_framework::pipeline::handler::{
    async_fn, default_error_handler, error_fn, handler_fn, FallibleHandler, Flow, WrapAsync,
};
use rest_framework::{HttpError, Pipeline, Request, Response};
use std::time::Duration;

pub const DEFERRED_FAILURE_DELAY: Duration = Duration::from_millis(1000);

pub fn pipeline<S: Send + Sync + 'static>() -> Pipeline<S> {
    Pipeline::new()
        .on_error(error_fn(|err: HttpError, _req: &Request, _: &S| {
            Ok(Response::text(err.message()).with_status(404))
        }))
        .get(
            "/api",
            handler_fn(|_req: &mut Request, _: &S| {
                Ok(Flow::Fail(HttpError::unauthorized("Unauthorized User")))
            }),
        )
        .on_error(default_error_handler())
        .get(
            "/admin",
            handler_fn(|_req: &mut Request, _: &S| {
                Err(HttpError::forbidden("Access to admin forbidden"))
            }),
        )
        .on_error(default_error_handler())
        .get(
            "/err",
            async_fn(|_req: &mut Request, _: &S| Box::pin(deferred_failure())),
        )
        .get("/asyncExample", WrapAsync::new(AsyncExample))
}

/// Fails after a delay and forwards the failure itself.
async fn deferred_failure() -> Flow {
    tokio::time::sleep(DEFERRED_FAILURE_DELAY).await;
    Flow::Fail(HttpError::msg("something went wrong!"))
}

async fn rejected_operation() -> Result<(), HttpError> {
    tokio::task::yield_now().await;
    Err(HttpError::new(500, "Async operation failed"))
}

struct AsyncExample;

#[async_trait]
impl<S: Send + Sync + 'static> FallibleHandler<S> for AsyncExample {
    async fn try_call(&self, _req: &mut Request, _state: &S) -> Result<Flow, HttpError> {
        rejected_operation().await?;
        Ok(Response::text("This will never be reached").into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn get(path: &str) -> Response {
        pipeline::<()>().handle(Request::get(path), &()).await
    }

    #[tokio::test]
    async fn early_error_handler_never_sees_later_errors() {
        let response = get("/api").await;
        assert_eq!(response.status, 401);
        assert_eq!(response.text_body(), Some("Unauthorized User"));
    }

    #[tokio::test]
    async fn synchronous_throw() {
        let response = get("/admin").await;
        assert_eq!(response.status, 403);
        assert_eq!(response.text_body(), Some("Access to admin forbidden"));
    }

    #[tokio::test]
    async fn deferred_failures() {
        let response = get("/err").await;
        assert_eq!(response.status, 500);
        assert_eq!(response.text_body(), Some("something went wrong!"));

        let response = get("/asyncExample").await;
        assert_eq!(response.status, 500);
        assert_eq!(response.text_body(), Some("Async operation failed"));
    }

    #[tokio::test]
    async fn unknown_path() {
        let response = get("/nothing").await;
        assert_eq!(response.status, 404);
        assert_eq!(response.text_body(), Some("Cannot GET /nothing"));
    }
}
