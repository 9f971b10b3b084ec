//! # Stages & Control Flow
//!
//! A normal stage returns a [`Flow`]: respond, continue, or fail. Failing hands an [`HttpError`]
//! to the nearest later error stage, skipping every normal stage in between.
//!
//! ## Where failures come from
//!
//! | Source | Reaches the error chain |
//! |--------|-------------------------|
//! | `Flow::Fail(err)` returned by any handler | yes |
//! | `Err(err)` from a [`handler_fn`] closure (synchronous throw) | yes, converted by the adapter |
//! | failure inside an [`async_fn`] future | only if the future returns `Flow::Fail` itself |
//! | `Err(err)` from a [`FallibleHandler`] or [`wrap_async`] closure | yes, converted by [`WrapAsync`] |
//!
//! A deferred computation that fails without returning `Flow::Fail` never reaches an error
//! stage. [`wrap_async`] exists so handlers can use `?` freely instead of forwarding by hand.

use super::error::HttpError;
use super::request::Request;
use super::response::Response;
use async_trait::async_trait;
use futures::future::BoxFuture;

/// Outcome of a normal stage.
#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    /// Terminate traversal with this response.
    Respond(Response),
    /// Advance to the next matching stage.
    Next,
    /// Transfer control to the error chain.
    Fail(HttpError),
}

impl From<Response> for Flow {
    fn from(response: Response) -> Self {
        Flow::Respond(response)
    }
}

/// A normal (or route) stage.
#[async_trait]
pub trait Handler<S: Send + Sync + 'static>: Send + Sync {
    async fn call(&self, req: &mut Request, state: &S) -> Flow;
}

/// An async stage that may fail with `?`. Register it through [`WrapAsync`].
#[async_trait]
pub trait FallibleHandler<S: Send + Sync + 'static>: Send + Sync {
    async fn try_call(&self, req: &mut Request, state: &S) -> Result<Flow, HttpError>;
}

/// An error stage. `Ok` terminates traversal; `Err` passes the (possibly new) error on.
#[async_trait]
pub trait ErrorHandler<S: Send + Sync + 'static>: Send + Sync {
    async fn handle(&self, err: HttpError, req: &Request, state: &S)
        -> Result<Response, HttpError>;
}

// =============================================================================
// Closure adapters
// =============================================================================

pub struct HandlerFn<F>(F);

/// Synchronous stage. Returning `Err` is the same as returning `Flow::Fail`.
pub fn handler_fn<S, F>(f: F) -> HandlerFn<F>
where
    S: Send + Sync + 'static,
    F: Fn(&mut Request, &S) -> Result<Flow, HttpError> + Send + Sync + 'static,
{
    HandlerFn(f)
}

#[async_trait]
impl<S, F> Handler<S> for HandlerFn<F>
where
    S: Send + Sync + 'static,
    F: Fn(&mut Request, &S) -> Result<Flow, HttpError> + Send + Sync,
{
    async fn call(&self, req: &mut Request, state: &S) -> Flow {
        (self.0)(req, state).unwrap_or_else(Flow::Fail)
    }
}

pub struct AsyncFn<F>(F);

/// Asynchronous stage with no automatic forwarding.
pub fn async_fn<S, F>(f: F) -> AsyncFn<F>
where
    S: Send + Sync + 'static,
    F: for<'a> Fn(&'a mut Request, &'a S) -> BoxFuture<'a, Flow> + Send + Sync + 'static,
{
    AsyncFn(f)
}

#[async_trait]
impl<S, F> Handler<S> for AsyncFn<F>
where
    S: Send + Sync + 'static,
    F: for<'a> Fn(&'a mut Request, &'a S) -> BoxFuture<'a, Flow> + Send + Sync,
{
    async fn call(&self, req: &mut Request, state: &S) -> Flow {
        (self.0)(req, state).await
    }
}

/// Adapts a [`FallibleHandler`] into a [`Handler`], turning every `Err` into `Flow::Fail`.
pub struct WrapAsync<H>(H);

impl<H> WrapAsync<H> {
    pub fn new(handler: H) -> Self {
        WrapAsync(handler)
    }
}

#[async_trait]
impl<S, H> Handler<S> for WrapAsync<H>
where
    S: Send + Sync + 'static,
    H: FallibleHandler<S>,
{
    async fn call(&self, req: &mut Request, state: &S) -> Flow {
        self.0.try_call(req, state).await.unwrap_or_else(Flow::Fail)
    }
}

pub struct TryFn<F>(F);

#[async_trait]
impl<S, F> FallibleHandler<S> for TryFn<F>
where
    S: Send + Sync + 'static,
    F: for<'a> Fn(&'a mut Request, &'a S) -> BoxFuture<'a, Result<Flow, HttpError>> + Send + Sync,
{
    async fn try_call(&self, req: &mut Request, state: &S) -> Result<Flow, HttpError> {
        (self.0)(req, state).await
    }
}

/// Closure form of [`WrapAsync`]: awaits `f` and forwards any late `Err` to the error chain.
pub fn wrap_async<S, F>(f: F) -> WrapAsync<TryFn<F>>
where
    S: Send + Sync + 'static,
    F: for<'a> Fn(&'a mut Request, &'a S) -> BoxFuture<'a, Result<Flow, HttpError>>
        + Send
        + Sync
        + 'static,
{
    WrapAsync(TryFn(f))
}

pub struct ErrorFn<F>(F);

/// Synchronous error stage.
pub fn error_fn<S, F>(f: F) -> ErrorFn<F>
where
    S: Send + Sync + 'static,
    F: Fn(HttpError, &Request, &S) -> Result<Response, HttpError> + Send + Sync + 'static,
{
    ErrorFn(f)
}

#[async_trait]
impl<S, F> ErrorHandler<S> for ErrorFn<F>
where
    S: Send + Sync + 'static,
    F: Fn(HttpError, &Request, &S) -> Result<Response, HttpError> + Send + Sync,
{
    async fn handle(
        &self,
        err: HttpError,
        req: &Request,
        state: &S,
    ) -> Result<Response, HttpError> {
        (self.0)(err, req, state)
    }
}

/// Answers with the error's status (500 when it has none) and its message as plain text.
pub struct DefaultErrorHandler;

pub fn default_error_handler() -> DefaultErrorHandler {
    DefaultErrorHandler
}

#[async_trait]
impl<S: Send + Sync + 'static> ErrorHandler<S> for DefaultErrorHandler {
    async fn handle(
        &self,
        err: HttpError,
        _req: &Request,
        _state: &S,
    ) -> Result<Response, HttpError> {
        Ok(error_response(&err))
    }
}

pub(crate) fn error_response(err: &HttpError) -> Response {
    Response::text(err.message()).with_status(err.status_or_default())
}
