//! Stock middleware.

use super::handler::{Flow, Handler};
use super::request::{Method, Request};
use async_trait::async_trait;
use tracing::{debug, info};

/// Rewrites a `POST` to the method named by the query parameter `key`, so plain HTML forms can
/// reach `PATCH` and `DELETE` routes. Unknown method names are ignored.
pub struct MethodOverride {
    key: String,
}

pub fn method_override(key: impl Into<String>) -> MethodOverride {
    MethodOverride { key: key.into() }
}

#[async_trait]
impl<S: Send + Sync + 'static> Handler<S> for MethodOverride {
    async fn call(&self, req: &mut Request, _state: &S) -> Flow {
        if req.method != Method::Post {
            return Flow::Next;
        }
        let Some(wanted) = req.query_param(&self.key) else {
            return Flow::Next;
        };
        match wanted.parse::<Method>() {
            Ok(method) => {
                debug!(from = %req.method, to = %method, path = %req.path, "Method overridden");
                req.method = method;
            }
            Err(e) => debug!(error = %e, "Ignoring method override"),
        }
        Flow::Next
    }
}

/// Stamps the arrival time into `locals["time"]` and logs the request line.
pub struct RequestLogger;

pub fn request_logger() -> RequestLogger {
    RequestLogger
}

pub const TIME_LOCAL: &str = "time";

#[async_trait]
impl<S: Send + Sync + 'static> Handler<S> for RequestLogger {
    async fn call(&self, req: &mut Request, _state: &S) -> Flow {
        let time = chrono::Local::now()
            .format("%a %b %d %Y")
            .to_string();
        info!(method = %req.method, host = %req.host, path = %req.path, time = %time, "Request");
        req.set_local(TIME_LOCAL, time);
        Flow::Next
    }
}
