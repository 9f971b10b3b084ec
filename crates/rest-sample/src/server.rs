//! # HTTP Adapter
//!
//! Every HTTP request lands in one axum fallback, is converted to a pipeline [`Request`], and the
//! pipeline's [`Response`] is converted back.
//!
//! | Pipeline body | HTTP body |
//! |---------------|-----------|
//! | `Empty` | empty |
//! | `Text` | `text/plain` |
//! | `Json` | `application/json` |
//! | `View` | whatever the [`ViewRenderer`] produces |
//!
//! Request body fields come from `application/json` objects or url-encoded forms. When a public
//! directory is configured, files in it are served before the pipeline runs.

use std::{collections::HashMap, path::Path, sync::Arc};

use axum::{
    extract::{FromRequest, Query, State},
    handler::Handler,
    http::{header, HeaderName, HeaderValue, StatusCode, Uri},
    response::IntoResponse,
    Form, Json, Router,
};
use rest_framework::{Body, Fields, Method, Pipeline, Request, Response};
use serde_json::{json, Value};
use tokio::{net::TcpListener, signal::ctrl_c};
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::{debug, error, info, warn};

use crate::error::AppError;

/// Turns a view descriptor into an HTTP response.
pub trait ViewRenderer: Send + Sync + 'static {
    fn render(&self, template: &str, data: &Value) -> axum::response::Response;
}

/// Emits `{"view": template, "data": data}`.
pub struct JsonViews;

impl ViewRenderer for JsonViews {
    fn render(&self, template: &str, data: &Value) -> axum::response::Response {
        Json(json!({ "view": template, "data": data })).into_response()
    }
}

struct Server<S> {
    pipeline: Pipeline<S>,
    state: S,
    views: Box<dyn ViewRenderer>,
}

pub fn router<S: Send + Sync + 'static>(
    pipeline: Pipeline<S>,
    state: S,
    views: impl ViewRenderer,
    public_dir: Option<&Path>,
) -> Router {
    let server = Arc::new(Server {
        pipeline,
        state,
        views: Box::new(views),
    });
    let pipeline_service = dispatch::<S>.with_state(server);

    let router = match public_dir {
        Some(dir) => {
            info!(dir = %dir.display(), "Serving static files");
            Router::new().fallback_service(
                ServeDir::new(dir)
                    .call_fallback_on_method_not_allowed(true)
                    .fallback(pipeline_service),
            )
        }
        None => Router::new().fallback_service(pipeline_service),
    };

    router.layer(TraceLayer::new_for_http())
}

async fn dispatch<S: Send + Sync + 'static>(
    State(server): State<Arc<Server<S>>>,
    request: axum::extract::Request,
) -> axum::response::Response {
    let req = match into_pipeline_request(request).await {
        Ok(req) => req,
        Err(rejection) => return rejection,
    };
    let response = server.pipeline.handle(req, &server.state).await;
    into_http_response(response, server.views.as_ref())
}

async fn into_pipeline_request(
    request: axum::extract::Request,
) -> Result<Request, axum::response::Response> {
    let method: Method = request
        .method()
        .as_str()
        .parse()
        .map_err(|e: rest_framework::pipeline::request::UnsupportedMethod| {
            (StatusCode::METHOD_NOT_ALLOWED, e.to_string()).into_response()
        })?;

    let uri: &Uri = request.uri();
    let path = uri.path().to_string();
    let query = Query::<HashMap<String, String>>::try_from_uri(uri)
        .map(|Query(query)| query)
        .unwrap_or_else(|e| {
            debug!(error = %e, "Ignoring malformed query string");
            HashMap::new()
        });
    let host = request
        .headers()
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .map(|h| h.split(':').next().unwrap_or(h).to_string());

    let mut req = Request::new(method, path);
    req.query = query;
    if let Some(host) = host {
        req.host = host;
    }
    if !matches!(method, Method::Get | Method::Head) {
        req.body = body_fields(request).await;
    }
    Ok(req)
}

async fn body_fields(request: axum::extract::Request) -> Fields {
    let is_json = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/json"));

    if is_json {
        match Json::<serde_json::Map<String, Value>>::from_request(request, &()).await {
            Ok(Json(object)) => object
                .into_iter()
                .map(|(name, value)| match value {
                    Value::String(s) => (name, s),
                    other => (name, other.to_string()),
                })
                .collect(),
            Err(rejection) => {
                debug!(error = %rejection, "Ignoring JSON body");
                Fields::new()
            }
        }
    } else {
        match Form::<Vec<(String, String)>>::from_request(request, &()).await {
            Ok(Form(pairs)) => pairs.into_iter().collect(),
            Err(rejection) => {
                debug!(error = %rejection, "Ignoring form body");
                Fields::new()
            }
        }
    }
}

fn into_http_response(response: Response, views: &dyn ViewRenderer) -> axum::response::Response {
    let status = StatusCode::from_u16(response.status).unwrap_or_else(|_| {
        warn!(status = response.status, "Invalid status code, answering 500");
        StatusCode::INTERNAL_SERVER_ERROR
    });

    let mut http = match response.body {
        Body::Empty => ().into_response(),
        Body::Text(text) => text.into_response(),
        Body::Json(value) => Json(value).into_response(),
        Body::View { template, data } => views.render(&template, &data),
    };
    *http.status_mut() = status;

    for (name, value) in response.headers {
        match (
            HeaderName::try_from(name.as_str()),
            HeaderValue::try_from(value.as_str()),
        ) {
            (Ok(name), Ok(value)) => {
                http.headers_mut().insert(name, value);
            }
            _ => warn!(header = %name, "Dropping invalid header"),
        }
    }
    http
}

pub async fn serve(port: u16, app: Router) -> Result<(), AppError> {
    let address = format!("0.0.0.0:{port}");
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutting down...");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!(error = %e, "Failed to install Ctrl+C handler");
                std::future::pending::<()>().await
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
