//! HTTP server setup and method dispatch.
//!
//! # Responsibilities
//! - Create the Axum router with a single catch-all handler
//! - Wire up middleware (request ID, tracing, timeout)
//! - Dispatch GET/POST to the translator, reject CONNECT and the rest
//! - Serve until the shutdown signal, then drain

use axum::{
    body::Body,
    error_handling::HandleErrorLayer,
    extract::State,
    http::{header, Method, Request, StatusCode},
    response::{IntoResponse, Response},
    Router,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::{timeout::error::Elapsed, BoxError, ServiceBuilder};
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::ProxyConfig;
use crate::http::error::ProxyError;
use crate::http::request::{request_id, MakeRequestUuidV4};
use crate::http::translator::translate;
use crate::lifecycle::shutdown::signalled;
use crate::observability::metrics;
use crate::solver::{Session, SolverClient};

/// Body returned for every CONNECT request.
pub const CONNECT_NOT_SUPPORTED: &str = "CONNECT is not supported by this proxy. \
Configure your client to use http:// instead of https:// for proxied URLs; \
requests are upgraded to https before they reach the solver.";

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub solver: SolverClient,
    /// Fixed at startup; read-only for every request.
    pub session: Arc<Session>,
    pub max_body_bytes: usize,
}

/// HTTP server for the proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
}

impl HttpServer {
    /// Create a server that translates requests through `solver`, tagging
    /// each one with `session`.
    pub fn new(config: ProxyConfig, solver: SolverClient, session: Session) -> Self {
        let state = AppState {
            solver,
            session: Arc::new(session),
            max_body_bytes: config.listener.max_body_bytes,
        };

        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &ProxyConfig, state: AppState) -> Router {
        let request_secs = config.timeouts.request_secs;

        // A fallback sees every request, including CONNECT's authority-form
        // target and absolute-form proxy requests.
        Router::new()
            .fallback(dispatch)
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(HandleErrorLayer::new(move |err: BoxError| async move {
                        layer_error(err, request_secs)
                    }))
                    .timeout(Duration::from_secs(request_secs)),
            )
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV4))
    }

    /// The fully layered router, for serving or driving directly.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener until
    /// `shutdown` fires. In-flight requests are drained before returning.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            solver = %self.config.solver.url,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(signalled(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Render a middleware failure with the same JSON shape as handler errors.
fn layer_error(err: BoxError, request_secs: u64) -> Response {
    let error = if err.is::<Elapsed>() {
        ProxyError::Timeout(request_secs)
    } else {
        ProxyError::Layer(err.to_string())
    };
    tracing::warn!(error = %error, "Request aborted");
    error.into_response()
}

/// Route one inbound request by method.
async fn dispatch(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let method = request.method().clone();
    let request_id = request_id(request.headers()).to_string();

    let response = if method == Method::CONNECT {
        tracing::info!(
            request_id = %request_id,
            target = %request.uri(),
            "Rejecting CONNECT"
        );
        connect_not_supported()
    } else {
        match translate(&state, request).await {
            Ok(response) => response,
            Err(e) => {
                let status = e.status();
                if status.is_server_error() {
                    tracing::error!(request_id = %request_id, error = %e, "Request failed");
                } else {
                    tracing::info!(request_id = %request_id, error = %e, "Request rejected");
                }
                e.into_response()
            }
        }
    };

    metrics::record_request(method.as_str(), response.status().as_u16(), start_time);
    response
}

fn connect_not_supported() -> Response {
    (
        StatusCode::NOT_IMPLEMENTED,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        CONNECT_NOT_SUPPORTED,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SolverConfig;
    use tower::ServiceExt;

    fn server() -> HttpServer {
        // Unroutable solver: requests that reach it fail fast.
        let solver_config = SolverConfig {
            url: "http://127.0.0.1:9/v1".into(),
            ..SolverConfig::default()
        };
        let solver = SolverClient::new(&solver_config).unwrap();
        let mut config = ProxyConfig::default();
        config.solver = solver_config;
        HttpServer::new(config, solver, Session::new("s-1"))
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn connect_is_not_implemented() {
        let request = Request::builder()
            .method(Method::CONNECT)
            .uri("www.discogs.com:443")
            .body(Body::empty())
            .unwrap();

        let response = server().router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_IMPLEMENTED);
        assert!(response.headers().contains_key("x-request-id"));
        assert_eq!(body_text(response).await, CONNECT_NOT_SUPPORTED);
    }

    #[tokio::test]
    async fn other_methods_get_405_json() {
        for method in [Method::PUT, Method::DELETE, Method::PATCH, Method::OPTIONS] {
            let request = Request::builder()
                .method(method.clone())
                .uri("/resource")
                .header(header::HOST, "example.com")
                .body(Body::empty())
                .unwrap();

            let response = server().router().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED, "{method}");
            let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
            assert!(json["error"].as_str().unwrap().contains(method.as_str()));
        }
    }

    #[tokio::test]
    async fn unreachable_solver_is_uniform_500() {
        let request = Request::builder()
            .uri("/")
            .header(header::HOST, "example.com")
            .body(Body::empty())
            .unwrap();

        let response = server().router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert!(json["error"].as_str().is_some());
    }

    #[tokio::test]
    async fn slow_solver_times_out_with_json_error() {
        // Accepts into the backlog but never answers.
        let silent = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let solver_config = SolverConfig {
            url: format!("http://{}/v1", silent.local_addr().unwrap()),
            ..SolverConfig::default()
        };
        let solver = SolverClient::new(&solver_config).unwrap();
        let mut config = ProxyConfig::default();
        config.solver = solver_config;
        config.timeouts.request_secs = 1;
        let server = HttpServer::new(config, solver, Session::none());

        let request = Request::builder()
            .uri("/slow")
            .header(header::HOST, "example.com")
            .body(Body::empty())
            .unwrap();

        let response = server.router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
        let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(json["error"], "Request did not complete within 1 seconds");
        drop(silent);
    }
}
