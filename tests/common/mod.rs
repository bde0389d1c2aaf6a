//! Shared utilities for integration tests.

#![allow(dead_code)]

use axum::{body::Bytes, extract::State, http::StatusCode, routing::post, Router};
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use flareproxy::config::{ProxyConfig, SolverConfig};
use flareproxy::{HttpServer, Session, Shutdown, SolverClient};

type Responder = dyn Fn(&Value) -> (u16, String) + Send + Sync;

struct MockState {
    commands: Mutex<Vec<Value>>,
    respond: Box<Responder>,
}

/// A programmable stand-in for the solver's `/v1` endpoint.
pub struct MockSolver {
    pub url: String,
    state: Arc<MockState>,
}

impl MockSolver {
    /// Every command received so far, in arrival order.
    pub fn commands(&self) -> Vec<Value> {
        self.state.commands.lock().unwrap().clone()
    }
}

async fn handle(State(mock): State<Arc<MockState>>, body: Bytes) -> (StatusCode, String) {
    let command: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    mock.commands.lock().unwrap().push(command.clone());
    let (status, body) = (mock.respond)(&command);
    (StatusCode::from_u16(status).unwrap(), body)
}

/// Start a mock solver whose reply is computed from each received command.
pub async fn start_mock_solver<F>(respond: F) -> MockSolver
where
    F: Fn(&Value) -> (u16, String) + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let state = Arc::new(MockState {
        commands: Mutex::new(Vec::new()),
        respond: Box::new(respond),
    });

    let app = Router::new()
        .route("/v1", post(handle))
        .with_state(state.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockSolver {
        url: format!("http://{}/v1", addr),
        state,
    }
}

/// A URL on a port nobody is listening on.
pub async fn dead_solver_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/v1", addr)
}

pub fn solver_config(url: &str) -> SolverConfig {
    SolverConfig {
        url: url.to_string(),
        ..SolverConfig::default()
    }
}

/// Start the proxy against `solver_url` with a fixed session.
pub async fn start_proxy(solver_url: &str, session: Session) -> (SocketAddr, Shutdown) {
    let mut config = ProxyConfig::default();
    config.solver = solver_config(solver_url);
    let solver = SolverClient::new(&config.solver).unwrap();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let server = HttpServer::new(config, solver, session);
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

/// A reqwest client that uses the proxy for plain-http URLs.
pub fn proxied_client(proxy: SocketAddr) -> reqwest::Client {
    reqwest::Client::builder()
        .proxy(reqwest::Proxy::http(format!("http://{}", proxy)).unwrap())
        .build()
        .unwrap()
}

/// Parsed reply from [`raw_request`].
pub struct RawResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl RawResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Write a hand-built HTTP/1.1 request and read until the server closes.
/// Callers include `Connection: close`.
pub async fn raw_request(addr: SocketAddr, request: &str) -> RawResponse {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut buf = Vec::new();
    stream.read_to_end(&mut buf).await.unwrap();
    let text = String::from_utf8_lossy(&buf).into_owned();

    let (head, body) = text.split_once("\r\n\r\n").unwrap_or((text.as_str(), ""));
    let mut lines = head.lines();
    let status = lines
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|code| code.parse().ok())
        .unwrap();
    let headers = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .collect();

    RawResponse {
        status,
        headers,
        body: body.to_string(),
    }
}
