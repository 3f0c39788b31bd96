//! Mock MPC-HC web interface for testing
//!
//! Serves `/variables.html` from a settable variable list and records every
//! request made to `/command.html`.

use axum::{
    extract::{Query, State},
    http::{Method, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

/// One request seen on `/command.html`
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCommand {
    pub method: Method,
    pub wm_command: String,
    pub position: Option<String>,
}

struct MockMpcHcState {
    /// Rendered in insertion order, so duplicates can be simulated
    variables: Vec<(String, String)>,
    /// Answer every request with 408
    request_timeout: bool,
    commands: Vec<RecordedCommand>,
}

/// Mock MPC-HC server
pub struct MockMpcHcServer {
    addr: SocketAddr,
    state: Arc<RwLock<MockMpcHcState>>,
    handle: JoinHandle<()>,
}

impl MockMpcHcServer {
    /// Start on a random port with a paused "Big Buck Bunny" loaded
    pub async fn start() -> Self {
        Self::start_on("127.0.0.1:0").await
    }

    /// Start on a specific address (used to bring a stopped player back)
    pub async fn start_on(addr: &str) -> Self {
        let state = Arc::new(RwLock::new(MockMpcHcState {
            variables: default_variables(),
            request_timeout: false,
            commands: Vec::new(),
        }));

        let app = Router::new()
            .route("/variables.html", get(handle_variables))
            .route("/command.html", get(handle_command).post(handle_command))
            .with_state(state.clone());

        let listener = TcpListener::bind(addr).await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            state,
            handle,
        }
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Base URL as the adapters expect it
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Set (or replace) one status variable
    pub async fn set_variable(&self, key: &str, value: &str) {
        set(&mut self.state.write().await.variables, key, value);
    }

    /// Remove one status variable from the page
    pub async fn remove_variable(&self, key: &str) {
        self.state.write().await.variables.retain(|(k, _)| k != key);
    }

    /// Make every endpoint answer 408 Request Timeout
    pub async fn set_request_timeout(&self, enabled: bool) {
        self.state.write().await.request_timeout = enabled;
    }

    pub async fn recorded_commands(&self) -> Vec<RecordedCommand> {
        self.state.read().await.commands.clone()
    }

    /// Stop the mock server
    pub async fn stop(self) {
        self.handle.abort();
        let _ = self.handle.await;
    }
}

fn default_variables() -> Vec<(String, String)> {
    [
        ("file", "Big.Buck.Bunny.MKV"),
        ("filepath", "C:\\Videos\\Big.Buck.Bunny.MKV"),
        ("state", "1"),
        ("statestring", "Paused"),
        ("position", "75000"),
        ("positionstring", "00:01:15"),
        ("duration", "3723000"),
        ("durationstring", "01:02:03"),
        ("volumelevel", "50"),
        ("muted", "0"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

fn render(variables: &[(String, String)]) -> String {
    let mut body = String::from("<html>\n<head><title>MPC-HC WebServer - Variables</title></head>\n<body>\n");
    for (key, value) in variables {
        body.push_str(&format!("<p id=\"{}\">{}</p>\n", key, value));
    }
    body.push_str("</body>\n</html>\n");
    body
}

async fn handle_variables(State(state): State<Arc<RwLock<MockMpcHcState>>>) -> Response {
    let state = state.read().await;
    if state.request_timeout {
        return StatusCode::REQUEST_TIMEOUT.into_response();
    }
    Html(render(&state.variables)).into_response()
}

async fn handle_command(
    State(state): State<Arc<RwLock<MockMpcHcState>>>,
    method: Method,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let mut state = state.write().await;
    if state.request_timeout {
        return StatusCode::REQUEST_TIMEOUT.into_response();
    }

    let Some(wm_command) = params.get("wm_command").cloned() else {
        return StatusCode::BAD_REQUEST.into_response();
    };

    // Minimal player behavior so polls after a command see its effect
    match wm_command.as_str() {
        "887" => set(&mut state.variables, "state", "2"),
        "888" => {
            let next = match lookup(&state.variables, "state") {
                Some("2") => "1",
                _ => "2",
            };
            set(&mut state.variables, "state", next);
        }
        "890" => set(&mut state.variables, "state", "0"),
        "909" => {
            let next = match lookup(&state.variables, "muted") {
                Some("1") => "0",
                _ => "1",
            };
            set(&mut state.variables, "muted", next);
        }
        "-1" => {
            if let Some(secs) = params.get("position").and_then(|p| hms_to_secs(p)) {
                set(&mut state.variables, "position", &(secs * 1000).to_string());
                let hms = format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60);
                set(&mut state.variables, "positionstring", &hms);
            }
        }
        _ => {}
    }

    state.commands.push(RecordedCommand {
        method,
        wm_command,
        position: params.get("position").cloned(),
    });

    Html("<html><body>OK</body></html>").into_response()
}

fn lookup<'a>(variables: &'a [(String, String)], key: &str) -> Option<&'a str> {
    variables
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

fn set(variables: &mut Vec<(String, String)>, key: &str, value: &str) {
    match variables.iter_mut().find(|(k, _)| k == key) {
        Some(entry) => entry.1 = value.to_string(),
        None => variables.push((key.to_string(), value.to_string())),
    }
}

/// `H:MM:SS[.ffffff]` to whole seconds
fn hms_to_secs(position: &str) -> Option<u64> {
    let mut parts = position.split(':');
    let hours: u64 = parts.next()?.parse().ok()?;
    let minutes: u64 = parts.next()?.parse().ok()?;
    let seconds: f64 = parts.next()?.parse().ok()?;
    Some(hours * 3600 + minutes * 60 + seconds as u64)
}
