//! In-process stand-in for the ScratchCraft game server

use axum::Router;
use axum::extract::State;
use axum::http::{StatusCode, Uri};
use axum::routing::get;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

/// Loopback port nothing listens on
pub const UNREACHABLE: &str = "http://127.0.0.1:1";

#[derive(Clone)]
struct Shared {
    poll_status: Arc<Mutex<StatusCode>>,
    poll_body: Arc<Mutex<String>>,
    requests: Arc<Mutex<Vec<String>>>,
}

/// Serves `/poll` from a settable status and body, fails `/broken`, records every other path
pub struct FakeGame {
    address: String,
    shared: Shared,
}

impl FakeGame {
    pub async fn start(poll_body: &str) -> Self {
        let shared = Shared {
            poll_status: Arc::new(Mutex::new(StatusCode::OK)),
            poll_body: Arc::new(Mutex::new(poll_body.to_string())),
            requests: Arc::default(),
        };

        let app = Router::new()
            .route("/poll", get(poll))
            .route("/broken", get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }))
            .fallback(record)
            .with_state(shared.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = format!("http://{}", listener.local_addr().unwrap());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { address, shared }
    }

    pub fn address(&self) -> String {
        self.address.clone()
    }

    /// Status served with the poll body
    pub fn set_poll_status(&self, status: StatusCode) {
        *self.shared.poll_status.lock().unwrap() = status;
    }

    pub fn set_poll_body(&self, body: &str) {
        *self.shared.poll_body.lock().unwrap() = body.to_string();
    }

    /// Paths of every non-poll request, in arrival order
    pub fn requests(&self) -> Vec<String> {
        self.shared.requests.lock().unwrap().clone()
    }
}

async fn poll(State(shared): State<Shared>) -> (StatusCode, String) {
    let status = *shared.poll_status.lock().unwrap();
    (status, shared.poll_body.lock().unwrap().clone())
}

async fn record(State(shared): State<Shared>, uri: Uri) -> &'static str {
    shared.requests.lock().unwrap().push(uri.path().to_string());
    "ok"
}
