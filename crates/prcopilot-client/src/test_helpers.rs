//! In-process mock of the summarization backend, for tests.
//!
//! Serves the backend's three routes on a random port and records every
//! request it receives as `"METHOD /path"`, so tests can assert exactly which
//! commands were issued. Failure modes are togglable at runtime.

use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use prcopilot_core::summary::PrSummary;
use tokio::net::TcpListener;

/// How the mock answers `GET /pr-summaries`.
#[derive(Debug, Clone)]
pub enum ListReply {
    Summaries(Vec<PrSummary>),
    /// 2xx with a non-JSON body.
    Garbage,
    /// Plain status code, empty body.
    Error(u16),
}

#[derive(Debug)]
struct MockState {
    list_reply: ListReply,
    fail_decisions: bool,
    requests: Vec<String>,
}

type Shared = Arc<Mutex<MockState>>;

/// A running mock backend bound to `base_url`.
pub struct MockBackend {
    pub base_url: String,
    state: Shared,
    _handle: tokio::task::JoinHandle<()>,
}

impl MockBackend {
    /// Every request seen so far, in arrival order.
    pub fn requests(&self) -> Vec<String> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn set_list_reply(&self, reply: ListReply) {
        self.state.lock().unwrap().list_reply = reply;
    }

    /// When set, approve/reject answer 500 instead of 200.
    pub fn set_fail_decisions(&self, fail: bool) {
        self.state.lock().unwrap().fail_decisions = fail;
    }
}

/// Spawn a mock backend serving the given summaries.
pub async fn spawn_backend(summaries: Vec<PrSummary>) -> MockBackend {
    spawn_backend_with(ListReply::Summaries(summaries)).await
}

/// Spawn a mock backend with full control over the list reply.
pub async fn spawn_backend_with(reply: ListReply) -> MockBackend {
    let state: Shared = Arc::new(Mutex::new(MockState {
        list_reply: reply,
        fail_decisions: false,
        requests: Vec::new(),
    }));

    let app = Router::new()
        .route("/pr-summaries", get(list_summaries))
        .route("/pr/{pr_id}/approve", post(approve))
        .route("/pr/{pr_id}/reject", post(reject))
        .with_state(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let base_url = format!("http://{addr}");
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockBackend {
        base_url,
        state,
        _handle: handle,
    }
}

async fn list_summaries(State(state): State<Shared>) -> Response {
    let reply = {
        let mut s = state.lock().unwrap();
        s.requests.push("GET /pr-summaries".into());
        s.list_reply.clone()
    };
    match reply {
        ListReply::Summaries(items) => Json(items).into_response(),
        ListReply::Garbage => (StatusCode::OK, "this is not json").into_response(),
        ListReply::Error(code) => StatusCode::from_u16(code).unwrap().into_response(),
    }
}

async fn approve(Path(pr_id): Path<i64>, State(state): State<Shared>) -> StatusCode {
    record_decision(&state, pr_id, "approve")
}

async fn reject(Path(pr_id): Path<i64>, State(state): State<Shared>) -> StatusCode {
    record_decision(&state, pr_id, "reject")
}

fn record_decision(state: &Shared, pr_id: i64, action: &str) -> StatusCode {
    let mut s = state.lock().unwrap();
    s.requests.push(format!("POST /pr/{pr_id}/{action}"));
    if s.fail_decisions {
        StatusCode::INTERNAL_SERVER_ERROR
    } else {
        StatusCode::OK
    }
}
