//! Integration tests for HttpService against the in-process mock backend.
//!
//! Each test spawns the mock on 127.0.0.1:0, then exercises the HTTP
//! client layer through the full request/response cycle.

use prcopilot_client::test_helpers::{spawn_backend, spawn_backend_with, ListReply};
use prcopilot_client::{HttpService, ReviewService, ServiceError};
use prcopilot_core::summary::PrSummary;

fn sample_summaries() -> Vec<PrSummary> {
    vec![
        PrSummary {
            pr_id: 1,
            summary: "Fix bug".into(),
        },
        PrSummary {
            pr_id: 2,
            summary: "Add tests".into(),
        },
    ]
}

#[tokio::test]
async fn list_returns_entries_in_response_order() {
    let backend = spawn_backend(sample_summaries()).await;
    let svc = HttpService::new(&backend.base_url);

    let summaries = svc.list_summaries().await.unwrap();
    assert_eq!(summaries, sample_summaries());
    assert_eq!(backend.requests(), vec!["GET /pr-summaries"]);
}

#[tokio::test]
async fn list_empty_collection() {
    let backend = spawn_backend(Vec::new()).await;
    let svc = HttpService::new(&backend.base_url);

    let summaries = svc.list_summaries().await.unwrap();
    assert!(summaries.is_empty());
}

#[tokio::test]
async fn approve_posts_to_exactly_one_path() {
    let backend = spawn_backend(sample_summaries()).await;
    let svc = HttpService::new(&backend.base_url);

    svc.approve(1).await.unwrap();
    assert_eq!(backend.requests(), vec!["POST /pr/1/approve"]);
}

#[tokio::test]
async fn reject_posts_to_exactly_one_path() {
    let backend = spawn_backend(sample_summaries()).await;
    let svc = HttpService::new(&backend.base_url);

    svc.reject(2).await.unwrap();
    assert_eq!(backend.requests(), vec!["POST /pr/2/reject"]);
}

#[tokio::test]
async fn list_error_status_maps_to_backend() {
    let backend = spawn_backend_with(ListReply::Error(503)).await;
    let svc = HttpService::new(&backend.base_url);

    let err = svc.list_summaries().await.unwrap_err();
    assert!(matches!(err, ServiceError::Backend { status: 503, .. }));
}

#[tokio::test]
async fn list_garbage_body_maps_to_malformed() {
    let backend = spawn_backend_with(ListReply::Garbage).await;
    let svc = HttpService::new(&backend.base_url);

    let err = svc.list_summaries().await.unwrap_err();
    assert!(matches!(err, ServiceError::Malformed(_)));
}

#[tokio::test]
async fn decision_failure_maps_to_backend() {
    let backend = spawn_backend(sample_summaries()).await;
    backend.set_fail_decisions(true);
    let svc = HttpService::new(&backend.base_url);

    let err = svc.approve(1).await.unwrap_err();
    assert!(matches!(err, ServiceError::Backend { status: 500, .. }));
}

#[tokio::test]
async fn unreachable_backend_maps_to_transport() {
    // Nothing listens here.
    let svc = HttpService::new("http://127.0.0.1:1");

    let err = svc.list_summaries().await.unwrap_err();
    assert!(matches!(err, ServiceError::Transport(_)));
}

#[tokio::test]
async fn trailing_slash_in_base_url_is_trimmed() {
    let backend = spawn_backend(sample_summaries()).await;
    let svc = HttpService::new(&format!("{}/", backend.base_url));

    svc.list_summaries().await.unwrap();
    assert_eq!(backend.requests(), vec!["GET /pr-summaries"]);
}
