//! Concurrency tests: many keys and sessions over real sockets.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;

use request_lifecycle::{
    ApiRequest, ReqwestTransport, RequestError, RetryingExecutor, Session,
};

mod common;

fn session() -> Session {
    let executor = RetryingExecutor::new(Arc::new(ReqwestTransport::new()));
    Session::new(Arc::new(executor)).with_policy(common::fast_policy(2000, 1))
}

#[tokio::test]
async fn test_concurrent_keys_all_complete() {
    let (addr, hits) = common::start_mock_backend(200, r#"{"ok":true}"#).await;
    let session = Arc::new(session());

    let mut set = JoinSet::new();
    for i in 0..25 {
        let session = session.clone();
        set.spawn(async move {
            session
                .fetch(&format!("item-{i}"), ApiRequest::get(format!("http://{addr}/items/{i}")))
                .await
        });
    }

    while let Some(result) = set.join_next().await {
        assert!(result.unwrap().unwrap().is_success());
    }
    assert_eq!(hits.count(), 25);
    assert!(session.registry().is_empty());
}

#[tokio::test]
async fn test_teardown_cancels_every_in_flight_request() {
    let (addr, _hits) = common::start_hanging_backend().await;
    let session = Arc::new(session());

    let mut handles = Vec::new();
    for i in 0..10 {
        let session = session.clone();
        handles.push(tokio::spawn(async move {
            session
                .fetch(&format!("view-{i}"), ApiRequest::get(format!("http://{addr}/slow")))
                .await
        }));
    }

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(session.registry().len(), 10);
    session.teardown();

    for handle in handles {
        let err = handle.await.unwrap().unwrap_err();
        assert!(matches!(err, RequestError::Cancelled { .. }));
        assert_eq!(session.classify(&err), None);
    }
    assert!(session.registry().is_empty());
}

#[tokio::test]
async fn test_rapid_reuse_leaves_only_latest() {
    let (addr, hits) = common::start_mock_backend(200, "{}").await;
    let session = session();

    // Each fetch starts before the previous one has a chance to finish.
    let first = session.fetch("search", ApiRequest::get(format!("http://{addr}/search?q=a")));
    let second = session.fetch("search", ApiRequest::get(format!("http://{addr}/search?q=ab")));
    let third = session.fetch("search", ApiRequest::get(format!("http://{addr}/search?q=abc")));
    let (first, second, third) = tokio::join!(first, second, third);

    assert!(matches!(first, Err(RequestError::Cancelled { .. })));
    assert!(matches!(second, Err(RequestError::Cancelled { .. })));
    assert!(third.unwrap().is_success());
    assert!(hits.count() <= 3);
    assert!(session.registry().is_empty());
}
