//! Shared utilities for integration and load testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::body::{to_bytes, Body};
use axum::extract::Request;
use axum::http::StatusCode;
use nest_router::{from_fn, App, Middleware, Next, Shutdown};
use tokio::net::TcpListener;
use tower::ServiceExt;

/// Ordered record of which middleware and handlers ran.
pub type CallLog = Arc<Mutex<Vec<String>>>;

pub fn call_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn entries(log: &CallLog) -> Vec<String> {
    log.lock().unwrap().clone()
}

/// Middleware that appends `name` to `log` and continues the chain.
pub fn recording(log: &CallLog, name: &'static str) -> impl Middleware {
    let log = log.clone();
    from_fn(move |req: Request, next: Next| {
        log.lock().unwrap().push(name.to_string());
        next.run(req)
    })
}

/// Run setup on `app` and send one request through the composed router.
pub async fn send(app: App, method: &str, uri: &str) -> (StatusCode, String) {
    let router = app.into_router().expect("route setup failed");
    send_to(&router, method, uri).await
}

/// Send one request through an already built router.
pub async fn send_to(router: &axum::Router, method: &str, uri: &str) -> (StatusCode, String) {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let res = router.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let body = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

/// Serve `app` on an ephemeral port. Trigger the returned coordinator to stop.
pub async fn spawn_app(app: App) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let signalled = shutdown.signalled();

    tokio::spawn(async move {
        let _ = app.serve(listener, signalled).await;
    });

    (addr, shutdown)
}
