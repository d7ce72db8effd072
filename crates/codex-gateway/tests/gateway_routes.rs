use axum::body::{Body, to_bytes};
use axum::extract::ConnectInfo;
use axum::http::{Request, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use codex_gateway::server::{GatewayServer, GatewayServerConfig};
use codex_kernel::{InMemoryQuotaStore, QuotaStore, QuotaWindow};
use serde_json::{Value, json};
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceExt;

/// Start a stand-in master core that echoes the received body.
async fn spawn_upstream() -> String {
    let app = Router::new().route(
        "/reflect",
        post(|Json(body): Json<Value>| async move {
            Json(json!({
                "reflection": format!("Echo: {}", body["query"].as_str().unwrap_or_default()),
                "mirror_status": "STABLE",
                "received": body,
            }))
        }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/reflect")
}

fn config(upstream_url: String, max_queries: u64) -> GatewayServerConfig {
    GatewayServerConfig {
        upstream_url,
        max_queries,
        quota_window: QuotaWindow::Lifetime,
        ..Default::default()
    }
}

fn reflect_from(ip: [u8; 4], body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/reflect")
        .header("content-type", "application/json")
        .extension(ConnectInfo(SocketAddr::from((ip, 40000))))
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json body")
}

#[tokio::test]
async fn quota_allows_max_then_rejects_per_address() {
    let upstream = spawn_upstream().await;
    let app = GatewayServer::new(config(upstream, 3)).build_app().unwrap();
    let body = json!({ "query": "hello" });

    for _ in 0..3 {
        let response = app.clone().oneshot(reflect_from([10, 0, 0, 1], &body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app.clone().oneshot(reflect_from([10, 0, 0, 1], &body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(
        json_body(response).await,
        json!({ "detail": "Daily reflection limit reached." })
    );

    let response = app.oneshot(reflect_from([10, 0, 0, 2], &body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn proxy_relays_upstream_json_verbatim() {
    let upstream = spawn_upstream().await;
    let app = GatewayServer::new(config(upstream, 5)).build_app().unwrap();
    let body = json!({ "query": "hello", "mirror_check": false, "ritual_mode": true });

    let response = app.oneshot(reflect_from([192, 168, 1, 7], &body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(json["reflection"], "Echo: hello");
    assert_eq!(json["received"], body);
}

#[tokio::test]
async fn health_bypasses_the_quota() {
    let upstream = spawn_upstream().await;
    let app = GatewayServer::new(config(upstream, 0)).build_app().unwrap();

    for _ in 0..3 {
        let response = app
            .clone()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app
        .oneshot(reflect_from([10, 0, 0, 1], &json!({ "query": "q" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn injected_store_is_consulted() {
    let upstream = spawn_upstream().await;
    let store = Arc::new(InMemoryQuotaStore::new(QuotaWindow::Lifetime));
    for _ in 0..2 {
        store.increment("10.9.9.9").await;
    }

    let app = GatewayServer::new(config(upstream, 2))
        .with_quota_store(store.clone())
        .build_app()
        .unwrap();

    let response = app
        .oneshot(reflect_from([10, 9, 9, 9], &json!({ "query": "q" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(store.count("10.9.9.9").await, 2);
}

#[tokio::test]
async fn unreachable_upstream_is_bad_gateway() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let app = GatewayServer::new(config(format!("http://{addr}/reflect"), 5))
        .build_app()
        .unwrap();

    let response = app
        .oneshot(reflect_from([10, 0, 0, 1], &json!({ "query": "q" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert!(json_body(response).await["detail"].is_string());
}

#[tokio::test]
async fn body_without_content_type_is_still_relayed() {
    let upstream = spawn_upstream().await;
    let store = Arc::new(InMemoryQuotaStore::new(QuotaWindow::Lifetime));
    let app = GatewayServer::new(config(upstream, 5))
        .with_quota_store(store.clone())
        .build_app()
        .unwrap();

    let request = Request::builder()
        .method("POST")
        .uri("/reflect")
        .extension(ConnectInfo(SocketAddr::from(([10, 0, 0, 1], 40000))))
        .body(Body::from(r#"{"query":"hi"}"#))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["received"], json!({ "query": "hi" }));
    assert_eq!(store.count("10.0.0.1").await, 1);
}

#[tokio::test]
async fn non_json_body_is_bad_request() {
    let upstream = spawn_upstream().await;
    let app = GatewayServer::new(config(upstream, 5)).build_app().unwrap();

    let request = Request::builder()
        .method("POST")
        .uri("/reflect")
        .header("content-type", "application/json")
        .extension(ConnectInfo(SocketAddr::from(([10, 0, 0, 1], 40000))))
        .body(Body::from("{ not json"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(json_body(response).await["detail"].is_string());
}
