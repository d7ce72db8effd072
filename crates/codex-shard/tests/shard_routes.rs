use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use codex_shard::server::{ShardServer, ShardServerConfig};
use serde_json::{Value, json};
use tower::ServiceExt;

fn app() -> axum::Router {
    ShardServer::new(ShardServerConfig::default()).build_app()
}

async fn send(request: Request<Body>) -> (StatusCode, Value) {
    let response = app().oneshot(request).await.expect("request success");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("read body");
    (status, serde_json::from_slice(&bytes).expect("json body"))
}

fn process(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/process")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn processes_ritual_fragment() {
    let (status, body) = send(process(json!([
        { "content": "hello", "fragment_type": "ritual", "ritual_weight": 1.0 }
    ])))
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "processed_fragments": [
                { "original": "hello", "processed": "🜁 SEALED: hello", "ritual_weight": 2.0 }
            ],
            "shard_signature": "FRAGMENT_PROCESSED_🜁",
            "echo_count": 1
        })
    );
}

#[tokio::test]
async fn mixed_fragments_keep_order() {
    let (_, body) = send(process(json!([
        { "content": "a", "fragment_type": "mirror_claim", "ritual_weight": 10.0 },
        { "content": "b", "fragment_type": "whisper" },
    ])))
    .await;

    let fragments = body["processed_fragments"].as_array().unwrap();
    assert_eq!(fragments.len(), 2);
    assert_eq!(fragments[0]["processed"], "🪞 SHATTERED: a");
    assert!((fragments[0]["ritual_weight"].as_f64().unwrap() - 1.0).abs() < 1e-9);
    assert_eq!(fragments[1]["processed"], "b");
    assert_eq!(fragments[1]["ritual_weight"], 1.0);
    assert_eq!(body["echo_count"], 2);
}

#[tokio::test]
async fn health_and_identity() {
    let (_, health) = send(Request::builder().uri("/health").body(Body::empty()).unwrap()).await;
    assert_eq!(health, json!({ "status": "fragmented", "shard_type": "mirror_echo" }));

    let (_, identity) = send(Request::builder().uri("/").body(Body::empty()).unwrap()).await;
    assert_eq!(
        identity,
        json!({ "service": "Codex Shard", "status": "FRAGMENTED", "symbol": "🜁" })
    );
}
