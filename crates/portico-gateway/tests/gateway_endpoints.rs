use portico_gateway::{AppConfig, build_app};
use serde_json::{Value, json};
use tokio::task::JoinHandle;
use wiremock::matchers::{body_string, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn start_gateway(
    listings_backend: &str,
    users_backend: &str,
) -> (String, tokio::sync::oneshot::Sender<()>, JoinHandle<()>) {
    let mut cfg = AppConfig::default();
    cfg.backends.listings = listings_backend.to_string();
    cfg.backends.users = users_backend.to_string();
    let app = build_app(&cfg).expect("build app");

    // Bind to an ephemeral port
    let listener = tokio::net::TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0))
        .await
        .expect("bind");
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = tokio::sync::oneshot::channel::<()>();

    let server = tokio::spawn(async move {
        let _ = axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = rx.await;
            })
            .await;
    });

    (format!("http://{addr}"), tx, server)
}

/// A base URL with nothing listening behind it.
async fn dead_backend() -> String {
    let listener = tokio::net::TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0))
        .await
        .unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

#[tokio::test]
async fn ping_returns_pong() {
    let backend = MockServer::start().await;
    let (base, shutdown_tx, handle) = start_gateway(&backend.uri(), &backend.uri()).await;

    let resp = reqwest::get(format!("{base}/public-api/ping")).await.unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "pong!");

    let _ = shutdown_tx.send(());
    let _ = handle.await;
}

#[tokio::test]
async fn listings_response_is_relayed_verbatim() {
    let backend = MockServer::start().await;
    let stub_body = r#"{"result":true,"listings":[]}"#;
    Mock::given(method("GET"))
        .and(path("/listings"))
        .and(query_param("page_num", "2"))
        .and(query_param("page_size", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(stub_body, "application/json"))
        .expect(1)
        .mount(&backend)
        .await;

    let (base, shutdown_tx, handle) = start_gateway(&backend.uri(), &backend.uri()).await;

    let resp = reqwest::get(format!("{base}/public-api/listings?page_num=2&page_size=5"))
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers().get("content-type").unwrap(),
        "application/json"
    );
    // byte-for-byte relay
    assert_eq!(resp.text().await.unwrap(), stub_body);

    let _ = shutdown_tx.send(());
    let _ = handle.await;
}

#[tokio::test]
async fn absent_page_num_forwards_the_default() {
    let backend = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/listings"))
        .and(query_param("page_num", "1"))
        .and(query_param("page_size", "5"))
        .and(query_param_is_missing("user_id"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(r#"{"result":true,"listings":[]}"#, "application/json"),
        )
        .expect(1)
        .mount(&backend)
        .await;

    let (base, shutdown_tx, handle) = start_gateway(&backend.uri(), &backend.uri()).await;

    let resp = reqwest::get(format!("{base}/public-api/listings?page_size=5"))
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let _ = shutdown_tx.send(());
    let _ = handle.await;
}

#[tokio::test]
async fn user_id_is_forwarded_when_present() {
    let backend = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/listings"))
        .and(query_param("user_id", "42"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(r#"{"result":true,"listings":[]}"#, "application/json"),
        )
        .expect(1)
        .mount(&backend)
        .await;

    let (base, shutdown_tx, handle) = start_gateway(&backend.uri(), &backend.uri()).await;

    let resp = reqwest::get(format!("{base}/public-api/listings?user_id=42"))
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let _ = shutdown_tx.send(());
    let _ = handle.await;
}

#[tokio::test]
async fn invalid_page_num_is_rejected_without_backend_contact() {
    let backend = MockServer::start().await;
    // Nothing mounted: any backend call would 404, and the mock server
    // verifies zero received requests below.
    let (base, shutdown_tx, handle) = start_gateway(&backend.uri(), &backend.uri()).await;

    let resp = reqwest::get(format!("{base}/public-api/listings?page_num=abc"))
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["result"], json!(false));
    assert_eq!(body["errors"], json!(["invalid page_num"]));

    assert!(backend.received_requests().await.unwrap().is_empty());

    let _ = shutdown_tx.send(());
    let _ = handle.await;
}

#[tokio::test]
async fn all_validation_errors_are_reported_at_once() {
    let backend = MockServer::start().await;
    let (base, shutdown_tx, handle) = start_gateway(&backend.uri(), &backend.uri()).await;

    let resp = reqwest::get(format!(
        "{base}/public-api/listings?page_num=x&page_size=y&user_id=z"
    ))
    .await
    .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    let errors = body["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 3);

    let _ = shutdown_tx.send(());
    let _ = handle.await;
}

#[tokio::test]
async fn unreachable_backend_yields_502_with_error_envelope() {
    let (base, shutdown_tx, handle) = start_gateway(&dead_backend().await, &dead_backend().await).await;

    let resp = reqwest::get(format!("{base}/public-api/listings")).await.unwrap();
    assert_eq!(resp.status(), 502);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["result"], json!(false));
    let errors = body["errors"].as_array().unwrap();
    assert!(!errors.is_empty());
    assert!(errors[0].as_str().unwrap().len() > 0);

    let _ = shutdown_tx.send(());
    let _ = handle.await;
}

#[tokio::test]
async fn user_create_relays_backend_body() {
    let backend = MockServer::start().await;
    let stub_body = r#"{"result":true,"user":{"id":1,"name":"Alice"}}"#;
    Mock::given(method("POST"))
        .and(path("/users"))
        .and(body_string("name=Alice"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(stub_body, "application/json"))
        .expect(1)
        .mount(&backend)
        .await;

    let (base, shutdown_tx, handle) = start_gateway(&backend.uri(), &backend.uri()).await;

    let client = reqwest::Client::new();
    let resp = client
        .post(format!("{base}/public-api/users"))
        .json(&json!({"name": "Alice"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), stub_body);

    let _ = shutdown_tx.send(());
    let _ = handle.await;
}

#[tokio::test]
async fn user_create_without_name_is_rejected() {
    let backend = MockServer::start().await;
    let (base, shutdown_tx, handle) = start_gateway(&backend.uri(), &backend.uri()).await;

    let client = reqwest::Client::new();
    let resp = client
        .post(format!("{base}/public-api/users"))
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(
        body["errors"],
        json!(["invalid name. Must be a non-empty string"])
    );
    assert!(backend.received_requests().await.unwrap().is_empty());

    let _ = shutdown_tx.send(());
    let _ = handle.await;
}

#[tokio::test]
async fn user_create_with_malformed_json_gets_an_envelope() {
    let backend = MockServer::start().await;
    let (base, shutdown_tx, handle) = start_gateway(&backend.uri(), &backend.uri()).await;

    let client = reqwest::Client::new();
    let resp = client
        .post(format!("{base}/public-api/users"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["result"], json!(false));
    assert!(!body["errors"].as_array().unwrap().is_empty());

    let _ = shutdown_tx.send(());
    let _ = handle.await;
}

#[tokio::test]
async fn listing_create_forwards_validated_form() {
    let backend = MockServer::start().await;
    let stub_body = r#"{"result":true,"listing":{"id":1}}"#;
    Mock::given(method("POST"))
        .and(path("/listings"))
        .and(body_string("user_id=7&listing_type=rent&price=120"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(stub_body, "application/json"))
        .expect(1)
        .mount(&backend)
        .await;

    let (base, shutdown_tx, handle) = start_gateway(&backend.uri(), &backend.uri()).await;

    let client = reqwest::Client::new();
    let resp = client
        .post(format!("{base}/public-api/listings"))
        .json(&json!({"user_id": 7, "listing_type": "rent", "price": 120}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), stub_body);

    let _ = shutdown_tx.send(());
    let _ = handle.await;
}

#[tokio::test]
async fn listing_create_accumulates_all_errors() {
    let backend = MockServer::start().await;
    let (base, shutdown_tx, handle) = start_gateway(&backend.uri(), &backend.uri()).await;

    let client = reqwest::Client::new();
    let resp = client
        .post(format!("{base}/public-api/listings"))
        .json(&json!({"user_id": "x", "listing_type": "lease", "price": 0}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    let errors: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e.as_str().unwrap())
        .collect();
    assert_eq!(errors.len(), 3);
    assert!(errors.contains(&"invalid user_id"));
    assert!(errors.contains(&"invalid listing_type. Supported values: 'rent', 'sale'"));
    assert!(errors.contains(&"price must be greater than 0"));
    assert!(backend.received_requests().await.unwrap().is_empty());

    let _ = shutdown_tx.send(());
    let _ = handle.await;
}

#[tokio::test]
async fn backend_application_errors_are_relayed_not_rewritten() {
    let backend = MockServer::start().await;
    let stub_body = r#"{"result":false,"errors":["Error while adding listing to db"]}"#;
    Mock::given(method("POST"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(500).set_body_raw(stub_body, "application/json"))
        .expect(1)
        .mount(&backend)
        .await;

    let (base, shutdown_tx, handle) = start_gateway(&backend.uri(), &backend.uri()).await;

    let client = reqwest::Client::new();
    let resp = client
        .post(format!("{base}/public-api/users"))
        .json(&json!({"name": "Alice"}))
        .send()
        .await
        .unwrap();
    // status and body pass through untouched
    assert_eq!(resp.status(), 500);
    assert_eq!(resp.text().await.unwrap(), stub_body);

    let _ = shutdown_tx.send(());
    let _ = handle.await;
}

#[tokio::test]
async fn identical_requests_relay_identical_bytes() {
    let backend = MockServer::start().await;
    let stub_body = r#"{"result":true,"listings":[{"id":3,"price":120}]}"#;
    Mock::given(method("GET"))
        .and(path("/listings"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(stub_body, "application/json"))
        .expect(2)
        .mount(&backend)
        .await;

    let (base, shutdown_tx, handle) = start_gateway(&backend.uri(), &backend.uri()).await;

    let url = format!("{base}/public-api/listings?page_num=2&page_size=5");
    let first = reqwest::get(&url).await.unwrap().text().await.unwrap();
    let second = reqwest::get(&url).await.unwrap().text().await.unwrap();
    assert_eq!(first, second);

    let _ = shutdown_tx.send(());
    let _ = handle.await;
}
