use mockito::{Matcher, Server};
use serde_json::json;

use proxy_client::services::{AnalysisRequest, OrderRequest};
use proxy_client::transport::DocumentUpload;
use proxy_client::{ProxyClient, ProxyConfig, ProxyError};

fn test_client(base_url: &str) -> ProxyClient {
    let config = ProxyConfig::new(base_url, "integration-secret");
    ProxyClient::new(config).expect("client builds")
}

fn sample_order() -> OrderRequest {
    OrderRequest {
        document_id: "doc_1".to_string(),
        service_type: "ocr".to_string(),
        user_id: 42,
        callback_url: Some("http://web.internal/callback".to_string()),
    }
}

#[tokio::test]
async fn create_order_returns_created_body() {
    let mut server = Server::new_async().await;
    let client = test_client(&server.url());

    let mock = server
        .mock("POST", "/orders/")
        .match_header("content-type", Matcher::Exact("application/json".into()))
        .match_body(Matcher::PartialJson(json!({
            "document_id": "doc_1",
            "service_type": "ocr",
            "user_id": 42
        })))
        .with_status(201)
        .with_body(r#"{"id":"ord_1","status":"pending"}"#)
        .create_async()
        .await;

    let order = client.create_order(&sample_order()).await.unwrap();
    assert_eq!(order["id"], "ord_1");
    mock.assert_async().await;
}

#[tokio::test]
async fn create_order_rejection_is_hard_failure() {
    let mut server = Server::new_async().await;
    let client = test_client(&server.url());

    let mock = server
        .mock("POST", "/orders/")
        .with_status(400)
        .with_body(r#"{"error":"missing document_id"}"#)
        .create_async()
        .await;

    let err = client.create_order(&sample_order()).await.unwrap_err();
    assert_eq!(err.http_status(), Some(400));
    mock.assert_async().await;
}

#[tokio::test]
async fn order_results_missing_is_not_an_error() {
    let mut server = Server::new_async().await;
    let client = test_client(&server.url());

    let mock = server
        .mock("GET", "/orders/ord_1/results/")
        .with_status(404)
        .create_async()
        .await;

    let results = client.get_order_results("ord_1").await.unwrap();
    assert!(results.is_none());
    mock.assert_async().await;
}

#[tokio::test]
async fn order_results_other_failure_raises() {
    let mut server = Server::new_async().await;
    let client = test_client(&server.url());

    let mock = server
        .mock("GET", "/orders/ord_1/results/")
        .with_status(500)
        .with_body("internal error")
        .create_async()
        .await;

    let err = client.get_order_results("ord_1").await.unwrap_err();
    assert_eq!(err.http_status(), Some(500));
    mock.assert_async().await;
}

#[tokio::test]
async fn cancel_order_swallows_failures() {
    let mut server = Server::new_async().await;
    let client = test_client(&server.url());

    let rejected = server
        .mock("PUT", "/orders/ord_1/cancel/")
        .with_status(500)
        .create_async()
        .await;

    assert!(!client.cancel_order("ord_1").await);
    rejected.assert_async().await;

    // unreachable service degrades the same way
    let offline = test_client("http://127.0.0.1:1");
    assert!(!offline.cancel_order("ord_1").await);
}

#[tokio::test]
async fn cancel_order_succeeds_on_200() {
    let mut server = Server::new_async().await;
    let client = test_client(&server.url());

    let mock = server
        .mock("PUT", "/orders/ord_1/cancel/")
        .with_status(200)
        .with_body(r#"{"id":"ord_1","status":"cancelled"}"#)
        .create_async()
        .await;

    assert!(client.cancel_order("ord_1").await);
    mock.assert_async().await;
}

#[tokio::test]
async fn user_orders_degrade_to_empty_on_failure() {
    let mut server = Server::new_async().await;
    let client = test_client(&server.url());

    let mock = server
        .mock("GET", "/users/42/orders/")
        .with_status(500)
        .create_async()
        .await;

    assert!(client.get_user_orders(42).await.is_empty());
    mock.assert_async().await;
}

#[tokio::test]
async fn user_orders_parse_on_success() {
    let mut server = Server::new_async().await;
    let client = test_client(&server.url());

    let mock = server
        .mock("GET", "/users/42/orders/")
        .with_status(200)
        .with_body(r#"[{"id":"ord_1"},{"id":"ord_2"}]"#)
        .create_async()
        .await;

    let orders = client.get_user_orders(42).await;
    assert_eq!(orders.len(), 2);
    assert_eq!(orders[1]["id"], "ord_2");
    mock.assert_async().await;
}

#[tokio::test]
async fn upload_document_returns_body_unchanged() {
    let mut server = Server::new_async().await;
    let client = test_client(&server.url());

    let mock = server
        .mock("POST", "/api/documents/upload/")
        .match_header("content-type", Matcher::Regex("^multipart/form-data".into()))
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#"name="file""#.into()),
            Matcher::Regex(r#"name="file_path""#.into()),
            Matcher::Regex(r#"name="user_id""#.into()),
            Matcher::Regex(r#"name="original_name""#.into()),
        ]))
        .with_status(201)
        .with_body(r#"{"id":"doc_1","size":2048}"#)
        .create_async()
        .await;

    let upload = DocumentUpload::new(42, "contract.pdf", b"sample file contents".to_vec());
    let document = client.upload_document(upload).await.unwrap();

    assert_eq!(document, json!({"id": "doc_1", "size": 2048}));
    mock.assert_async().await;
}

#[tokio::test]
async fn upload_document_rejection_is_hard_failure() {
    let mut server = Server::new_async().await;
    let client = test_client(&server.url());

    let mock = server
        .mock("POST", "/api/documents/upload/")
        .with_status(413)
        .with_body("file too large")
        .create_async()
        .await;

    let upload = DocumentUpload::new(42, "contract.pdf", vec![0u8; 64]);
    let err = client.upload_document(upload).await.unwrap_err();
    assert_eq!(err.http_status(), Some(413));
    mock.assert_async().await;
}

#[tokio::test]
async fn document_status_degrades_to_none() {
    let mut server = Server::new_async().await;
    let client = test_client(&server.url());

    let mock = server
        .mock("GET", "/api/documents/doc_1/status/")
        .with_status(500)
        .create_async()
        .await;

    assert!(client.get_document_status("doc_1").await.is_none());
    mock.assert_async().await;
}

#[tokio::test]
async fn document_analysis_available() {
    let mut server = Server::new_async().await;
    let client = test_client(&server.url());

    let mock = server
        .mock("GET", "/api/documents/doc_1/analysis/")
        .with_status(200)
        .with_body(r#"{"pages":3,"language":"en"}"#)
        .create_async()
        .await;

    let analysis = client.get_document_analysis("doc_1").await.unwrap();
    assert_eq!(analysis["pages"], 3);
    mock.assert_async().await;
}

#[tokio::test]
async fn delete_document_accepts_204() {
    let mut server = Server::new_async().await;
    let client = test_client(&server.url());

    let mock = server
        .mock("DELETE", "/api/documents/doc_1/")
        .with_status(204)
        .create_async()
        .await;

    assert!(client.delete_document("doc_1").await);
    mock.assert_async().await;
}

#[tokio::test]
async fn start_analysis_expects_accepted() {
    let mut server = Server::new_async().await;
    let client = test_client(&server.url());

    let accepted = server
        .mock("POST", "/api/analysis/start/")
        .match_body(Matcher::PartialJson(json!({
            "document_id": "doc_1",
            "analysis_type": "ocr"
        })))
        .with_status(202)
        .with_body(r#"{"job_id":"job_7"}"#)
        .create_async()
        .await;

    let job = client
        .start_analysis(&AnalysisRequest::new("doc_1"))
        .await
        .unwrap();
    assert_eq!(job["job_id"], "job_7");
    accepted.assert_async().await;
}

#[tokio::test]
async fn list_user_documents_on_success() {
    let mut server = Server::new_async().await;
    let client = test_client(&server.url());

    let mock = server
        .mock("GET", "/api/documents/")
        .match_query(Matcher::UrlEncoded("user_id".into(), "42".into()))
        .with_status(200)
        .with_body(r#"[{"id":"doc_1"}]"#)
        .create_async()
        .await;

    let documents = client.list_user_documents(42).await;
    assert_eq!(documents.len(), 1);
    mock.assert_async().await;
}

#[tokio::test]
async fn health_check_reflects_status() {
    let mut server = Server::new_async().await;
    let client = test_client(&server.url());

    let healthy = server
        .mock("GET", "/health/")
        .with_status(200)
        .create_async()
        .await;

    assert!(client.health_check().await);
    healthy.assert_async().await;

    let offline = test_client("http://127.0.0.1:1");
    assert!(!offline.health_check().await);
}

#[tokio::test]
async fn service_status_available() {
    let mut server = Server::new_async().await;
    let client = test_client(&server.url());

    let mock = server
        .mock("GET", "/status/")
        .with_status(200)
        .with_body(r#"{"uptime":1234,"queue_depth":0}"#)
        .create_async()
        .await;

    let status = client.get_service_status().await.unwrap();
    assert_eq!(status["uptime"], 1234);
    mock.assert_async().await;
}

#[tokio::test]
async fn service_status_degrades_to_none() {
    let mut server = Server::new_async().await;
    let client = test_client(&server.url());

    let mock = server
        .mock("GET", "/status/")
        .with_status(503)
        .create_async()
        .await;

    assert!(client.get_service_status().await.is_none());
    mock.assert_async().await;
}

#[tokio::test]
async fn connection_refused_embeds_original_message() {
    let offline = test_client("http://127.0.0.1:1");

    let err = offline.get_order("ord_1").await.unwrap_err();
    match err {
        ProxyError::Connection(message) => assert!(!message.is_empty()),
        other => panic!("expected Connection error, got {other:?}"),
    }
}
