//! Integration tests for the HTTP surface: probes, rejections, and the
//! authorization gate.

mod common;

use axum::http::StatusCode;
use common::server::{authorized_headers, json_request};
use common::TestServer;
use serde_json::json;

#[tokio::test]
async fn test_health() {
    let server = TestServer::new().await;

    let (status, body) = json_request(&server.router, "GET", "/health", None, &[]).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["carrel"], json!("Started"));
    assert_eq!(body["search"], json!("OK"));
}

#[tokio::test]
async fn test_version() {
    let server = TestServer::new().await;

    let (status, body) = json_request(&server.router, "GET", "/version", None, &[]).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.get("version").is_some());
}

#[tokio::test]
async fn test_bad_method() {
    let server = TestServer::new().await;

    let (status, body) = json_request(&server.router, "POST", "/health", None, &[]).await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(
        body["rejection"],
        json!("HTTP method not allowed, supported methods: GET")
    );
}

#[tokio::test]
async fn test_bad_method_on_query() {
    let server = TestServer::new().await;

    let (status, body) = json_request(
        &server.router,
        "GET",
        "/readgroup/query/v1",
        None,
        &authorized_headers(),
    )
    .await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(
        body["rejection"],
        json!("HTTP method not allowed, supported methods: POST")
    );
}

#[tokio::test]
async fn test_bad_path() {
    let server = TestServer::new().await;

    let (status, body) = json_request(&server.router, "GET", "/badpath", None, &[]).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body["rejection"],
        json!("The requested resource could not be found.")
    );
}

/// The gate truth table: each of access_token/expires_in/email is mandatory
/// on its own; sub and user_id alternate.
#[tokio::test]
async fn test_authorization() {
    let server = TestServer::new().await;

    let headers = vec![
        ("OIDC_access_token", "OIDC_access_token"),
        ("OIDC_CLAIM_expires_in", "1234567890"),
        ("OIDC_CLAIM_email", "OIDC_CLAIM_email"),
        ("OIDC_CLAIM_sub", "OIDC_CLAIM_sub or OIDC_CLAIM_user_id"),
        ("OIDC_CLAIM_user_id", "OIDC_CLAIM_sub or OIDC_CLAIM_user_id"),
    ];
    let expectations = [
        ("OIDC_access_token", StatusCode::FORBIDDEN),
        ("OIDC_CLAIM_expires_in", StatusCode::FORBIDDEN),
        ("OIDC_CLAIM_email", StatusCode::FORBIDDEN),
        ("OIDC_CLAIM_sub", StatusCode::OK),
        ("OIDC_CLAIM_user_id", StatusCode::OK),
    ];

    let (status, body) =
        json_request(&server.router, "GET", "/authorization", None, &headers).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({}));

    for (dropped, expected) in expectations {
        let without: Vec<_> = headers
            .iter()
            .copied()
            .filter(|(name, _)| *name != dropped)
            .collect();
        let (status, body) =
            json_request(&server.router, "GET", "/authorization", None, &without).await;
        assert_eq!(status, expected, "without {dropped}");
        if expected == StatusCode::FORBIDDEN {
            assert_eq!(body["rejection"], json!("Not authorized."));
        }
    }

    // both identity alternatives missing
    let without_identity: Vec<_> = headers
        .iter()
        .copied()
        .filter(|(name, _)| !name.ends_with("sub") && !name.ends_with("user_id"))
        .collect();
    let (status, _) = json_request(
        &server.router,
        "GET",
        "/authorization",
        None,
        &without_identity,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_engines_require_claims() {
    let server = TestServer::new().await;

    let (status, _) = json_request(
        &server.router,
        "POST",
        "/readgroup/metadata/v1/barcode1/1/lib",
        Some(json!({"project": "p"})),
        &[],
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = json_request(
        &server.router,
        "POST",
        "/readgroup/query/v1",
        Some(json!({})),
        &[],
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // store unchanged by the rejected upsert
    let (status, body) = json_request(
        &server.router,
        "POST",
        "/readgroup/queryall/v1",
        Some(json!({})),
        &authorized_headers(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_read_group_schema_v1() {
    let server = TestServer::new().await;

    let (status, body) =
        json_request(&server.router, "GET", "/readgroup/schema/v1", None, &[]).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["type"], json!("object"));
    assert_eq!(
        body["required"],
        json!(["flowcell_barcode", "lane", "library_name"])
    );
    let properties = body["properties"].as_object().unwrap();
    assert_eq!(properties.len(), 34);
    assert_eq!(properties["flowcell_barcode"], json!({"type": "string"}));
    assert_eq!(
        properties["lane"],
        json!({"type": "integer", "format": "int32"})
    );
    assert_eq!(
        properties["ubam_size"],
        json!({"type": "integer", "format": "int64"})
    );
    assert_eq!(properties["paired_run"], json!({"type": "boolean"}));
    assert_eq!(
        properties["run_date"],
        json!({"type": "string", "format": "date-time"})
    );
}

#[tokio::test]
async fn test_read_group_schema_v2_adds_fields() {
    let server = TestServer::new().await;

    let (status, body) =
        json_request(&server.router, "GET", "/readgroup/schema/v2", None, &[]).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["required"],
        json!(["flowcell_barcode", "lane", "library_name", "location"])
    );
    let properties = body["properties"].as_object().unwrap();
    assert_eq!(properties.len(), 37);
    assert_eq!(properties["location"], json!({"type": "string"}));
    assert_eq!(properties["document_status"], json!({"type": "string"}));
    assert_eq!(properties["notes"], json!({"type": "string"}));
}

#[tokio::test]
async fn test_unknown_kind_and_version_are_not_found() {
    let server = TestServer::new().await;

    for uri in [
        "/samples/schema/v1",
        "/readgroup/schema/v9",
    ] {
        let (status, body) = json_request(&server.router, "GET", uri, None, &[]).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(
            body["rejection"],
            json!("The requested resource could not be found.")
        );
    }

    let (status, _) = json_request(
        &server.router,
        "POST",
        "/samples/query/v1",
        Some(json!({})),
        &authorized_headers(),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
