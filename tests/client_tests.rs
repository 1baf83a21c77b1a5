//! Mock-server tests for the belvo-rs client.
//!
//! These tests use wiremock to simulate the Belvo API and exercise the
//! crate's behavior without network access or real credentials.

use std::sync::Once;

use futures_util::StreamExt;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use belvo_rs::api::{LinkCreateOptions, TaxReturnCreateOptions, TransactionCreateOptions};
use belvo_rs::{BelvoClient, Session};

static INIT: Once = Once::new();

/// Initialize logging for tests
fn init_logging() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// Create a client against a mock server with a token pair pre-installed.
async fn client_with_tokens(server: &MockServer) -> BelvoClient {
    init_logging();
    BelvoClient::with_tokens(server.uri(), "test-access", "test-refresh")
        .await
        .unwrap()
}

// ============================================================================
// Authentication Tests
// ============================================================================

#[tokio::test]
async fn test_login_installs_bearer_header_from_access_field() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/token"))
        .and(body_json(json!({
            "username": "monty",
            "password": "python",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access": "123456-so-fake",
            "refresh": "654321-also-fake",
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/links/some-link/"))
        .and(header("authorization", "Bearer 123456-so-fake"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "some-link"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = BelvoClient::login(server.uri(), "monty", "python")
        .await
        .unwrap();

    assert_eq!(
        client.session().access_token().await.as_deref(),
        Some("123456-so-fake")
    );
    assert_eq!(
        client.session().refresh_token().await.as_deref(),
        Some("654321-also-fake")
    );

    let link = client.links().get("some-link").await.unwrap();
    assert_eq!(link["id"], "some-link");
}

#[tokio::test]
async fn test_login_denied_on_bad_status_without_error() {
    init_logging();

    for status in [400u16, 401, 403, 500] {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/token"))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let session = Session::new(server.uri()).unwrap();
        let outcome = session.login("monty", "python").await.unwrap();

        assert!(!outcome.is_logged_in(), "status {} should deny", status);
        assert!(!session.is_authenticated().await);
    }
}

#[tokio::test]
async fn test_denied_login_leaves_prior_tokens_untouched() {
    init_logging();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/token"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({})))
        .mount(&server)
        .await;

    let session = Session::new(server.uri()).unwrap();
    session.set_tokens("old-access", "old-refresh").await;

    let outcome = session.login("monty", "wrong-password").await.unwrap();
    assert!(!outcome.is_logged_in());

    assert_eq!(session.access_token().await.as_deref(), Some("old-access"));
    assert_eq!(session.refresh_token().await.as_deref(), Some("old-refresh"));
}

#[tokio::test]
async fn test_with_tokens_sends_bearer_credential() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/accounts/acc-1/"))
        .and(header("authorization", "Bearer test-access"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "acc-1"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_with_tokens(&server).await;
    let account = client.accounts().get("acc-1").await.unwrap();
    assert_eq!(account["id"], "acc-1");
}

// ============================================================================
// Delete Tests
// ============================================================================

#[tokio::test]
async fn test_delete_rejected_on_bad_status_without_error() {
    init_logging();

    for status in [400u16, 401, 403, 500] {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/api/links/666/"))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_with_tokens(&server).await;
        let outcome = client.links().delete("666").await.unwrap();

        assert!(!outcome.is_deleted(), "status {} should reject", status);
    }
}

#[tokio::test]
async fn test_delete_succeeds_on_2xx() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/accounts/acc-1/"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_with_tokens(&server).await;
    let outcome = client.accounts().delete("acc-1").await.unwrap();
    assert!(outcome.is_deleted());
}

// ============================================================================
// Pagination Tests
// ============================================================================

#[tokio::test]
async fn test_list_follows_next_link_and_yields_all_pages() {
    let server = MockServer::start().await;
    let page_two_url = format!("{}/api/institutions/?page=2", server.uri());

    Mock::given(method("GET"))
        .and(path("/api/institutions/"))
        .and(query_param_is_missing("page"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "next": page_two_url,
            "count": 10,
            "results": ["one", "two", "three", "four", "five"],
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/institutions/"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "next": null,
            "count": 10,
            "results": ["six", "seven", "eight", "nine", "ten"],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_with_tokens(&server).await;
    let mut stream = client.institutions().list().unwrap();

    let mut results = Vec::new();
    while let Some(record) = stream.next().await {
        results.push(record.unwrap());
    }

    let expected: Vec<serde_json::Value> = [
        "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
    ]
    .iter()
    .map(|s| json!(s))
    .collect();
    assert_eq!(results, expected);
}

#[tokio::test]
async fn test_list_forwards_filters_as_query_parameters() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/transactions/"))
        .and(query_param("link", "link-1"))
        .and(query_param("account", "acc-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "next": null,
            "count": 1,
            "results": [{"id": "txn-1"}],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_with_tokens(&server).await;
    let mut stream = client
        .transactions()
        .list_filtered(&[("link", "link-1"), ("account", "acc-1")])
        .unwrap();

    let record = stream.next().await.unwrap().unwrap();
    assert_eq!(record["id"], "txn-1");
    assert!(stream.next().await.is_none());
}

#[tokio::test]
async fn test_list_terminates_after_mid_stream_error() {
    let server = MockServer::start().await;
    let page_two_url = format!("{}/api/owners/?page=2", server.uri());

    Mock::given(method("GET"))
        .and(path("/api/owners/"))
        .and(query_param_is_missing("page"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "next": page_two_url,
            "count": 4,
            "results": ["a", "b"],
        })))
        .mount(&server)
        .await;

    // Second page is not JSON at all; the decode failure must surface once
    // and then end the stream.
    Mock::given(method("GET"))
        .and(path("/api/owners/"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(500).set_body_string("gateway exploded"))
        .mount(&server)
        .await;

    let client = client_with_tokens(&server).await;
    let mut stream = client.owners().list().unwrap();

    assert_eq!(stream.next().await.unwrap().unwrap(), json!("a"));
    assert_eq!(stream.next().await.unwrap().unwrap(), json!("b"));
    assert!(stream.next().await.unwrap().is_err());
    assert!(stream.next().await.is_none());
}

// ============================================================================
// Create / Update Body Tests
// ============================================================================

#[tokio::test]
async fn test_link_create_omits_absent_optional_fields() {
    let server = MockServer::start().await;

    // Exact body match: no `token` or `encryption_key` key may be present.
    Mock::given(method("POST"))
        .and(path("/api/links/"))
        .and(body_json(json!({
            "institution": "banamex_mx_retail",
            "username": "monty",
            "password": "python",
            "save_data": true,
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "link-1"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_with_tokens(&server).await;
    let link = client
        .links()
        .create(
            "banamex_mx_retail",
            "monty",
            "python",
            LinkCreateOptions::default(),
        )
        .await
        .unwrap();

    assert_eq!(link["id"], "link-1");
}

#[tokio::test]
async fn test_link_create_includes_supplied_optional_fields() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/links/"))
        .and(body_json(json!({
            "institution": "banamex_mx_retail",
            "username": "monty",
            "password": "python",
            "save_data": false,
            "token": "123456",
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "link-2"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_with_tokens(&server).await;
    let link = client
        .links()
        .create(
            "banamex_mx_retail",
            "monty",
            "python",
            LinkCreateOptions {
                token: Some("123456".to_string()),
                encryption_key: None,
                save_data: false,
            },
        )
        .await
        .unwrap();

    assert_eq!(link["id"], "link-2");
}

#[tokio::test]
async fn test_link_update_puts_to_resource_url() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/links/link-1/"))
        .and(body_json(json!({
            "password": "new-password",
            "save_data": true,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "link-1"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_with_tokens(&server).await;
    let link = client
        .links()
        .update("link-1", "new-password", Default::default())
        .await
        .unwrap();

    assert_eq!(link["id"], "link-1");
}

#[tokio::test]
async fn test_transactions_create_defaults_date_to_today() {
    let server = MockServer::start().await;
    let today = chrono::Utc::now().date_naive().to_string();

    Mock::given(method("POST"))
        .and(path("/api/transactions/"))
        .and(body_json(json!({
            "link": "link-1",
            "date_from": "2026-01-01",
            "date_to": today,
            "save_data": true,
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_with_tokens(&server).await;
    let response = client
        .transactions()
        .create("link-1", "2026-01-01", TransactionCreateOptions::default())
        .await
        .unwrap();

    assert!(response.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_tax_returns_create_defaults_year_to_current_year() {
    let server = MockServer::start().await;
    let current_year = chrono::Datelike::year(&chrono::Utc::now());

    Mock::given(method("POST"))
        .and(path("/api/tax-returns/"))
        .and(body_json(json!({
            "link": "link-1",
            "year_from": 2024,
            "year_to": current_year,
            "attach_pdf": false,
            "save_data": true,
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_with_tokens(&server).await;
    client
        .tax_returns()
        .create("link-1", 2024, TaxReturnCreateOptions::default())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_invoices_create_sends_type_field() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/invoices/"))
        .and(body_json(json!({
            "link": "link-1",
            "date_from": "2026-01-01",
            "date_to": "2026-02-01",
            "type": "INFLOW",
            "save_data": true,
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_with_tokens(&server).await;
    client
        .invoices()
        .create(
            "link-1",
            "2026-01-01",
            "2026-02-01",
            "INFLOW",
            Default::default(),
        )
        .await
        .unwrap();
}

// ============================================================================
// MFA Resume Tests
// ============================================================================

#[tokio::test]
async fn test_resume_omits_link_when_absent() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/api/accounts/"))
        .and(body_json(json!({
            "session": "sess-1",
            "token": "123456",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": "acc-1"}])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_with_tokens(&server).await;
    let response = client
        .accounts()
        .resume("sess-1", "123456", None)
        .await
        .unwrap();

    assert_eq!(response[0]["id"], "acc-1");
}

#[tokio::test]
async fn test_resume_includes_link_when_supplied() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/api/links/"))
        .and(body_json(json!({
            "session": "sess-1",
            "token": "123456",
            "link": "link-1",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "link-1"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_with_tokens(&server).await;
    let response = client
        .links()
        .resume("sess-1", "123456", Some("link-1"))
        .await
        .unwrap();

    assert_eq!(response["id"], "link-1");
}

// ============================================================================
// Pass-through Contract Tests
// ============================================================================

#[tokio::test]
async fn test_post_returns_decoded_error_body_on_bad_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/accounts/"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "detail": "link is invalid",
        })))
        .mount(&server)
        .await;

    let client = client_with_tokens(&server).await;
    let response = client
        .accounts()
        .create("bad-link", Default::default())
        .await
        .unwrap();

    // Non-2xx bodies pass through undecorated; only login and delete are
    // normalized to outcomes.
    assert_eq!(response["detail"], "link is invalid");
}

#[tokio::test]
async fn test_raw_verbs_reach_arbitrary_endpoints() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/resource/666/"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/resource/42/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 42})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_with_tokens(&server).await;

    let outcome = client.delete("/api/resource", "666").await.unwrap();
    assert!(!outcome.is_deleted());

    let record = client.get::<()>("/api/resource", "42", None).await.unwrap();
    assert_eq!(record["id"], 42);
}
