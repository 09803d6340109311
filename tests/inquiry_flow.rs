//! End-to-end tests for the inquiry submission flow, with the SMTP transport
//! replaced by an in-memory fake so failure semantics can be exercised
//! deterministically.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use service_inquiry_api::config::Config;
use service_inquiry_api::email::ComposedEmail;
use service_inquiry_api::errors::AppError;
use service_inquiry_api::inquiry_handler::AppState;
use service_inquiry_api::mailer::{EmailReceipt, Mailer};

#[derive(Debug, Clone)]
struct SentEmail {
    to: String,
    reply_to: Option<String>,
    subject: String,
    html: String,
}

/// Records sends; fails any delivery whose recipient is listed in `fail_to`.
struct FakeMailer {
    sent: Mutex<Vec<SentEmail>>,
    fail_to: Vec<String>,
}

impl FakeMailer {
    fn new(fail_to: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            sent: Mutex::new(Vec::new()),
            fail_to: fail_to.iter().map(|s| s.to_string()).collect(),
        })
    }

    fn sent(&self) -> Vec<SentEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for FakeMailer {
    async fn send(
        &self,
        email: &ComposedEmail,
        to: &str,
        reply_to: Option<&str>,
    ) -> Result<EmailReceipt, AppError> {
        if self.fail_to.iter().any(|f| f == to) {
            return Err(AppError::EmailDelivery(format!(
                "simulated failure for {}",
                to
            )));
        }
        let mut sent = self.sent.lock().unwrap();
        let message_id = format!("<fake-{}@test.local>", sent.len());
        sent.push(SentEmail {
            to: to.to_string(),
            reply_to: reply_to.map(|s| s.to_string()),
            subject: email.subject.clone(),
            html: email.html.clone(),
        });
        Ok(EmailReceipt { message_id })
    }
}

fn test_config() -> Config {
    Config {
        database_url: None,
        port: 3000,
        smtp_email: "noreply@test.local".to_string(),
        smtp_app_password: "secret".to_string(),
        smtp_relay: "smtp.test.local".to_string(),
        admin_email: "admin@test.local".to_string(),
        ping_message: Some("pong".to_string()),
    }
}

fn test_app(mailer: Arc<FakeMailer>) -> axum::Router {
    let state = Arc::new(AppState {
        config: test_config(),
        storage: None,
        mailer,
    });
    service_inquiry_api::api_router(state)
}

async fn post_inquiry(app: axum::Router, body: Value) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/send-inquiry")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

fn valid_body() -> Value {
    json!({
        "serviceName": "Web Development",
        "email": "client@example.com",
        "data": {
            "businessName": "Acme",
            "phone": "+213699000000",
            "features": ["responsive", "seo"],
            "_source": "landing-page"
        }
    })
}

#[tokio::test]
async fn valid_inquiry_returns_success_with_both_receipts() {
    let mailer = FakeMailer::new(&[]);
    let (status, body) = post_inquiry(test_app(mailer.clone()), valid_body()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["message"], json!("Inquiry submitted successfully"));
    assert!(body["inquiryId"].is_null());
    assert_eq!(body["adminEmail"]["success"], json!(true));
    assert!(body["adminEmail"]["messageId"].is_string());
    assert_eq!(body["customerEmail"]["success"], json!(true));

    let sent = mailer.sent();
    assert_eq!(sent.len(), 2);

    // Admin notification: sent to the configured admin, reply-to the submitter
    assert_eq!(sent[0].to, "admin@test.local");
    assert_eq!(sent[0].reply_to.as_deref(), Some("client@example.com"));
    assert_eq!(sent[0].subject, "New Service Inquiry: Web Development");
    assert!(sent[0].html.contains("Business Name"));
    assert!(sent[0].html.contains("responsive, seo"));
    // Hidden keys stay out of the rendered table
    assert!(!sent[0].html.contains("landing-page"));

    // Customer confirmation: sent to the submitter, no reply-to
    assert_eq!(sent[1].to, "client@example.com");
    assert_eq!(sent[1].reply_to, None);
    assert_eq!(sent[1].subject, "Inquiry Confirmation: Web Development");
}

#[tokio::test]
async fn missing_service_name_is_rejected_without_side_effects() {
    let mailer = FakeMailer::new(&[]);
    let body = json!({"email": "client@example.com"});
    let (status, response) = post_inquiry(test_app(mailer.clone()), body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["success"], json!(false));
    assert_eq!(response["message"], json!("Validation error"));
    assert_eq!(response["errors"][0]["field"], json!("serviceName"));
    assert_eq!(
        response["errors"][0]["message"],
        json!("Service name is required")
    );

    assert!(mailer.sent().is_empty(), "no email attempt may occur");
}

#[tokio::test]
async fn empty_service_name_is_rejected() {
    let mailer = FakeMailer::new(&[]);
    let body = json!({"serviceName": "", "email": "client@example.com"});
    let (status, _) = post_inquiry(test_app(mailer.clone()), body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(mailer.sent().is_empty());
}

#[tokio::test]
async fn invalid_email_is_rejected() {
    let mailer = FakeMailer::new(&[]);
    let body = json!({"serviceName": "SEO", "email": "not-an-email"});
    let (status, response) = post_inquiry(test_app(mailer.clone()), body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["errors"][0]["field"], json!("email"));
    assert!(mailer.sent().is_empty());
}

#[tokio::test]
async fn total_email_failure_still_returns_success() {
    let mailer = FakeMailer::new(&["admin@test.local", "client@example.com"]);
    let (status, body) = post_inquiry(test_app(mailer.clone()), valid_body()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert!(body["adminEmail"].is_null());
    assert!(body["customerEmail"].is_null());
    assert!(mailer.sent().is_empty());
}

#[tokio::test]
async fn customer_send_is_independent_of_admin_failure() {
    let mailer = FakeMailer::new(&["admin@test.local"]);
    let (status, body) = post_inquiry(test_app(mailer.clone()), valid_body()).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["adminEmail"].is_null());
    assert_eq!(body["customerEmail"]["success"], json!(true));

    let sent = mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "client@example.com");
}

#[tokio::test]
async fn non_post_methods_yield_405() {
    for method in ["GET", "PUT", "DELETE", "PATCH"] {
        let mailer = FakeMailer::new(&[]);
        let response = test_app(mailer)
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri("/api/send-inquiry")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.status(),
            StatusCode::METHOD_NOT_ALLOWED,
            "method {}",
            method
        );
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["message"], json!("Method not allowed"));
    }
}

#[tokio::test]
async fn health_and_ping_respond() {
    let mailer = FakeMailer::new(&[]);
    let app = test_app(mailer);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/ping")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["message"], json!("pong"));
}
