use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::email::{compose_admin_email, compose_customer_email};
use crate::errors::AppError;
use crate::mailer::Mailer;
use crate::models::{DataBag, EmailOutcome, InquiryPayload, InquiryResponse};
use crate::storage::InquiryStorage;
use crate::validation::validate_inquiry;

/// One slow dependency must not hold a request open indefinitely.
const PERSIST_TIMEOUT: Duration = Duration::from_secs(5);
const SEND_TIMEOUT: Duration = Duration::from_secs(15);

/// Shared application state injected into handlers.
///
/// Built once at startup and passed in explicitly; there is no lazily
/// initialized global transport or pool.
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// Inquiry persistence. `None` when no database is configured, in which
    /// case the service runs email-only.
    pub storage: Option<InquiryStorage>,
    /// Email transport.
    pub mailer: Arc<dyn Mailer>,
}

/// POST /api/send-inquiry
///
/// Flow:
/// 1. Validate the body; itemized 400 on failure, no side effects.
/// 2. Merge the submitter email into the data bag.
/// 3. Best-effort persist (failure logged, id omitted).
/// 4. Best-effort admin notification email.
/// 5. Best-effort customer confirmation email, independent of step 4.
/// 6. 200 with whichever outcomes succeeded. The contract is "the inquiry
///    was accepted", not "notifications were delivered", so a 200 is
///    returned even when every side effect failed.
pub async fn send_inquiry(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<InquiryResponse>), AppError> {
    let payload = validate_inquiry(&body)?;
    tracing::info!(
        "Received inquiry: service='{}', email='{}'",
        payload.service_name,
        payload.email
    );

    let merged_data = payload.merged_data();

    let inquiry_id = attempt_persist(&state, &payload, &merged_data).await;
    let admin_email = attempt_admin_email(&state, &payload, &merged_data).await;
    let customer_email = attempt_customer_email(&state, &payload).await;

    tracing::info!(
        "Inquiry processed: id={:?}, admin_sent={}, customer_sent={}",
        inquiry_id,
        admin_email.is_some(),
        customer_email.is_some()
    );

    Ok((
        StatusCode::OK,
        Json(InquiryResponse {
            success: true,
            message: "Inquiry submitted successfully".to_string(),
            inquiry_id,
            admin_email,
            customer_email,
        }),
    ))
}

/// Best-effort insert. Any storage failure (or timeout) is logged and the
/// workflow proceeds without a record id.
async fn attempt_persist(
    state: &AppState,
    payload: &InquiryPayload,
    merged_data: &DataBag,
) -> Option<i32> {
    let storage = state.storage.as_ref()?;

    match tokio::time::timeout(PERSIST_TIMEOUT, storage.save_inquiry(payload, merged_data)).await
    {
        Ok(Ok(saved)) => {
            tracing::info!("Inquiry persisted: id={}", saved.id);
            Some(saved.id)
        }
        Ok(Err(e)) => {
            tracing::error!("Database error (non-critical): {}", e);
            None
        }
        Err(_) => {
            tracing::error!(
                "Inquiry insert timed out after {:?} (non-critical)",
                PERSIST_TIMEOUT
            );
            None
        }
    }
}

/// Best-effort admin notification. Reply-To points at the submitter so the
/// admin can answer directly.
async fn attempt_admin_email(
    state: &AppState,
    payload: &InquiryPayload,
    merged_data: &DataBag,
) -> Option<EmailOutcome> {
    let email = compose_admin_email(&payload.service_name, merged_data);

    let send = state
        .mailer
        .send(&email, &state.config.admin_email, Some(&payload.email));
    match tokio::time::timeout(SEND_TIMEOUT, send).await {
        Ok(Ok(receipt)) => Some(EmailOutcome {
            success: true,
            message_id: receipt.message_id,
            message: "Email sent successfully".to_string(),
        }),
        Ok(Err(e)) => {
            tracing::error!("Admin email error (non-critical): {}", e);
            None
        }
        Err(_) => {
            tracing::error!(
                "Admin email send timed out after {:?} (non-critical)",
                SEND_TIMEOUT
            );
            None
        }
    }
}

/// Best-effort customer confirmation, independent of the admin send outcome.
async fn attempt_customer_email(
    state: &AppState,
    payload: &InquiryPayload,
) -> Option<EmailOutcome> {
    let email = compose_customer_email(&payload.service_name);

    let send = state.mailer.send(&email, &payload.email, None);
    match tokio::time::timeout(SEND_TIMEOUT, send).await {
        Ok(Ok(receipt)) => Some(EmailOutcome {
            success: true,
            message_id: receipt.message_id,
            message: "Confirmation email sent to customer".to_string(),
        }),
        Ok(Err(e)) => {
            tracing::error!("Customer email error (non-critical): {}", e);
            None
        }
        Err(_) => {
            tracing::error!(
                "Customer email send timed out after {:?} (non-critical)",
                SEND_TIMEOUT
            );
            None
        }
    }
}

/// Fallback for non-POST methods on the inquiry route.
pub async fn method_not_allowed() -> (StatusCode, Json<Value>) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({
            "success": false,
            "message": "Method not allowed",
        })),
    )
}

/// Health check endpoint.
pub async fn health() -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "service-inquiry-api",
            "version": env!("CARGO_PKG_VERSION"),
        })),
    )
}

/// GET /api/ping
pub async fn ping(State(state): State<Arc<AppState>>) -> Json<Value> {
    let message = state
        .config
        .ping_message
        .clone()
        .unwrap_or_else(|| "ping".to_string());
    Json(json!({ "message": message }))
}
