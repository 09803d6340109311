use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::errors::{AppError, ResultExt};
use crate::models::{DataBag, InquiryPayload};

/// Identity and timestamp assigned by the database on insert.
#[derive(Debug, Clone, PartialEq)]
pub struct SavedInquiry {
    pub id: i32,
    pub created_at: DateTime<Utc>,
}

/// Database storage for accepted inquiries.
///
/// Records are insert-once: there is no update or delete path. The inquiry
/// handler treats every failure here as non-fatal.
pub struct InquiryStorage {
    pool: PgPool,
}

impl InquiryStorage {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the inquiries table if it does not exist. Runs at startup.
    pub async fn init_schema(&self) -> Result<(), AppError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS inquiries (
                id SERIAL PRIMARY KEY,
                service_name VARCHAR(255) NOT NULL,
                email VARCHAR(255) NOT NULL,
                phone VARCHAR(20),
                business_name VARCHAR(255),
                data JSONB,
                created_at TIMESTAMPTZ DEFAULT now(),
                updated_at TIMESTAMPTZ DEFAULT now()
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .context("initializing inquiries schema")?;

        tracing::info!("Inquiries schema initialized");
        Ok(())
    }

    /// Insert one inquiry row and return the generated identifier.
    ///
    /// `merged_data` is the full data bag (submitter email included) and is
    /// stored verbatim as JSONB so service-specific fields survive even when
    /// no column exists for them.
    pub async fn save_inquiry(
        &self,
        payload: &InquiryPayload,
        merged_data: &DataBag,
    ) -> Result<SavedInquiry, AppError> {
        let data_json = serde_json::to_value(merged_data)
            .map_err(|e| AppError::InternalError(format!("Failed to serialize inquiry: {}", e)))?;

        let (id, created_at): (i32, DateTime<Utc>) = sqlx::query_as(
            r#"
            INSERT INTO inquiries (service_name, email, phone, business_name, data)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, created_at
            "#,
        )
        .bind(&payload.service_name)
        .bind(&payload.email)
        .bind(payload.phone())
        .bind(payload.business_name())
        .bind(data_json)
        .fetch_one(&self.pool)
        .await
        .context("inserting inquiry")?;

        tracing::debug!("Stored inquiry id={} for {}", id, payload.service_name);
        Ok(SavedInquiry { id, created_at })
    }
}
