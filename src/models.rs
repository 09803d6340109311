use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// A single value in the open inquiry data bag.
///
/// Service-specific forms submit arbitrary keys, so values arrive as free text,
/// lists of selected options, or occasionally raw JSON scalars from checkbox
/// and numeric inputs. `BTreeMap` keeps rendering order deterministic.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
    Other(Value),
}

impl FieldValue {
    /// Whether this value should be dropped from human-readable rendering.
    /// Mirrors JS truthiness: empty strings, empty lists, null, false and 0
    /// are all considered empty.
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(s) => s.is_empty(),
            FieldValue::List(items) => items.is_empty(),
            FieldValue::Other(v) => match v {
                Value::Null => true,
                Value::Bool(b) => !b,
                Value::Number(n) => n.as_f64() == Some(0.0),
                Value::String(s) => s.is_empty(),
                Value::Array(a) => a.is_empty(),
                Value::Object(_) => false,
            },
        }
    }

    /// Display form for email tables: lists are joined with `", "`, scalars
    /// are rendered as-is.
    pub fn display(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::List(items) => items.join(", "),
            FieldValue::Other(v) => match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            },
        }
    }

    /// The value as plain text, if it is a text field.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            FieldValue::Other(Value::String(s)) => Some(s),
            _ => None,
        }
    }
}

/// Open mapping of form field name to value.
pub type DataBag = BTreeMap<String, FieldValue>;

/// A validated service inquiry.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct InquiryPayload {
    #[serde(rename = "serviceName")]
    pub service_name: String,
    pub email: String,
    #[serde(default)]
    pub data: DataBag,
}

impl InquiryPayload {
    /// Combine the submitter email with the data bag, as used for rendering
    /// and storage. Form-supplied `email` keys take precedence, matching the
    /// original spread semantics.
    pub fn merged_data(&self) -> DataBag {
        let mut merged = DataBag::new();
        merged.insert("email".to_string(), FieldValue::Text(self.email.clone()));
        merged.extend(self.data.clone());
        merged
    }

    /// Phone number extracted from the data bag, when present as text.
    pub fn phone(&self) -> Option<&str> {
        self.data
            .get("phone")
            .and_then(FieldValue::as_text)
            .filter(|s| !s.is_empty())
    }

    /// Business name extracted from the data bag, when present as text.
    pub fn business_name(&self) -> Option<&str> {
        self.data
            .get("businessName")
            .and_then(FieldValue::as_text)
            .filter(|s| !s.is_empty())
    }
}

/// Delivery outcome for one email send attempt, echoed back to the client.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EmailOutcome {
    pub success: bool,
    pub message_id: String,
    pub message: String,
}

/// Success envelope for `POST /api/send-inquiry`.
///
/// `admin_email` / `customer_email` are `null` when the corresponding send
/// failed; `inquiry_id` is `null` when persistence was skipped or failed.
/// The envelope is a 200 either way.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InquiryResponse {
    pub success: bool,
    pub message: String,
    pub inquiry_id: Option<i32>,
    pub admin_email: Option<EmailOutcome>,
    pub customer_email: Option<EmailOutcome>,
}
