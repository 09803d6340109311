use crate::errors::{AppError, FieldError};
use crate::models::{DataBag, FieldValue, InquiryPayload};
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

/// RFC 5322 simplified email grammar: local@domain.tld
fn email_regex() -> &'static Regex {
    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    EMAIL_REGEX.get_or_init(|| {
        Regex::new(
            r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
        )
        .expect("email regex is valid")
    })
}

pub fn is_valid_email(email: &str) -> bool {
    if email.len() < 5 || !email.contains('@') || !email.contains('.') {
        return false;
    }
    email_regex().is_match(email)
}

/// Validate a raw JSON body against the inquiry schema.
///
/// Collects every violated field rather than failing on the first, so the
/// client gets itemized errors in one round trip. Deterministic and free of
/// side effects.
pub fn validate_inquiry(body: &Value) -> Result<InquiryPayload, AppError> {
    let Some(obj) = body.as_object() else {
        return Err(AppError::Validation(vec![FieldError::new(
            "body",
            "Expected a JSON object",
        )]));
    };

    let mut errors = Vec::new();

    let service_name = match obj.get("serviceName").and_then(Value::as_str) {
        Some(name) if !name.is_empty() => Some(name.to_string()),
        _ => {
            errors.push(FieldError::new("serviceName", "Service name is required"));
            None
        }
    };

    let email = match obj.get("email").and_then(Value::as_str) {
        Some(addr) if is_valid_email(addr) => Some(addr.to_string()),
        _ => {
            errors.push(FieldError::new("email", "Valid email is required"));
            None
        }
    };

    let data = match obj.get("data") {
        None | Some(Value::Null) => Some(DataBag::new()),
        Some(Value::Object(map)) => {
            let bag = map
                .iter()
                .map(|(k, v)| {
                    let value = serde_json::from_value::<FieldValue>(v.clone())
                        .unwrap_or_else(|_| FieldValue::Other(v.clone()));
                    (k.clone(), value)
                })
                .collect();
            Some(bag)
        }
        Some(_) => {
            errors.push(FieldError::new("data", "Expected an object"));
            None
        }
    };

    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    // All three are Some when no errors were recorded
    Ok(InquiryPayload {
        service_name: service_name.unwrap_or_default(),
        email: email.unwrap_or_default(),
        data: data.unwrap_or_default(),
    })
}
