use serde_json::Value;
use thiserror::Error;

use super::models::NotificationBody;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NotificationValidationError {
    #[error("body is not valid JSON: {0}")]
    MalformedJson(String),
    #[error("body must be a JSON object")]
    NotAnObject,
    #[error("email must be a non-empty string")]
    MissingEmail,
    #[error("query must be a non-empty string")]
    MissingQuery,
}

/// A notification request that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidNotification {
    pub email: String,
    pub query: String,
}

pub fn validate_notification_body(
    body: &str,
) -> Result<ValidNotification, NotificationValidationError> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| NotificationValidationError::MalformedJson(e.to_string()))?;

    if !value.is_object() {
        return Err(NotificationValidationError::NotAnObject);
    }

    let parsed: NotificationBody = serde_json::from_value(value)
        .map_err(|e| NotificationValidationError::MalformedJson(e.to_string()))?;

    let email = non_blank_string(parsed.email).ok_or(NotificationValidationError::MissingEmail)?;
    let query = non_blank_string(parsed.query).ok_or(NotificationValidationError::MissingQuery)?;

    Ok(ValidNotification { email, query })
}

fn non_blank_string(value: Option<Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_valid_body() {
        let valid =
            validate_notification_body(r#"{"email": "a@b.com", "query": "things"}"#).unwrap();
        assert_eq!(valid.email, "a@b.com");
        assert_eq!(valid.query, "things");
    }

    #[test]
    fn test_ignores_unknown_fields() {
        let body = r#"{"email": "a@b.com", "query": "things", "x": 1}"#;
        let valid = validate_notification_body(body).unwrap();
        assert_eq!(valid.query, "things");
    }

    #[test]
    fn test_rejects_empty_object() {
        assert_eq!(
            validate_notification_body("{}").unwrap_err(),
            NotificationValidationError::MissingEmail
        );
    }

    #[test]
    fn test_rejects_missing_query() {
        assert_eq!(
            validate_notification_body(r#"{"email": "a@b.com"}"#).unwrap_err(),
            NotificationValidationError::MissingQuery
        );
    }

    #[test]
    fn test_rejects_blank_and_non_string_fields() {
        assert_eq!(
            validate_notification_body(r#"{"email": "", "query": "things"}"#).unwrap_err(),
            NotificationValidationError::MissingEmail
        );
        assert_eq!(
            validate_notification_body(r#"{"email": "a@b.com", "query": 42}"#).unwrap_err(),
            NotificationValidationError::MissingQuery
        );
        assert_eq!(
            validate_notification_body(r#"{"email": null, "query": "things"}"#).unwrap_err(),
            NotificationValidationError::MissingEmail
        );
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            validate_notification_body("{\"email\": ").unwrap_err(),
            NotificationValidationError::MalformedJson(_)
        ));
    }

    #[test]
    fn test_rejects_non_object() {
        assert_eq!(
            validate_notification_body(r#"["a@b.com", "things"]"#).unwrap_err(),
            NotificationValidationError::NotAnObject
        );
    }
}
