//! Guest registration domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// One row in an event's guest registry.
///
/// Created exactly once on a successful, non-duplicate submission; never
/// updated or deleted afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRecord {
    pub inviter_name: String,
    pub first_name: String,
    pub last_name: String,
    /// Digits only; together with `country_code` this is the dedup key.
    pub phone: String,
    pub country_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_name: Option<String>,
    /// Set server-side at write time, never client-supplied.
    pub timestamp: DateTime<Utc>,
}

/// Request body for `POST /api/guests`.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterGuestRequest {
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub inviter_name: String,

    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub first_name: String,

    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub last_name: String,

    /// Accepted in any formatting; normalized to digits before storage.
    #[validate(custom(function = "shared::validation::validate_phone"))]
    pub phone: String,

    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub country_code: String,

    #[validate(length(max = 254, message = "Email address is too long"))]
    pub email: Option<String>,

    pub event_name: Option<String>,

    /// Which event's registry to use; falls back to the configured default.
    pub store_ref: Option<String>,
}

/// Response after a successful registration.
///
/// `referral_slug` and `invite_token` are minted for the newly registered
/// guest so they can pass the chain on.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterGuestResponse {
    pub success: bool,
    pub data: RegistrationRecord,
    pub referral_slug: String,
    pub invite_token: String,
}

/// Response for the administrative guest listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListGuestsResponse {
    pub success: bool,
    pub count: usize,
    pub data: Vec<RegistrationRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> RegisterGuestRequest {
        RegisterGuestRequest {
            inviter_name: "Raphael".to_string(),
            first_name: "Anna".to_string(),
            last_name: "Lee".to_string(),
            phone: "50 123 4567".to_string(),
            country_code: "971".to_string(),
            email: Some("anna@example.com".to_string()),
            event_name: Some("Opening Night".to_string()),
            store_ref: None,
        }
    }

    #[test]
    fn test_register_request_valid() {
        assert!(valid_request().validate().is_ok());
    }

    #[test]
    fn test_register_request_blank_fields_rejected() {
        let mut request = valid_request();
        request.first_name = "   ".to_string();
        assert!(request.validate().is_err());

        let mut request = valid_request();
        request.inviter_name = String::new();
        assert!(request.validate().is_err());

        let mut request = valid_request();
        request.country_code = String::new();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_register_request_phone_needs_digits() {
        let mut request = valid_request();
        request.phone = "call me".to_string();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_register_request_optional_fields_absent() {
        let mut request = valid_request();
        request.email = None;
        request.event_name = None;
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_register_request_deserializes_camel_case() {
        let request: RegisterGuestRequest = serde_json::from_str(
            r#"{
                "inviterName": "Raphael",
                "firstName": "Anna",
                "lastName": "Lee",
                "phone": "501234567",
                "countryCode": "971",
                "storeRef": "opening-night"
            }"#,
        )
        .unwrap();
        assert_eq!(request.inviter_name, "Raphael");
        assert_eq!(request.store_ref.as_deref(), Some("opening-night"));
        assert!(request.email.is_none());
    }

    #[test]
    fn test_registration_record_serializes_camel_case() {
        let record = RegistrationRecord {
            inviter_name: "Raphael".to_string(),
            first_name: "Anna".to_string(),
            last_name: "Lee".to_string(),
            phone: "501234567".to_string(),
            country_code: "971".to_string(),
            email: None,
            event_name: None,
            timestamp: Utc::now(),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["inviterName"], "Raphael");
        assert_eq!(json["countryCode"], "971");
        // Absent optionals are omitted, not nulled.
        assert!(json.get("email").is_none());
    }
}
