//! Guest registration orchestration.
//!
//! The only component the HTTP boundary calls for registry access. One
//! request runs validate -> resolve event -> read registry -> duplicate
//! check -> append, with no retries; retry policy belongs to callers.
//!
//! The read and the append are two separate store round trips with no
//! transaction between them (see `persistence::registry` for the race this
//! leaves open).

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tracing::info;
use validator::Validate;

use domain::models::{RegisterGuestRequest, RegistrationRecord};
use persistence::{is_duplicate, GuestRegistry, RowStore, StoreError};

use crate::config::Config;
use crate::error::ApiError;

/// Errors that can occur during registration.
#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Persistence error: {0}")]
    Persistence(#[from] StoreError),
}

impl From<RegistrationError> for ApiError {
    fn from(err: RegistrationError) -> Self {
        match err {
            RegistrationError::Validation(msg) => ApiError::Validation(msg),
            RegistrationError::Configuration(msg) => ApiError::Configuration(msg),
            RegistrationError::Persistence(err) => ApiError::Persistence(err.to_string()),
        }
    }
}

/// Outcome of a registration attempt. A duplicate is an expected, modeled
/// outcome, not an error.
#[derive(Debug)]
pub enum RegistrationOutcome {
    Registered(RegistrationRecord),
    Duplicate,
}

/// Orchestrates guest registration against the configured registries.
#[derive(Clone)]
pub struct RegistrationService {
    store: Arc<dyn RowStore>,
    config: Arc<Config>,
}

impl RegistrationService {
    /// Creates a service over the given store and configuration.
    pub fn new(store: Arc<dyn RowStore>, config: Arc<Config>) -> Self {
        Self { store, config }
    }

    /// Registers a guest.
    ///
    /// Validation and event resolution happen before any store access. The
    /// duplicate check runs against whatever the registry returned — a
    /// degraded (failed) read reads as empty, trading a possible duplicate
    /// row for availability.
    pub async fn register(
        &self,
        request: RegisterGuestRequest,
    ) -> Result<RegistrationOutcome, RegistrationError> {
        request
            .validate()
            .map_err(|errors| RegistrationError::Validation(flatten_errors(errors)))?;

        let registry = self.registry_for(request.store_ref.as_deref())?;

        let existing = registry.read_all().await;
        let country_code = request.country_code.trim();
        if is_duplicate(&existing, &request.phone, country_code) {
            info!(sheet = %registry.sheet(), "Duplicate registration attempt");
            return Ok(RegistrationOutcome::Duplicate);
        }

        let record = build_record(&request);
        registry.append(&record).await?;

        info!(
            sheet = %registry.sheet(),
            inviter = %record.inviter_name,
            "Guest registered"
        );
        Ok(RegistrationOutcome::Registered(record))
    }

    /// Lists every registration in the resolved event's registry.
    pub async fn list(
        &self,
        store_ref: Option<&str>,
    ) -> Result<Vec<RegistrationRecord>, RegistrationError> {
        let registry = self.registry_for(store_ref)?;
        Ok(registry.read_all().await)
    }

    fn registry_for(&self, store_ref: Option<&str>) -> Result<GuestRegistry, RegistrationError> {
        let event = self
            .config
            .resolve_event(store_ref)
            .map_err(|err| RegistrationError::Configuration(err.to_string()))?;
        Ok(GuestRegistry::new(self.store.clone(), event.sheet.clone()))
    }
}

/// Builds the record to persist: fields trimmed, phone normalized to
/// digits, timestamp taken now, server-side.
fn build_record(request: &RegisterGuestRequest) -> RegistrationRecord {
    RegistrationRecord {
        inviter_name: request.inviter_name.trim().to_string(),
        first_name: request.first_name.trim().to_string(),
        last_name: request.last_name.trim().to_string(),
        phone: shared::phone::digits_only(&request.phone),
        country_code: request.country_code.trim().to_string(),
        email: normalized_optional(&request.email),
        event_name: normalized_optional(&request.event_name),
        timestamp: Utc::now(),
    }
}

fn normalized_optional(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn flatten_errors(errors: validator::ValidationErrors) -> String {
    errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |err| {
                format!(
                    "{}: {}",
                    field,
                    err.message.clone().unwrap_or_else(|| "invalid".into())
                )
            })
        })
        .collect::<Vec<_>>()
        .join(", ")
}
