//! Guest registry routes.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use domain::models::{ListGuestsResponse, RegisterGuestRequest, RegisterGuestResponse};

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::metrics::{record_duplicate_attempt, record_guest_registered};
use crate::services::{RegistrationOutcome, RegistrationService};

/// Register a guest for an event.
///
/// POST /api/guests
///
/// Responses: 200 on success, 400 on validation failure, 409 on duplicate,
/// 500 on configuration or persistence failure.
pub async fn register_guest(
    State(state): State<AppState>,
    Json(request): Json<RegisterGuestRequest>,
) -> Result<Json<RegisterGuestResponse>, ApiError> {
    let service = RegistrationService::new(state.store.clone(), state.config.clone());

    match service.register(request).await? {
        RegistrationOutcome::Duplicate => {
            record_duplicate_attempt();
            Err(ApiError::Duplicate)
        }
        RegistrationOutcome::Registered(record) => {
            record_guest_registered();

            // The next hop of the chain is minted here, statelessly; it
            // never re-enters the service.
            let full_name = format!("{} {}", record.first_name, record.last_name);
            let referral_slug = shared::referral::generate(&full_name);
            let invite_token = shared::invite_token::encode(&full_name, &record.phone);

            Ok(Json(RegisterGuestResponse {
                success: true,
                data: record,
                referral_slug,
                invite_token,
            }))
        }
    }
}

/// Query parameters for the guest listing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListGuestsQuery {
    pub store_ref: Option<String>,
}

/// List an event's registrations, for administrative inspection.
///
/// GET /api/guests?storeRef=...
pub async fn list_guests(
    State(state): State<AppState>,
    Query(query): Query<ListGuestsQuery>,
) -> Result<Json<ListGuestsResponse>, ApiError> {
    let service = RegistrationService::new(state.store.clone(), state.config.clone());
    let records = service.list(query.store_ref.as_deref()).await?;

    Ok(Json(ListGuestsResponse {
        success: true,
        count: records.len(),
        data: records,
    }))
}
