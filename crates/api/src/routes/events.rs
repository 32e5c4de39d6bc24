//! Public event information routes.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::app::AppState;
use crate::error::ApiError;

/// Public view of one event's configuration. The backing sheet reference
/// stays internal.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventInfo {
    pub key: String,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner: Option<String>,
    pub guest_list_closes_at: DateTime<Utc>,
    pub party_starts_at: DateTime<Utc>,
    pub guest_list_open: bool,
}

/// Response for the event info endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventInfoResponse {
    pub success: bool,
    pub data: EventInfo,
}

/// Get public info for one configured event.
///
/// GET /api/events/:key
pub async fn get_event(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<EventInfoResponse>, ApiError> {
    let event = state
        .config
        .events
        .get(&key)
        .ok_or_else(|| ApiError::NotFound("Event not found".to_string()))?;

    Ok(Json(EventInfoResponse {
        success: true,
        data: EventInfo {
            key,
            display_name: event.display_name.clone(),
            banner: event.banner.clone(),
            guest_list_closes_at: event.guest_list_closes_at,
            party_starts_at: event.party_starts_at,
            guest_list_open: event.guest_list_open(Utc::now()),
        },
    }))
}
