//! Invite token and referral slug routes.
//!
//! Pure string endpoints over the codec: no store access, no state.

use axum::{
    extract::{Path, Query},
    Json,
};
use serde::{Deserialize, Serialize};

use shared::invite_token::{self, Invitee};
use shared::referral;

/// Query parameters for invite decoding.
#[derive(Debug, Deserialize)]
pub struct DecodeInviteQuery {
    pub token: Option<String>,
}

/// Response for invite decoding. `inviter` is null when the token cannot be
/// decoded; that is "no inviter known", not an error.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodeInviteResponse {
    pub success: bool,
    pub inviter: Option<Invitee>,
}

/// Decode an invite token into the inviter it names.
///
/// GET /api/invites/decode?token=...
pub async fn decode_invite(Query(query): Query<DecodeInviteQuery>) -> Json<DecodeInviteResponse> {
    let inviter = query.token.as_deref().and_then(invite_token::decode);

    Json(DecodeInviteResponse {
        success: true,
        inviter,
    })
}

/// Response carrying the display name recovered from a referral slug.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferralNameResponse {
    pub success: bool,
    pub name: String,
}

/// Recover the display name behind a referral slug, for the landing page.
///
/// GET /api/referral/:slug
pub async fn referral_name(Path(slug): Path<String>) -> Json<ReferralNameResponse> {
    Json(ReferralNameResponse {
        success: true,
        name: referral::recover_display_name(&slug),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_decode_invite_round_trip() {
        let token = invite_token::encode("Raphael", "501234567");
        let response = decode_invite(Query(DecodeInviteQuery { token: Some(token) })).await;

        let inviter = response.0.inviter.unwrap();
        assert_eq!(inviter.name, "Raphael");
        assert_eq!(inviter.phone, "501234567");
    }

    #[tokio::test]
    async fn test_decode_invite_garbage_yields_no_inviter() {
        let response = decode_invite(Query(DecodeInviteQuery {
            token: Some("not a token".to_string()),
        }))
        .await;

        assert!(response.0.success);
        assert!(response.0.inviter.is_none());
    }

    #[tokio::test]
    async fn test_decode_invite_missing_token() {
        let response = decode_invite(Query(DecodeInviteQuery { token: None })).await;
        assert!(response.0.inviter.is_none());
    }

    #[tokio::test]
    async fn test_referral_name_recovers_display_name() {
        let response = referral_name(Path("raphael-1700000000000".to_string())).await;
        assert_eq!(response.0.name, "Raphael");
    }
}
