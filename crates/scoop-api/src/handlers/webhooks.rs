//! Inbound webhook handlers
//!
//! The SMS auth-request webhook: Twilio posts the inbound message here,
//! we validate the provider signature, make sure an identity exists for
//! the sending phone number, and text back a one-time authentication
//! link.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode, Uri},
};
use uuid::Uuid;

use scoop_auth::password;
use scoop_auth::store::{NewIdentity, StoreError};
use scoop_core::types::UserStatus;
use scoop_models::user::User;
use scoop_sms::signature::validate_signature;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

const SIGNATURE_HEADER: &str = "X-Twilio-Signature";

/// Handle an inbound SMS and dispatch a one-time auth link
///
/// POST /webhooks/v1/sms/auth
pub async fn sms_auth_request(
    State(state): State<AppState>,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> ApiResult<StatusCode> {
    let params: Vec<(String, String)> = url::form_urlencoded::parse(body.as_bytes())
        .into_owned()
        .collect();

    // the signature covers the full public URL plus the form parameters
    let path_and_query = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/webhooks/v1/sms/auth");
    let url = format!("https://{}{}", state.config.server.base_url, path_and_query);

    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    if !validate_signature(&state.config.sms.auth_token, &url, &params, signature) {
        tracing::warn!("inbound sms webhook failed signature validation");
        return Err(ApiError::Unauthorized);
    }

    let from = params
        .iter()
        .find(|(name, _)| name == "From")
        .map(|(_, value)| value.clone())
        .ok_or_else(|| ApiError::BadRequest("missing From parameter".into()))?;

    let user = resolve_or_create(&state, &from).await?;

    let token = state.credentials.issue_one_time_token(&user).await?;
    let link = format!("https://{}/auth/{}", state.config.server.base_url, token);
    let message = format!("access the 🍦 app at: {}", link);

    state.messager.send(&from, &message).await?;

    Ok(StatusCode::OK)
}

/// Look the sender up by phone number, creating a verified identity with
/// a random throwaway password on first contact.
async fn resolve_or_create(state: &AppState, phone: &str) -> ApiResult<User> {
    match state.identity.get_by_phone(phone).await {
        Ok(user) => Ok(user),
        Err(StoreError::NotFound) => {
            let password_hash = password::hash_password(&Uuid::new_v4().to_string())?;
            let user = state
                .identity
                .insert(NewIdentity {
                    uuid: Uuid::new_v4(),
                    first_name: None,
                    last_name: None,
                    email: None,
                    phone: phone.to_string(),
                    status: UserStatus::Verified,
                    password_hash,
                })
                .await?;
            tracing::info!(subject = %user.uuid, "identity created from first sms contact");
            Ok(user)
        }
        Err(err) => Err(err.into()),
    }
}
