use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use jsonwebtoken::{EncodingKey, Header, encode};
use tracing::info;
use uuid::Uuid;

use gyemini_types::api::{Claims, IdentityResponse};

use crate::AppState;
use crate::error::ApiError;

pub const TOKEN_LIFETIME_DAYS: i64 = 365;

/// Mint a fresh anonymous identity. The client keeps the token and sends it
/// back as a bearer token on identity-scoped requests.
pub async fn create_identity(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let user_id = format!("user_{}", Uuid::new_v4().simple());
    let token = create_token(&state.token_secret, &user_id)?;

    info!("Issued identity {}", user_id);
    Ok((StatusCode::CREATED, Json(IdentityResponse { user_id, token })))
}

pub fn create_token(secret: &str, user_id: &str) -> anyhow::Result<String> {
    let claims = Claims {
        sub: user_id.to_string(),
        exp: (chrono::Utc::now() + chrono::Duration::days(TOKEN_LIFETIME_DAYS)).timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}
