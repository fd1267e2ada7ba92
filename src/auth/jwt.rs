use crate::auth::config::JwtConfig;
use crate::auth::principal::Principal;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

pub const ROLE_ADMIN: &str = "ADMIN";
pub const ROLE_CLIENTE: &str = "CLIENTE";
pub const ROLE_RESTAURANTE: &str = "RESTAURANTE";

#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("verification error: {0}")]
    Verify(String),
}

#[derive(Serialize, Deserialize)]
struct Claims {
    iss: String,
    aud: String,
    sub: String,
    role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    customer_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    restaurant_id: Option<i32>,
    iat: u64,
    exp: u64,
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

pub fn issue_token(principal: &Principal, cfg: &JwtConfig) -> Result<String, JwtError> {
    let now = unix_now();
    let (sub, role, customer_id, restaurant_id) = match principal {
        Principal::Admin => ("admin".to_string(), ROLE_ADMIN, None, None),
        Principal::Client { customer_id } => {
            (customer_id.to_string(), ROLE_CLIENTE, Some(*customer_id), None)
        }
        Principal::Restaurant { restaurant_id } => (
            restaurant_id.to_string(),
            ROLE_RESTAURANTE,
            None,
            Some(*restaurant_id),
        ),
    };
    let claims = Claims {
        iss: cfg.issuer.clone(),
        aud: cfg.audience.clone(),
        sub,
        role: role.to_string(),
        customer_id,
        restaurant_id,
        iat: now,
        exp: now + cfg.expiry_secs,
    };
    let header = Header::new(Algorithm::HS256);
    encode(
        &header,
        &claims,
        &EncodingKey::from_secret(cfg.secret.as_bytes()),
    )
    .map_err(|e| JwtError::Verify(e.to_string()))
}

pub fn verify_token(token: &str, cfg: &JwtConfig) -> Result<Principal, JwtError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[cfg.issuer.as_str()]);
    validation.set_audience(&[cfg.audience.as_str()]);
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(cfg.secret.as_bytes()),
        &validation,
    )
    .map_err(|e| JwtError::Verify(e.to_string()))?;

    let claims = data.claims;
    match claims.role.as_str() {
        ROLE_ADMIN => Ok(Principal::Admin),
        ROLE_CLIENTE => claims
            .customer_id
            .map(|customer_id| Principal::Client { customer_id })
            .ok_or_else(|| JwtError::Verify("missing customer_id claim".to_string())),
        ROLE_RESTAURANTE => claims
            .restaurant_id
            .map(|restaurant_id| Principal::Restaurant { restaurant_id })
            .ok_or_else(|| JwtError::Verify("missing restaurant_id claim".to_string())),
        other => Err(JwtError::Verify(format!("unknown role: {other}"))),
    }
}
