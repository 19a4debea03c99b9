use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use jwt::{SignWithKey, VerifyWithKey};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::data::profiles::Profile;
use crate::error::{PortalError, Result};
use crate::utils::enums::Role;

pub const MIN_PASSWORD_LENGTH: usize = 6;

pub fn hash_password(password: &str, cost: u32) -> Result<String> {
    bcrypt::hash(password, cost)
        .map_err(|e| PortalError::Internal(format!("Failed to hash password: {}", e)))
}

/// A malformed stored hash counts as a mismatch.
pub fn verify_password(password: &str, hash: &str) -> bool {
    match bcrypt::verify(password, hash) {
        Ok(valid) => valid,
        Err(e) => {
            tracing::warn!(error = %e, "stored password hash could not be checked");
            false
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub role: Role,
    pub exp: i64,
}

fn signing_key(secret: &str) -> Result<Hmac<Sha256>> {
    Hmac::new_from_slice(secret.as_bytes())
        .map_err(|e| PortalError::Config(format!("Invalid JWT secret: {}", e)))
}

pub fn issue_token(secret: &str, profile: &Profile, ttl_hours: i64) -> Result<String> {
    let claims = Claims {
        sub: profile.id.clone(),
        email: profile.email.clone(),
        role: profile.role,
        exp: (Utc::now() + Duration::hours(ttl_hours)).timestamp(),
    };
    claims
        .sign_with_key(&signing_key(secret)?)
        .map_err(|e| PortalError::Internal(format!("Failed to sign token: {}", e)))
}

pub fn decode_token(secret: &str, token: &str) -> Result<Claims> {
    let claims: Claims = token
        .verify_with_key(&signing_key(secret)?)
        .map_err(|_| PortalError::Unauthorized("Invalid token".to_string()))?;
    if claims.exp <= Utc::now().timestamp() {
        return Err(PortalError::Unauthorized("Token expired".to_string()));
    }
    Ok(claims)
}
