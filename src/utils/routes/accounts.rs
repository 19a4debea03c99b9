use actix_web::{get, post, web, HttpResponse};

use crate::data::profiles::{NewProfile, Profile};
use crate::error::{PortalError, Result};
use crate::state::AppState;
use crate::utils::encrypt::{hash_password, issue_token, verify_password, MIN_PASSWORD_LENGTH};
use crate::utils::enums::Role;
use crate::utils::session::Session;
use crate::utils::structures::{LoginRequest, RegisterRequest};

pub(crate) fn validate_credentials(email: &str, password: &str) -> Result<()> {
    let email = email.trim();
    if email.is_empty() || !email.contains('@') || email.chars().any(char::is_whitespace) {
        return Err(PortalError::validation("A valid email address is required"));
    }
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(PortalError::validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        )));
    }
    Ok(())
}

/// Hashes the password and inserts the profile, refusing a taken email.
/// Runs on the blocking pool.
pub(crate) fn create_account(
    state: &AppState,
    role: Role,
    mut new: NewProfile,
    password: &str,
) -> Result<Profile> {
    validate_credentials(&new.email, password)?;
    new.password_hash = hash_password(password, state.config.bcrypt_cost)?;

    let conn = state.db.conn()?;
    if Profile::find_by_email(&conn, &new.email)?.is_some() {
        return Err(PortalError::Conflict(
            "An account with this email already exists".to_string(),
        ));
    }
    Ok(Profile::create(&conn, role, &new)?)
}

#[post("/api/v1/register")]
pub async fn register_account(
    state: web::Data<AppState>,
    body: web::Json<RegisterRequest>,
) -> Result<HttpResponse> {
    let request = body.into_inner();

    let (profile, token) = web::block(move || -> Result<(Profile, String)> {
        let profile = create_account(
            &state,
            Role::Candidate,
            NewProfile {
                email: request.email,
                full_name: Some(request.full_name.trim().to_string()).filter(|n| !n.is_empty()),
                ..Default::default()
            },
            &request.password,
        )?;
        let token = issue_token(&state.config.jwt_secret, &profile, state.config.token_ttl_hours)?;
        Ok((profile, token))
    })
    .await??;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "success": true,
        "token": token,
        "user_id": profile.id,
        "role": profile.role
    })))
}

#[post("/api/v1/auth")]
pub async fn login_account(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse> {
    let request = body.into_inner();

    let (profile, token) = web::block(move || -> Result<(Profile, String)> {
        let found = Profile::find_by_email(&*state.db.conn()?, &request.email)?;
        let profile = match found {
            Some(profile) if verify_password(&request.password, &profile.password_hash) => profile,
            _ => {
                tracing::info!(email = %request.email.trim(), "login rejected");
                return Err(PortalError::Unauthorized(
                    "Invalid email or password".to_string(),
                ));
            }
        };
        let token = issue_token(&state.config.jwt_secret, &profile, state.config.token_ttl_hours)?;
        Ok((profile, token))
    })
    .await??;

    tracing::info!(user_id = %profile.id, role = %profile.role, "login succeeded");
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "token": token,
        "user_id": profile.id,
        "role": profile.role
    })))
}

#[get("/api/v1/session")]
pub async fn get_session(state: web::Data<AppState>, session: Session) -> Result<HttpResponse> {
    let profile = web::block(move || -> Result<Option<Profile>> {
        Ok(Profile::find(&*state.db.conn()?, &session.user_id)?)
    })
    .await??
    .ok_or_else(|| PortalError::Unauthorized("Account no longer exists".to_string()))?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "profile": profile
    })))
}
