use actix_multipart::Multipart;
use actix_web::{get, post, put, web, HttpResponse};
use chrono::Utc;
use futures_util::StreamExt;
use rusqlite::Connection;

use crate::data::applications::Application;
use crate::data::profiles::{ImageKind, Profile};
use crate::error::{PortalError, Result};
use crate::state::AppState;
use crate::utils::enums::Role;
use crate::utils::session::Session;
use crate::utils::structures::{CandidateProfileUpdate, EmployerProfileUpdate};

const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

fn load_profile(state: &AppState, id: &str) -> Result<Profile> {
    Profile::find(&*state.db.conn()?, id)?.ok_or_else(|| PortalError::not_found("Profile"))
}

/// Employer profiles are public company pages. Candidate contact details are
/// visible to the candidate, admins, and employers the candidate applied to.
fn may_view(conn: &Connection, session: &Session, profile: &Profile) -> Result<bool> {
    if session.is_admin() || session.user_id == profile.id || profile.role == Role::Employer {
        return Ok(true);
    }
    if session.role == Role::Employer && profile.role == Role::Candidate {
        return Ok(Application::candidate_applied_to_employer(
            conn,
            &profile.id,
            &session.user_id,
        )?);
    }
    Ok(false)
}

#[get("/api/v1/profiles/{id}")]
pub async fn get_profile(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    let profile = web::block(move || -> Result<Profile> {
        let conn = state.db.conn()?;
        let profile = Profile::find(&conn, &id)?.ok_or_else(|| PortalError::not_found("Profile"))?;
        if !may_view(&conn, &session, &profile)? {
            return Err(PortalError::forbidden(
                "You do not have access to this profile",
            ));
        }
        Ok(profile)
    })
    .await??;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "profile": profile
    })))
}

#[put("/api/v1/profiles/{id}/candidate")]
pub async fn update_candidate_profile(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<String>,
    body: web::Json<CandidateProfileUpdate>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    session.require_owner_or_admin(&id)?;
    let update = body.into_inner();

    let profile = web::block(move || -> Result<Profile> {
        let conn = state.db.conn()?;
        let existing = Profile::find(&conn, &id)?.ok_or_else(|| PortalError::not_found("Profile"))?;
        if existing.role != Role::Candidate {
            return Err(PortalError::validation("Profile is not a candidate profile"));
        }
        Profile::update_candidate(&conn, &id, &update)?;
        Ok(Profile::get(&conn, &id)?)
    })
    .await??;

    tracing::info!(profile_id = %profile.id, "candidate profile updated");
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "profile": profile
    })))
}

#[put("/api/v1/profiles/{id}/employer")]
pub async fn update_employer_profile(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<String>,
    body: web::Json<EmployerProfileUpdate>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    session.require_owner_or_admin(&id)?;
    let update = body.into_inner();

    let profile = web::block(move || -> Result<Profile> {
        let conn = state.db.conn()?;
        let existing = Profile::find(&conn, &id)?.ok_or_else(|| PortalError::not_found("Profile"))?;
        if existing.role != Role::Employer {
            return Err(PortalError::validation("Profile is not an employer profile"));
        }
        Profile::update_employer(&conn, &id, &update)?;
        Ok(Profile::get(&conn, &id)?)
    })
    .await??;

    tracing::info!(profile_id = %profile.id, "employer profile updated");
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "profile": profile
    })))
}

/// Lowercased extension from an uploaded file name, if it is an accepted
/// image type.
fn image_extension(filename: &str) -> Option<String> {
    let (_, ext) = filename.rsplit_once('.')?;
    let ext = ext.to_ascii_lowercase();
    IMAGE_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}

#[post("/api/v1/profiles/{id}/images/{kind}")]
pub async fn upload_image(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<(String, String)>,
    mut payload: Multipart,
) -> Result<HttpResponse> {
    let (id, kind) = path.into_inner();
    session.require_owner_or_admin(&id)?;
    let kind = ImageKind::parse(&kind)
        .ok_or_else(|| PortalError::validation("Image kind must be 'profile' or 'logo'"))?;

    let mut upload: Option<(String, Vec<u8>)> = None;
    while let Some(field) = payload.next().await {
        let mut field = field.map_err(|e| PortalError::validation(format!("Invalid upload: {}", e)))?;
        let filename = match field.content_disposition().get_filename() {
            Some(name) => name.to_string(),
            None => continue,
        };
        let ext = image_extension(&filename).ok_or_else(|| {
            PortalError::validation(format!(
                "Unsupported image type, expected one of: {}",
                IMAGE_EXTENSIONS.join(", ")
            ))
        })?;

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let data = chunk.map_err(|e| PortalError::validation(format!("Invalid upload: {}", e)))?;
            if bytes.len() + data.len() > MAX_IMAGE_BYTES {
                return Err(PortalError::validation("Image is larger than 5 MB"));
            }
            bytes.extend_from_slice(&data);
        }
        upload = Some((ext, bytes));
        break;
    }
    let (ext, bytes) = upload.ok_or_else(|| PortalError::validation("No image file was uploaded"))?;

    let url = web::block(move || -> Result<String> {
        load_profile(&state, &id)?;

        let file_name = format!("{}-{}.{}", kind.as_str(), Utc::now().timestamp_millis(), ext);
        let dir = state.config.uploads_dir.join(&id);
        std::fs::create_dir_all(&dir)?;
        std::fs::write(dir.join(&file_name), &bytes)?;

        let url = format!("{}/uploads/{}/{}", state.config.public_url, id, file_name);
        Profile::set_image(&*state.db.conn()?, &id, kind, &url)?;
        tracing::info!(profile_id = %id, kind = kind.as_str(), bytes = bytes.len(), "image stored");
        Ok(url)
    })
    .await??;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "url": url
    })))
}
