use std::path::Path;

use actix_web::{get, web, HttpResponse};
use chrono::Utc;

use crate::error::{PortalError, Result};
use crate::state::AppState;
use crate::utils::enums::{ApplicationStatus, StatusDisplay};

#[get("/health_check")]
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "timestamp": Utc::now().timestamp()
    }))
}

/// Every pipeline stage with its label and tone, in order.
#[get("/api/v1/statuses")]
pub async fn list_statuses() -> HttpResponse {
    let statuses: Vec<StatusDisplay> = ApplicationStatus::ALL.iter().map(|s| s.display()).collect();
    HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "statuses": statuses
    }))
}

/// A single path segment with no traversal or separators.
fn safe_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment != "."
        && segment != ".."
        && !segment.contains(['/', '\\'])
        && !segment.starts_with('.')
}

fn content_type_for(file: &str) -> &'static str {
    match Path::new(file).extension().and_then(|e| e.to_str()) {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

#[get("/uploads/{owner}/{file}")]
pub async fn serve_upload(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse> {
    let (owner, file) = path.into_inner();
    if !safe_segment(&owner) || !safe_segment(&file) {
        return Err(PortalError::not_found("File"));
    }

    let content_type = content_type_for(&file);
    let full_path = state.config.uploads_dir.join(&owner).join(&file);
    let bytes = web::block(move || std::fs::read(full_path))
        .await?
        .map_err(|_| PortalError::not_found("File"))?;

    Ok(HttpResponse::Ok().content_type(content_type).body(bytes))
}
