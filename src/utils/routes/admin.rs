use actix_web::{get, post, web, HttpResponse};

use crate::data::profiles::{employer_matches, NewProfile, Profile};
use crate::error::{PortalError, Result};
use crate::state::AppState;
use crate::utils::enums::Role;
use crate::utils::routes::accounts::create_account;
use crate::utils::session::Session;
use crate::utils::structures::{CreateEmployerRequest, EmployerSearchQuery};

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[post("/api/v1/admin/employers")]
pub async fn create_employer(
    state: web::Data<AppState>,
    session: Session,
    body: web::Json<CreateEmployerRequest>,
) -> Result<HttpResponse> {
    session.require_admin()?;
    let request = body.into_inner();
    if request.company_name.trim().is_empty() {
        return Err(PortalError::validation("Company name is required"));
    }

    let employer = web::block(move || {
        create_account(
            &state,
            Role::Employer,
            NewProfile {
                email: request.email,
                full_name: optional(Some(request.full_name)),
                phone: optional(request.phone),
                company_name: optional(Some(request.company_name)),
                company_description: optional(request.company_description),
                company_website: optional(request.company_website),
                company_address: optional(request.company_address),
                ..Default::default()
            },
            &request.password,
        )
    })
    .await??;

    tracing::info!(employer_id = %employer.id, created_by = %session.user_id, "employer account created");
    Ok(HttpResponse::Created().json(serde_json::json!({
        "success": true,
        "employer": employer
    })))
}

#[get("/api/v1/admin/employers")]
pub async fn list_employers(
    state: web::Data<AppState>,
    session: Session,
    query: web::Query<EmployerSearchQuery>,
) -> Result<HttpResponse> {
    session.require_admin()?;
    let term = query.into_inner().search.unwrap_or_default();

    let employers = web::block(move || -> Result<Vec<Profile>> {
        let all = Profile::list_by_role(&*state.db.conn()?, Role::Employer)?;
        Ok(all.into_iter().filter(|p| employer_matches(p, &term)).collect())
    })
    .await??;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "employers": employers
    })))
}
