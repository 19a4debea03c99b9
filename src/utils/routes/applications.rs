use actix_web::{get, post, put, web, HttpResponse};

use crate::data::applications::{Applicant, Application, CandidateApplication, CandidateStats};
use crate::data::jobs::Job;
use crate::data::profiles::Profile;
use crate::error::{PortalError, Result};
use crate::pipeline;
use crate::state::AppState;
use crate::utils::enums::{JobStatus, Role};
use crate::utils::session::Session;
use crate::utils::structures::{ApplyRequest, UpdateNotesRequest, UpdateStatusRequest};

#[post("/api/v1/jobs/{id}/apply")]
pub async fn apply_to_job(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<String>,
    body: web::Json<ApplyRequest>,
) -> Result<HttpResponse> {
    session.require_role(Role::Candidate)?;
    let job_id = path.into_inner();
    let request = body.into_inner();

    let application = web::block(move || -> Result<Application> {
        let conn = state.db.conn()?;
        let job = Job::find(&conn, &job_id)?.ok_or_else(|| PortalError::not_found("Job"))?;
        if job.status != JobStatus::Active {
            return Err(PortalError::validation(
                "This job is no longer accepting applications",
            ));
        }
        if Application::exists_for(&conn, &job_id, &session.user_id)? {
            return Err(PortalError::Conflict(
                "You have already applied to this job".to_string(),
            ));
        }

        // fall back to the resume saved on the candidate's profile
        let resume_link = match request.resume_link.trim() {
            "" => Profile::find(&conn, &session.user_id)?
                .and_then(|p| p.resume_link)
                .filter(|link| !link.trim().is_empty()),
            link => Some(link.to_string()),
        }
        .ok_or_else(|| PortalError::validation("Resume link is required"))?;

        let cover_letter = request
            .cover_letter
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty());
        Ok(Application::create(
            &conn,
            &job_id,
            &session.user_id,
            &resume_link,
            cover_letter,
        )?)
    })
    .await??;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "success": true,
        "application": application
    })))
}

#[get("/api/v1/candidate/applications")]
pub async fn candidate_applications(
    state: web::Data<AppState>,
    session: Session,
) -> Result<HttpResponse> {
    session.require_role(Role::Candidate)?;

    let applications = web::block(move || -> Result<Vec<CandidateApplication>> {
        Ok(Application::list_for_candidate(&*state.db.conn()?, &session.user_id)?)
    })
    .await??;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "stats": CandidateStats::tally(&applications),
        "applications": applications
    })))
}

#[get("/api/v1/jobs/{id}/applications")]
pub async fn job_applications(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let job_id = path.into_inner();

    let (job, applicants) = web::block(move || -> Result<(Job, Vec<Applicant>)> {
        let conn = state.db.conn()?;
        let job = Job::find(&conn, &job_id)?.ok_or_else(|| PortalError::not_found("Job"))?;
        session.require_owner_or_admin(&job.employer_id)?;
        let applicants = Application::list_for_job(&conn, &job_id)?;
        Ok((job, applicants))
    })
    .await??;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "job": job,
        "applications": applicants
    })))
}

#[put("/api/v1/applications/{id}/status")]
pub async fn update_application_status(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<String>,
    body: web::Json<UpdateStatusRequest>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    let request = body.into_inner();

    let change = web::block(move || {
        pipeline::update_status(&state.db, state.notifier.as_ref(), &session, &id, &request)
    })
    .await??;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "application": change.application,
        "notified": change.notified
    })))
}

#[put("/api/v1/applications/{id}/notes")]
pub async fn update_application_notes(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<String>,
    body: web::Json<UpdateNotesRequest>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    let request = body.into_inner();

    let application = web::block(move || {
        pipeline::update_notes(&state.db, &session, &id, &request)
    })
    .await??;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "application": application
    })))
}
