use actix_web::{get, post, put, web, HttpResponse};
use serde::Serialize;

use crate::data::applications::Application;
use crate::data::jobs::{EmployerJob, Job, JobFilter, JobListing};
use crate::error::{PortalError, Result};
use crate::state::AppState;
use crate::utils::enums::{JobStatus, Role};
use crate::utils::session::Session;
use crate::utils::structures::{JobDraft, JobSearchQuery};

#[derive(Debug, Default, PartialEq, Eq, Serialize)]
pub struct EmployerJobStats {
    pub total_jobs: usize,
    pub active_jobs: usize,
    pub total_applications: i64,
}

impl EmployerJobStats {
    pub fn tally(jobs: &[EmployerJob]) -> EmployerJobStats {
        EmployerJobStats {
            total_jobs: jobs.len(),
            active_jobs: jobs.iter().filter(|j| j.job.status == JobStatus::Active).count(),
            total_applications: jobs.iter().map(|j| j.application_count).sum(),
        }
    }
}

#[post("/api/v1/jobs")]
pub async fn create_job(
    state: web::Data<AppState>,
    session: Session,
    body: web::Json<JobDraft>,
) -> Result<HttpResponse> {
    session.require_role(Role::Employer)?;
    let draft = body.into_inner();
    draft.validate().map_err(PortalError::Validation)?;

    let job = web::block(move || -> Result<Job> {
        Ok(Job::create(&*state.db.conn()?, &session.user_id, &draft)?)
    })
    .await??;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "success": true,
        "job": job
    })))
}

#[put("/api/v1/jobs/{id}")]
pub async fn update_job(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<String>,
    body: web::Json<JobDraft>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    let draft = body.into_inner();
    draft.validate().map_err(PortalError::Validation)?;

    let job = web::block(move || -> Result<Job> {
        let conn = state.db.conn()?;
        let existing = Job::find(&conn, &id)?.ok_or_else(|| PortalError::not_found("Job"))?;
        session.require_owner_or_admin(&existing.employer_id)?;
        Job::update(&conn, &id, &draft)?;
        Ok(Job::get(&conn, &id)?)
    })
    .await??;

    tracing::info!(job_id = %job.id, status = job.status.as_str(), "job updated");
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "job": job
    })))
}

#[get("/api/v1/jobs")]
pub async fn list_jobs(
    state: web::Data<AppState>,
    query: web::Query<JobSearchQuery>,
) -> Result<HttpResponse> {
    let filter = JobFilter::from_query(&query);

    let jobs = web::block(move || -> Result<Vec<JobListing>> {
        Ok(filter.apply(Job::list_active(&*state.db.conn()?)?))
    })
    .await??;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "jobs": jobs
    })))
}

#[get("/api/v1/jobs/{id}")]
pub async fn get_job(
    state: web::Data<AppState>,
    session: Option<Session>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let id = path.into_inner();

    let (listing, has_applied) = web::block(move || -> Result<(JobListing, bool)> {
        let conn = state.db.conn()?;
        let listing = Job::find_listing(&conn, &id)?.ok_or_else(|| PortalError::not_found("Job"))?;
        let has_applied = match &session {
            Some(s) if s.role == Role::Candidate => Application::exists_for(&conn, &id, &s.user_id)?,
            _ => false,
        };
        Ok((listing, has_applied))
    })
    .await??;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "job": listing,
        "has_applied": has_applied
    })))
}

#[get("/api/v1/employer/jobs")]
pub async fn employer_jobs(state: web::Data<AppState>, session: Session) -> Result<HttpResponse> {
    session.require_role(Role::Employer)?;

    let jobs = web::block(move || -> Result<Vec<EmployerJob>> {
        Ok(Job::list_for_employer(&*state.db.conn()?, &session.user_id)?)
    })
    .await??;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "stats": EmployerJobStats::tally(&jobs),
        "jobs": jobs
    })))
}
