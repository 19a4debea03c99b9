pub mod config;
pub mod data;
pub mod error;
pub mod logging;
pub mod notify;
pub mod pipeline;
pub mod state;
pub mod utils;

use actix_web::web;

use crate::error::PortalError;
use crate::utils::routes::{accounts, admin, applications, jobs, misc, profiles};

/// Registers every route plus JSON and query error handlers that answer with
/// the standard error envelope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _| {
        PortalError::validation(format!("Invalid request format: {}", err)).into()
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _| {
        PortalError::validation(format!("Invalid query: {}", err)).into()
    }))
    .service(misc::health_check)
    .service(misc::list_statuses)
    .service(misc::serve_upload)
    .service(accounts::register_account)
    .service(accounts::login_account)
    .service(accounts::get_session)
    .service(profiles::get_profile)
    .service(profiles::update_candidate_profile)
    .service(profiles::update_employer_profile)
    .service(profiles::upload_image)
    .service(admin::create_employer)
    .service(admin::list_employers)
    .service(jobs::create_job)
    .service(jobs::list_jobs)
    .service(jobs::employer_jobs)
    .service(jobs::get_job)
    .service(jobs::update_job)
    .service(applications::apply_to_job)
    .service(applications::candidate_applications)
    .service(applications::job_applications)
    .service(applications::update_application_status)
    .service(applications::update_application_notes);
}
