//! Employer-side workflow on a single application: moving it through the
//! hiring stages and keeping private notes.
//!
//! A status change is persisted first and the candidate is emailed only after
//! the write succeeded. The database lock is released before the notifier
//! runs, and a failed notification never undoes or fails the update.

use serde::Serialize;

use crate::data::applications::{Application, ApplicationContext};
use crate::data::database::Database;
use crate::data::profiles::display_name;
use crate::error::{PortalError, Result};
use crate::notify::{is_web_link, Notifier, StatusEmail};
use crate::utils::enums::ApplicationStatus;
use crate::utils::session::Session;
use crate::utils::structures::{UpdateNotesRequest, UpdateStatusRequest};

#[derive(Debug, Clone, Serialize)]
pub struct StatusChange {
    pub application: Application,
    pub notified: bool,
}

/// Loads the application and checks the caller owns its job (or is an admin).
fn authorized_context(
    conn: &rusqlite::Connection,
    session: &Session,
    application_id: &str,
) -> Result<ApplicationContext> {
    let ctx = Application::context(conn, application_id)?
        .ok_or_else(|| PortalError::not_found("Application"))?;
    session.require_owner_or_admin(&ctx.employer_id)?;
    Ok(ctx)
}

/// The pair is only kept for the assignment stage and only when both parts
/// carry text. A link that is not http(s) is refused outright.
fn assignment_for<'a>(
    target: ApplicationStatus,
    request: &'a UpdateStatusRequest,
) -> Result<Option<(&'a str, &'a str)>> {
    if target != ApplicationStatus::Assignment {
        return Ok(None);
    }
    let name = request.assignment_name.as_deref().map(str::trim).unwrap_or_default();
    let link = request.assignment_link.as_deref().map(str::trim).unwrap_or_default();
    if name.is_empty() || link.is_empty() {
        return Ok(None);
    }
    if !is_web_link(link) {
        return Err(PortalError::Validation(
            "Assignment link must start with http:// or https://".to_string(),
        ));
    }
    Ok(Some((name, link)))
}

pub fn update_status(
    db: &Database,
    notifier: &dyn Notifier,
    session: &Session,
    application_id: &str,
    request: &UpdateStatusRequest,
) -> Result<StatusChange> {
    let target: ApplicationStatus = request.status.parse().map_err(PortalError::Validation)?;
    let assignment = assignment_for(target, request)?;

    let (application, email) = {
        let conn = db.conn()?;
        let ctx = authorized_context(&conn, session, application_id)?;
        Application::set_status(&conn, application_id, target, assignment)?;
        let application = Application::get(&conn, application_id)?;

        let email = StatusEmail {
            to: ctx.candidate_email.clone(),
            candidate_name: display_name(ctx.candidate_name.as_deref()).to_string(),
            job_title: ctx.job_title.clone(),
            status: target.label().to_string(),
            assignment_name: assignment.map(|(name, _)| name.to_string()),
            assignment_link: assignment.map(|(_, link)| link.to_string()),
        };
        (application, email)
    };

    tracing::info!(
        application_id,
        status = %target,
        changed_by = %session.user_id,
        "application status updated"
    );

    let notified = match notifier.notify(&email) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(
                application_id,
                error = %e,
                "status saved but candidate notification failed"
            );
            false
        }
    };

    Ok(StatusChange {
        application,
        notified,
    })
}

/// Overwrites the employer's notes. Concurrent writers: last write wins.
pub fn update_notes(
    db: &Database,
    session: &Session,
    application_id: &str,
    request: &UpdateNotesRequest,
) -> Result<Application> {
    let conn = db.conn()?;
    authorized_context(&conn, session, application_id)?;
    Application::set_notes(&conn, application_id, &request.notes)?;
    tracing::debug!(application_id, "application notes updated");
    Ok(Application::get(&conn, application_id)?)
}
