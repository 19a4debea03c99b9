use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::Serialize;

use crate::data::database::{new_id, now};
use crate::utils::enums::{ApplicationStatus, StatusDisplay};

#[derive(Debug, Clone, Serialize)]
pub struct Application {
    pub id: String,
    pub job_id: String,
    pub candidate_id: String,
    pub resume_link: String,
    pub cover_letter: Option<String>,
    pub status: ApplicationStatus,
    pub assignment_name: Option<String>,
    pub assignment_link: Option<String>,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// An application with the job and candidate details the status workflow
/// needs for authorization and the notification email.
#[derive(Debug, Clone)]
pub struct ApplicationContext {
    pub application: Application,
    pub employer_id: String,
    pub job_title: String,
    pub candidate_email: String,
    pub candidate_name: Option<String>,
}

/// Candidate's own view. Employer notes are not part of it.
#[derive(Debug, Clone, Serialize)]
pub struct CandidateApplication {
    pub id: String,
    pub job_id: String,
    pub job_title: String,
    pub location: String,
    pub job_type: String,
    pub company_name: Option<String>,
    pub resume_link: String,
    pub cover_letter: Option<String>,
    pub status: StatusDisplay,
    pub assignment_name: Option<String>,
    pub assignment_link: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Employer's view of one applicant for a job.
#[derive(Debug, Clone, Serialize)]
pub struct Applicant {
    pub id: String,
    pub candidate_id: String,
    pub candidate_name: Option<String>,
    pub candidate_email: String,
    pub candidate_phone: Option<String>,
    pub resume_link: String,
    pub cover_letter: Option<String>,
    pub status: StatusDisplay,
    pub assignment_name: Option<String>,
    pub assignment_link: Option<String>,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

const COLUMNS: &str = "a.id, a.job_id, a.candidate_id, a.resume_link, a.cover_letter, a.status,
    a.assignment_name, a.assignment_link, a.notes, a.created_at, a.updated_at";

impl Application {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Application> {
        Ok(Application {
            id: row.get(0)?,
            job_id: row.get(1)?,
            candidate_id: row.get(2)?,
            resume_link: row.get(3)?,
            cover_letter: row.get(4)?,
            status: row.get(5)?,
            assignment_name: row.get(6)?,
            assignment_link: row.get(7)?,
            notes: row.get(8)?,
            created_at: row.get(9)?,
            updated_at: row.get(10)?,
        })
    }

    pub fn create(
        conn: &Connection,
        job_id: &str,
        candidate_id: &str,
        resume_link: &str,
        cover_letter: Option<&str>,
    ) -> rusqlite::Result<Application> {
        let id = new_id();
        conn.execute(
            "INSERT INTO applications (id, job_id, candidate_id, resume_link, cover_letter, status,
                created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
            params![
                id,
                job_id,
                candidate_id,
                resume_link.trim(),
                cover_letter,
                ApplicationStatus::Applied,
                now()
            ],
        )?;
        tracing::info!(application_id = %id, job_id, candidate_id, "application submitted");
        Application::get(conn, &id)
    }

    pub fn get(conn: &Connection, id: &str) -> rusqlite::Result<Application> {
        conn.query_row(
            &format!("SELECT {} FROM applications a WHERE a.id = ?1", COLUMNS),
            params![id],
            Application::from_row,
        )
    }

    pub fn find(conn: &Connection, id: &str) -> rusqlite::Result<Option<Application>> {
        Application::get(conn, id).optional()
    }

    pub fn exists_for(conn: &Connection, job_id: &str, candidate_id: &str) -> rusqlite::Result<bool> {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM applications WHERE job_id = ?1 AND candidate_id = ?2",
            params![job_id, candidate_id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Whether the candidate has applied to any job this employer posted.
    pub fn candidate_applied_to_employer(
        conn: &Connection,
        candidate_id: &str,
        employer_id: &str,
    ) -> rusqlite::Result<bool> {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM applications a
             JOIN jobs j ON j.id = a.job_id
             WHERE a.candidate_id = ?1 AND j.employer_id = ?2",
            params![candidate_id, employer_id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    pub fn context(conn: &Connection, id: &str) -> rusqlite::Result<Option<ApplicationContext>> {
        conn.query_row(
            &format!(
                "SELECT {}, j.employer_id, j.title, p.email, p.full_name
                 FROM applications a
                 JOIN jobs j ON j.id = a.job_id
                 JOIN profiles p ON p.id = a.candidate_id
                 WHERE a.id = ?1",
                COLUMNS
            ),
            params![id],
            |row| {
                Ok(ApplicationContext {
                    application: Application::from_row(row)?,
                    employer_id: row.get(11)?,
                    job_title: row.get(12)?,
                    candidate_email: row.get(13)?,
                    candidate_name: row.get(14)?,
                })
            },
        )
        .optional()
    }

    /// Writes the status, plus the assignment pair when given. Assignment
    /// columns are left alone otherwise.
    pub fn set_status(
        conn: &Connection,
        id: &str,
        status: ApplicationStatus,
        assignment: Option<(&str, &str)>,
    ) -> rusqlite::Result<usize> {
        match assignment {
            Some((name, link)) => conn.execute(
                "UPDATE applications SET status = ?1, assignment_name = ?2, assignment_link = ?3,
                    updated_at = ?4
                 WHERE id = ?5",
                params![status, name, link, now(), id],
            ),
            None => conn.execute(
                "UPDATE applications SET status = ?1, updated_at = ?2 WHERE id = ?3",
                params![status, now(), id],
            ),
        }
    }

    pub fn set_notes(conn: &Connection, id: &str, notes: &str) -> rusqlite::Result<usize> {
        conn.execute(
            "UPDATE applications SET notes = ?1, updated_at = ?2 WHERE id = ?3",
            params![notes, now(), id],
        )
    }

    pub fn list_for_candidate(
        conn: &Connection,
        candidate_id: &str,
    ) -> rusqlite::Result<Vec<CandidateApplication>> {
        let mut stmt = conn.prepare(
            "SELECT a.id, a.job_id, j.title, j.location, j.job_type, p.company_name,
                a.resume_link, a.cover_letter, a.status, a.assignment_name, a.assignment_link,
                a.created_at, a.updated_at
             FROM applications a
             JOIN jobs j ON j.id = a.job_id
             JOIN profiles p ON p.id = j.employer_id
             WHERE a.candidate_id = ?1
             ORDER BY a.created_at DESC, a.rowid DESC",
        )?;
        let rows = stmt.query_map(params![candidate_id], |row| {
            let status: Option<String> = row.get(8)?;
            Ok(CandidateApplication {
                id: row.get(0)?,
                job_id: row.get(1)?,
                job_title: row.get(2)?,
                location: row.get(3)?,
                job_type: row.get(4)?,
                company_name: row.get(5)?,
                resume_link: row.get(6)?,
                cover_letter: row.get(7)?,
                status: ApplicationStatus::display_for(status.as_deref()),
                assignment_name: row.get(9)?,
                assignment_link: row.get(10)?,
                created_at: row.get(11)?,
                updated_at: row.get(12)?,
            })
        })?;
        rows.collect()
    }

    pub fn list_for_job(conn: &Connection, job_id: &str) -> rusqlite::Result<Vec<Applicant>> {
        let mut stmt = conn.prepare(
            "SELECT a.id, a.candidate_id, p.full_name, p.email, p.phone, a.resume_link,
                a.cover_letter, a.status, a.assignment_name, a.assignment_link, a.notes,
                a.created_at, a.updated_at
             FROM applications a
             JOIN profiles p ON p.id = a.candidate_id
             WHERE a.job_id = ?1
             ORDER BY a.created_at DESC, a.rowid DESC",
        )?;
        let rows = stmt.query_map(params![job_id], |row| {
            let status: Option<String> = row.get(7)?;
            Ok(Applicant {
                id: row.get(0)?,
                candidate_id: row.get(1)?,
                candidate_name: row.get(2)?,
                candidate_email: row.get(3)?,
                candidate_phone: row.get(4)?,
                resume_link: row.get(5)?,
                cover_letter: row.get(6)?,
                status: ApplicationStatus::display_for(status.as_deref()),
                assignment_name: row.get(8)?,
                assignment_link: row.get(9)?,
                notes: row.get(10)?,
                created_at: row.get(11)?,
                updated_at: row.get(12)?,
            })
        })?;
        rows.collect()
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateStats {
    pub total: usize,
    pub in_progress: usize,
    pub hired: usize,
}

impl CandidateStats {
    pub fn tally(applications: &[CandidateApplication]) -> CandidateStats {
        let mut stats = CandidateStats {
            total: applications.len(),
            ..Default::default()
        };
        for app in applications {
            match app.status.key.parse::<ApplicationStatus>() {
                Ok(ApplicationStatus::Hired) => stats.hired += 1,
                Ok(status) if status.is_in_progress() => stats.in_progress += 1,
                _ => {}
            }
        }
        stats
    }
}
