use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::Serialize;

use crate::data::database::{new_id, now};
use crate::utils::enums::{JobStatus, JobType};
use crate::utils::structures::{JobDraft, JobSearchQuery};

#[derive(Debug, Clone, Serialize)]
pub struct Job {
    pub id: String,
    pub employer_id: String,
    pub title: String,
    pub description: String,
    pub salary_min: Option<i64>,
    pub salary_max: Option<i64>,
    pub experience_required: Option<String>,
    pub location: String,
    pub job_type: JobType,
    pub department: Option<String>,
    pub status: JobStatus,
    pub created_at: String,
    pub updated_at: String,
}

/// A job joined with its employer's company name.
#[derive(Debug, Clone, Serialize)]
pub struct JobListing {
    #[serde(flatten)]
    pub job: Job,
    pub company_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmployerJob {
    #[serde(flatten)]
    pub job: Job,
    pub application_count: i64,
}

const COLUMNS: &str = "j.id, j.employer_id, j.title, j.description, j.salary_min, j.salary_max,
    j.experience_required, j.location, j.job_type, j.department, j.status, j.created_at, j.updated_at";

impl Job {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Job> {
        Ok(Job {
            id: row.get(0)?,
            employer_id: row.get(1)?,
            title: row.get(2)?,
            description: row.get(3)?,
            salary_min: row.get(4)?,
            salary_max: row.get(5)?,
            experience_required: row.get(6)?,
            location: row.get(7)?,
            job_type: row.get(8)?,
            department: row.get(9)?,
            status: row.get(10)?,
            created_at: row.get(11)?,
            updated_at: row.get(12)?,
        })
    }

    fn listing_from_row(row: &Row<'_>) -> rusqlite::Result<JobListing> {
        Ok(JobListing {
            job: Job::from_row(row)?,
            company_name: row.get(13)?,
        })
    }

    pub fn create(conn: &Connection, employer_id: &str, draft: &JobDraft) -> rusqlite::Result<Job> {
        let id = new_id();
        conn.execute(
            "INSERT INTO jobs (id, employer_id, title, description, salary_min, salary_max,
                experience_required, location, job_type, department, status, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?12)",
            params![
                id,
                employer_id,
                draft.title.trim(),
                draft.description,
                draft.salary_min,
                draft.salary_max,
                draft.experience_required,
                draft.location.trim(),
                draft.job_type,
                draft.department(),
                draft.status.unwrap_or(JobStatus::Active),
                now()
            ],
        )?;
        tracing::info!(job_id = %id, employer_id, "job posted");
        Job::get(conn, &id)
    }

    pub fn get(conn: &Connection, id: &str) -> rusqlite::Result<Job> {
        conn.query_row(
            &format!("SELECT {} FROM jobs j WHERE j.id = ?1", COLUMNS),
            params![id],
            Job::from_row,
        )
    }

    pub fn find(conn: &Connection, id: &str) -> rusqlite::Result<Option<Job>> {
        Job::get(conn, id).optional()
    }

    pub fn find_listing(conn: &Connection, id: &str) -> rusqlite::Result<Option<JobListing>> {
        conn.query_row(
            &format!(
                "SELECT {}, p.company_name FROM jobs j
                 JOIN profiles p ON p.id = j.employer_id
                 WHERE j.id = ?1",
                COLUMNS
            ),
            params![id],
            Job::listing_from_row,
        )
        .optional()
    }

    /// Replaces every editable field; status is kept when not supplied.
    pub fn update(conn: &Connection, id: &str, draft: &JobDraft) -> rusqlite::Result<usize> {
        conn.execute(
            "UPDATE jobs SET title = ?1, description = ?2, salary_min = ?3, salary_max = ?4,
                experience_required = ?5, location = ?6, job_type = ?7, department = ?8,
                status = COALESCE(?9, status), updated_at = ?10
             WHERE id = ?11",
            params![
                draft.title.trim(),
                draft.description,
                draft.salary_min,
                draft.salary_max,
                draft.experience_required,
                draft.location.trim(),
                draft.job_type,
                draft.department(),
                draft.status,
                now(),
                id
            ],
        )
    }

    pub fn list_active(conn: &Connection) -> rusqlite::Result<Vec<JobListing>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {}, p.company_name FROM jobs j
             JOIN profiles p ON p.id = j.employer_id
             WHERE j.status = 'active'
             ORDER BY j.created_at DESC, j.rowid DESC",
            COLUMNS
        ))?;
        let rows = stmt.query_map([], Job::listing_from_row)?;
        rows.collect()
    }

    pub fn list_for_employer(
        conn: &Connection,
        employer_id: &str,
    ) -> rusqlite::Result<Vec<EmployerJob>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {}, (SELECT COUNT(*) FROM applications a WHERE a.job_id = j.id)
             FROM jobs j
             WHERE j.employer_id = ?1
             ORDER BY j.created_at DESC, j.rowid DESC",
            COLUMNS
        ))?;
        let rows = stmt.query_map(params![employer_id], |row| {
            Ok(EmployerJob {
                job: Job::from_row(row)?,
                application_count: row.get(13)?,
            })
        })?;
        rows.collect()
    }
}

/// Candidate-side search over active listings.
#[derive(Debug, Default, Clone)]
pub struct JobFilter {
    search: Option<String>,
    location: Option<String>,
    job_type: Option<String>,
}

impl JobFilter {
    pub fn from_query(query: &JobSearchQuery) -> JobFilter {
        // "all" is what the search screen sends for an unset dropdown
        fn normalize(value: &Option<String>) -> Option<String> {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("all"))
                .map(str::to_string)
        }

        JobFilter {
            search: normalize(&query.search).map(|s| s.to_lowercase()),
            location: normalize(&query.location).map(|s| s.to_lowercase()),
            job_type: normalize(&query.job_type),
        }
    }

    pub fn matches(&self, listing: &JobListing) -> bool {
        let job = &listing.job;
        if let Some(term) = &self.search {
            if !job.title.to_lowercase().contains(term)
                && !job.description.to_lowercase().contains(term)
            {
                return false;
            }
        }
        if let Some(location) = &self.location {
            if !job.location.to_lowercase().contains(location) {
                return false;
            }
        }
        if let Some(job_type) = &self.job_type {
            if job.job_type.as_str() != job_type {
                return false;
            }
        }
        true
    }

    pub fn apply(&self, listings: Vec<JobListing>) -> Vec<JobListing> {
        listings.into_iter().filter(|l| self.matches(l)).collect()
    }
}
