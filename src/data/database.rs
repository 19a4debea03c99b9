use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::SecondsFormat;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::Connection;
use uuid::Uuid;

use crate::error::{PortalError, Result};
use crate::utils::enums::{ApplicationStatus, JobStatus, JobType, Role};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS profiles (
    id TEXT PRIMARY KEY,
    email TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    role TEXT NOT NULL CHECK (role IN ('candidate', 'employer', 'admin')),
    full_name TEXT,
    phone TEXT,
    bio TEXT,
    skills TEXT NOT NULL DEFAULT '[]',
    resume_link TEXT,
    education TEXT NOT NULL DEFAULT '[]',
    experience TEXT NOT NULL DEFAULT '[]',
    projects TEXT NOT NULL DEFAULT '[]',
    achievements TEXT NOT NULL DEFAULT '[]',
    profile_image_url TEXT,
    company_name TEXT,
    company_description TEXT,
    company_website TEXT,
    company_address TEXT,
    company_logo_url TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS jobs (
    id TEXT PRIMARY KEY,
    employer_id TEXT NOT NULL REFERENCES profiles(id),
    title TEXT NOT NULL,
    description TEXT NOT NULL,
    salary_min INTEGER,
    salary_max INTEGER,
    experience_required TEXT,
    location TEXT NOT NULL,
    job_type TEXT NOT NULL CHECK (job_type IN ('Work From Home', 'Work From Office', 'Hybrid')),
    department TEXT,
    status TEXT NOT NULL DEFAULT 'active' CHECK (status IN ('active', 'inactive')),
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS applications (
    id TEXT PRIMARY KEY,
    job_id TEXT NOT NULL REFERENCES jobs(id),
    candidate_id TEXT NOT NULL REFERENCES profiles(id),
    resume_link TEXT NOT NULL,
    cover_letter TEXT,
    status TEXT NOT NULL DEFAULT 'applied' CHECK (status IN (
        'applied', 'shortlisted', 'assignment', 'technical_interview',
        'hr_interview', 'verification', 'hired', 'rejected'
    )),
    assignment_name TEXT,
    assignment_link TEXT,
    notes TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_jobs_employer ON jobs(employer_id);
CREATE INDEX IF NOT EXISTS idx_jobs_status ON jobs(status);
CREATE INDEX IF NOT EXISTS idx_applications_job ON applications(job_id);
CREATE INDEX IF NOT EXISTS idx_applications_candidate ON applications(candidate_id);
"#;

/// Single SQLite connection shared by every request.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    pub fn open(path: &Path) -> Result<Database> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        tracing::info!(path = %path.display(), "opened database");
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Database> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Database> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        let db = Database {
            conn: Mutex::new(conn),
        };
        db.init()?;
        Ok(db)
    }

    pub fn init(&self) -> Result<()> {
        self.conn()?.execute_batch(SCHEMA)?;
        Ok(())
    }

    pub fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| PortalError::Internal("database lock poisoned".to_string()))
    }
}

pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Fixed-width RFC 3339 so stored timestamps sort as text.
pub fn now() -> String {
    chrono::Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn json_list<T: serde::de::DeserializeOwned>(raw: &str) -> rusqlite::Result<Vec<T>> {
    serde_json::from_str(raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })
}

pub(crate) fn to_json<T: serde::Serialize>(value: &T) -> rusqlite::Result<String> {
    serde_json::to_string(value).map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
}

// Enums are stored as their text keys.
macro_rules! text_column {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ToSql for $ty {
                fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                    Ok(ToSqlOutput::from(self.as_str()))
                }
            }

            impl FromSql for $ty {
                fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                    value
                        .as_str()?
                        .parse::<$ty>()
                        .map_err(|e| FromSqlError::Other(e.into()))
                }
            }
        )*
    };
}

text_column!(Role, JobType, JobStatus, ApplicationStatus);
