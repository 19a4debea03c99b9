use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::Serialize;

use crate::data::database::{json_list, new_id, now, to_json};
use crate::utils::enums::Role;
use crate::utils::structures::{CandidateProfileUpdate, EmployerProfileUpdate};

#[derive(Debug, Clone, Serialize)]
pub struct Profile {
    pub id: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub skills: Vec<String>,
    pub resume_link: Option<String>,
    pub education: Vec<serde_json::Value>,
    pub experience: Vec<serde_json::Value>,
    pub projects: Vec<serde_json::Value>,
    pub achievements: Vec<serde_json::Value>,
    pub profile_image_url: Option<String>,
    pub company_name: Option<String>,
    pub company_description: Option<String>,
    pub company_website: Option<String>,
    pub company_address: Option<String>,
    pub company_logo_url: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Fields captured at signup or when an admin creates an employer.
#[derive(Debug, Clone, Default)]
pub struct NewProfile {
    pub email: String,
    pub password_hash: String,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub company_name: Option<String>,
    pub company_description: Option<String>,
    pub company_website: Option<String>,
    pub company_address: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Profile,
    Logo,
}

impl ImageKind {
    pub fn parse(s: &str) -> Option<ImageKind> {
        match s {
            "profile" => Some(ImageKind::Profile),
            "logo" => Some(ImageKind::Logo),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ImageKind::Profile => "profile",
            ImageKind::Logo => "logo",
        }
    }

    fn column(&self) -> &'static str {
        match self {
            ImageKind::Profile => "profile_image_url",
            ImageKind::Logo => "company_logo_url",
        }
    }
}

const COLUMNS: &str = "id, email, password_hash, role, full_name, phone, bio, skills, resume_link,
    education, experience, projects, achievements, profile_image_url, company_name,
    company_description, company_website, company_address, company_logo_url, created_at, updated_at";

impl Profile {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Profile> {
        Ok(Profile {
            id: row.get(0)?,
            email: row.get(1)?,
            password_hash: row.get(2)?,
            role: row.get(3)?,
            full_name: row.get(4)?,
            phone: row.get(5)?,
            bio: row.get(6)?,
            skills: json_list(&row.get::<_, String>(7)?)?,
            resume_link: row.get(8)?,
            education: json_list(&row.get::<_, String>(9)?)?,
            experience: json_list(&row.get::<_, String>(10)?)?,
            projects: json_list(&row.get::<_, String>(11)?)?,
            achievements: json_list(&row.get::<_, String>(12)?)?,
            profile_image_url: row.get(13)?,
            company_name: row.get(14)?,
            company_description: row.get(15)?,
            company_website: row.get(16)?,
            company_address: row.get(17)?,
            company_logo_url: row.get(18)?,
            created_at: row.get(19)?,
            updated_at: row.get(20)?,
        })
    }

    /// Name shown to other users, e.g. in notification emails.
    pub fn display_name(&self) -> &str {
        display_name(self.full_name.as_deref())
    }

    pub fn create(conn: &Connection, role: Role, new: &NewProfile) -> rusqlite::Result<Profile> {
        let id = new_id();
        let ts = now();
        conn.execute(
            "INSERT INTO profiles (id, email, password_hash, role, full_name, phone, company_name,
                company_description, company_website, company_address, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?11)",
            params![
                id,
                new.email.trim().to_lowercase(),
                new.password_hash,
                role,
                new.full_name,
                new.phone,
                new.company_name,
                new.company_description,
                new.company_website,
                new.company_address,
                ts
            ],
        )?;
        tracing::info!(profile_id = %id, role = %role, "profile created");
        Profile::get(conn, &id)
    }

    pub fn get(conn: &Connection, id: &str) -> rusqlite::Result<Profile> {
        conn.query_row(
            &format!("SELECT {} FROM profiles WHERE id = ?1", COLUMNS),
            params![id],
            Profile::from_row,
        )
    }

    pub fn find(conn: &Connection, id: &str) -> rusqlite::Result<Option<Profile>> {
        Profile::get(conn, id).optional()
    }

    pub fn find_by_email(conn: &Connection, email: &str) -> rusqlite::Result<Option<Profile>> {
        conn.query_row(
            &format!("SELECT {} FROM profiles WHERE email = ?1", COLUMNS),
            params![email.trim().to_lowercase()],
            Profile::from_row,
        )
        .optional()
    }

    pub fn list_by_role(conn: &Connection, role: Role) -> rusqlite::Result<Vec<Profile>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM profiles WHERE role = ?1 ORDER BY created_at DESC, rowid DESC",
            COLUMNS
        ))?;
        let rows = stmt.query_map(params![role], Profile::from_row)?;
        rows.collect()
    }

    pub fn update_candidate(
        conn: &Connection,
        id: &str,
        update: &CandidateProfileUpdate,
    ) -> rusqlite::Result<usize> {
        let skills: Vec<String> = update
            .skills
            .iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        conn.execute(
            "UPDATE profiles SET full_name = ?1, phone = ?2, bio = ?3, skills = ?4, resume_link = ?5,
                education = ?6, experience = ?7, projects = ?8, achievements = ?9, updated_at = ?10
             WHERE id = ?11",
            params![
                update.full_name,
                update.phone,
                update.bio,
                to_json(&skills)?,
                update.resume_link,
                to_json(&update.education)?,
                to_json(&update.experience)?,
                to_json(&update.projects)?,
                to_json(&update.achievements)?,
                now(),
                id
            ],
        )
    }

    pub fn update_employer(
        conn: &Connection,
        id: &str,
        update: &EmployerProfileUpdate,
    ) -> rusqlite::Result<usize> {
        conn.execute(
            "UPDATE profiles SET full_name = ?1, phone = ?2, company_name = ?3,
                company_description = ?4, company_website = ?5, company_address = ?6,
                profile_image_url = COALESCE(?7, profile_image_url),
                company_logo_url = COALESCE(?8, company_logo_url), updated_at = ?9
             WHERE id = ?10",
            params![
                update.full_name,
                update.phone,
                update.company_name,
                update.company_description,
                update.company_website,
                update.company_address,
                update.profile_image_url,
                update.company_logo_url,
                now(),
                id
            ],
        )
    }

    pub fn set_image(
        conn: &Connection,
        id: &str,
        kind: ImageKind,
        url: &str,
    ) -> rusqlite::Result<usize> {
        conn.execute(
            &format!(
                "UPDATE profiles SET {} = ?1, updated_at = ?2 WHERE id = ?3",
                kind.column()
            ),
            params![url, now(), id],
        )
    }
}

pub fn display_name(full_name: Option<&str>) -> &str {
    full_name
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or("Candidate")
}

/// Case-insensitive match on company name, full name or email. An empty
/// term matches everything.
pub fn employer_matches(profile: &Profile, term: &str) -> bool {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return true;
    }
    [
        profile.company_name.as_deref(),
        profile.full_name.as_deref(),
        Some(profile.email.as_str()),
    ]
    .iter()
    .flatten()
    .any(|field| field.to_lowercase().contains(&term))
}
