use serde::{Deserialize, Serialize};

use crate::utils::enums::{JobStatus, JobType};

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CreateEmployerRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub company_name: String,
    #[serde(default)]
    pub company_description: Option<String>,
    #[serde(default)]
    pub company_website: Option<String>,
    #[serde(default)]
    pub company_address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct EmployerSearchQuery {
    #[serde(default)]
    pub search: Option<String>,
}

/// Full replacement of the candidate-editable profile fields.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CandidateProfileUpdate {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub resume_link: Option<String>,
    #[serde(default)]
    pub education: Vec<serde_json::Value>,
    #[serde(default)]
    pub experience: Vec<serde_json::Value>,
    #[serde(default)]
    pub projects: Vec<serde_json::Value>,
    #[serde(default)]
    pub achievements: Vec<serde_json::Value>,
}

/// Company fields; image URLs are only replaced when supplied.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct EmployerProfileUpdate {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub company_description: Option<String>,
    #[serde(default)]
    pub company_website: Option<String>,
    #[serde(default)]
    pub company_address: Option<String>,
    #[serde(default)]
    pub profile_image_url: Option<String>,
    #[serde(default)]
    pub company_logo_url: Option<String>,
}

/// Body for posting or editing a job.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobDraft {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub salary_min: Option<i64>,
    #[serde(default)]
    pub salary_max: Option<i64>,
    #[serde(default)]
    pub experience_required: Option<String>,
    pub location: String,
    #[serde(default)]
    pub job_type: JobType,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub status: Option<JobStatus>,
}

impl JobDraft {
    pub fn validate(&self) -> Result<(), String> {
        for (field, value) in [
            ("title", &self.title),
            ("description", &self.description),
            ("location", &self.location),
        ] {
            if value.trim().is_empty() {
                return Err(format!("Job {} is required", field));
            }
        }
        Ok(())
    }

    /// Empty department text is stored as no department.
    pub fn department(&self) -> Option<&str> {
        self.department
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct JobSearchQuery {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub job_type: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApplyRequest {
    #[serde(default)]
    pub resume_link: String,
    #[serde(default)]
    pub cover_letter: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
    #[serde(default)]
    pub assignment_name: Option<String>,
    #[serde(default)]
    pub assignment_link: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateNotesRequest {
    #[serde(default)]
    pub notes: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_draft_defaults_and_validation() {
        let draft: JobDraft = serde_json::from_value(serde_json::json!({
            "title": "Backend Engineer",
            "description": "Build APIs",
            "location": "Pune",
            "department": "  "
        }))
        .unwrap();
        assert_eq!(draft.job_type, JobType::WorkFromOffice);
        assert_eq!(draft.department(), None);
        assert!(draft.validate().is_ok());

        let blank = JobDraft {
            title: " ".to_string(),
            ..draft
        };
        assert_eq!(blank.validate().unwrap_err(), "Job title is required");
    }
}
