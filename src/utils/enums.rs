use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Candidate,
    Employer,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Candidate => "candidate",
            Role::Employer => "employer",
            Role::Admin => "admin",
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "candidate" => Ok(Role::Candidate),
            "employer" => Ok(Role::Employer),
            "admin" => Ok(Role::Admin),
            other => Err(format!("Unknown role '{}'", other)),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobType {
    #[serde(rename = "Work From Home")]
    WorkFromHome,
    #[serde(rename = "Work From Office")]
    WorkFromOffice,
    #[serde(rename = "Hybrid")]
    Hybrid,
}

impl JobType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::WorkFromHome => "Work From Home",
            JobType::WorkFromOffice => "Work From Office",
            JobType::Hybrid => "Hybrid",
        }
    }
}

impl Default for JobType {
    fn default() -> Self {
        JobType::WorkFromOffice
    }
}

impl FromStr for JobType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Work From Home" => Ok(JobType::WorkFromHome),
            "Work From Office" => Ok(JobType::WorkFromOffice),
            "Hybrid" => Ok(JobType::Hybrid),
            other => Err(format!("Unknown job type '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Active,
    Inactive,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Active => "active",
            JobStatus::Inactive => "inactive",
        }
    }
}

impl FromStr for JobStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(JobStatus::Active),
            "inactive" => Ok(JobStatus::Inactive),
            other => Err(format!("Unknown job status '{}'", other)),
        }
    }
}

/// Hiring pipeline stage of an application.
///
/// Stages run in declaration order from `Applied` to `Hired`; `Rejected` is
/// terminal and may be entered from any stage. Updates are not restricted to
/// forward moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Applied,
    Shortlisted,
    Assignment,
    TechnicalInterview,
    HrInterview,
    Verification,
    Hired,
    Rejected,
}

/// Label and colour tone shown for a status in every view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusDisplay {
    pub key: String,
    pub label: String,
    pub tone: &'static str,
}

static STATUS_TABLE: [(ApplicationStatus, &str, &str, &str); 8] = [
    (ApplicationStatus::Applied, "applied", "Applied", "blue"),
    (ApplicationStatus::Shortlisted, "shortlisted", "Shortlisted", "purple"),
    (ApplicationStatus::Assignment, "assignment", "Assignment Round", "yellow"),
    (ApplicationStatus::TechnicalInterview, "technical_interview", "Technical Interview", "orange"),
    (ApplicationStatus::HrInterview, "hr_interview", "HR Interview", "indigo"),
    (ApplicationStatus::Verification, "verification", "Verification", "cyan"),
    (ApplicationStatus::Hired, "hired", "Hired", "green"),
    (ApplicationStatus::Rejected, "rejected", "Rejected", "red"),
];

const NEUTRAL_TONE: &str = "muted";

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 8] = [
        ApplicationStatus::Applied,
        ApplicationStatus::Shortlisted,
        ApplicationStatus::Assignment,
        ApplicationStatus::TechnicalInterview,
        ApplicationStatus::HrInterview,
        ApplicationStatus::Verification,
        ApplicationStatus::Hired,
        ApplicationStatus::Rejected,
    ];

    fn row(&self) -> &'static (ApplicationStatus, &'static str, &'static str, &'static str) {
        // every variant has exactly one row, in declaration order
        &STATUS_TABLE[*self as usize]
    }

    pub fn as_str(&self) -> &'static str {
        self.row().1
    }

    pub fn label(&self) -> &'static str {
        self.row().2
    }

    pub fn tone(&self) -> &'static str {
        self.row().3
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ApplicationStatus::Hired | ApplicationStatus::Rejected)
    }

    /// Past the initial stage and not yet decided.
    pub fn is_in_progress(&self) -> bool {
        !matches!(self, ApplicationStatus::Applied) && !self.is_terminal()
    }

    pub fn display(&self) -> StatusDisplay {
        StatusDisplay {
            key: self.as_str().to_string(),
            label: self.label().to_string(),
            tone: self.tone(),
        }
    }

    /// Display metadata for a raw stored value. Never fails: unknown keys are
    /// shown as-is and a missing value shows as "Unknown".
    pub fn display_for(raw: Option<&str>) -> StatusDisplay {
        match raw {
            Some(key) => match key.parse::<ApplicationStatus>() {
                Ok(status) => status.display(),
                Err(_) => StatusDisplay {
                    key: key.to_string(),
                    label: key.to_string(),
                    tone: NEUTRAL_TONE,
                },
            },
            None => StatusDisplay {
                key: String::new(),
                label: "Unknown".to_string(),
                tone: NEUTRAL_TONE,
            },
        }
    }
}

impl FromStr for ApplicationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        // older candidate screens stored the short key
        if key == "technical" {
            return Ok(ApplicationStatus::TechnicalInterview);
        }
        STATUS_TABLE
            .iter()
            .find(|(_, k, _, _)| *k == key)
            .map(|(status, _, _, _)| *status)
            .ok_or_else(|| format!("Unknown application status '{}'", s))
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
