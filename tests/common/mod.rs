#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use portal::config::AppConfig;
use portal::data::applications::Application;
use portal::data::database::Database;
use portal::data::jobs::Job;
use portal::data::profiles::{NewProfile, Profile};
use portal::notify::{NotifyError, Notifier, StatusEmail};
use portal::state::AppState;
use portal::utils::enums::Role;
use portal::utils::session::Session;
use portal::utils::structures::JobDraft;

/// Notifier that keeps every request it receives and can be told to fail.
#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<StatusEmail>>,
    pub fail: bool,
}

impl RecordingNotifier {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    pub fn last(&self) -> Option<StatusEmail> {
        self.sent.lock().unwrap().last().cloned()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, email: &StatusEmail) -> Result<(), NotifyError> {
        self.sent.lock().unwrap().push(email.clone());
        if self.fail {
            Err(NotifyError::Transport("connection refused".to_string()))
        } else {
            Ok(())
        }
    }
}

pub fn test_config() -> AppConfig {
    AppConfig {
        bcrypt_cost: 4,
        jwt_secret: "test-secret".to_string(),
        public_url: "http://localhost:8080".to_string(),
        admin_email: Some("admin@portal.test".to_string()),
        admin_password: Some("admin-pass".to_string()),
        ..Default::default()
    }
}

pub fn test_state(notifier: Arc<RecordingNotifier>, config: AppConfig) -> AppState {
    let state = AppState::new(Database::open_in_memory().unwrap(), notifier, config);
    state.bootstrap_admin().unwrap();
    state
}

/// One employer with one active job and one candidate who applied to it.
pub struct Seed {
    pub employer: Profile,
    pub candidate: Profile,
    pub job: Job,
    pub application: Application,
}

pub fn seed(db: &Database) -> Seed {
    let conn = db.conn().unwrap();
    let employer = Profile::create(
        &conn,
        Role::Employer,
        &NewProfile {
            email: "hr@acme.io".to_string(),
            password_hash: "unused".to_string(),
            full_name: Some("Dana Recruiter".to_string()),
            company_name: Some("Acme".to_string()),
            ..Default::default()
        },
    )
    .unwrap();
    let candidate = Profile::create(
        &conn,
        Role::Candidate,
        &NewProfile {
            email: "priya@example.com".to_string(),
            password_hash: "unused".to_string(),
            full_name: Some("Priya Shah".to_string()),
            ..Default::default()
        },
    )
    .unwrap();
    let job = Job::create(
        &conn,
        &employer.id,
        &JobDraft {
            title: "Backend Engineer".to_string(),
            description: "Own the hiring APIs".to_string(),
            location: "Pune".to_string(),
            ..Default::default()
        },
    )
    .unwrap();
    let application =
        Application::create(&conn, &job.id, &candidate.id, "https://cv.example/priya", None)
            .unwrap();

    Seed {
        employer,
        candidate,
        job,
        application,
    }
}

pub fn session_for(profile: &Profile) -> Session {
    Session {
        user_id: profile.id.clone(),
        email: profile.email.clone(),
        role: profile.role,
    }
}
