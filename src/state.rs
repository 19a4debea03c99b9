use std::sync::Arc;

use crate::config::AppConfig;
use crate::data::database::Database;
use crate::data::profiles::{NewProfile, Profile};
use crate::error::Result;
use crate::notify::{Dispatcher, Notifier};
use crate::utils::encrypt::hash_password;
use crate::utils::enums::Role;

/// Shared by every worker through `web::Data`.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub notifier: Arc<dyn Notifier>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(db: Database, notifier: Arc<dyn Notifier>, config: AppConfig) -> Self {
        Self {
            db: Arc::new(db),
            notifier,
            config: Arc::new(config),
        }
    }

    pub fn from_config(config: AppConfig) -> Result<Self> {
        let db = Database::open(&config.database_path)?;
        let dispatcher = Dispatcher::from_config(&config.mail);
        tracing::info!(transport = dispatcher.transport_name(), "mail dispatcher ready");
        Ok(Self::new(db, Arc::new(dispatcher), config))
    }

    /// Creates the configured admin account if no profile uses that email yet.
    pub fn bootstrap_admin(&self) -> Result<Option<Profile>> {
        let (email, password) = match (&self.config.admin_email, &self.config.admin_password) {
            (Some(email), Some(password)) => (email, password),
            _ => return Ok(None),
        };

        if Profile::find_by_email(&*self.db.conn()?, email)?.is_some() {
            return Ok(None);
        }

        let password_hash = hash_password(password, self.config.bcrypt_cost)?;
        let conn = self.db.conn()?;
        let admin = Profile::create(
            &conn,
            Role::Admin,
            &NewProfile {
                email: email.clone(),
                password_hash,
                full_name: Some("Administrator".to_string()),
                ..Default::default()
            },
        )?;
        tracing::info!(email = %admin.email, "bootstrapped admin account");
        Ok(Some(admin))
    }
}
