pub mod applications;
pub mod database;
pub mod jobs;
pub mod profiles;
