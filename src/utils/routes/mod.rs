pub mod accounts;
pub mod admin;
pub mod applications;
pub mod jobs;
pub mod misc;
pub mod profiles;
