pub mod encrypt;
pub mod enums;
pub mod routes;
pub mod session;
pub mod structures;
