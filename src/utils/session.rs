//! The authenticated caller, resolved once per request from the bearer token.
//!
//! Handlers take a [`Session`] argument when login is required, or an
//! `Option<Session>` when anonymous callers are allowed.

use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::http::header::Header;
use actix_web::{web, FromRequest, HttpRequest};
use actix_web_httpauth::headers::authorization::{Authorization, Bearer};

use crate::error::{PortalError, Result};
use crate::state::AppState;
use crate::utils::encrypt::decode_token;
use crate::utils::enums::Role;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: String,
    pub email: String,
    pub role: Role,
}

impl Session {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn require_role(&self, role: Role) -> Result<()> {
        if self.role == role {
            Ok(())
        } else {
            Err(PortalError::forbidden(format!(
                "Only {} accounts can do this",
                role
            )))
        }
    }

    pub fn require_admin(&self) -> Result<()> {
        self.require_role(Role::Admin)
    }

    /// Passes for admins and for the owner of the resource.
    pub fn require_owner_or_admin(&self, owner_id: &str) -> Result<()> {
        if self.is_admin() || self.user_id == owner_id {
            Ok(())
        } else {
            Err(PortalError::forbidden(
                "You do not have access to this resource",
            ))
        }
    }

    fn from_http(req: &HttpRequest) -> Result<Session> {
        let state = req
            .app_data::<web::Data<AppState>>()
            .ok_or_else(|| PortalError::Internal("application state missing".to_string()))?;
        let auth = Authorization::<Bearer>::parse(req).map_err(|_| {
            PortalError::Unauthorized("Missing or malformed Authorization header".to_string())
        })?;
        let claims = decode_token(&state.config.jwt_secret, auth.as_ref().token())?;
        Ok(Session {
            user_id: claims.sub,
            email: claims.email,
            role: claims.role,
        })
    }
}

impl FromRequest for Session {
    type Error = PortalError;
    type Future = Ready<Result<Session>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(Session::from_http(req))
    }
}
