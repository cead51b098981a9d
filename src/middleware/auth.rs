use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use rusqlite::Row;

use crate::models::FromSqliteRow;
use crate::repositories::SessionRepository;
use crate::session::get_session_token;

/// The signed-in user's context, loaded from the session store on every
/// request. It is created at sign-in and removed at sign-out.
#[derive(Clone, Debug, PartialEq)]
pub struct AuthUser {
    pub token: String,
    /// Backend user id (`_id`), the key for every program request.
    pub id: String,
    pub firebase_uid: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
}

impl AuthUser {
    pub fn display_name(&self) -> &str {
        self.first_name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or("Guest")
    }

    pub fn first_name_or_na(&self) -> &str {
        self.first_name.as_deref().unwrap_or("N/A")
    }

    pub fn last_name_or_na(&self) -> &str {
        self.last_name.as_deref().unwrap_or("N/A")
    }

    pub fn email_or_na(&self) -> &str {
        self.email.as_deref().unwrap_or("N/A")
    }

    pub fn role_label(&self) -> &str {
        self.role.as_deref().unwrap_or("Client")
    }
}

impl FromSqliteRow for AuthUser {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            token: row.get("token")?,
            id: row.get("user_id")?,
            firebase_uid: row.get("firebase_uid")?,
            first_name: row.get("first_name")?,
            last_name: row.get("last_name")?,
            email: row.get("email")?,
            role: row.get("role")?,
        })
    }
}

async fn load_user(parts: &Parts) -> Option<AuthUser> {
    let repo = parts.extensions.get::<SessionRepository>()?.clone();
    let token = get_session_token(&CookieJar::from_headers(&parts.headers))?;

    match repo.find_valid(&token).await {
        Ok(user) => user,
        Err(e) => {
            tracing::error!("Session lookup failed: {}", e);
            None
        }
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AuthRedirect;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        load_user(parts).await.ok_or(AuthRedirect)
    }
}

pub struct AuthRedirect;

impl IntoResponse for AuthRedirect {
    fn into_response(self) -> Response {
        Redirect::to("/auth/login").into_response()
    }
}

// Optional auth - doesn't redirect, just returns None if not logged in
pub struct OptionalAuthUser(pub Option<AuthUser>);

impl<S> FromRequestParts<S> for OptionalAuthUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(OptionalAuthUser(load_user(parts).await))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> AuthUser {
        AuthUser {
            token: "t".to_string(),
            id: "u1".to_string(),
            firebase_uid: "f1".to_string(),
            first_name: None,
            last_name: None,
            email: Some("ada@example.com".to_string()),
            role: None,
        }
    }

    #[test]
    fn test_display_name_falls_back_to_email() {
        let mut u = user();
        assert_eq!(u.display_name(), "ada@example.com");
        u.first_name = Some("Ada".to_string());
        assert_eq!(u.display_name(), "Ada");
        u.email = None;
        u.first_name = None;
        assert_eq!(u.display_name(), "Guest");
    }

    #[test]
    fn test_profile_fallbacks() {
        let u = user();
        assert_eq!(u.first_name_or_na(), "N/A");
        assert_eq!(u.role_label(), "Client");
    }
}
