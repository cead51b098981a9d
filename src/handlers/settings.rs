use askama::Template;
use axum::{extract::State, response::Response};

use super::render;
use crate::error::Result;
use crate::middleware::AuthUser;
use crate::version::GIT_VERSION;

#[derive(Clone)]
pub struct SettingsState {
    pub support_email: String,
}

#[derive(Template)]
#[template(path = "settings/index.html")]
struct SettingsTemplate {
    user: AuthUser,
    git_version: &'static str,
    support_email: String,
    support_href: String,
}

#[derive(Template)]
#[template(path = "settings/profile.html")]
struct ProfileTemplate {
    user: AuthUser,
}

fn support_href(email: &str) -> String {
    format!(
        "mailto:{}?subject={}",
        email,
        urlencoding::encode("Workout Tracker Support")
    )
}

pub async fn index(State(state): State<SettingsState>, auth_user: AuthUser) -> Result<Response> {
    render(&SettingsTemplate {
        user: auth_user,
        git_version: GIT_VERSION,
        support_href: support_href(&state.support_email),
        support_email: state.support_email,
    })
}

pub async fn profile(auth_user: AuthUser) -> Result<Response> {
    render(&ProfileTemplate { user: auth_user })
}
