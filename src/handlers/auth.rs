use askama::Template;
use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use axum_extra::extract::CookieJar;

use super::render;
use crate::api::{ApiError, BackendClient};
use crate::error::{AppError, Result};
use crate::middleware::OptionalAuthUser;
use crate::models::{LoginCredentials, SignUpForm};
use crate::repositories::SessionRepository;
use crate::session::{create_session_cookie, get_session_token, remove_session_cookie};

#[derive(Clone)]
pub struct AuthState {
    pub api: BackendClient,
    pub session_repo: SessionRepository,
}

// Templates
#[derive(Template)]
#[template(path = "auth/login.html")]
struct LoginTemplate {
    email: String,
    error: Option<String>,
}

#[derive(Template)]
#[template(path = "auth/signup.html")]
struct SignUpTemplate {
    email: String,
    error: Option<String>,
}

/// Signs in with the backend, resolves the backend user, and stores the
/// session. Returns the session token.
async fn start_session(state: &AuthState, email: &str, password: &str) -> Result<String> {
    let uid = state.api.sign_in(email, password).await?;
    let user = state.api.find_user_by_firebase_uid(&uid).await?;
    let token = state.session_repo.create(&user, &uid).await?;
    tracing::info!("User {} signed in", user.id);
    Ok(token)
}

fn rejected_by_backend(err: &AppError) -> bool {
    matches!(
        err,
        AppError::Backend(ApiError::Status { status, .. }) if (400..500).contains(status)
    )
}

// Handlers
pub async fn login_page(OptionalAuthUser(auth_user): OptionalAuthUser) -> Result<Response> {
    if auth_user.is_some() {
        return Ok(Redirect::to("/").into_response());
    }

    render(&LoginTemplate {
        email: String::new(),
        error: None,
    })
}

pub async fn login_submit(
    State(state): State<AuthState>,
    jar: CookieJar,
    Form(credentials): Form<LoginCredentials>,
) -> Result<Response> {
    let result = start_session(&state, credentials.email.trim(), &credentials.password).await;

    match result {
        Ok(token) => {
            let jar = jar.add(create_session_cookie(&token));
            Ok((jar, Redirect::to("/")).into_response())
        }
        Err(e) => {
            let message = if rejected_by_backend(&e) {
                "Invalid email or password."
            } else {
                tracing::warn!("Sign in failed: {}", e);
                "Couldn't sign in. Please try again."
            };
            render(&LoginTemplate {
                email: credentials.email,
                error: Some(message.to_string()),
            })
        }
    }
}

pub async fn signup_page(OptionalAuthUser(auth_user): OptionalAuthUser) -> Result<Response> {
    if auth_user.is_some() {
        return Ok(Redirect::to("/").into_response());
    }

    render(&SignUpTemplate {
        email: String::new(),
        error: None,
    })
}

pub async fn signup_submit(
    State(state): State<AuthState>,
    jar: CookieJar,
    Form(form): Form<SignUpForm>,
) -> Result<Response> {
    if let Some(message) = form.validate() {
        return render(&SignUpTemplate {
            email: form.email,
            error: Some(message.to_string()),
        });
    }

    let email = form.email.trim();
    let result = match state.api.sign_up(email, &form.password).await {
        Ok(()) => start_session(&state, email, &form.password).await,
        Err(e) => Err(e.into()),
    };

    match result {
        Ok(token) => {
            let jar = jar.add(create_session_cookie(&token));
            Ok((jar, Redirect::to("/")).into_response())
        }
        Err(e) => {
            let message = if rejected_by_backend(&e) {
                "Invalid email or password."
            } else {
                tracing::warn!("Sign up failed: {}", e);
                "Couldn't create the account. Please try again."
            };
            render(&SignUpTemplate {
                email: form.email,
                error: Some(message.to_string()),
            })
        }
    }
}

/// Clears the local session even when the backend sign-out call fails.
pub async fn logout(State(state): State<AuthState>, jar: CookieJar) -> Result<Response> {
    if let Some(token) = get_session_token(&jar) {
        state.session_repo.delete(&token).await?;
    }

    if let Err(e) = state.api.sign_out().await {
        tracing::warn!("Backend sign out failed: {}", e);
    }

    let jar = jar.add(remove_session_cookie());
    Ok((jar, Redirect::to("/auth/login")).into_response())
}
