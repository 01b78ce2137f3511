//! Registration, login and the password reset flow.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use delicious_core::accounts::{NewUser, User};
use serde::{Deserialize, Serialize};

use crate::{auth::CurrentUser, error::ApiError, mail::Mail, state::AppState};

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(rename = "password-confirm")]
    pub password_confirm: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ForgotForm {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct PasswordForm {
    pub password: String,
    #[serde(rename = "password-confirm")]
    pub password_confirm: String,
}

/// Handed back on register, login and password reset.
#[derive(Debug, Serialize)]
pub struct Session {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Serialize)]
pub struct Notice {
    pub message: String,
}

fn confirm_passwords(password: &str, confirm: &str) -> Result<(), ApiError> {
    if password != confirm {
        return Err(ApiError::BadRequest("Passwords do not match!".to_string()));
    }
    Ok(())
}

pub async fn register(
    State(state): State<AppState>,
    Json(form): Json<RegisterForm>,
) -> Result<(StatusCode, Json<Session>), ApiError> {
    confirm_passwords(&form.password, &form.password_confirm)?;
    let user = state
        .users
        .register(NewUser {
            name: form.name,
            email: form.email,
            password: form.password,
        })
        .await?;

    let token = state.sessions.open(user.id).await;
    tracing::info!(user = %user.id, "account: registered");
    Ok((StatusCode::CREATED, Json(Session { token, user })))
}

pub async fn login(
    State(state): State<AppState>,
    Json(form): Json<LoginForm>,
) -> Result<Json<Session>, ApiError> {
    let user = state
        .users
        .authenticate(&form.email, &form.password)
        .await?
        .ok_or(ApiError::BadCredentials)?;

    let token = state.sessions.open(user.id).await;
    Ok(Json(Session { token, user }))
}

pub async fn logout(State(state): State<AppState>, user: CurrentUser) -> StatusCode {
    state.sessions.close(&user.token).await;
    StatusCode::NO_CONTENT
}

/// Issue a reset token and mail the link to the account holder.
pub async fn forgot(
    State(state): State<AppState>,
    Json(form): Json<ForgotForm>,
) -> Result<(StatusCode, Json<Notice>), ApiError> {
    let ttl = state.config.auth.reset_token_ttl();
    let issued = state
        .users
        .issue_reset(&form.email, ttl)
        .await?
        .ok_or_else(|| ApiError::NotFound("No account with that email exists!".to_string()))?;

    let reset_url = format!(
        "{}/account/reset/{}",
        state.config.server.public_url.trim_end_matches('/'),
        issued.token
    );
    state
        .mailer
        .send(Mail::password_reset(issued.user.email.clone(), reset_url))
        .await?;

    tracing::info!(user = %issued.user.id, expires = %issued.expires, "account: reset issued");
    Ok((
        StatusCode::ACCEPTED,
        Json(Notice {
            message: "You have been emailed a password reset link.".to_string(),
        }),
    ))
}

/// Whether a reset token is still usable.
pub async fn reset_form(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<StatusCode, ApiError> {
    state
        .users
        .by_reset_token(&token)
        .await?
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or(ApiError::ResetExpired)
}

/// Set a new password and log the user straight in.
pub async fn update_password(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Json(form): Json<PasswordForm>,
) -> Result<Json<Session>, ApiError> {
    confirm_passwords(&form.password, &form.password_confirm)?;
    let user = state
        .users
        .reset_password(&token, &form.password)
        .await?
        .ok_or(ApiError::ResetExpired)?;

    let token = state.sessions.open(user.id).await;
    tracing::info!(user = %user.id, "account: password reset");
    Ok(Json(Session { token, user }))
}
