use axum::{
    extract::State,
    http::{header::SET_COOKIE, HeaderMap},
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use axum_extra::extract::CookieJar;
use serde_json::json;

use crate::{
    db::models::AuthUser,
    extractors::AuthGuard,
    models::{ChangePasswordPayload, LoginPayload, RegisterPayload, UpdateProfilePayload},
    names,
    rejections::{AppError, ResultExt},
    utils, AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(names::REGISTER_URL, post(register))
        .route(names::LOGIN_URL, post(login))
        .route(names::LOGOUT_URL, post(logout))
        .route(names::PROFILE_URL, get(profile).put(update_profile))
        .route(names::CHANGE_PASSWORD_URL, put(change_password))
}

fn user_json(user: &AuthUser) -> serde_json::Value {
    json!({
        "id": user.id,
        "full_name": user.display_name,
        "email": user.email,
    })
}

fn session_headers(state: &AppState, session: &str) -> Result<HeaderMap, AppError> {
    let cookie = utils::cookie(names::USER_SESSION_COOKIE_NAME, session, state.secure_cookies);
    let mut headers = HeaderMap::new();
    headers.insert(
        SET_COOKIE,
        cookie.parse().reject("could not build session cookie")?,
    );
    Ok(headers)
}

async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterPayload>,
) -> Result<impl IntoResponse, AppError> {
    let mut field_errors = serde_json::Map::new();
    if body.email.trim().is_empty() {
        field_errors.insert("email".into(), json!(["Email is required"]));
    }
    if body.full_name.trim().is_empty() {
        field_errors.insert("fullName".into(), json!(["Full name is required"]));
    }
    if body.password.len() < names::MIN_PASSWORD_LEN {
        field_errors.insert(
            "password".into(),
            json!(["Password must be at least 8 characters"]),
        );
    }
    if !field_errors.is_empty() {
        return Err(AppError::Validation(
            "Invalid input",
            serde_json::Value::Object(field_errors),
        ));
    }

    let taken = state
        .db
        .email_exists(&body.email)
        .await
        .reject("could not check email")?;
    if taken {
        return Err(AppError::Input("Email already in use"));
    }

    let user_id = state
        .db
        .create_user(&body.email, &body.password, &body.full_name)
        .await
        .reject("could not create user")?;

    let session = state
        .db
        .create_user_session(user_id)
        .await
        .reject("could not create session")?;

    let headers = session_headers(&state, &session)?;
    Ok((
        headers,
        Json(json!({
            "message": "Registration successful",
            "user": {
                "id": user_id,
                "full_name": body.full_name,
                "email": body.email,
            },
        })),
    ))
}

async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginPayload>,
) -> Result<impl IntoResponse, AppError> {
    if body.email.trim().is_empty() || body.password.is_empty() {
        return Err(AppError::Validation(
            "Invalid input",
            json!({"email": ["Email and password are required"]}),
        ));
    }

    let valid = state
        .db
        .verify_user_password(&body.email, &body.password)
        .await
        .reject("could not verify password")?;
    if !valid {
        return Err(AppError::Unauthorized);
    }

    let user = state
        .db
        .find_user_by_email(&body.email)
        .await
        .reject("could not look up user")?
        .ok_or(AppError::Unauthorized)?;

    let session = state
        .db
        .create_user_session(user.id)
        .await
        .reject("could not create session")?;

    let headers = session_headers(&state, &session)?;
    Ok((
        headers,
        Json(json!({
            "message": "Login successful",
            "user": user_json(&user),
        })),
    ))
}

async fn logout(
    AuthGuard(_user): AuthGuard,
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AppError> {
    if let Some(session) = jar.get(names::USER_SESSION_COOKIE_NAME) {
        state
            .db
            .delete_user_session(session.value())
            .await
            .reject("could not delete session")?;
    }

    let clear = utils::clear_cookie(names::USER_SESSION_COOKIE_NAME, state.secure_cookies);
    let mut headers = HeaderMap::new();
    headers.insert(
        SET_COOKIE,
        clear.parse().reject("could not build clear cookie")?,
    );

    Ok((headers, Json(json!({"message": "Logged out"}))))
}

async fn profile(AuthGuard(user): AuthGuard) -> Json<serde_json::Value> {
    Json(json!({"user": user_json(&user)}))
}

async fn update_profile(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
    Json(body): Json<UpdateProfilePayload>,
) -> Result<Json<serde_json::Value>, AppError> {
    if let Some(email) = &body.email {
        if email.trim().is_empty() {
            return Err(AppError::Input("Email cannot be empty"));
        }
    }
    if let Some(full_name) = &body.full_name {
        if full_name.trim().is_empty() {
            return Err(AppError::Input("Full name cannot be empty"));
        }
    }

    let updated = state
        .db
        .update_profile(user.id, body.full_name.as_deref(), body.email.as_deref())
        .await
        .reject("could not update profile")?;

    Ok(Json(json!({
        "message": "Profile updated successfully",
        "data": user_json(&updated),
    })))
}

async fn change_password(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
    Json(body): Json<ChangePasswordPayload>,
) -> Result<Json<serde_json::Value>, AppError> {
    if body.new_password.len() < names::MIN_PASSWORD_LEN {
        return Err(AppError::Validation(
            "Invalid input",
            json!({"newPassword": ["Password must be at least 8 characters"]}),
        ));
    }

    let changed = state
        .db
        .change_password(user.id, &body.current_password, &body.new_password)
        .await
        .reject("could not change password")?;
    if !changed {
        return Err(AppError::Input("Current password is incorrect"));
    }

    Ok(Json(json!({"message": "Password updated successfully"})))
}
