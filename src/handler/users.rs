//! Signup, login and profile handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use redb::{ReadableDatabase, ReadableTable};
use serde_json::json;
use tracing::{info, warn};

use crate::database::{
    new_id, read_json, read_str, to_json, AppState, TABLE_EMAILS, TABLE_USERNAMES, TABLE_USERS,
};
use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::handler::present;
use crate::model::{LoginRequest, ProfileUpdateRequest, SignupRequest, User, UserProfile};

/// Registers a new user
///
/// # Response
///
/// - **201 Created** - `{ "message": "User registered!", "user": {...} }`
/// - **400 Bad Request** - a field is missing or blank
/// - **409 Conflict** - username or email already taken
pub async fn signup(
    State(state): State<AppState>,
    AppJson(payload): AppJson<SignupRequest>,
) -> AppResult<impl IntoResponse> {
    let (Some(username), Some(email), Some(phone), Some(address), Some(password)) = (
        present(payload.username),
        present(payload.email),
        present(payload.phone),
        present(payload.address),
        present(payload.password),
    ) else {
        return Err(AppError::bad_request("All fields are required"));
    };

    let hashed = bcrypt::hash(password.as_bytes(), state.config.bcrypt_cost)?;
    let user = User {
        id: new_id(),
        username,
        email,
        phone,
        address,
        password: hashed,
        created_at: Utc::now(),
    };
    let email_key = user.email.to_lowercase();

    let write_txn = state.db.begin_write()?;
    {
        let mut usernames = write_txn.open_table(TABLE_USERNAMES)?;
        let mut emails = write_txn.open_table(TABLE_EMAILS)?;

        if usernames.get(user.username.as_str())?.is_some()
            || emails.get(email_key.as_str())?.is_some()
        {
            return Err(AppError::conflict("Username or email already exists"));
        }

        usernames.insert(user.username.as_str(), user.id.as_str())?;
        emails.insert(email_key.as_str(), user.id.as_str())?;

        let mut users = write_txn.open_table(TABLE_USERS)?;
        users.insert(user.id.as_str(), to_json(&user)?.as_str())?;
    }
    write_txn.commit()?;

    info!(user_id = %user.id, username = %user.username, "user registered");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "User registered!",
            "user": UserProfile::from(&user),
        })),
    ))
}

/// Checks a username/password pair against the stored bcrypt hash
///
/// - **200 OK** - `{ "message": "Login successful", "user": {...} }`
/// - **401 Unauthorized** - unknown user or wrong password
pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    let invalid = || AppError::Unauthorized("Invalid credentials".to_string());

    let user: User = {
        let read_txn = state.db.begin_read()?;
        let usernames = read_txn.open_table(TABLE_USERNAMES)?;
        let user_id = read_str(&usernames, payload.username.trim())?.ok_or_else(invalid)?;
        let users = read_txn.open_table(TABLE_USERS)?;
        read_json(&users, &user_id)?.ok_or_else(invalid)?
    };

    if !bcrypt::verify(payload.password.as_bytes(), &user.password)? {
        warn!(username = %user.username, "failed login attempt");
        return Err(invalid());
    }

    Ok(Json(json!({
        "message": "Login successful",
        "user": UserProfile::from(&user),
    })))
}

/// Static admin login
///
/// The admin is not a stored user; the credentials come from configuration.
pub async fn admin_login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    let admin = &state.config.admin;
    info!(username = %payload.username, "admin login attempt");

    if payload.username != admin.username || payload.password != admin.password {
        warn!("invalid admin credentials");
        return Err(AppError::Unauthorized(
            "Invalid admin credentials".to_string(),
        ));
    }

    Ok(Json(json!({
        "message": "Login successful",
        "admin": {
            "_id": admin.id,
            "username": admin.username,
            "email": admin.email,
        }
    })))
}

/// Replaces a user's profile fields
///
/// All four fields are required. Changing the username or email keeps the
/// uniqueness indexes in step and answers 409 if the new value belongs to
/// someone else.
pub async fn update_profile(
    Path(id): Path<String>,
    State(state): State<AppState>,
    AppJson(payload): AppJson<ProfileUpdateRequest>,
) -> AppResult<impl IntoResponse> {
    let (Some(username), Some(email), Some(phone), Some(address)) = (
        present(payload.username),
        present(payload.email),
        present(payload.phone),
        present(payload.address),
    ) else {
        return Err(AppError::bad_request("All fields are required"));
    };

    let write_txn = state.db.begin_write()?;
    let user = {
        let mut users = write_txn.open_table(TABLE_USERS)?;
        let mut user: User =
            read_json(&users, &id)?.ok_or_else(|| AppError::not_found("User not found"))?;

        let mut usernames = write_txn.open_table(TABLE_USERNAMES)?;
        if username != user.username {
            if read_str(&usernames, &username)?.is_some_and(|owner| owner != user.id) {
                return Err(AppError::conflict("Username or email already exists"));
            }
            usernames.remove(user.username.as_str())?;
            usernames.insert(username.as_str(), user.id.as_str())?;
        }

        let mut emails = write_txn.open_table(TABLE_EMAILS)?;
        let old_email_key = user.email.to_lowercase();
        let new_email_key = email.to_lowercase();
        if new_email_key != old_email_key {
            if read_str(&emails, &new_email_key)?.is_some_and(|owner| owner != user.id) {
                return Err(AppError::conflict("Username or email already exists"));
            }
            emails.remove(old_email_key.as_str())?;
            emails.insert(new_email_key.as_str(), user.id.as_str())?;
        }

        user.username = username;
        user.email = email;
        user.phone = phone;
        user.address = address;
        users.insert(user.id.as_str(), to_json(&user)?.as_str())?;
        user
    };
    write_txn.commit()?;

    info!(user_id = %user.id, "profile updated");

    Ok(Json(json!({
        "message": "Profile updated successfully",
        "user": UserProfile::from(&user),
    })))
}
