//! # Moodlog — Request/Response DTOs
//!
//! Conventions:
//! - `*Request`  → deserialized from client JSON body or query params
//! - `*Response` → serialized to client JSON
//! - Registration input is validated with `validator` derive macros

use axum::extract::FromRequest;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::error::{AppError, AppResult};
use crate::models::journal_entry::{JournalEntry, JournalStats};
use crate::models::user::UserProfile;
use crate::store::journal::DEFAULT_LIST_LIMIT;

// ============================================================================
// Common
// ============================================================================

/// JSON body extractor whose rejections render as `AppError::Validation`.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

// ============================================================================
// Auth
// ============================================================================

fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username.chars().all(|c| c.is_ascii_alphanumeric()) {
        Ok(())
    } else {
        let mut err = ValidationError::new("alphanumeric");
        err.message = Some("Username must be 3-20 characters and alphanumeric".into());
        Err(err)
    }
}

/// POST /api/auth/register
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[serde(default)]
    #[validate(
        length(min = 3, max = 20, message = "Username must be 3-20 characters and alphanumeric"),
        custom = "validate_username"
    )]
    pub username: String,

    #[serde(default)]
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 6, message = "Password must be at least 6 characters long"))]
    pub password: String,
}

impl RegisterRequest {
    /// Trims identifiers and validates. Passwords are taken as given.
    pub fn normalized(self) -> AppResult<Self> {
        let req = Self {
            username: self.username.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password,
        };
        if req.username.is_empty() || req.email.is_empty() || req.password.is_empty() {
            return Err(AppError::Validation(
                "Username, email, and password are required".into(),
            ));
        }
        req.validate()?;
        Ok(req)
    }
}

/// POST /api/auth/login
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub user: UserProfile,
    pub access_token: String,
    pub expires_in: i64,
}

/// GET /api/auth/status
#[derive(Debug, Serialize)]
pub struct AuthStatusResponse {
    pub authenticated: bool,
    pub user: Option<UserProfile>,
}

// ============================================================================
// Journal
// ============================================================================

/// POST /api/journal
#[derive(Debug, Deserialize)]
pub struct CreateEntryRequest {
    #[serde(default)]
    pub entry: String,
    /// Informal tag ("happy", "sad", ...) that replaces classification.
    pub mood: Option<String>,
}

/// GET /api/journal?limit=N
#[derive(Debug, Default, Deserialize)]
pub struct ListEntriesQuery {
    pub limit: Option<String>,
}

impl ListEntriesQuery {
    pub fn limit(&self) -> AppResult<usize> {
        match self.limit.as_deref().map(str::trim) {
            None | Some("") => Ok(DEFAULT_LIST_LIMIT),
            Some(raw) => raw.parse::<usize>().map_err(|_| {
                AppError::Validation("limit must be a non-negative integer".into())
            }),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EntryCreatedResponse {
    pub success: bool,
    pub entry: JournalEntry,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct EntryListResponse {
    pub success: bool,
    pub count: usize,
    pub entries: Vec<JournalEntry>,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub success: bool,
    pub stats: JournalStats,
}
