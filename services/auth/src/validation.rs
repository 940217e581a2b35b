//! Input validation utilities

use serde::Deserialize;

/// Message returned when any login field is missing
pub const MISSING_FIELDS: &str = "Company key, username, and password are required";

const MAX_COMPANY_KEY_LENGTH: usize = 64;
const MAX_USERNAME_LENGTH: usize = 128;
const MAX_PASSWORD_LENGTH: usize = 1024;

/// Login request body
///
/// Fields are optional so a missing field is reported the same way as a
/// blank one instead of as a JSON rejection.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(default)]
    pub company_key: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Login fields that passed validation
#[derive(Debug)]
pub struct LoginFields<'a> {
    pub company_key: &'a str,
    pub username: &'a str,
    pub password: &'a str,
}

/// Validate a login request
pub fn validate_login(request: &LoginRequest) -> Result<LoginFields<'_>, String> {
    let company_key = required(request.company_key.as_deref())?;
    let username = required(request.username.as_deref())?;
    let password = required(request.password.as_deref())?;

    if company_key.len() > MAX_COMPANY_KEY_LENGTH {
        return Err(format!(
            "Company key must be at most {MAX_COMPANY_KEY_LENGTH} characters long"
        ));
    }

    if username.len() > MAX_USERNAME_LENGTH {
        return Err(format!(
            "Username must be at most {MAX_USERNAME_LENGTH} characters long"
        ));
    }

    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(format!(
            "Password must be at most {MAX_PASSWORD_LENGTH} characters long"
        ));
    }

    Ok(LoginFields {
        company_key,
        username,
        password,
    })
}

/// Whitespace-only counts as missing; the value itself is passed on untouched
fn required(value: Option<&str>) -> Result<&str, String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(MISSING_FIELDS.to_string()),
    }
}
