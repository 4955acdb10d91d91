use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};
use email_address::EmailAddress;
use tracing::{error, warn};

use crate::structs::register_user::RegisterUser;
use crate::utils::app_error::AppError;
use crate::utils::form::{self, FormErrors};

pub const USERNAME_MAX_LENGTH: usize = 64;
pub const EMAIL_MAX_LENGTH: usize = 120;
pub const ABOUT_ME_MAX_LENGTH: usize = 140;

pub fn check_username(username: &str) -> Result<(), String> {
    if username.is_empty() {
        return Err(form::REQUIRED.to_string());
    }
    if username.chars().count() > USERNAME_MAX_LENGTH {
        warn!("Username too long : {username}");
        return Err(form::too_long(USERNAME_MAX_LENGTH));
    }
    Ok(())
}

pub fn check_email_address(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err(form::REQUIRED.to_string());
    }
    if email.chars().count() > EMAIL_MAX_LENGTH {
        warn!("Email too long : {email}");
        return Err(form::too_long(EMAIL_MAX_LENGTH));
    }
    if !EmailAddress::is_valid(email) {
        warn!("Invalid email `{email}`");
        return Err(form::INVALID_EMAIL.to_string());
    }
    Ok(())
}

pub fn check_about_me(about_me: &str) -> Result<(), String> {
    if about_me.chars().count() > ABOUT_ME_MAX_LENGTH {
        return Err(form::too_long(ABOUT_ME_MAX_LENGTH));
    }
    Ok(())
}

/// Check a new password and its confirmation
pub fn check_passwords(password: &str, password2: &str, errors: &mut FormErrors) {
    if password.is_empty() {
        errors.add("password", form::REQUIRED);
    }
    if password2.is_empty() {
        errors.add("password2", form::REQUIRED);
    } else if password != password2 {
        errors.add("password2", form::PASSWORDS_DIFFER);
    }
}

/// Checks that do not need the database
pub fn check_register_infos(user: &RegisterUser) -> FormErrors {
    let mut errors = FormErrors::default();

    if let Err(message) = check_username(&user.username) {
        errors.add("username", message);
    }
    if let Err(message) = check_email_address(&user.email) {
        errors.add("email", message);
    }
    check_passwords(&user.password, &user.password2, &mut errors);

    errors
}

pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            error!("Error hashing password : {e}");
            AppError::internal_server_error()
        })
}

pub fn verify_password(password_hash: &str, password: &str) -> bool {
    let hash = match PasswordHash::new(password_hash) {
        Ok(hash) => hash,
        Err(e) => {
            error!("Failed to parse password hash : {e}");
            return false;
        }
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &hash)
        .is_ok()
}
