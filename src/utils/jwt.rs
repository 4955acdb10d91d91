use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::utils::app_error::AppError;

#[derive(Debug, Serialize, Deserialize)]
struct ResetPasswordClaims {
    reset_password: i64,
    exp: usize,
}

/// Sign a claim allowing the user `user_id` to change their password once
pub fn create_reset_password_jwt(
    user_id: i64,
    secret: &[u8],
    exp_in: Duration,
) -> Result<String, AppError> {
    let exp = (Utc::now() + exp_in).timestamp().max(0) as usize;
    let claims = ResetPasswordClaims {
        reset_password: user_id,
        exp,
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret),
    )
    .map_err(|e| {
        warn!("Error while creating password reset JWT for user {user_id} : {e}");
        AppError::internal_server_error()
    })
}

/// Id of the user allowed to reset their password, `None` for any invalid or expired token
pub fn decode_reset_password_jwt(jwt: &str, secret: &[u8]) -> Option<i64> {
    match decode::<ResetPasswordClaims>(
        jwt,
        &DecodingKey::from_secret(secret),
        &Validation::new(Algorithm::HS256),
    ) {
        Ok(token) => Some(token.claims.reset_password),
        Err(e) => {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    warn!("Expired password reset link")
                }
                _ => warn!("Invalid password reset link : {e}"),
            }
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"this-is-a-key";

    #[test]
    fn token_carries_the_user_id() {
        let jwt = create_reset_password_jwt(7, SECRET, Duration::seconds(600)).unwrap();
        assert_eq!(decode_reset_password_jwt(&jwt, SECRET), Some(7));
    }

    #[test]
    fn token_signed_with_another_secret_is_rejected() {
        let jwt = create_reset_password_jwt(7, b"another-key", Duration::seconds(600)).unwrap();
        assert_eq!(decode_reset_password_jwt(&jwt, SECRET), None);
    }

    #[test]
    fn expired_token_is_rejected() {
        // Past the default 60 seconds of leeway
        let jwt = create_reset_password_jwt(7, SECRET, Duration::seconds(-120)).unwrap();
        assert_eq!(decode_reset_password_jwt(&jwt, SECRET), None);
    }

    #[test]
    fn garbage_is_rejected() {
        assert_eq!(decode_reset_password_jwt("not.a.jwt", SECRET), None);
        assert_eq!(decode_reset_password_jwt("", SECRET), None);
    }
}
