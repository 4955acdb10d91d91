use crate::utils::app_error::AppError;
use base64::{engine::general_purpose, Engine};
use chrono::{Duration, Utc};
use hyper::StatusCode;
use libaes::Cipher;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use tracing::warn;

const NONCE_SIZE: usize = 16;

/// Struct that represents a serialized session token
#[derive(Debug, Serialize, Deserialize)]
pub struct Token {
    exp: i64,
    sub: String,
}

impl Token {
    /// Create an encrypted and encoded token
    pub fn create(sub: String, exp_in: Duration, cipher: &Cipher) -> Result<String, AppError> {
        let exp = (Utc::now() + exp_in).timestamp();

        let claims = serde_json::to_string(&Token { exp, sub }).map_err(|e| {
            warn!("Error serializing token : {e}");
            AppError::internal_server_error()
        })?;

        let mut nonce = [0u8; NONCE_SIZE];
        rand::thread_rng().fill_bytes(&mut nonce);

        let encrypted = cipher.cbc_encrypt(&nonce, claims.as_bytes());
        // The nonce is stored in front of the encrypted claims
        Ok(general_purpose::STANDARD.encode([&nonce, encrypted.as_slice()].concat()))
    }

    /// Decode token and return its subject or an error
    pub fn decode(token: &str, cipher: &Cipher) -> Result<String, AppError> {
        let encrypted_decoded = general_purpose::STANDARD.decode(token).map_err(|e| {
            warn!("Error decoding token : {e}");
            invalid_token()
        })?;

        if encrypted_decoded.len() <= NONCE_SIZE
            || (encrypted_decoded.len() - NONCE_SIZE) % NONCE_SIZE != 0
        {
            warn!("Token with a wrong size : {} bytes", encrypted_decoded.len());
            return Err(invalid_token());
        }

        let (nonce, datas) = encrypted_decoded.split_at(NONCE_SIZE);
        let decrypted = cipher.cbc_decrypt(nonce, datas);
        let string_decrypted = String::from_utf8(decrypted).map_err(|e| {
            warn!("Error decrypting token : {e}");
            invalid_token()
        })?;

        let token: Token = serde_json::from_str(&string_decrypted).map_err(|e| {
            warn!("Error deserializing token : {e}");
            invalid_token()
        })?;

        if token.exp <= Utc::now().timestamp() {
            warn!(
                "Expired token {}, expire timestamp : {}",
                token.sub, token.exp
            );
            return Err(AppError::new(StatusCode::FORBIDDEN, Some("Expired token.")));
        }

        Ok(token.sub)
    }
}

fn invalid_token() -> AppError {
    AppError::new(StatusCode::FORBIDDEN, Some("Invalid token."))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cipher() -> Cipher {
        Cipher::new_256(b"0123456789abcdef0123456789abcdef")
    }

    #[test]
    fn created_token_decodes_to_its_subject() {
        let cipher = cipher();
        let token = Token::create("42".to_string(), Duration::days(31), &cipher).unwrap();

        assert_eq!(Token::decode(&token, &cipher).unwrap(), "42");
    }

    #[test]
    fn two_tokens_for_the_same_subject_differ() {
        let cipher = cipher();
        let first = Token::create("42".to_string(), Duration::days(1), &cipher).unwrap();
        let second = Token::create("42".to_string(), Duration::days(1), &cipher).unwrap();

        assert_ne!(first, second);
    }

    #[test]
    fn expired_token_is_rejected() {
        let cipher = cipher();
        let token = Token::create("42".to_string(), Duration::seconds(-5), &cipher).unwrap();

        assert!(Token::decode(&token, &cipher).is_err());
    }

    #[test]
    fn garbage_is_rejected() {
        let cipher = cipher();
        assert!(Token::decode("not base64 at all!", &cipher).is_err());
        assert!(Token::decode(&general_purpose::STANDARD.encode([1u8; 8]), &cipher).is_err());
        assert!(Token::decode(&general_purpose::STANDARD.encode([1u8; 20]), &cipher).is_err());
    }
}
