use std::collections::HashSet;

use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use thiserror::Error;

use super::types::{FileMakerClaims, IdentityRecord};

#[derive(Error, Debug)]
enum TranslateError {
    #[error("JWT secret not configured")]
    MissingSecret,
    #[error("No credential provided")]
    EmptyCredential,
    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

/// Verifies FileMaker-signed credentials and maps their claims.
///
/// Accepts HMAC signatures (HS256/384/512) under the shared secret. `exp`
/// is enforced when the credential carries one.
pub struct IdentityTranslator {
    key: DecodingKey,
    validation: Validation,
    configured: bool,
}

impl IdentityTranslator {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        validation.required_spec_claims = HashSet::new();
        validation.validate_aud = false;
        validation.leeway = 2;

        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            configured: !secret.is_empty(),
        }
    }

    /// `None` when the signature, expiry or claim shape does not check out.
    pub fn translate(&self, credential: &str) -> Option<IdentityRecord> {
        match self.verify(credential) {
            Ok(identity) => {
                tracing::debug!("Credential verified for user {}", identity.name);
                Some(identity)
            }
            Err(e) => {
                tracing::warn!("JWT validation failed: {}", e);
                None
            }
        }
    }

    fn verify(&self, credential: &str) -> Result<IdentityRecord, TranslateError> {
        if !self.configured {
            return Err(TranslateError::MissingSecret);
        }
        let credential = credential.trim();
        if credential.is_empty() {
            return Err(TranslateError::EmptyCredential);
        }

        let data = jsonwebtoken::decode::<FileMakerClaims>(credential, &self.key, &self.validation)?;
        Ok(data.claims.into())
    }
}
