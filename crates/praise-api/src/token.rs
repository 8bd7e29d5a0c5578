use chrono::{Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token signature or encoding is invalid")]
    InvalidToken,

    #[error("token has expired")]
    Expired,

    #[error("token carries no subject")]
    Malformed,

    #[error("failed to sign token: {0}")]
    Encode(#[source] jsonwebtoken::errors::Error),
}

/// JWT claims. `sub` is optional on the wire so that a token without it is
/// reported as `Malformed` rather than as a generic decoding failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    pub iat: i64,
    pub exp: i64,
}

/// Issues and verifies shared-secret signed bearer tokens.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    algorithm: Algorithm,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, algorithm: Algorithm, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            algorithm,
            ttl,
        }
    }

    pub fn issue(&self, subject: &str) -> Result<String, TokenError> {
        self.issue_with_ttl(subject, self.ttl)
    }

    pub fn issue_with_ttl(&self, subject: &str, ttl: Duration) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = Claims {
            sub: Some(subject.to_string()),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };

        encode(&Header::new(self.algorithm), &claims, &self.encoding).map_err(TokenError::Encode)
    }

    /// Returns the subject id carried by a valid, unexpired token.
    pub fn verify(&self, token: &str) -> Result<String, TokenError> {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::InvalidToken,
            }
        })?;

        data.claims
            .sub
            .filter(|s| !s.is_empty())
            .ok_or(TokenError::Malformed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(secret: &str) -> TokenService {
        TokenService::new(secret, Algorithm::HS256, Duration::minutes(30))
    }

    #[test]
    fn issue_then_verify_returns_subject() {
        let tokens = service("secret");
        let token = tokens.issue("teacher-1").unwrap();
        assert_eq!(tokens.verify(&token).unwrap(), "teacher-1");
    }

    #[test]
    fn expired_token_is_rejected() {
        let tokens = service("secret");
        let token = tokens.issue_with_ttl("teacher-1", Duration::minutes(-5)).unwrap();
        assert!(matches!(tokens.verify(&token), Err(TokenError::Expired)));
    }

    #[test]
    fn foreign_signature_is_invalid() {
        let token = service("other-secret").issue("teacher-1").unwrap();
        assert!(matches!(service("secret").verify(&token), Err(TokenError::InvalidToken)));
        assert!(matches!(service("secret").verify("garbage"), Err(TokenError::InvalidToken)));
    }

    #[test]
    fn algorithm_mismatch_is_invalid() {
        let strong = TokenService::new("secret", Algorithm::HS512, Duration::minutes(30));
        let token = strong.issue("teacher-1").unwrap();
        assert!(matches!(service("secret").verify(&token), Err(TokenError::InvalidToken)));
    }

    #[test]
    fn missing_subject_is_malformed() {
        let now = Utc::now().timestamp();
        let claims = Claims { sub: None, iat: now, exp: now + 600 };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"secret"),
        )
        .unwrap();
        assert!(matches!(service("secret").verify(&token), Err(TokenError::Malformed)));
    }
}
