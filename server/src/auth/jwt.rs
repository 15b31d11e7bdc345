//! Bearer token issuance and verification.
//!
//! Admin tokens are HS256 JSON Web Tokens carrying the username in `sub`,
//! plus `iat` and `exp` in seconds. A token is valid for
//! [`TOKEN_LIFETIME_SECS`] after issuance and is never revoked early.
//!
//! # Pre-conditions
//! - The signing secret must be non-empty.
//!
//! # Post-conditions
//! - `verify` accepts a token issued by the same authority strictly before
//!   its `exp`, and rejects it at or after `exp`.
//!
//! # Invariants
//! - Verification is stateless. Only the signature, `sub` and `exp` are
//!   checked.
//! - Expiry is judged against the authority's `TimeSource`, not the
//!   library's own clock.

use std::sync::Arc;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::time::TimeSource;

/// How long an issued token stays valid.
pub const TOKEN_LIFETIME_SECS: u64 = 60 * 60;

/// Claims carried by an admin token.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// Subject claim containing the admin username.
    sub: String,
    /// Issued-at, seconds since Unix epoch.
    iat: u64,
    /// Expiry, seconds since Unix epoch.
    exp: u64,
}

/// The verified identity attached to a request by the access guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminIdentity {
    pub username: String,
}

/// Error returned when issuing or verifying a token fails.
#[derive(Debug)]
pub enum TokenError {
    /// The JWT signature is invalid.
    InvalidSignature,
    /// The JWT has expired.
    TokenExpired,
    /// The JWT is malformed or cannot be parsed.
    MalformedToken,
    /// The 'sub' claim is missing from the JWT.
    MissingSubClaim,
    /// The signing key could not be created from the provided configuration.
    InvalidKey(String),
    /// Encoding a new token failed.
    Signing(String),
}

impl std::fmt::Display for TokenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidSignature => write!(f, "invalid JWT signature"),
            Self::TokenExpired => write!(f, "JWT has expired"),
            Self::MalformedToken => write!(f, "malformed JWT"),
            Self::MissingSubClaim => write!(f, "missing 'sub' claim in JWT"),
            Self::InvalidKey(reason) => write!(f, "invalid key: {reason}"),
            Self::Signing(reason) => write!(f, "failed to sign JWT: {reason}"),
        }
    }
}

impl std::error::Error for TokenError {}

/// Issues and verifies admin tokens with a process-wide secret.
pub struct TokenAuthority {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    clock: Arc<dyn TimeSource>,
}

impl TokenAuthority {
    /// Create an authority signing with `secret`.
    ///
    /// # Errors
    /// Returns `TokenError::InvalidKey` if the secret is empty.
    pub fn new(secret: &[u8], clock: Arc<dyn TimeSource>) -> Result<Self, TokenError> {
        if secret.is_empty() {
            return Err(TokenError::InvalidKey("secret must be non-empty".to_string()));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against `clock` in `verify`.
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            clock,
        })
    }

    /// Issue a token for `username`, valid for one hour from now.
    ///
    /// # Errors
    /// Returns `TokenError::Signing` if encoding fails.
    pub fn issue(&self, username: &str) -> Result<String, TokenError> {
        let iat = self.clock.now_secs();
        let claims = Claims {
            sub: username.to_string(),
            iat,
            exp: iat + TOKEN_LIFETIME_SECS,
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Verify a token and extract the admin identity.
    ///
    /// # Errors
    /// Returns `TokenError` if the signature, structure, subject or expiry
    /// is invalid.
    pub fn verify(&self, token: &str) -> Result<AdminIdentity, TokenError> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(map_jwt_error)?;
        let claims = token_data.claims;

        if claims.sub.is_empty() {
            return Err(TokenError::MissingSubClaim);
        }
        if self.clock.now_secs() >= claims.exp {
            return Err(TokenError::TokenExpired);
        }

        Ok(AdminIdentity {
            username: claims.sub,
        })
    }
}

/// Maps jsonwebtoken errors to our `TokenError` type.
fn map_jwt_error(error: jsonwebtoken::errors::Error) -> TokenError {
    use jsonwebtoken::errors::ErrorKind;

    match error.kind() {
        ErrorKind::InvalidSignature => TokenError::InvalidSignature,
        ErrorKind::ExpiredSignature => TokenError::TokenExpired,
        ErrorKind::MissingRequiredClaim(claim) if claim == "sub" => TokenError::MissingSubClaim,
        _ => TokenError::MalformedToken,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::ManualTimeSource;

    const SECRET: &[u8] = b"test-secret-key-that-is-long-enough";
    const START_MS: u64 = 1_700_000_000_000;

    fn authority() -> (TokenAuthority, Arc<ManualTimeSource>) {
        let clock = Arc::new(ManualTimeSource::new(START_MS));
        let authority = TokenAuthority::new(SECRET, clock.clone()).unwrap();
        (authority, clock)
    }

    fn sign_raw<T: Serialize>(claims: &T, secret: &[u8]) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret),
        )
        .unwrap()
    }

    #[test]
    fn test_issue_then_verify() {
        let (authority, _) = authority();
        let token = authority.issue("admin").unwrap();

        let identity = authority.verify(&token).unwrap();
        assert_eq!(identity.username, "admin");
    }

    #[test]
    fn test_token_valid_until_just_before_expiry() {
        let (authority, clock) = authority();
        let token = authority.issue("admin").unwrap();

        clock.advance_ms((TOKEN_LIFETIME_SECS - 1) * 1000);
        assert!(authority.verify(&token).is_ok());

        clock.advance_ms(999);
        assert!(authority.verify(&token).is_ok());
    }

    #[test]
    fn test_token_rejected_at_expiry() {
        let (authority, clock) = authority();
        let token = authority.issue("admin").unwrap();

        clock.advance_ms(TOKEN_LIFETIME_SECS * 1000);
        assert!(matches!(
            authority.verify(&token),
            Err(TokenError::TokenExpired)
        ));

        clock.advance_ms(24 * 60 * 60 * 1000);
        assert!(matches!(
            authority.verify(&token),
            Err(TokenError::TokenExpired)
        ));
    }

    #[test]
    fn test_verify_rejects_other_secret() {
        let (authority, clock) = authority();
        let other = TokenAuthority::new(b"wrong-secret-key-that-is-different", clock).unwrap();
        let token = other.issue("admin").unwrap();

        assert!(matches!(
            authority.verify(&token),
            Err(TokenError::InvalidSignature)
        ));
    }

    #[test]
    fn test_verify_malformed_token() {
        let (authority, _) = authority();
        assert!(matches!(
            authority.verify("not-a-valid-jwt"),
            Err(TokenError::MalformedToken)
        ));
        assert!(matches!(
            authority.verify(""),
            Err(TokenError::MalformedToken)
        ));
    }

    #[test]
    fn test_verify_rejects_empty_sub() {
        let (authority, _) = authority();
        let token = sign_raw(
            &Claims {
                sub: String::new(),
                iat: START_MS / 1000,
                exp: START_MS / 1000 + 60,
            },
            SECRET,
        );
        assert!(matches!(
            authority.verify(&token),
            Err(TokenError::MissingSubClaim)
        ));
    }

    #[test]
    fn test_verify_rejects_missing_exp() {
        #[derive(Serialize)]
        struct NoExpiry {
            sub: String,
        }

        let (authority, _) = authority();
        let token = sign_raw(
            &NoExpiry {
                sub: "admin".to_string(),
            },
            SECRET,
        );
        assert!(matches!(
            authority.verify(&token),
            Err(TokenError::MalformedToken)
        ));
    }

    #[test]
    fn test_new_rejects_empty_secret() {
        let clock = Arc::new(ManualTimeSource::new(0));
        match TokenAuthority::new(b"", clock) {
            Err(TokenError::InvalidKey(message)) => {
                assert_eq!(message, "secret must be non-empty");
            }
            _ => panic!("expected InvalidKey error"),
        }
    }

    #[test]
    fn test_token_error_display() {
        assert_eq!(
            TokenError::InvalidSignature.to_string(),
            "invalid JWT signature"
        );
        assert_eq!(TokenError::TokenExpired.to_string(), "JWT has expired");
        assert_eq!(TokenError::MalformedToken.to_string(), "malformed JWT");
        assert_eq!(
            TokenError::MissingSubClaim.to_string(),
            "missing 'sub' claim in JWT"
        );
        assert_eq!(
            TokenError::InvalidKey("bad key".to_string()).to_string(),
            "invalid key: bad key"
        );
    }
}
