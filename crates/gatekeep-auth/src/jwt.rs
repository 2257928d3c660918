//! Token signing and verification.
//!
//! Tokens are compact JWS strings (`header.payload.signature`, each segment
//! base64url without padding) signed with HMAC-SHA256 under a process-wide
//! secret.
//!
//! # Example
//!
//! ```ignore
//! use gatekeep_auth::{Claims, Role, TokenCodec};
//!
//! let codec = TokenCodec::new(b"a-long-random-secret");
//! let token = codec.encode(&Claims::new(7, Role::User, exp))?;
//! let claims = codec.decode(&token)?;
//! assert_eq!(claims.sub, 7);
//! ```

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use thiserror::Error;

use gatekeep_config::JwtConfig;

use crate::claims::Claims;

/// Algorithms a presented token may declare. Anything outside the HMAC
/// family is refused before the signature is looked at.
const ACCEPTED_ALGORITHMS: [Algorithm; 3] = [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("malformed token")]
    Malformed,

    #[error("token signature does not match")]
    InvalidSignature,

    #[error("token declares an unsupported signing algorithm")]
    UnsupportedAlgorithm,

    #[error("token expiry is out of range")]
    ExpiryOutOfRange,

    #[error("failed to encode token")]
    Encoding(#[source] jsonwebtoken::errors::Error),
}

#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    header: Header,
    validation: Validation,
}

impl TokenCodec {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = ACCEPTED_ALGORITHMS.to_vec();
        // Expiry is compared by the caller against its own clock.
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            header: Header::new(Algorithm::HS256),
            validation,
        }
    }

    pub fn from_config(config: &JwtConfig) -> Self {
        Self::new(config.secret.as_bytes())
    }

    pub fn encode(&self, claims: &Claims) -> Result<String, TokenError> {
        encode(&self.header, claims, &self.encoding_key).map_err(TokenError::Encoding)
    }

    /// Verifies the signature and returns the embedded claims.
    ///
    /// Expiry is not checked here.
    pub fn decode(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                ErrorKind::InvalidAlgorithm
                | ErrorKind::InvalidAlgorithmName
                | ErrorKind::MissingAlgorithm => TokenError::UnsupportedAlgorithm,
                _ => TokenError::Malformed,
            })
    }
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("algorithm", &self.header.alg)
            .finish_non_exhaustive()
    }
}
