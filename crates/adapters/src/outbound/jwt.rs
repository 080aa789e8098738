//! Token codec backed by `jsonwebtoken`.

use application::error::{ApplicationError, Result};
use application::ports::outbound::{ClaimMap, TokenCodec};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
};

/// JWT codec signing with HS256 or ES256.
pub struct JwtCodec {
    algorithm: Algorithm,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtCodec {
    /// HMAC-SHA256 codec from a shared secret.
    pub fn hs256(secret: &[u8]) -> Self {
        Self {
            algorithm: Algorithm::HS256,
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
        }
    }

    /// ECDSA P-256 codec from PEM-encoded keys.
    pub fn es256(public_key_pem: &str, private_key_pem: &str) -> Result<Self> {
        let encoding_key = EncodingKey::from_ec_pem(private_key_pem.as_bytes())
            .map_err(|err| {
                ApplicationError::configuration(format!(
                    "invalid EC private key: {err}"
                ))
            })?;
        let decoding_key = DecodingKey::from_ec_pem(public_key_pem.as_bytes())
            .map_err(|err| {
                ApplicationError::configuration(format!(
                    "invalid EC public key: {err}"
                ))
            })?;

        Ok(Self {
            algorithm: Algorithm::ES256,
            encoding_key,
            decoding_key,
        })
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(self.algorithm);
        // Temporal rules belong to the payload validator; the refresh
        // flow must be able to decode an expired token.
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();
        validation
    }
}

impl TokenCodec for JwtCodec {
    fn encode(&self, claims: &ClaimMap) -> Result<String> {
        encode(&Header::new(self.algorithm), claims, &self.encoding_key)
            .map_err(ApplicationError::encode)
    }

    fn decode(&self, token: &str) -> Result<ClaimMap> {
        let data = decode::<ClaimMap>(token, &self.decoding_key, &self.validation())
            .map_err(ApplicationError::token_invalid)?;

        Ok(data.claims)
    }
}
