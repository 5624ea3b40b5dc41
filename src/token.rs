// src/token.rs

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Validity window for an edit token.
const TOKEN_TTL_DAYS: i64 = 30;

/// Claims carried by an edit token. Nothing identifies a user: holding a
/// valid token is the capability.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub iat: usize,
    pub exp: usize,
}

/// Issue a signed edit token, returned together with its claims so the
/// caller can align the cookie expiry with `exp`. An empty secret disables
/// the codec entirely.
pub fn issue(secret: &str) -> Option<(String, Claims)> {
    if secret.is_empty() {
        return None;
    }
    let now = Utc::now();
    let claims = Claims {
        iat: now.timestamp() as usize,
        exp: (now + Duration::days(TOKEN_TTL_DAYS)).timestamp() as usize,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )
    .ok()?;
    Some((token, claims))
}

/// Verify a presented token. Any defect (bad signature, tampered or
/// malformed payload, past expiry, no secret configured) reads as "no
/// token".
pub fn verify(token: &str, secret: &str) -> Option<Claims> {
    if secret.is_empty() {
        return None;
    }
    let mut validation = Validation::default();
    // expiry is exact, no grace window
    validation.leeway = 0;
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &validation,
    )
    .ok()
    .map(|data| data.claims)
}
