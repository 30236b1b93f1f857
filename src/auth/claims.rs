//! Bearer-token claim decoding.
//!
//! Tokens are issued by the backend after the identity-provider exchange and
//! are opaque to everything except this module: a three-segment JWT whose
//! middle segment is URL-safe base64 over a JSON claim set.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde::Deserialize;
use thiserror::Error;

/// Identity claims embedded in a bearer token.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TokenClaims {
    /// Subject: the backend's user id.
    pub sub: String,
    pub email: String,
    #[serde(default)]
    pub given_name: String,
    /// Expiry as epoch seconds.
    pub exp: u64,
}

impl TokenClaims {
    /// Expiry check, deliberately separate from [`decode`]: a stale token is
    /// not a malformed one, and callers recover differently from each.
    pub fn is_expired(&self, now_secs: u64) -> bool {
        self.exp <= now_secs
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    #[error("token is not a three-segment bearer token")]
    Malformed,
    #[error("token payload is not valid base64: {0}")]
    Payload(String),
    #[error("token claims are not valid JSON: {0}")]
    Claims(String),
}

/// Decode the claim set out of a raw bearer token.
///
/// Never fails for expiry; see [`TokenClaims::is_expired`].
pub fn decode(token: &str) -> Result<TokenClaims, DecodeError> {
    let mut segments = token.split('.');
    let payload = match (segments.next(), segments.next(), segments.next(), segments.next()) {
        (Some(_header), Some(payload), Some(_signature), None) => payload,
        _ => return Err(DecodeError::Malformed),
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|err| DecodeError::Payload(err.to_string()))?;

    serde_json::from_slice(&bytes).map_err(|err| DecodeError::Claims(err.to_string()))
}

/// Current time as epoch seconds, from the host clock.
#[cfg(target_arch = "wasm32")]
pub fn now_epoch_secs() -> u64 {
    (js_sys::Date::now() / 1000.0) as u64
}

#[cfg(not(target_arch = "wasm32"))]
pub fn now_epoch_secs() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_token(sub: &str, email: &str, given_name: &str, exp: u64) -> String {
        let payload = serde_json::json!({
            "sub": sub,
            "email": email,
            "given_name": given_name,
            "exp": exp,
        });
        let encoded = URL_SAFE_NO_PAD.encode(payload.to_string());
        format!("header.{encoded}.signature")
    }

    #[test]
    fn test_decode_valid_token() {
        let token = make_token("user-1", "ada@example.com", "Ada", 4_102_444_800);
        let claims = decode(&token).unwrap();
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.email, "ada@example.com");
        assert_eq!(claims.given_name, "Ada");
        assert_eq!(claims.exp, 4_102_444_800);
    }

    #[test]
    fn test_decode_defaults_missing_given_name() {
        let payload = serde_json::json!({
            "sub": "user-2",
            "email": "no-name@example.com",
            "exp": 4_102_444_800u64,
        });
        let token = format!("h.{}.s", URL_SAFE_NO_PAD.encode(payload.to_string()));
        let claims = decode(&token).unwrap();
        assert_eq!(claims.given_name, "");
    }

    #[test]
    fn test_decode_rejects_wrong_segment_count() {
        assert_eq!(decode("only-one-segment"), Err(DecodeError::Malformed));
        assert_eq!(decode("two.segments"), Err(DecodeError::Malformed));
        assert!(matches!(decode("a.b.c.d"), Err(DecodeError::Malformed)));
    }

    #[test]
    fn test_decode_rejects_bad_base64() {
        assert!(matches!(
            decode("header.@@not-base64@@.signature"),
            Err(DecodeError::Payload(_))
        ));
    }

    #[test]
    fn test_decode_rejects_non_json_payload() {
        let payload = URL_SAFE_NO_PAD.encode("not json at all");
        let token = format!("h.{payload}.s");
        assert!(matches!(decode(&token), Err(DecodeError::Claims(_))));
    }

    #[test]
    fn test_expiry_boundary_is_expired() {
        let claims = decode(&make_token("u", "u@example.com", "U", 1_000)).unwrap();
        assert!(claims.is_expired(1_000));
        assert!(claims.is_expired(1_001));
        assert!(!claims.is_expired(999));
    }
}
