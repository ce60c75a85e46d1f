use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::config::JwtSettings;
use crate::services::auth::principal::Principal;

/// Why a bearer token was rejected.
///
/// Only ever logged. Callers answer every variant with the same 401.
#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("jwt verification failed: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("missing or non-numeric '{0}' claim")]
    BadTimeClaim(&'static str),
    #[error("token expired")]
    Expired,
    #[error("token not yet valid")]
    NotYetValid,
}

/// HS256 bearer-token verifier.
///
/// Signature, `iss` and `aud` are checked by `jsonwebtoken`; the lifetime check
/// is done here against an explicit `now` so that expiry has zero tolerance:
/// a token is rejected from the exact second its `exp` is reached.
///
/// - Key material is not printed by Debug.
#[derive(Clone)]
pub struct CredentialVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for CredentialVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("CredentialVerifier")
            .field("validation", &self.validation)
            .finish()
    }
}

impl CredentialVerifier {
    pub fn new(settings: &JwtSettings) -> Self {
        let decoding_key = DecodingKey::from_secret(settings.key.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[settings.issuer.as_str()]);
        validation.set_audience(&[settings.audience.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss", "aud"]);
        validation.leeway = 0;
        // Lifetime is checked in `verify` (jsonwebtoken accepts `exp == now`).
        validation.validate_exp = false;
        validation.validate_nbf = false;

        Self {
            decoding_key,
            validation,
        }
    }

    /// Verify a token against the wall clock.
    pub fn verify_now(&self, token: &str) -> Result<Principal, VerifyError> {
        self.verify(token, chrono::Utc::now().timestamp())
    }

    /// Verify a token as of `now` (unix seconds).
    pub fn verify(&self, token: &str, now: i64) -> Result<Principal, VerifyError> {
        let data = jsonwebtoken::decode::<Map<String, Value>>(
            token,
            &self.decoding_key,
            &self.validation,
        )?;
        let claims = data.claims;

        let exp = numeric_date(&claims, "exp")?.ok_or(VerifyError::BadTimeClaim("exp"))?;
        if now >= exp {
            return Err(VerifyError::Expired);
        }

        if let Some(nbf) = numeric_date(&claims, "nbf")? {
            if now < nbf {
                return Err(VerifyError::NotYetValid);
            }
        }

        Ok(Principal::new(claims))
    }
}

// NumericDate may legally carry a fraction; whole seconds are enough here.
fn numeric_date(claims: &Map<String, Value>, name: &'static str) -> Result<Option<i64>, VerifyError> {
    match claims.get(name) {
        None => Ok(None),
        Some(v) => v
            .as_i64()
            .or_else(|| v.as_f64().map(|f| f.floor() as i64))
            .map(Some)
            .ok_or(VerifyError::BadTimeClaim(name)),
    }
}

#[cfg(test)]
mod tests {
    use jsonwebtoken::{EncodingKey, Header};
    use serde_json::json;

    use super::*;

    const KEY: &str = "test-signing-key-0123456789-abcdefghij";
    const NOW: i64 = 1_700_000_000;

    fn settings() -> JwtSettings {
        JwtSettings {
            key: KEY.to_string(),
            issuer: "shop-auth".to_string(),
            audience: "shop-app".to_string(),
        }
    }

    fn sign_with(key: &str, claims: Value) -> String {
        jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(key.as_bytes()),
        )
        .unwrap()
    }

    fn claims(exp: i64) -> Value {
        json!({
            "iss": "shop-auth",
            "aud": "shop-app",
            "sub": "7c0b8a52-3a5e-4a9f-9a55-6a3e3f3c2f10",
            "exp": exp,
            "IsBanned": "false",
        })
    }

    #[test]
    fn accepts_valid_token_and_keeps_claims() {
        let verifier = CredentialVerifier::new(&settings());
        let token = sign_with(KEY, claims(NOW + 600));

        let principal = verifier.verify(&token, NOW).unwrap();
        assert_eq!(principal.claim("IsBanned"), Some("false"));
        assert!(principal.user_id().is_some());
    }

    #[test]
    fn rejects_foreign_signing_key_regardless_of_claims() {
        let verifier = CredentialVerifier::new(&settings());
        for other in ["another-key", "test-signing-key-0123456789-abcdefghiJ"] {
            let token = sign_with(other, claims(NOW + 600));
            assert!(matches!(verifier.verify(&token, NOW), Err(VerifyError::Jwt(_))));
        }
    }

    #[test]
    fn issuer_and_audience_must_match_exactly() {
        let verifier = CredentialVerifier::new(&settings());

        for (field, value) in [
            ("iss", "shop-autH"),
            ("iss", "shop-auth "),
            ("iss", "https://shop-auth"),
            ("aud", "other-app"),
            ("aud", "shop-ap"),
            ("aud", "Shop-app"),
        ] {
            let mut c = claims(NOW + 600);
            c[field] = json!(value);
            let token = sign_with(KEY, c);
            assert!(
                verifier.verify(&token, NOW).is_err(),
                "{field}={value} should be rejected"
            );
        }
    }

    #[test]
    fn issuer_and_audience_are_required() {
        let verifier = CredentialVerifier::new(&settings());
        for field in ["iss", "aud"] {
            let mut c = claims(NOW + 600);
            c.as_object_mut().unwrap().remove(field);
            let token = sign_with(KEY, c);
            assert!(verifier.verify(&token, NOW).is_err());
        }
    }

    #[test]
    fn expiry_has_zero_skew() {
        let verifier = CredentialVerifier::new(&settings());
        let exp = NOW + 60;
        let token = sign_with(KEY, claims(exp));

        assert!(verifier.verify(&token, exp - 1).is_ok());
        assert!(matches!(verifier.verify(&token, exp), Err(VerifyError::Expired)));
        assert!(matches!(verifier.verify(&token, exp + 1), Err(VerifyError::Expired)));
    }

    #[test]
    fn token_without_exp_is_rejected() {
        let verifier = CredentialVerifier::new(&settings());
        let mut c = claims(0);
        c.as_object_mut().unwrap().remove("exp");
        let token = sign_with(KEY, c);

        assert!(verifier.verify(&token, NOW).is_err());
    }

    #[test]
    fn not_before_is_enforced_without_leeway() {
        let verifier = CredentialVerifier::new(&settings());
        let mut c = claims(NOW + 600);
        c["nbf"] = json!(NOW + 10);
        let token = sign_with(KEY, c);

        assert!(matches!(
            verifier.verify(&token, NOW + 9),
            Err(VerifyError::NotYetValid)
        ));
        assert!(verifier.verify(&token, NOW + 10).is_ok());
    }

    #[test]
    fn rejects_garbage_and_other_algorithms() {
        let verifier = CredentialVerifier::new(&settings());
        assert!(verifier.verify("not-a-jwt", NOW).is_err());
        assert!(verifier.verify("", NOW).is_err());

        let hs512 = jsonwebtoken::encode(
            &Header::new(Algorithm::HS512),
            &claims(NOW + 600),
            &EncodingKey::from_secret(KEY.as_bytes()),
        )
        .unwrap();
        assert!(verifier.verify(&hs512, NOW).is_err());
    }

    #[test]
    fn debug_does_not_leak_key() {
        let verifier = CredentialVerifier::new(&settings());
        assert!(!format!("{verifier:?}").contains(KEY));
    }
}
