use chrono::{Duration, Utc};

use shared_models::auth::JwtClaims;

use crate::jwt::sign_token;

pub const TEST_JWT_SECRET: &str = "test-secret-key-for-jwt-validation-must-be-long-enough";

/// Token factories for tests. These go through the real signing path so the
/// verification code under test sees realistic inputs.
pub struct JwtTestUtils;

impl JwtTestUtils {
    pub fn token_for(subject_id: i64, secret: &str, exp_hours: i64) -> String {
        let now = Utc::now();
        let claims = JwtClaims {
            sub: subject_id.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(exp_hours)).timestamp(),
        };
        sign_token(&claims, secret).expect("signing test token")
    }

    pub fn valid_token(subject_id: i64, secret: &str) -> String {
        Self::token_for(subject_id, secret, 24)
    }

    pub fn expired_token(subject_id: i64, secret: &str) -> String {
        Self::token_for(subject_id, secret, -1)
    }

    pub fn wrong_secret_token(subject_id: i64) -> String {
        Self::token_for(subject_id, "wrong-secret", 24)
    }

    /// Subject claim that is not a numeric id.
    pub fn non_numeric_subject_token(secret: &str) -> String {
        let now = Utc::now();
        let claims = JwtClaims {
            sub: "not-a-number".to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(24)).timestamp(),
        };
        sign_token(&claims, secret).expect("signing test token")
    }

    pub fn malformed_token() -> String {
        "invalid.token.format".to_string()
    }
}
