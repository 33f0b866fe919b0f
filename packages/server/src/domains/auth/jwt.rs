use anyhow::Result;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const TOKEN_LIFETIME_HOURS: i64 = 24;

/// Session token claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub member_id: Uuid,
    pub github_username: String,
    pub is_organiser: bool,
    pub exp: i64,
    pub iat: i64,
    pub iss: String,
    pub jti: String,
}

/// Creates and verifies HS256 session tokens
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
}

impl JwtService {
    pub fn new(secret: &str, issuer: String) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            issuer,
        }
    }

    /// Token valid for 24 hours
    pub fn create_token(
        &self,
        member_id: Uuid,
        github_username: String,
        is_organiser: bool,
    ) -> Result<String> {
        let now = chrono::Utc::now();
        let exp = now + chrono::Duration::hours(TOKEN_LIFETIME_HOURS);

        let claims = Claims {
            sub: member_id.to_string(),
            member_id,
            github_username,
            is_organiser,
            exp: exp.timestamp(),
            iat: now.timestamp(),
            iss: self.issuer.clone(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(Into::into)
    }

    /// Verify signature, issuer and expiry
    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.issuer]);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_verifies() {
        let service = JwtService::new("test_secret_key", "test_issuer".to_string());
        let member_id = Uuid::new_v4();

        let token = service
            .create_token(member_id, "octocat".to_string(), true)
            .unwrap();

        let claims = service.verify_token(&token).unwrap();
        assert_eq!(claims.member_id, member_id);
        assert_eq!(claims.sub, member_id.to_string());
        assert_eq!(claims.github_username, "octocat");
        assert!(claims.is_organiser);
        assert_eq!(claims.iss, "test_issuer");
    }

    #[test]
    fn garbage_token_is_rejected() {
        let service = JwtService::new("test_secret_key", "test_issuer".to_string());
        assert!(service.verify_token("invalid_token").is_err());
    }

    #[test]
    fn token_from_other_secret_is_rejected() {
        let ours = JwtService::new("secret1", "test_issuer".to_string());
        let theirs = JwtService::new("secret2", "test_issuer".to_string());

        let token = theirs
            .create_token(Uuid::new_v4(), "octocat".to_string(), false)
            .unwrap();

        assert!(ours.verify_token(&token).is_err());
    }

    #[test]
    fn token_from_other_issuer_is_rejected() {
        let ours = JwtService::new("secret", "blitz".to_string());
        let theirs = JwtService::new("secret", "someone-else".to_string());

        let token = theirs
            .create_token(Uuid::new_v4(), "octocat".to_string(), false)
            .unwrap();

        assert!(ours.verify_token(&token).is_err());
    }

    #[test]
    fn token_expires_after_a_day() {
        let service = JwtService::new("test_secret_key", "test_issuer".to_string());
        let token = service
            .create_token(Uuid::new_v4(), "octocat".to_string(), false)
            .unwrap();

        let claims = service.verify_token(&token).unwrap();
        let expires_in = claims.exp - chrono::Utc::now().timestamp();
        assert!(expires_in > 23 * 3600);
        assert!(expires_in <= 24 * 3600);
    }
}
