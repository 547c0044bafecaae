use crate::models::{Claims, TokenType};
use jsonwebtoken::{DecodingKey, Validation, decode};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session token is malformed: {0}")]
    Malformed(#[from] jsonwebtoken::errors::Error),
    #[error("session token is a refresh token")]
    NotAnAccessToken,
}

/// Authenticated user as seen by the dashboard.
///
/// The token was issued by the backend at login; the dashboard only reads its
/// claims and forwards it as a bearer credential. Signature checks happen on
/// the backend, which holds the secret.
#[derive(Clone)]
pub struct AuthSession {
    pub user_id: u64,
    pub username: String,

    /// Present only if this user is linked to an employee record
    pub employee_id: Option<u64>,
    token: String,
}

impl AuthSession {
    pub fn from_token(token: &str) -> Result<Self, SessionError> {
        let token = token.trim();

        let mut validation = Validation::default();
        validation.insecure_disable_signature_validation();
        // expiry is enforced by the backend on every call
        validation.validate_exp = false;

        let claims = decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)?.claims;
        if claims.token_type != TokenType::Access {
            return Err(SessionError::NotAnAccessToken);
        }

        Ok(Self {
            user_id: claims.user_id,
            username: claims.sub,
            employee_id: claims.employee_id,
            token: token.to_string(),
        })
    }

    /// Value for the `Authorization` header
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

impl std::fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSession")
            .field("user_id", &self.user_id)
            .field("username", &self.username)
            .field("employee_id", &self.employee_id)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header, encode};

    pub(crate) fn mint(token_type: TokenType, employee_id: Option<u64>) -> String {
        let claims = Claims {
            user_id: 3,
            sub: "jdoe".into(),
            role: 3,
            exp: 4_102_444_800, // 2100-01-01
            jti: "test-jti".into(),
            token_type,
            employee_id,
        };
        encode(&Header::default(), &claims, &EncodingKey::from_secret(b"backend-secret")).unwrap()
    }

    #[test]
    fn reads_claims_without_the_secret() {
        let token = mint(TokenType::Access, Some(1001));
        let session = AuthSession::from_token(&token).unwrap();

        assert_eq!(session.username, "jdoe");
        assert_eq!(session.employee_id, Some(1001));
        assert_eq!(session.bearer(), format!("Bearer {token}"));
    }

    #[test]
    fn refresh_tokens_are_rejected() {
        let token = mint(TokenType::Refresh, Some(1001));
        assert!(matches!(
            AuthSession::from_token(&token),
            Err(SessionError::NotAnAccessToken)
        ));
    }

    #[test]
    fn garbage_is_malformed() {
        assert!(matches!(
            AuthSession::from_token("not-a-jwt"),
            Err(SessionError::Malformed(_))
        ));
    }

    #[test]
    fn debug_hides_the_token() {
        let token = mint(TokenType::Access, None);
        let session = AuthSession::from_token(&token).unwrap();
        assert!(!format!("{session:?}").contains(&token));
    }
}
