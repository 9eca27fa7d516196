//! Caller identity checks.
//!
//! Messaging endpoints receive the caller as `user_id`/`user_type` (or
//! `sender_id`/`sender_type`). Handlers pass that claim to a
//! [`SessionVerifier`] before touching any data.

use crate::error::{AppError, AppResult};
use crate::models::{ParticipantRef, ParticipantType};
use async_trait::async_trait;
use axum::http::{header, HeaderMap};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

#[async_trait]
pub trait SessionVerifier: Send + Sync {
    /// Ok when the request may act as `claimed`.
    async fn verify(&self, headers: &HeaderMap, claimed: ParticipantRef) -> AppResult<()>;
}

/// Accepts whatever identity the request names.
#[derive(Debug, Default, Clone, Copy)]
pub struct TrustClaimedIdentity;

#[async_trait]
impl SessionVerifier for TrustClaimedIdentity {
    async fn verify(&self, _headers: &HeaderMap, _claimed: ParticipantRef) -> AppResult<()> {
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SessionClaims {
    /// Participant id
    pub sub: String,
    pub participant_type: ParticipantType,
    pub iat: i64,
    pub exp: i64,
}

/// HS256 bearer tokens whose subject must match the claimed participant.
pub struct JwtSessionVerifier {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl JwtSessionVerifier {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Sign a token for `who`, valid for `ttl`.
    pub fn issue(&self, who: ParticipantRef, ttl: Duration) -> AppResult<String> {
        let now = Utc::now();
        let claims = SessionClaims {
            sub: who.id.to_string(),
            participant_type: who.kind,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding).map_err(|e| {
            tracing::error!(error = %e, "failed to sign session token");
            AppError::Internal
        })
    }

    fn decode(&self, token: &str) -> AppResult<SessionClaims> {
        decode::<SessionClaims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(error = %e, "session token rejected");
                AppError::Unauthorized
            })
    }
}

fn bearer_token(headers: &HeaderMap) -> AppResult<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AppError::Unauthorized)
}

#[async_trait]
impl SessionVerifier for JwtSessionVerifier {
    async fn verify(&self, headers: &HeaderMap, claimed: ParticipantRef) -> AppResult<()> {
        let claims = self.decode(bearer_token(headers)?)?;
        let holder = ParticipantRef::parse(&claims.sub, claims.participant_type.as_str())
            .map_err(|_| AppError::Unauthorized)?;

        if holder != claimed {
            tracing::warn!(holder = %holder, claimed = %claimed, "session does not match claimed participant");
            return Err(AppError::Forbidden(
                "Session does not match the requested participant".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use uuid::Uuid;

    fn with_token(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
        );
        headers
    }

    #[tokio::test]
    async fn trust_accepts_anything() {
        let who = ParticipantRef::player(Uuid::new_v4());
        assert!(TrustClaimedIdentity.verify(&HeaderMap::new(), who).await.is_ok());
    }

    #[tokio::test]
    async fn jwt_accepts_matching_subject() {
        let verifier = JwtSessionVerifier::new("test-secret");
        let who = ParticipantRef::club(Uuid::new_v4());
        let token = verifier.issue(who, Duration::minutes(5)).unwrap();
        assert!(verifier.verify(&with_token(&token), who).await.is_ok());
    }

    #[tokio::test]
    async fn jwt_rejects_missing_foreign_and_expired_tokens() {
        let verifier = JwtSessionVerifier::new("test-secret");
        let who = ParticipantRef::player(Uuid::new_v4());

        assert!(matches!(
            verifier.verify(&HeaderMap::new(), who).await,
            Err(AppError::Unauthorized)
        ));

        // Same id under the other participant type is a different participant.
        let club_token = verifier
            .issue(ParticipantRef::club(who.id), Duration::minutes(5))
            .unwrap();
        assert!(matches!(
            verifier.verify(&with_token(&club_token), who).await,
            Err(AppError::Forbidden(_))
        ));

        let expired = verifier.issue(who, Duration::minutes(-10)).unwrap();
        assert!(matches!(
            verifier.verify(&with_token(&expired), who).await,
            Err(AppError::Unauthorized)
        ));

        let other_key = JwtSessionVerifier::new("other-secret")
            .issue(who, Duration::minutes(5))
            .unwrap();
        assert!(matches!(
            verifier.verify(&with_token(&other_key), who).await,
            Err(AppError::Unauthorized)
        ));
    }
}
