use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use crate::{
    db::DbPool,
    dto::auth::Claims,
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::UserRole,
};

/// Claims for a fresh token. Every token gets its own `jti` so it can be revoked alone.
pub fn build_claims(user_id: Uuid, role: UserRole, ttl_hours: i64) -> AppResult<Claims> {
    let now = Utc::now();
    let expiration = now
        .checked_add_signed(Duration::hours(ttl_hours))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

    Ok(Claims {
        sub: user_id.to_string(),
        role,
        jti: Uuid::new_v4().to_string(),
        iat: now.timestamp() as usize,
        exp: expiration.timestamp() as usize,
    })
}

pub fn encode_token(secret: &str, claims: &Claims) -> AppResult<String> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
}

pub fn decode_token(secret: &str, token: &str) -> AppResult<Claims> {
    let decoded = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|err| {
        tracing::debug!(error = %err, "token rejected");
        AppError::Unauthorized
    })?;
    Ok(decoded.claims)
}

pub fn issue_token(secret: &str, ttl_hours: i64, user_id: Uuid, role: UserRole) -> AppResult<String> {
    let claims = build_claims(user_id, role, ttl_hours)?;
    encode_token(secret, &claims)
}

pub async fn is_revoked(pool: &DbPool, jti: &str) -> AppResult<bool> {
    let row: Option<(String,)> = sqlx::query_as("SELECT jti FROM revoked_tokens WHERE jti = $1")
        .bind(jti)
        .fetch_optional(pool)
        .await?;
    Ok(row.is_some())
}

/// Revoke the token the caller authenticated with. Other sessions of the same user stay valid.
pub async fn revoke(pool: &DbPool, user: &AuthUser) -> AppResult<()> {
    let expires_at = DateTime::<Utc>::from_timestamp(user.expires_at as i64, 0)
        .unwrap_or_else(Utc::now);

    sqlx::query(
        r#"
        INSERT INTO revoked_tokens (jti, user_id, expires_at)
        VALUES ($1, $2, $3)
        ON CONFLICT (jti) DO NOTHING
        "#,
    )
    .bind(&user.jti)
    .bind(user.user_id)
    .bind(expires_at)
    .execute(pool)
    .await?;

    // expired entries can never match a valid token again
    let purged = sqlx::query("DELETE FROM revoked_tokens WHERE expires_at < now()")
        .execute(pool)
        .await?;
    if purged.rows_affected() > 0 {
        tracing::debug!(purged = purged.rows_affected(), "purged expired revocations");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn token_round_trips_subject_and_role() {
        let user_id = Uuid::new_v4();
        let token = issue_token(SECRET, 1, user_id, UserRole::Restaurant).unwrap();
        let claims = decode_token(SECRET, &token).unwrap();
        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.role, UserRole::Restaurant);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn each_token_has_its_own_jti() {
        let user_id = Uuid::new_v4();
        let a = build_claims(user_id, UserRole::Customer, 1).unwrap();
        let b = build_claims(user_id, UserRole::Customer, 1).unwrap();
        assert_ne!(a.jti, b.jti);
    }

    #[test]
    fn wrong_secret_is_unauthorized() {
        let token = issue_token(SECRET, 1, Uuid::new_v4(), UserRole::Admin).unwrap();
        let err = decode_token("other-secret", &token).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized));
    }

    #[test]
    fn expired_token_is_unauthorized() {
        let mut claims = build_claims(Uuid::new_v4(), UserRole::Customer, 1).unwrap();
        let past = (Utc::now() - Duration::hours(2)).timestamp() as usize;
        claims.iat = past;
        claims.exp = past;
        let token = encode_token(SECRET, &claims).unwrap();
        assert!(matches!(
            decode_token(SECRET, &token),
            Err(AppError::Unauthorized)
        ));
    }
}
