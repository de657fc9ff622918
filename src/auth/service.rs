use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::password::{hash_password, verify_password};
use crate::db::models::User;
use crate::db::repository::UserRepo;
use crate::error::{AppError, AuthError, DatabaseError};
use crate::Result;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,  // User ID
    pub exp: i64,     // Expiration time
    pub iat: i64,     // Issued at
}

/// Fields accepted when a new account is registered.
#[derive(Debug, Clone, Deserialize)]
pub struct Registration {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub is_store_owner: bool,
    #[serde(default)]
    pub is_vaccinated: bool,
}

pub struct AuthService {
    users: Arc<dyn UserRepo>,
    jwt_secret: String,
    token_expiry_hours: i64,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepo>, jwt_secret: String, token_expiry_hours: i64) -> Self {
        Self {
            users,
            jwt_secret,
            token_expiry_hours,
        }
    }

    pub async fn register(&self, registration: Registration) -> Result<User> {
        let username = registration.username.trim();
        if username.is_empty() {
            return Err(AppError::ValidationError("username must not be empty".into()));
        }
        if registration.password.is_empty() {
            return Err(AppError::ValidationError("password must not be empty".into()));
        }

        let user = User::new(
            username.to_string(),
            hash_password(&registration.password)?,
            registration.is_store_owner,
            registration.is_vaccinated,
        );

        match self.users.insert_user(&user).await {
            Ok(user) => {
                info!(user_id = %user.id, "Registered user {}", user.username);
                Ok(user)
            }
            Err(AppError::DatabaseError(DatabaseError::Duplicate)) => {
                Err(AppError::Conflict(format!("username {} is taken", username)))
            }
            Err(e) => Err(e),
        }
    }

    /// Checks a username/password pair and returns a fresh bearer token.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<String> {
        let user = self
            .users
            .find_user_by_username(username)
            .await?
            .filter(|user| verify_password(password, &user.password_hash))
            .ok_or_else(|| {
                warn!("Failed login for {}", username);
                AuthError::InvalidCredentials
            })?;

        self.issue_token(&user)
    }

    pub fn issue_token(&self, user: &User) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.to_string(),
            exp: (now + Duration::hours(self.token_expiry_hours)).timestamp(),
            iat: now.timestamp(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )?;

        Ok(token)
    }

    pub async fn validate_token(&self, token: &str) -> Result<User> {
        let claims = self.decode_token(token)?;
        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidToken)?;

        let user = self
            .users
            .find_user(user_id)
            .await?
            .ok_or(AuthError::InvalidToken)?;

        Ok(user)
    }

    fn decode_token(&self, token: &str) -> Result<Claims> {
        let claims = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )?;

        Ok(claims.claims)
    }
}
