use jsonwebtoken::{encode, decode, Header, Validation, EncodingKey, DecodingKey, Algorithm};
use serde::{Deserialize, Serialize};
use chrono::{Utc, Duration};

use crate::config::Settings;
use crate::error::AppError;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i32,        // user_id
    pub username: String,
    pub exp: i64,        // expiration timestamp
}

/// Clés de signature des jetons de session, injectées via `web::Data`
#[derive(Clone)]
pub struct SessionKeys {
    secret: String,
    ttl: Duration,
}

impl SessionKeys {
    pub fn new(secret: impl Into<String>, ttl_hours: i64) -> Self {
        Self {
            secret: secret.into(),
            ttl: Duration::hours(ttl_hours),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.session_secret.clone(), settings.session_ttl_hours)
    }

    /// Génère le jeton de session d'un utilisateur
    pub fn issue(&self, user_id: i32, username: &str) -> Result<String, AppError> {
        let expiration = Utc::now()
            .checked_add_signed(self.ttl)
            .ok_or_else(|| AppError::Session("failed to calculate expiration".to_string()))?
            .timestamp();

        let claims = Claims {
            sub: user_id,
            username: username.to_string(),
            exp: expiration,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_ref()),
        )
            .map_err(|e| AppError::Session(format!("failed to generate token: {}", e)))
    }

    /// Vérifie et décode un jeton de session
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_ref()),
            &Validation::new(Algorithm::HS256),
        )
            .map(|data| data.claims)
            .map_err(|e| AppError::Session(format!("invalid token: {}", e)))
    }
}
