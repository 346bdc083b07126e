use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use rust_decimal::Decimal;
use sea_orm::DbErr;
use thiserror::Error;

/// Erreurs de l'application.
///
/// Chaque variante correspond à un message d'excuse renvoyé à l'utilisateur
/// (`{"error": "..."}`). Les erreurs internes ne laissent rien fuiter et sont
/// journalisées.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("No such symbol.")]
    UnknownSymbol(String),

    #[error("Quote lookup failed.")]
    QuoteUnavailable(String),

    #[error("Balance too low.")]
    InsufficientFunds { available: Decimal, required: Decimal },

    #[error("Not enough shares.")]
    InsufficientShares { held: i64, requested: i64 },

    #[error("Username already exists!")]
    UsernameTaken,

    #[error("{0}")]
    Credentials(&'static str),

    #[error("Account not found.")]
    AccountNotFound(i32),

    #[error("Session error: {0}")]
    Session(String),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl AppError {
    fn is_internal(&self) -> bool {
        matches!(
            self,
            AppError::AccountNotFound(_)
                | AppError::Session(_)
                | AppError::PasswordHash(_)
                | AppError::Database(_)
        )
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Credentials(_) => StatusCode::FORBIDDEN,
            AppError::UsernameTaken => StatusCode::CONFLICT,
            e if e.is_internal() => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = if self.is_internal() {
            tracing::error!(error = %self, "request failed");
            "Oops something went wrong. Please contact support.".to_string()
        } else {
            self.to_string()
        };

        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": message
        }))
    }
}
