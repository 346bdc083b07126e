// Formulaires reçus (x-www-form-urlencoded) et réponses JSON
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

// Les champs absents valent "" pour produire le même message d'excuse
// qu'un champ vide, plutôt qu'une erreur de décodage du formulaire

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterForm {
    #[serde(default)]
    #[validate(length(min = 4, message = "Username > 4 characters!"))]
    pub username: String,
    #[serde(default)]
    #[validate(length(min = 4, message = "Password > 4 characters!"))]
    pub password: String,
    #[serde(default)]
    #[validate(must_match(other = "password", message = "Password did not match!"))]
    pub confirmation: String,
}

impl RegisterForm {
    /// Ordre de priorité des messages quand plusieurs champs sont invalides
    pub const FIELDS: [&'static str; 3] = ["username", "password", "confirmation"];
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

// Formulaire commun à /buy et /sell; `shares` reste une chaîne pour
// distinguer "pas un entier" de "entier invalide"
#[derive(Debug, Deserialize)]
pub struct TradeForm {
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub shares: String,
}

#[derive(Debug, Deserialize)]
pub struct QuoteForm {
    #[serde(default)]
    pub symbol: String,
}

#[derive(Debug, Deserialize)]
pub struct TopUpForm {
    #[serde(default)]
    pub balance: String,
}

/// Position agrégée sur un symbole (somme des écritures du ledger)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Holding {
    pub symbol: String,
    pub name: String,
    pub shares: i64,
    pub cost: Decimal, // Somme signée des `total`
}

#[derive(Debug, Serialize)]
pub struct PortfolioResponse {
    pub username: String,
    pub cash: Decimal,
    pub holdings: Vec<Holding>,
    pub total: Decimal, // cash + somme de tous les `total`
}

/// Premier message d'erreur de validation, dans l'ordre des champs donné
pub fn first_validation_message(errors: &ValidationErrors, fields: &[&str]) -> String {
    let field_errors = errors.field_errors();

    fields
        .iter()
        .filter_map(|field| field_errors.get(*field))
        .flat_map(|errs| errs.iter())
        .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| "Invalid input.".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register_form(username: &str, password: &str, confirmation: &str) -> RegisterForm {
        RegisterForm {
            username: username.to_string(),
            password: password.to_string(),
            confirmation: confirmation.to_string(),
        }
    }

    #[test]
    fn test_valid_registration() {
        assert!(register_form("alice", "hunter2", "hunter2").validate().is_ok());
    }

    #[test]
    fn test_short_username_reported_first() {
        let errors = register_form("bob", "pw", "other").validate().unwrap_err();
        assert_eq!(
            first_validation_message(&errors, &RegisterForm::FIELDS),
            "Username > 4 characters!"
        );
    }

    #[test]
    fn test_confirmation_mismatch() {
        let errors = register_form("alice", "hunter2", "hunter3").validate().unwrap_err();
        assert_eq!(
            first_validation_message(&errors, &RegisterForm::FIELDS),
            "Password did not match!"
        );
    }
}
