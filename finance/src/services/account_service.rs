use sea_orm::*;
use rust_decimal::Decimal;
use validator::Validate;
use crate::error::AppError;
use crate::models::users;
use crate::models::dto::{first_validation_message, LoginForm, RegisterForm};
use crate::utils::{money, password};

pub struct AccountService;

impl AccountService {
    /// Crée un compte avec le cash de départ.
    /// Unicité du nom: vérifiée ici (égalité exacte) puis garantie par la
    /// contrainte UNIQUE si deux inscriptions se croisent.
    pub async fn register(
        db: &DatabaseConnection,
        form: &RegisterForm,
        starting_cash: Decimal,
    ) -> Result<users::Model, AppError> {
        let validation = form.validate();

        // 1. Nom d'abord: longueur, puis unicité
        if let Err(errors) = &validation {
            if errors.field_errors().contains_key("username") {
                return Err(AppError::Validation(first_validation_message(errors, &["username"])));
            }
        }

        let existing_user = users::Entity::find()
            .filter(users::Column::Username.eq(&form.username))
            .one(db)
            .await?;

        if existing_user.is_some() {
            return Err(AppError::UsernameTaken);
        }

        // 2. Puis mot de passe et confirmation
        if let Err(errors) = validation {
            return Err(AppError::Validation(first_validation_message(&errors, &RegisterForm::FIELDS)));
        }

        // 3. Hash + insertion
        let hash = password::hash_password(&form.password)?;
        let cash = money::to_minor(starting_cash)?;

        let new_user = users::ActiveModel {
            username: Set(form.username.clone()),
            hash: Set(hash),
            cash: Set(cash),
            ..Default::default()
        };

        match new_user.insert(db).await {
            Ok(user) => {
                tracing::info!(user_id = user.id, username = %user.username, "user registered");
                Ok(user)
            }
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Err(AppError::UsernameTaken)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Vérifie les identifiants; même message pour un nom inconnu et un
    /// mauvais mot de passe
    pub async fn authenticate(db: &DatabaseConnection, form: &LoginForm) -> Result<users::Model, AppError> {
        if form.username.is_empty() {
            return Err(AppError::Credentials("must provide username"));
        }
        if form.password.is_empty() {
            return Err(AppError::Credentials("must provide password"));
        }

        let user = users::Entity::find()
            .filter(users::Column::Username.eq(&form.username))
            .one(db)
            .await?
            .ok_or(AppError::Credentials("invalid username and/or password"))?;

        if !password::verify_password(&form.password, &user.hash)? {
            tracing::warn!(username = %form.username, "login failed");
            return Err(AppError::Credentials("invalid username and/or password"));
        }

        Ok(user)
    }
}
