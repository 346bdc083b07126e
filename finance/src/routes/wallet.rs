use actix_web::{get, post, web, HttpResponse};
use sea_orm::DatabaseConnection;

use crate::error::AppError;
use crate::middleware::AuthUser;
use crate::models::dto::TopUpForm;
use crate::routes::redirect_home;
use crate::services::ledger_service::LedgerService;

/// POST /balance - Recharger le cash (PROTÉGÉE)
#[post("/balance")]
pub async fn top_up(
    auth_user: AuthUser,
    form: web::Form<TopUpForm>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    let amount: i64 = form
        .balance
        .trim()
        .parse()
        .map_err(|_| AppError::Validation("Not an integer.".to_string()))?;

    LedgerService::top_up(db.get_ref(), auth_user.user_id, amount).await?;
    Ok(redirect_home())
}

/// GET /balance - Historique des recharges (PROTÉGÉE)
#[get("/balance")]
pub async fn deposit_history(
    auth_user: AuthUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    let deposits = LedgerService::deposits(db.get_ref(), auth_user.user_id).await?;
    Ok(HttpResponse::Ok().json(deposits))
}

pub fn wallet_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(top_up).service(deposit_history);
}
