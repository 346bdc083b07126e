use actix_web::{get, web, HttpResponse};
use sea_orm::DatabaseConnection;

use crate::error::AppError;
use crate::middleware::AuthUser;
use crate::services::ledger_service::LedgerService;

/// GET / - Portefeuille: cash, positions agrégées et valeur totale (PROTÉGÉE)
#[get("/")]
pub async fn index(
    auth_user: AuthUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    let portfolio = LedgerService::portfolio(db.get_ref(), auth_user.user_id).await?;
    Ok(HttpResponse::Ok().json(portfolio))
}

/// GET /history - Toutes les écritures du ledger (PROTÉGÉE)
#[get("/history")]
pub async fn history(
    auth_user: AuthUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    let entries = LedgerService::history(db.get_ref(), auth_user.user_id).await?;
    Ok(HttpResponse::Ok().json(entries))
}

pub fn portfolio_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(index).service(history);
}
