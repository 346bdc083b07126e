use actix_web::{get, web, HttpResponse};
use chrono::Utc;
use sea_orm::DatabaseConnection;
use crate::models::health::HealthResponse;

#[get("/health")]
pub async fn health_check(db: web::Data<DatabaseConnection>) -> HttpResponse {
    let database = db.ping().await.is_ok();

    let response = HealthResponse {
        status: if database { "ok" } else { "degraded" },
        service: "birthdays",
        database,
        time: Utc::now(),
    };

    if database {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::ServiceUnavailable().json(response)
    }
}
