pub mod birthdays;
pub mod health;

use actix_web::web;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(health::health_check)
        .configure(birthdays::birthday_routes);
}
