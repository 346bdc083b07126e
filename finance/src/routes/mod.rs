pub mod auth;
pub mod health;
pub mod portfolio;
pub mod trade;
pub mod wallet;

use actix_web::{http::header, web, HttpResponse};

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(health::health_check)
        .configure(auth::auth_routes)
        .configure(portfolio::portfolio_routes)
        .configure(trade::trade_routes)
        .configure(wallet::wallet_routes);
}

/// Réponse des mutations réussies: retour au portefeuille
pub fn redirect_home() -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, "/"))
        .finish()
}

/// Contexte commun aux tests de routes: base en mémoire, oracle statique
#[cfg(test)]
pub mod testing {
    use actix_web::{cookie::Cookie, dev::ServiceResponse, test, web};
    use rust_decimal::Decimal;
    use sea_orm::DatabaseConnection;
    use std::sync::Arc;

    use crate::config::Settings;
    use crate::db;
    use crate::middleware::SESSION_COOKIE;
    use crate::services::quote_service::{testing::StaticQuoteProvider, QuoteProvider};
    use crate::utils::jwt::SessionKeys;

    pub struct TestContext {
        pub db: DatabaseConnection,
        pub quotes: Arc<StaticQuoteProvider>,
        pub settings: Settings,
    }

    impl TestContext {
        pub async fn new() -> Self {
            let settings = Settings::from_lookup(|key| match key {
                "API_KEY" => Some("test".to_string()),
                "SESSION_SECRET" => Some("test-secret".to_string()),
                _ => None,
            })
            .expect("test settings");

            let quotes = StaticQuoteProvider::default()
                .with("ACME", "Acme Corp", Decimal::from(50));

            Self {
                db: db::connect_in_memory().await,
                quotes: Arc::new(quotes),
                settings,
            }
        }

        pub fn configure(&self, cfg: &mut web::ServiceConfig) {
            let quotes: Arc<dyn QuoteProvider> = self.quotes.clone();

            cfg.app_data(web::Data::new(self.db.clone()))
                .app_data(web::Data::new(self.settings.clone()))
                .app_data(web::Data::new(SessionKeys::from_settings(&self.settings)))
                .app_data(web::Data::from(quotes))
                .configure(super::configure_routes);
        }
    }

    pub fn register_request(username: &str, password: &str) -> test::TestRequest {
        test::TestRequest::post().uri("/register").set_form([
            ("username", username),
            ("password", password),
            ("confirmation", password),
        ])
    }

    pub fn login_request(username: &str, password: &str) -> test::TestRequest {
        test::TestRequest::post()
            .uri("/login")
            .set_form([("username", username), ("password", password)])
    }

    pub fn session_cookie<B>(response: &ServiceResponse<B>) -> Cookie<'static> {
        response
            .response()
            .cookies()
            .find(|c| c.name() == SESSION_COOKIE)
            .map(|c| c.into_owned())
            .expect("session cookie")
    }

    pub fn location<B>(response: &ServiceResponse<B>) -> &str {
        response
            .headers()
            .get(actix_web::http::header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
    }

    pub fn decimal(value: &serde_json::Value) -> Decimal {
        value.as_str().expect("decimal as string").parse().expect("decimal")
    }
}
