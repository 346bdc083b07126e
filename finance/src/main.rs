mod config;
mod db;
mod error;
mod middleware;
mod models;
mod routes;
mod services;
mod utils;

use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::Context;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use crate::config::Settings;
use crate::services::quote_service::{IexQuoteProvider, QuoteProvider};
use crate::utils::jwt::SessionKeys;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = Settings::from_env().context("invalid configuration")?;

    tracing::info!("connecting to database");
    let db = db::establish_connection(&settings.database_url)
        .await
        .context("failed to connect to database")?;

    let quotes: Arc<dyn QuoteProvider> = Arc::new(
        IexQuoteProvider::new(&settings.quote_api_url, &settings.quote_api_key)
            .context("failed to build quote client")?,
    );
    let keys = SessionKeys::from_settings(&settings);
    let bind = (settings.bind_address.clone(), settings.port);

    tracing::info!(address = %bind.0, port = bind.1, "starting server");

    let db = web::Data::new(db);
    let settings = web::Data::new(settings);
    let keys = web::Data::new(keys);
    let quotes = web::Data::from(quotes);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(middleware::no_cache_headers())
            .app_data(db.clone())
            .app_data(settings.clone())
            .app_data(keys.clone())
            .app_data(quotes.clone())
            .configure(routes::configure_routes)
    })
        .bind(bind)?
        .run()
        .await?;

    Ok(())
}
