mod config;
mod db;
mod error;
mod models;
mod routes;

use actix_web::{middleware::{DefaultHeaders, Logger}, web, App, HttpServer};
use anyhow::Context;
use tracing_subscriber::EnvFilter;

use crate::config::Settings;

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

    tracing::info!(address = %settings.bind_address, port = settings.port, "starting server");

    let db = web::Data::new(db);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(
                DefaultHeaders::new()
                    .add(("Cache-Control", "no-cache, no-store, must-revalidate"))
                    .add(("Expires", "0"))
                    .add(("Pragma", "no-cache")),
            )
            .app_data(db.clone())
            .configure(routes::configure_routes)
    })
        .bind((settings.bind_address.clone(), settings.port))?
        .run()
        .await?;

    Ok(())
}
