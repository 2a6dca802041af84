#![deny(missing_docs)]
//! Spaceport server executable.
//!
//! Hosts the REST endpoints for ship record management.

mod config;
mod db;
mod models;
mod openapi;
mod routes;
mod schema;

#[cfg(not(test))]
use std::sync::Arc;

#[cfg(not(test))]
use actix_cors::Cors;
#[cfg(not(test))]
use actix_web::{App, HttpServer, http::header, middleware::Logger, web};
#[cfg(not(test))]
use dotenvy::dotenv;
#[cfg(not(test))]
use log::info;

#[cfg(not(test))]
use crate::config::ServerConfig;
#[cfg(not(test))]
use crate::db::{PgShipRepository, init_pool};
#[cfg(not(test))]
use crate::routes::{AppState, SharedRepository, configure};

#[cfg(not(test))]
fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ServerConfig::from_env().map_err(std::io::Error::other)?;
    let pool = init_pool(&config.database_url).map_err(std::io::Error::other)?;
    let repository: SharedRepository = Arc::new(PgShipRepository::new(pool));
    let state = web::Data::new(AppState::new(repository));

    let ServerConfig {
        host,
        port,
        ui_origins,
        ..
    } = config;
    info!("spaceport listening on {host}:{port}");

    actix_web::rt::System::new().block_on(async move {
        HttpServer::new(move || {
            let mut cors = Cors::default()
                .allowed_methods(vec!["GET", "POST", "DELETE", "OPTIONS"])
                .allowed_headers(vec![header::CONTENT_TYPE])
                .max_age(3600);
            for origin in &ui_origins {
                cors = cors.allowed_origin(origin);
            }
            App::new()
                .wrap(Logger::default())
                .wrap(cors)
                .app_data(state.clone())
                .configure(configure)
        })
        .bind((host, port))?
        .run()
        .await
    })
}

#[cfg(test)]
fn main() {}
