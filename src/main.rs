// src/main.rs

mod app_state;
mod assignment;
mod call_attempt;
mod config;
mod error;
mod ingest;
mod leads;
mod media;
mod models;
mod serializer;
mod store;
mod team;
mod templates;

use std::sync::Arc;

use actix_cors::Cors;
use actix_files::Files;
use actix_multipart::form::MultipartFormConfig;
use actix_web::{http, middleware::Logger, web, App, HttpServer};
use env_logger::Env;
use log::info;

use crate::app_state::{AppState, PhoneLocks};
use crate::assignment::{assign_lead, reassign_lead};
use crate::call_attempt::record_call_attempt;
use crate::ingest::upload_csv;
use crate::leads::{
    delete_lead, get_agent_leads, get_end_data, get_leads, get_rental_leads, get_selling_leads,
};
use crate::team::{add_team_member, get_team_roster, remove_team_member};
use crate::templates::{create_template, delete_template, list_templates};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = config::Config::from_env();
    let mongodb = Arc::new(store::MongoDB::init(&config.mongo_uri, &config.database_name).await);
    std::fs::create_dir_all(&config.upload_dir)?;

    let state = AppState {
        mongodb,
        config: config.clone(),
        assignment_locks: PhoneLocks::default(),
    };

    info!("Server running at http://{}", config.bind_addr);
    if let Some(origin) = &config.frontend_origin {
        info!("Allowed CORS origin: {}", origin);
    }

    HttpServer::new(move || {
        let cors = match &state.config.frontend_origin {
            Some(origin) => Cors::default()
                .allowed_origin(origin)
                .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
                .allowed_headers(vec![http::header::CONTENT_TYPE, http::header::ACCEPT])
                .max_age(3600),
            None => Cors::permissive(),
        };

        App::new()
            .wrap(Logger::default())
            .wrap(cors)
            .app_data(web::Data::new(state.clone()))
            .app_data(
                MultipartFormConfig::default()
                    .memory_limit(32 * 1024 * 1024)
                    .total_limit(64 * 1024 * 1024),
            )
            // CSV ingestion
            .route("/upload", web::post().to(upload_csv))
            .service(
                web::scope("/api")
                    // LEAD COLLECTIONS
                    .route("/leads", web::get().to(get_leads))
                    .route("/rental-leads", web::get().to(get_rental_leads))
                    .route("/agent-leads", web::get().to(get_agent_leads))
                    .route("/selling-leads", web::get().to(get_selling_leads))
                    .route("/end-data", web::get().to(get_end_data))
                    .route("/delete-lead", web::delete().to(delete_lead))
                    // TEAM ROSTER
                    .route("/get-team-assign", web::get().to(get_team_roster))
                    .route("/add-team-assign", web::post().to(add_team_member))
                    .route(
                        "/remove-team-assign/{number}",
                        web::delete().to(remove_team_member),
                    )
                    // ASSIGNMENT LEDGER
                    .route("/assign-lead", web::post().to(assign_lead))
                    .route("/reassign-lead", web::post().to(reassign_lead))
                    .route("/call-attempt", web::post().to(record_call_attempt))
                    // TEMPLATES
                    .route("/wp-template", web::post().to(create_template))
                    .route("/wp-template", web::get().to(list_templates))
                    .route("/wp-template/{id}", web::delete().to(delete_template)),
            )
            // Stored template media
            .service(Files::new("/uploads", state.config.upload_dir.clone()))
    })
    .bind(&config.bind_addr)?
    .run()
    .await
}
