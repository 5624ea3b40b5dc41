// src/main.rs

mod app_state;
mod auth;
mod board;
mod config;
mod models;
mod store;
mod store_db;
mod store_json;
mod token;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{http, middleware::Logger, web, App, HttpServer};
use env_logger::Env;

use crate::app_state::AppState;
use crate::auth::{auth_status, lock, unlock};
use crate::board::{create_task, delete_task, get_board, update_task};
use crate::store::BoardService;

/// Route table, shared between the server and the handler tests.
pub fn api_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(
                web::scope("/auth")
                    .route("", web::get().to(auth_status))
                    .route("", web::post().to(unlock))
                    .route("", web::delete().to(lock)),
            )
            .service(
                web::scope("/tasks")
                    .route("", web::get().to(get_board))
                    .route("", web::post().to(create_task))
                    .route("/{id}", web::patch().to(update_task))
                    .route("/{id}", web::delete().to(delete_task)),
            ),
    );
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = config::Config::from_env();
    let board = match BoardService::from_config(&config) {
        Ok(board) => Arc::new(board),
        Err(e) => {
            return Err(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("Failed to open task storage: {e}"),
            ))
        }
    };

    let frontend_origin = config.frontend_origin.clone();

    println!("Server running at http://0.0.0.0:8080");
    println!("Storage mode: {}", board.storage_mode().as_str());
    println!("Allowed CORS Origin: {}", frontend_origin);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&frontend_origin)
            .allowed_methods(vec!["GET", "POST", "PATCH", "DELETE", "OPTIONS"])
            .allowed_headers(vec![http::header::CONTENT_TYPE, http::header::ACCEPT])
            .supports_credentials()
            .max_age(3600);

        App::new()
            .wrap(Logger::default())
            .wrap(cors)
            .app_data(web::Data::new(AppState {
                board: board.clone(),
                config: config.clone(),
            }))
            .configure(api_routes)
    })
    .bind("0.0.0.0:8080")?
    .run()
    .await
}
