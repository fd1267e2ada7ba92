#[macro_use]
extern crate log;
extern crate pretty_env_logger;

use actix_web::{web, App, HttpServer};
use deliverytech::auth::{AuthLayer, JwtConfig};
use deliverytech::{api, AppState};
use dotenvy::dotenv;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = dotenv() {
        eprintln!("Failed to load .env file: {}", e);
    }

    // Setup logging
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }
    pretty_env_logger::init();

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let jwt_config = JwtConfig::from_env();

    info!("Initializing database connection pool...");
    let state = AppState::new(&database_url);

    let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|v| v.parse::<u16>().ok())
        .unwrap_or(8080);

    info!("Starting server at http://{}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .wrap(AuthLayer::new(jwt_config.clone()))
            .app_data(web::JsonConfig::default().error_handler(api::default_error_handler))
            .configure(|cfg| api::configure(cfg, &state))
    })
    .bind((host, port))?
    .run()
    .await
}
