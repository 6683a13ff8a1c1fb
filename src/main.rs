pub mod config;
pub mod db;
pub mod dto;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod service;

use actix_files::Files;
use actix_web::{web, App, HttpServer};
use config::{AppConfig, AppContext};
use db::init_db_pool;
use dotenv::dotenv;
use log::info;
use sqlx::{postgres::Postgres, Pool};

pub type PGPool = Pool<Postgres>;

/// Bearer tokens expire after one hour.
pub const TOKEN_TTL_SECS: usize = 3600;
pub const TOKEN_ISSUER: &str = "http://melody-mingle.auth";

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    service::log::init_logger();

    let config = AppConfig::from_env();
    let pool: PGPool = init_db_pool(&config.database_url).await;
    sqlx::migrate!()
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    std::fs::create_dir_all(&config.picture_folder)
        .expect("Failed to create the profile picture folder");

    let bind_addr = (config.host.clone(), config.port);
    let ctx = AppContext {
        pool,
        config,
        http: reqwest::Client::new(),
    };
    let data = web::Data::new(ctx);

    info!("starting server on {}:{}", bind_addr.0, bind_addr.1);
    HttpServer::new(move || {
        let jwt_secret = data.config.jwt_secret.clone();
        let picture_folder = data.config.picture_folder.clone();
        App::new()
            .app_data(data.clone())
            .app_data(errors::json_error_config())
            .app_data(errors::path_error_config())
            .app_data(errors::query_error_config())
            .wrap(service::auth::PrepareAuth { jwt_secret })
            .wrap(service::log::LoggerMiddleware)
            .service(Files::new("/profile_pictures", picture_folder))
            .service(web::scope("/auth").configure(handlers::auth::config))
            .service(
                web::scope("/users")
                    .wrap(service::auth::RequireAuth)
                    .configure(handlers::user::config),
            )
            .service(
                web::scope("/groups")
                    .wrap(service::auth::RequireAuth)
                    .configure(handlers::group::config),
            )
            .service(
                web::scope("/events")
                    .wrap(service::auth::RequireAuth)
                    .configure(handlers::event::config),
            )
            .service(
                web::scope("/matches")
                    .wrap(service::auth::RequireAuth)
                    .configure(handlers::matches::config),
            )
            .service(
                web::scope("/chat")
                    .wrap(service::auth::RequireAuth)
                    .configure(handlers::chat::config),
            )
            .service(
                web::scope("/spotify")
                    .wrap(service::auth::RequireAuth)
                    .configure(handlers::spotify::config),
            )
    })
    .bind((bind_addr.0.as_str(), bind_addr.1))?
    .run()
    .await
}
