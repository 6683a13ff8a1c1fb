pub mod event;
pub mod group;
pub mod matches;
pub mod message;
pub mod spotify;
pub mod user;

use crate::PGPool;
use log::info;
use sqlx::postgres::PgPoolOptions;

pub async fn init_db_pool(db_url: &str) -> PGPool {
    let pool: PGPool = PgPoolOptions::new()
        .max_connections(5)
        .connect(db_url)
        .await
        .expect("Failed to connect to postgres");
    info!("connected to postgres");
    pool
}
