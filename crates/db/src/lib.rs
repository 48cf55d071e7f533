//! # Salon DB
//!
//! PostgreSQL persistence for the salon booking service: pool creation,
//! schema initialization, and one repository module per table. Repositories
//! hand back raw rows (see [`models`]); conversion into the typed entities
//! of `salon-core` happens through the `TryFrom`/`From` impls next to them.

pub mod models;
pub mod repositories;
pub mod schema;

pub mod mock;

use eyre::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};

pub type DbPool = Pool<Postgres>;

pub async fn create_pool(database_url: &str) -> Result<DbPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    Ok(pool)
}
