use std::str::FromStr;

use sqlx::pool::PoolConnection;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};

use crate::error::ServiceResult;
use crate::image_store::ImageStore;

mod businesses;
mod categories;
mod menu;
mod menu_items;
mod ownership;
mod schema;
mod users;

#[cfg(test)]
mod tests;

#[derive(Clone)]
pub struct AppState {
    pub pool: Pool<Sqlite>,
    pub images: ImageStore,
}

/// One pooled connection, owned by a single request for its whole lifetime.
pub struct DatabaseConnection {
    pub connection: PoolConnection<Sqlite>,
}

impl AppState {
    pub async fn connect(url: &str, images: ImageStore) -> ServiceResult<AppState> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        log::info!("Connected to database at {}", url);
        AppState::from_pool(pool, images).await
    }

    /// Wrap an existing pool. Fails if the schema can not be ensured.
    pub async fn from_pool(pool: Pool<Sqlite>, images: ImageStore) -> ServiceResult<AppState> {
        let app_state = AppState { pool, images };
        app_state.connection().await?;
        Ok(app_state)
    }

    /// Acquire a connection with its schema checked.
    ///
    /// A schema failure is returned with its cause, the connection is not handed out.
    pub async fn connection(&self) -> ServiceResult<DatabaseConnection> {
        let mut connection = self.pool.acquire().await?;
        schema::ensure_schema(&mut connection).await?;
        Ok(DatabaseConnection { connection })
    }
}
