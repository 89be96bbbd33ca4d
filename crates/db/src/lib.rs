use std::{path::Path, str::FromStr, time::Duration};

use sqlx::{
    Error, Pool, Sqlite, SqlitePool,
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqliteSynchronous},
};
use utils_assets::db_path;

pub mod models;
mod retry;

#[derive(Clone)]
pub struct DBService {
    pub pool: Pool<Sqlite>,
}

impl DBService {
    /// Open (creating if necessary) the database at its default location
    /// under the app data dir and bring it up to date.
    pub async fn new() -> Result<DBService, Error> {
        Self::new_with_path(&db_path()).await
    }

    pub async fn new_with_path(path: &Path) -> Result<DBService, Error> {
        let database_url = format!("sqlite://{}", path.to_string_lossy());
        let options = SqliteConnectOptions::from_str(&database_url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(30))
            .foreign_keys(true);
        let pool = SqlitePool::connect_with(options).await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::debug!("database ready at {}", path.display());
        Ok(DBService { pool })
    }
}
