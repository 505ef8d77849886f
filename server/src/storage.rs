use dioxus::fullstack::Lazy;
use secrecy::ExposeSecret;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode};
use types::Result;

use crate::CONFIG;
pub use session::Session;

mod session;

/// Encrypted with `db_secret`; it holds backend bearer tokens.
const DATABASE_FILE: &str = "sessions.sqlite";

static POOL: Lazy<SqlitePool> = Lazy::new(|| async {
    let options = SqliteConnectOptions::new()
        .filename(CONFIG.data_dir.join(DATABASE_FILE))
        .pragma("key", CONFIG.db_secret.expose_secret())
        .journal_mode(SqliteJournalMode::Wal)
        .create_if_missing(true);

    SqlitePool::connect_with(options).await
});

/// Prepare the data directory and bring the session schema up to date.
pub async fn migrate() -> Result<()> {
    std::fs::create_dir_all(&CONFIG.data_dir)?;
    sqlx::migrate!("../migrations").run(&*POOL).await?;
    Ok(())
}
