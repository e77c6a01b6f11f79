use sqlx::{migrate::MigrateDatabase, query, query_scalar, Pool, Sqlite, SqlitePool};
use tracing::warn;

use crate::theme::Theme;

const THEME_KEY: &str = "theme";

pub struct Storage {
    pool: Pool<Sqlite>,
}

impl Storage {
    pub async fn initialize(database_url: &str) -> sqlx::Result<Self> {
        if !Sqlite::database_exists(database_url).await.unwrap_or(false) {
            Sqlite::create_database(database_url).await?;
        }
        let pool = SqlitePool::connect(database_url).await?;
        Self::migrated(pool).await
    }

    async fn migrated(pool: Pool<Sqlite>) -> sqlx::Result<Self> {
        sqlx::migrate!().run(&pool).await?;
        Ok(Self { pool })
    }
}

impl Storage {
    /// The saved theme, or the default when nothing (or garbage) is stored.
    pub async fn theme(&self) -> sqlx::Result<Theme> {
        let stored: Option<String> = query_scalar("SELECT value FROM preferences WHERE key = ?")
            .bind(THEME_KEY)
            .fetch_optional(&self.pool)
            .await?;
        Ok(match stored {
            Some(value) => value.parse().unwrap_or_else(|error: String| {
                warn!(%error, "ignoring stored theme");
                Theme::default()
            }),
            None => Theme::default(),
        })
    }

    pub async fn set_theme(&self, theme: Theme) -> sqlx::Result<()> {
        query(
            "INSERT INTO preferences(key, value) VALUES(?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        )
        .bind(THEME_KEY)
        .bind(theme.as_str())
        .execute(&self.pool)
        .await
        .map(|_| ())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}
