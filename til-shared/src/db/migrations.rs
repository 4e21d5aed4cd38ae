/// Embedded schema migrations
///
/// The SQL files under `til-shared/migrations/` are compiled into the binary,
/// so a deployed server needs nothing on disk.
///
/// # Example
///
/// ```no_run
/// use til_shared::db::migrations::{ensure_database_exists, run_migrations};
/// use til_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let url = std::env::var("DATABASE_URL")?;
/// ensure_database_exists(&url).await?;
///
/// let pool = create_pool(DatabaseConfig::new(url)).await?;
/// run_migrations(&pool).await?;
/// # Ok(())
/// # }
/// ```

use sqlx::{
    migrate::{MigrateDatabase, MigrateError, Migrator},
    postgres::PgPool,
    Postgres,
};
use tracing::info;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Applied vs. embedded migrations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationStatus {
    pub applied_migrations: usize,
    pub latest_version: Option<i64>,
    pub pending_migrations: usize,
}

impl MigrationStatus {
    pub fn is_up_to_date(&self) -> bool {
        self.pending_migrations == 0
    }
}

/// Applies pending migrations; a no-op when the schema is current
pub async fn run_migrations(pool: &PgPool) -> Result<(), MigrateError> {
    MIGRATOR.run(pool).await?;
    info!(embedded = MIGRATOR.iter().count(), "Schema up to date");
    Ok(())
}

pub async fn get_migration_status(pool: &PgPool) -> Result<MigrationStatus, sqlx::Error> {
    let embedded = MIGRATOR.iter().count();

    // sqlx creates its bookkeeping table on the first run
    let tracked: bool = sqlx::query_scalar("SELECT to_regclass('_sqlx_migrations') IS NOT NULL")
        .fetch_one(pool)
        .await?;

    let (applied, latest_version) = if tracked {
        let (count, latest): (i64, Option<i64>) =
            sqlx::query_as("SELECT COUNT(*), MAX(version) FROM _sqlx_migrations WHERE success")
                .fetch_one(pool)
                .await?;
        (count as usize, latest)
    } else {
        (0, None)
    };

    Ok(MigrationStatus {
        applied_migrations: applied,
        latest_version,
        pending_migrations: embedded.saturating_sub(applied),
    })
}

/// Creates the database named in the URL when missing
pub async fn ensure_database_exists(database_url: &str) -> Result<(), sqlx::Error> {
    if !Postgres::database_exists(database_url).await? {
        info!("Creating database");
        Postgres::create_database(database_url).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_migrations_are_ordered() {
        let versions: Vec<i64> = MIGRATOR.iter().map(|m| m.version).collect();

        assert_eq!(versions.len(), 4);
        assert!(versions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_pending_means_out_of_date() {
        let current = MigrationStatus {
            applied_migrations: 4,
            latest_version: Some(20240101000004),
            pending_migrations: 0,
        };
        assert!(current.is_up_to_date());

        let behind = MigrationStatus {
            pending_migrations: 1,
            ..current
        };
        assert!(!behind.is_up_to_date());
    }
}
