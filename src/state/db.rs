use tokio_postgres::{Config, NoTls};
use deadpool_postgres::{Manager, ManagerConfig, Pool, RecyclingMethod};

use crate::error::{self, Context};
use crate::config;

const SCHEMA: &str = include_str!("../../setup/postgres/schema.sql");

pub fn from_config(config: &config::Config) -> error::Result<Pool> {
    let mut pg_config = Config::new();

    pg_config.user(config.settings.db.user.as_str());

    if let Some(password) = &config.settings.db.password {
        pg_config.password(password.as_str());
    }

    pg_config.host(config.settings.db.host.as_str());
    pg_config.port(config.settings.db.port);
    pg_config.dbname(config.settings.db.dbname.as_str());

    let manager_config = ManagerConfig {
        recycling_method: RecyclingMethod::Fast,
    };

    let manager = Manager::from_config(pg_config, NoTls, manager_config);

    Pool::builder(manager)
        .max_size(4)
        .build()
        .context("failed to create database connection pool")
}

fn schema_statements() -> impl Iterator<Item = &'static str> {
    SCHEMA.split(';')
        .map(str::trim)
        .filter(|sql| !sql.is_empty())
}

/// creates any missing tables in a single transaction
pub async fn setup(pool: &Pool) -> error::Result<()> {
    let mut conn = pool.get()
        .await
        .context("failed to retrieve database connection for setup")?;

    let transaction = conn.transaction()
        .await
        .context("failed to start setup transaction")?;

    for sql in schema_statements() {
        transaction.execute(sql, &[])
            .await
            .context(format!("failed to run setup query\n{sql}"))?;
    }

    transaction.commit()
        .await
        .context("failed to commit setup transaction")?;

    tracing::info!("database schema ready");

    Ok(())
}

#[cfg(test)]
pub mod test {
    use super::*;

    /// pool for `ASSIST_TEST_DB`, e.g. `host=localhost user=postgres dbname=assist_test`
    pub async fn test_pool() -> Pool {
        let conn_str = std::env::var("ASSIST_TEST_DB")
            .expect("ASSIST_TEST_DB is not set");
        let pg_config: Config = conn_str.parse()
            .expect("ASSIST_TEST_DB is not a valid connection string");

        let manager = Manager::from_config(pg_config, NoTls, ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        });
        let pool = Pool::builder(manager)
            .max_size(2)
            .build()
            .unwrap();

        setup(&pool).await.unwrap();

        pool
    }

    #[test]
    fn schema_splits_into_statements() {
        let statements: Vec<&str> = schema_statements().collect();

        assert_eq!(statements.len(), 4);
        assert!(statements.iter().all(|sql| sql.starts_with("create")));
    }
}
