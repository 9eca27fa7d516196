use crate::error::{AppError, AppResult};
use db_pool::{create_pool, DbConfig};
use sqlx::migrate::Migrator;
use sqlx::PgPool;

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

pub const SERVICE_NAME: &str = "hockey-connect-messaging";

/// Open the shared pool. Sizing and timeouts come from the `DB_*` variables;
/// an unparsable one is a configuration error.
pub async fn init_pool(database_url: &str) -> AppResult<PgPool> {
    let config = DbConfig::with_url(SERVICE_NAME, database_url).map_err(AppError::Config)?;
    config.log_config();
    Ok(create_pool(config).await?)
}
