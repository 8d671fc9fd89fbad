use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};

pub type DbPool = Pool<ConnectionManager<PgConnection>>;

/// Builds the r2d2 pool request handlers and cron sweeps draw from.
/// Connections are validated on checkout so a dropped database surfaces as a
/// pool error instead of a failed query mid-handler.
pub fn create_pool(database_url: &str, max_size: u32) -> anyhow::Result<DbPool> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    let pool = Pool::builder()
        .max_size(max_size)
        .min_idle(Some(1))
        .test_on_check_out(true)
        .build(manager)?;

    tracing::info!(max_size, "database connection pool ready");
    Ok(pool)
}
