use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool, PoolError};

use crate::error::ApiError;

pub type DbPool = Pool<ConnectionManager<PgConnection>>;

pub fn build_pool(database_url: &str, pool_size: u32) -> Result<DbPool, PoolError> {
    log::info!("Building database connection pool (size {})", pool_size);
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    let pool = Pool::builder().max_size(pool_size).build(manager)?;
    log::info!("Database connection pool established");
    Ok(pool)
}

/// Runs a data-access closure on a pooled connection from the blocking
/// thread pool, so diesel's synchronous I/O never stalls the async executor.
/// The connection is held for the duration of one closure and released on
/// completion.
pub async fn run<F, T>(pool: &DbPool, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&mut PgConnection) -> diesel::QueryResult<T> + Send + 'static,
    T: Send + 'static,
{
    let pool = pool.clone();
    tokio::task::spawn_blocking(move || {
        let mut conn = pool.get().map_err(ApiError::from)?;
        f(&mut conn).map_err(ApiError::from)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("blocking task failed: {}", e)))?
}
