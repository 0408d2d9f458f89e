//! Connection pool utilities

use crate::client::ConnectionPool;
use crate::config::Config;
use crate::error::{OrmError, OrmResult};
use deadpool_postgres::{Manager, ManagerConfig, Pool, PoolBuilder, RecyclingMethod};
use tokio_postgres::NoTls;
use tokio_postgres::Socket;
use tokio_postgres::tls::{MakeTlsConnect, TlsConnect};

const DEFAULT_MAX_SIZE: usize = 16;

/// Create a connection pool from a [`Config`], without TLS.
///
/// `max_open_conns` caps the pool size; `0` uses the default of 16.
/// Nothing is connected until the first checkout; use [`connect`] to fail
/// fast on an unreachable database.
///
/// # Example
///
/// ```ignore
/// let pool = fury::pool::create_pool(&config)?;
/// let db = fury::Db::new(pool);
/// ```
pub fn create_pool(config: &Config) -> OrmResult<Pool> {
    create_pool_with_tls(config, NoTls)
}

/// Create a connection pool using a custom TLS connector.
pub fn create_pool_with_tls<T>(config: &Config, tls: T) -> OrmResult<Pool>
where
    T: MakeTlsConnect<Socket> + Clone + Sync + Send + 'static,
    T::Stream: Sync + Send,
    T::TlsConnect: Sync + Send,
    <T::TlsConnect as TlsConnect<Socket>>::Future: Send,
{
    let max_size = max_size(config);
    create_pool_with_manager_config(config, tls, default_manager_config(), |builder| {
        builder.max_size(max_size)
    })
}

/// Create a connection pool with injected `deadpool_postgres::ManagerConfig`
/// and `PoolBuilder` tuning.
pub fn create_pool_with_manager_config<T>(
    config: &Config,
    tls: T,
    manager_config: ManagerConfig,
    configure_pool: impl FnOnce(PoolBuilder) -> PoolBuilder,
) -> OrmResult<Pool>
where
    T: MakeTlsConnect<Socket> + Clone + Sync + Send + 'static,
    T::Stream: Sync + Send,
    T::TlsConnect: Sync + Send,
    <T::TlsConnect as TlsConnect<Socket>>::Future: Send,
{
    let pg_config = config.clone().normalize().pg_config()?;
    let mgr = Manager::from_config(pg_config, tls, manager_config);
    configure_pool(Pool::builder(mgr))
        .build()
        .map_err(|e| OrmError::Pool(e.to_string()))
}

/// Create a pool and ping it, retrying up to `max_retries` times.
///
/// Each failed attempt is logged at `warn`; the last error is returned when
/// every attempt fails.
pub async fn connect(config: &Config) -> OrmResult<Pool> {
    let config = config.clone().normalize();
    let pool = create_pool(&config)?;

    let mut attempt = 0;
    loop {
        attempt += 1;
        match ConnectionPool::ping(&pool).await {
            Ok(()) => return Ok(pool),
            Err(err) if attempt < config.max_retries => {
                tracing::warn!(
                    target: "fury.pool",
                    attempt,
                    max_retries = config.max_retries,
                    error = %err,
                    "database ping failed, retrying"
                );
            }
            Err(err) => {
                tracing::warn!(
                    target: "fury.pool",
                    attempt,
                    error = %err,
                    "database ping failed, giving up"
                );
                return Err(OrmError::Connection(err.to_string()));
            }
        }
    }
}

fn max_size(config: &Config) -> usize {
    usize::try_from(config.max_open_conns)
        .ok()
        .filter(|&n| n > 0)
        .unwrap_or(DEFAULT_MAX_SIZE)
}

fn default_manager_config() -> ManagerConfig {
    ManagerConfig {
        recycling_method: RecyclingMethod::Fast,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local() -> Config {
        Config::new().host("localhost").dbname("fury_test")
    }

    #[test]
    fn pool_size_follows_max_open_conns() {
        let pool = create_pool(&local().max_open_conns(4)).unwrap();
        assert_eq!(pool.status().max_size, 4);

        let pool = create_pool(&local()).unwrap();
        assert_eq!(pool.status().max_size, DEFAULT_MAX_SIZE);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let err = create_pool(&Config::new()).unwrap_err();
        assert!(matches!(err, OrmError::Config(_)));
    }
}
