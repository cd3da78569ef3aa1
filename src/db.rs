use std::future::Future;
use std::time::Duration;

use diesel::connection::SimpleConnection;
use diesel::query_dsl::methods::ExecuteDsl;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::sqlite::SqliteConnection;
use diesel::{QueryResult, RunQueryDsl};
use tracing::warn;

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;

/// How many times a write is attempted while SQLite reports the database as locked
const MAX_WRITE_ATTEMPTS: u32 = 5;

/// Applies the per-connection pragmas every pooled connection needs
///
/// SQLite only enforces foreign keys when asked to, and the setting is per
/// connection, so it has to be applied on acquire rather than in a migration.
#[derive(Debug, Clone, Copy)]
struct ConnectionPragmas;

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for ConnectionPragmas {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        conn.batch_execute("PRAGMA foreign_keys = ON; PRAGMA busy_timeout = 5000;")
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

/// Creates a connection pool for the given database URL
pub fn init_pool(database_url: &str) -> anyhow::Result<DbPool> {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    let pool = Pool::builder()
        .connection_customizer(Box::new(ConnectionPragmas))
        .build(manager)?;
    Ok(pool)
}

/// Returns true if the error is SQLite refusing a write because another
/// connection holds the lock
fn is_locked_error(err: &DieselError) -> bool {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::Unknown, info) => {
            let message = info.message();
            message.contains("database is locked") || message.contains("database table is locked")
        }
        _ => false,
    }
}

/// Executes a write statement, retrying with a short backoff while the
/// database is locked by another writer
pub trait ExecuteWithRetry {
    fn execute_with_retry(
        self,
        conn: &mut SqliteConnection,
    ) -> impl Future<Output = QueryResult<usize>> + Send;
}

impl<T> ExecuteWithRetry for T
where
    T: RunQueryDsl<SqliteConnection> + ExecuteDsl<SqliteConnection> + Clone + Send,
{
    fn execute_with_retry(
        self,
        conn: &mut SqliteConnection,
    ) -> impl Future<Output = QueryResult<usize>> + Send {
        async move {
            let mut attempt = 1;
            loop {
                match self.clone().execute(conn) {
                    Err(err) if is_locked_error(&err) && attempt < MAX_WRITE_ATTEMPTS => {
                        warn!("Database locked on attempt {}, retrying", attempt);
                        tokio::time::sleep(Duration::from_millis(50 * u64::from(attempt))).await;
                        attempt += 1;
                    }
                    result => return result,
                }
            }
        }
    }
}
