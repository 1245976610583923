//! Database connection pool and embedded migrations.

mod pool;

pub use pool::{
    AsyncDbPool, DbConnection, MIGRATIONS, MigrationAction, MigrationReport,
    establish_async_connection_pool, get_connection, run_migrations,
};
