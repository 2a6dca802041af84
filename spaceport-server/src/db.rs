//! Database connection pool and the PostgreSQL ship repository.

use std::error::Error;

use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager, PooledConnection};
use diesel::result::OptionalExtension;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use log::info;
use spaceport_core::{NewShip, Result, Ship, ShipRepository, SpaceportError};

use crate::models::{NewShipRecord, ShipRecord};
use crate::schema::ships;

/// Pooled PostgreSQL connections for the Spaceport server.
pub type DbPool = r2d2::Pool<ConnectionManager<PgConnection>>;

type PooledPg = PooledConnection<ConnectionManager<PgConnection>>;

/// Embedded Diesel migrations.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Initialize the database pool and apply pending migrations.
pub fn init_pool(database_url: &str) -> std::result::Result<DbPool, Box<dyn Error + Send + Sync>> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    let pool = r2d2::Pool::builder().build(manager)?;
    run_migrations(&pool)?;
    Ok(pool)
}

/// Run pending Diesel migrations.
pub fn run_migrations(pool: &DbPool) -> std::result::Result<(), Box<dyn Error + Send + Sync>> {
    let mut conn = pool.get()?;
    let applied = conn.run_pending_migrations(MIGRATIONS)?;
    info!("applied {} pending migration(s)", applied.len());
    Ok(())
}

fn storage_error(err: impl std::fmt::Display) -> SpaceportError {
    SpaceportError::Storage(err.to_string())
}

/// Ship repository backed by the `ships` table.
#[derive(Clone)]
pub struct PgShipRepository {
    pool: DbPool,
}

impl PgShipRepository {
    /// Wrap a connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> Result<PooledPg> {
        self.pool.get().map_err(storage_error)
    }
}

impl ShipRepository for PgShipRepository {
    fn find_all(&self) -> Result<Vec<Ship>> {
        let mut conn = self.conn()?;
        let records = ships::table
            .order(ships::id.asc())
            .select(ShipRecord::as_select())
            .load(&mut conn)
            .map_err(storage_error)?;
        records.into_iter().map(Ship::try_from).collect()
    }

    fn find_by_id(&self, id: i64) -> Result<Option<Ship>> {
        let mut conn = self.conn()?;
        let record = ships::table
            .find(id)
            .select(ShipRecord::as_select())
            .first(&mut conn)
            .optional()
            .map_err(storage_error)?;
        record.map(Ship::try_from).transpose()
    }

    fn insert(&self, ship: NewShip) -> Result<Ship> {
        let mut conn = self.conn()?;
        let record = diesel::insert_into(ships::table)
            .values(NewShipRecord::from(ship))
            .returning(ShipRecord::as_returning())
            .get_result(&mut conn)
            .map_err(storage_error)?;
        Ship::try_from(record)
    }

    fn replace(&self, ship: &Ship) -> Result<Ship> {
        let mut conn = self.conn()?;
        let record = ShipRecord::from(ship);
        let updated = diesel::update(ships::table.find(ship.id))
            .set(&record)
            .returning(ShipRecord::as_returning())
            .get_result(&mut conn)
            .optional()
            .map_err(storage_error)?;
        match updated {
            Some(record) => Ship::try_from(record),
            None => Err(SpaceportError::NotFound(ship.id)),
        }
    }

    fn delete(&self, id: i64) -> Result<()> {
        let mut conn = self.conn()?;
        let deleted = diesel::delete(ships::table.find(id))
            .execute(&mut conn)
            .map_err(storage_error)?;
        if deleted == 0 {
            return Err(SpaceportError::NotFound(id));
        }
        Ok(())
    }
}

#[cfg(test)]
fn split_database_url(database_url: &str) -> (String, String) {
    let (url_base, query) = database_url.split_once('?').unwrap_or((database_url, ""));
    let (base, _db_name) = url_base
        .rsplit_once('/')
        .expect("database URL must include a database name");
    let query_suffix = if query.is_empty() {
        String::new()
    } else {
        format!("?{query}")
    };
    (base.to_string(), query_suffix)
}

#[cfg(test)]
/// A temporary PostgreSQL database for tests.
pub(crate) struct TestDatabase {
    database_url: String,
    admin_url: String,
    db_name: String,
    pool: Option<DbPool>,
}

#[cfg(test)]
impl TestDatabase {
    /// Create a new isolated test database using `TEST_DATABASE_URL`.
    pub(crate) fn new() -> Self {
        use diesel::Connection;

        let base_url = std::env::var("TEST_DATABASE_URL")
            .expect("set TEST_DATABASE_URL to run PostgreSQL tests");
        let (base, query_suffix) = split_database_url(&base_url);
        let db_name = format!("spaceport_test_{}", uuid::Uuid::new_v4().simple());
        let admin_url = format!("{}/postgres{}", base, query_suffix);
        let database_url = format!("{}/{}{}", base, db_name, query_suffix);

        let mut admin_conn = PgConnection::establish(&admin_url).expect("connect admin database");
        diesel::sql_query(format!("CREATE DATABASE \"{db_name}\""))
            .execute(&mut admin_conn)
            .expect("create test database");

        Self {
            database_url,
            admin_url,
            db_name,
            pool: None,
        }
    }

    /// Return the test database URL.
    pub(crate) fn database_url(&self) -> &str {
        &self.database_url
    }

    /// Get a pooled connection for the test database (runs migrations once).
    pub(crate) fn pool(&mut self) -> DbPool {
        if self.pool.is_none() {
            let manager = ConnectionManager::<PgConnection>::new(self.database_url.clone());
            let pool = r2d2::Pool::builder()
                .max_size(1)
                .build(manager)
                .expect("pool");
            run_migrations(&pool).expect("run migrations");
            self.pool = Some(pool);
        }
        self.pool.as_ref().expect("pool").clone()
    }
}

#[cfg(test)]
impl Drop for TestDatabase {
    fn drop(&mut self) {
        use diesel::Connection;

        let _ = self.pool.take();
        if let Ok(mut conn) = PgConnection::establish(&self.admin_url) {
            let escaped = self.db_name.replace('\'', "''");
            let _ = diesel::sql_query(format!(
                "SELECT pg_terminate_backend(pid) \
                 FROM pg_stat_activity \
                 WHERE datname = '{escaped}' AND pid <> pg_backend_pid()"
            ))
            .execute(&mut conn);
            let _ = diesel::sql_query(format!("DROP DATABASE IF EXISTS \"{}\"", self.db_name))
                .execute(&mut conn);
        }
    }
}
