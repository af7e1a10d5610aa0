//! Durable certificate storage over SQLite.
//!
//! The store owns the `certificates` table and is the only component that
//! executes SQL. Uniqueness of `certificate_number` is enforced by a table
//! constraint, so insert-or-fail is a single atomic step even under
//! concurrent writers; there is no check-then-insert anywhere.

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};

use crate::domain::error::RegistryError;
use crate::domain::record::{CertificateRecord, ValidCertificate};
use crate::infra::config;

// AUTOINCREMENT keeps ids monotonically increasing and never reused, even
// after deletes.
const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS certificates (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    email TEXT NOT NULL,
    certificate_number TEXT NOT NULL UNIQUE,
    issued_date TEXT NOT NULL
)";

const COLUMNS: &str = "id, name, email, certificate_number, issued_date";

/// Handle to the certificates table. Cheap to clone; clones share the pool.
#[derive(Clone)]
pub struct CertificateStore {
    pool: SqlitePool,
}

impl CertificateStore {
    /// Opens the database named by `DATABASE_URL` and runs schema
    /// initialization.
    pub async fn connect_from_env() -> Result<Self, RegistryError> {
        dotenv::dotenv().ok();
        let database_url = config::database_url();
        Self::connect(&database_url).await
    }

    /// Opens (creating if missing) the database at `database_url` and runs
    /// schema initialization. This is the durable production path.
    pub async fn connect(database_url: &str) -> Result<Self, RegistryError> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(RegistryError::Storage)?
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;
        Self::with_pool(pool).await
    }

    /// Single-connection in-memory store. Nothing survives drop; meant for
    /// tests.
    pub async fn in_memory() -> Result<Self, RegistryError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        Self::with_pool(pool).await
    }

    async fn with_pool(pool: SqlitePool) -> Result<Self, RegistryError> {
        sqlx::query(SCHEMA).execute(&pool).await?;
        Ok(Self { pool })
    }

    /// Closes the connection pool, flushing outstanding work. Used by
    /// restart tests; dropping the store also releases the database.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Inserts a new record and returns it with its assigned id.
    ///
    /// A `certificate_number` collision surfaces as
    /// [`RegistryError::Duplicate`]; the insert and the uniqueness check are
    /// one atomic statement.
    pub async fn create(
        &self,
        cert: &ValidCertificate,
    ) -> Result<CertificateRecord, RegistryError> {
        let row = sqlx::query(
            "INSERT INTO certificates (name, email, certificate_number, issued_date)
             VALUES (?1, ?2, ?3, ?4)
             RETURNING id",
        )
        .bind(&cert.name)
        .bind(&cert.email)
        .bind(&cert.certificate_number)
        .bind(cert.issued_date)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, &cert.certificate_number))?;

        let id: i64 = row.try_get("id")?;
        Ok(record_with_id(id, cert))
    }

    pub async fn get_by_id(&self, id: i64) -> Result<CertificateRecord, RegistryError> {
        let row = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM certificates WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => record_from_row(&row),
            None => Err(RegistryError::NotFound),
        }
    }

    /// Exact, case-sensitive match on the normalized certificate number.
    /// Used exclusively by verification, hence `Option` instead of an error
    /// on miss.
    pub async fn get_by_certificate_number(
        &self,
        certificate_number: &str,
    ) -> Result<Option<CertificateRecord>, RegistryError> {
        let row = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM certificates WHERE certificate_number = ?1"
        ))
        .bind(certificate_number)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| record_from_row(&row)).transpose()
    }

    /// Full replacement of the four business fields; `id` never changes.
    ///
    /// Fails `Duplicate` when the new certificate_number belongs to a
    /// different record (the row's own number is not a collision).
    pub async fn update(
        &self,
        id: i64,
        cert: &ValidCertificate,
    ) -> Result<CertificateRecord, RegistryError> {
        let result = sqlx::query(
            "UPDATE certificates
             SET name = ?1, email = ?2, certificate_number = ?3, issued_date = ?4
             WHERE id = ?5",
        )
        .bind(&cert.name)
        .bind(&cert.email)
        .bind(&cert.certificate_number)
        .bind(cert.issued_date)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, &cert.certificate_number))?;

        if result.rows_affected() == 0 {
            return Err(RegistryError::NotFound);
        }
        Ok(record_with_id(id, cert))
    }

    pub async fn delete(&self, id: i64) -> Result<(), RegistryError> {
        let result = sqlx::query("DELETE FROM certificates WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RegistryError::NotFound);
        }
        Ok(())
    }

    /// All records in stable id-ascending order.
    pub async fn list_all(&self) -> Result<Vec<CertificateRecord>, RegistryError> {
        let rows = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM certificates ORDER BY id ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(record_from_row).collect()
    }
}

fn record_from_row(row: &SqliteRow) -> Result<CertificateRecord, RegistryError> {
    Ok(CertificateRecord {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        certificate_number: row.try_get("certificate_number")?,
        issued_date: row.try_get("issued_date")?,
    })
}

fn record_with_id(id: i64, cert: &ValidCertificate) -> CertificateRecord {
    CertificateRecord {
        id,
        name: cert.name.clone(),
        email: cert.email.clone(),
        certificate_number: cert.certificate_number.clone(),
        issued_date: cert.issued_date,
    }
}

fn map_write_error(err: sqlx::Error, certificate_number: &str) -> RegistryError {
    match err.as_database_error() {
        Some(db) if db.is_unique_violation() => RegistryError::Duplicate {
            certificate_number: certificate_number.to_string(),
        },
        _ => RegistryError::Storage(err),
    }
}
