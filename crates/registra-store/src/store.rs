//! SQLite store for Registra.
//!
//! A single `RegistryStore` owns the connection; entity operations live in
//! the per-entity modules (`users`, `catalog`, `offerings`, ...) as free
//! functions over `&Connection` so callers can compose several of them
//! inside one transaction via [`RegistryStore::with_transaction`].

use std::path::Path;
use std::sync::Mutex;

use rusqlite::{Connection, OpenFlags};
use tracing::{debug, info};

use crate::error::{Result, StoreError};

/// Current schema version.
const SCHEMA_VERSION: i32 = 1;

/// Registry store backed by SQLite.
///
/// Uses WAL mode for better concurrent read performance. All writes are
/// serialized through the internal mutex; multi-statement operations must go
/// through [`RegistryStore::with_transaction`] so failures roll back cleanly.
pub struct RegistryStore {
    conn: Mutex<Connection>,
}

impl std::fmt::Debug for RegistryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryStore").finish_non_exhaustive()
    }
}

impl RegistryStore {
    /// Open or create a store at the given path.
    ///
    /// Creates the database file and initializes the schema if needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|_| {
                    StoreError::Database(rusqlite::Error::InvalidPath(path.to_path_buf()))
                })?;
            }
        }

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_FULL_MUTEX,
        )?;

        let store = Self {
            conn: Mutex::new(conn),
        };
        store.initialize(true)?;

        info!("Registry store opened at {:?}", path);
        Ok(store)
    }

    /// Create an in-memory store (useful for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.initialize(false)?;

        debug!("In-memory registry store created");
        Ok(store)
    }

    fn initialize(&self, wal: bool) -> Result<()> {
        let conn = self.conn.lock().unwrap();

        if wal {
            conn.pragma_update(None, "journal_mode", "WAL")?;
            conn.pragma_update(None, "synchronous", "NORMAL")?;
        }
        conn.pragma_update(None, "foreign_keys", "ON")?;

        self.create_schema(&conn)?;
        Ok(())
    }

    fn create_schema(&self, conn: &Connection) -> Result<()> {
        let current_version: i32 = conn
            .pragma_query_value(None, "user_version", |row| row.get(0))
            .unwrap_or(0);

        if current_version >= SCHEMA_VERSION {
            debug!("Schema up to date (version {})", current_version);
            return Ok(());
        }

        info!(
            "Migrating schema from version {} to {}",
            current_version, SCHEMA_VERSION
        );

        conn.execute_batch(
            r#"
            -- Account holders; role is immutable after creation
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT NOT NULL UNIQUE,
                role TEXT NOT NULL,
                api_token TEXT NOT NULL UNIQUE,
                created_at TEXT NOT NULL
            );

            -- Student profiles; advisor set only via advisor assignment
            CREATE TABLE IF NOT EXISTS students (
                user_id TEXT PRIMARY KEY REFERENCES users(id),
                entry_number TEXT NOT NULL UNIQUE,
                department TEXT NOT NULL,
                batch_year INTEGER NOT NULL,
                advisor_id TEXT REFERENCES users(id)
            );

            CREATE INDEX IF NOT EXISTS idx_students_advisor
                ON students(advisor_id);

            CREATE TABLE IF NOT EXISTS faculty (
                user_id TEXT PRIMARY KEY REFERENCES users(id),
                department TEXT NOT NULL,
                designation TEXT NOT NULL
            );

            -- Reference data; never mutated after creation
            CREATE TABLE IF NOT EXISTS semesters (
                code TEXT PRIMARY KEY,
                year INTEGER NOT NULL,
                term TEXT NOT NULL,
                start_date TEXT NOT NULL,
                end_date TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS course_catalog (
                code TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                ltp TEXT NOT NULL,
                credits REAL NOT NULL
            );

            -- Batch/department lists are stored as JSON arrays
            CREATE TABLE IF NOT EXISTS course_offerings (
                id TEXT PRIMARY KEY,
                course_code TEXT NOT NULL REFERENCES course_catalog(code),
                semester_code TEXT NOT NULL REFERENCES semesters(code),
                instructor_id TEXT NOT NULL REFERENCES users(id),
                slot TEXT NOT NULL,
                seat_limit INTEGER NOT NULL,
                status TEXT NOT NULL,
                allowed_batches TEXT NOT NULL DEFAULT '[]',
                allowed_departments TEXT NOT NULL DEFAULT '[]',
                core_batches TEXT NOT NULL DEFAULT '[]',
                core_departments TEXT NOT NULL DEFAULT '[]',
                created_at TEXT NOT NULL,
                UNIQUE(course_code, semester_code, instructor_id)
            );

            CREATE INDEX IF NOT EXISTS idx_offerings_instructor
                ON course_offerings(instructor_id);

            CREATE INDEX IF NOT EXISTS idx_offerings_status
                ON course_offerings(status);

            -- One enrollment record per (student, offering)
            CREATE TABLE IF NOT EXISTS enrollments (
                id TEXT PRIMARY KEY,
                student_id TEXT NOT NULL REFERENCES users(id),
                offering_id TEXT NOT NULL REFERENCES course_offerings(id),
                status TEXT NOT NULL,
                category TEXT NOT NULL,
                grade TEXT,
                created_at TEXT NOT NULL,
                UNIQUE(student_id, offering_id)
            );

            CREATE INDEX IF NOT EXISTS idx_enrollments_student
                ON enrollments(student_id);

            CREATE INDEX IF NOT EXISTS idx_enrollments_offering
                ON enrollments(offering_id);

            -- Row presence is the fee-paid signal; one payment per semester
            CREATE TABLE IF NOT EXISTS fee_payments (
                student_id TEXT NOT NULL REFERENCES users(id),
                semester_code TEXT NOT NULL REFERENCES semesters(code),
                amount INTEGER NOT NULL,
                transaction_ref TEXT NOT NULL,
                paid_at TEXT NOT NULL,
                PRIMARY KEY (student_id, semester_code)
            );
            "#,
        )?;

        conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;

        info!("Schema created (version {})", SCHEMA_VERSION);
        Ok(())
    }

    /// Run a read-only (or single-statement) operation against the
    /// connection.
    pub fn with_conn<T, E, F>(&self, f: F) -> std::result::Result<T, E>
    where
        F: FnOnce(&Connection) -> std::result::Result<T, E>,
    {
        let conn = self.conn.lock().unwrap();
        f(&conn)
    }

    /// Execute a function within a transaction.
    ///
    /// All operations within the closure are executed atomically: if the
    /// closure returns an error the transaction is rolled back on drop.
    /// The error type only needs a `From<StoreError>` impl so domain layers
    /// can mix their own guard failures with store failures in one closure.
    pub fn with_transaction<T, E, F>(&self, f: F) -> std::result::Result<T, E>
    where
        F: FnOnce(&Connection) -> std::result::Result<T, E>,
        E: From<StoreError>,
    {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction().map_err(StoreError::Database)?;

        match f(&tx) {
            Ok(result) => {
                tx.commit().map_err(StoreError::Database)?;
                Ok(result)
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::params;

    #[test]
    fn test_open_in_memory() {
        let store = RegistryStore::open_in_memory().unwrap();
        let count: i64 = store
            .with_conn(|conn| {
                conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
                    .map_err(StoreError::Database)
            })
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_open_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("registry.db");
        let store = RegistryStore::open(&path).unwrap();
        drop(store);

        // Reopening keeps the schema version without re-migrating
        let store = RegistryStore::open(&path).unwrap();
        let version: i32 = store
            .with_conn(|conn| {
                conn.pragma_query_value(None, "user_version", |row| row.get(0))
                    .map_err(StoreError::Database)
            })
            .unwrap();
        assert_eq!(version, SCHEMA_VERSION);
    }

    #[test]
    fn test_transaction_rolls_back_on_error() {
        let store = RegistryStore::open_in_memory().unwrap();

        let result: Result<()> = store.with_transaction(|conn| {
            conn.execute(
                "INSERT INTO semesters (code, year, term, start_date, end_date)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params!["2026-W", 2026, "Winter", "2026-01-01", "2026-05-15"],
            )?;
            Err(StoreError::InvalidData("forced failure".to_string()))
        });
        assert!(result.is_err());

        let count: i64 = store
            .with_conn(|conn| {
                conn.query_row("SELECT COUNT(*) FROM semesters", [], |row| row.get(0))
                    .map_err(StoreError::Database)
            })
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_transaction_commits_on_success() {
        let store = RegistryStore::open_in_memory().unwrap();

        store
            .with_transaction(|conn| {
                conn.execute(
                    "INSERT INTO semesters (code, year, term, start_date, end_date)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                    params!["2026-W", 2026, "Winter", "2026-01-01", "2026-05-15"],
                )
                .map_err(StoreError::Database)?;
                Ok::<_, StoreError>(())
            })
            .unwrap();

        let count: i64 = store
            .with_conn(|conn| {
                conn.query_row("SELECT COUNT(*) FROM semesters", [], |row| row.get(0))
                    .map_err(StoreError::Database)
            })
            .unwrap();
        assert_eq!(count, 1);
    }
}
