use crate::domain::model::{QueryRow, Record, SqlValue};
use crate::domain::ports::{QueryRunner, Sink};
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::validate_identifier;
use rusqlite::{params, types::Value, Connection};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

const SINK_NAME: &str = "sqlite";

/// Owns the single connection used for the table replace and the report queries.
/// A file-backed store connects on first use, so nothing is created on disk
/// until the table is loaded.
pub struct SqliteStore {
    path: Option<PathBuf>,
    conn: Mutex<Option<Connection>>,
    table: String,
}

impl SqliteStore {
    pub fn open(path: impl AsRef<Path>, table: &str) -> Result<Self> {
        validate_identifier("load.table_name", table)?;
        Ok(Self {
            path: Some(path.as_ref().to_path_buf()),
            conn: Mutex::new(None),
            table: table.to_string(),
        })
    }

    pub fn open_in_memory(table: &str) -> Result<Self> {
        validate_identifier("load.table_name", table)?;
        Ok(Self {
            path: None,
            conn: Mutex::new(Some(Connection::open_in_memory()?)),
            table: table.to_string(),
        })
    }

    fn connect(&self) -> Result<Connection> {
        match &self.path {
            Some(path) => {
                tracing::debug!("Opening SQLite database at {}", path.display());
                Ok(Connection::open(path)?)
            }
            None => Ok(Connection::open_in_memory()?),
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    fn lock(&self) -> Result<MutexGuard<'_, Option<Connection>>> {
        self.conn.lock().map_err(|_| EtlError::ProcessingError {
            message: "sqlite connection lock poisoned".to_string(),
        })
    }

    fn with_connection<T>(&self, f: impl FnOnce(&mut Connection) -> Result<T>) -> Result<T> {
        let mut guard = self.lock()?;
        let conn = match guard.take() {
            Some(conn) => conn,
            None => self.connect()?,
        };
        f(guard.insert(conn))
    }

    /// Drops any existing table of the same name and bulk-inserts `records`.
    fn replace_table(&self, records: &[Record]) -> Result<usize> {
        self.with_connection(|conn| Self::write_table(conn, &self.table, records))
    }

    fn write_table(conn: &mut Connection, table: &str, records: &[Record]) -> Result<usize> {
        let tx = conn.transaction()?;
        tx.execute_batch(&format!(
            "DROP TABLE IF EXISTS \"{table}\";
             CREATE TABLE \"{table}\" (
                 \"Name\"           TEXT,
                 \"MC_USD_Billion\" REAL,
                 \"MC_GBP_Billion\" REAL,
                 \"MC_EUR_Billion\" REAL,
                 \"MC_INR_Billion\" REAL
             );"
        ))?;

        let mut count = 0;
        {
            let mut stmt = tx.prepare(&format!(
                "INSERT INTO \"{table}\" ({}) VALUES (?1, ?2, ?3, ?4, ?5)",
                Record::COLUMNS
                    .iter()
                    .map(|c| format!("\"{c}\""))
                    .collect::<Vec<_>>()
                    .join(", ")
            ))?;
            for r in records {
                count += stmt.execute(params![
                    r.name,
                    r.mc_usd_billion,
                    r.mc_gbp_billion,
                    r.mc_eur_billion,
                    r.mc_inr_billion
                ])?;
            }
        }
        tx.commit()?;
        Ok(count)
    }
}

impl From<Value> for SqlValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => SqlValue::Null,
            Value::Integer(i) => SqlValue::Integer(i),
            Value::Real(r) => SqlValue::Real(r),
            Value::Text(s) => SqlValue::Text(s),
            Value::Blob(b) => SqlValue::Blob(b),
        }
    }
}

#[async_trait::async_trait]
impl Sink for SqliteStore {
    async fn store(&self, records: &[Record]) -> Result<String> {
        let inserted = self
            .replace_table(records)
            .map_err(|e| EtlError::sink(SINK_NAME, e))?;
        tracing::debug!("Inserted {} rows into {}", inserted, self.table);
        Ok(self.table.clone())
    }
}

impl QueryRunner for SqliteStore {
    fn run_query(&self, statement: &str) -> Result<Vec<QueryRow>> {
        self.with_connection(|conn| {
            let mut stmt = conn.prepare(statement)?;
            let columns = stmt.column_count();

            let rows = stmt
                .query_map([], |row| {
                    (0..columns)
                        .map(|i| row.get::<_, Value>(i).map(SqlValue::from))
                        .collect::<rusqlite::Result<Vec<_>>>()
                        .map(QueryRow)
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(rows)
        })
    }

    fn close(self) -> Result<()> {
        let conn = self.conn.into_inner().map_err(|_| EtlError::ProcessingError {
            message: "sqlite connection lock poisoned".to_string(),
        })?;
        match conn {
            Some(conn) => conn.close().map_err(|(_, e)| EtlError::DatabaseError(e)),
            None => Ok(()),
        }
    }
}
