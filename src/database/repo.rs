use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::{params, Connection};

use crate::database::schema::{self, is_catalog_table};

#[derive(Debug, Clone, PartialEq)]
pub struct ChromaticityRow {
    pub rx: f64,
    pub ry: f64,
    pub gx: f64,
    pub gy: f64,
    pub bx: f64,
    pub by: f64,
    pub wx: f64,
    pub wy: f64,
}

impl From<[f64; 8]> for ChromaticityRow {
    fn from(v: [f64; 8]) -> Self {
        Self {
            rx: v[0],
            ry: v[1],
            gx: v[2],
            gy: v[3],
            bx: v[4],
            by: v[5],
            wx: v[6],
            wy: v[7],
        }
    }
}

/// Decoded value, one variant per value table.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    Int(i32),
    Rational { numerator: i32, denominator: u32 },
    Real(f64),
    Text(String),
    Chromaticity(ChromaticityRow),
}

impl TypedValue {
    pub fn table(&self) -> &'static str {
        match self {
            TypedValue::Int(_) => "int_values",
            TypedValue::Rational { .. } => "rational_values",
            TypedValue::Real(_) => "real_values",
            TypedValue::Text(_) => "string_values",
            TypedValue::Chromaticity(_) => "chromaticity_values",
        }
    }
}

/// One `attrs` row plus the value row that goes with it.
#[derive(Debug, Clone, PartialEq)]
pub struct AttrRecord {
    pub full_path: String,
    pub name: String,
    pub canonical_name: Option<String>,
    pub type_name: &'static str,
    pub aggregate: &'static str,
    pub vec_semantics: &'static str,
    pub count: u32,
    pub value: TypedValue,
}

pub struct CatalogStore {
    conn: Connection,
}

impl CatalogStore {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database {:?}", path))?;
        Self::with_connection(conn)
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        schema::ensure_schema(&conn).context("Failed to initialize schema")?;
        Ok(Self { conn })
    }

    pub fn ensure_schema(&self) -> rusqlite::Result<()> {
        schema::ensure_schema(&self.conn)
    }

    /// Writes the records in a single transaction. If any insert fails none
    /// of them are kept.
    pub fn write(&mut self, records: &[AttrRecord]) -> rusqlite::Result<()> {
        if records.is_empty() {
            return Ok(());
        }

        let tx = self.conn.transaction()?;

        {
            let mut stmt_attr = tx.prepare_cached(
                "INSERT INTO attrs (full_path, name, canonical_name, type, aggregate, vec_semantics, count)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;

            let mut stmt_int = tx.prepare_cached(
                "INSERT INTO int_values (full_path, name, quantity) VALUES (?1, ?2, ?3)",
            )?;

            let mut stmt_rational = tx.prepare_cached(
                "INSERT INTO rational_values (full_path, name, quantity_numerator, quantity_denominator)
                 VALUES (?1, ?2, ?3, ?4)",
            )?;

            let mut stmt_real = tx.prepare_cached(
                "INSERT INTO real_values (full_path, name, quantity) VALUES (?1, ?2, ?3)",
            )?;

            let mut stmt_string = tx.prepare_cached(
                "INSERT INTO string_values (full_path, name, string) VALUES (?1, ?2, ?3)",
            )?;

            let mut stmt_chromaticity = tx.prepare_cached(
                "INSERT INTO chromaticity_values (full_path, name, rx, ry, gx, gy, bx, \"by\", wx, wy)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            )?;

            for record in records {
                stmt_attr.execute(params![
                    record.full_path,
                    record.name,
                    record.canonical_name,
                    record.type_name,
                    record.aggregate,
                    record.vec_semantics,
                    record.count,
                ])?;

                let (path, name) = (&record.full_path, &record.name);
                match &record.value {
                    TypedValue::Int(quantity) => stmt_int.execute(params![path, name, quantity])?,
                    TypedValue::Rational {
                        numerator,
                        denominator,
                    } => stmt_rational.execute(params![path, name, numerator, denominator])?,
                    TypedValue::Real(quantity) => stmt_real.execute(params![path, name, quantity])?,
                    TypedValue::Text(text) => stmt_string.execute(params![path, name, text])?,
                    TypedValue::Chromaticity(c) => stmt_chromaticity.execute(params![
                        path, name, c.rx, c.ry, c.gx, c.gy, c.bx, c.by, c.wx, c.wy
                    ])?,
                };
            }
        }

        tx.commit()
    }

    pub fn row_count(&self, table: &str) -> rusqlite::Result<i64> {
        if !is_catalog_table(table) {
            return Err(rusqlite::Error::InvalidParameterName(table.to_string()));
        }
        self.conn
            .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| row.get(0))
    }

    #[cfg(test)]
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}
