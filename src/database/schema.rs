use rusqlite::Connection;

pub struct TableDef {
    pub name: &'static str,
    pub columns: &'static str,
}

/// Catalog tables. Rows are append-only and keyed by (full_path, name)
/// without a uniqueness constraint.
pub const TABLES: &[TableDef] = &[
    TableDef {
        name: "attrs",
        columns: "full_path TEXT NOT NULL,
                  name TEXT NOT NULL,
                  canonical_name TEXT,
                  type TEXT NOT NULL,
                  aggregate TEXT NOT NULL,
                  vec_semantics TEXT NOT NULL,
                  count INTEGER NOT NULL",
    },
    TableDef {
        name: "int_values",
        columns: "full_path TEXT NOT NULL,
                  name TEXT NOT NULL,
                  quantity INTEGER NOT NULL",
    },
    TableDef {
        name: "rational_values",
        columns: "full_path TEXT NOT NULL,
                  name TEXT NOT NULL,
                  quantity_numerator INTEGER NOT NULL,
                  quantity_denominator INTEGER NOT NULL",
    },
    TableDef {
        name: "real_values",
        columns: "full_path TEXT NOT NULL,
                  name TEXT NOT NULL,
                  quantity REAL NOT NULL",
    },
    TableDef {
        name: "string_values",
        columns: "full_path TEXT NOT NULL,
                  name TEXT NOT NULL,
                  string TEXT NOT NULL",
    },
    TableDef {
        name: "chromaticity_values",
        columns: "full_path TEXT NOT NULL,
                  name TEXT NOT NULL,
                  rx REAL NOT NULL, ry REAL NOT NULL,
                  gx REAL NOT NULL, gy REAL NOT NULL,
                  bx REAL NOT NULL, \"by\" REAL NOT NULL,
                  wx REAL NOT NULL, wy REAL NOT NULL",
    },
];

pub fn is_catalog_table(name: &str) -> bool {
    TABLES.iter().any(|table| table.name == name)
}

/// Creates any missing catalog table. Safe to run on every startup.
pub fn ensure_schema(conn: &Connection) -> rusqlite::Result<()> {
    for table in TABLES {
        conn.execute(
            &format!("CREATE TABLE IF NOT EXISTS {} ({})", table.name, table.columns),
            [],
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_names(conn: &Connection) -> rusqlite::Result<Vec<String>> {
        let mut stmt =
            conn.prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")?;
        let names = stmt.query_map([], |row| row.get(0))?;
        names.collect()
    }

    #[test]
    fn test_ensure_schema_twice_is_harmless() -> rusqlite::Result<()> {
        let conn = Connection::open_in_memory()?;
        ensure_schema(&conn)?;
        ensure_schema(&conn)?;

        let names = table_names(&conn)?;
        assert_eq!(
            names,
            [
                "attrs",
                "chromaticity_values",
                "int_values",
                "rational_values",
                "real_values",
                "string_values"
            ]
        );
        Ok(())
    }

    #[test]
    fn test_ensure_schema_keeps_existing_rows() -> rusqlite::Result<()> {
        let conn = Connection::open_in_memory()?;
        ensure_schema(&conn)?;
        conn.execute(
            "INSERT INTO int_values (full_path, name, quantity) VALUES ('/a.exr', 'n', 1)",
            [],
        )?;
        ensure_schema(&conn)?;

        let count: i64 = conn.query_row("SELECT COUNT(*) FROM int_values", [], |row| row.get(0))?;
        assert_eq!(count, 1);
        Ok(())
    }

    #[test]
    fn test_is_catalog_table() {
        assert!(is_catalog_table("real_values"));
        assert!(!is_catalog_table("sqlite_master"));
    }
}
