//! Declared layout of the climate dataset.
//!
//! The service never migrates or reflects the database. It expects these two
//! tables and checks for them once at startup.

/// Bumped whenever the expected tables or columns change.
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSchema {
    pub name: &'static str,
    pub columns: &'static [&'static str],
}

impl TableSchema {
    /// Columns this table requires that are absent from `found`.
    pub fn missing_columns(&self, found: &[String]) -> Vec<&'static str> {
        self.columns
            .iter()
            .copied()
            .filter(|column| !found.iter().any(|f| f.eq_ignore_ascii_case(column)))
            .collect()
    }
}

pub const MEASUREMENT: TableSchema = TableSchema {
    name: "measurement",
    columns: &["id", "station", "date", "prcp", "tobs"],
};

pub const STATION: TableSchema = TableSchema {
    name: "station",
    columns: &["id", "station", "name", "latitude", "longitude", "elevation"],
};

pub const TABLES: [TableSchema; 2] = [MEASUREMENT, STATION];

pub const TABLE_COLUMNS: &str = "SELECT name FROM pragma_table_info(?)";

// Numeric columns are cast so integer-typed values decode as f64.
pub const SELECT_OBSERVATIONS: &str = r#"
    SELECT
        station,
        date,
        CAST(prcp AS REAL) AS prcp,
        CAST(tobs AS REAL) AS tobs
    FROM measurement
    ORDER BY date, id
"#;

pub const SELECT_STATIONS: &str = r#"
    SELECT
        id,
        station,
        name,
        CAST(latitude AS REAL) AS latitude,
        CAST(longitude AS REAL) AS longitude,
        CAST(elevation AS REAL) AS elevation
    FROM station
"#;
