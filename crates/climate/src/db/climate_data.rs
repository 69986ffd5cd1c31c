use async_trait::async_trait;
use log::{debug, warn};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteConnection},
    ConnectOptions, Connection,
};

use super::{parse_stored_date, schema, Observation, Station};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Failed to query climate store: {0}")]
    Query(#[from] sqlx::Error),
    #[error("Stored date '{0}' is not a valid YYYY-MM-DD date")]
    MalformedDate(String),
    #[error("Table '{table}' is missing columns: {}", .columns.join(", "))]
    Schema {
        table: &'static str,
        columns: Vec<&'static str>,
    },
}

#[async_trait]
pub trait ClimateData: Sync + Send {
    /// Every row of the `measurement` table ordered by date.
    async fn observations(&self) -> Result<Vec<Observation>, Error>;
    /// Every row of the `station` table in store order.
    async fn stations(&self) -> Result<Vec<Station>, Error>;
}

/// Read-only access to the SQLite climate dataset.
pub struct ClimateAccess {
    options: SqliteConnectOptions,
}

#[derive(sqlx::FromRow)]
struct MeasurementRow {
    station: String,
    date: String,
    prcp: Option<f64>,
    tobs: Option<f64>,
}

impl TryFrom<MeasurementRow> for Observation {
    type Error = Error;

    fn try_from(row: MeasurementRow) -> Result<Self, Self::Error> {
        let date = parse_stored_date(&row.date).ok_or(Error::MalformedDate(row.date))?;
        Ok(Observation {
            station_id: row.station,
            date,
            temperature_observed: row.tobs,
            precipitation: row.prcp,
        })
    }
}

impl ClimateAccess {
    pub fn new(database_path: &str) -> Self {
        let options = SqliteConnectOptions::new()
            .filename(database_path)
            .read_only(true)
            .create_if_missing(false);
        Self { options }
    }

    /// Opens a fresh connection for a single request. Nothing is pooled, so
    /// concurrent requests never share a connection.
    pub async fn open_connection(&self) -> Result<SqliteConnection, sqlx::Error> {
        self.options.connect().await
    }

    /// Checks that the declared tables and columns exist.
    pub async fn verify_schema(&self) -> Result<(), Error> {
        let mut conn = self.open_connection().await?;
        let result = check_tables(&mut conn).await;
        release(conn).await;
        result
    }
}

async fn check_tables(conn: &mut SqliteConnection) -> Result<(), Error> {
    for table in &schema::TABLES {
        let found: Vec<String> = sqlx::query_scalar(schema::TABLE_COLUMNS)
            .bind(table.name)
            .fetch_all(&mut *conn)
            .await?;
        let missing = table.missing_columns(&found);
        if !missing.is_empty() {
            return Err(Error::Schema {
                table: table.name,
                columns: missing,
            });
        }
    }
    debug!("climate store matches schema v{}", schema::SCHEMA_VERSION);
    Ok(())
}

async fn release(conn: SqliteConnection) {
    if let Err(e) = conn.close().await {
        warn!("error closing climate store connection: {}", e);
    }
}

#[async_trait]
impl ClimateData for ClimateAccess {
    async fn observations(&self) -> Result<Vec<Observation>, Error> {
        let mut conn = self.open_connection().await?;
        let rows = sqlx::query_as::<_, MeasurementRow>(schema::SELECT_OBSERVATIONS)
            .fetch_all(&mut conn)
            .await;
        release(conn).await;

        let observations = rows?
            .into_iter()
            .map(Observation::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        debug!("loaded {} observations", observations.len());
        Ok(observations)
    }

    async fn stations(&self) -> Result<Vec<Station>, Error> {
        let mut conn = self.open_connection().await?;
        let rows = sqlx::query_as::<_, Station>(schema::SELECT_STATIONS)
            .fetch_all(&mut conn)
            .await;
        release(conn).await;

        let stations = rows?;
        debug!("loaded {} stations", stations.len());
        Ok(stations)
    }
}
