pub mod climate_data;
pub mod schema;

pub use climate_data::{ClimateAccess, ClimateData};

use serde::{Deserialize, Serialize};
use time::{macros::format_description, Date};
use utoipa::ToSchema;

/// One daily reading from the `measurement` table.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub station_id: String,
    pub date: Date,
    pub temperature_observed: Option<f64>,
    pub precipitation: Option<f64>,
}

impl Observation {
    /// The temperature paired with its date, `None` when the reading is missing.
    pub fn temperature(&self) -> Option<(Date, f64)> {
        self.temperature_observed.map(|value| (self.date, value))
    }
}

/// Station metadata, serialized with the dataset's own column names.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, sqlx::FromRow, ToSchema)]
pub struct Station {
    pub id: i64,
    /// Station code, e.g. `USC00519281`
    #[serde(rename = "station")]
    #[sqlx(rename = "station")]
    pub code: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: f64,
}

/// Parses a stored `measurement.date` value.
///
/// Anything after the first ten characters (a time of day) is dropped before parsing.
pub fn parse_stored_date(value: &str) -> Option<Date> {
    let format = format_description!("[year]-[month]-[day]");
    let day = value.trim().get(..10)?;
    Date::parse(day, &format).ok()
}
