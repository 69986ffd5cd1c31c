pub mod aggregate;
pub mod db;
pub mod routes;
mod startup;
mod utils;

pub use aggregate::{
    busiest_station, last_twelve_months, one_year_prior, summarize_range, DailyTemperature,
    DateAggregate, DateRange, TemperatureSummary,
};
pub use db::{climate_data, ClimateAccess, ClimateData, Observation, Station};
pub use routes::*;
pub use startup::*;
pub use utils::*;
