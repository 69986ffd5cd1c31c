//! Temperature pipeline behind the `tobs` and date-range endpoints.
//!
//! Everything here works on observations already loaded into memory. Rows
//! without a temperature never reach an aggregate.

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use time::{macros::format_description, Date, Month};
use utoipa::ToSchema;

use crate::db::Observation;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("No observations available to aggregate")]
    EmptyDataset,
    #[error("Invalid {field} date: {reason}")]
    InvalidDateRange { field: &'static str, reason: String },
}

impl Error {
    /// The request field an input error refers to.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Error::InvalidDateRange { field, .. } => Some(*field),
            Error::EmptyDataset => None,
        }
    }
}

/// Returns the station with the most observation rows.
///
/// Rows without a temperature still count. Equal counts resolve to the
/// lexicographically smallest station id.
pub fn busiest_station(observations: &[Observation]) -> Result<&str, Error> {
    observations
        .iter()
        .counts_by(|observation| observation.station_id.as_str())
        .into_iter()
        .max_by(|(a_id, a_count), (b_id, b_count)| {
            a_count.cmp(b_count).then_with(|| b_id.cmp(a_id))
        })
        .map(|(station_id, _)| station_id)
        .ok_or(Error::EmptyDataset)
}

/// The same month and day one year earlier. February 29 maps to February 28.
pub fn one_year_prior(date: Date) -> Date {
    let year = date.year() - 1;
    date.replace_year(year)
        .or_else(|_| Date::from_calendar_date(year, Month::February, 28))
        .unwrap_or(Date::MIN)
}

/// Temperatures from the year leading up to the latest reading, inclusive on both ends.
///
/// Callers pass a single station's observations. A later row for the same
/// date replaces an earlier one.
pub fn last_twelve_months<'a, I>(observations: I) -> Result<BTreeMap<Date, f64>, Error>
where
    I: IntoIterator<Item = &'a Observation>,
{
    let readings: Vec<(Date, f64)> = observations
        .into_iter()
        .filter_map(Observation::temperature)
        .collect();
    let max_date = readings
        .iter()
        .map(|(date, _)| *date)
        .max()
        .ok_or(Error::EmptyDataset)?;
    let window_start = one_year_prior(max_date);

    Ok(readings
        .into_iter()
        .filter(|(date, _)| *date >= window_start)
        .collect())
}

/// Parses a `YYYY-MM-DD` request value, naming `field` on failure.
/// Only the exact `dddd-dd-dd` form is accepted, so signed years are rejected.
pub fn parse_date(field: &'static str, value: &str) -> Result<Date, Error> {
    let invalid = |detail: String| Error::InvalidDateRange {
        field,
        reason: format!("'{}' is not a YYYY-MM-DD date ({})", value, detail),
    };

    let well_formed = value.len() == 10
        && value.bytes().enumerate().all(|(i, b)| match i {
            4 | 7 => b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !well_formed {
        return Err(invalid(String::from("expected four-digit year, month and day")));
    }

    let format = format_description!("[year]-[month]-[day]");
    Date::parse(value, &format).map_err(|e| invalid(e.to_string()))
}

/// Inclusive date window; `end: None` leaves it open at the top.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: Date,
    pub end: Option<Date>,
}

impl DateRange {
    pub fn new(start: Date, end: Option<Date>) -> Result<Self, Error> {
        if let Some(end) = end {
            if end < start {
                return Err(Error::InvalidDateRange {
                    field: "end",
                    reason: format!("{} is before start date {}", end, start),
                });
            }
        }
        Ok(Self { start, end })
    }

    pub fn parse(start: &str, end: Option<&str>) -> Result<Self, Error> {
        let start = parse_date("start", start)?;
        let end = end.map(|end| parse_date("end", end)).transpose()?;
        Self::new(start, end)
    }

    pub fn contains(&self, date: Date) -> bool {
        date >= self.start && self.end.map_or(true, |end| date <= end)
    }
}

/// Min, mean and max temperature for one calendar date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DateAggregate {
    pub date: Date,
    pub temperature_min: f64,
    pub temperature_avg: f64,
    pub temperature_max: f64,
}

#[derive(Debug, Clone, Copy)]
struct Accumulator {
    min: f64,
    max: f64,
    sum: f64,
    count: usize,
}

impl Accumulator {
    fn new(value: f64) -> Self {
        Self {
            min: value,
            max: value,
            sum: value,
            count: 1,
        }
    }

    fn push(&mut self, value: f64) {
        self.min = self.min.min(value);
        self.max = self.max.max(value);
        self.sum += value;
        self.count += 1;
    }

    fn finish(self, date: Date) -> DateAggregate {
        DateAggregate {
            date,
            temperature_min: self.min,
            temperature_avg: self.sum / self.count as f64,
            temperature_max: self.max,
        }
    }
}

/// Groups every station's temperatures inside `range` by date.
///
/// Readings from different stations on the same date are pooled into one
/// aggregate. Output is ascending by date and empty when nothing matches.
pub fn summarize_range(observations: &[Observation], range: &DateRange) -> Vec<DateAggregate> {
    let mut groups: BTreeMap<Date, Accumulator> = BTreeMap::new();
    for (date, value) in observations
        .iter()
        .filter_map(Observation::temperature)
        .filter(|(date, _)| range.contains(*date))
    {
        groups
            .entry(date)
            .and_modify(|acc| acc.push(value))
            .or_insert_with(|| Accumulator::new(value));
    }

    groups
        .into_iter()
        .map(|(date, acc)| acc.finish(date))
        .collect()
}

/// Aggregates keyed first by statistic, then by date.
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, ToSchema)]
pub struct TemperatureSummary {
    pub tobs_min: BTreeMap<String, f64>,
    pub tobs_avg: BTreeMap<String, f64>,
    pub tobs_max: BTreeMap<String, f64>,
}

impl FromIterator<DateAggregate> for TemperatureSummary {
    fn from_iter<T: IntoIterator<Item = DateAggregate>>(iter: T) -> Self {
        let mut summary = TemperatureSummary::default();
        for aggregate in iter {
            let date = aggregate.date.to_string();
            summary
                .tobs_min
                .insert(date.clone(), aggregate.temperature_min);
            summary
                .tobs_avg
                .insert(date.clone(), aggregate.temperature_avg);
            summary.tobs_max.insert(date, aggregate.temperature_max);
        }
        summary
    }
}

/// One row of the flat response layout.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct DailyTemperature {
    pub date: String,
    pub tobs_min: f64,
    pub tobs_avg: f64,
    pub tobs_max: f64,
}

impl From<DateAggregate> for DailyTemperature {
    fn from(aggregate: DateAggregate) -> Self {
        Self {
            date: aggregate.date.to_string(),
            tobs_min: aggregate.temperature_min,
            tobs_avg: aggregate.temperature_avg,
            tobs_max: aggregate.temperature_max,
        }
    }
}
