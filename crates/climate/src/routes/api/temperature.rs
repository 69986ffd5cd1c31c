use axum::{
    extract::{FromRequestParts, Path, Query, State},
    Json,
};
use log::debug;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

use crate::{
    aggregate::{summarize_range, DailyTemperature, DateRange, TemperatureSummary},
    routes::ErrorBody,
    ApiError, AppState,
};

/// Layout of a temperature summary response.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    /// `[{"tobs_min": {date: value}, "tobs_avg": {...}, "tobs_max": {...}}]`
    #[default]
    Nested,
    /// `[{"date", "tobs_min", "tobs_avg", "tobs_max"}, ...]`
    Flat,
}

#[derive(Debug, Default, Deserialize, IntoParams, FromRequestParts)]
#[into_params(parameter_in = Query)]
#[from_request(via(Query), rejection(ApiError))]
pub struct SummaryQuery {
    /// Response layout, `nested` unless set to `flat`
    #[serde(default)]
    pub shape: Shape,
}

#[derive(Serialize, Debug, PartialEq)]
#[serde(untagged)]
pub enum TemperatureResponse {
    Nested(Vec<TemperatureSummary>),
    Flat(Vec<DailyTemperature>),
}

#[utoipa::path(
    get,
    path = "/api/v1.0/{start}",
    params(
        ("start" = String, Path, description = "First date to include, YYYY-MM-DD"),
        SummaryQuery
    ),
    responses(
        (status = OK, description = "Daily min/avg/max temperature from the start date onward, all stations pooled", body = Vec<TemperatureSummary>),
        (status = BAD_REQUEST, description = "Malformed start date or unknown shape", body = ErrorBody),
        (status = SERVICE_UNAVAILABLE, description = "Climate store could not be queried", body = ErrorBody)
    ))]
pub async fn temperature_from(
    State(state): State<Arc<AppState>>,
    Path(start): Path<String>,
    query: SummaryQuery,
) -> Result<Json<TemperatureResponse>, ApiError> {
    let range = DateRange::parse(&start, None)?;
    summarize(&state, range, query.shape).await
}

#[utoipa::path(
    get,
    path = "/api/v1.0/{start}/{end}",
    params(
        ("start" = String, Path, description = "First date to include, YYYY-MM-DD"),
        ("end" = String, Path, description = "Last date to include, YYYY-MM-DD"),
        SummaryQuery
    ),
    responses(
        (status = OK, description = "Daily min/avg/max temperature between both dates inclusive, all stations pooled", body = Vec<TemperatureSummary>),
        (status = BAD_REQUEST, description = "Malformed date, end before start or unknown shape", body = ErrorBody),
        (status = SERVICE_UNAVAILABLE, description = "Climate store could not be queried", body = ErrorBody)
    ))]
pub async fn temperature_between(
    State(state): State<Arc<AppState>>,
    Path((start, end)): Path<(String, String)>,
    query: SummaryQuery,
) -> Result<Json<TemperatureResponse>, ApiError> {
    let range = DateRange::parse(&start, Some(&end))?;
    summarize(&state, range, query.shape).await
}

// Validation happens before this, so bad input never touches the store.
async fn summarize(
    state: &AppState,
    range: DateRange,
    shape: Shape,
) -> Result<Json<TemperatureResponse>, ApiError> {
    let observations = state.climate_db.observations().await?;
    let aggregates = summarize_range(&observations, &range);
    debug!(
        "summarized {} dates from {} observations",
        aggregates.len(),
        observations.len()
    );

    let response = match shape {
        Shape::Nested => TemperatureResponse::Nested(vec![aggregates.into_iter().collect()]),
        Shape::Flat => {
            TemperatureResponse::Flat(aggregates.into_iter().map(DailyTemperature::from).collect())
        }
    };
    Ok(Json(response))
}
