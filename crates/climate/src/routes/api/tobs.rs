use axum::{extract::State, Json};
use log::debug;
use std::{collections::BTreeMap, sync::Arc};

use crate::{
    aggregate::{busiest_station, last_twelve_months},
    routes::ErrorBody,
    ApiError, AppState,
};

#[utoipa::path(
    get,
    path = "/api/v1.0/tobs",
    responses(
        (status = OK, description = "Last twelve months of temperatures for the station with the most observations, keyed by date", body = BTreeMap<String, f64>),
        (status = NOT_FOUND, description = "No temperature observations available", body = ErrorBody),
        (status = SERVICE_UNAVAILABLE, description = "Climate store could not be queried", body = ErrorBody)
    ))]
pub async fn tobs(
    State(state): State<Arc<AppState>>,
) -> Result<Json<BTreeMap<String, f64>>, ApiError> {
    let observations = state.climate_db.observations().await?;
    let station = busiest_station(&observations)?;
    debug!("busiest station: {}", station);

    let window = last_twelve_months(
        observations
            .iter()
            .filter(|observation| observation.station_id == station),
    )?;

    Ok(Json(
        window
            .into_iter()
            .map(|(date, value)| (date.to_string(), value))
            .collect(),
    ))
}
