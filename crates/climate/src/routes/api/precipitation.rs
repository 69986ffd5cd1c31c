use axum::{extract::State, Json};
use std::{collections::BTreeMap, sync::Arc};

use crate::{db::Observation, routes::ErrorBody, ApiError, AppState};

#[utoipa::path(
    get,
    path = "/api/v1.0/precipitation",
    responses(
        (status = OK, description = "Precipitation keyed by date, null where no reading was taken", body = BTreeMap<String, f64>),
        (status = SERVICE_UNAVAILABLE, description = "Climate store could not be queried", body = ErrorBody)
    ))]
pub async fn precipitation(
    State(state): State<Arc<AppState>>,
) -> Result<Json<BTreeMap<String, Option<f64>>>, ApiError> {
    let observations = state.climate_db.observations().await?;
    Ok(Json(precipitation_by_date(&observations)))
}

/// One entry per date; a later observation for the same date replaces an earlier one.
pub fn precipitation_by_date(observations: &[Observation]) -> BTreeMap<String, Option<f64>> {
    observations
        .iter()
        .map(|observation| (observation.date.to_string(), observation.precipitation))
        .collect()
}
