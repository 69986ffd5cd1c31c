use axum::{extract::State, Json};
use std::sync::Arc;

use crate::{db::Station, routes::ErrorBody, ApiError, AppState};

#[utoipa::path(
    get,
    path = "/api/v1.0/stations",
    responses(
        (status = OK, description = "Every station in the dataset", body = Vec<Station>),
        (status = SERVICE_UNAVAILABLE, description = "Climate store could not be queried", body = ErrorBody)
    ))]
pub async fn stations(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Station>>, ApiError> {
    let stations = state.climate_db.stations().await?;
    Ok(Json(stations))
}
