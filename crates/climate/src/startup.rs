use crate::{
    aggregate, db, index_handler, precipitation, routes, stations, temperature_between,
    temperature_from, tobs, ClimateAccess, ClimateData,
};
use anyhow::anyhow;
use axum::{
    body::Body,
    extract::Request,
    middleware::{self, Next},
    response::IntoResponse,
    routing::get,
    Router,
};
use climate_core::is_file;
use hyper::{
    header::{ACCEPT, CONTENT_TYPE},
    Method,
};
use log::info;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

#[derive(Clone)]
pub struct AppState {
    pub climate_db: Arc<dyn ClimateData>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::home::index::index_handler,
        routes::api::precipitation::precipitation,
        routes::api::stations::stations,
        routes::api::tobs::tobs,
        routes::api::temperature::temperature_from,
        routes::api::temperature::temperature_between,
    ),
    components(
        schemas(
                db::Station,
                aggregate::TemperatureSummary,
                aggregate::DailyTemperature,
                routes::api::temperature::Shape,
                routes::ErrorBody
            )
    ),
    tags(
        (name = "hawaii climate api", description = "a read-only RESTful api over daily precipitation and temperature observations from Hawaii weather stations")
    )
)]
struct ApiDoc;

pub async fn build_app_state(database_path: String) -> Result<AppState, anyhow::Error> {
    if !is_file(&database_path) {
        return Err(anyhow!("climate database not found at {}", database_path));
    }

    let climate_db = ClimateAccess::new(&database_path);
    climate_db
        .verify_schema()
        .await
        .map_err(|e| anyhow!("climate database {} is unusable: {}", database_path, e))?;
    info!("Climate database verified at: {}", database_path);

    Ok(AppState {
        climate_db: Arc::new(climate_db),
    })
}

pub fn app(app_state: AppState) -> Router {
    let api_docs = ApiDoc::openapi();
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([ACCEPT, CONTENT_TYPE])
        .allow_origin(Any);

    Router::new()
        .route("/", get(index_handler))
        .route("/api/v1.0/precipitation", get(precipitation))
        .route("/api/v1.0/stations", get(stations))
        .route("/api/v1.0/tobs", get(tobs))
        .route("/api/v1.0/{start}", get(temperature_from))
        .route("/api/v1.0/{start}/{end}", get(temperature_between))
        .with_state(Arc::new(app_state))
        .layer(middleware::from_fn(log_request))
        .merge(Scalar::with_url("/docs", api_docs))
        .layer(cors)
}

async fn log_request(request: Request<Body>, next: Next) -> impl IntoResponse {
    let now = time::OffsetDateTime::now_utc();
    let path = request
        .uri()
        .path_and_query()
        .map(|p| p.as_str())
        .unwrap_or_default()
        .to_owned();
    info!(target: "http_request", "new request, {} {}", request.method().as_str(), path);

    let response = next.run(request).await;
    let response_time = time::OffsetDateTime::now_utc() - now;
    info!(target: "http_response", "response, {} code: {}, time: {}", path, response.status().as_str(), response_time);

    response
}
