use axum::{
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use log::{error, warn};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{aggregate, climate_data};

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Aggregate(#[from] aggregate::Error),
    #[error(transparent)]
    Store(#[from] climate_data::Error),
    /// `shape` is the only query parameter any route reads.
    #[error("{0}")]
    InvalidQuery(#[from] QueryRejection),
}

/// JSON body returned with every non-2xx response.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct ErrorBody {
    pub error: String,
    /// Request field that failed validation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Aggregate(aggregate::Error::InvalidDateRange { .. }) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Aggregate(aggregate::Error::EmptyDataset) => StatusCode::NOT_FOUND,
            ApiError::Store(climate_data::Error::MalformedDate(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::Store(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::InvalidQuery(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn field(&self) -> Option<&'static str> {
        match self {
            ApiError::Aggregate(err) => err.field(),
            ApiError::Store(_) => None,
            ApiError::InvalidQuery(_) => Some("shape"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("error handling request: {}", self);
        } else {
            warn!("rejected request: {}", self);
        }

        let body = ErrorBody {
            error: self.to_string(),
            field: self.field().map(String::from),
        };
        (status, Json(body)).into_response()
    }
}
