//! Error handling.

use axum::{
    http::header,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use polars::prelude::PolarsError;
use serde::{Deserialize, Serialize};
use std::error::Error;
use thiserror::Error;
use tracing::{event, Level};

/// Climate Query Service error type
///
/// This type encapsulates the various errors that may occur.
/// Each variant may result in a different API error response.
#[derive(Debug, Error)]
pub enum ClimateQueryError {
    /// A user-supplied date that does not parse as `YYYY-MM-DD`
    #[error("Invalid date format. Use YYYY-MM-DD.")]
    InvalidDateFormat(#[source] chrono::format::ParseError),

    /// A valid start date that matches no measurement rows
    #[error("No temperature data found for the given start date.")]
    NoDataFromStart,

    /// A valid start/end range that matches no measurement rows
    #[error("No temperature data found for the given date range.")]
    NoDataInRange,

    /// A query that requires at least one measurement row, against an empty table
    #[error("No measurement data available.")]
    EmptyDataset,

    /// Error executing a query in the underlying tabular store
    #[error("error querying the climate dataset")]
    Query(#[from] PolarsError),

    /// A date stored in the dataset that does not map onto the calendar
    #[error("stored date value {0} is outside the calendar range")]
    DateOutOfRange(i32),

    /// A dataset file with an extension other than `.csv` or `.parquet`
    #[error("unsupported dataset format for {path}")]
    UnsupportedFormat { path: String },
}

impl IntoResponse for ClimateQueryError {
    /// Convert from a `ClimateQueryError` into an [axum::response::Response].
    fn into_response(self) -> Response {
        ErrorResponse::from(self).into_response()
    }
}

/// A response to send in error cases
///
/// The body is a JSON object with a single `error` key holding the
/// user-visible message. Implements serde (de)serialise.
#[derive(Deserialize, Serialize)]
struct ErrorResponse {
    /// HTTP status of the response
    #[serde(skip)]
    status: StatusCode,

    /// User-visible error message
    error: String,
}

impl ErrorResponse {
    /// Return a new ErrorResponse
    ///
    /// # Arguments
    ///
    /// * `status`: HTTP status of the response
    /// * `error`: The error that occurred. Its display form becomes the message
    fn new(status: StatusCode, error: &ClimateQueryError) -> Self {
        ErrorResponse {
            status,
            error: error.to_string(),
        }
    }

    /// Return a 400 bad request ErrorResponse
    fn bad_request(error: &ClimateQueryError) -> Self {
        Self::new(StatusCode::BAD_REQUEST, error)
    }

    /// Return a 404 not found ErrorResponse
    fn not_found(error: &ClimateQueryError) -> Self {
        Self::new(StatusCode::NOT_FOUND, error)
    }

    /// Return a 500 internal server error ErrorResponse
    fn internal_server_error(error: &ClimateQueryError) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, error)
    }
}

impl From<ClimateQueryError> for ErrorResponse {
    /// Convert from a `ClimateQueryError` into an `ErrorResponse`.
    fn from(error: ClimateQueryError) -> Self {
        let response = match &error {
            // Bad request
            ClimateQueryError::InvalidDateFormat(_) => Self::bad_request(&error),

            // Not found
            ClimateQueryError::NoDataFromStart
            | ClimateQueryError::NoDataInRange
            | ClimateQueryError::EmptyDataset => Self::not_found(&error),

            // Internal server error
            ClimateQueryError::Query(_)
            | ClimateQueryError::DateOutOfRange(_)
            | ClimateQueryError::UnsupportedFormat { path: _ } => {
                Self::internal_server_error(&error)
            }
        };

        // Log server errors.
        if response.status.is_server_error() {
            event!(Level::ERROR, "{}", error.to_string());
            let mut current = error.source();
            while let Some(source) = current {
                event!(Level::ERROR, "Caused by: {}", source.to_string());
                current = source.source();
            }
        }

        response
    }
}

impl IntoResponse for ErrorResponse {
    /// Convert from an `ErrorResponse` into an `axum::response::Response`.
    ///
    /// Renders the response as JSON.
    fn into_response(self) -> Response {
        let json_body = serde_json::to_string(&self);
        match json_body {
            Err(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to serialise error response: {}", err),
            )
                .into_response(),
            Ok(json_body) => (
                self.status,
                [(&header::CONTENT_TYPE, mime::APPLICATION_JSON.to_string())],
                json_body,
            )
                .into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::NaiveDate;
    use hyper::HeaderMap;

    // Jump through the hoops to get the body as a string.
    async fn body_string(response: Response) -> String {
        String::from_utf8(
            hyper::body::to_bytes(response.into_body())
                .await
                .unwrap()
                .to_vec(),
        )
        .unwrap()
    }

    async fn test_climate_query_error(error: ClimateQueryError, status: StatusCode, message: &str) {
        let response = error.into_response();
        assert_eq!(status, response.status());
        let mut headers = HeaderMap::new();
        headers.insert(&header::CONTENT_TYPE, "application/json".parse().unwrap());
        assert_eq!(headers, *response.headers());
        let error_response: ErrorResponse =
            serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(message.to_string(), error_response.error);
    }

    fn parse_error() -> chrono::format::ParseError {
        NaiveDate::parse_from_str("not-a-date", "%Y-%m-%d").unwrap_err()
    }

    #[tokio::test]
    async fn invalid_date_format() {
        let error = ClimateQueryError::InvalidDateFormat(parse_error());
        let message = "Invalid date format. Use YYYY-MM-DD.";
        test_climate_query_error(error, StatusCode::BAD_REQUEST, message).await;
    }

    #[tokio::test]
    async fn no_data_from_start() {
        let error = ClimateQueryError::NoDataFromStart;
        let message = "No temperature data found for the given start date.";
        test_climate_query_error(error, StatusCode::NOT_FOUND, message).await;
    }

    #[tokio::test]
    async fn no_data_in_range() {
        let error = ClimateQueryError::NoDataInRange;
        let message = "No temperature data found for the given date range.";
        test_climate_query_error(error, StatusCode::NOT_FOUND, message).await;
    }

    #[tokio::test]
    async fn empty_dataset() {
        let error = ClimateQueryError::EmptyDataset;
        let message = "No measurement data available.";
        test_climate_query_error(error, StatusCode::NOT_FOUND, message).await;
    }

    #[tokio::test]
    async fn query_error() {
        let error = ClimateQueryError::Query(PolarsError::ColumnNotFound("tobs".into()));
        let message = "error querying the climate dataset";
        test_climate_query_error(error, StatusCode::INTERNAL_SERVER_ERROR, message).await;
    }

    #[tokio::test]
    async fn date_out_of_range() {
        let error = ClimateQueryError::DateOutOfRange(i32::MAX);
        let message = format!("stored date value {} is outside the calendar range", i32::MAX);
        test_climate_query_error(error, StatusCode::INTERNAL_SERVER_ERROR, &message).await;
    }

    #[tokio::test]
    async fn unsupported_format() {
        let error = ClimateQueryError::UnsupportedFormat {
            path: "data/measurements.xlsx".to_string(),
        };
        let message = "unsupported dataset format for data/measurements.xlsx";
        test_climate_query_error(error, StatusCode::INTERNAL_SERVER_ERROR, message).await;
    }

    #[tokio::test]
    async fn error_body_is_single_key_object() {
        let response = ClimateQueryError::NoDataFromStart.into_response();
        let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        let object = body.as_object().unwrap();
        assert_eq!(1, object.len());
        assert!(object.contains_key("error"));
    }
}
