//! HTTP surface of the Climate Query Service.
//!
//! Translates path parameters into queries against the [crate::store::ClimateStore] and
//! serialises the results as JSON. All routes are GET and side-effect free.

use crate::app_state::SharedAppState;
use crate::error::ClimateQueryError;
use crate::metrics;
use crate::models::{self, TemperatureSummary};

use std::collections::BTreeMap;

use axum::{
    extract::{Path, State},
    response::Html,
    routing::get,
    Json, Router,
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

/// Static payload for the service root, listing the available routes.
const WELCOME: &str = "Welcome to the Climate Analysis API!<br/>\
Available Routes:<br/>\
/api/v1.0/precipitation<br/>\
/api/v1.0/stations<br/>\
/api/v1.0/tobs<br/>\
/api/v1.0/start<br/>\
/api/v1.0/start/end<br/>\
<p>'start' and 'end' date should be in the format YYYY-MM-DD.</p>";

/// The axum service type served by [crate::server::serve].
pub type Service = Router;

/// Returns a [Service] routing requests to the query handlers.
///
/// # Arguments
///
/// * `state`: Shared application state holding the climate dataset
pub fn service(state: SharedAppState) -> Service {
    fn v1() -> Router<SharedAppState> {
        Router::new()
            .route("/precipitation", get(precipitation))
            .route("/stations", get(stations))
            .route("/tobs", get(tobs))
            .route("/:start", get(summary_from_start))
            .route("/:start/:end", get(summary_for_range))
    }

    Router::new()
        .route("/", get(home))
        .route("/metrics", get(metrics::metrics_handler))
        .nest("/api/v1.0", v1())
        .layer(
            ServiceBuilder::new().layer(
                TraceLayer::new_for_http()
                    .on_request(metrics::request_counter)
                    .on_response(metrics::record_response_metrics),
            ),
        )
        .with_state(state)
}

/// Welcome: list the available routes.
async fn home() -> Html<&'static str> {
    Html(WELCOME)
}

/// Precipitation series: date to precipitation mapping over the year ending at the dataset's
/// latest measurement date.
async fn precipitation(
    State(state): State<SharedAppState>,
) -> Result<Json<BTreeMap<String, Option<f64>>>, ClimateQueryError> {
    state.store.precipitation_last_year().map(Json)
}

/// Station list: all station ids in store retrieval order.
async fn stations(
    State(state): State<SharedAppState>,
) -> Result<Json<Vec<String>>, ClimateQueryError> {
    state.store.station_ids().map(Json)
}

/// Temperature observations of the most active station over its final year of measurements.
async fn tobs(State(state): State<SharedAppState>) -> Result<Json<Vec<f64>>, ClimateQueryError> {
    state.store.most_active_station_tobs().map(Json)
}

/// Min/avg/max temperature over all measurements from `start` onwards.
async fn summary_from_start(
    State(state): State<SharedAppState>,
    Path(start): Path<String>,
) -> Result<Json<TemperatureSummary>, ClimateQueryError> {
    let start = models::parse_date(&start)?;
    state
        .store
        .temperature_summary(start, None)?
        .map(Json)
        .ok_or(ClimateQueryError::NoDataFromStart)
}

/// Min/avg/max temperature over measurements between `start` and `end` inclusive.
async fn summary_for_range(
    State(state): State<SharedAppState>,
    Path((start, end)): Path<(String, String)>,
) -> Result<Json<TemperatureSummary>, ClimateQueryError> {
    let start = models::parse_date(&start)?;
    let end = models::parse_date(&end)?;
    state
        .store
        .temperature_summary(start, Some(end))?
        .map(Json)
        .ok_or(ClimateQueryError::NoDataInRange)
}
