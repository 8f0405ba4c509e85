use crate::app_state::{AppState, SharedAppState};
use crate::cli::CommandLineArgs;
use crate::store::ClimateStore;

use std::sync::Arc;

use clap::Parser;
use polars::prelude::*;

/// Command line arguments with every flag at its default.
pub(crate) fn test_args() -> CommandLineArgs {
    CommandLineArgs::parse_from(["climatologist"])
}

/// Build a store from literal station ids and measurement rows.
///
/// Each measurement row is (station, date, prcp, tobs) with the date in `YYYY-MM-DD` form.
pub(crate) fn store_from_rows(
    stations: &[&str],
    rows: &[(&str, &str, Option<f64>, f64)],
) -> ClimateStore {
    let mut station = Vec::new();
    let mut date = Vec::new();
    let mut prcp = Vec::new();
    let mut tobs = Vec::new();
    for &(row_station, row_date, row_prcp, row_tobs) in rows {
        station.push(row_station);
        date.push(row_date);
        prcp.push(row_prcp);
        tobs.push(row_tobs);
    }
    let stations = df!("station" => stations).unwrap();
    let measurements = df!(
        "station" => station,
        "date" => date,
        "prcp" => prcp,
        "tobs" => tobs,
    )
    .unwrap();
    ClimateStore::new(stations.lazy(), measurements.lazy()).unwrap()
}

/// A store with no stations and no measurements.
pub(crate) fn empty_store() -> ClimateStore {
    store_from_rows(&[], &[])
}

/// A small dataset exercising every endpoint: two stations, one of which is clearly the most
/// active, with measurements spanning a year.
pub(crate) fn sample_store() -> ClimateStore {
    store_from_rows(
        &["USC1", "USC2"],
        &[
            ("USC1", "2016-09-01", Some(0.1), 68.0),
            ("USC1", "2017-01-01", Some(0.05), 65.0),
            ("USC2", "2017-08-20", None, 75.0),
            ("USC1", "2017-08-23", Some(0.45), 70.0),
        ],
    )
}

/// Shared application state over the sample dataset.
pub(crate) fn sample_state() -> SharedAppState {
    Arc::new(AppState {
        args: test_args(),
        store: sample_store(),
    })
}

/// Shared application state over an empty dataset.
pub(crate) fn empty_state() -> SharedAppState {
    Arc::new(AppState {
        args: test_args(),
        store: empty_store(),
    })
}
