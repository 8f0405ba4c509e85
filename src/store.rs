//! Read-only access to the climate observation dataset.
//!
//! The dataset consists of two tables: stations (one row per observation site) and measurements
//! (one row per station per day). Both are loaded into memory once at startup; every query
//! derives a fresh lazy scan from the immutable tables, so no cursor or session is shared
//! between concurrent requests.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{Duration, NaiveDate};
use polars::prelude::*;

use crate::cli::CommandLineArgs;
use crate::error::ClimateQueryError;
use crate::models::{TemperatureSummary, DATE_FORMAT};

/// Length in days of the "last year" window used by the precipitation and temperature
/// observation queries.
const ONE_YEAR_DAYS: i64 = 365;

/// Days between 0001-01-01 and 1970-01-01. A polars `Date` column stores days since the Unix
/// epoch; chrono counts from the Common Era.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Convert the physical value of a polars `Date` cell into a calendar date.
fn date_from_days(days: i32) -> Result<NaiveDate, ClimateQueryError> {
    days.checked_add(UNIX_EPOCH_DAYS_FROM_CE)
        .and_then(NaiveDate::from_num_days_from_ce_opt)
        .ok_or(ClimateQueryError::DateOutOfRange(days))
}

/// Scan a tabular file into a lazy frame, dispatching on the file extension.
fn scan_table(path: &Path) -> Result<LazyFrame, ClimateQueryError> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("csv") => Ok(LazyCsvReader::new(path)
            .with_has_header(true)
            .with_try_parse_dates(true)
            .finish()?),
        Some("parquet") => Ok(LazyFrame::scan_parquet(path, ScanArgsParquet::default())?),
        _ => Err(ClimateQueryError::UnsupportedFormat {
            path: path.display().to_string(),
        }),
    }
}

/// The pre-populated climate dataset.
///
/// Holds the station and measurement tables as immutable [DataFrame]s. Queries clone the cheap
/// column handles and run lazily, collecting only the projected result.
pub struct ClimateStore {
    /// Station table. Must contain a `station` column; other columns are ignored.
    stations: DataFrame,

    /// Measurement table with `station`, `date`, `prcp` and `tobs` columns.
    measurements: DataFrame,
}

impl ClimateStore {
    /// Build a store from lazy station and measurement tables.
    ///
    /// Normalises the measurement dtypes: `date` becomes a `Date` column and `prcp`/`tobs`
    /// become `Float64`, whatever the physical types in the source file. Fails if a required
    /// column is missing or a value does not convert.
    pub fn new(stations: LazyFrame, measurements: LazyFrame) -> Result<Self, ClimateQueryError> {
        let stations = stations.collect()?;
        let measurements = measurements
            .with_columns([
                col("station").cast(DataType::String),
                col("date").cast(DataType::Date),
                col("prcp").cast(DataType::Float64),
                col("tobs").cast(DataType::Float64),
            ])
            .collect()?;
        Ok(Self {
            stations,
            measurements,
        })
    }

    /// Load the store from the files named on the command line.
    pub fn open(args: &CommandLineArgs) -> Result<Self, ClimateQueryError> {
        let stations = scan_table(Path::new(&args.stations_file))?;
        let measurements = scan_table(Path::new(&args.measurements_file))?;
        Self::new(stations, measurements)
    }

    /// Return a fresh lazy scan of the measurement table.
    fn measurements(&self) -> LazyFrame {
        self.measurements.clone().lazy()
    }

    /// Return a fresh lazy scan of the station table.
    fn stations(&self) -> LazyFrame {
        self.stations.clone().lazy()
    }

    /// Return the latest measurement date, optionally restricted to one station.
    ///
    /// Returns `None` when no rows match.
    pub fn latest_date(&self, station: Option<&str>) -> Result<Option<NaiveDate>, ClimateQueryError> {
        let mut frame = self.measurements();
        if let Some(station) = station {
            frame = frame.filter(col("station").eq(lit(station)));
        }
        let df = frame.select([col("date").max()]).collect()?;
        df.column("date")?
            .date()?
            .get(0)
            .map(date_from_days)
            .transpose()
    }

    /// Return the precipitation series for the year ending at the dataset's latest date.
    ///
    /// The result maps `YYYY-MM-DD` date strings to precipitation values (null where the gauge
    /// reported nothing). Duplicate dates keep the value of the last row in store order.
    pub fn precipitation_last_year(
        &self,
    ) -> Result<BTreeMap<String, Option<f64>>, ClimateQueryError> {
        let latest = self
            .latest_date(None)?
            .ok_or(ClimateQueryError::EmptyDataset)?;
        let one_year_ago = latest - Duration::days(ONE_YEAR_DAYS);
        let df = self
            .measurements()
            .filter(col("date").gt_eq(lit(one_year_ago)))
            .select([col("date").dt().to_string(DATE_FORMAT), col("prcp")])
            .collect()?;
        let dates = df.column("date")?.str()?;
        let prcp = df.column("prcp")?.f64()?;
        let mut series = BTreeMap::new();
        for (date, value) in dates.into_iter().zip(prcp.into_iter()) {
            if let Some(date) = date {
                series.insert(date.to_string(), value);
            }
        }
        Ok(series)
    }

    /// Return all station ids in store retrieval order.
    pub fn station_ids(&self) -> Result<Vec<String>, ClimateQueryError> {
        let df = self.stations().select([col("station")]).collect()?;
        let ids = df.column("station")?.str()?;
        Ok(ids.into_iter().flatten().map(str::to_string).collect())
    }

    /// Return the station with the most measurement rows.
    ///
    /// Joins the station and measurement tables, counts rows per station and orders by count
    /// descending. Ties resolve to the lexicographically smallest station id. Returns `None`
    /// when the join is empty.
    pub fn most_active_station(&self) -> Result<Option<String>, ClimateQueryError> {
        let df = self
            .measurements()
            .select([col("station")])
            .join(
                self.stations().select([col("station")]),
                [col("station")],
                [col("station")],
                JoinArgs::new(JoinType::Inner),
            )
            .group_by([col("station")])
            .agg([len().alias("observations")])
            .sort_by_exprs(
                [col("observations"), col("station")],
                SortMultipleOptions::default().with_order_descending_multi([true, false]),
            )
            .limit(1)
            .collect()?;
        let ids = df.column("station")?.str()?;
        Ok(ids.get(0).map(str::to_string))
    }

    /// Return the temperature observations of the most active station over the year ending at
    /// that station's latest measurement date, in store retrieval order.
    pub fn most_active_station_tobs(&self) -> Result<Vec<f64>, ClimateQueryError> {
        let station = self
            .most_active_station()?
            .ok_or(ClimateQueryError::EmptyDataset)?;
        let latest = self
            .latest_date(Some(&station))?
            .ok_or(ClimateQueryError::EmptyDataset)?;
        let one_year_ago = latest - Duration::days(ONE_YEAR_DAYS);
        let df = self
            .measurements()
            .filter(
                col("station")
                    .eq(lit(station.as_str()))
                    .and(col("date").gt_eq(lit(one_year_ago))),
            )
            .select([col("tobs")])
            .collect()?;
        Ok(df.column("tobs")?.f64()?.into_iter().flatten().collect())
    }

    /// Return min/avg/max of the temperature observations with `date >= start`, additionally
    /// bounded by `date <= end` when an end date is given.
    ///
    /// Returns `None` when no rows match.
    pub fn temperature_summary(
        &self,
        start: NaiveDate,
        end: Option<NaiveDate>,
    ) -> Result<Option<TemperatureSummary>, ClimateQueryError> {
        let mut predicate = col("date").gt_eq(lit(start));
        if let Some(end) = end {
            predicate = predicate.and(col("date").lt_eq(lit(end)));
        }
        let df = self
            .measurements()
            .filter(predicate)
            .select([
                col("tobs").min().alias("tmin"),
                col("tobs").mean().alias("tavg"),
                col("tobs").max().alias("tmax"),
            ])
            .collect()?;
        let row = (
            df.column("tmin")?.f64()?.get(0),
            df.column("tavg")?.f64()?.get(0),
            df.column("tmax")?.f64()?.get(0),
        );
        Ok(match row {
            (Some(tmin), Some(tavg), Some(tmax)) => Some(TemperatureSummary { tmin, tavg, tmax }),
            _ => None,
        })
    }
}
