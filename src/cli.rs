//! Command Line Interface (CLI) arguments.

use clap::Parser;

/// Climatologist command line interface
#[derive(Clone, Debug, Parser)]
pub struct CommandLineArgs {
    /// The IP address on which the service should listen
    #[arg(long, default_value = "0.0.0.0", env = "CLIMATOLOGIST_HOST")]
    pub host: String,
    /// The port to which the service should bind
    #[arg(long, default_value_t = 8080, env = "CLIMATOLOGIST_PORT")]
    pub port: u16,
    /// Flag indicating whether HTTPS should be used
    #[arg(long, default_value_t = false, env = "CLIMATOLOGIST_HTTPS")]
    pub https: bool,
    /// Path to the certificate file to be used for HTTPS encryption
    #[arg(
        long,
        default_value = "~/.config/climatologist/certs/cert.pem",
        env = "CLIMATOLOGIST_CERT_FILE"
    )]
    pub cert_file: String,
    /// Path to the key file to be used for HTTPS encryption
    #[arg(
        long,
        default_value = "~/.config/climatologist/certs/key.pem",
        env = "CLIMATOLOGIST_KEY_FILE"
    )]
    pub key_file: String,
    /// Maximum time in seconds to wait for operations to complete upon receiving `ctrl+c` signal.
    #[arg(long, default_value_t = 60, env = "CLIMATOLOGIST_SHUTDOWN_TIMEOUT")]
    pub graceful_shutdown_timeout: u64,
    /// Path to the station table, in CSV or Parquet format
    #[arg(
        long,
        default_value = "data/stations.csv",
        env = "CLIMATOLOGIST_STATIONS_FILE"
    )]
    pub stations_file: String,
    /// Path to the measurement table, in CSV or Parquet format
    #[arg(
        long,
        default_value = "data/measurements.csv",
        env = "CLIMATOLOGIST_MEASUREMENTS_FILE"
    )]
    pub measurements_file: String,
}

/// Returns parsed command line arguments.
pub fn parse() -> CommandLineArgs {
    CommandLineArgs::parse()
}
