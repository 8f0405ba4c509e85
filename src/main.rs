//! This file defines the climatologist binary entry point.

use std::process::exit;
use std::sync::Arc;

use climatologist::app;
use climatologist::app_state::AppState;
use climatologist::cli;
use climatologist::metrics;
use climatologist::server;
use climatologist::tracing;

/// Application entry point
#[tokio::main]
async fn main() {
    let args = cli::parse();
    tracing::init_tracing();
    metrics::register_metrics();
    let state = match AppState::new(&args) {
        Ok(state) => Arc::new(state),
        Err(err) => {
            println!("failed to load climate dataset: {}", err);
            exit(1)
        }
    };
    let service = app::service(state);
    server::serve(&args, service).await;
}
