use crate::cli::CommandLineArgs;
use crate::error::ClimateQueryError;
use crate::store::ClimateStore;

use std::sync::Arc;

/// Shared application state passed to each request handler.
pub struct AppState {
    /// Command line arguments.
    pub args: CommandLineArgs,

    /// The pre-populated climate dataset.
    pub store: ClimateStore,
}

impl AppState {
    /// Create and return an [AppState], loading the dataset from the configured files.
    pub fn new(args: &CommandLineArgs) -> Result<Self, ClimateQueryError> {
        let store = ClimateStore::open(args)?;
        Ok(Self {
            args: args.clone(),
            store,
        })
    }
}

/// AppState wrapped in an Atomic Reference Count (Arc) to allow multiple references.
pub type SharedAppState = Arc<AppState>;
