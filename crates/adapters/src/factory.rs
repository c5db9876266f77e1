//! Construct the configured adapter behind a trait object.

use std::sync::Arc;
use tracing::info;

use crate::file::FileAdapter;
use crate::port::CoursePort;
use crate::remote::RemoteAdapter;
use crate::stub::StubAdapter;
use lectern_core::Result;
use lectern_core::config::{AdapterMode, AdapterSettings};

/// Builds a [`CoursePort`] implementation from settings.
pub struct AdapterFactory;

impl AdapterFactory {
    /// Create the adapter selected by `settings.mode`, or by `force_mode`
    /// when given (the `--mode` command-line override).
    pub fn create(settings: &AdapterSettings, force_mode: Option<AdapterMode>) -> Result<Arc<dyn CoursePort>> {
        let mode = force_mode.unwrap_or(settings.mode);
        info!("creating course adapter: {mode}");

        match mode {
            AdapterMode::Stub => {
                let adapter = StubAdapter::new(&settings.stub.stubs_root, &settings.stub.scenario)?;
                Ok(Arc::new(adapter))
            }
            AdapterMode::File => {
                let adapter = FileAdapter::new(&settings.file.courses_path)?;
                Ok(Arc::new(adapter))
            }
            AdapterMode::Real => Ok(Arc::new(RemoteAdapter::new(settings.real.clone()))),
        }
    }
}
