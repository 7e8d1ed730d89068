//! Process plumbing: running the async build from sync code, and logging.

pub mod bootstrap;
pub mod logging;

pub use bootstrap::{BootstrapPath, run_bootstrap, try_run_bootstrap};
pub use logging::{DEFAULT_LOG_FILTER, init_logging, init_logging_with};
