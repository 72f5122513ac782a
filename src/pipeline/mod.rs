//! Filter pipeline configuration and execution.

mod runner;

pub use runner::{run_filter, FilterConfig, RunConfig};
