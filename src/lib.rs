#![warn(clippy::pedantic)]
// Noisy doc/signature lints — would require annotating every pub function
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
// Style preference — keeping format!("{}", x) over format!("{x}") for readability with complex exprs
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod convert;
pub mod errors;
pub mod lines;
pub mod redirect;
pub mod relay;
pub mod utils;

/// Re-exports for fuzz targets. Not part of the public API.
#[doc(hidden)]
pub mod fuzz_api {
    pub use crate::convert::{try_json_to_yaml, try_yaml_to_json};
    pub use crate::lines::LineLimit;
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
