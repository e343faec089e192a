//! File-based configuration: handler options and response fixtures.

pub mod error;
pub mod fixture;
pub mod options;
pub mod parser;

pub use error::{ConfigError, ConfigResult};
pub use fixture::Fixture;
pub use options::HandlerOptions;
