pub mod analyzers;
pub mod config;
pub mod error;
pub mod normalize;
pub mod output;
pub mod parser;
pub mod roster;
pub mod store;

pub use error::{ConfigError, Error, IngestionError, QueryError, Result};
