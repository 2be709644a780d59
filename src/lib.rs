pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::{CsvSink, HttpFetcher, LocalStorage, ProgressLog, SqliteStore};
pub use config::EtlConfig;
pub use crate::core::{
    convert::UnitConverter,
    etl::EtlEngine,
    parser::TableParser,
    pipeline::{BanksPipeline, DefaultPipeline},
};
pub use utils::error::{EtlError, Result};
