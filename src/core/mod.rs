pub mod convert;
pub mod etl;
pub mod parser;
pub mod pipeline;
pub mod rates;

pub use crate::domain::model::{
    ConversionPolicy, Currency, QueryRow, RateTable, Record, RunSummary, SqlValue,
};
pub use crate::domain::ports::{EventLog, Fetcher, Pipeline, QueryRunner, Sink, Storage};
pub use crate::utils::error::Result;
