// Adapters layer: concrete implementations for external systems (filesystem, http, sqlite, log file).

pub mod csv_sink;
pub mod http;
pub mod progress_log;
pub mod sqlite;
pub mod storage;

pub use csv_sink::CsvSink;
pub use http::HttpFetcher;
pub use progress_log::ProgressLog;
pub use sqlite::SqliteStore;
pub use storage::LocalStorage;
