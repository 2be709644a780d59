use crate::domain::model::{QueryRow, RateTable, Record};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Append-only progress log. Implementations swallow their own failures.
pub trait EventLog: Send + Sync {
    fn record(&self, message: &str);
}

#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch_text(&self, location: &str) -> Result<String>;
}

/// Persists a full record set. Returns a human-readable location.
#[async_trait]
pub trait Sink: Send + Sync {
    async fn store(&self, records: &[Record]) -> Result<String>;
}

pub trait QueryRunner: Send + Sync {
    fn run_query(&self, statement: &str) -> Result<Vec<QueryRow>>;

    fn close(self) -> Result<()>
    where
        Self: Sized;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<Record>>;
    async fn load_rates(&self) -> Result<RateTable>;
    async fn transform(&self, records: Vec<Record>, rates: &RateTable) -> Result<Vec<Record>>;
    async fn load_file(&self, records: &[Record]) -> Result<String>;
    async fn load_database(&self, records: &[Record]) -> Result<String>;
    fn queries(&self) -> Vec<String>;
    fn run_query(&self, statement: &str) -> Result<Vec<QueryRow>>;

    fn close(self) -> Result<()>
    where
        Self: Sized;
}
