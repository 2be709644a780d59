use crate::adapters::{CsvSink, HttpFetcher, LocalStorage, SqliteStore};
use crate::config::EtlConfig;
use crate::core::convert::UnitConverter;
use crate::core::parser::TableParser;
use crate::core::{Fetcher, Pipeline, QueryRow, QueryRunner, RateTable, Record, Sink};
use crate::utils::error::Result;

/// Bank ranking pipeline: HTML table in, converted record set out to a
/// flat file and a relational table.
pub struct BanksPipeline<F: Fetcher, C: Sink, D: Sink + QueryRunner> {
    fetcher: F,
    parser: TableParser,
    converter: UnitConverter,
    file_sink: C,
    store: D,
    source_url: String,
    rates_location: String,
    queries: Vec<String>,
}

pub type DefaultPipeline =
    BanksPipeline<HttpFetcher<LocalStorage>, CsvSink<LocalStorage>, SqliteStore>;

impl<F: Fetcher, C: Sink, D: Sink + QueryRunner> BanksPipeline<F, C, D> {
    pub fn new(config: &EtlConfig, fetcher: F, file_sink: C, store: D) -> Result<Self> {
        Ok(Self {
            fetcher,
            parser: TableParser::new(config.extract.schema.clone())?,
            converter: UnitConverter::default(),
            file_sink,
            store,
            source_url: config.source.url.clone(),
            rates_location: config.rates.location.clone(),
            queries: config.queries(),
        })
    }
}

impl DefaultPipeline {
    /// Wires the filesystem, HTTP and SQLite adapters from configuration.
    pub fn from_config(config: &EtlConfig) -> Result<Self> {
        let fetcher = HttpFetcher::new(
            LocalStorage::default(),
            config.timeout(),
            &config.source.user_agent,
        )?;
        let file_sink = CsvSink::new(LocalStorage::default(), config.load.csv_path.clone());
        let store = SqliteStore::open(&config.load.database_path, &config.load.table_name)?;
        Self::new(config, fetcher, file_sink, store)
    }
}

#[async_trait::async_trait]
impl<F: Fetcher, C: Sink, D: Sink + QueryRunner> Pipeline for BanksPipeline<F, C, D> {
    async fn extract(&self) -> Result<Vec<Record>> {
        tracing::debug!("Fetching document from: {}", self.source_url);
        let document = self.fetcher.fetch_text(&self.source_url).await?;

        tracing::debug!("Extraction schema: {:?}", self.parser.schema());
        let parsed = self.parser.parse_with_report(&document)?;
        let report = &parsed.report;
        tracing::info!(
            "Parsed {} records from {} rows ({} header, {} short, {} name fallbacks, {} defaulted figures)",
            parsed.records.len(),
            report.rows_seen,
            report.header_rows,
            report.short_rows,
            report.name_fallbacks,
            report.metric_defaults
        );

        Ok(parsed.records)
    }

    async fn load_rates(&self) -> Result<RateTable> {
        tracing::debug!("Fetching exchange rates from: {}", self.rates_location);
        let text = self.fetcher.fetch_text(&self.rates_location).await?;
        let rates = RateTable::from_csv(&text)?;
        tracing::debug!("Loaded {} exchange rates", rates.len());
        Ok(rates)
    }

    async fn transform(&self, records: Vec<Record>, rates: &RateTable) -> Result<Vec<Record>> {
        let targets = &self.converter.policy().targets;
        tracing::debug!("Converting {} records into {:?}", records.len(), targets);
        Ok(self.converter.convert(records, rates)?)
    }

    async fn load_file(&self, records: &[Record]) -> Result<String> {
        self.file_sink.store(records).await
    }

    async fn load_database(&self, records: &[Record]) -> Result<String> {
        self.store.store(records).await
    }

    fn queries(&self) -> Vec<String> {
        self.queries.clone()
    }

    fn run_query(&self, statement: &str) -> Result<Vec<QueryRow>> {
        self.store.run_query(statement)
    }

    fn close(self) -> Result<()> {
        self.store.close()
    }
}
