use crate::core::{EventLog, Pipeline, RunSummary};
use crate::utils::error::Result;
use std::io::Write;
use std::sync::Arc;

/// Runs the pipeline stages in their fixed order, recording progress
/// before and after each one. Any stage error stops the run.
pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    log: Arc<dyn EventLog>,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P, log: Arc<dyn EventLog>) -> Self {
        Self { pipeline, log }
    }

    /// Runs to completion, printing query results to stdout.
    pub async fn run(self) -> Result<RunSummary> {
        let mut stdout = std::io::stdout();
        self.run_with_output(&mut stdout).await
    }

    pub async fn run_with_output<W: Write>(self, out: &mut W) -> Result<RunSummary> {
        let log = Arc::clone(&self.log);
        let result = self.execute(out).await;
        if let Err(e) = &result {
            log.record(&format!("ETL process failed: {}", e));
        }
        result
    }

    async fn execute<W: Write>(self, out: &mut W) -> Result<RunSummary> {
        let Self { pipeline, log } = self;

        log.record("Preliminaries complete. Initiating ETL process.");

        log.record("Starting data extraction.");
        let records = pipeline.extract().await?;
        log.record("Data extraction complete. Initiating Transformation process.");

        log.record("Starting data transformation.");
        let rates = pipeline.load_rates().await?;
        let records = pipeline.transform(records, &rates).await?;
        log.record("Data transformation complete. Initiating Loading process.");

        log.record("Saving data to CSV.");
        let csv_location = pipeline.load_file(&records).await?;
        log.record("Data saved to CSV file.");

        log.record("Saving data to Database.");
        let table = pipeline.load_database(&records).await?;
        log.record("Data loaded to Database as a table, Executing queries.");

        let queries = pipeline.queries();
        for statement in &queries {
            log.record(&format!("Executing Query: {}", statement));
            let rows = pipeline.run_query(statement)?;

            writeln!(out, "\nQuery Statement: {}", statement)?;
            for row in &rows {
                writeln!(out, "{}", row)?;
            }
            log.record("Query execution completed");
        }

        pipeline.close()?;
        log.record("Server Connection closed. Process Complete.");

        Ok(RunSummary {
            records: records.len(),
            csv_location,
            table,
            queries_executed: queries.len(),
        })
    }
}
