use crate::domain::model::Record;
use crate::domain::ports::{Sink, Storage};
use crate::utils::error::{EtlError, Result};

const SINK_NAME: &str = "csv";

/// Writes the record set as a comma-separated file with a header row.
pub struct CsvSink<S: Storage> {
    storage: S,
    path: String,
}

impl<S: Storage> CsvSink<S> {
    pub fn new(storage: S, path: impl Into<String>) -> Self {
        Self {
            storage,
            path: path.into(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Reads the written file back, addressing columns by header name.
    pub async fn read_back(&self) -> Result<Vec<Record>> {
        let bytes = self.storage.read_file(&self.path).await?;
        decode(&bytes)
    }
}

fn encode(records: &[Record]) -> Result<Vec<u8>> {
    // Header is written explicitly so an empty record set still gets one.
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    writer.write_record(Record::COLUMNS)?;
    for record in records {
        writer.serialize(record)?;
    }

    writer
        .into_inner()
        .map_err(|e| EtlError::IoError(e.into_error()))
}

fn decode(bytes: &[u8]) -> Result<Vec<Record>> {
    let mut reader = csv::Reader::from_reader(bytes);
    let records = reader.deserialize().collect::<std::result::Result<Vec<Record>, _>>()?;
    Ok(records)
}

#[async_trait::async_trait]
impl<S: Storage> Sink for CsvSink<S> {
    async fn store(&self, records: &[Record]) -> Result<String> {
        let data = encode(records).map_err(|e| EtlError::sink(SINK_NAME, e))?;

        tracing::debug!("Writing {} bytes to {}", data.len(), self.path);
        self.storage
            .write_file(&self.path, &data)
            .await
            .map_err(|e| EtlError::sink(SINK_NAME, e))?;

        Ok(self.path.clone())
    }
}
