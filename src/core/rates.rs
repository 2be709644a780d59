use crate::domain::model::RateTable;
use crate::utils::error::Result;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct RateRow {
    #[serde(rename = "Currency")]
    currency: String,
    #[serde(rename = "Rate")]
    rate: f64,
}

impl RateTable {
    /// Reads a header-addressed `Currency,Rate` CSV. Unknown columns are
    /// ignored and a repeated code overwrites the earlier row.
    pub fn from_csv(text: &str) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(text.as_bytes());

        let mut table = RateTable::new();
        for row in reader.deserialize::<RateRow>() {
            let row = row?;
            table.insert(row.currency, row.rate);
        }
        Ok(table)
    }
}
