use thiserror::Error;

/// Fatal table-structure failures raised by the table parser.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("no <tbody> element found in the document")]
    NoTableBody,

    #[error("no <tr> rows found in the first <tbody>")]
    NoRows,

    #[error("the extraction schema must name at least one field")]
    EmptySchema,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConversionError {
    #[error("exchange rate for {0} is missing from the rate table")]
    MissingRate(String),
}

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("HTTP request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),

    #[error("Table extraction failed: {0}")]
    Parse(#[from] ParseError),

    #[error("Currency conversion failed: {0}")]
    Conversion(#[from] ConversionError),

    #[error("{sink} sink failed: {message}")]
    SinkError { sink: String, message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Structural,
    Conversion,
    Sink,
    Network,
    Configuration,
    Query,
    Io,
}

impl EtlError {
    pub fn sink(sink: &str, err: impl std::fmt::Display) -> Self {
        EtlError::SinkError {
            sink: sink.to_string(),
            message: err.to_string(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::Parse(_) => ErrorCategory::Structural,
            EtlError::Conversion(_) => ErrorCategory::Conversion,
            EtlError::SinkError { .. } => ErrorCategory::Sink,
            EtlError::ApiError(_) => ErrorCategory::Network,
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            EtlError::DatabaseError(_) => ErrorCategory::Query,
            EtlError::CsvError(_) | EtlError::IoError(_) | EtlError::ProcessingError { .. } => {
                ErrorCategory::Io
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Structural => format!("The source page has no usable table: {}", self),
            ErrorCategory::Conversion => format!("Exchange rates are incomplete: {}", self),
            ErrorCategory::Sink => format!("Could not save the results: {}", self),
            ErrorCategory::Network => format!("Could not download a source: {}", self),
            ErrorCategory::Configuration => format!("The configuration is invalid: {}", self),
            ErrorCategory::Query => format!("A database query failed: {}", self),
            ErrorCategory::Io => format!("A file could not be read: {}", self),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Structural => {
                "Check that source.url points at a page whose first table lists the banks"
            }
            ErrorCategory::Conversion => {
                "Make sure the rate source has Currency/Rate rows for GBP, EUR and INR"
            }
            ErrorCategory::Sink => "Check that load.csv_path and load.database_path are writable",
            ErrorCategory::Network => "Check network connectivity and the configured URLs",
            ErrorCategory::Configuration => "Fix the reported field in etl-config.toml",
            ErrorCategory::Query => "Check that load.table_name was loaded before querying",
            ErrorCategory::Io => "Check that the referenced files exist and are readable",
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
