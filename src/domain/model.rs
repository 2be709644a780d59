use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// One ranked entity. The converted columns stay `None` until the
/// currency transform has run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "MC_USD_Billion")]
    pub mc_usd_billion: f64,
    #[serde(rename = "MC_GBP_Billion")]
    pub mc_gbp_billion: Option<f64>,
    #[serde(rename = "MC_EUR_Billion")]
    pub mc_eur_billion: Option<f64>,
    #[serde(rename = "MC_INR_Billion")]
    pub mc_inr_billion: Option<f64>,
}

impl Record {
    /// Column order shared by the flat file and the relational table.
    pub const COLUMNS: [&'static str; 5] = [
        "Name",
        "MC_USD_Billion",
        "MC_GBP_Billion",
        "MC_EUR_Billion",
        "MC_INR_Billion",
    ];

    pub fn new(name: impl Into<String>, mc_usd_billion: f64) -> Self {
        Self {
            name: name.into(),
            mc_usd_billion,
            mc_gbp_billion: None,
            mc_eur_billion: None,
            mc_inr_billion: None,
        }
    }

    pub fn converted(&self, currency: Currency) -> Option<f64> {
        match currency {
            Currency::Gbp => self.mc_gbp_billion,
            Currency::Eur => self.mc_eur_billion,
            Currency::Inr => self.mc_inr_billion,
        }
    }

    pub fn set_converted(&mut self, currency: Currency, value: f64) {
        match currency {
            Currency::Gbp => self.mc_gbp_billion = Some(value),
            Currency::Eur => self.mc_eur_billion = Some(value),
            Currency::Inr => self.mc_inr_billion = Some(value),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Currency {
    Gbp,
    Eur,
    Inr,
}

impl Currency {
    pub fn code(self) -> &'static str {
        match self {
            Currency::Gbp => "GBP",
            Currency::Eur => "EUR",
            Currency::Inr => "INR",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Target currencies and rounding applied by the unit converter.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionPolicy {
    pub targets: Vec<Currency>,
    pub decimals: i32,
}

impl Default for ConversionPolicy {
    fn default() -> Self {
        Self {
            targets: vec![Currency::Gbp, Currency::Eur, Currency::Inr],
            decimals: 2,
        }
    }
}

impl ConversionPolicy {
    /// Rounds half away from zero.
    pub fn round(&self, value: f64) -> f64 {
        let factor = 10f64.powi(self.decimals);
        (value * factor).round() / factor
    }
}

/// Currency code to multiplier relative to USD.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RateTable {
    rates: HashMap<String, f64>,
}

impl RateTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, code: impl Into<String>, rate: f64) {
        self.rates.insert(code.into(), rate);
    }

    pub fn get(&self, code: &str) -> Option<f64> {
        self.rates.get(code).copied()
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

impl FromIterator<(String, f64)> for RateTable {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self {
            rates: iter.into_iter().collect(),
        }
    }
}

/// A single cell returned by a query.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlValue::Null => f.write_str("None"),
            SqlValue::Integer(i) => write!(f, "{}", i),
            SqlValue::Real(r) => write_real(f, *r),
            SqlValue::Text(s) => write_quoted(f, s),
            SqlValue::Blob(b) => write!(f, "<{} bytes>", b.len()),
        }
    }
}

/// Shortest round-trip digits; exponent form outside `[1e-4, 1e16)`.
fn write_real(f: &mut fmt::Formatter<'_>, r: f64) -> fmt::Result {
    if r.is_nan() {
        return f.write_str("nan");
    }
    if r.is_infinite() {
        return f.write_str(if r > 0.0 { "inf" } else { "-inf" });
    }

    let magnitude = r.abs();
    if magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        let formatted = format!("{:e}", r);
        let (mantissa, exponent) = formatted.split_once('e').unwrap_or((formatted.as_str(), "0"));
        let (sign, digits) = match exponent.strip_prefix('-') {
            Some(digits) => ('-', digits),
            None => ('+', exponent),
        };
        return write!(f, "{}e{}{:0>2}", mantissa, sign, digits);
    }

    let formatted = r.to_string();
    if formatted.contains('.') {
        f.write_str(&formatted)
    } else {
        write!(f, "{}.0", formatted)
    }
}

/// Single quotes unless the text holds a `'` and no `"`.
fn write_quoted(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    let quote = if s.contains('\'') && !s.contains('"') { '"' } else { '\'' };
    write!(f, "{}", quote)?;
    for c in s.chars() {
        match c {
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            c if c == quote => write!(f, "\\{}", c)?,
            c if c.is_control() => write!(f, "\\x{:02x}", c as u32)?,
            c => write!(f, "{}", c)?,
        }
    }
    write!(f, "{}", quote)
}

/// One result row, printed tuple-style.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryRow(pub Vec<SqlValue>);

impl fmt::Display for QueryRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, value) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", value)?;
        }
        if self.0.len() == 1 {
            f.write_str(",")?;
        }
        f.write_str(")")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub records: usize,
    pub csv_location: String,
    pub table: String,
    pub queries_executed: usize,
}
