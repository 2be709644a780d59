use crate::domain::model::{ConversionPolicy, RateTable, Record};
use crate::utils::error::ConversionError;

/// Derives the GBP/EUR/INR columns from the USD figure of every record.
#[derive(Debug, Clone, Default)]
pub struct UnitConverter {
    policy: ConversionPolicy,
}

impl UnitConverter {
    pub fn new(policy: ConversionPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ConversionPolicy {
        &self.policy
    }

    /// Fails before touching any record if a target rate is missing.
    pub fn convert(
        &self,
        mut records: Vec<Record>,
        rates: &RateTable,
    ) -> Result<Vec<Record>, ConversionError> {
        let factors = self
            .policy
            .targets
            .iter()
            .map(|&currency| {
                rates
                    .get(currency.code())
                    .map(|rate| (currency, rate))
                    .ok_or_else(|| ConversionError::MissingRate(currency.code().to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        for record in &mut records {
            for &(currency, rate) in &factors {
                let value = self.policy.round(record.mc_usd_billion * rate);
                record.set_converted(currency, value);
            }
        }

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Currency;

    fn rates(entries: &[(&str, f64)]) -> RateTable {
        entries
            .iter()
            .map(|(code, rate)| (code.to_string(), *rate))
            .collect()
    }

    #[test]
    fn test_convert_example_records() {
        let records = vec![Record::new("Global Bank", 100.5), Record::new("Local Bank", 0.0)];
        let table = rates(&[("GBP", 0.8), ("EUR", 0.9), ("INR", 80.0)]);

        let converted = UnitConverter::default().convert(records, &table).unwrap();

        assert_eq!(converted[0].name, "Global Bank");
        assert_eq!(converted[0].mc_usd_billion, 100.5);
        assert_eq!(converted[0].mc_gbp_billion, Some(80.4));
        assert_eq!(converted[0].mc_eur_billion, Some(90.45));
        assert_eq!(converted[0].mc_inr_billion, Some(8040.0));

        assert_eq!(converted[1].mc_gbp_billion, Some(0.0));
        assert_eq!(converted[1].mc_eur_billion, Some(0.0));
        assert_eq!(converted[1].mc_inr_billion, Some(0.0));
    }

    #[test]
    fn test_convert_is_deterministic() {
        let records = vec![
            Record::new("A", 432.92),
            Record::new("B", 231.52),
            Record::new("C", 194.56),
        ];
        let table = rates(&[("GBP", 0.8), ("EUR", 0.93), ("INR", 82.95)]);
        let converter = UnitConverter::default();

        let first = converter.convert(records.clone(), &table).unwrap();
        let second = converter.convert(records, &table).unwrap();

        assert_eq!(first, second);
        for record in &first {
            let expected = (record.mc_usd_billion * 0.8 * 100.0).round() / 100.0;
            assert_eq!(record.converted(Currency::Gbp), Some(expected));
        }
    }

    #[test]
    fn test_missing_eur_fails() {
        let records = vec![Record::new("A", 1.0)];
        let table = rates(&[("GBP", 0.8), ("INR", 82.95)]);

        let err = UnitConverter::default().convert(records, &table).unwrap_err();

        assert_eq!(err, ConversionError::MissingRate("EUR".to_string()));
    }

    #[test]
    fn test_missing_rate_fails_on_empty_input() {
        let err = UnitConverter::default()
            .convert(Vec::new(), &RateTable::new())
            .unwrap_err();

        assert_eq!(err, ConversionError::MissingRate("GBP".to_string()));
    }

    #[test]
    fn test_rounding_is_half_away_from_zero() {
        let table = rates(&[("GBP", 1.0), ("EUR", 1.0), ("INR", 1.0)]);

        let converted = UnitConverter::default()
            .convert(vec![Record::new("A", 0.125)], &table)
            .unwrap();

        assert_eq!(converted[0].mc_gbp_billion, Some(0.13));
    }
}
