// Value extraction - Turns raw records into a numeric series
use crate::domain::sample::{Sample, Series};
use crate::infrastructure::path_query::PathExpression;
use serde_json::Value;

const TIMESTAMP_FIELD: &str = "timestamp";

#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub series: Series,
    /// Records where the path was missing or not numeric.
    pub failures: usize,
}

pub fn extract_series(records: &[Value], expression: &PathExpression) -> Extraction {
    let mut extraction = Extraction::default();

    for record in records {
        match expression.evaluate_number(record) {
            Some(value) => extraction
                .series
                .push(Sample::new(record_timestamp(record), value)),
            None => extraction.failures += 1,
        }
    }

    if extraction.failures > 0 {
        tracing::debug!(
            "{} of {} records had no numeric value at '{}'",
            extraction.failures,
            records.len(),
            expression
        );
    }

    extraction
}

fn record_timestamp(record: &Value) -> String {
    match record.get(TIMESTAMP_FIELD) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}
