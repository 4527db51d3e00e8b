// Sample and series domain models

#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub timestamp: String,
    pub value: f64,
}

impl Sample {
    pub fn new(timestamp: impl Into<String>, value: f64) -> Self {
        Self {
            timestamp: timestamp.into(),
            value,
        }
    }
}

/// One plotted line. Values and timestamps are kept as parallel vectors of
/// equal length, in discovery order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Series {
    values: Vec<f64>,
    timestamps: Vec<String>,
}

impl Series {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sample: Sample) {
        self.values.push(sample.value);
        self.timestamps.push(sample.timestamp);
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn timestamps(&self) -> &[String] {
        &self.timestamps
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<Sample> {
        let value = *self.values.get(idx)?;
        let timestamp = self.timestamps.get(idx)?.clone();
        Some(Sample { timestamp, value })
    }

    pub fn min(&self) -> Option<f64> {
        self.values.iter().copied().reduce(f64::min)
    }

    pub fn max(&self) -> Option<f64> {
        self.values.iter().copied().reduce(f64::max)
    }

    pub fn latest(&self) -> Option<f64> {
        self.values.last().copied()
    }

    pub fn first(&self) -> Option<f64> {
        self.values.first().copied()
    }

    pub fn stats(&self) -> Option<SeriesStats> {
        Some(SeriesStats {
            count: self.len(),
            min: self.min()?,
            max: self.max()?,
            latest: self.latest()?,
        })
    }
}

impl FromIterator<Sample> for Series {
    fn from_iter<I: IntoIterator<Item = Sample>>(iter: I) -> Self {
        let mut series = Series::new();
        for sample in iter {
            series.push(sample);
        }
        series
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesStats {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub latest: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregates() {
        let series: Series = [
            Sample::new("a", 5.0),
            Sample::new("b", -2.5),
            Sample::new("c", 15.0),
            Sample::new("d", 7.0),
        ]
        .into_iter()
        .collect();

        assert_eq!(series.len(), 4);
        assert_eq!(series.min(), Some(-2.5));
        assert_eq!(series.max(), Some(15.0));
        assert_eq!(series.latest(), Some(7.0));
        assert_eq!(series.timestamps().len(), series.values().len());
        assert_eq!(series.get(1), Some(Sample::new("b", -2.5)));
    }

    #[test]
    fn test_empty_series_has_no_stats() {
        let series = Series::new();
        assert!(series.is_empty());
        assert!(series.stats().is_none());
        assert_eq!(series.latest(), None);
    }
}
