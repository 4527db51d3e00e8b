// Markdown report rendering (non-interactive mode)
use std::fmt;

use crate::domain::sample::Series;
use crate::infrastructure::config::ReportConfig;
use crate::infrastructure::svg_chart::render_data_uri;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    Stable,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Trend {
    pub direction: TrendDirection,
    pub change: f64,
    pub percent: f64,
}

impl Trend {
    /// Change from the first to the last sample. A zero first value reports
    /// a 0% change rather than dividing by zero.
    pub fn of(series: &Series) -> Option<Self> {
        let first = series.first()?;
        let last = series.latest()?;
        let change = last - first;
        let percent = if first == 0.0 {
            0.0
        } else {
            change / first.abs() * 100.0
        };
        let direction = if change > 0.0 {
            TrendDirection::Increasing
        } else if change < 0.0 {
            TrendDirection::Decreasing
        } else {
            TrendDirection::Stable
        };
        Some(Self {
            direction,
            change,
            percent,
        })
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:+.1} ({:+.1}%)", self.change, self.percent)
    }
}

/// Row indices for the sample table: every index when the series fits,
/// otherwise `cap` indices spread evenly with the first and last included.
pub fn table_indices(len: usize, cap: usize) -> Vec<usize> {
    let cap = cap.max(2);
    if len <= cap {
        return (0..len).collect();
    }
    (0..cap).map(|k| k * (len - 1) / (cap - 1)).collect()
}

pub struct ReportInput<'a> {
    pub title: &'a str,
    pub series: &'a Series,
    pub notices: &'a [String],
}

fn format_value(value: f64) -> String {
    format!("{:.2}", value)
}

fn chart_section(input: &ReportInput<'_>, config: &ReportConfig) -> String {
    let series = input.series;
    if series.len() < 2 {
        return format!(
            "_Insufficient data for a chart: {} point(s), at least 2 needed._",
            series.len()
        );
    }

    match render_data_uri(series, input.title, config.chart_width, config.chart_height) {
        Ok(uri) => format!(
            "<img alt=\"{}\" width=\"{}\" height=\"{}\" src=\"{}\" />",
            input.title.replace('"', "&quot;"),
            config.chart_width,
            config.chart_height,
            uri
        ),
        Err(e) => {
            tracing::warn!("Chart rendering failed: {:#}", e);
            format!("_Chart unavailable: {}_", e)
        }
    }
}

fn sample_rows(series: &Series, max_rows: usize) -> Vec<String> {
    table_indices(series.len(), max_rows)
        .into_iter()
        .filter_map(|idx| series.get(idx).map(|sample| (idx, sample)))
        .map(|(idx, sample)| {
            let timestamp = if sample.timestamp.is_empty() {
                "-"
            } else {
                sample.timestamp.as_str()
            };
            format!("| {} | {} | {} |", idx + 1, timestamp, format_value(sample.value))
        })
        .collect()
}

fn trend_line(trend: Trend) -> String {
    match trend.direction {
        TrendDirection::Increasing => format!("📈 Increasing: {}", trend),
        TrendDirection::Decreasing => format!("📉 Decreasing: {}", trend),
        TrendDirection::Stable => format!("➡️ Stable: {}", trend),
    }
}

pub fn render_report(input: &ReportInput<'_>, config: &ReportConfig) -> String {
    let series = input.series;
    let mut lines = vec![format!("## 📈 {}", input.title), String::new()];

    if let Some(stats) = series.stats() {
        lines.extend([
            "| Metric | Value |".to_string(),
            "|--------|-------|".to_string(),
            format!("| Points | {} |", stats.count),
            format!("| Min | {} |", format_value(stats.min)),
            format!("| Max | {} |", format_value(stats.max)),
            format!("| Latest | {} |", format_value(stats.latest)),
            String::new(),
        ]);
    }

    lines.push(chart_section(input, config));
    lines.push(String::new());

    lines.extend([
        "### Sample Data".to_string(),
        String::new(),
        "| # | Timestamp | Value |".to_string(),
        "|---|-----------|-------|".to_string(),
    ]);
    lines.extend(sample_rows(series, config.max_table_rows));
    lines.push(String::new());

    if let Some(trend) = Trend::of(series) {
        lines.extend(["### Trend".to_string(), String::new(), trend_line(trend)]);
    }

    if !input.notices.is_empty() {
        lines.push(String::new());
        lines.extend(input.notices.iter().cloned());
    }

    let mut report = lines.join("\n");
    report.push('\n');
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::sample::Sample;
    use crate::infrastructure::config::VisualizerConfig;

    fn series_of(values: &[f64]) -> Series {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| Sample::new(format!("2024-01-01T00:00:{:02}Z", i), *v))
            .collect()
    }

    #[test]
    fn test_trend_scenarios() {
        let up = Trend::of(&series_of(&[5.0, 15.0])).unwrap();
        assert_eq!(up.direction, TrendDirection::Increasing);
        assert_eq!(up.to_string(), "+10.0 (+200.0%)");

        let down = Trend::of(&series_of(&[10.0, 2.0, 5.0])).unwrap();
        assert_eq!(down.direction, TrendDirection::Decreasing);
        assert_eq!(down.to_string(), "-5.0 (-50.0%)");

        let flat = Trend::of(&series_of(&[3.0, 9.0, 3.0])).unwrap();
        assert_eq!(flat.direction, TrendDirection::Stable);

        let from_zero = Trend::of(&series_of(&[0.0, 4.0])).unwrap();
        assert_eq!(from_zero.percent, 0.0);
        assert_eq!(from_zero.to_string(), "+4.0 (+0.0%)");

        assert!(Trend::of(&Series::new()).is_none());
    }

    #[test]
    fn test_table_indices() {
        assert_eq!(table_indices(3, 20), vec![0, 1, 2]);
        let spread = table_indices(100, 20);
        assert_eq!(spread.len(), 20);
        assert_eq!(spread.first(), Some(&0));
        assert_eq!(spread.last(), Some(&99));
        assert!(spread.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(table_indices(0, 20), Vec::<usize>::new());
    }

    #[test]
    fn test_report_sections() {
        let series = series_of(&[5.0, 15.0]);
        let notices = vec!["⚠️ Could not load 1 file(s)".to_string()];
        let report = render_report(
            &ReportInput {
                title: "Data Visualization: value",
                series: &series,
                notices: &notices,
            },
            &VisualizerConfig::default().report,
        );

        assert!(report.starts_with("## 📈 Data Visualization: value"));
        assert!(report.contains("| Points | 2 |"));
        assert!(report.contains("| Min | 5.00 |"));
        assert!(report.contains("| Latest | 15.00 |"));
        assert!(report.contains("data:image/svg+xml;base64,"));
        assert!(report.contains("| 2 | 2024-01-01T00:00:01Z | 15.00 |"));
        assert!(report.contains("📈 Increasing: +10.0 (+200.0%)"));
        assert!(report.ends_with("⚠️ Could not load 1 file(s)\n"));

        let order: Vec<usize> = ["| Metric |", "<img", "### Sample Data", "### Trend", "⚠️"]
            .iter()
            .map(|section| report.find(section).unwrap())
            .collect();
        assert!(order.windows(2).all(|w| w[0] < w[1]), "{}", report);
        assert!(report.contains("|-------|\n| 1 | 2024-01-01T00:00:00Z | 5.00 |\n"));
    }

    #[test]
    fn test_single_point_report_has_no_chart() {
        let series = series_of(&[7.0]);
        let report = render_report(
            &ReportInput {
                title: "t",
                series: &series,
                notices: &[],
            },
            &VisualizerConfig::default().report,
        );

        assert!(report.contains("Insufficient data for a chart"));
        assert!(!report.contains("<img"));
        assert!(report.contains("➡️ Stable: +0.0 (+0.0%)"));
    }
}
