// SVG line chart rendering for reports
use crate::domain::sample::Series;
use anyhow::Result;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use plotters::prelude::*;

const SERIES_COLOR: RGBColor = RGBColor(30, 144, 255);
const TREND_COLOR: RGBColor = RGBColor(200, 0, 100);

/// Least-squares line through `(index, value)`, as `(slope, intercept)`.
pub fn linear_fit(values: &[f64]) -> Option<(f64, f64)> {
    if values.len() < 2 {
        return None;
    }
    let n = values.len() as f64;
    let mean_x = (n - 1.0) / 2.0;
    let mean_y = values.iter().sum::<f64>() / n;

    let (num, den) = values
        .iter()
        .enumerate()
        .fold((0.0, 0.0), |(num, den), (i, y)| {
            let dx = i as f64 - mean_x;
            (num + dx * (y - mean_y), den + dx * dx)
        });

    let slope = num / den;
    let intercept = mean_y - slope * mean_x;
    (slope.is_finite() && intercept.is_finite()).then_some((slope, intercept))
}

fn value_range(series: &Series) -> (f64, f64) {
    let min = series.min().unwrap_or(0.0);
    let max = series.max().unwrap_or(0.0);
    let span = max - min;
    if !span.is_finite() || span <= f64::EPSILON {
        return (min - 0.5, max + 0.5);
    }
    (min - span * 0.05, max + span * 0.05)
}

/// Render `series` as an SVG document: the sample line, point markers and a
/// fitted trend line. Needs at least two samples.
pub fn render_svg(series: &Series, caption: &str, width: u32, height: u32) -> Result<String> {
    anyhow::ensure!(
        series.len() >= 2,
        "need at least 2 samples to draw a chart, got {}",
        series.len()
    );

    let last_idx = (series.len() - 1) as f64;
    let (y_min, y_max) = value_range(series);
    let points: Vec<(f64, f64)> = series
        .values()
        .iter()
        .enumerate()
        .map(|(i, v)| (i as f64, *v))
        .collect();

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (width, height)).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(caption, ("sans-serif", 18))
            .margin(20)
            .set_label_area_size(LabelAreaPosition::Left, 60)
            .set_label_area_size(LabelAreaPosition::Bottom, 40)
            .build_cartesian_2d(0.0..last_idx, y_min..y_max)?;

        chart
            .configure_mesh()
            .x_desc("Sample")
            .y_desc("Value")
            .x_label_formatter(&|v| format!("{:.0}", v))
            .y_label_formatter(&|v| format!("{:.2}", v))
            .draw()?;

        chart
            .draw_series(LineSeries::new(points.iter().copied(), &SERIES_COLOR))?
            .label("Value")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], SERIES_COLOR));

        chart.draw_series(
            points
                .iter()
                .map(|p| Circle::new(*p, 3, SERIES_COLOR.filled())),
        )?;

        if let Some((slope, intercept)) = linear_fit(series.values()) {
            chart
                .draw_series(LineSeries::new(
                    [(0.0, intercept), (last_idx, intercept + slope * last_idx)],
                    &TREND_COLOR,
                ))?
                .label("Trend")
                .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], TREND_COLOR));
        }

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .position(SeriesLabelPosition::UpperLeft)
            .draw()?;

        root.present()?;
    }

    Ok(svg)
}

/// Base64 `data:` URI for embedding the chart inline.
pub fn render_data_uri(series: &Series, caption: &str, width: u32, height: u32) -> Result<String> {
    let svg = render_svg(series, caption, width, height)?;
    Ok(format!(
        "data:image/svg+xml;base64,{}",
        BASE64_STANDARD.encode(svg.as_bytes())
    ))
}
