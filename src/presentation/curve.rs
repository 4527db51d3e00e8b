// Curve rasterization onto a character frame
use std::collections::HashSet;

use crate::domain::geometry::{PlotArea, RecencyBand, ScreenPoint};
use crate::infrastructure::config::RenderConfig;
use crate::presentation::frame::{Frame, Style, Tint};

pub const LINE_GLYPH: char = '·';
pub const MARKER_GLYPH: char = 'x';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveMode {
    MarkersOnly,
    Straight,
    Spline,
}

impl CurveMode {
    pub fn for_len(len: usize) -> Self {
        match len {
            0 | 1 => CurveMode::MarkersOnly,
            2 | 3 => CurveMode::Straight,
            _ => CurveMode::Spline,
        }
    }
}

/// Sample the Catmull-Rom segment between `p1` and `p2` at `steps + 1`
/// evenly spaced parameters, endpoints included.
pub fn catmull_rom(
    p0: (f64, f64),
    p1: (f64, f64),
    p2: (f64, f64),
    p3: (f64, f64),
    steps: usize,
) -> Vec<(f64, f64)> {
    let steps = steps.max(1);
    (0..=steps)
        .map(|i| {
            let t = i as f64 / steps as f64;
            let t2 = t * t;
            let t3 = t2 * t;

            let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
            let h10 = t3 - 2.0 * t2 + t;
            let h01 = -2.0 * t3 + 3.0 * t2;
            let h11 = t3 - t2;

            let m1 = ((p2.0 - p0.0) / 2.0, (p2.1 - p0.1) / 2.0);
            let m2 = ((p3.0 - p1.0) / 2.0, (p3.1 - p1.1) / 2.0);

            (
                h00 * p1.0 + h10 * m1.0 + h01 * p2.0 + h11 * m2.0,
                h00 * p1.1 + h10 * m1.1 + h01 * p2.1 + h11 * m2.1,
            )
        })
        .collect()
}

/// Cells covered by the line from `from` to `to`, stepping `step` cells at a
/// time along the dominant axis and rounding the other coordinate. Each cell
/// appears once.
pub fn rasterize_line(from: (f64, f64), to: (f64, f64), step: f64) -> Vec<ScreenPoint> {
    let step = if step > 0.0 && step.is_finite() { step } else { 0.5 };
    let ((mut x0, mut y0), (mut x1, mut y1)) = (from, to);
    if ![x0, y0, x1, y1].iter().all(|v| v.is_finite()) {
        return Vec::new();
    }

    let steep = (y1 - y0).abs() > (x1 - x0).abs();
    if steep {
        std::mem::swap(&mut x0, &mut y0);
        std::mem::swap(&mut x1, &mut y1);
    }
    if x0 > x1 {
        std::mem::swap(&mut x0, &mut x1);
        std::mem::swap(&mut y0, &mut y1);
    }

    let dx = x1 - x0;
    let slope = if dx == 0.0 { 0.0 } else { (y1 - y0) / dx };

    let mut seen = HashSet::new();
    let mut cells = Vec::new();
    let mut plot = |major: f64, minor: f64| {
        let (x, y) = if steep { (minor, major) } else { (major, minor) };
        let point = ScreenPoint::new(x.round() as i32, y.round() as i32);
        if seen.insert(point) {
            cells.push(point);
        }
    };

    let count = (dx / step).floor() as usize;
    for i in 0..=count {
        let major = x0 + i as f64 * step;
        plot(major, y0 + slope * (major - x0));
    }
    plot(x1, y1);

    cells
}

fn band_style(idx: usize, total: usize, color: bool) -> Style {
    if color {
        Style::tinted(Some(Tint::from(RecencyBand::of(idx, total))))
    } else {
        Style::plain()
    }
}

/// Connect `points` (already projected into `area`) and mark each one.
/// Four or more points get spline interpolation, two or three get straight
/// segments, fewer get markers only. With `color` set the segments and
/// markers are tinted by recency band.
pub fn draw_curve(
    frame: &mut Frame,
    area: &PlotArea,
    points: &[ScreenPoint],
    config: &RenderConfig,
    color: bool,
) {
    let total = points.len();
    let as_f = |p: &ScreenPoint| (f64::from(p.x), f64::from(p.y));

    match CurveMode::for_len(total) {
        CurveMode::Spline => {
            for i in 0..total - 1 {
                let p0 = as_f(&points[i.saturating_sub(1)]);
                let p1 = as_f(&points[i]);
                let p2 = as_f(&points[i + 1]);
                let p3 = as_f(&points[(i + 2).min(total - 1)]);
                let style = band_style(i, total, color);

                let samples: Vec<(f64, f64)> = catmull_rom(p0, p1, p2, p3, config.spline_steps)
                    .into_iter()
                    .map(|(x, y)| area.clamp(x, y))
                    .collect();

                for pair in samples.windows(2) {
                    for cell in rasterize_line(pair[0], pair[1], config.line_step) {
                        frame.put(cell.x, cell.y, LINE_GLYPH, style);
                    }
                }
            }
        }
        CurveMode::Straight => {
            for i in 1..total {
                let style = band_style(i - 1, total, color);
                let cells =
                    rasterize_line(as_f(&points[i - 1]), as_f(&points[i]), config.line_step);
                for cell in cells {
                    frame.put(cell.x, cell.y, LINE_GLYPH, style);
                }
            }
        }
        CurveMode::MarkersOnly => {}
    }

    for (i, p) in points.iter().enumerate() {
        frame.put(p.x, p.y, MARKER_GLYPH, band_style(i, total, color));
    }
}
