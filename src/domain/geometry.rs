// Screen geometry: projecting a series onto a character grid

/// Cells reserved on every edge for the border, axes and labels.
pub const MARGIN: i32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScreenPoint {
    pub x: i32,
    pub y: i32,
}

impl ScreenPoint {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Drawable region of a `width x height` grid. Every projected or
/// interpolated coordinate is clamped into `[3, width-4] x [3, height-4]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotArea {
    width: i32,
    height: i32,
}

impl PlotArea {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width: i32::from(width),
            height: i32::from(height),
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn min_x(&self) -> i32 {
        MARGIN
    }

    pub fn max_x(&self) -> i32 {
        (self.width - MARGIN - 1).max(MARGIN)
    }

    pub fn min_y(&self) -> i32 {
        MARGIN
    }

    pub fn max_y(&self) -> i32 {
        (self.height - MARGIN - 1).max(MARGIN)
    }

    /// Column distance between consecutive samples.
    pub fn x_scale(&self, len: usize) -> f64 {
        let span = (self.width - 2 * MARGIN).max(0) as f64;
        span / len.saturating_sub(1).max(1) as f64
    }

    pub fn clamp(&self, x: f64, y: f64) -> (f64, f64) {
        let x = if x.is_nan() { self.min_x() as f64 } else { x };
        let y = if y.is_nan() { self.max_y() as f64 } else { y };
        (
            x.clamp(self.min_x() as f64, self.max_x() as f64),
            y.clamp(self.min_y() as f64, self.max_y() as f64),
        )
    }

    fn clamp_point(&self, x: f64, y: f64) -> ScreenPoint {
        let (x, y) = self.clamp(x, y);
        ScreenPoint::new(x.floor() as i32, y.floor() as i32)
    }

    /// Project `values` into the grid: index to column, value to row with
    /// larger values on higher rows. A range narrower than `epsilon` is
    /// widened to `epsilon` around its midpoint so a flat line sits centered.
    pub fn project(&self, values: &[f64], epsilon: f64) -> Vec<ScreenPoint> {
        let Some(min) = values.iter().copied().reduce(f64::min) else {
            return Vec::new();
        };
        let max = values.iter().copied().fold(min, f64::max);

        let epsilon = if epsilon > 0.0 { epsilon } else { f64::EPSILON };
        let (lower, range) = if max - min < epsilon {
            ((min + max) / 2.0 - epsilon / 2.0, epsilon)
        } else {
            (min, max - min)
        };

        let x_scale = self.x_scale(values.len());
        let y_scale = (self.height - 2 * MARGIN).max(0) as f64 / range;
        let bottom = (self.height - MARGIN - 1) as f64;

        values
            .iter()
            .enumerate()
            .map(|(i, v)| {
                let x = MARGIN as f64 + i as f64 * x_scale;
                let y = bottom - (v - lower) * y_scale;
                self.clamp_point(x, y)
            })
            .collect()
    }
}

/// Position-based recency group used to colour a curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecencyBand {
    Oldest,
    Middle,
    Newest,
}

impl RecencyBand {
    /// Oldest and newest bands each get `total / 3` indices, the middle band
    /// takes the remainder.
    pub fn of(idx: usize, total: usize) -> Self {
        let old_threshold = total / 3;
        let new_threshold = total - old_threshold;
        if idx < old_threshold {
            RecencyBand::Oldest
        } else if idx < new_threshold {
            RecencyBand::Middle
        } else {
            RecencyBand::Newest
        }
    }
}
