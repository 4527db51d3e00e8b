// Interactive views: the plot display and the timeframe menu
use crate::application::timeframe_filter::parse_timestamp;
use crate::domain::geometry::PlotArea;
use crate::domain::sample::Series;
use crate::domain::timeframe::MENU_OPTIONS;
use crate::infrastructure::config::RenderConfig;
use crate::presentation::curve::draw_curve;
use crate::presentation::frame::{Frame, Style, Tint};
use chrono::DateTime;

pub const DISPLAY_FOOTER: &str = "Press T for timeframe options | Any other key to exit";
pub const MENU_TITLE: &str = "Select Timeframe";
pub const MENU_INSTRUCTION: &str = "Use arrow keys to select, Enter to confirm";

const MENU_FIRST_OPTION_ROW: u16 = 5;

/// Smallest surface the plot is drawn on; anything smaller falls back to
/// the report. The menu instruction and every option must fit inside the
/// border.
pub const MIN_WIDTH: u16 = MENU_INSTRUCTION.len() as u16 + 4;
pub const MIN_HEIGHT: u16 = MENU_FIRST_OPTION_ROW + MENU_OPTIONS.len() as u16 + 1;

fn tint(color: bool, tint: Tint) -> Option<Tint> {
    color.then_some(tint)
}

/// Axis tick label: `HH:MM:SS` for parseable timestamps, otherwise the raw
/// text cut to ten characters.
pub fn tick_label(timestamp: &str) -> Option<String> {
    if timestamp.is_empty() {
        return None;
    }
    // Offset timestamps keep the wall-clock time they were written with
    if let Ok(dt) = DateTime::parse_from_rfc3339(timestamp) {
        return Some(dt.format("%H:%M:%S").to_string());
    }
    if let Some(dt) = parse_timestamp(timestamp) {
        return Some(dt.format("%H:%M:%S").to_string());
    }
    if timestamp.chars().count() > 10 {
        let head: String = timestamp.chars().take(10).collect();
        Some(format!("{}...", head))
    } else {
        Some(timestamp.to_string())
    }
}

fn draw_axes(frame: &mut Frame, series: &Series, area: &PlotArea) {
    let (w, h) = (area.width(), area.height());
    let style = Style::plain();

    frame.put(2, h - 3, '└', style);
    frame.hline(3, h - 3, w - 6, '─', style);
    frame.put(w - 3, h - 3, '┤', style);

    frame.put(2, 2, '┬', style);
    frame.vline(2, 3, h - 6, '│', style);

    frame.text(w / 2 - 4, h - 2, "Time →", style);
    frame.vertical_text(1, h / 2 - 2, "Value", style);

    if let (Some(min), Some(max)) = (series.min(), series.max()) {
        if max != min {
            frame.text(4, 2, &format!("{:.1}", max), style);
            frame.text(4, h - 4, &format!("{:.1}", min), style);
        }
    }

    let timestamps = series.timestamps();
    if timestamps.len() > 1 {
        let x_scale = area.x_scale(series.len());
        for idx in [0, timestamps.len() / 2, timestamps.len() - 1] {
            let Some(label) = tick_label(&timestamps[idx]) else {
                continue;
            };
            let len = label.chars().count() as i32;
            let anchor = (3.0 + idx as f64 * x_scale) as i32;
            let x = (anchor - len / 2).min(w - len - 3).max(3);
            frame.text(x, h - 2, &label, style);
        }
    }
}

/// Full plot view for `series` on a `width x height` surface.
pub fn display_frame(
    series: &Series,
    title: &str,
    width: u16,
    height: u16,
    config: &RenderConfig,
    color: bool,
) -> Frame {
    let mut frame = Frame::new(width, height);
    let area = PlotArea::new(width, height);
    let h = i32::from(height);

    frame.border(Style::plain());
    frame.centered(1, title, Style::tinted(tint(color, Tint::White)).bold());

    if let Some(latest) = series.latest() {
        frame.centered(
            2,
            &format!("Latest Value: {:.2}", latest),
            Style::tinted(tint(color, Tint::Blue)),
        );
    }

    draw_axes(&mut frame, series, &area);

    let points = area.project(series.values(), config.flat_range_epsilon);
    draw_curve(&mut frame, &area, &points, config, color);

    frame.centered(h - 1, DISPLAY_FOOTER, Style::plain());

    if let Some(stats) = series.stats() {
        frame.centered(
            3,
            &format!(
                "Points: {} | Min: {:.2} | Max: {:.2}",
                stats.count, stats.min, stats.max
            ),
            Style::plain(),
        );
    }

    frame
}

/// Timeframe menu with the option at `cursor` highlighted.
pub fn menu_frame(cursor: usize, width: u16, height: u16) -> Frame {
    let mut frame = Frame::new(width, height);

    frame.border(Style::plain());
    frame.centered(1, MENU_TITLE, Style::plain().bold());
    frame.centered(3, MENU_INSTRUCTION, Style::plain());

    for (i, option) in MENU_OPTIONS.iter().enumerate() {
        let style = if i == cursor {
            Style::plain().reverse()
        } else {
            Style::plain()
        };
        let row = i32::from(MENU_FIRST_OPTION_ROW) + i as i32;
        frame.centered(row, &option.menu_label(), style);
    }

    frame
}
