// Character grid that views are composed onto before reaching a surface
use crate::domain::geometry::RecencyBand;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tint {
    Yellow,
    Green,
    Blue,
    White,
}

impl From<RecencyBand> for Tint {
    fn from(band: RecencyBand) -> Self {
        match band {
            RecencyBand::Oldest => Tint::Yellow,
            RecencyBand::Middle => Tint::Green,
            RecencyBand::Newest => Tint::Blue,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Style {
    pub tint: Option<Tint>,
    pub bold: bool,
    pub reverse: bool,
}

impl Style {
    pub fn plain() -> Self {
        Self::default()
    }

    pub fn tinted(tint: Option<Tint>) -> Self {
        Self {
            tint,
            ..Self::default()
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn reverse(mut self) -> Self {
        self.reverse = true;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub style: Style,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            style: Style::plain(),
        }
    }
}

/// Writes outside the grid are ignored, so callers never need to bounds
/// check text that may run past an edge.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl Frame {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); usize::from(width) * usize::from(height)],
        }
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        if x >= usize::from(self.width) || y >= usize::from(self.height) {
            return None;
        }
        Some(y * usize::from(self.width) + x)
    }

    pub fn put(&mut self, x: i32, y: i32, ch: char, style: Style) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = Cell { ch, style };
        }
    }

    pub fn text(&mut self, x: i32, y: i32, text: &str, style: Style) {
        for (offset, ch) in text.chars().enumerate() {
            self.put(x + offset as i32, y, ch, style);
        }
    }

    pub fn centered(&mut self, y: i32, text: &str, style: Style) {
        let len = text.chars().count() as i32;
        let x = ((i32::from(self.width) - len) / 2).max(0);
        self.text(x, y, text, style);
    }

    pub fn vertical_text(&mut self, x: i32, y: i32, text: &str, style: Style) {
        for (offset, ch) in text.chars().enumerate() {
            self.put(x, y + offset as i32, ch, style);
        }
    }

    pub fn hline(&mut self, x: i32, y: i32, len: i32, ch: char, style: Style) {
        for dx in 0..len.max(0) {
            self.put(x + dx, y, ch, style);
        }
    }

    pub fn vline(&mut self, x: i32, y: i32, len: i32, ch: char, style: Style) {
        for dy in 0..len.max(0) {
            self.put(x, y + dy, ch, style);
        }
    }

    pub fn border(&mut self, style: Style) {
        let right = i32::from(self.width) - 1;
        let bottom = i32::from(self.height) - 1;
        if right < 1 || bottom < 1 {
            return;
        }
        self.hline(1, 0, right - 1, '─', style);
        self.hline(1, bottom, right - 1, '─', style);
        self.vline(0, 1, bottom - 1, '│', style);
        self.vline(right, 1, bottom - 1, '│', style);
        self.put(0, 0, '┌', style);
        self.put(right, 0, '┐', style);
        self.put(0, bottom, '└', style);
        self.put(right, bottom, '┘', style);
    }

    pub fn row(&self, y: u16) -> &[Cell] {
        let start = usize::from(y) * usize::from(self.width);
        let end = (start + usize::from(self.width)).min(self.cells.len());
        &self.cells[start.min(end)..end]
    }
}

#[cfg(test)]
impl Frame {
    pub fn cell(&self, x: i32, y: i32) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    pub fn row_text(&self, y: u16) -> String {
        self.row(y).iter().map(|c| c.ch).collect()
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        (0..self.height).any(|y| self.row_text(y).contains(needle))
    }

    pub fn count_char(&self, ch: char) -> usize {
        self.cells.iter().filter(|c| c.ch == ch).count()
    }
}
