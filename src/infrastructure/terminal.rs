// Crossterm-backed terminal surface
use crate::application::surface::{Key, Surface, SurfaceError, SurfaceProvider};
use crate::presentation::frame::{Frame, Style, Tint};
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, queue};
use std::io::{self, IsTerminal, Stdout, Write};

/// Owns the terminal while alive: raw mode and the alternate screen are
/// entered on `acquire` and restored on drop, including during unwinding.
pub struct TerminalSurface {
    stdout: Stdout,
    size: (u16, u16),
    color: bool,
}

impl TerminalSurface {
    /// Whether stdout is attached to an interactive terminal at all.
    pub fn is_available() -> bool {
        io::stdout().is_terminal()
    }

    pub fn acquire() -> Result<Self, SurfaceError> {
        let size = terminal::size()?;
        let color = std::env::var_os("NO_COLOR").is_none()
            && crossterm::style::available_color_count() >= 8;

        terminal::enable_raw_mode()?;
        let mut surface = Self {
            stdout: io::stdout(),
            size,
            color,
        };
        execute!(surface.stdout, EnterAlternateScreen, Hide, Clear(ClearType::All))?;
        Ok(surface)
    }

    fn apply_style(&mut self, style: Style) -> io::Result<()> {
        queue!(self.stdout, SetAttribute(Attribute::Reset), ResetColor)?;
        if let Some(tint) = style.tint.filter(|_| self.color) {
            queue!(self.stdout, SetForegroundColor(terminal_color(tint)))?;
        }
        if style.bold {
            queue!(self.stdout, SetAttribute(Attribute::Bold))?;
        }
        if style.reverse {
            queue!(self.stdout, SetAttribute(Attribute::Reverse))?;
        }
        Ok(())
    }
}

fn terminal_color(tint: Tint) -> Color {
    match tint {
        Tint::Yellow => Color::Yellow,
        Tint::Green => Color::Green,
        Tint::Blue => Color::Blue,
        Tint::White => Color::White,
    }
}

impl Surface for TerminalSurface {
    fn size(&self) -> (u16, u16) {
        self.size
    }

    fn supports_color(&self) -> bool {
        self.color
    }

    fn render(&mut self, frame: &Frame) -> Result<(), SurfaceError> {
        queue!(self.stdout, Clear(ClearType::All))?;

        for y in 0..frame.height() {
            queue!(self.stdout, MoveTo(0, y))?;
            let mut current: Option<Style> = None;
            for cell in frame.row(y) {
                if current != Some(cell.style) {
                    self.apply_style(cell.style)?;
                    current = Some(cell.style);
                }
                queue!(self.stdout, Print(cell.ch))?;
            }
        }

        queue!(self.stdout, SetAttribute(Attribute::Reset), ResetColor)?;
        self.stdout.flush()?;
        Ok(())
    }

    fn read_key(&mut self) -> Result<Key, SurfaceError> {
        loop {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    return Ok(match key.code {
                        KeyCode::Char(c) => Key::Char(c),
                        KeyCode::Up => Key::Up,
                        KeyCode::Down => Key::Down,
                        KeyCode::Enter => Key::Enter,
                        KeyCode::Esc => Key::Esc,
                        _ => Key::Other,
                    });
                }
                Event::Resize(width, height) => {
                    self.size = (width, height);
                    return Ok(Key::Resize);
                }
                _ => continue,
            }
        }
    }
}

/// Provides the process terminal when stdout is attached to one.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalSurfaceProvider;

impl SurfaceProvider for TerminalSurfaceProvider {
    fn acquire(&self) -> Result<Option<Box<dyn Surface>>, SurfaceError> {
        if !TerminalSurface::is_available() {
            return Ok(None);
        }
        Ok(Some(Box::new(TerminalSurface::acquire()?)))
    }
}

impl Drop for TerminalSurface {
    fn drop(&mut self) {
        let _ = execute!(
            self.stdout,
            SetAttribute(Attribute::Reset),
            ResetColor,
            Show,
            LeaveAlternateScreen
        );
        let _ = terminal::disable_raw_mode();
    }
}
