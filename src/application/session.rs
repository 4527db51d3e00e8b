// Interactive session - Display / menu state machine over a Surface
use crate::application::surface::{Key, Surface, SurfaceError};
use crate::application::timeframe_filter::filter_series;
use crate::domain::sample::Series;
use crate::domain::timeframe::{MENU_OPTIONS, Timeframe};
use crate::infrastructure::config::RenderConfig;
use crate::presentation::plot_view::{display_frame, menu_frame};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Display,
    Menu { cursor: usize },
    Exit,
}

/// Everything the views need across redraws: the unfiltered series, the
/// active window and the series filtered to it.
#[derive(Debug, Clone)]
pub struct SessionData {
    expression: String,
    full: Series,
    window: Timeframe,
    series: Series,
}

impl SessionData {
    pub fn new(expression: impl Into<String>, full: Series, window: Timeframe) -> Self {
        let series = filter_series(&full, window);
        Self {
            expression: expression.into(),
            full,
            window,
            series,
        }
    }

    pub fn window(&self) -> Timeframe {
        self.window
    }

    pub fn series(&self) -> &Series {
        &self.series
    }

    pub fn title(&self) -> String {
        plot_title(&self.expression, self.window)
    }

    pub fn apply_window(&mut self, window: Timeframe) {
        tracing::debug!("Switching window to {}", window);
        self.window = window;
        self.series = filter_series(&self.full, window);
    }
}

pub fn plot_title(expression: &str, window: Timeframe) -> String {
    match window {
        Timeframe::Seconds(s) => format!("Data Visualization: {} (Last {} seconds)", expression, s),
        Timeframe::All => format!("Data Visualization: {}", expression),
    }
}

pub struct InteractiveSession<'a, S: Surface + ?Sized> {
    surface: &'a mut S,
    data: SessionData,
    config: RenderConfig,
    state: SessionState,
}

impl<'a, S: Surface + ?Sized> InteractiveSession<'a, S> {
    pub fn new(surface: &'a mut S, data: SessionData, config: RenderConfig) -> Self {
        Self {
            surface,
            data,
            config,
            state: SessionState::Display,
        }
    }

    /// Apply one key press to the current state.
    pub fn handle_key(&mut self, key: Key) -> SessionState {
        self.state = match (self.state, key) {
            (SessionState::Display, Key::Char('t' | 'T')) => SessionState::Menu {
                cursor: self.data.window().menu_index(),
            },
            (SessionState::Display, Key::Resize) => SessionState::Display,
            (SessionState::Display, _) => SessionState::Exit,

            (SessionState::Menu { cursor }, Key::Up) => SessionState::Menu {
                cursor: cursor.saturating_sub(1),
            },
            (SessionState::Menu { cursor }, Key::Down) => SessionState::Menu {
                cursor: (cursor + 1).min(MENU_OPTIONS.len() - 1),
            },
            (SessionState::Menu { cursor }, Key::Enter) => {
                self.data.apply_window(MENU_OPTIONS[cursor]);
                SessionState::Display
            }
            (SessionState::Menu { .. }, Key::Esc) => SessionState::Display,
            (menu @ SessionState::Menu { .. }, _) => menu,

            (SessionState::Exit, _) => SessionState::Exit,
        };
        self.state
    }

    fn draw(&mut self) -> Result<(), SurfaceError> {
        let (width, height) = self.surface.size();
        let frame = match self.state {
            SessionState::Display => display_frame(
                self.data.series(),
                &self.data.title(),
                width,
                height,
                &self.config,
                self.surface.supports_color(),
            ),
            SessionState::Menu { cursor } => menu_frame(cursor, width, height),
            SessionState::Exit => return Ok(()),
        };
        self.surface.render(&frame)
    }

    /// Block on key presses until the exit key, then return the summary.
    pub fn run(mut self) -> Result<String, SurfaceError> {
        while self.state != SessionState::Exit {
            self.draw()?;
            let key = self.surface.read_key()?;
            self.handle_key(key);
        }

        Ok(format!(
            "✅ Successfully visualized {} data points from expression: '{}'",
            self.data.series().len(),
            self.data.title()
        ))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::sample::Sample;
    use crate::infrastructure::config::VisualizerConfig;
    use crate::presentation::frame::Frame;
    use std::collections::VecDeque;
    use std::io;

    /// Headless surface that replays a fixed key script and keeps every
    /// rendered frame.
    pub(crate) struct ScriptedSurface {
        pub width: u16,
        pub height: u16,
        pub color: bool,
        pub keys: VecDeque<Key>,
        pub frames: Vec<Frame>,
    }

    impl ScriptedSurface {
        pub(crate) fn new(keys: &[Key]) -> Self {
            Self {
                width: 80,
                height: 24,
                color: true,
                keys: keys.iter().copied().collect(),
                frames: Vec::new(),
            }
        }
    }

    impl Surface for ScriptedSurface {
        fn size(&self) -> (u16, u16) {
            (self.width, self.height)
        }

        fn supports_color(&self) -> bool {
            self.color
        }

        fn render(&mut self, frame: &Frame) -> Result<(), SurfaceError> {
            self.frames.push(frame.clone());
            Ok(())
        }

        fn read_key(&mut self) -> Result<Key, SurfaceError> {
            self.keys.pop_front().ok_or_else(|| {
                io::Error::new(io::ErrorKind::UnexpectedEof, "key script exhausted").into()
            })
        }
    }

    fn minute_of_data() -> Series {
        (0..=12)
            .map(|i| {
                let timestamp = format!("2024-01-01T00:{:02}:{:02}Z", i * 5 / 60, i * 5 % 60);
                Sample::new(timestamp, i as f64)
            })
            .collect()
    }

    fn session_data(window: Timeframe) -> SessionData {
        SessionData::new("value", minute_of_data(), window)
    }

    #[test]
    fn test_any_other_key_exits_from_display() {
        let mut surface = ScriptedSurface::new(&[Key::Char('q')]);
        let session = InteractiveSession::new(
            &mut surface,
            session_data(Timeframe::All),
            VisualizerConfig::default().render,
        );

        let summary = session.run().unwrap();

        assert_eq!(
            summary,
            "✅ Successfully visualized 13 data points from expression: 'Data Visualization: value'"
        );
        assert_eq!(surface.frames.len(), 1);
        assert!(surface.frames[0].contains_text("Data Visualization: value"));
    }

    #[test]
    fn test_menu_selection_refilters() {
        let mut surface = ScriptedSurface::new(&[
            Key::Char('t'),
            Key::Up,
            Key::Up,
            Key::Up,
            Key::Up,
            Key::Up,
            Key::Down,
            Key::Enter,
            Key::Char('x'),
        ]);
        let session = InteractiveSession::new(
            &mut surface,
            session_data(Timeframe::All),
            VisualizerConfig::default().render,
        );

        let summary = session.run().unwrap();

        assert_eq!(
            summary,
            "✅ Successfully visualized 7 data points from expression: 'Data Visualization: value (Last 30 seconds)'"
        );
        assert!(surface.frames[1].contains_text("Select Timeframe"));
        let last = surface.frames.last().unwrap();
        assert!(last.contains_text("(Last 30 seconds)"));
        assert!(last.contains_text("Points: 7"));
    }

    #[test]
    fn test_escape_keeps_window() {
        let mut surface = ScriptedSurface::new(&[]);
        let mut session = InteractiveSession::new(
            &mut surface,
            session_data(Timeframe::Seconds(15)),
            VisualizerConfig::default().render,
        );

        assert_eq!(session.handle_key(Key::Char('T')), SessionState::Menu { cursor: 0 });
        assert_eq!(session.handle_key(Key::Down), SessionState::Menu { cursor: 1 });
        assert_eq!(session.handle_key(Key::Char('z')), SessionState::Menu { cursor: 1 });
        assert_eq!(session.handle_key(Key::Esc), SessionState::Display);
        assert_eq!(session.data.window(), Timeframe::Seconds(15));
        assert_eq!(session.data.series().len(), 4);
    }

    #[test]
    fn test_cursor_saturates_and_all_data_option() {
        let mut surface = ScriptedSurface::new(&[]);
        let mut session = InteractiveSession::new(
            &mut surface,
            session_data(Timeframe::Seconds(15)),
            VisualizerConfig::default().render,
        );

        session.handle_key(Key::Char('t'));
        for _ in 0..10 {
            session.handle_key(Key::Down);
        }
        assert_eq!(
            session.state,
            SessionState::Menu {
                cursor: MENU_OPTIONS.len() - 1
            }
        );
        assert_eq!(session.handle_key(Key::Enter), SessionState::Display);
        assert_eq!(session.data.window(), Timeframe::All);
        assert_eq!(session.data.series().len(), 13);
    }

    #[test]
    fn test_resize_redraws_instead_of_exiting() {
        let mut surface = ScriptedSurface::new(&[Key::Resize, Key::Enter]);
        let session = InteractiveSession::new(
            &mut surface,
            session_data(Timeframe::All),
            VisualizerConfig::default().render,
        );

        session.run().unwrap();
        assert_eq!(surface.frames.len(), 2);
    }

    #[test]
    fn test_closed_input_is_an_error() {
        let mut surface = ScriptedSurface::new(&[Key::Char('t')]);
        let session = InteractiveSession::new(
            &mut surface,
            session_data(Timeframe::All),
            VisualizerConfig::default().render,
        );

        assert!(matches!(session.run(), Err(SurfaceError::Io(_))));
    }
}
