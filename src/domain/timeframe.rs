// Timeframe selection for windowed plotting
use std::fmt;

/// Trailing window applied to a series before plotting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Timeframe {
    Seconds(u64),
    All,
}

/// Options offered by the interactive timeframe menu, in display order.
pub const MENU_OPTIONS: [Timeframe; 6] = [
    Timeframe::Seconds(15),
    Timeframe::Seconds(30),
    Timeframe::Seconds(60),
    Timeframe::Seconds(120),
    Timeframe::Seconds(300),
    Timeframe::All,
];

impl Timeframe {
    /// Explicit seconds win over minutes; neither means all data.
    pub fn resolve(seconds: Option<u64>, minutes: Option<u64>) -> Self {
        match (seconds, minutes) {
            (Some(s), _) => Timeframe::Seconds(s),
            (None, Some(m)) => Timeframe::Seconds(m.saturating_mul(60)),
            (None, None) => Timeframe::All,
        }
    }

    pub fn window_seconds(&self) -> Option<u64> {
        match self {
            Timeframe::Seconds(s) => Some(*s),
            Timeframe::All => None,
        }
    }

    pub fn menu_label(&self) -> String {
        match self {
            Timeframe::All => "All data".to_string(),
            Timeframe::Seconds(s) if *s >= 60 && s % 60 == 0 => {
                let minutes = s / 60;
                if minutes == 1 {
                    "Last 1 minute".to_string()
                } else {
                    format!("Last {} minutes", minutes)
                }
            }
            Timeframe::Seconds(s) => format!("Last {} seconds", s),
        }
    }

    /// Where the menu cursor starts for this window.
    pub fn menu_index(&self) -> usize {
        match self {
            Timeframe::All => MENU_OPTIONS.len() - 1,
            other => MENU_OPTIONS.iter().position(|o| o == other).unwrap_or(0),
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timeframe::Seconds(s) => write!(f, "last {} seconds", s),
            Timeframe::All => write!(f, "all data"),
        }
    }
}
