use std::fmt;

use serde::{Deserialize, Serialize};

/// One recorded playback step.
///
/// Click coordinates are stored in logical units (already multiplied by the
/// display scale at capture time). The scroll amount is fixed when the action
/// is recorded; only the direction comes from the live wheel event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Action {
    /// Left click at logical screen coordinates.
    Click {
        /// Logical x coordinate.
        x: i32,
        /// Logical y coordinate.
        y: i32,
    },
    /// Vertical scroll.
    Scroll {
        /// Scroll direction.
        direction: ScrollDirection,
        /// Scroll distance in wheel ticks.
        amount: f64,
    },
}

/// Vertical scroll direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollDirection {
    /// Scroll towards the top of the page.
    Up,
    /// Scroll towards the bottom of the page.
    Down,
}

impl ScrollDirection {
    /// Direction of a raw wheel delta. Positive is up; zero counts as down.
    pub fn from_delta(delta_y: f64) -> Self {
        if delta_y > 0.0 {
            ScrollDirection::Up
        } else {
            ScrollDirection::Down
        }
    }

    /// Signed scroll distance: `+amount` for up, `-amount` for down.
    pub fn signed(self, amount: f64) -> f64 {
        match self {
            ScrollDirection::Up => amount,
            ScrollDirection::Down => -amount,
        }
    }
}

impl fmt::Display for ScrollDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScrollDirection::Up => f.write_str("up"),
            ScrollDirection::Down => f.write_str("down"),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Click { x, y } => write!(f, "click ({}, {})", x, y),
            Action::Scroll { direction, amount } => write!(f, "scroll {} {}", direction, amount),
        }
    }
}
