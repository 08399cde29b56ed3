//! Events that drive the carousel

use serde::{Deserialize, Serialize};

/// Where a navigation request wants to go
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "index", rename_all = "snake_case")]
pub enum SlideTarget {
    /// Absolute index; direction is derived from the current index
    Index(usize),
    /// Wrapped successor, always reported as `Next`
    Next,
    /// Wrapped predecessor, always reported as `Prev`
    Prev,
    First,
    Last,
}

/// Events that trigger state transitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Controller attached to its host
    Attached,

    // User events
    Navigate(SlideTarget),
    Pause,
    Resume,
    TogglePause,
    Reset,

    // Timer events
    AutoAdvanceElapsed,
    TransitionElapsed,

    // Host events
    VisibilityChanged { visible: bool },
    HoverChanged { hovered: bool },
    ItemCountChanged { item_count: usize },
}

impl Event {
    pub fn go_to(index: usize) -> Self {
        Event::Navigate(SlideTarget::Index(index))
    }

    pub fn next() -> Self {
        Event::Navigate(SlideTarget::Next)
    }

    pub fn prev() -> Self {
        Event::Navigate(SlideTarget::Prev)
    }
}
