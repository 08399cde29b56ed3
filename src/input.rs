//! Host input routing
//!
//! Maps keyboard, visibility, pointer and wheel signals from the embedding
//! host onto state machine events. Keys and wheel input only route when the
//! matching config switch is on; anything routed must have its default host
//! handling suppressed.

use crate::config::CarouselConfig;
use crate::state_machine::{Event, SlideTarget};
use serde::{Deserialize, Serialize};

/// Keys the carousel understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    ArrowRight,
    ArrowDown,
    ArrowLeft,
    ArrowUp,
    Space,
    Home,
    End,
    /// Anything else; never consumed
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WheelDirection {
    Up,
    Down,
}

/// Signal from the embedding environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostSignal {
    KeyDown { key: Key },
    Visibility { visible: bool },
    PointerEnter,
    PointerLeave,
    Wheel { direction: WheelDirection },
}

/// Whether the host should skip its own handling of an input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDisposition {
    Consumed,
    Ignored,
}

impl KeyDisposition {
    pub fn is_consumed(self) -> bool {
        self == KeyDisposition::Consumed
    }
}

/// Map a key press to an event, if keyboard navigation is on
pub fn route_key(key: Key, config: &CarouselConfig) -> Option<Event> {
    if !config.keyboard_navigation {
        return None;
    }
    match key {
        Key::ArrowRight | Key::ArrowDown => Some(Event::Navigate(SlideTarget::Next)),
        Key::ArrowLeft | Key::ArrowUp => Some(Event::Navigate(SlideTarget::Prev)),
        Key::Space => Some(Event::TogglePause),
        Key::Home => Some(Event::Navigate(SlideTarget::First)),
        Key::End => Some(Event::Navigate(SlideTarget::Last)),
        Key::Other => None,
    }
}

/// Map any host signal to an event
pub fn route_signal(signal: HostSignal, config: &CarouselConfig) -> Option<Event> {
    match signal {
        HostSignal::KeyDown { key } => route_key(key, config),
        HostSignal::Visibility { visible } => Some(Event::VisibilityChanged { visible }),
        HostSignal::PointerEnter => Some(Event::HoverChanged { hovered: true }),
        HostSignal::PointerLeave => Some(Event::HoverChanged { hovered: false }),
        HostSignal::Wheel { direction } if config.mouse_wheel => Some(match direction {
            WheelDirection::Down => Event::Navigate(SlideTarget::Next),
            WheelDirection::Up => Event::Navigate(SlideTarget::Prev),
        }),
        HostSignal::Wheel { .. } => None,
    }
}

/// Disposition a host should apply to a key press
pub fn key_disposition(key: Key, config: &CarouselConfig) -> KeyDisposition {
    if route_key(key, config).is_some() {
        KeyDisposition::Consumed
    } else {
        KeyDisposition::Ignored
    }
}
