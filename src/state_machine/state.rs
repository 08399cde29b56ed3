//! Carousel state types

use crate::config::CarouselConfig;
use serde::{Deserialize, Serialize};

/// Direction of travel for a slide transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Next,
    Prev,
}

/// Whether a transition window is open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SlidePhase {
    /// No transition in flight
    #[default]
    Idle,

    /// Between a navigation request and its completion
    Transitioning { direction: Direction },
}

/// Carousel state, owned by a single controller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarouselState {
    /// Always `< item_count`, or 0 when the carousel is empty
    pub current_index: usize,
    pub phase: SlidePhase,
    /// Suspended by the user (pause/space), independent of visibility
    pub is_paused: bool,
    pub item_count: usize,
    /// Host page visibility; hidden suspends auto-advance without pausing
    pub host_visible: bool,
    /// Pointer is over the carousel
    pub hovered: bool,
}

impl CarouselState {
    pub fn new(item_count: usize) -> Self {
        Self {
            current_index: 0,
            phase: SlidePhase::Idle,
            is_paused: false,
            item_count,
            host_visible: true,
            hovered: false,
        }
    }

    pub fn is_animating(&self) -> bool {
        matches!(self.phase, SlidePhase::Transitioning { .. })
    }

    pub fn direction(&self) -> Option<Direction> {
        match self.phase {
            SlidePhase::Idle => None,
            SlidePhase::Transitioning { direction } => Some(direction),
        }
    }

    /// Index reached by `next`, wrapping past the end
    pub fn next_index(&self) -> Option<usize> {
        (self.item_count > 0).then(|| (self.current_index + 1) % self.item_count)
    }

    /// Index reached by `prev`, wrapping before the start
    pub fn prev_index(&self) -> Option<usize> {
        match (self.item_count, self.current_index) {
            (0, _) => None,
            (n, 0) => Some(n - 1),
            (_, i) => Some(i - 1),
        }
    }

    pub fn last_index(&self) -> Option<usize> {
        self.item_count.checked_sub(1)
    }

    /// Whether an auto-advance timer may be pending right now.
    ///
    /// Transitions are not considered here: the completion of a transition
    /// re-checks eligibility before scheduling.
    pub fn auto_advance_eligible(&self, config: &CarouselConfig) -> bool {
        config.auto_play
            && !self.is_paused
            && self.host_visible
            && !(self.hovered && config.pause_on_hover)
            && self.item_count > 1
    }
}

impl Default for CarouselState {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Immutable per-controller context
#[derive(Debug, Clone, Default)]
pub struct CarouselContext {
    pub config: CarouselConfig,
}

impl CarouselContext {
    pub fn new(config: CarouselConfig) -> Self {
        Self { config }
    }
}
