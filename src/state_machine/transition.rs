//! Pure state transition function
//!
//! Given the same state, context, and event this always yields the same
//! result. Timers and listeners are reached only through returned effects.

use super::effect::SlideEvent;
use super::event::SlideTarget;
use super::state::{Direction, SlidePhase};
use super::{CarouselContext, CarouselState, Effect, Event};
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: CarouselState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: CarouselState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_effects(mut self, effects: impl IntoIterator<Item = Effect>) -> Self {
        self.effects.extend(effects);
        self
    }

    /// Notifications in emission order
    pub fn notifications(&self) -> impl Iterator<Item = &SlideEvent> {
        self.effects.iter().filter_map(|e| match e {
            Effect::Notify(event) => Some(event),
            _ => None,
        })
    }
}

/// Reasons a request was ignored.
///
/// None of these reach the user; the runtime logs and drops them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("transition in progress, request dropped")]
    Busy,
    #[error("index {index} outside 0..{item_count}")]
    OutOfRange { index: usize, item_count: usize },
    #[error("already showing slide {index}")]
    AlreadyCurrent { index: usize },
    #[error("carousel has no items")]
    Empty,
    #[error("redundant {0}")]
    Redundant(&'static str),
    #[error("auto-advance not eligible")]
    NotEligible,
    #[error("no transition to complete")]
    NotTransitioning,
}

/// Pure transition function
pub fn transition(
    state: &CarouselState,
    context: &CarouselContext,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    let config = &context.config;

    match event {
        Event::Attached => {
            let result = TransitionResult::new(state.clone());
            if state.is_animating() {
                Ok(result)
            } else {
                Ok(result.with_effect(rearm_auto_advance(state, context)))
            }
        }

        // ============================================================
        // Navigation
        // ============================================================
        Event::Navigate(target) => {
            if state.is_animating() {
                return Err(TransitionError::Busy);
            }
            let (index, direction) = resolve_target(state, target)?;
            start_slide(state, context, index, direction)
        }

        Event::AutoAdvanceElapsed => {
            if !state.auto_advance_eligible(config) {
                return Err(TransitionError::NotEligible);
            }
            if state.is_animating() {
                return Err(TransitionError::Busy);
            }
            let index = state.next_index().ok_or(TransitionError::Empty)?;
            start_slide(state, context, index, Some(Direction::Next))
        }

        Event::TransitionElapsed => {
            if !state.is_animating() {
                return Err(TransitionError::NotTransitioning);
            }
            let new_state = CarouselState {
                phase: SlidePhase::Idle,
                ..state.clone()
            };
            let mut result = TransitionResult::new(new_state);
            if result.new_state.auto_advance_eligible(config) {
                result = result.with_effect(Effect::schedule_auto_advance(
                    config.auto_play_interval(),
                ));
            }
            Ok(result)
        }

        // ============================================================
        // Pause / resume / reset
        // ============================================================
        Event::Pause => {
            if state.is_paused {
                return Err(TransitionError::Redundant("pause"));
            }
            let new_state = CarouselState {
                is_paused: true,
                ..state.clone()
            };
            Ok(TransitionResult::new(new_state)
                .with_effect(Effect::cancel_auto_advance())
                .with_effect(Effect::Notify(SlideEvent::Pause {
                    current_index: state.current_index,
                })))
        }

        Event::Resume => {
            if !state.is_paused {
                return Err(TransitionError::Redundant("resume"));
            }
            let new_state = CarouselState {
                is_paused: false,
                ..state.clone()
            };
            let mut result = TransitionResult::new(new_state).with_effect(Effect::Notify(
                SlideEvent::Resume {
                    current_index: state.current_index,
                },
            ));
            // An open transition re-arms on completion
            if !state.is_animating() {
                let rearm = rearm_auto_advance(&result.new_state, context);
                result = result.with_effect(rearm);
            }
            Ok(result)
        }

        Event::TogglePause => {
            let event = if state.is_paused {
                Event::Resume
            } else {
                Event::Pause
            };
            transition(state, context, event)
        }

        Event::Reset => {
            let new_state = CarouselState {
                current_index: 0,
                phase: SlidePhase::Idle,
                is_paused: false,
                ..state.clone()
            };
            let rearm = rearm_auto_advance(&new_state, context);
            Ok(TransitionResult::new(new_state)
                .with_effects([
                    Effect::cancel_auto_advance(),
                    Effect::cancel_transition_end(),
                    Effect::Notify(SlideEvent::Reset { current_index: 0 }),
                ])
                .with_effect(rearm))
        }

        // ============================================================
        // Host signals
        // ============================================================
        Event::VisibilityChanged { visible } => {
            if visible == state.host_visible {
                return Err(TransitionError::Redundant("visibility change"));
            }
            let new_state = CarouselState {
                host_visible: visible,
                ..state.clone()
            };
            Ok(suspend_or_rearm(new_state, context))
        }

        Event::HoverChanged { hovered } => {
            if hovered == state.hovered {
                return Err(TransitionError::Redundant("hover change"));
            }
            let new_state = CarouselState {
                hovered,
                ..state.clone()
            };
            if config.pause_on_hover {
                Ok(suspend_or_rearm(new_state, context))
            } else {
                Ok(TransitionResult::new(new_state))
            }
        }

        Event::ItemCountChanged { item_count } => {
            if item_count == state.item_count {
                return Err(TransitionError::Redundant("item count"));
            }
            let new_state = CarouselState {
                current_index: state.current_index.min(item_count.saturating_sub(1)),
                phase: SlidePhase::Idle,
                item_count,
                ..state.clone()
            };
            let rearm = rearm_auto_advance(&new_state, context);
            Ok(TransitionResult::new(new_state)
                .with_effect(Effect::cancel_transition_end())
                .with_effect(rearm))
        }
    }
}

/// Map a navigation target to an index and an optional forced direction
fn resolve_target(
    state: &CarouselState,
    target: SlideTarget,
) -> Result<(usize, Option<Direction>), TransitionError> {
    let resolved = match target {
        SlideTarget::Index(index) => Some((index, None)),
        SlideTarget::Next => state.next_index().map(|i| (i, Some(Direction::Next))),
        SlideTarget::Prev => state.prev_index().map(|i| (i, Some(Direction::Prev))),
        SlideTarget::First => (state.item_count > 0).then_some((0, None)),
        SlideTarget::Last => state.last_index().map(|i| (i, None)),
    };
    resolved.ok_or(TransitionError::Empty)
}

/// Open a transition window towards `index`
fn start_slide(
    state: &CarouselState,
    context: &CarouselContext,
    index: usize,
    direction: Option<Direction>,
) -> Result<TransitionResult, TransitionError> {
    if index >= state.item_count {
        return Err(TransitionError::OutOfRange {
            index,
            item_count: state.item_count,
        });
    }
    if index == state.current_index {
        return Err(TransitionError::AlreadyCurrent { index });
    }

    let direction = direction.unwrap_or(if index > state.current_index {
        Direction::Next
    } else {
        Direction::Prev
    });

    let new_state = CarouselState {
        current_index: index,
        phase: SlidePhase::Transitioning { direction },
        ..state.clone()
    };

    Ok(TransitionResult::new(new_state)
        .with_effect(Effect::Notify(SlideEvent::Slide {
            current_index: index,
            previous_index: state.current_index,
            direction,
        }))
        .with_effect(Effect::cancel_auto_advance())
        .with_effect(Effect::schedule_transition_end(
            context.config.transition_duration(),
        )))
}

/// Schedule auto-advance when eligible, otherwise make sure none is pending
fn rearm_auto_advance(state: &CarouselState, context: &CarouselContext) -> Effect {
    if state.auto_advance_eligible(&context.config) {
        Effect::schedule_auto_advance(context.config.auto_play_interval())
    } else {
        Effect::cancel_auto_advance()
    }
}

/// Host-driven suspension change; transitions in flight re-arm on completion
fn suspend_or_rearm(new_state: CarouselState, context: &CarouselContext) -> TransitionResult {
    let effect = if new_state.is_animating() {
        Effect::cancel_auto_advance()
    } else {
        rearm_auto_advance(&new_state, context)
    };
    TransitionResult::new(new_state).with_effect(effect)
}
