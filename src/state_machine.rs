//! Core carousel state machine
//!
//! Implements the Elm Architecture pattern with pure state transitions.

mod effect;
pub mod event;
pub mod state;
pub(crate) mod transition;


pub use effect::{Effect, SlideEvent, TimerKind};
pub use event::{Event, SlideTarget};
pub use state::{CarouselContext, CarouselState, Direction, SlidePhase};
pub use transition::{transition, TransitionError, TransitionResult};
