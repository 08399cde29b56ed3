//! Slide carousel controller
//!
//! A bounded-index state machine that advances by timer or by request,
//! drops requests that overlap an open transition, and reports every change
//! to its listeners.
//!
//! - `state_machine`: pure transitions producing effects
//! - `runtime`: tokio task owning the state, timers and listeners
//! - `input`: host keyboard, visibility, pointer and wheel routing
//! - `config`: per-controller configuration

pub mod config;
pub mod input;
pub mod runtime;
pub mod state_machine;

pub use config::{CarouselConfig, ConfigError};
pub use input::{HostSignal, Key, KeyDisposition, WheelDirection};
pub use runtime::{CarouselHandle, ControllerBuilder, ControllerError, SlideListener};
pub use state_machine::{CarouselState, Direction, SlideEvent, SlidePhase};
