//! Runtime for driving a carousel
//!
//! One tokio task owns the state; handles talk to it over a channel and get
//! the post-transition state back, so an operation's effects are visible to
//! the caller as soon as it returns.

mod executor;
mod timer;
pub mod traits;

#[cfg(test)]
pub mod testing;

pub use executor::CarouselRuntime;
pub use timer::{DeferredTask, TimerFired};
pub use traits::*;

use crate::config::CarouselConfig;
use crate::input::{route_key, HostSignal, Key, KeyDisposition};
use crate::state_machine::{CarouselContext, CarouselState, Event, SlideEvent, SlideTarget};
use thiserror::Error;
use tokio::sync::{broadcast, mpsc, oneshot, watch};

const COMMAND_CAPACITY: usize = 32;
const BROADCAST_CAPACITY: usize = 128;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ControllerError {
    #[error("carousel controller has been detached")]
    Detached,
}

/// Messages from handles to the runtime
#[derive(Debug)]
pub enum Command {
    Dispatch {
        event: Event,
        reply: oneshot::Sender<CarouselState>,
    },
    Detach,
}

/// Configures and starts a carousel controller
pub struct ControllerBuilder<L = NoopListener> {
    config: CarouselConfig,
    item_count: usize,
    listener: L,
    host_rx: Option<mpsc::Receiver<HostSignal>>,
}

impl ControllerBuilder<NoopListener> {
    pub fn new(item_count: usize) -> Self {
        Self {
            config: CarouselConfig::default(),
            item_count,
            listener: NoopListener,
            host_rx: None,
        }
    }
}

impl<L: SlideListener> ControllerBuilder<L> {
    #[must_use]
    pub fn config(mut self, config: CarouselConfig) -> Self {
        self.config = config;
        self
    }

    /// Register the change callback
    pub fn on_change<M: SlideListener>(self, listener: M) -> ControllerBuilder<M> {
        ControllerBuilder {
            config: self.config,
            item_count: self.item_count,
            listener,
            host_rx: self.host_rx,
        }
    }

    /// Subscribe to a host signal source for the controller's lifetime
    #[must_use]
    pub fn host_signals(mut self, host_rx: mpsc::Receiver<HostSignal>) -> Self {
        self.host_rx = Some(host_rx);
        self
    }

    /// Spawn the runtime on the current tokio runtime
    pub fn spawn(self) -> CarouselHandle {
        let state = CarouselState::new(self.item_count);
        let (command_tx, command_rx) = mpsc::channel(COMMAND_CAPACITY);
        let (broadcast_tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        let (state_tx, state_rx) = watch::channel(state.clone());

        let runtime = CarouselRuntime::new(
            CarouselContext::new(self.config.clone()),
            state,
            self.listener,
            command_rx,
            self.host_rx,
            broadcast_tx.clone(),
            state_tx,
        );
        tokio::spawn(runtime.run());

        CarouselHandle {
            config: self.config,
            command_tx,
            broadcast_tx,
            state_rx,
        }
    }
}

/// Handle to interact with a running carousel
#[derive(Clone)]
pub struct CarouselHandle {
    config: CarouselConfig,
    command_tx: mpsc::Sender<Command>,
    broadcast_tx: broadcast::Sender<SlideEvent>,
    state_rx: watch::Receiver<CarouselState>,
}

impl CarouselHandle {
    /// Send an event and wait until the runtime has applied it
    pub async fn dispatch(&self, event: Event) -> Result<CarouselState, ControllerError> {
        let (reply, reply_rx) = oneshot::channel();
        self.command_tx
            .send(Command::Dispatch { event, reply })
            .await
            .map_err(|_| ControllerError::Detached)?;
        reply_rx.await.map_err(|_| ControllerError::Detached)
    }

    pub async fn go_to_slide(&self, index: usize) -> Result<CarouselState, ControllerError> {
        self.dispatch(Event::go_to(index)).await
    }

    pub async fn next_slide(&self) -> Result<CarouselState, ControllerError> {
        self.dispatch(Event::next()).await
    }

    pub async fn prev_slide(&self) -> Result<CarouselState, ControllerError> {
        self.dispatch(Event::prev()).await
    }

    pub async fn go_to_first(&self) -> Result<CarouselState, ControllerError> {
        self.dispatch(Event::Navigate(SlideTarget::First)).await
    }

    pub async fn go_to_last(&self) -> Result<CarouselState, ControllerError> {
        self.dispatch(Event::Navigate(SlideTarget::Last)).await
    }

    pub async fn pause(&self) -> Result<CarouselState, ControllerError> {
        self.dispatch(Event::Pause).await
    }

    pub async fn resume(&self) -> Result<CarouselState, ControllerError> {
        self.dispatch(Event::Resume).await
    }

    pub async fn toggle_pause(&self) -> Result<CarouselState, ControllerError> {
        self.dispatch(Event::TogglePause).await
    }

    pub async fn reset(&self) -> Result<CarouselState, ControllerError> {
        self.dispatch(Event::Reset).await
    }

    pub async fn set_item_count(&self, item_count: usize) -> Result<CarouselState, ControllerError> {
        self.dispatch(Event::ItemCountChanged { item_count }).await
    }

    pub async fn set_visible(&self, visible: bool) -> Result<CarouselState, ControllerError> {
        self.dispatch(Event::VisibilityChanged { visible }).await
    }

    pub async fn set_hovered(&self, hovered: bool) -> Result<CarouselState, ControllerError> {
        self.dispatch(Event::HoverChanged { hovered }).await
    }

    /// Route a key press. `Consumed` means the host must skip its default
    /// handling for this key.
    pub async fn key_down(&self, key: Key) -> Result<KeyDisposition, ControllerError> {
        match route_key(key, &self.config) {
            Some(event) => {
                self.dispatch(event).await?;
                Ok(KeyDisposition::Consumed)
            }
            None => Ok(KeyDisposition::Ignored),
        }
    }

    /// Latest published state
    pub fn state(&self) -> CarouselState {
        self.state_rx.borrow().clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SlideEvent> {
        self.broadcast_tx.subscribe()
    }

    pub fn config(&self) -> &CarouselConfig {
        &self.config
    }

    /// Stop the runtime and wait until its timers are released
    pub async fn detach(mut self) {
        if self.command_tx.send(Command::Detach).await.is_err() {
            return;
        }
        // The runtime drops its watch sender on exit
        while self.state_rx.changed().await.is_ok() {}
    }
}
