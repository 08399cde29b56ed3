//! Carousel runtime executor

use super::timer::{DeferredTask, TimerFired};
use super::traits::SlideListener;
use super::Command;

use crate::input::{route_signal, HostSignal};
use crate::state_machine::{
    transition, CarouselContext, CarouselState, Effect, Event, SlideEvent, TimerKind,
};
use tokio::sync::{broadcast, mpsc, watch};

/// Single-owner carousel runtime.
///
/// Every input (handle commands, timer firings, host signals) is received in
/// one loop, so transitions never run concurrently with each other.
pub struct CarouselRuntime<L>
where
    L: SlideListener,
{
    context: CarouselContext,
    state: CarouselState,
    listener: L,
    command_rx: mpsc::Receiver<Command>,
    /// Injected host source; `None` once unsubscribed
    host_rx: Option<mpsc::Receiver<HostSignal>>,
    timer_tx: mpsc::Sender<TimerFired>,
    timer_rx: mpsc::Receiver<TimerFired>,
    broadcast_tx: broadcast::Sender<SlideEvent>,
    state_tx: watch::Sender<CarouselState>,
    auto_advance: DeferredTask,
    transition_end: DeferredTask,
}

impl<L> CarouselRuntime<L>
where
    L: SlideListener,
{
    pub fn new(
        context: CarouselContext,
        state: CarouselState,
        listener: L,
        command_rx: mpsc::Receiver<Command>,
        host_rx: Option<mpsc::Receiver<HostSignal>>,
        broadcast_tx: broadcast::Sender<SlideEvent>,
        state_tx: watch::Sender<CarouselState>,
    ) -> Self {
        let (timer_tx, timer_rx) = mpsc::channel(8);
        Self {
            context,
            state,
            listener,
            command_rx,
            host_rx,
            timer_tx,
            timer_rx,
            broadcast_tx,
            state_tx,
            auto_advance: DeferredTask::new(TimerKind::AutoAdvance),
            transition_end: DeferredTask::new(TimerKind::TransitionEnd),
        }
    }

    pub async fn run(mut self) {
        tracing::info!(
            item_count = self.state.item_count,
            auto_play = self.context.config.auto_play,
            "Starting carousel runtime"
        );

        self.process_event(Event::Attached);

        loop {
            tokio::select! {
                command = self.command_rx.recv() => match command {
                    Some(Command::Dispatch { event, reply }) => {
                        self.process_event(event);
                        let _ = reply.send(self.state.clone());
                    }
                    Some(Command::Detach) | None => break,
                },
                Some(fired) = self.timer_rx.recv() => {
                    self.on_timer(fired);
                }
                signal = recv_signal(&mut self.host_rx) => match signal {
                    Some(signal) => {
                        if let Some(event) = route_signal(signal, &self.context.config) {
                            self.process_event(event);
                        }
                    }
                    None => {
                        tracing::debug!("Host signal source closed");
                        self.host_rx = None;
                    }
                },
            }
        }

        self.detach();
        tracing::info!(
            current_index = self.state.current_index,
            "Carousel runtime stopped"
        );
    }

    fn on_timer(&mut self, fired: TimerFired) {
        let (task, event) = match fired.timer {
            TimerKind::AutoAdvance => (&mut self.auto_advance, Event::AutoAdvanceElapsed),
            TimerKind::TransitionEnd => (&mut self.transition_end, Event::TransitionElapsed),
        };
        if task.claim(fired.generation) {
            self.process_event(event);
        } else {
            tracing::debug!(
                timer = ?fired.timer,
                generation = fired.generation,
                "Dropping stale timer"
            );
        }
    }

    fn process_event(&mut self, event: Event) {
        let result = match transition(&self.state, &self.context, event.clone()) {
            Ok(r) => r,
            Err(e) => {
                tracing::debug!(event = ?event, reason = %e, "Ignoring carousel request");
                return;
            }
        };

        self.state = result.new_state;

        for effect in result.effects {
            self.execute_effect(effect);
        }

        self.state_tx.send_replace(self.state.clone());
    }

    fn execute_effect(&mut self, effect: Effect) {
        match effect {
            Effect::Notify(event) => {
                tracing::debug!(
                    kind = event.kind(),
                    current_index = event.current_index(),
                    "Slide event"
                );
                self.listener.on_slide(&event);
                // No subscribers is fine
                let _ = self.broadcast_tx.send(event);
            }
            Effect::Schedule { timer, delay } => {
                let fired_tx = self.timer_tx.clone();
                self.timer_mut(timer).schedule(delay, fired_tx);
            }
            Effect::Cancel { timer } => {
                self.timer_mut(timer).cancel();
            }
        }
    }

    fn timer_mut(&mut self, timer: TimerKind) -> &mut DeferredTask {
        match timer {
            TimerKind::AutoAdvance => &mut self.auto_advance,
            TimerKind::TransitionEnd => &mut self.transition_end,
        }
    }

    /// Release both timers and the host subscription
    fn detach(&mut self) {
        let auto_advance = self.auto_advance.cancel();
        let transition_end = self.transition_end.cancel();
        self.host_rx = None;
        tracing::debug!(auto_advance, transition_end, "Released carousel timers");
    }
}

async fn recv_signal(rx: &mut Option<mpsc::Receiver<HostSignal>>) -> Option<HostSignal> {
    match rx {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}
