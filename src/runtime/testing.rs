//! Test harness for the carousel runtime
//!
//! Runs a real controller on a paused tokio clock and records every
//! notification through the listener seam.

use super::traits::RecordingListener;
use super::{CarouselHandle, ControllerBuilder};
use crate::config::CarouselConfig;
use crate::input::HostSignal;
use crate::state_machine::{Direction, SlideEvent};
use std::time::Duration;
use tokio::sync::mpsc;

pub const INTERVAL_MS: u64 = 1000;
pub const TRANSITION_MS: u64 = 200;

/// Config with round numbers; auto-play off unless asked for
pub fn test_config(auto_play: bool) -> CarouselConfig {
    CarouselConfig {
        auto_play,
        auto_play_interval_ms: INTERVAL_MS,
        transition_duration_ms: TRANSITION_MS,
        ..CarouselConfig::default()
    }
}

/// Builder for a controller under test
pub struct TestCarousel {
    item_count: usize,
    config: CarouselConfig,
    with_host: bool,
}

impl TestCarousel {
    pub fn new(item_count: usize) -> Self {
        Self {
            item_count,
            config: test_config(false),
            with_host: false,
        }
    }

    pub fn config(mut self, config: CarouselConfig) -> Self {
        self.config = config;
        self
    }

    pub fn auto_play(mut self) -> Self {
        self.config.auto_play = true;
        self
    }

    pub fn with_host(mut self) -> Self {
        self.with_host = true;
        self
    }

    pub fn build(self) -> Harness {
        let recorder = RecordingListener::new();
        let mut builder = ControllerBuilder::new(self.item_count)
            .config(self.config)
            .on_change(recorder.clone());

        let host_tx = if self.with_host {
            let (tx, rx) = mpsc::channel(16);
            builder = builder.host_signals(rx);
            Some(tx)
        } else {
            None
        };

        Harness {
            handle: builder.spawn(),
            recorder,
            host_tx,
        }
    }
}

pub struct Harness {
    pub handle: CarouselHandle,
    recorder: RecordingListener,
    host_tx: Option<mpsc::Sender<HostSignal>>,
}

impl Harness {
    pub fn events(&self) -> Vec<SlideEvent> {
        self.recorder.events()
    }

    /// `(current_index, direction)` of each slide event, in order
    pub fn slides(&self) -> Vec<(usize, Direction)> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                SlideEvent::Slide {
                    current_index,
                    direction,
                    ..
                } => Some((current_index, direction)),
                _ => None,
            })
            .collect()
    }

    pub fn index(&self) -> usize {
        self.handle.state().current_index
    }

    /// Advance the paused clock. Everything due before the end has run by
    /// the time this returns.
    pub async fn advance_ms(&self, ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }

    /// Let a transition started now complete
    pub async fn settle(&self) {
        self.advance_ms(TRANSITION_MS + 1).await;
    }

    pub async fn signal(&self, signal: HostSignal) {
        let Some(tx) = &self.host_tx else {
            return;
        };
        tx.send(signal).await.unwrap();
        // Received means processed: the runtime handles a signal in the same
        // poll that takes it off the channel
        while tx.capacity() < tx.max_capacity() {
            tokio::task::yield_now().await;
        }
    }

    pub fn close_host(&mut self) {
        self.host_tx = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{Key, KeyDisposition, WheelDirection};
    use crate::runtime::ControllerError;

    #[tokio::test(start_paused = true)]
    async fn test_go_to_opens_window_for_exactly_transition_duration() {
        let rt = TestCarousel::new(5).build();

        let state = rt.handle.go_to_slide(3).await.unwrap();
        assert_eq!(state.current_index, 3);
        assert!(state.is_animating());
        assert_eq!(state.direction(), Some(Direction::Next));

        rt.advance_ms(TRANSITION_MS - 1).await;
        assert!(rt.handle.state().is_animating());

        rt.advance_ms(2).await;
        let state = rt.handle.state();
        assert!(!state.is_animating());
        assert_eq!(state.direction(), None);
        assert_eq!(state.current_index, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_three_nexts() {
        let rt = TestCarousel::new(5).build();

        for _ in 0..3 {
            rt.handle.next_slide().await.unwrap();
            rt.settle().await;
        }

        assert_eq!(rt.index(), 3);
        assert_eq!(
            rt.slides(),
            vec![
                (1, Direction::Next),
                (2, Direction::Next),
                (3, Direction::Next)
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_item_never_slides() {
        let rt = TestCarousel::new(1).auto_play().build();

        rt.handle.next_slide().await.unwrap();
        rt.handle.prev_slide().await.unwrap();
        rt.advance_ms(INTERVAL_MS * 3).await;

        assert_eq!(rt.index(), 0);
        assert!(rt.slides().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_overlapping_go_to_is_dropped() {
        let rt = TestCarousel::new(5).build();

        rt.handle.go_to_slide(4).await.unwrap();
        let state = rt.handle.go_to_slide(2).await.unwrap();
        assert_eq!(state.current_index, 4);

        rt.settle().await;
        assert_eq!(rt.index(), 4);
        assert_eq!(
            rt.events(),
            vec![SlideEvent::Slide {
                current_index: 4,
                previous_index: 0,
                direction: Direction::Next,
            }]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_next_then_prev_round_trips() {
        let rt = TestCarousel::new(4).build();
        rt.handle.go_to_slide(2).await.unwrap();
        rt.settle().await;

        rt.handle.next_slide().await.unwrap();
        rt.settle().await;
        rt.handle.prev_slide().await.unwrap();
        rt.settle().await;

        assert_eq!(rt.index(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_auto_advance_cycles() {
        let rt = TestCarousel::new(3).auto_play().build();

        rt.advance_ms(INTERVAL_MS + 1).await;
        assert_eq!(rt.index(), 1);
        assert!(rt.handle.state().is_animating());

        // Next interval starts when the transition completes
        rt.advance_ms(TRANSITION_MS + INTERVAL_MS).await;
        assert_eq!(rt.index(), 2);

        rt.advance_ms(TRANSITION_MS + INTERVAL_MS).await;
        assert_eq!(rt.index(), 0);
        assert_eq!(
            rt.slides(),
            vec![
                (1, Direction::Next),
                (2, Direction::Next),
                (0, Direction::Next)
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_then_resume() {
        let rt = TestCarousel::new(5).auto_play().build();

        rt.handle.pause().await.unwrap();
        rt.advance_ms(INTERVAL_MS * 2).await;
        assert_eq!(rt.index(), 0);
        assert!(rt.slides().is_empty());

        rt.handle.resume().await.unwrap();
        rt.advance_ms(INTERVAL_MS + 1).await;
        assert_eq!(rt.slides(), vec![(1, Direction::Next)]);

        assert_eq!(
            rt.events()[..2],
            [
                SlideEvent::Pause { current_index: 0 },
                SlideEvent::Resume { current_index: 0 }
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_does_not_cancel_transition() {
        let rt = TestCarousel::new(5).auto_play().build();

        rt.handle.go_to_slide(2).await.unwrap();
        rt.handle.pause().await.unwrap();
        rt.settle().await;

        let state = rt.handle.state();
        assert_eq!(state.current_index, 2);
        assert!(!state.is_animating());
        assert!(state.is_paused);

        rt.advance_ms(INTERVAL_MS * 2).await;
        assert_eq!(rt.index(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_from_anywhere() {
        let rt = TestCarousel::new(5).auto_play().build();

        rt.handle.go_to_slide(3).await.unwrap();
        rt.handle.pause().await.unwrap();
        let state = rt.handle.reset().await.unwrap();

        assert_eq!(state.current_index, 0);
        assert!(!state.is_animating());
        assert_eq!(state.direction(), None);
        assert!(!state.is_paused);
        assert_eq!(
            rt.events().last(),
            Some(&SlideEvent::Reset { current_index: 0 })
        );

        // The cancelled transition never completes against the reset state,
        // and auto-advance restarts from zero
        rt.advance_ms(INTERVAL_MS + 1).await;
        assert_eq!(rt.index(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hidden_suspends_and_visible_restarts() {
        let rt = TestCarousel::new(3).auto_play().build();

        let state = rt.handle.set_visible(false).await.unwrap();
        assert!(!state.is_paused);
        rt.advance_ms(INTERVAL_MS * 3).await;
        assert_eq!(rt.index(), 0);

        rt.handle.set_visible(true).await.unwrap();
        rt.advance_ms(INTERVAL_MS + 1).await;
        assert_eq!(rt.index(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_visible_while_paused_stays_paused() {
        let rt = TestCarousel::new(3).auto_play().build();

        rt.handle.set_visible(false).await.unwrap();
        rt.handle.pause().await.unwrap();
        rt.handle.set_visible(true).await.unwrap();
        rt.advance_ms(INTERVAL_MS * 3).await;

        assert_eq!(rt.index(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hover_suspends_auto_advance() {
        let rt = TestCarousel::new(3).auto_play().build();

        rt.handle.set_hovered(true).await.unwrap();
        rt.advance_ms(INTERVAL_MS * 2).await;
        assert_eq!(rt.index(), 0);
        assert!(rt.events().is_empty());

        rt.handle.set_hovered(false).await.unwrap();
        rt.advance_ms(INTERVAL_MS + 1).await;
        assert_eq!(rt.index(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_item_count_change_clamps_and_cancels() {
        let rt = TestCarousel::new(5).build();

        rt.handle.go_to_slide(4).await.unwrap();
        let state = rt.handle.set_item_count(3).await.unwrap();
        assert_eq!(state.current_index, 2);
        assert!(!state.is_animating());

        // Navigation works right away; the old window is gone
        let state = rt.handle.go_to_slide(0).await.unwrap();
        assert_eq!(state.current_index, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_keys_route_through_handle() {
        let rt = TestCarousel::new(5).build();

        assert_eq!(
            rt.handle.key_down(Key::End).await.unwrap(),
            KeyDisposition::Consumed
        );
        assert_eq!(rt.index(), 4);
        rt.settle().await;

        assert_eq!(
            rt.handle.key_down(Key::Other).await.unwrap(),
            KeyDisposition::Ignored
        );

        rt.handle.key_down(Key::Space).await.unwrap();
        assert!(rt.handle.state().is_paused);

        rt.handle.key_down(Key::Home).await.unwrap();
        assert_eq!(rt.index(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_keyboard_disabled_ignores_keys() {
        let config = CarouselConfig {
            keyboard_navigation: false,
            ..test_config(false)
        };
        let rt = TestCarousel::new(5).config(config).build();

        assert_eq!(
            rt.handle.key_down(Key::ArrowRight).await.unwrap(),
            KeyDisposition::Ignored
        );
        assert_eq!(rt.index(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_injected_host_signals() {
        let config = CarouselConfig {
            mouse_wheel: true,
            ..test_config(false)
        };
        let mut rt = TestCarousel::new(5).config(config).with_host().build();

        rt.signal(HostSignal::KeyDown {
            key: Key::ArrowLeft,
        })
        .await;
        assert_eq!(rt.index(), 4);
        rt.settle().await;

        rt.signal(HostSignal::Wheel {
            direction: WheelDirection::Down,
        })
        .await;
        assert_eq!(rt.index(), 0);
        rt.settle().await;

        // Closing the source unsubscribes without stopping the controller
        rt.close_host();
        tokio::task::yield_now().await;
        assert!(rt.handle.next_slide().await.is_ok());
        assert_eq!(
            rt.slides(),
            vec![
                (4, Direction::Prev),
                (0, Direction::Next),
                (1, Direction::Next)
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_host_visibility_and_pointer_signals() {
        let rt = TestCarousel::new(5).auto_play().with_host().build();

        // Hidden mid-transition: completion must not re-arm auto-advance
        rt.handle.go_to_slide(2).await.unwrap();
        rt.signal(HostSignal::Visibility { visible: false }).await;
        rt.advance_ms(INTERVAL_MS * 3).await;
        assert_eq!(rt.index(), 2);
        assert!(!rt.handle.state().is_animating());
        assert_eq!(rt.slides(), vec![(2, Direction::Next)]);

        rt.signal(HostSignal::Visibility { visible: true }).await;
        rt.advance_ms(INTERVAL_MS + 1).await;
        assert_eq!(rt.slides(), vec![(2, Direction::Next), (3, Direction::Next)]);
        rt.settle().await;

        rt.signal(HostSignal::PointerEnter).await;
        rt.advance_ms(INTERVAL_MS * 3).await;
        assert_eq!(rt.index(), 3);

        rt.signal(HostSignal::PointerLeave).await;
        rt.advance_ms(INTERVAL_MS + 1).await;
        assert_eq!(rt.index(), 4);
        assert_eq!(
            rt.slides(),
            vec![
                (2, Direction::Next),
                (3, Direction::Next),
                (4, Direction::Next)
            ]
        );

        // Host signals never touch the user's pause flag
        let state = rt.handle.state();
        assert!(!state.is_paused);
        assert!(state.host_visible);
        assert!(!state.hovered);
    }

    #[tokio::test(start_paused = true)]
    async fn test_subscribers_see_slide_before_completion() {
        let rt = TestCarousel::new(3).build();
        let mut rx = rt.handle.subscribe();

        rt.handle.next_slide().await.unwrap();
        let event = rx.try_recv().unwrap();
        assert_eq!(event.current_index(), 1);
        assert!(rt.handle.state().is_animating());
    }

    #[tokio::test(start_paused = true)]
    async fn test_detach_during_transition() {
        let rt = TestCarousel::new(5).auto_play().build();
        let handle = rt.handle.clone();

        rt.handle.go_to_slide(2).await.unwrap();
        handle.detach().await;

        rt.advance_ms(INTERVAL_MS * 2).await;
        assert_eq!(rt.slides(), vec![(2, Direction::Next)]);
        assert_eq!(
            rt.handle.next_slide().await.unwrap_err(),
            ControllerError::Detached
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_carousel_is_inert() {
        let rt = TestCarousel::new(0).auto_play().build();

        rt.handle.next_slide().await.unwrap();
        rt.handle.go_to_last().await.unwrap();
        rt.handle.go_to_first().await.unwrap();
        rt.advance_ms(INTERVAL_MS * 2).await;

        assert_eq!(rt.index(), 0);
        assert!(rt.events().is_empty());
    }
}
