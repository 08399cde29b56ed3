//! Carousel demo - drives a controller from the terminal
//!
//! Arrow keys navigate, space toggles pause, Home/End jump, the mouse wheel
//! navigates when `CAROUSEL_MOUSE_WHEEL` is on, and terminal focus stands in
//! for page visibility. `q`, Esc or Ctrl-C quits.

use carousel::{CarouselConfig, ControllerBuilder, HostSignal, Key, SlideEvent, WheelDirection};
use crossterm::event::{
    DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture,
    Event as TermEvent, KeyCode, KeyEventKind, KeyModifiers, MouseEventKind,
};
use crossterm::{execute, terminal};
use std::io::Write;
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_LABELS: &[&str] = &[
    "African Lion",
    "African Elephant",
    "Bengal Tiger",
    "Masai Giraffe",
    "African Leopard",
    "Cheetah",
    "Eurasian Elk",
];

/// Restores the terminal on every exit path
struct TerminalGuard;

impl TerminalGuard {
    fn enter(mouse: bool) -> std::io::Result<Self> {
        terminal::enable_raw_mode()?;
        // Dropped on any later error, which leaves raw mode again
        let guard = Self;
        let mut stdout = std::io::stdout();
        execute!(stdout, EnableFocusChange)?;
        if mouse {
            execute!(stdout, EnableMouseCapture)?;
        }
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(std::io::stdout(), DisableMouseCapture, DisableFocusChange);
        let _ = terminal::disable_raw_mode();
    }
}

enum Input {
    Signal(HostSignal),
    Quit,
}

fn map_key(code: KeyCode) -> Key {
    match code {
        KeyCode::Right => Key::ArrowRight,
        KeyCode::Down => Key::ArrowDown,
        KeyCode::Left => Key::ArrowLeft,
        KeyCode::Up => Key::ArrowUp,
        KeyCode::Char(' ') => Key::Space,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        _ => Key::Other,
    }
}

fn map_event(event: TermEvent) -> Option<Input> {
    match event {
        TermEvent::Key(key) if key.kind == KeyEventKind::Press => match key.code {
            KeyCode::Char('q') | KeyCode::Esc => Some(Input::Quit),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Input::Quit)
            }
            code => Some(Input::Signal(HostSignal::KeyDown { key: map_key(code) })),
        },
        TermEvent::FocusGained => Some(Input::Signal(HostSignal::Visibility { visible: true })),
        TermEvent::FocusLost => Some(Input::Signal(HostSignal::Visibility { visible: false })),
        TermEvent::Mouse(mouse) => match mouse.kind {
            MouseEventKind::ScrollDown => Some(Input::Signal(HostSignal::Wheel {
                direction: WheelDirection::Down,
            })),
            MouseEventKind::ScrollUp => Some(Input::Signal(HostSignal::Wheel {
                direction: WheelDirection::Up,
            })),
            _ => None,
        },
        _ => None,
    }
}

/// Blocking terminal reader; ends when the receiver goes away
fn read_terminal(signal_tx: &mpsc::Sender<HostSignal>, quit_tx: &mpsc::Sender<()>) {
    loop {
        let event = match crossterm::event::read() {
            Ok(event) => event,
            Err(e) => {
                tracing::error!(error = %e, "Terminal read failed");
                let _ = quit_tx.blocking_send(());
                return;
            }
        };
        match map_event(event) {
            Some(Input::Signal(signal)) => {
                if signal_tx.blocking_send(signal).is_err() {
                    return;
                }
            }
            Some(Input::Quit) => {
                let _ = quit_tx.blocking_send(());
                return;
            }
            None => {}
        }
    }
}

fn print_event(labels: &[String], event: &SlideEvent) {
    let label = labels
        .get(event.current_index())
        .map_or("?", String::as_str);
    let json = serde_json::to_string(event).unwrap_or_default();
    // Raw mode needs explicit carriage returns
    let mut stdout = std::io::stdout();
    let _ = write!(stdout, "{json}\r\n  -> {label}\r\n");
    let _ = stdout.flush();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "carousel=info,carousel_demo=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false)
                .with_writer(std::io::stderr),
        )
        .init();

    // Configuration
    let config = CarouselConfig::from_env()?;
    let mut labels: Vec<String> = std::env::args().skip(1).collect();
    if labels.is_empty() {
        labels = DEFAULT_LABELS.iter().map(|s| (*s).to_string()).collect();
    }
    tracing::info!(items = labels.len(), config = ?config, "Starting carousel demo");

    let guard = TerminalGuard::enter(config.mouse_wheel)?;

    let (signal_tx, signal_rx) = mpsc::channel(32);
    let (quit_tx, mut quit_rx) = mpsc::channel(1);
    tokio::task::spawn_blocking(move || read_terminal(&signal_tx, &quit_tx));

    let printed_labels = labels.clone();
    let handle = ControllerBuilder::new(labels.len())
        .config(config)
        .on_change(move |event: &SlideEvent| print_event(&printed_labels, event))
        .host_signals(signal_rx)
        .spawn();

    if let Some(first) = labels.first() {
        let mut stdout = std::io::stdout();
        let _ = write!(stdout, "  -> {first}\r\n");
        let _ = stdout.flush();
    }

    tokio::select! {
        _ = quit_rx.recv() => {}
        _ = tokio::signal::ctrl_c() => {}
    }

    handle.detach().await;
    drop(guard);
    tracing::info!("Carousel demo stopped");

    // The blocking reader is parked in `read`; don't wait for it
    std::process::exit(0);
}
