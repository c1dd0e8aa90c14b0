//! Terminal event abstraction.
//!
//! Wraps crossterm events into a simpler enum and runs a background task that
//! forwards them over a channel.  Ticks arrive on a fixed period whether or
//! not keys are flowing, so every frame gets exactly one update.

use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CtEvent, KeyEvent};
use tokio::sync::mpsc;

/// High-level events consumed by the application.
#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Resize(u16, u16),
    /// Frame boundary: run one update and draw.
    Tick,
}

/// Spawns a background task that polls the terminal for events and sends them
/// through the returned channel.
pub fn spawn_event_reader(tick_rate: Duration) -> mpsc::UnboundedReceiver<AppEvent> {
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        let mut next_tick = Instant::now() + tick_rate;
        loop {
            let wait = next_tick.saturating_duration_since(Instant::now());
            if event::poll(wait).unwrap_or(false) {
                let app_event = match event::read() {
                    Ok(CtEvent::Key(k)) => AppEvent::Key(k),
                    Ok(CtEvent::Resize(w, h)) => AppEvent::Resize(w, h),
                    Ok(_) => continue,
                    Err(err) => {
                        tracing::warn!(%err, "terminal read failed");
                        continue;
                    }
                };
                if tx.send(app_event).is_err() {
                    break; // receiver dropped
                }
            }
            if Instant::now() >= next_tick {
                next_tick = Instant::now() + tick_rate;
                if tx.send(AppEvent::Tick).is_err() {
                    break;
                }
            }
        }
    });

    rx
}
