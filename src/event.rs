use std::io;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{self, KeyEvent, KeyEventKind};
use tracing::warn;

pub enum Event {
    Key(KeyEvent),
    Tick,
}

/// Input and the game clock, merged onto one channel by a polling thread.
pub struct EventHandler {
    rx: mpsc::Receiver<Event>,
}

impl EventHandler {
    pub fn new(tick_rate_ms: u64) -> Self {
        let (tx, rx) = mpsc::channel();
        let tick_rate = Duration::from_millis(tick_rate_ms.max(1));

        thread::spawn(move || {
            let mut next_tick = Instant::now() + tick_rate;
            loop {
                // Keys must not starve the clock, so poll only until the next tick is due
                let timeout = next_tick.saturating_duration_since(Instant::now());
                match event::poll(timeout) {
                    Ok(true) => match event::read() {
                        Ok(crossterm::event::Event::Key(key)) if key.kind == KeyEventKind::Press => {
                            if tx.send(Event::Key(key)).is_err() {
                                return;
                            }
                        }
                        Ok(_) => {}
                        Err(e) => warn!(error = %e, "failed to read terminal event"),
                    },
                    Ok(false) => {}
                    Err(e) => {
                        warn!(error = %e, "terminal event poll failed");
                        thread::sleep(timeout);
                    }
                }
                if Instant::now() >= next_tick {
                    if tx.send(Event::Tick).is_err() {
                        return;
                    }
                    next_tick += tick_rate;
                    // After a long stall, resume from now instead of bursting
                    if next_tick < Instant::now() {
                        next_tick = Instant::now() + tick_rate;
                    }
                }
            }
        });

        Self { rx }
    }

    pub fn next(&self) -> io::Result<Event> {
        self.rx
            .recv()
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))
    }
}
