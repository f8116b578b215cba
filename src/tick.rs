use std::fmt;
use std::sync::mpsc::Sender;
use std::thread;
use std::time::Duration;

use crate::runtime::AppEvent;

/// Delay between two consecutive ticks of a running timer
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Epoch tag carried by every scheduled tick.
///
/// A tick is only honoured while its generation still matches the live
/// session; bumping the generation is the only way an armed tick is cancelled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(self) -> u64 {
        self.0
    }

    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "g{}", self.0)
    }
}

/// Something that can deliver a single delayed tick tagged with a generation
pub trait TickScheduler {
    fn arm(&mut self, generation: Generation);
}

/// Production scheduler: one sleeping thread per armed tick, feeding the
/// shared event channel.
#[derive(Debug, Clone)]
pub struct ThreadTickScheduler {
    tx: Sender<AppEvent>,
    delay: Duration,
}

impl ThreadTickScheduler {
    pub fn new(tx: Sender<AppEvent>) -> Self {
        Self::with_delay(tx, TICK_INTERVAL)
    }

    pub fn with_delay(tx: Sender<AppEvent>, delay: Duration) -> Self {
        Self { tx, delay }
    }
}

impl TickScheduler for ThreadTickScheduler {
    fn arm(&mut self, generation: Generation) {
        let tx = self.tx.clone();
        let delay = self.delay;
        thread::spawn(move || {
            thread::sleep(delay);
            // receiver gone means the app is shutting down
            let _ = tx.send(AppEvent::Tick(generation));
        });
    }
}

/// Records armed generations instead of scheduling anything
#[derive(Debug, Default)]
pub struct RecordingTickScheduler {
    pub armed: Vec<Generation>,
}

impl RecordingTickScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<Generation> {
        self.armed.last().copied()
    }
}

impl TickScheduler for RecordingTickScheduler {
    fn arm(&mut self, generation: Generation) {
        self.armed.push(generation);
    }
}
