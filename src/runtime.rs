use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind};

use crate::error::AppError;
use crate::tick::Generation;

/// How long the runner waits for an event before handing back control
pub const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Unified event type consumed by the app, one at a time
#[derive(Clone, Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Resize,
    Tick(Generation),
}

/// Source of serialized app events (keyboard, resize, ticks)
pub trait AppEventSource {
    /// Block for up to `timeout` waiting for an event.
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError>;
}

/// Production event source: a crossterm reader thread and the tick
/// scheduler both feed the same channel.
pub struct CrosstermEventSource {
    rx: Receiver<AppEvent>,
}

impl CrosstermEventSource {
    /// Starts the terminal reader. The returned sender feeds the same stream
    /// and is meant for the tick scheduler.
    pub fn new() -> (Self, Sender<AppEvent>) {
        let (tx, rx) = mpsc::channel();
        let reader_tx = tx.clone();

        std::thread::spawn(move || loop {
            let forwarded = match event::read() {
                Ok(CtEvent::Key(key)) if key.kind != KeyEventKind::Release => {
                    reader_tx.send(AppEvent::Key(key))
                }
                Ok(CtEvent::Resize(_, _)) => reader_tx.send(AppEvent::Resize),
                Ok(_) => Ok(()),
                Err(_) => break,
            };
            if forwarded.is_err() {
                break;
            }
        });

        (Self { rx }, tx)
    }
}

impl AppEventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Test event source fed directly by the test
pub struct TestEventSource {
    rx: Receiver<AppEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<AppEvent>) -> Self {
        Self { rx }
    }
}

impl AppEventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Pulls the next event off the serialized stream
pub struct Runner<E: AppEventSource> {
    event_source: E,
    poll: Duration,
}

impl<E: AppEventSource> Runner<E> {
    pub fn new(event_source: E, poll: Duration) -> Self {
        Self { event_source, poll }
    }

    /// Waits up to the poll interval; `Ok(None)` means nothing arrived.
    pub fn step(&self) -> Result<Option<AppEvent>, AppError> {
        match self.event_source.recv_timeout(self.poll) {
            Ok(ev) => Ok(Some(ev)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(AppError::EventStreamClosed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::sync::mpsc;

    #[test]
    fn step_returns_none_on_timeout() {
        let (_tx, rx) = mpsc::channel();
        let runner = Runner::new(TestEventSource::new(rx), Duration::from_millis(1));

        assert_matches!(runner.step(), Ok(None));
    }

    #[test]
    fn step_passes_through_events() {
        let (tx, rx) = mpsc::channel();
        tx.send(AppEvent::Resize).unwrap();
        tx.send(AppEvent::Tick(Generation::new(4))).unwrap();
        let runner = Runner::new(TestEventSource::new(rx), Duration::from_millis(10));

        assert_matches!(runner.step(), Ok(Some(AppEvent::Resize)));
        assert_matches!(runner.step(), Ok(Some(AppEvent::Tick(g))) if g.value() == 4);
    }

    #[test]
    fn step_reports_closed_stream() {
        let (tx, rx) = mpsc::channel::<AppEvent>();
        drop(tx);
        let runner = Runner::new(TestEventSource::new(rx), Duration::from_millis(10));

        assert_matches!(runner.step(), Err(AppError::EventStreamClosed));
    }
}
