use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

pub const TICK_RATE_MS: u64 = 100;

/// Everything the main loop reacts to
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AppEvent {
    Key(KeyEvent),
    Resize,
    Tick,
}

impl AppEvent {
    pub fn key(code: KeyCode) -> Self {
        AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    pub fn char(c: char) -> Self {
        Self::key(KeyCode::Char(c))
    }
}

/// Source of terminal events
pub trait EventSource: Send + 'static {
    /// Wait up to `timeout` for the next event.
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError>;
}

/// Reads crossterm events on a helper thread and forwards them.
pub struct CrosstermEventSource {
    rx: Receiver<AppEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            let forwarded = match event::read() {
                // Windows reports releases too; only presses count
                Ok(CtEvent::Key(key)) if key.kind != KeyEventKind::Release => {
                    tx.send(AppEvent::Key(key))
                }
                Ok(CtEvent::Resize(_, _)) => tx.send(AppEvent::Resize),
                Ok(_) => Ok(()),
                Err(e) => {
                    log::error!("terminal event stream failed: {}", e);
                    break;
                }
            };
            if forwarded.is_err() {
                break;
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Scripted event source for headless tests
pub struct TestEventSource {
    rx: Receiver<AppEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<AppEvent>) -> Self {
        Self { rx }
    }

    /// A source pre-loaded with `events`, followed by ticks once they run out.
    pub fn scripted<I: IntoIterator<Item = AppEvent>>(events: I) -> (Self, Sender<AppEvent>) {
        let (tx, rx) = mpsc::channel();
        for ev in events {
            // the receiver is alive, so this cannot fail
            let _ = tx.send(ev);
        }
        (Self { rx }, tx)
    }
}

impl EventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Pulls one event at a time, turning silence into ticks
pub struct Runner<E: EventSource> {
    event_source: E,
    tick: Duration,
}

impl<E: EventSource> Runner<E> {
    pub fn new(event_source: E, tick: Duration) -> Self {
        Self { event_source, tick }
    }

    pub fn with_default_tick(event_source: E) -> Self {
        Self::new(event_source, Duration::from_millis(TICK_RATE_MS))
    }

    /// Blocks up to one tick and returns the next event, or Tick on timeout
    pub fn step(&self) -> AppEvent {
        match self.event_source.recv_timeout(self.tick) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => AppEvent::Tick,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_returns_tick_on_timeout() {
        let (_tx, rx) = mpsc::channel();
        let runner = Runner::new(TestEventSource::new(rx), Duration::from_millis(1));
        assert_eq!(runner.step(), AppEvent::Tick);
    }

    #[test]
    fn step_passes_through_events_in_order() {
        let (source, _tx) = TestEventSource::scripted([AppEvent::Resize, AppEvent::char('x')]);
        let runner = Runner::new(source, Duration::from_millis(10));
        assert_eq!(runner.step(), AppEvent::Resize);
        assert_eq!(runner.step(), AppEvent::char('x'));
        assert_eq!(runner.step(), AppEvent::Tick);
    }

    #[test]
    fn disconnected_source_ticks() {
        let (tx, rx) = mpsc::channel::<AppEvent>();
        drop(tx);
        let runner = Runner::with_default_tick(TestEventSource::new(rx));
        assert_eq!(runner.step(), AppEvent::Tick);
    }
}
