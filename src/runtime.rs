use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent};

use crate::signal::CompletionSignal;

/// Unified event type consumed by the app runner
#[derive(Clone, Debug, PartialEq)]
pub enum PitchEvent {
    Key(KeyEvent),
    Resize,
    Tick,
    Signal(CompletionSignal),
}

/// Source of events (keyboard, resize, completion signals)
pub trait PitchEventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    /// Returns Ok(event) if an event arrives before the timeout, or Err(Timeout) if it expires.
    fn recv_timeout(&self, timeout: Duration) -> Result<PitchEvent, RecvTimeoutError>;

    /// Handle for feeding completion signals into the same stream.
    fn sender(&self) -> Sender<PitchEvent>;
}

/// Production event source using crossterm
pub struct CrosstermEventSource {
    tx: Sender<PitchEvent>,
    rx: Receiver<PitchEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        let key_tx = tx.clone();

        std::thread::spawn(move || loop {
            match event::read() {
                Ok(CtEvent::Key(key)) => {
                    if key_tx.send(PitchEvent::Key(key)).is_err() {
                        break;
                    }
                }
                Ok(CtEvent::Resize(_, _)) => {
                    if key_tx.send(PitchEvent::Resize).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(_) => break,
            }
        });

        Self { tx, rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl PitchEventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<PitchEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }

    fn sender(&self) -> Sender<PitchEvent> {
        self.tx.clone()
    }
}

/// Channel-only event source, used headless and in tests
pub struct ChannelEventSource {
    tx: Sender<PitchEvent>,
    rx: Receiver<PitchEvent>,
}

impl ChannelEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self { tx, rx }
    }
}

impl Default for ChannelEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl PitchEventSource for ChannelEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<PitchEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }

    fn sender(&self) -> Sender<PitchEvent> {
        self.tx.clone()
    }
}

/// Configurable ticker interface
pub trait Ticker: Send + Sync + 'static {
    fn interval(&self) -> Duration;
}

/// Fixed interval ticker
#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Runner that advances the application one event/tick at a time
pub struct Runner<E: PitchEventSource, T: Ticker> {
    event_source: E,
    ticker: T,
}

impl<E: PitchEventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        Self {
            event_source,
            ticker,
        }
    }

    pub fn sender(&self) -> Sender<PitchEvent> {
        self.event_source.sender()
    }

    /// Blocks up to tick interval and returns the next event, or Tick on timeout
    pub fn step(&self) -> PitchEvent {
        match self.event_source.recv_timeout(self.ticker.interval()) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                PitchEvent::Tick
            }
        }
    }
}
