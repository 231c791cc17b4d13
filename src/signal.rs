//! Completion signals and the schedulers that produce them.
//!
//! The session never waits on anything itself. Whenever it enters a phase
//! that ends asynchronously it hands out a ticket, and a scheduler arranges for
//! the matching signal to come back later over the event channel.

use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tracing::debug;

use crate::analysis::{AnalysisReport, Analyzer};
use crate::runtime::PitchEvent;
use crate::schema::MetricSchema;
use crate::session::{SignalPhase, SignalTicket};

#[derive(Clone, Debug, PartialEq)]
pub enum CompletionSignal {
    RecordingElapsed(SignalTicket),
    AnalysisReady(SignalTicket, AnalysisReport),
}

impl CompletionSignal {
    pub fn ticket(&self) -> SignalTicket {
        match self {
            CompletionSignal::RecordingElapsed(t) => *t,
            CompletionSignal::AnalysisReady(t, _) => *t,
        }
    }
}

/// Arranges for the signal that ends a ticket's phase to be delivered.
pub trait SignalScheduler {
    fn schedule(&mut self, ticket: SignalTicket, schema: &MetricSchema);
}

/// Fixed-delay scheduler backed by one short-lived thread per ticket.
pub struct TimerScheduler {
    tx: Sender<PitchEvent>,
    recording: Duration,
    analysis: Duration,
    analyzer: Arc<dyn Analyzer>,
}

impl TimerScheduler {
    pub fn new(
        tx: Sender<PitchEvent>,
        recording: Duration,
        analysis: Duration,
        analyzer: Arc<dyn Analyzer>,
    ) -> Self {
        Self {
            tx,
            recording,
            analysis,
            analyzer,
        }
    }
}

impl SignalScheduler for TimerScheduler {
    fn schedule(&mut self, ticket: SignalTicket, schema: &MetricSchema) {
        let tx = self.tx.clone();
        match ticket.phase {
            SignalPhase::RecordingElapsed => {
                let delay = self.recording;
                thread::spawn(move || {
                    thread::sleep(delay);
                    let signal = CompletionSignal::RecordingElapsed(ticket);
                    if tx.send(PitchEvent::Signal(signal)).is_err() {
                        debug!(?ticket, "event loop gone, dropping recording signal");
                    }
                });
            }
            SignalPhase::AnalysisComplete => {
                let delay = self.analysis;
                let analyzer = Arc::clone(&self.analyzer);
                let schema = schema.clone();
                thread::spawn(move || {
                    thread::sleep(delay);
                    let report = analyzer.analyze(&schema);
                    let signal = CompletionSignal::AnalysisReady(ticket, report);
                    if tx.send(PitchEvent::Signal(signal)).is_err() {
                        debug!(?ticket, "event loop gone, dropping analysis signal");
                    }
                });
            }
        }
    }
}

/// Scheduler that only records what it was asked to do; the caller delivers
/// signals by hand.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    pub scheduled: Vec<SignalTicket>,
}

impl ManualScheduler {
    pub fn last(&self) -> Option<SignalTicket> {
        self.scheduled.last().copied()
    }
}

impl SignalScheduler for ManualScheduler {
    fn schedule(&mut self, ticket: SignalTicket, _schema: &MetricSchema) {
        self.scheduled.push(ticket);
    }
}
