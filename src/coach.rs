use tracing::{debug, warn};

use crate::error::{Result, SessionError};
use crate::session::PitchSession;
use crate::signal::{CompletionSignal, SignalScheduler};

/// Requests coming from the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Stop,
    Reset,
    Retry,
}

/// Drives one session: applies commands and signals in arrival order and
/// schedules the signal that ends each asynchronous phase.
pub struct Coach<S: SignalScheduler> {
    session: PitchSession,
    scheduler: S,
    last_error: Option<SessionError>,
}

impl<S: SignalScheduler> Coach<S> {
    pub fn new(session: PitchSession, scheduler: S) -> Self {
        Self {
            session,
            scheduler,
            last_error: None,
        }
    }

    pub fn session(&self) -> &PitchSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut PitchSession {
        &mut self.session
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Most recent error worth showing, cleared on reset and retry.
    pub fn last_error(&self) -> Option<&SessionError> {
        self.last_error.as_ref()
    }

    pub fn command(&mut self, command: Command) -> Result<()> {
        let outcome = match command {
            Command::Start => self.session.start_recording().map(|t| self.schedule(t)),
            Command::Stop => self.session.stop_recording().map(|t| self.schedule(t)),
            Command::Reset => {
                self.session.reset();
                self.last_error = None;
                Ok(())
            }
            Command::Retry => self.session.reissue_analysis_ticket().map(|t| {
                self.last_error = None;
                self.schedule(t)
            }),
        };
        self.settle(outcome)
    }

    pub fn deliver(&mut self, signal: CompletionSignal) -> Result<()> {
        let outcome = match signal {
            CompletionSignal::RecordingElapsed(ticket) => self
                .session
                .finish_recording(ticket)
                .map(|t| self.schedule(t)),
            CompletionSignal::AnalysisReady(ticket, report) => {
                self.session.complete_analysis(ticket, report)
            }
        };
        self.settle(outcome)
    }

    fn schedule(&mut self, ticket: crate::session::SignalTicket) {
        self.scheduler.schedule(ticket, self.session.schema());
    }

    fn settle(&mut self, outcome: Result<()>) -> Result<()> {
        match outcome {
            Ok(()) => Ok(()),
            Err(e) if e.is_stale() => {
                debug!(error = %e, "dropped");
                Ok(())
            }
            Err(e) => {
                if e.should_surface() {
                    self.last_error = Some(e.clone());
                } else {
                    warn!(error = %e, "rejected");
                }
                Err(e)
            }
        }
    }
}
