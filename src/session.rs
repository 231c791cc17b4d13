use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use tracing::{debug, info};

use crate::analysis::{AnalysisReport, Rewrite};
use crate::error::{Result, SessionError};
use crate::feedback::FeedbackCatalog;
use crate::schema::MetricSchema;
use crate::score::Score;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum PitchState {
    Idle,
    Recording,
    Processing,
    Results,
}

/// Which asynchronous phase a ticket is waiting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalPhase {
    RecordingElapsed,
    AnalysisComplete,
}

/// Issued when the session enters a phase that ends on an external signal.
///
/// A signal is only applied if it carries the ticket the session is still
/// waiting on; anything older is stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SignalTicket {
    pub seq: u64,
    pub phase: SignalPhase,
}

/// User-facing notification raised by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: &'static str,
    pub description: &'static str,
}

impl Notice {
    const RECORDING_STARTED: Notice = Notice {
        title: "Recording Started",
        description: "Start delivering your elevator pitch now!",
    };
    const PROCESSING: Notice = Notice {
        title: "Processing",
        description: "Analyzing your pitch with AI...",
    };
    const COMPLETE: Notice = Notice {
        title: "Analysis Complete",
        description: "Your scores and feedback are ready.",
    };
    const FAILED: Notice = Notice {
        title: "Analysis Failed",
        description: "The analysis could not be used. Try again.",
    };
}

pub type ScoreCard = BTreeMap<String, Score>;

/// Everything a completed session shows.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionResults {
    pub transcript: String,
    pub scores: ScoreCard,
    pub feedback: FeedbackCatalog,
    pub rewrites: Vec<Rewrite>,
    pub recorded_for: Duration,
    pub completed_at: DateTime<Local>,
}

#[derive(Debug, Clone)]
enum Phase {
    Idle,
    Recording { started_at: Instant },
    Processing { recorded_for: Duration },
    Results(Box<SessionResults>),
}

/// One attempt at recording a pitch and getting it scored.
///
/// Transitions are the only way to mutate a session. Each one bumps an
/// internal sequence number so that completion signals issued for an earlier
/// phase can be recognised and dropped.
#[derive(Debug, Clone)]
pub struct PitchSession {
    schema: MetricSchema,
    phase: Phase,
    seq: u64,
    notices: Vec<Notice>,
}

impl Default for PitchSession {
    fn default() -> Self {
        Self::new(MetricSchema::default())
    }
}

impl PitchSession {
    pub fn new(schema: MetricSchema) -> Self {
        Self {
            schema,
            phase: Phase::Idle,
            seq: 0,
            notices: vec![],
        }
    }

    pub fn schema(&self) -> &MetricSchema {
        &self.schema
    }

    pub fn state(&self) -> PitchState {
        match self.phase {
            Phase::Idle => PitchState::Idle,
            Phase::Recording { .. } => PitchState::Recording,
            Phase::Processing { .. } => PitchState::Processing,
            Phase::Results(_) => PitchState::Results,
        }
    }

    pub fn results(&self) -> Option<&SessionResults> {
        match &self.phase {
            Phase::Results(results) => Some(&**results),
            _ => None,
        }
    }

    /// Empty unless the session has results.
    pub fn transcript(&self) -> &str {
        self.results().map_or("", |r| r.transcript.as_str())
    }

    pub fn scores(&self) -> Option<&ScoreCard> {
        self.results().map(|r| &r.scores)
    }

    /// How long the current recording has been running.
    pub fn recording_elapsed(&self) -> Option<Duration> {
        match self.phase {
            Phase::Recording { started_at } => Some(started_at.elapsed()),
            _ => None,
        }
    }

    /// The ticket a completion signal must carry to be applied right now.
    pub fn pending_ticket(&self) -> Option<SignalTicket> {
        let phase = match self.phase {
            Phase::Recording { .. } => SignalPhase::RecordingElapsed,
            Phase::Processing { .. } => SignalPhase::AnalysisComplete,
            Phase::Idle | Phase::Results(_) => return None,
        };
        Some(SignalTicket {
            seq: self.seq,
            phase,
        })
    }

    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub fn start_recording(&mut self) -> Result<SignalTicket> {
        self.expect_state("start recording", PitchState::Idle)?;
        self.enter(Phase::Recording {
            started_at: Instant::now(),
        });
        self.notices.push(Notice::RECORDING_STARTED);
        info!(seq = self.seq, "recording started");
        Ok(self.ticket(SignalPhase::RecordingElapsed))
    }

    /// Manual stop. Any pending recording-elapsed signal becomes stale.
    pub fn stop_recording(&mut self) -> Result<SignalTicket> {
        self.expect_state("stop recording", PitchState::Recording)?;
        Ok(self.begin_processing())
    }

    /// The recording phase ran its course.
    pub fn finish_recording(&mut self, ticket: SignalTicket) -> Result<SignalTicket> {
        self.check_ticket(ticket)?;
        Ok(self.begin_processing())
    }

    /// Apply analysis results. On any validation failure the session stays in
    /// `Processing` under the same ticket so the analysis can be resupplied.
    pub fn complete_analysis(&mut self, ticket: SignalTicket, report: AnalysisReport) -> Result<()> {
        self.check_ticket(ticket)?;
        let recorded_for = match self.phase {
            Phase::Processing { recorded_for } => recorded_for,
            _ => Duration::ZERO,
        };

        let results = match self.validate(report, recorded_for) {
            Ok(results) => results,
            Err(e) => {
                self.notices.push(Notice::FAILED);
                info!(seq = self.seq, error = %e, "analysis rejected");
                return Err(e);
            }
        };

        self.enter(Phase::Results(Box::new(results)));
        self.notices.push(Notice::COMPLETE);
        info!(seq = self.seq, "results ready");
        Ok(())
    }

    /// Back to a fresh idle session from any state. Outstanding tickets go stale.
    pub fn reset(&mut self) {
        let from = self.state();
        self.enter(Phase::Idle);
        self.notices.clear();
        info!(seq = self.seq, %from, "session reset");
    }

    /// Issue a fresh ticket for the analysis phase, staling the previous one.
    pub fn reissue_analysis_ticket(&mut self) -> Result<SignalTicket> {
        self.expect_state("retry analysis", PitchState::Processing)?;
        self.seq += 1;
        Ok(self.ticket(SignalPhase::AnalysisComplete))
    }

    fn begin_processing(&mut self) -> SignalTicket {
        let recorded_for = self.recording_elapsed().unwrap_or_default();
        self.enter(Phase::Processing { recorded_for });
        self.notices.push(Notice::PROCESSING);
        info!(seq = self.seq, recorded_ms = recorded_for.as_millis() as u64, "processing");
        self.ticket(SignalPhase::AnalysisComplete)
    }

    fn validate(&self, report: AnalysisReport, recorded_for: Duration) -> Result<SessionResults> {
        let mut scores = ScoreCard::new();
        for (metric, raw) in report.scores {
            let score = Score::new(raw).map_err(|source| SessionError::InvalidScore {
                metric: metric.clone(),
                source,
            })?;
            scores.insert(metric, score);
        }

        if let Some(missing) = self
            .schema
            .headline
            .iter()
            .find(|m| !scores.contains_key(&m.key))
        {
            return Err(SessionError::MissingMetric(missing.key.clone()));
        }

        let feedback = FeedbackCatalog::from_drafts(&self.schema, &report.feedback)?;

        Ok(SessionResults {
            transcript: report.transcript,
            scores,
            feedback,
            rewrites: report.rewrites,
            recorded_for,
            completed_at: Local::now(),
        })
    }

    fn enter(&mut self, phase: Phase) {
        self.seq += 1;
        self.phase = phase;
    }

    fn ticket(&self, phase: SignalPhase) -> SignalTicket {
        SignalTicket {
            seq: self.seq,
            phase,
        }
    }

    fn expect_state(&self, event: &'static str, wanted: PitchState) -> Result<()> {
        let state = self.state();
        if state == wanted {
            Ok(())
        } else {
            Err(SessionError::InvalidState { event, state })
        }
    }

    fn check_ticket(&self, ticket: SignalTicket) -> Result<()> {
        if self.pending_ticket() == Some(ticket) {
            Ok(())
        } else {
            debug!(?ticket, current = self.seq, "ignoring stale signal");
            Err(SessionError::StaleSignal { ticket })
        }
    }
}
