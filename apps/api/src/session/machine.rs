use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::models::analysis::{AnalysisResult, ResumeData};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    Input,
    Analyzing,
    Results,
    Error,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Idle => "idle",
            Phase::Input => "input",
            Phase::Analyzing => "analyzing",
            Phase::Results => "results",
            Phase::Error => "error",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone)]
pub enum Event {
    Start,
    Submit(ResumeData),
    /// `ticket` is the generation of the submit that started the analysis.
    AnalysisResolved {
        ticket: u64,
        result: Arc<AnalysisResult>,
    },
    AnalysisRejected {
        ticket: u64,
    },
    Reset,
    Retry,
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Event::Start => "start",
            Event::Submit(_) => "submit",
            Event::AnalysisResolved { .. } => "analysis_resolved",
            Event::AnalysisRejected { .. } => "analysis_rejected",
            Event::Reset => "reset",
            Event::Retry => "retry",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("{0} cannot be empty")]
    Validation(&'static str),

    #[error("cannot {event} while {from}")]
    Invalid { from: Phase, event: &'static str },
}

/// One immutable view of a session. Every transition produces a new snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub phase: Phase,
    pub result: Option<Arc<AnalysisResult>>,
    pub target_role: Option<String>,
    /// Text of the last accepted submit, shown again while it is analyzed.
    pub resume_text: Option<String>,
    /// Bumped on every accepted submit; analysis completions must carry it.
    pub generation: u64,
    pub updated_at: DateTime<Utc>,
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self {
            phase: Phase::Idle,
            result: None,
            target_role: None,
            resume_text: None,
            generation: 0,
            updated_at: Utc::now(),
        }
    }
}

#[derive(Debug)]
pub enum Transition {
    Moved(SessionSnapshot),
    /// A completion for an earlier submit; the snapshot stays as is.
    Stale,
}

/// Computes the next snapshot for `event`. Never mutates `current`.
pub fn transition(current: &SessionSnapshot, event: Event) -> Result<Transition, TransitionError> {
    let next = |phase: Phase| SessionSnapshot {
        phase,
        updated_at: Utc::now(),
        ..current.clone()
    };

    let moved = match (current.phase, event) {
        (Phase::Idle, Event::Start) => next(Phase::Input),

        (Phase::Input, Event::Submit(data)) => {
            if let Some(field) = data.missing_field() {
                return Err(TransitionError::Validation(field));
            }
            SessionSnapshot {
                target_role: Some(data.target_role),
                resume_text: Some(data.text),
                result: None,
                generation: current.generation + 1,
                ..next(Phase::Analyzing)
            }
        }

        (Phase::Analyzing, Event::AnalysisResolved { ticket, result })
            if ticket == current.generation =>
        {
            SessionSnapshot {
                result: Some(result),
                ..next(Phase::Results)
            }
        }

        (Phase::Analyzing, Event::AnalysisRejected { ticket }) if ticket == current.generation => {
            SessionSnapshot {
                result: None,
                ..next(Phase::Error)
            }
        }

        (_, Event::AnalysisResolved { .. } | Event::AnalysisRejected { .. }) => {
            return Ok(Transition::Stale)
        }

        (Phase::Results, Event::Reset) => SessionSnapshot {
            result: None,
            target_role: None,
            resume_text: None,
            ..next(Phase::Input)
        },

        (Phase::Error, Event::Retry) => next(Phase::Input),

        (from, event) => {
            return Err(TransitionError::Invalid {
                from,
                event: event.name(),
            })
        }
    };

    Ok(Transition::Moved(moved))
}
