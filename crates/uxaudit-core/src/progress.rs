//! Simulated audit progress.
//!
//! The model call is one opaque request with no progress signal, so the stage
//! display is driven by a fixed-period timer instead. The timer only
//! communicates liveness: it never completes an audit, and the real call's
//! settlement ends the run at whatever stage is showing.
//!
//! ```text
//! Idle --start--> Running(0) --tick--> Running(1) ... Running(6) --tick--> Running(6)
//!                     |                                   |
//!                     +------------- settle --------------+--> Settled(Success | Failed)
//! ```

use std::time::Duration;

use uuid::Uuid;

use crate::error::CoreError;

/// Stage labels shown while a call is in flight, in display order.
pub const STATUS_STAGES: [&str; 7] = [
    "INITIALIZING_NODE",
    "UPLOADING_TELEMETRY",
    "SCANNING_PIXEL_MATRIX",
    "EVALUATING_HEURISTICS",
    "SIMULATING_PERSONA_SWARM",
    "RECONCILING_AGENT_CONFLICTS",
    "FINALIZING_REPORT",
];

/// Index of the stage the display freezes on.
pub const LAST_STAGE: usize = STATUS_STAGES.len() - 1;

pub const DEFAULT_STAGE_INTERVAL: Duration = Duration::from_millis(3_000);

pub const STATUS_COMPLETE: &str = "AUDIT_COMPLETE";
pub const STATUS_READY: &str = "READY_FOR_SCAN";

/// Identity of one audit attempt. Settlements carrying an older ticket are
/// stale and ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AuditTicket(Uuid);

impl AuditTicket {
    fn fresh() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for AuditTicket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running { stage: usize },
    /// `stage` is whatever was showing when the call settled.
    Settled { stage: usize, outcome: Outcome },
}

#[derive(Debug, Clone)]
pub struct ProgressState {
    phase: Phase,
    ticket: Option<AuditTicket>,
}

impl Default for ProgressState {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressState {
    #[must_use]
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            ticket: None,
        }
    }

    /// Enters `Running` at stage 0 and issues a ticket for the new attempt.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::AuditInFlight`] while a previous attempt is still
    /// running; only one call may be in flight.
    pub fn start(&mut self) -> Result<AuditTicket, CoreError> {
        if self.is_analyzing() {
            return Err(CoreError::AuditInFlight);
        }
        let ticket = AuditTicket::fresh();
        self.phase = Phase::Running { stage: 0 };
        self.ticket = Some(ticket);
        tracing::debug!(%ticket, "progress started");
        Ok(ticket)
    }

    /// Advances one stage while running, saturating at [`LAST_STAGE`].
    /// Returns `true` if the displayed stage changed.
    pub fn tick(&mut self) -> bool {
        match &mut self.phase {
            Phase::Running { stage } if *stage < LAST_STAGE => {
                *stage += 1;
                true
            }
            _ => false,
        }
    }

    /// Settles the attempt identified by `ticket`. Returns `false` and leaves
    /// the state untouched when the ticket is stale or nothing is running.
    pub fn settle(&mut self, ticket: AuditTicket, outcome: Outcome) -> bool {
        if self.ticket != Some(ticket) {
            tracing::warn!(%ticket, "ignoring settlement for a stale audit");
            return false;
        }
        let Phase::Running { stage } = self.phase else {
            return false;
        };
        self.phase = Phase::Settled { stage, outcome };
        true
    }

    /// Returns to `Idle`, orphaning any in-flight ticket.
    pub fn reset(&mut self) {
        self.phase = Phase::Idle;
        self.ticket = None;
    }

    #[must_use]
    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    #[must_use]
    pub fn is_analyzing(&self) -> bool {
        matches!(self.phase, Phase::Running { .. })
    }

    /// Current stage index; `0` when idle.
    #[must_use]
    pub fn stage(&self) -> usize {
        match self.phase {
            Phase::Idle => 0,
            Phase::Running { stage } | Phase::Settled { stage, .. } => stage,
        }
    }

    /// The terminal error message, if the last attempt failed.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match &self.phase {
            Phase::Settled {
                outcome: Outcome::Failed(message),
                ..
            } => Some(message),
            _ => None,
        }
    }

    /// Label for the status line.
    #[must_use]
    pub fn status_label(&self) -> &'static str {
        match &self.phase {
            Phase::Running { stage } => STATUS_STAGES[*stage],
            Phase::Settled {
                outcome: Outcome::Success,
                ..
            } => STATUS_COMPLETE,
            _ => STATUS_READY,
        }
    }

    /// Filled steps of the progress bar, out of `STATUS_STAGES.len()`.
    /// A successful settlement fills the bar; a failure freezes it where it
    /// stopped.
    #[must_use]
    pub fn bar_position(&self) -> u64 {
        let filled = match &self.phase {
            Phase::Idle => 0,
            Phase::Settled {
                outcome: Outcome::Success,
                ..
            } => STATUS_STAGES.len(),
            Phase::Running { stage } | Phase::Settled { stage, .. } => stage + 1,
        };
        filled as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_is_idle_and_ready() {
        let state = ProgressState::new();
        assert_eq!(state.phase(), &Phase::Idle);
        assert!(!state.is_analyzing());
        assert_eq!(state.status_label(), STATUS_READY);
    }

    #[test]
    fn start_enters_stage_zero() {
        let mut state = ProgressState::new();
        state.start().expect("idle state can start");
        assert!(state.is_analyzing());
        assert_eq!(state.stage(), 0);
        assert_eq!(state.status_label(), "INITIALIZING_NODE");
    }

    #[test]
    fn six_ticks_reach_last_stage_and_saturate() {
        let mut state = ProgressState::new();
        state.start().expect("start");
        for _ in 0..6 {
            assert!(state.tick());
        }
        assert_eq!(state.stage(), 6);
        assert_eq!(state.status_label(), "FINALIZING_REPORT");

        for _ in 0..10 {
            assert!(!state.tick());
        }
        assert_eq!(state.stage(), 6);
        assert!(state.is_analyzing());
    }

    #[test]
    fn settle_at_any_stage_clears_analyzing() {
        for ticks in 0..=LAST_STAGE {
            let mut state = ProgressState::new();
            let ticket = state.start().expect("start");
            for _ in 0..ticks {
                state.tick();
            }
            assert!(state.settle(ticket, Outcome::Success));
            assert!(!state.is_analyzing());
            assert_eq!(state.stage(), ticks);
            assert_eq!(state.status_label(), STATUS_COMPLETE);
        }
    }

    #[test]
    fn ticks_after_settle_are_inert() {
        let mut state = ProgressState::new();
        let ticket = state.start().expect("start");
        state.settle(ticket, Outcome::Failed("boom".to_owned()));
        assert!(!state.tick());
        assert_eq!(state.stage(), 0);
        assert_eq!(state.error(), Some("boom"));
        assert_eq!(state.status_label(), STATUS_READY);
    }

    #[test]
    fn second_start_while_running_is_refused() {
        let mut state = ProgressState::new();
        state.start().expect("start");
        assert_eq!(state.start(), Err(CoreError::AuditInFlight));
    }

    #[test]
    fn restart_after_settle_resets_to_stage_zero() {
        let mut state = ProgressState::new();
        let first = state.start().expect("start");
        state.tick();
        state.tick();
        state.settle(first, Outcome::Success);

        let second = state.start().expect("restart");
        assert_ne!(first, second);
        assert_eq!(state.stage(), 0);
        assert!(state.error().is_none());
    }

    #[test]
    fn stale_ticket_is_ignored() {
        let mut state = ProgressState::new();
        let stale = state.start().expect("start");
        state.reset();
        let current = state.start().expect("start again");

        assert!(!state.settle(stale, Outcome::Success));
        assert!(state.is_analyzing());
        assert!(state.settle(current, Outcome::Success));
    }

    #[test]
    fn settle_after_reset_is_ignored() {
        let mut state = ProgressState::new();
        let ticket = state.start().expect("start");
        state.reset();
        assert!(!state.settle(ticket, Outcome::Success));
        assert_eq!(state.phase(), &Phase::Idle);
    }

    #[test]
    fn bar_position_tracks_stage() {
        let mut state = ProgressState::new();
        assert_eq!(state.bar_position(), 0);
        let ticket = state.start().expect("start");
        assert_eq!(state.bar_position(), 1);
        for _ in 0..LAST_STAGE + 3 {
            state.tick();
        }
        assert_eq!(state.bar_position(), 7);
        state.settle(ticket, Outcome::Failed("boom".to_owned()));
        assert_eq!(state.bar_position(), 7);
    }

    #[test]
    fn bar_position_fills_on_success_and_freezes_on_failure() {
        let mut state = ProgressState::new();
        let ticket = state.start().expect("start");
        state.tick();
        state.settle(ticket, Outcome::Success);
        assert_eq!(state.bar_position(), 7);

        state.reset();
        let ticket = state.start().expect("start");
        state.tick();
        state.settle(ticket, Outcome::Failed("boom".to_owned()));
        assert_eq!(state.bar_position(), 2);
    }
}
