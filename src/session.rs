use std::time::Duration;

use crate::timer::Phase;

pub const APP_TITLE: &str = "Pomodoro";

/// Fixed parameters of one run, chosen once at start and never mutated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionPlan {
    work_length: Duration,
    break_length: Duration,
    session_total: u32,
}

/// What follows the phase that just ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    Next {
        phase: Phase,
        session_index: u32,
        remaining: Duration,
    },
    Complete,
}

impl SessionPlan {
    /// `session_total` below one is raised to one.
    pub fn new(work_length: Duration, break_length: Duration, session_total: u32) -> Self {
        Self {
            work_length,
            break_length,
            session_total: session_total.max(1),
        }
    }

    pub fn work_length(&self) -> Duration {
        self.work_length
    }

    pub fn break_length(&self) -> Duration {
        self.break_length
    }

    pub fn session_total(&self) -> u32 {
        self.session_total
    }

    pub fn length_of(&self, phase: Phase) -> Duration {
        match phase {
            Phase::Work => self.work_length,
            Phase::Break => self.break_length,
        }
    }

    /// Work is always followed by Break in the same session; a Break starts the
    /// next session unless that would exceed the configured total.
    pub fn advance(&self, ended: Phase, session_index: u32) -> Advance {
        match ended {
            Phase::Work => Advance::Next {
                phase: Phase::Break,
                session_index,
                remaining: self.break_length,
            },
            Phase::Break => {
                let next_index = session_index.saturating_add(1);
                if next_index > self.session_total {
                    Advance::Complete
                } else {
                    Advance::Next {
                        phase: Phase::Work,
                        session_index: next_index,
                        remaining: self.work_length,
                    }
                }
            }
        }
    }
}

/// User-facing announcements raised by phase transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alert {
    WorkFinished,
    BreakFinished,
    AllSessionsComplete,
}

impl Alert {
    pub fn ended(phase: Phase) -> Self {
        match phase {
            Phase::Work => Alert::WorkFinished,
            Phase::Break => Alert::BreakFinished,
        }
    }

    pub fn title(&self) -> &'static str {
        APP_TITLE
    }

    pub fn message(&self) -> &'static str {
        match self {
            Alert::WorkFinished => "Work session finished! Time for a break.",
            Alert::BreakFinished => "Break finished! Back to work.",
            Alert::AllSessionsComplete => "All sessions completed!",
        }
    }
}
