//! Countdown state machine for a run of alternating work and break phases.
//!
//! Time only moves when a tick tagged with the current [`Generation`] is
//! delivered. Every operation returns the side effects it wants performed
//! (arming the next tick, alerting the user, ending the program); the caller
//! dispatches them and the session never keeps a handle on any of them.

use std::time::Duration;

use tracing::{debug, info, trace};

use crate::session::{Advance, Alert, SessionPlan};
use crate::tick::{Generation, TICK_INTERVAL};

const ADJUST_STEP: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Phase {
    Work,
    Break,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum RunState {
    Running,
    Paused,
}

/// Requests emitted by the state machine, performed in order by the app
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    ArmTick(Generation),
    Sound,
    Notify(Alert),
    Exit,
}

/// Read-only snapshot handed to the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerView {
    pub phase: Phase,
    pub run_state: RunState,
    pub remaining: Duration,
    pub session_index: u32,
    pub session_total: u32,
}

#[derive(Debug, Clone)]
pub struct TimerSession {
    plan: SessionPlan,
    phase: Phase,
    run_state: RunState,
    remaining: Duration,
    session_index: u32,
    generation: Generation,
    // a tick for the current generation has been armed and not yet consumed
    in_flight: bool,
    finished: bool,
}

impl TimerSession {
    /// Begin the first work phase and arm its first tick.
    pub fn start(plan: SessionPlan) -> (Self, Vec<Effect>) {
        let mut session = Self {
            plan,
            phase: Phase::Work,
            run_state: RunState::Running,
            remaining: plan.work_length(),
            session_index: 1,
            generation: Generation::default(),
            in_flight: false,
            finished: false,
        };
        session.generation = session.generation.next();
        info!(
            work = ?plan.work_length(),
            brk = ?plan.break_length(),
            sessions = plan.session_total(),
            "timer started"
        );

        let effects = vec![session.arm()];
        (session, effects)
    }

    pub fn plan(&self) -> &SessionPlan {
        &self.plan
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    pub fn remaining(&self) -> Duration {
        self.remaining
    }

    pub fn session_index(&self) -> u32 {
        self.session_index
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn view(&self) -> TimerView {
        TimerView {
            phase: self.phase,
            run_state: self.run_state,
            remaining: self.remaining,
            session_index: self.session_index,
            session_total: self.plan.session_total(),
        }
    }

    pub fn on_tick(&mut self, tag: Generation) -> Vec<Effect> {
        if self.finished || tag != self.generation {
            trace!(%tag, current = %self.generation, "dropping stale tick");
            return vec![];
        }
        self.in_flight = false;

        if self.run_state == RunState::Paused || self.remaining.is_zero() {
            return vec![];
        }

        self.remaining = self.remaining.saturating_sub(TICK_INTERVAL);
        if self.remaining.is_zero() {
            return self.finish_phase();
        }
        vec![self.arm()]
    }

    pub fn on_toggle_pause(&mut self) -> Vec<Effect> {
        if self.finished {
            return vec![];
        }
        match self.run_state {
            RunState::Running => {
                self.run_state = RunState::Paused;
                debug!(remaining = ?self.remaining, "paused");
                vec![]
            }
            RunState::Paused => {
                self.run_state = RunState::Running;
                debug!(remaining = ?self.remaining, "resumed");
                // an unconsumed tick of this generation will carry on the countdown
                if self.in_flight {
                    vec![]
                } else {
                    vec![self.arm()]
                }
            }
        }
    }

    /// End the current phase now, whatever its remaining time or run state.
    pub fn on_skip(&mut self) -> Vec<Effect> {
        if self.finished {
            return vec![];
        }
        debug!(phase = %self.phase, "skipping phase");
        self.finish_phase()
    }

    pub fn on_extend(&mut self) -> Vec<Effect> {
        if !self.finished {
            self.remaining = self.remaining.saturating_add(ADJUST_STEP);
            debug!(remaining = ?self.remaining, "extended");
        }
        vec![]
    }

    /// Take a minute off, never going below one minute. At or under a minute
    /// this does nothing.
    pub fn on_shrink(&mut self) -> Vec<Effect> {
        if !self.finished && self.remaining > ADJUST_STEP {
            self.remaining = self.remaining.saturating_sub(ADJUST_STEP).max(ADJUST_STEP);
            debug!(remaining = ?self.remaining, "shrunk");
        }
        vec![]
    }

    fn arm(&mut self) -> Effect {
        self.in_flight = true;
        Effect::ArmTick(self.generation)
    }

    fn finish_phase(&mut self) -> Vec<Effect> {
        self.generation = self.generation.next();
        self.in_flight = false;

        let ended = self.phase;
        let mut effects = vec![Effect::Sound, Effect::Notify(Alert::ended(ended))];

        match self.plan.advance(ended, self.session_index) {
            Advance::Next {
                phase,
                session_index,
                remaining,
            } => {
                self.phase = phase;
                self.session_index = session_index;
                self.remaining = remaining;
                self.run_state = RunState::Running;
                info!(
                    ended = %ended,
                    next = %phase,
                    session = session_index,
                    generation = %self.generation,
                    "phase finished"
                );
                effects.push(self.arm());
            }
            Advance::Complete => {
                self.session_index = self.session_index.saturating_add(1);
                self.remaining = Duration::ZERO;
                self.finished = true;
                info!(sessions = self.plan.session_total(), "all sessions complete");
                effects.push(Effect::Notify(Alert::AllSessionsComplete));
                effects.push(Effect::Exit);
            }
        }
        effects
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn mins(n: u64) -> Duration {
        Duration::from_secs(n * 60)
    }

    fn pomodoro(total: u32) -> (TimerSession, Vec<Effect>) {
        TimerSession::start(SessionPlan::new(mins(25), mins(5), total))
    }

    /// Deliver `n` ticks, each tagged with the generation current at the time.
    fn run_ticks(session: &mut TimerSession, n: usize) -> Vec<Effect> {
        let mut effects = vec![];
        for _ in 0..n {
            let tag = session.generation();
            effects.extend(session.on_tick(tag));
        }
        effects
    }

    fn count(effects: &[Effect], wanted: Effect) -> usize {
        effects.iter().filter(|e| **e == wanted).count()
    }

    fn transitions(effects: &[Effect]) -> usize {
        count(effects, Effect::Sound)
    }

    #[test]
    fn start_initialises_first_work_phase() {
        let (session, effects) = pomodoro(2);

        assert_eq!(session.phase(), Phase::Work);
        assert_eq!(session.run_state(), RunState::Running);
        assert_eq!(session.session_index(), 1);
        assert_eq!(session.remaining(), mins(25));
        assert_eq!(session.generation(), Generation::new(1));
        assert_eq!(effects, vec![Effect::ArmTick(Generation::new(1))]);
    }

    #[test]
    fn current_tick_decrements_and_rearms() {
        let (mut session, _) = pomodoro(1);
        let effects = session.on_tick(Generation::new(1));

        assert_eq!(session.remaining(), mins(25) - Duration::from_secs(1));
        assert_eq!(effects, vec![Effect::ArmTick(Generation::new(1))]);
    }

    #[test]
    fn countdown_exactness() {
        let (mut session, _) = pomodoro(1);

        let effects = run_ticks(&mut session, 1499);
        assert_eq!(transitions(&effects), 0);
        assert_eq!(session.phase(), Phase::Work);
        assert_eq!(session.remaining(), Duration::from_secs(1));

        let effects = run_ticks(&mut session, 1);
        assert_eq!(transitions(&effects), 1);
        assert_eq!(session.phase(), Phase::Break);
        assert_eq!(session.remaining(), mins(5));
    }

    #[test]
    fn full_two_session_scenario() {
        let (mut session, _) = pomodoro(2);

        let effects = run_ticks(&mut session, 1500);
        assert_eq!(session.phase(), Phase::Break);
        assert_eq!(session.remaining(), mins(5));
        assert_eq!(count(&effects, Effect::Notify(Alert::WorkFinished)), 1);

        let effects = run_ticks(&mut session, 300);
        assert_eq!(session.phase(), Phase::Work);
        assert_eq!(session.session_index(), 2);
        assert_eq!(session.remaining(), mins(25));
        assert_eq!(count(&effects, Effect::Notify(Alert::BreakFinished)), 1);

        let effects = run_ticks(&mut session, 1500);
        assert_eq!(session.phase(), Phase::Break);
        assert_eq!(session.remaining(), mins(5));
        assert_eq!(transitions(&effects), 1);

        let effects = run_ticks(&mut session, 300);
        assert!(session.is_finished());
        assert_eq!(session.session_index(), 3);
        assert_eq!(count(&effects, Effect::Notify(Alert::AllSessionsComplete)), 1);
        assert_eq!(count(&effects, Effect::Exit), 1);
        assert_matches!(effects.last(), Some(Effect::Exit));
        assert!(!effects
            .iter()
            .skip_while(|e| **e != Effect::Sound)
            .any(|e| matches!(e, Effect::ArmTick(_))));

        // nothing is scheduled after completion
        let after = run_ticks(&mut session, 10);
        assert!(after.is_empty());
        assert!(session.on_skip().is_empty());
        assert!(session.on_toggle_pause().is_empty());
    }

    #[test]
    fn phase_alternation_until_completion() {
        let total = 3;
        let (mut session, _) = pomodoro(total);
        let mut phases = vec![session.phase()];

        while !session.is_finished() {
            session.on_skip();
            if !session.is_finished() {
                phases.push(session.phase());
            }
        }

        assert_eq!(
            phases,
            vec![
                Phase::Work,
                Phase::Break,
                Phase::Work,
                Phase::Break,
                Phase::Work,
                Phase::Break
            ]
        );
        assert_eq!(session.session_index(), total + 1);
    }

    #[test]
    fn stale_tick_changes_nothing() {
        let (mut session, _) = pomodoro(2);
        run_ticks(&mut session, 10);
        let stale = session.generation();
        session.on_skip();

        let before = session.view();
        let effects = session.on_tick(stale);
        assert!(effects.is_empty());
        assert_eq!(session.view(), before);
    }

    #[test]
    fn future_tag_is_ignored_too() {
        let (mut session, _) = pomodoro(2);
        let before = session.view();
        assert!(session.on_tick(Generation::new(99)).is_empty());
        assert_eq!(session.view(), before);
    }

    #[test]
    fn generation_strictly_increases() {
        let (mut session, _) = pomodoro(5);
        let mut seen = vec![session.generation()];

        for i in 0..8 {
            if i % 2 == 0 {
                session.on_skip();
            } else {
                let remaining = session.remaining().as_secs() as usize;
                run_ticks(&mut session, remaining);
            }
            seen.push(session.generation());
        }

        assert!(seen.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn pause_and_adjust_keep_generation() {
        let (mut session, _) = pomodoro(2);
        let g = session.generation();
        session.on_toggle_pause();
        session.on_extend();
        session.on_shrink();
        session.on_toggle_pause();
        assert_eq!(session.generation(), g);
    }

    #[test]
    fn pause_freezes_time() {
        let (mut session, _) = pomodoro(2);
        run_ticks(&mut session, 5);
        let stale = Generation::new(0);
        session.on_toggle_pause();
        let frozen = session.remaining();

        for _ in 0..20 {
            assert!(session.on_tick(session.generation()).is_empty());
            assert!(session.on_tick(stale).is_empty());
        }
        assert_eq!(session.remaining(), frozen);
        assert_eq!(session.run_state(), RunState::Paused);
    }

    #[test]
    fn resume_rearms_after_in_flight_tick_was_consumed() {
        let (mut session, _) = pomodoro(2);
        assert!(session.on_toggle_pause().is_empty());
        // the tick armed before the pause lands while paused
        assert!(session.on_tick(session.generation()).is_empty());

        let effects = session.on_toggle_pause();
        assert_eq!(session.run_state(), RunState::Running);
        assert_eq!(effects, vec![Effect::ArmTick(session.generation())]);
    }

    #[test]
    fn quick_resume_does_not_double_arm() {
        let (mut session, _) = pomodoro(2);
        session.on_toggle_pause();
        // resumed before the pending tick arrived
        assert!(session.on_toggle_pause().is_empty());

        let effects = session.on_tick(session.generation());
        assert_eq!(effects, vec![Effect::ArmTick(session.generation())]);
        assert_eq!(session.remaining(), mins(25) - Duration::from_secs(1));
    }

    #[test]
    fn skip_while_paused_auto_resumes() {
        let (mut session, _) = pomodoro(2);
        run_ticks(&mut session, 100);
        session.on_toggle_pause();
        let pending = session.generation();

        let effects = session.on_skip();
        assert_eq!(session.phase(), Phase::Break);
        assert_eq!(session.run_state(), RunState::Running);
        assert_eq!(session.remaining(), mins(5));
        assert_eq!(
            effects,
            vec![
                Effect::Sound,
                Effect::Notify(Alert::WorkFinished),
                Effect::ArmTick(session.generation()),
            ]
        );

        let before = session.view();
        assert!(session.on_tick(pending).is_empty());
        assert_eq!(session.view(), before);
    }

    #[test]
    fn extend_adds_a_minute() {
        let (mut session, _) = pomodoro(1);
        assert!(session.on_extend().is_empty());
        assert_eq!(session.remaining(), mins(26));
    }

    #[test]
    fn shrink_floors_at_one_minute() {
        let plan = SessionPlan::new(Duration::from_secs(150), mins(5), 1);
        let (mut session, _) = TimerSession::start(plan);

        session.on_shrink();
        assert_eq!(session.remaining(), Duration::from_secs(90));
        session.on_shrink();
        assert_eq!(session.remaining(), mins(1));
        session.on_shrink();
        assert_eq!(session.remaining(), mins(1));
    }

    #[test]
    fn shrink_below_a_minute_is_a_no_op() {
        let plan = SessionPlan::new(Duration::from_secs(30), mins(5), 1);
        let (mut session, _) = TimerSession::start(plan);
        session.on_shrink();
        assert_eq!(session.remaining(), Duration::from_secs(30));
    }

    #[test]
    fn shrink_never_goes_below_floor_from_any_value() {
        for secs in [61, 90, 119, 120, 121, 3600] {
            let plan = SessionPlan::new(Duration::from_secs(secs), mins(5), 1);
            let (mut session, _) = TimerSession::start(plan);
            for _ in 0..100 {
                session.on_shrink();
                assert!(session.remaining() >= mins(1));
            }
        }
    }

    #[test]
    fn adjusted_time_keeps_counting_with_same_tick() {
        let (mut session, _) = pomodoro(1);
        let g = session.generation();
        session.on_extend();
        let effects = session.on_tick(g);
        assert_eq!(session.remaining(), mins(26) - Duration::from_secs(1));
        assert_eq!(effects, vec![Effect::ArmTick(g)]);
    }

    #[test]
    fn view_reflects_state() {
        let (mut session, _) = pomodoro(4);
        session.on_toggle_pause();
        assert_eq!(
            session.view(),
            TimerView {
                phase: Phase::Work,
                run_state: RunState::Paused,
                remaining: mins(25),
                session_index: 1,
                session_total: 4,
            }
        );
    }

    #[test]
    fn phase_display_names() {
        assert_eq!(Phase::Work.to_string(), "Work");
        assert_eq!(RunState::Paused.to_string(), "Paused");
    }
}
