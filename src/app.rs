use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::info;

use crate::config::Config;
use crate::notify::{Notifier, ALERT_FLUSH_TIMEOUT};
use crate::runtime::AppEvent;
use crate::setup::{SetupForm, SetupInput};
use crate::tick::TickScheduler;
use crate::timer::{Effect, TimerSession};

#[derive(Debug, Clone)]
pub enum Screen {
    Setup(SetupForm),
    Running(TimerSession),
}

/// Whether the event loop should keep going after an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Top-level state, mutated by exactly one event at a time
pub struct App<S: TickScheduler, N: Notifier> {
    pub screen: Screen,
    config: Config,
    scheduler: S,
    notifier: N,
}

impl<S: TickScheduler, N: Notifier> App<S, N> {
    pub fn new(config: Config, scheduler: S, notifier: N) -> Self {
        Self {
            screen: Screen::Setup(SetupForm::new()),
            config,
            scheduler,
            notifier,
        }
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn session(&self) -> Option<&TimerSession> {
        match &self.screen {
            Screen::Running(session) => Some(session),
            Screen::Setup(_) => None,
        }
    }

    /// Leave setup and begin counting down the first work phase.
    pub fn start(&mut self, input: &SetupInput) -> Flow {
        let plan = self.config.resolve(input);
        let (session, effects) = TimerSession::start(plan);
        self.screen = Screen::Running(session);
        self.dispatch(effects)
    }

    /// After a completed run, give the closing alerts a bounded chance to be
    /// delivered. An early quit leaves them behind.
    pub fn finish_alerts(&mut self) {
        if self.session().is_some_and(|session| session.is_finished()) {
            info!("waiting for completion alerts");
            self.notifier.flush(ALERT_FLUSH_TIMEOUT);
        }
    }

    pub fn handle_event(&mut self, event: AppEvent) -> Flow {
        match event {
            AppEvent::Resize => Flow::Continue,
            AppEvent::Tick(tag) => {
                let effects = match &mut self.screen {
                    Screen::Running(session) => session.on_tick(tag),
                    Screen::Setup(_) => vec![],
                };
                self.dispatch(effects)
            }
            AppEvent::Key(key) => self.handle_key(key),
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Flow {
        if is_quit(&key) {
            info!("quit requested");
            return Flow::Exit;
        }

        let effects = match &mut self.screen {
            Screen::Setup(form) => match setup_key(form, key) {
                Some(input) => return self.start(&input),
                None => vec![],
            },
            Screen::Running(session) => match key.code {
                KeyCode::Char(' ') => session.on_toggle_pause(),
                KeyCode::Char('s') => session.on_skip(),
                KeyCode::Up => session.on_extend(),
                KeyCode::Down => session.on_shrink(),
                _ => vec![],
            },
        };
        self.dispatch(effects)
    }

    fn dispatch(&mut self, effects: Vec<Effect>) -> Flow {
        let mut flow = Flow::Continue;
        for effect in effects {
            match effect {
                Effect::ArmTick(generation) => self.scheduler.arm(generation),
                Effect::Sound => self.notifier.alert_sound(),
                Effect::Notify(alert) => self.notifier.alert(alert),
                Effect::Exit => flow = Flow::Exit,
            }
        }
        flow
    }
}

fn is_quit(key: &KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        KeyCode::Char('q') | KeyCode::Esc => true,
        _ => false,
    }
}

fn setup_key(form: &mut SetupForm, key: KeyEvent) -> Option<SetupInput> {
    match key.code {
        KeyCode::Enter => return form.enter(),
        KeyCode::Tab | KeyCode::Down => form.focus_next(),
        KeyCode::BackTab | KeyCode::Up => form.focus_prev(),
        KeyCode::Backspace => form.backspace(),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => form.push_char(c),
        _ => {}
    }
    None
}
