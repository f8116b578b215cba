use std::{
    io::{self, stdin},
    path::PathBuf,
    process,
};

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use tracing::{info, warn};

use pomotui::{
    app::{App, Flow},
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    error::AppError,
    logging,
    notify::DesktopNotifier,
    runtime::{CrosstermEventSource, Runner, POLL_INTERVAL},
    setup::SetupInput,
    tick::ThreadTickScheduler,
};

/// pomodoro countdown timer for the terminal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    allow_negative_numbers = true,
    long_about = "Alternates work and break phases for a number of sessions, with a big countdown, pause, skip and +/- one minute adjustments. Without arguments an interactive setup form is shown."
)]
pub struct Cli {
    /// work length, e.g. 25, 30s, 1h30m (bare numbers are minutes)
    work: Option<String>,

    /// break length, e.g. 5, 5m, 90s
    #[clap(value_name = "BREAK")]
    brk: Option<String>,

    /// number of work sessions before the timer exits
    sessions: Option<String>,

    /// path to the config file
    #[clap(short = 'c', long)]
    config: Option<PathBuf>,

    /// disable the alert sound
    #[clap(long)]
    silent: bool,

    /// disable desktop notifications
    #[clap(long)]
    no_notify: bool,
}

impl Cli {
    /// Startup values that skip the setup form, present only when a work
    /// length was given.
    fn startup_input(&self) -> Option<SetupInput> {
        let work = self.work.clone().filter(|w| !w.trim().is_empty())?;
        Some(SetupInput {
            work,
            brk: self.brk.clone().unwrap_or_default(),
            sessions: self.sessions.clone().unwrap_or_default(),
        })
    }

    fn config_store(&self) -> FileConfigStore {
        self.config
            .as_ref()
            .map(FileConfigStore::with_path)
            .unwrap_or_default()
    }

    fn notifier(&self, config: &Config) -> DesktopNotifier {
        DesktopNotifier::new(
            config.sound && !self.silent,
            config.notifications && !self.no_notify,
        )
    }
}

fn main() {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    if let Some(log_path) = AppDirs::log_path() {
        logging::init(&log_path);
    }

    let store = cli.config_store();
    let config = store.load_or_create().unwrap_or_else(|err| {
        warn!(%err, path = ?store.path(), "could not write default config");
        store.load()
    });

    if let Err(err) = run(&cli, config) {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

fn run(cli: &Cli, config: Config) -> Result<(), AppError> {
    enable_raw_mode()?;

    let result = Terminal::new(CrosstermBackend::new(io::stdout()))
        .map_err(AppError::from)
        .and_then(|mut terminal| {
            execute!(terminal.backend_mut(), EnterAlternateScreen)?;
            let outcome = start_tui(&mut terminal, cli, config);
            execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
            terminal.show_cursor()?;
            outcome
        });

    disable_raw_mode()?;

    let mut app = result?;
    app.finish_alerts();
    Ok(())
}

type TuiApp = App<ThreadTickScheduler, DesktopNotifier>;

fn start_tui<B: Backend>(
    terminal: &mut Terminal<B>,
    cli: &Cli,
    config: Config,
) -> Result<TuiApp, AppError> {
    let (events, tx) = CrosstermEventSource::new();
    let runner = Runner::new(events, POLL_INTERVAL);
    let notifier = cli.notifier(&config);
    let mut app = App::new(config, ThreadTickScheduler::new(tx), notifier);

    if let Some(input) = cli.startup_input() {
        if app.start(&input) == Flow::Exit {
            return Ok(app);
        }
    }

    terminal.draw(|f| f.render_widget(&app.screen, f.area()))?;
    loop {
        let Some(event) = runner.step()? else {
            continue;
        };
        if app.handle_event(event) == Flow::Exit {
            break;
        }
        terminal.draw(|f| f.render_widget(&app.screen, f.area()))?;
    }

    info!("exiting");
    Ok(app)
}
