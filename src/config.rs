use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::app_dirs::AppDirs;
use crate::duration_input::{parse_duration_input, parse_session_count, DEFAULT_SESSIONS};
use crate::session::SessionPlan;
use crate::setup::SetupInput;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub default_work_minutes: u64,
    pub default_break_minutes: u64,
    pub default_sessions: u32,
    pub sound: bool,
    pub notifications: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_work_minutes: 25,
            default_break_minutes: 5,
            default_sessions: DEFAULT_SESSIONS,
            sound: true,
            notifications: true,
        }
    }
}

impl Config {
    /// Turn raw setup text into a plan, falling back to the configured
    /// defaults wherever the text does not parse.
    pub fn resolve(&self, input: &SetupInput) -> SessionPlan {
        let fallback_sessions = if self.default_sessions > 0 {
            self.default_sessions
        } else {
            DEFAULT_SESSIONS
        };
        SessionPlan::new(
            parse_duration_input(&input.work, self.default_work_minutes.max(1)),
            parse_duration_input(&input.brk, self.default_break_minutes.max(1)),
            parse_session_count(&input.sessions, fallback_sessions),
        )
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            path: AppDirs::config_path(),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the config, writing the defaults out first if no file exists yet.
    pub fn load_or_create(&self) -> std::io::Result<Config> {
        if self.path.exists() {
            return Ok(self.load());
        }
        let cfg = Config::default();
        self.save(&cfg)?;
        Ok(cfg)
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        if let Ok(bytes) = fs::read(&self.path) {
            if let Ok(cfg) = serde_json::from_slice::<Config>(&bytes) {
                return cfg;
            }
        }
        Config::default()
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg).map_err(std::io::Error::other)?;
        fs::write(&self.path, data)
    }
}
