use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use notify_rust::Notification;
use tracing::debug;

use crate::session::Alert;

const APP_NAME: &str = "pomotui";

/// How long completion alerts may hold up the exit
pub const ALERT_FLUSH_TIMEOUT: Duration = Duration::from_secs(3);

const FLUSH_POLL: Duration = Duration::from_millis(20);

#[cfg(target_os = "macos")]
const SOUND_COMMANDS: &[(&str, &str)] = &[
    ("afplay", "/System/Library/Sounds/Glass.aiff"),
    ("afplay", "/System/Library/Sounds/Ping.aiff"),
];

#[cfg(not(target_os = "macos"))]
const SOUND_COMMANDS: &[(&str, &str)] = &[
    ("paplay", "/usr/share/sounds/freedesktop/stereo/complete.oga"),
    ("paplay", "/usr/share/sounds/gnome/default/alerts/glass.ogg"),
    ("aplay", "/usr/share/sounds/alsa/Front_Left.wav"),
    ("aplay", "/usr/share/sounds/sound-icons/bell.wav"),
];

/// Boundary to the desktop: announcements are fire-and-forget and their
/// outcome never reaches the caller.
pub trait Notifier {
    fn notify(&mut self, title: &str, message: &str);
    fn alert_sound(&mut self);

    fn alert(&mut self, alert: Alert) {
        self.notify(alert.title(), alert.message());
    }

    /// Wait at most `timeout` for alerts that are still being delivered.
    fn flush(&mut self, _timeout: Duration) {}
}

/// System notifications plus a short sound, each on its own thread. The
/// threads are never waited on while the timer runs; `flush` lets the last
/// ones finish before the process exits.
#[derive(Debug)]
pub struct DesktopNotifier {
    sound: bool,
    popups: bool,
    pending: Vec<JoinHandle<()>>,
}

impl DesktopNotifier {
    pub fn new(sound: bool, popups: bool) -> Self {
        Self {
            sound,
            popups,
            pending: Vec::new(),
        }
    }

    fn spawn<F>(&mut self, f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.pending.retain(|handle| !handle.is_finished());
        self.pending.push(thread::spawn(f));
    }
}

impl Notifier for DesktopNotifier {
    fn notify(&mut self, title: &str, message: &str) {
        if !self.popups {
            return;
        }
        let title = title.to_owned();
        let message = message.to_owned();
        self.spawn(move || {
            if let Err(err) = Notification::new()
                .summary(&title)
                .body(&message)
                .appname(APP_NAME)
                .show()
            {
                debug!(%err, "desktop notification failed");
            }
        });
    }

    fn alert_sound(&mut self) {
        if !self.sound {
            return;
        }
        self.spawn(|| {
            if !play_first_available() {
                // terminal bell as the last resort
                let mut stdout = std::io::stdout();
                let _ = stdout.write_all(b"\x07").and_then(|_| stdout.flush());
            }
        });
    }

    fn flush(&mut self, timeout: Duration) {
        let unfinished = join_within(std::mem::take(&mut self.pending), timeout);
        if unfinished > 0 {
            debug!(unfinished, "alerts still running at exit");
        }
    }
}

/// Join every handle that finishes before the deadline, returning how many
/// were still running when it passed.
fn join_within(mut handles: Vec<JoinHandle<()>>, timeout: Duration) -> usize {
    let deadline = Instant::now() + timeout;
    loop {
        let (done, running): (Vec<_>, Vec<_>) =
            handles.into_iter().partition(|handle| handle.is_finished());
        for handle in done {
            let _ = handle.join();
        }
        handles = running;
        if handles.is_empty() || Instant::now() >= deadline {
            return handles.len();
        }
        thread::sleep(FLUSH_POLL);
    }
}

fn play_first_available() -> bool {
    for (cmd, sound_file) in SOUND_COMMANDS {
        if !Path::new(sound_file).exists() {
            continue;
        }
        match Command::new(cmd)
            .arg(sound_file)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
        {
            Ok(status) if status.success() => return true,
            Ok(status) => debug!(cmd, %status, "sound player exited unsuccessfully"),
            Err(err) => debug!(cmd, %err, "sound player unavailable"),
        }
    }
    false
}

/// Keeps every announcement in memory
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    pub notifications: Vec<(String, String)>,
    pub sounds: usize,
    pub flushes: usize,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<&str> {
        self.notifications.iter().map(|(_, m)| m.as_str()).collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&mut self, title: &str, message: &str) {
        self.notifications.push((title.to_owned(), message.to_owned()));
    }

    fn alert_sound(&mut self) {
        self.sounds += 1;
    }

    fn flush(&mut self, _timeout: Duration) {
        self.flushes += 1;
    }
}
