use std::any::Any;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};
use std::time::UNIX_EPOCH;

use tracing_subscriber::EnvFilter;

use crate::config::Config;

const LOG_FILE_NAME: &str = "fastfind.log";
const ARCHIVE_PREFIX: &str = "fastfind-";
const MAX_LOG_BYTES: u64 = 1_000_000;
const MAX_ARCHIVES: usize = 5;
pub const LOG_ENV_VAR: &str = "FASTFIND_LOG";

static SUBSCRIBER_INSTALLED: OnceLock<PathBuf> = OnceLock::new();
static PANIC_HOOK_INSTALLED: OnceLock<()> = OnceLock::new();

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("log file io: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid log filter: {0}")]
    Filter(#[from] tracing_subscriber::filter::ParseError),
    #[error("failed to install log subscriber: {0}")]
    Init(String),
}

pub fn logs_dir() -> PathBuf {
    crate::config::stable_app_data_dir().join("logs")
}

/// Routes `tracing` output to the log file under the app data dir.
pub fn init(cfg: &Config) -> Result<PathBuf, LoggingError> {
    init_in(&logs_dir(), &cfg.log_level)
}

/// Installs the file subscriber once per process; later calls return the
/// path chosen by the first. `FASTFIND_LOG` overrides `level`.
pub fn init_in(log_dir: &Path, level: &str) -> Result<PathBuf, LoggingError> {
    if let Some(path) = SUBSCRIBER_INSTALLED.get() {
        return Ok(path.clone());
    }

    fs::create_dir_all(log_dir)?;
    let log_path = log_dir.join(LOG_FILE_NAME);
    rotate_if_needed(&log_path, log_dir)?;

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    let filter = match EnvFilter::try_from_env(LOG_ENV_VAR) {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level)?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|error| LoggingError::Init(error.to_string()))?;

    let path = SUBSCRIBER_INSTALLED.get_or_init(|| log_path).clone();
    install_panic_hook();
    tracing::info!(path = %path.display(), "logging initialized");
    Ok(path)
}

fn unix_secs() -> u64 {
    UNIX_EPOCH.elapsed().map(|d| d.as_secs()).unwrap_or_default()
}

fn archive_name(stamp: u64) -> String {
    format!("{ARCHIVE_PREFIX}{stamp}.log")
}

fn archive_stamp(path: &Path) -> Option<u64> {
    path.file_name()?
        .to_str()?
        .strip_prefix(ARCHIVE_PREFIX)?
        .strip_suffix(".log")?
        .parse()
        .ok()
}

/// Moves an oversized log aside as `fastfind-<secs>.log` and returns where it
/// went. An archive from the same second is never overwritten.
fn rotate_if_needed(log_path: &Path, log_dir: &Path) -> std::io::Result<Option<PathBuf>> {
    match fs::metadata(log_path) {
        Ok(meta) if meta.len() >= MAX_LOG_BYTES => {}
        Ok(_) => return Ok(None),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err),
    }

    let mut stamp = unix_secs();
    while log_dir.join(archive_name(stamp)).exists() {
        stamp += 1;
    }
    let archived = log_dir.join(archive_name(stamp));
    fs::rename(log_path, &archived)?;
    prune_old_archives(log_dir)?;
    Ok(Some(archived))
}

/// Keeps the newest `MAX_ARCHIVES` archives by timestamp. Returns how many
/// were removed.
fn prune_old_archives(log_dir: &Path) -> std::io::Result<usize> {
    let mut archives: Vec<(u64, PathBuf)> = fs::read_dir(log_dir)?
        .filter_map(Result::ok)
        .filter_map(|entry| {
            let path = entry.path();
            archive_stamp(&path).map(|stamp| (stamp, path))
        })
        .collect();

    archives.sort_unstable_by_key(|(stamp, _)| *stamp);
    let excess = archives.len().saturating_sub(MAX_ARCHIVES);
    let removed = archives
        .drain(..excess)
        .filter(|(_, oldest)| fs::remove_file(oldest).is_ok())
        .count();
    Ok(removed)
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "non-string panic payload"
    }
}

fn install_panic_hook() {
    PANIC_HOOK_INSTALLED.get_or_init(|| {
        let prior = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let (file, line) = info
                .location()
                .map(|l| (l.file(), l.line()))
                .unwrap_or(("<unknown>", 0));
            let thread = std::thread::current();
            tracing::error!(
                thread = thread.name().unwrap_or("<unnamed>"),
                file,
                line,
                message = panic_message(info.payload()),
                "panic"
            );
            prior(info);
        }));
    });
}
