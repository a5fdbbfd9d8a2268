use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;
use walkdir::{DirEntry, WalkDir};

use crate::input_buffer::SEPARATOR;

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("{action} '{}': {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("command '{command}' failed: {message}")]
    Command { command: String, message: String },
    #[error("{0} is not supported on this platform")]
    Unsupported(&'static str),
}

impl GatewayError {
    fn io(action: &'static str, path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            action,
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenWith {
    Default,
    Terminal,
}

/// Filesystem primitives the finder relies on. Paths are absolute strings and
/// directories returned by `list_children` carry a trailing separator.
pub trait FilesystemGateway {
    fn list_children(&self, dir: &str) -> Result<Vec<String>, GatewayError>;

    /// Files under `root` no deeper than `max_depth` levels, skipping hidden
    /// entries and the contents of opaque package directories.
    fn walk(&self, root: &str, max_depth: usize) -> Result<Vec<String>, GatewayError>;

    fn exists(&self, path: &str) -> bool;

    /// Directories are stored with a trailing separator, so check that form.
    fn is_directory(&self, path: &str) -> bool {
        if path.ends_with(SEPARATOR) {
            self.exists(path)
        } else {
            self.exists(&format!("{path}{SEPARATOR}"))
        }
    }

    fn create_file(&self, path: &str) -> Result<(), GatewayError>;
    /// Creates `path` and any missing parents.
    fn create_directory(&self, path: &str) -> Result<(), GatewayError>;
    fn move_to_trash(&self, path: &str) -> Result<(), GatewayError>;
    fn open(&self, path: &str, with: OpenWith) -> Result<(), GatewayError>;
}

pub const DEFAULT_PACKAGE_EXTENSIONS: [&str; 9] = [
    "app",
    "bundle",
    "framework",
    "kext",
    "plugin",
    "xcodeproj",
    "xcworkspace",
    "photoslibrary",
    "pkg",
];

pub struct LocalFilesystem {
    package_extensions: Vec<String>,
}

impl Default for LocalFilesystem {
    fn default() -> Self {
        Self::new(
            DEFAULT_PACKAGE_EXTENSIONS
                .iter()
                .map(|ext| (*ext).to_string())
                .collect(),
        )
    }
}

impl LocalFilesystem {
    pub fn new(package_extensions: Vec<String>) -> Self {
        Self {
            package_extensions: package_extensions
                .into_iter()
                .map(|ext| ext.trim_start_matches('.').to_ascii_lowercase())
                .filter(|ext| !ext.is_empty())
                .collect(),
        }
    }

    fn is_package_dir(&self, entry: &DirEntry) -> bool {
        if !entry.file_type().is_dir() {
            return false;
        }
        entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                self.package_extensions
                    .iter()
                    .any(|known| known.eq_ignore_ascii_case(ext))
            })
            .unwrap_or(false)
    }
}

impl FilesystemGateway for LocalFilesystem {
    fn list_children(&self, dir: &str) -> Result<Vec<String>, GatewayError> {
        let entries = fs::read_dir(dir).map_err(|e| GatewayError::io("list", dir, e))?;

        let mut children = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| GatewayError::io("list", dir, e))?;
            let path = entry.path();
            let mut text = path.to_string_lossy().into_owned();
            if path.is_dir() && !text.ends_with(SEPARATOR) {
                text.push(SEPARATOR);
            }
            children.push(text);
        }
        Ok(children)
    }

    fn walk(&self, root: &str, max_depth: usize) -> Result<Vec<String>, GatewayError> {
        if !Path::new(root).is_dir() {
            return Err(GatewayError::io(
                "walk",
                root,
                std::io::Error::new(std::io::ErrorKind::NotFound, "not a directory"),
            ));
        }

        let files = WalkDir::new(root)
            .min_depth(1)
            .max_depth(max_depth)
            .into_iter()
            .filter_entry(|entry| !is_hidden(entry) && !self.is_package_dir(entry))
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(error) => {
                    debug!(%error, "skipping unreadable entry during walk");
                    None
                }
            })
            .filter(|entry| !entry.file_type().is_dir())
            .map(|entry| entry.path().to_string_lossy().into_owned())
            .collect();
        Ok(files)
    }

    fn exists(&self, path: &str) -> bool {
        Path::new(path).exists()
    }

    fn is_directory(&self, path: &str) -> bool {
        Path::new(path).is_dir()
    }

    fn create_file(&self, path: &str) -> Result<(), GatewayError> {
        fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .map(|_| ())
            .map_err(|e| GatewayError::io("create file", path, e))
    }

    fn create_directory(&self, path: &str) -> Result<(), GatewayError> {
        fs::create_dir_all(path).map_err(|e| GatewayError::io("create directory", path, e))
    }

    fn move_to_trash(&self, path: &str) -> Result<(), GatewayError> {
        if !Path::new(path).exists() {
            return Err(GatewayError::io(
                "trash",
                path,
                std::io::Error::new(std::io::ErrorKind::NotFound, "path does not exist"),
            ));
        }
        let command = trash_command(path)?;
        run_command(command)
    }

    fn open(&self, path: &str, with: OpenWith) -> Result<(), GatewayError> {
        let command = open_command(path, with)?;
        match with {
            OpenWith::Default => run_command(command),
            OpenWith::Terminal => spawn_command(command),
        }
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .map(|name| name.starts_with('.'))
            .unwrap_or(false)
}

fn run_command(mut command: Command) -> Result<(), GatewayError> {
    let label = format!("{command:?}");
    debug!(command = %label, "running external command");
    let status = command.status().map_err(|e| GatewayError::Command {
        command: label.clone(),
        message: e.to_string(),
    })?;
    if !status.success() {
        return Err(GatewayError::Command {
            command: label,
            message: format!("exit status: {status}"),
        });
    }
    Ok(())
}

fn spawn_command(mut command: Command) -> Result<(), GatewayError> {
    let label = format!("{command:?}");
    debug!(command = %label, "spawning external command");
    command
        .spawn()
        .map(|_| ())
        .map_err(|e| GatewayError::Command {
            command: label,
            message: e.to_string(),
        })
}

#[cfg(target_os = "macos")]
fn open_command(path: &str, with: OpenWith) -> Result<Command, GatewayError> {
    let mut command = Command::new("open");
    if with == OpenWith::Terminal {
        command.arg("-a").arg("Terminal");
    }
    command.arg(path);
    Ok(command)
}

#[cfg(target_os = "windows")]
fn open_command(path: &str, with: OpenWith) -> Result<Command, GatewayError> {
    let mut command = Command::new("cmd");
    match with {
        OpenWith::Default => {
            command.arg("/C").arg("start").arg("").arg(path);
        }
        OpenWith::Terminal => {
            command
                .arg("/C")
                .arg("start")
                .arg("")
                .arg("/D")
                .arg(terminal_directory(path))
                .arg("cmd");
        }
    }
    Ok(command)
}

#[cfg(all(unix, not(target_os = "macos")))]
fn open_command(path: &str, with: OpenWith) -> Result<Command, GatewayError> {
    match with {
        OpenWith::Default => {
            let mut command = Command::new("xdg-open");
            command.arg(path);
            Ok(command)
        }
        OpenWith::Terminal => {
            let terminal =
                std::env::var("TERMINAL").unwrap_or_else(|_| "x-terminal-emulator".to_string());
            let mut command = Command::new(terminal);
            command.current_dir(terminal_directory(path));
            Ok(command)
        }
    }
}

#[cfg(not(any(unix, target_os = "windows")))]
fn open_command(_path: &str, _with: OpenWith) -> Result<Command, GatewayError> {
    Err(GatewayError::Unsupported("open"))
}

#[cfg_attr(target_os = "macos", allow(dead_code))]
fn terminal_directory(path: &str) -> PathBuf {
    let path = Path::new(path);
    if path.is_dir() {
        return path.to_path_buf();
    }
    path.parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("/"))
}

#[cfg(target_os = "macos")]
fn trash_command(path: &str) -> Result<Command, GatewayError> {
    let escaped = path.replace('\\', "\\\\").replace('"', "\\\"");
    let mut command = Command::new("osascript");
    command.arg("-e").arg(format!(
        "tell application \"Finder\" to delete POSIX file \"{escaped}\""
    ));
    Ok(command)
}

#[cfg(all(unix, not(target_os = "macos")))]
fn trash_command(path: &str) -> Result<Command, GatewayError> {
    let mut command = Command::new("gio");
    command.arg("trash").arg(path);
    Ok(command)
}

#[cfg(not(unix))]
fn trash_command(_path: &str) -> Result<Command, GatewayError> {
    Err(GatewayError::Unsupported("move to trash"))
}
