use std::io::Read;
use std::path::{Path, PathBuf};

use crate::config::{self, ConfigError};
use crate::finder::{Finder, FinderError, KeyOutcome};
use crate::gateway::LocalFilesystem;
use crate::input_buffer::SEPARATOR;
use crate::keys::{parse_key_script, KeyEvent, KeyParseError};
use crate::logging;
use crate::presenter::{JsonPresenter, Presenter, TextPresenter};

pub const USAGE: &str = "usage: fastfind-core [--config PATH] [--start DIR] [--keys SCRIPT] [--json] [--write-default-config] [--help]

  --config PATH            read settings from PATH instead of the default location
  --start DIR              open the finder on DIR (default: home directory)
  --keys SCRIPT            key script to replay, e.g. 'src/<Ctrl+F>mc<Down><Enter>';
                           read from stdin when omitted
  --json                   emit one JSON event per line instead of text frames
  --write-default-config   write the effective config to disk and exit";

#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("key script error: {0}")]
    Keys(#[from] KeyParseError),
    #[error("finder error: {0}")]
    Finder(#[from] FinderError),
    #[error("start directory '{}': {source}", path.display())]
    Start {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOptions {
    pub config_path: Option<PathBuf>,
    pub start: Option<PathBuf>,
    pub keys: Option<String>,
    pub json: bool,
    pub write_default_config: bool,
    pub help: bool,
}

pub fn parse_cli_args(args: &[String]) -> Result<CliOptions, String> {
    let mut options = CliOptions::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => options.config_path = Some(PathBuf::from(value_for(&mut iter, arg)?)),
            "--start" => options.start = Some(PathBuf::from(value_for(&mut iter, arg)?)),
            "--keys" => options.keys = Some(value_for(&mut iter, arg)?.to_string()),
            "--json" => options.json = true,
            "--write-default-config" => options.write_default_config = true,
            "-h" | "--help" => options.help = true,
            other => return Err(format!("unknown argument '{other}'\n{USAGE}")),
        }
    }

    Ok(options)
}

fn value_for<'a>(
    iter: &mut impl Iterator<Item = &'a String>,
    flag: &str,
) -> Result<&'a str, String> {
    match iter.next() {
        Some(value) if !value.starts_with("--") => Ok(value.as_str()),
        _ => Err(format!("{flag} requires a value\n{USAGE}")),
    }
}

pub fn run_with_options(options: CliOptions) -> Result<(), RuntimeError> {
    if options.help {
        println!("{USAGE}");
        return Ok(());
    }

    let config = config::load(options.config_path.as_deref())?;
    if options.write_default_config || !config.config_path.exists() {
        config::save(&config)?;
        eprintln!(
            "[fastfind-core] wrote config to {}",
            config.config_path.display()
        );
        if options.write_default_config {
            return Ok(());
        }
    }

    if let Err(error) = logging::init(&config) {
        eprintln!("[fastfind-core] logging disabled: {error}");
    }
    tracing::info!(
        config_path = %config.config_path.display(),
        max_results = config.max_results,
        fuzzy_trigger = config.fuzzy_trigger.as_str(),
        "startup"
    );

    let start = options.start.as_deref().map(resolve_start).transpose()?;
    let script = match options.keys {
        Some(script) => script,
        None => read_stdin_script()?,
    };
    let events = parse_key_script(&script)?;

    let gateway = LocalFilesystem::new(config.package_extensions.clone());
    let mut finder = Finder::new(&config, Box::new(gateway))?;

    let stdout = std::io::stdout();
    let mut presenter: Box<dyn Presenter> = if options.json {
        Box::new(JsonPresenter::new(stdout.lock()))
    } else {
        Box::new(TextPresenter::new(stdout.lock()))
    };
    drive_session(&mut finder, start.as_deref(), &events, presenter.as_mut())?;
    Ok(())
}

/// Opens a session, replays `events`, and renders after every key. A session
/// still open when the events run out is closed as if cancelled.
pub fn drive_session(
    finder: &mut Finder,
    start: Option<&str>,
    events: &[KeyEvent],
    presenter: &mut dyn Presenter,
) -> Result<KeyOutcome, RuntimeError> {
    let frame = finder.open(start);
    presenter.render(&frame)?;

    for event in events {
        match finder.handle_key(event) {
            Ok(KeyOutcome::Continue) => {}
            Ok(KeyOutcome::Closed {
                input_text,
                return_focus,
            }) => {
                presenter.closed(&input_text, return_focus)?;
                return Ok(KeyOutcome::Closed {
                    input_text,
                    return_focus,
                });
            }
            Err(FinderError::Action(error)) => presenter.action_failed(&error.to_string())?,
            Err(error) => return Err(error.into()),
        }
        if let Some(frame) = finder.frame() {
            presenter.render(&frame)?;
        }
    }

    let input_text = finder.close().unwrap_or_default();
    presenter.closed(&input_text, true)?;
    Ok(KeyOutcome::Closed {
        input_text,
        return_focus: true,
    })
}

fn resolve_start(path: &Path) -> Result<String, RuntimeError> {
    let resolved = std::fs::canonicalize(path).map_err(|source| RuntimeError::Start {
        path: path.to_path_buf(),
        source,
    })?;
    let mut text = resolved.to_string_lossy().into_owned();
    if resolved.is_dir() && !text.ends_with(SEPARATOR) {
        text.push(SEPARATOR);
    }
    Ok(text)
}

fn read_stdin_script() -> Result<String, RuntimeError> {
    let mut raw = String::new();
    std::io::stdin().read_to_string(&mut raw)?;
    Ok(raw.lines().collect())
}
