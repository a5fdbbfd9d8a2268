use tracing::info;

use crate::gateway::{FilesystemGateway, GatewayError, OpenWith};
use crate::input_buffer::{directory_of, SEPARATOR};
use crate::session::SessionAction;

#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error("empty path")]
    EmptyPath,
    #[error("refusing to trash '{0}'")]
    ProtectedPath(String),
    #[error("failed to create '{path}': {source}")]
    Create {
        path: String,
        #[source]
        source: GatewayError,
    },
    #[error("failed to open '{path}': {source}")]
    Open {
        path: String,
        #[source]
        source: GatewayError,
    },
    #[error("failed to trash '{path}': {source}")]
    Trash {
        path: String,
        #[source]
        source: GatewayError,
    },
}

/// Opens `path`, first creating it when it does not exist: a directory when
/// it ends in the separator, otherwise an empty file inside a (created)
/// parent directory.
pub fn submit_path(
    gateway: &dyn FilesystemGateway,
    path: &str,
    with: OpenWith,
) -> Result<(), ActionError> {
    let trimmed = path.trim_end();
    if trimmed.is_empty() {
        return Err(ActionError::EmptyPath);
    }

    if !gateway.exists(trimmed) {
        create_missing(gateway, trimmed)?;
    }

    gateway
        .open(trimmed, with)
        .map_err(|source| ActionError::Open {
            path: trimmed.to_string(),
            source,
        })?;
    info!(path = trimmed, ?with, "opened path");
    Ok(())
}

fn create_missing(gateway: &dyn FilesystemGateway, path: &str) -> Result<(), ActionError> {
    let create_error = |source| ActionError::Create {
        path: path.to_string(),
        source,
    };

    if path.ends_with(SEPARATOR) {
        gateway.create_directory(path).map_err(create_error)?;
        info!(path, "created directory");
        return Ok(());
    }

    let parent = directory_of(path);
    if parent != path && !parent.is_empty() && !gateway.exists(parent) {
        gateway.create_directory(parent).map_err(create_error)?;
    }
    gateway.create_file(path).map_err(create_error)?;
    info!(path, "created file");
    Ok(())
}

/// Carries out a session's closing action against the filesystem.
pub fn execute(gateway: &dyn FilesystemGateway, action: &SessionAction) -> Result<(), ActionError> {
    match action {
        SessionAction::Submit { path, with } => submit_path(gateway, path, *with),
        SessionAction::Trash { path } => trash_path(gateway, path),
        SessionAction::Cancel => Ok(()),
    }
}

pub fn trash_path(gateway: &dyn FilesystemGateway, path: &str) -> Result<(), ActionError> {
    let trimmed = path.trim_end();
    if trimmed.is_empty() {
        return Err(ActionError::EmptyPath);
    }
    if trimmed.chars().all(|c| c == SEPARATOR) {
        return Err(ActionError::ProtectedPath(trimmed.to_string()));
    }

    gateway
        .move_to_trash(trimmed)
        .map_err(|source| ActionError::Trash {
            path: trimmed.to_string(),
            source,
        })?;
    info!(path = trimmed, "moved to trash");
    Ok(())
}
