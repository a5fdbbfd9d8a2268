use tracing::debug;

use crate::gateway::FilesystemGateway;
use crate::input_buffer::directory_of;
use crate::mode::Mode;
use crate::ranker::{rank_fuzzy, rank_prefix};

pub const DEFAULT_FUZZY_MAX_DEPTH: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetrievalLimits {
    pub max_results: usize,
    pub fuzzy_max_depth: usize,
}

impl Default for RetrievalLimits {
    fn default() -> Self {
        Self {
            max_results: crate::ranker::DEFAULT_MAX_RESULTS,
            fuzzy_max_depth: DEFAULT_FUZZY_MAX_DEPTH,
        }
    }
}

/// Children of the directory part of `input`. Listing failures yield nothing.
pub fn list_directory(gateway: &dyn FilesystemGateway, input: &str) -> Vec<String> {
    let directory = directory_of(input);
    match gateway.list_children(directory) {
        Ok(children) => children,
        Err(error) => {
            debug!(directory, %error, "directory listing failed");
            Vec::new()
        }
    }
}

/// Unranked candidates for the current mode. In fuzzy mode the first
/// successful walk of the root is reused by every later call.
pub fn retrieve<'m>(
    gateway: &dyn FilesystemGateway,
    mode: &'m mut Mode,
    input: &str,
    limits: RetrievalLimits,
) -> Candidates<'m> {
    match mode {
        Mode::Normal => Candidates::Listing(list_directory(gateway, input)),
        Mode::Fuzzy(state) => {
            let walked = state.files_or_load(|root| {
                let files = gateway.walk(root, limits.fuzzy_max_depth);
                if let Ok(files) = &files {
                    debug!(root, files = files.len(), "fuzzy cache populated");
                }
                files
            });
            match walked {
                Ok(files) => Candidates::Cached(files),
                Err(error) => {
                    debug!(%error, "fuzzy walk failed");
                    Candidates::Cached(&[])
                }
            }
        }
    }
}

pub enum Candidates<'a> {
    Listing(Vec<String>),
    Cached(&'a [String]),
}

impl Candidates<'_> {
    pub fn len(&self) -> usize {
        match self {
            Self::Listing(children) => children.len(),
            Self::Cached(files) => files.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Retrieval, matching and ranking for one keystroke.
pub fn ranked_results(
    gateway: &dyn FilesystemGateway,
    mode: &mut Mode,
    input: &str,
    limits: RetrievalLimits,
) -> Vec<String> {
    let root = mode.fuzzy_root().unwrap_or_default().to_string();
    match retrieve(gateway, mode, input, limits) {
        Candidates::Listing(children) => rank_prefix(children, input, limits.max_results),
        Candidates::Cached(files) => rank_fuzzy(files, input, &root, limits.max_results),
    }
}
