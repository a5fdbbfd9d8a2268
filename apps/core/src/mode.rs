use crate::input_buffer::directory_of;

/// Recursive file list captured for a fuzzy root. Once populated it is never
/// modified; leaving fuzzy mode drops it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FuzzyCache {
    Pending,
    Populated(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuzzyState {
    root: String,
    cache: FuzzyCache,
}

impl FuzzyState {
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            cache: FuzzyCache::Pending,
        }
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn cache(&self) -> &FuzzyCache {
        &self.cache
    }

    pub fn is_populated(&self) -> bool {
        matches!(self.cache, FuzzyCache::Populated(_))
    }

    /// Returns the cached files, running `load` until it first succeeds. A
    /// failed load leaves the cache pending so the next retrieval retries.
    pub fn files_or_load<F, E>(&mut self, load: F) -> Result<&[String], E>
    where
        F: FnOnce(&str) -> Result<Vec<String>, E>,
    {
        if let FuzzyCache::Pending = self.cache {
            self.cache = FuzzyCache::Populated(load(&self.root)?);
        }
        match &self.cache {
            FuzzyCache::Populated(files) => Ok(files.as_slice()),
            FuzzyCache::Pending => Ok(&[]),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Normal,
    Fuzzy(FuzzyState),
}

impl Mode {
    /// Fuzzy mode rooted at the directory part of `input`.
    pub fn fuzzy_from_input(input: &str) -> Self {
        Self::Fuzzy(FuzzyState::new(directory_of(input)))
    }

    pub fn is_fuzzy(&self) -> bool {
        matches!(self, Self::Fuzzy(_))
    }

    pub fn fuzzy_root(&self) -> Option<&str> {
        match self {
            Self::Normal => None,
            Self::Fuzzy(state) => Some(state.root()),
        }
    }

    /// Falls back to `Normal` when `input` no longer starts with the fuzzy
    /// root. Returns whether the mode changed.
    pub fn revert_if_root_lost(&mut self, input: &str) -> bool {
        let lost = match self {
            Self::Normal => false,
            Self::Fuzzy(state) => !input.starts_with(state.root()),
        };
        if lost {
            *self = Self::Normal;
        }
        lost
    }

    /// Bytes at the start of every result that are shared with the input:
    /// the fuzzy root, or the directory being listed.
    pub fn base_length(&self, input: &str) -> usize {
        match self {
            Self::Normal => directory_of(input).len(),
            Self::Fuzzy(state) => state.root().len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{FuzzyCache, FuzzyState, Mode};

    #[test]
    fn fuzzy_root_is_directory_of_input() {
        let mode = Mode::fuzzy_from_input("/home/user/src/ma");
        assert_eq!(mode.fuzzy_root(), Some("/home/user/src/"));
        assert!(mode.is_fuzzy());
    }

    #[test]
    fn cache_loads_once() {
        let mut state = FuzzyState::new("/r/");
        let mut calls = 0;
        let first = state
            .files_or_load(|root| {
                calls += 1;
                Ok::<_, ()>(vec![format!("{root}a")])
            })
            .unwrap()
            .to_vec();
        let second = state
            .files_or_load(|_| {
                calls += 1;
                Ok::<_, ()>(Vec::new())
            })
            .unwrap()
            .to_vec();
        assert_eq!(calls, 1);
        assert_eq!(first, vec!["/r/a".to_string()]);
        assert_eq!(second, first);
        assert_eq!(state.cache(), &FuzzyCache::Populated(first));
    }

    #[test]
    fn failed_load_stays_pending() {
        let mut state = FuzzyState::new("/r/");
        assert!(state.files_or_load(|_| Err("unreadable")).is_err());
        assert!(!state.is_populated());
        let files = state
            .files_or_load(|root| Ok::<_, &str>(vec![format!("{root}b")]))
            .unwrap();
        assert_eq!(files, ["/r/b".to_string()]);
    }

    #[test]
    fn reverts_when_root_is_no_longer_a_prefix() {
        let mut mode = Mode::fuzzy_from_input("/a/b/");
        assert!(!mode.revert_if_root_lost("/a/b/xyz"));
        assert!(mode.is_fuzzy());
        assert!(mode.revert_if_root_lost("/a/c"));
        assert_eq!(mode, Mode::Normal);
    }

    #[test]
    fn base_length_follows_mode() {
        assert_eq!(Mode::Normal.base_length("/usr/lo"), "/usr/".len());
        let fuzzy = Mode::fuzzy_from_input("/usr/");
        assert_eq!(fuzzy.base_length("/usr/local/bin"), "/usr/".len());
    }
}
