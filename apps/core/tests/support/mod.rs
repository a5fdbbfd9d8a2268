#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

use fastfind_core::gateway::{FilesystemGateway, GatewayError, OpenWith};

#[derive(Default)]
pub struct FakeState {
    pub children: HashMap<String, Vec<String>>,
    pub walks: HashMap<String, Vec<String>>,
    pub existing: HashSet<String>,
    pub list_calls: usize,
    pub walk_calls: usize,
    pub created: Vec<String>,
    pub opened: Vec<(String, OpenWith)>,
    pub trashed: Vec<String>,
    pub fail_create: bool,
}

/// In-memory filesystem whose state stays observable after the gateway is
/// boxed into a finder.
#[derive(Clone, Default)]
pub struct FakeGateway {
    pub state: Rc<RefCell<FakeState>>,
}

impl FakeGateway {
    /// Registers `dir` with `names` as children; names ending in '/' are
    /// directories.
    pub fn with_dir(self, dir: &str, names: &[&str]) -> Self {
        {
            let mut state = self.state.borrow_mut();
            let children: Vec<String> = names.iter().map(|name| format!("{dir}{name}")).collect();
            state.existing.insert(dir.to_string());
            state.existing.extend(children.iter().cloned());
            state.children.insert(dir.to_string(), children);
        }
        self
    }

    pub fn with_walk(self, root: &str, relative: &[&str]) -> Self {
        {
            let mut state = self.state.borrow_mut();
            let files = relative.iter().map(|rel| format!("{root}{rel}")).collect();
            state.existing.insert(root.to_string());
            state.walks.insert(root.to_string(), files);
        }
        self
    }

    pub fn failing_creation(self) -> Self {
        self.state.borrow_mut().fail_create = true;
        self
    }

    pub fn list_calls(&self) -> usize {
        self.state.borrow().list_calls
    }

    pub fn walk_calls(&self) -> usize {
        self.state.borrow().walk_calls
    }

    pub fn boxed(&self) -> Box<dyn FilesystemGateway> {
        Box::new(self.clone())
    }
}

fn not_found(action: &'static str, path: &str) -> GatewayError {
    GatewayError::Io {
        action,
        path: PathBuf::from(path),
        source: std::io::Error::from(std::io::ErrorKind::NotFound),
    }
}

impl FilesystemGateway for FakeGateway {
    fn list_children(&self, dir: &str) -> Result<Vec<String>, GatewayError> {
        let mut state = self.state.borrow_mut();
        state.list_calls += 1;
        state
            .children
            .get(dir)
            .cloned()
            .ok_or_else(|| not_found("list", dir))
    }

    fn walk(&self, root: &str, _max_depth: usize) -> Result<Vec<String>, GatewayError> {
        let mut state = self.state.borrow_mut();
        state.walk_calls += 1;
        state
            .walks
            .get(root)
            .cloned()
            .ok_or_else(|| not_found("walk", root))
    }

    fn exists(&self, path: &str) -> bool {
        self.state.borrow().existing.contains(path)
    }

    fn create_file(&self, path: &str) -> Result<(), GatewayError> {
        let mut state = self.state.borrow_mut();
        if state.fail_create {
            return Err(GatewayError::Io {
                action: "create file",
                path: PathBuf::from(path),
                source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
            });
        }
        state.created.push(path.to_string());
        state.existing.insert(path.to_string());
        Ok(())
    }

    fn create_directory(&self, path: &str) -> Result<(), GatewayError> {
        let mut state = self.state.borrow_mut();
        if state.fail_create {
            return Err(GatewayError::Io {
                action: "create directory",
                path: PathBuf::from(path),
                source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
            });
        }
        state.created.push(path.to_string());
        state.existing.insert(path.to_string());
        Ok(())
    }

    fn move_to_trash(&self, path: &str) -> Result<(), GatewayError> {
        let mut state = self.state.borrow_mut();
        if !state.existing.remove(path) {
            return Err(not_found("trash", path));
        }
        state.trashed.push(path.to_string());
        Ok(())
    }

    fn open(&self, path: &str, with: OpenWith) -> Result<(), GatewayError> {
        self.state.borrow_mut().opened.push((path.to_string(), with));
        Ok(())
    }
}

pub fn unique_temp_dir(label: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before epoch")
        .as_nanos();
    std::env::temp_dir().join(format!("fastfind-{label}-{nanos}"))
}
