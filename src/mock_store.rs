//! An in-memory [`RemoteStore`], used to test the sync without any network

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::{Result, TrackerError};
use crate::item::VersionTag;
use crate::mock_behaviour::MockBehaviour;
use crate::traits::{RemoteDocument, RemoteStore};


/// A versioned file store that lives in memory.
///
/// Like a git repository, it rejects pushes that are not based on the current version of a file.
#[derive(Clone, Debug, Default)]
pub struct MockStore {
    /// (path, branch) => document
    files: HashMap<(String, String), RemoteDocument>,

    mock_behaviour: Option<Arc<Mutex<MockBehaviour>>>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make this store fail according to `behaviour`
    pub fn set_mock_behaviour(&mut self, behaviour: Option<Arc<Mutex<MockBehaviour>>>) {
        self.mock_behaviour = behaviour;
    }

    /// The current content of a file, if any
    pub fn file(&self, path: &str, branch: &str) -> Option<&RemoteDocument> {
        self.files.get(&(path.to_string(), branch.to_string()))
    }

    /// Write a file as if someone else had committed it. Returns its new version
    pub fn external_edit(&mut self, path: &str, branch: &str, content: Vec<u8>) -> VersionTag {
        let version = VersionTag::random();
        log::debug!("External edit of {} on {} (now at {})", path, branch, version);
        self.files.insert((path.to_string(), branch.to_string()), RemoteDocument{ content, version: version.clone() });
        version
    }

    fn check<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce(&mut MockBehaviour) -> Result<()>,
    {
        match &self.mock_behaviour {
            None => Ok(()),
            Some(behaviour) => {
                let mut behaviour = behaviour.lock()
                    .map_err(|_| TrackerError::Transport("Mock behaviour is poisoned".to_string()))?;
                f(&mut behaviour)
            },
        }
    }
}

#[async_trait]
impl RemoteStore for MockStore {
    async fn fetch(&mut self, path: &str, branch: &str) -> Result<Option<RemoteDocument>> {
        self.check(|b| b.can_fetch())?;
        Ok(self.file(path, branch).cloned())
    }

    async fn push(&mut self, path: &str, branch: &str, content: Vec<u8>, known_version: Option<&VersionTag>) -> Result<VersionTag> {
        self.check(|b| b.can_push())?;

        let current = self.file(path, branch).map(|doc| &doc.version);
        if current != known_version {
            return Err(TrackerError::Transport(format!(
                "{} on {} is at version {:?}, but the push is based on {:?}", path, branch, current, known_version)));
        }

        let version = VersionTag::random();
        self.files.insert((path.to_string(), branch.to_string()), RemoteDocument{ content, version: version.clone() });
        Ok(version)
    }
}
