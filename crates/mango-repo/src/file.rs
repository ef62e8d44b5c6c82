//! JSON-file-backed executor.

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, ErrorKind as IoErrorKind, Write};
use std::path::{Path, PathBuf};

use fs4::FileExt;
use mango_types::Address;
use tempfile::NamedTempFile;
use tracing::{debug, trace};

use crate::error::{RepoError, RepoResult};
use crate::executor::{Executor, ExecutorState};
use crate::instance::RepositoryInstance;
use crate::operation::{CommitReceipt, Operation};

/// [`Executor`] that keeps the committed state in a single JSON file.
///
/// Each submit takes an exclusive advisory lock on `<state>.lock`, reloads
/// the file, applies the operation and, only if it commits, replaces the
/// file atomically (temp file in the same directory, then rename) before
/// releasing the lock. Writers in any number of processes sharing the file
/// are therefore applied one at a time against the latest commit. Readers
/// take no lock and never see a half-written state.
#[derive(Debug)]
pub struct FileExecutor {
    path: PathBuf,
    lock_path: PathBuf,
}

impl FileExecutor {
    /// Open the state file at `path`. A missing file is an empty registry.
    ///
    /// An existing file must parse; a corrupt file is reported here rather
    /// than on first use.
    pub fn open(path: impl Into<PathBuf>) -> RepoResult<Self> {
        let path = path.into();
        let mut lock_path = path.clone().into_os_string();
        lock_path.push(".lock");
        let executor = Self {
            path,
            lock_path: PathBuf::from(lock_path),
        };
        if let Some(parent) = executor.parent_dir() {
            fs::create_dir_all(parent)?;
        }
        executor.load()?;
        Ok(executor)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the committed state from disk.
    pub fn load(&self) -> RepoResult<ExecutorState> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.kind() == IoErrorKind::NotFound => Ok(ExecutorState::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, state: &ExecutorState) -> RepoResult<()> {
        let dir = self.parent_dir().unwrap_or_else(|| Path::new("."));
        let tmp = NamedTempFile::new_in(dir)?;
        {
            let mut writer = BufWriter::new(tmp.as_file());
            serde_json::to_writer_pretty(&mut writer, state)?;
            writer.flush()?;
        }
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| RepoError::Io(e.error))?;
        debug!(path = %self.path.display(), seq = state.last_seq(), "state file written");
        Ok(())
    }

    /// Block until this process holds the writer lock. Dropping the
    /// returned file releases it.
    fn acquire_lock(&self) -> RepoResult<File> {
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(true)
            .open(&self.lock_path)?;
        file.lock_exclusive()?;
        trace!(lock = %self.lock_path.display(), "writer lock acquired");
        Ok(file)
    }

    fn parent_dir(&self) -> Option<&Path> {
        self.path.parent().filter(|p| !p.as_os_str().is_empty())
    }
}

impl Executor for FileExecutor {
    fn submit(&self, caller: &Address, op: Operation) -> RepoResult<CommitReceipt> {
        let _lock = self.acquire_lock()?;
        let mut state = self.load()?;
        let receipt = state.apply(caller, &op)?;
        self.save(&state)?;
        Ok(receipt)
    }

    fn state(&self, repo: &Address) -> RepoResult<RepositoryInstance> {
        self.load()?.repository(repo).cloned()
    }

    fn repositories(&self) -> RepoResult<Vec<Address>> {
        Ok(self.load()?.addresses().copied().collect())
    }
}
