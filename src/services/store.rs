use crate::models::LabeledExample;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default corpus capacity
pub const DEFAULT_MAX_EXAMPLES: usize = 1_000_000;

/// Errors that can occur while persisting the corpus
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// What an upsert did to the stored corpus
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// New title added at the front, possibly pushing the oldest one out
    Inserted { evicted: Option<LabeledExample> },
    /// Existing title whose label flipped
    Updated,
    /// Existing title with the same label
    Unchanged,
}

/// Ordered, newest-first collection of labeled examples
///
/// Titles are unique by exact string equality. After `upsert` returns `Ok`
/// the change is visible to the next `load_all`, including after a restart
/// for durable implementations.
pub trait TrainingStore: Send + Sync {
    /// Current corpus, newest first
    fn examples(&self) -> &[LabeledExample];

    fn upsert(&mut self, example: LabeledExample) -> Result<UpsertOutcome, StoreError>;

    fn load_all(&self) -> Vec<LabeledExample> {
        self.examples().to_vec()
    }

    fn len(&self) -> usize {
        self.examples().len()
    }

    fn is_empty(&self) -> bool {
        self.examples().is_empty()
    }
}

/// Apply an upsert to `examples` in place
fn apply_upsert(
    examples: &mut Vec<LabeledExample>,
    example: LabeledExample,
    max_examples: usize,
) -> UpsertOutcome {
    if let Some(existing) = examples.iter_mut().find(|e| e.title == example.title) {
        if existing.liked == example.liked {
            return UpsertOutcome::Unchanged;
        }
        existing.liked = example.liked;
        return UpsertOutcome::Updated;
    }

    examples.insert(0, example);
    let evicted = if examples.len() > max_examples {
        examples.pop()
    } else {
        None
    };

    UpsertOutcome::Inserted { evicted }
}

/// Corpus persisted as a pretty-printed JSON array in a single file
///
/// Every mutation rewrites the whole snapshot through a temp file and a
/// rename, and the in-memory copy only changes once that write succeeded.
pub struct JsonFileStore {
    path: PathBuf,
    max_examples: usize,
    examples: Vec<LabeledExample>,
}

impl JsonFileStore {
    /// Open the snapshot at `path`
    ///
    /// A missing or unreadable file yields an empty corpus. Snapshots longer
    /// than `max_examples` keep only the newest entries.
    pub fn open<P: AsRef<Path>>(path: P, max_examples: usize) -> Self {
        let path = path.as_ref().to_path_buf();
        let max_examples = max_examples.max(1);

        let mut examples = match Self::read_snapshot(&path) {
            Ok(examples) => examples,
            Err(StoreError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No training snapshot at {}, starting empty", path.display());
                Vec::new()
            }
            Err(e) => {
                tracing::warn!("Failed to read training snapshot {}: {}", path.display(), e);
                Vec::new()
            }
        };
        examples.truncate(max_examples);

        tracing::debug!("Loaded {} examples from {}", examples.len(), path.display());

        Self {
            path,
            max_examples,
            examples,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_snapshot(path: &Path) -> Result<Vec<LabeledExample>, StoreError> {
        let data = fs::read(path)?;
        Ok(serde_json::from_slice(&data)?)
    }

    fn tmp_path(&self) -> PathBuf {
        let mut tmp_name = self.path.as_os_str().to_os_string();
        tmp_name.push(".tmp");
        PathBuf::from(tmp_name)
    }

    fn persist(&self, examples: &[LabeledExample]) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(examples)?;
        let tmp_path = self.tmp_path();

        if let Err(e) = Self::replace_with(&tmp_path, &self.path, &json) {
            if let Err(cleanup) = fs::remove_file(&tmp_path) {
                if cleanup.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!("Failed to remove {}: {}", tmp_path.display(), cleanup);
                }
            }
            return Err(e.into());
        }

        Ok(())
    }

    /// Write `data` to `tmp_path`, fsync it, rename it over `path`, then
    /// fsync the parent directory so the rename itself is durable
    ///
    /// Once the rename succeeded the new snapshot is what the next load sees,
    /// so a failing directory fsync is logged rather than returned.
    fn replace_with(tmp_path: &Path, path: &Path, data: &[u8]) -> std::io::Result<()> {
        let mut file = File::create(tmp_path)?;
        file.write_all(data)?;
        file.sync_all()?;
        drop(file);

        fs::rename(tmp_path, path)?;

        #[cfg(unix)]
        {
            let parent = match path.parent() {
                Some(dir) if !dir.as_os_str().is_empty() => dir,
                _ => Path::new("."),
            };
            if let Err(e) = File::open(parent).and_then(|dir| dir.sync_all()) {
                tracing::warn!("Failed to sync directory {}: {}", parent.display(), e);
            }
        }

        Ok(())
    }
}

impl TrainingStore for JsonFileStore {
    fn examples(&self) -> &[LabeledExample] {
        &self.examples
    }

    fn upsert(&mut self, example: LabeledExample) -> Result<UpsertOutcome, StoreError> {
        let mut next = self.examples.clone();
        let outcome = apply_upsert(&mut next, example, self.max_examples);

        if outcome != UpsertOutcome::Unchanged {
            self.persist(&next)?;
            self.examples = next;
        }

        Ok(outcome)
    }
}

/// Non-durable store kept entirely in memory
#[derive(Debug, Clone)]
pub struct MemoryStore {
    max_examples: usize,
    examples: Vec<LabeledExample>,
}

impl MemoryStore {
    pub fn new(max_examples: usize) -> Self {
        Self {
            max_examples: max_examples.max(1),
            examples: Vec::new(),
        }
    }

    /// Seed with an existing newest-first corpus
    pub fn with_examples(mut examples: Vec<LabeledExample>, max_examples: usize) -> Self {
        let max_examples = max_examples.max(1);
        examples.truncate(max_examples);
        Self {
            max_examples,
            examples,
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_EXAMPLES)
    }
}

impl TrainingStore for MemoryStore {
    fn examples(&self) -> &[LabeledExample] {
        &self.examples
    }

    fn upsert(&mut self, example: LabeledExample) -> Result<UpsertOutcome, StoreError> {
        Ok(apply_upsert(&mut self.examples, example, self.max_examples))
    }
}
