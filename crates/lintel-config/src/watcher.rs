//! Configuration file watching.
//!
//! [`FileWatcher`] turns `notify` events into debounced
//! [`FileChangeEvent`]s on a tokio channel. Editors often emit several
//! events per save; changes to the same path inside the debounce window are
//! reported once.
//!
//! # Example
//!
//! ```no_run
//! use lintel_config::FileWatcher;
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), lintel_config::ConfigError> {
//! let mut watcher = FileWatcher::builder()
//!     .with_debounce(Duration::from_millis(500))
//!     .watch_path("lintel.toml")?
//!     .watch_extensions(&["toml", "json"])
//!     .build()?;
//!
//! while let Some(event) = watcher.next().await {
//!     println!("{} changed", event.path.display());
//! }
//! # Ok(())
//! # }
//! ```

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::ConfigError;

const CHANNEL_CAPACITY: usize = 64;

/// A debounced change to a watched file.
#[derive(Debug, Clone)]
pub struct FileChangeEvent {
    /// Path of the changed file.
    pub path: PathBuf,
    /// Kind of change.
    pub kind: FileChangeKind,
    /// When the change was observed.
    pub timestamp: Instant,
}

/// Kind of file change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileChangeKind {
    /// File was created.
    Created,
    /// File was modified.
    Modified,
    /// File was deleted.
    Deleted,
}

impl FileChangeKind {
    fn from_event(kind: &EventKind) -> Option<Self> {
        match kind {
            EventKind::Create(_) => Some(Self::Created),
            EventKind::Modify(_) => Some(Self::Modified),
            EventKind::Remove(_) => Some(Self::Deleted),
            EventKind::Access(_) | EventKind::Any | EventKind::Other => None,
        }
    }
}

/// Settings of a [`FileWatcher`].
#[derive(Debug, Clone)]
pub struct FileWatcherConfig {
    /// Files or directories to watch.
    pub paths: Vec<PathBuf>,
    /// Debounce window per path.
    pub debounce: Duration,
    /// Watch directories recursively.
    pub recursive: bool,
    /// Extensions to report; empty reports every file.
    pub extensions: HashSet<String>,
}

impl Default for FileWatcherConfig {
    fn default() -> Self {
        Self {
            paths: Vec::new(),
            debounce: Duration::from_millis(500),
            recursive: false,
            extensions: HashSet::new(),
        }
    }
}

/// Builder for [`FileWatcher`].
#[derive(Debug, Default)]
pub struct FileWatcherBuilder {
    config: FileWatcherConfig,
}

impl FileWatcherBuilder {
    /// Create a builder with a 500ms debounce.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the debounce window.
    #[must_use]
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.config.debounce = debounce;
        self
    }

    /// Watch a file or directory.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::FileNotFound` if the path does not exist.
    pub fn watch_path<P: AsRef<Path>>(mut self, path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::file_not_found(path));
        }
        self.config.paths.push(path.to_path_buf());
        Ok(self)
    }

    /// Watch a path if it exists.
    #[must_use]
    pub fn watch_path_optional<P: AsRef<Path>>(mut self, path: P) -> Self {
        let path = path.as_ref();
        if path.exists() {
            self.config.paths.push(path.to_path_buf());
        }
        self
    }

    /// Watch directories recursively.
    #[must_use]
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.config.recursive = recursive;
        self
    }

    /// Only report files with these extensions.
    #[must_use]
    pub fn watch_extensions(mut self, extensions: &[&str]) -> Self {
        self.config.extensions = extensions.iter().map(|s| (*s).to_string()).collect();
        self
    }

    /// Start watching.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Watch` if no path is configured or the platform
    /// watcher cannot be created.
    pub fn build(self) -> Result<FileWatcher, ConfigError> {
        if self.config.paths.is_empty() {
            return Err(ConfigError::watch("no paths configured"));
        }

        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);

        // Runs on notify's thread. A full channel drops the event; the
        // debounced consumer only needs one per burst.
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            if let Ok(event) = res {
                let _ = tx.try_send(event);
            }
        })
        .map_err(|e| ConfigError::watch(format!("failed to create watcher: {e}")))?;

        let mode = if self.config.recursive {
            RecursiveMode::Recursive
        } else {
            RecursiveMode::NonRecursive
        };

        for path in &self.config.paths {
            watcher
                .watch(path, mode)
                .map_err(|e| ConfigError::watch(format!("failed to watch {}: {e}", path.display())))?;
        }

        Ok(FileWatcher {
            _watcher: watcher,
            rx,
            config: self.config,
            last_seen: HashMap::new(),
        })
    }
}

/// Debounced watcher over configuration files.
pub struct FileWatcher {
    _watcher: RecommendedWatcher,
    rx: mpsc::Receiver<Event>,
    config: FileWatcherConfig,
    last_seen: HashMap<PathBuf, Instant>,
}

impl FileWatcher {
    /// Create a watcher builder.
    #[must_use]
    pub fn builder() -> FileWatcherBuilder {
        FileWatcherBuilder::new()
    }

    /// Returns the watched paths.
    #[must_use]
    pub fn paths(&self) -> &[PathBuf] {
        &self.config.paths
    }

    /// Waits for the next change that passes filtering and debouncing.
    ///
    /// Returns `None` once the underlying watcher has stopped.
    pub async fn next(&mut self) -> Option<FileChangeEvent> {
        while let Some(event) = self.rx.recv().await {
            if let Some(change) = self.accept(&event, Instant::now()) {
                return Some(change);
            }
        }
        None
    }

    /// Returns a pending change without waiting.
    pub fn try_next(&mut self) -> Option<FileChangeEvent> {
        while let Ok(event) = self.rx.try_recv() {
            if let Some(change) = self.accept(&event, Instant::now()) {
                return Some(change);
            }
        }
        None
    }

    fn accept(&mut self, event: &Event, now: Instant) -> Option<FileChangeEvent> {
        let kind = FileChangeKind::from_event(&event.kind)?;
        let path = event.paths.first()?;

        if !self.config.extensions.is_empty() {
            let ext = path.extension().and_then(|e| e.to_str())?;
            if !self.config.extensions.contains(ext) {
                return None;
            }
        }

        if let Some(last) = self.last_seen.get(path) {
            if now.duration_since(*last) < self.config.debounce {
                return None;
            }
        }
        self.last_seen.insert(path.clone(), now);

        Some(FileChangeEvent {
            path: path.clone(),
            kind,
            timestamp: now,
        })
    }
}

impl std::fmt::Debug for FileWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileWatcher")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
