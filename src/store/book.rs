//! Namespaced durable key/value store.
//!
//! A `Book` is a named partition of the store: one JSON file per book under
//! the data directory, holding flat string→string pairs where every value is
//! itself JSON-encoded. Multiple books coexist without key collisions.
//!
//! Writes update the in-memory map synchronously, so a read that follows a
//! write in the same process always observes it. Durability is asynchronous:
//! a dedicated flusher thread snapshots the map and writes it out via a temp
//! file and an atomic rename. A flush failure is logged, never raised; the
//! store favors staying available over guaranteeing the last write hit disk.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::sync::{Arc, RwLock};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

struct Inner {
    name: String,
    path: PathBuf,
    entries: RwLock<HashMap<String, String>>,
}

/// A handle to one book. Cheap to clone; all clones share the same map and
/// flusher.
#[derive(Clone)]
pub struct Book {
    inner: Arc<Inner>,
    flush_tx: mpsc::Sender<()>,
}

impl Book {
    /// Open (or create) the book named `name` under `data_dir`.
    ///
    /// A missing file starts the book empty. An unreadable or corrupt file is
    /// logged and also starts the book empty rather than failing the caller.
    pub fn open(data_dir: &Path, name: &str) -> io::Result<Self> {
        fs::create_dir_all(data_dir)?;
        let path = data_dir.join(format!("{name}.json"));

        let entries = match fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<HashMap<String, String>>(&content) {
                Ok(map) => map,
                Err(e) => {
                    warn!(book = name, error = %e, "book file corrupt, starting empty");
                    HashMap::new()
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => {
                warn!(book = name, error = %e, "book file unreadable, starting empty");
                HashMap::new()
            }
        };

        let inner = Arc::new(Inner {
            name: name.to_string(),
            path,
            entries: RwLock::new(entries),
        });

        let (flush_tx, flush_rx) = mpsc::channel::<()>();
        let flusher_inner = Arc::clone(&inner);
        std::thread::Builder::new()
            .name(format!("book-flush-{name}"))
            .spawn(move || {
                // One flush per signal; pending signals coalesce naturally
                // because the snapshot always reflects the latest map.
                while flush_rx.recv().is_ok() {
                    while flush_rx.try_recv().is_ok() {}
                    if let Err(e) = persist(&flusher_inner) {
                        warn!(book = %flusher_inner.name, error = %e, "book flush failed");
                    }
                }
            })?;

        Ok(Self { inner, flush_tx })
    }

    /// Typed read with default-value fallback.
    ///
    /// Returns `default` when the key is absent or the stored value does not
    /// deserialize as `T`. Never errors to the caller.
    pub fn read<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        let entries = self.inner.entries.read().unwrap_or_else(|e| e.into_inner());
        match entries.get(key) {
            Some(raw) => match serde_json::from_str(raw) {
                Ok(value) => value,
                Err(e) => {
                    debug!(book = %self.inner.name, key, error = %e, "stored value unusable, using default");
                    default
                }
            },
            None => default,
        }
    }

    /// Write a single value. Serialization failure is logged and dropped.
    pub fn write<T: Serialize>(&self, key: &str, value: &T) {
        match serde_json::to_string(value) {
            Ok(raw) => {
                let mut entries = self.inner.entries.write().unwrap_or_else(|e| e.into_inner());
                entries.insert(key.to_string(), raw);
                drop(entries);
                self.schedule_flush();
            }
            Err(e) => warn!(book = %self.inner.name, key, error = %e, "value not serializable, dropped"),
        }
    }

    /// Start a batch of writes applied under a single lock acquisition.
    pub fn batch(&self) -> Batch<'_> {
        Batch {
            book: self,
            pending: Vec::new(),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        let entries = self.inner.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.contains_key(key)
    }

    /// Remove every key in this book.
    pub fn clear(&self) {
        let mut entries = self.inner.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.clear();
        drop(entries);
        self.schedule_flush();
    }

    /// Synchronous flush, for shutdown paths and tests. Normal writes rely
    /// on the background flusher instead.
    pub fn flush_blocking(&self) -> io::Result<()> {
        persist(&self.inner)
    }

    fn schedule_flush(&self) {
        // The receiver only disconnects when every handle is gone, so a send
        // failure here is unreachable in practice; ignore it either way.
        let _ = self.flush_tx.send(());
    }
}

/// Pending writes applied together. Dropped without `commit`, nothing is
/// written.
pub struct Batch<'a> {
    book: &'a Book,
    pending: Vec<(String, String)>,
}

impl Batch<'_> {
    pub fn put<T: Serialize>(&mut self, key: &str, value: &T) -> &mut Self {
        match serde_json::to_string(value) {
            Ok(raw) => self.pending.push((key.to_string(), raw)),
            Err(e) => warn!(key, error = %e, "batch value not serializable, dropped"),
        }
        self
    }

    pub fn commit(self) {
        let mut entries = self
            .book
            .inner
            .entries
            .write()
            .unwrap_or_else(|e| e.into_inner());
        for (key, raw) in self.pending {
            entries.insert(key, raw);
        }
        drop(entries);
        self.book.schedule_flush();
    }
}

fn persist(inner: &Inner) -> io::Result<()> {
    let snapshot = {
        let entries = inner.entries.read().unwrap_or_else(|e| e.into_inner());
        serde_json::to_string_pretty(&*entries).map_err(io::Error::other)?
    };
    let tmp = inner.path.with_extension("json.tmp");
    fs::write(&tmp, snapshot)?;
    fs::rename(&tmp, &inner.path)?;
    debug!(book = %inner.name, path = %inner.path.display(), "book flushed");
    Ok(())
}
