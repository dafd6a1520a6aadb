//! Byte buffer persistence for serialized data.
//!
//! The value model only produces and consumes JSON bytes; a [`ByteStore`]
//! decides where those bytes live. Nothing here locks: two writers racing on
//! the same key is the caller's problem.

use crate::{
    error::*,
    storable::{Retrievable, Storable},
    value::data::Value,
};
use std::{
    collections::HashMap,
    fs,
    io::ErrorKind,
    marker::PhantomData,
    path::{Path, PathBuf},
};

pub const DIRECTORY_VAR: &str = "SERIALIZABLE_DATA_DIR";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub directory: PathBuf,
    pub extension: Option<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

impl StoreConfig {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            extension: Some("json".to_owned()),
        }
    }

    /// `$SERIALIZABLE_DATA_DIR`, then `$HOME/Documents`, then the current
    /// directory.
    pub fn from_env() -> Self {
        let directory = std::env::var_os(DIRECTORY_VAR)
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join("Documents")))
            .unwrap_or_else(|| PathBuf::from("."));
        Self::new(directory)
    }

    pub fn with_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = directory.into();
        self
    }

    pub fn with_extension(mut self, extension: Option<&str>) -> Self {
        self.extension = extension.map(ToOwned::to_owned);
        self
    }
}

pub trait ByteStore {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>>;

    fn write(&mut self, key: &str, bytes: &[u8]) -> Result<()>;

    /// `true` when something was there to remove.
    fn remove(&mut self, key: &str) -> Result<bool>;
}

/// One file per key inside [`StoreConfig::directory`].
#[derive(Debug, Clone)]
pub struct FileStore {
    config: StoreConfig,
}

impl Default for FileStore {
    fn default() -> Self {
        Self::new(StoreConfig::default())
    }
}

impl FileStore {
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Keys are plain file names, anything that could escape the directory
    /// is rejected.
    pub fn path_for(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty()
            || key == "."
            || key == ".."
            || key.contains(['/', '\\'])
            || Path::new(key).is_absolute()
        {
            return Err(Error::Io(format!("invalid file name `{}`", key)));
        }
        Ok(match &self.config.extension {
            Some(extension) => self.config.directory.join(format!("{}.{}", key, extension)),
            None => self.config.directory.join(key),
        })
    }
}

impl ByteStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path_for(key)?;
        match fs::read(&path) {
            Ok(bytes) => {
                tracing::debug!(path = %path.display(), size = bytes.len(), "read stored data");
                Ok(Some(bytes))
            }
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    fn write(&mut self, key: &str, bytes: &[u8]) -> Result<()> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.config.directory)?;
        fs::write(&path, bytes)?;
        tracing::debug!(path = %path.display(), size = bytes.len(), "wrote stored data");
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<bool> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "removed stored data");
                Ok(true)
            }
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(false),
            Err(error) => Err(error.into()),
        }
    }
}

/// In-process key-value store, the shape of a preference store.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ByteStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, bytes: &[u8]) -> Result<()> {
        self.entries.insert(key.to_owned(), bytes.to_owned());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<bool> {
        Ok(self.entries.remove(key).is_some())
    }
}

impl Value {
    /// Writes this data as JSON under `key`. `Absent` has nothing to write
    /// and reports `false`.
    pub fn store<S>(&self, store: &mut S, key: &str) -> Result<bool>
    where
        S: ByteStore + ?Sized,
    {
        match self.to_json_bytes() {
            Some(bytes) => {
                store.write(key, &bytes)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Missing keys give `Absent`.
    pub fn load<S>(store: &S, key: &str) -> Result<Self>
    where
        S: ByteStore + ?Sized,
    {
        match store.read(key)? {
            Some(bytes) => Self::from_json_bytes(&bytes),
            None => Ok(Self::Absent),
        }
    }

    pub fn delete<S>(store: &mut S, key: &str) -> Result<bool>
    where
        S: ByteStore + ?Sized,
    {
        store.remove(key)
    }
}

/// A whole list of items kept as one JSON array under a single key.
///
/// Every change rewrites the full list. Items are told apart by the
/// `same` function given at construction.
pub struct ListStore<T> {
    key: String,
    same: fn(&T, &T) -> bool,
    _phantom: PhantomData<fn() -> T>,
}

impl<T> ListStore<T>
where
    T: Storable + Retrievable,
{
    pub fn new(key: impl Into<String>, same: fn(&T, &T) -> bool) -> Self {
        Self {
            key: key.into(),
            same,
            _phantom: PhantomData,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Entries that no longer parse as `T` are skipped.
    pub fn get_all<S>(&self, store: &S) -> Result<Vec<T>>
    where
        S: ByteStore + ?Sized,
    {
        let data = Value::load(store, &self.key)?;
        let items = match data.as_sequence() {
            Some(items) => items,
            None => return Ok(vec![]),
        };
        let result = items.iter().filter_map(T::from_data).collect::<Vec<_>>();
        if result.len() != items.len() {
            tracing::warn!(
                key = %self.key,
                skipped = items.len() - result.len(),
                "skipped stored entries that could not be retrieved"
            );
        }
        Ok(result)
    }

    pub fn get<S, F>(&self, store: &S, filter: F) -> Result<Option<T>>
    where
        S: ByteStore + ?Sized,
        F: Fn(&T) -> bool,
    {
        Ok(self.get_all(store)?.into_iter().find(|item| filter(item)))
    }

    /// Replaces the matching entry or appends a new one.
    pub fn save<S>(&self, store: &mut S, item: T) -> Result<()>
    where
        S: ByteStore + ?Sized,
    {
        let mut all = self.get_all(store)?;
        match all.iter().position(|other| (self.same)(&item, other)) {
            Some(index) => all[index] = item,
            None => all.push(item),
        }
        self.save_all(store, &all)
    }

    /// `false` when no entry matched.
    pub fn delete<S>(&self, store: &mut S, item: &T) -> Result<bool>
    where
        S: ByteStore + ?Sized,
    {
        let mut all = self.get_all(store)?;
        match all.iter().position(|other| (self.same)(item, other)) {
            Some(index) => {
                all.remove(index);
                self.save_all(store, &all)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn save_all<S>(&self, store: &mut S, items: &[T]) -> Result<()>
    where
        S: ByteStore + ?Sized,
    {
        tracing::debug!(key = %self.key, count = items.len(), "rewriting stored list");
        items.get_data().store(store, &self.key)?;
        Ok(())
    }
}
