//! Where the save record lives: a file on native targets, localStorage in
//! the browser, or memory for tests and embedding.

use std::cell::RefCell;

use crate::config::Config;
use crate::error::SaveError;

/// A single durable slot holding the serialized save record.
pub trait SaveStore {
    /// Current contents, or None if nothing has been saved.
    fn read(&self) -> Result<Option<String>, SaveError>;

    /// Replace the contents.
    fn write(&self, contents: &str) -> Result<(), SaveError>;

    /// Delete the contents. Returns true if there was something to delete.
    fn remove(&self) -> Result<bool, SaveError>;
}

impl<S: SaveStore + ?Sized> SaveStore for Box<S> {
    fn read(&self) -> Result<Option<String>, SaveError> {
        (**self).read()
    }

    fn write(&self, contents: &str) -> Result<(), SaveError> {
        (**self).write(contents)
    }

    fn remove(&self) -> Result<bool, SaveError> {
        (**self).remove()
    }
}

/// The platform's default store for `config`.
pub fn default_store(config: &Config) -> Box<dyn SaveStore> {
    #[cfg(not(target_arch = "wasm32"))]
    {
        Box::new(FileStore::new(config.save_path.clone()))
    }
    #[cfg(target_arch = "wasm32")]
    {
        Box::new(LocalStorageStore::new(&config.storage_key))
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStore;

#[cfg(not(target_arch = "wasm32"))]
mod file {
    use std::fs;
    use std::io::ErrorKind;
    use std::path::{Path, PathBuf};

    use super::SaveStore;
    use crate::error::SaveError;

    /// Save record in a single JSON file.
    #[derive(Clone, Debug)]
    pub struct FileStore {
        path: PathBuf,
    }

    impl FileStore {
        pub fn new(path: impl Into<PathBuf>) -> Self {
            Self { path: path.into() }
        }

        pub fn path(&self) -> &Path {
            &self.path
        }

        fn tmp_path(&self) -> PathBuf {
            let mut name = self.path.as_os_str().to_owned();
            name.push(".tmp");
            PathBuf::from(name)
        }
    }

    impl SaveStore for FileStore {
        fn read(&self) -> Result<Option<String>, SaveError> {
            match fs::read_to_string(&self.path) {
                Ok(s) => Ok(Some(s)),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
                Err(e) => Err(e.into()),
            }
        }

        fn write(&self, contents: &str) -> Result<(), SaveError> {
            if let Some(dir) = self.path.parent() {
                if !dir.as_os_str().is_empty() && !dir.exists() {
                    fs::create_dir_all(dir)?;
                }
            }
            // Write to a temp file first, then rename for atomicity
            let tmp = self.tmp_path();
            fs::write(&tmp, contents)?;
            fs::rename(&tmp, &self.path)?;
            Ok(())
        }

        fn remove(&self) -> Result<bool, SaveError> {
            match fs::remove_file(&self.path) {
                Ok(()) => Ok(true),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
                Err(e) => Err(e.into()),
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::LocalStorageStore;

#[cfg(target_arch = "wasm32")]
mod web {
    use super::SaveStore;
    use crate::error::SaveError;

    /// Save record under one localStorage key.
    #[derive(Clone, Debug)]
    pub struct LocalStorageStore {
        key: String,
    }

    impl LocalStorageStore {
        pub fn new(key: &str) -> Self {
            Self { key: key.into() }
        }
    }

    fn get_storage() -> Result<web_sys::Storage, SaveError> {
        web_sys::window()
            .ok_or_else(|| SaveError::Storage("no window".into()))?
            .local_storage()
            .map_err(|e| SaveError::Storage(format!("{e:?}")))?
            .ok_or_else(|| SaveError::Storage("localStorage unavailable".into()))
    }

    impl SaveStore for LocalStorageStore {
        fn read(&self) -> Result<Option<String>, SaveError> {
            get_storage()?
                .get_item(&self.key)
                .map_err(|e| SaveError::Storage(format!("{e:?}")))
        }

        fn write(&self, contents: &str) -> Result<(), SaveError> {
            get_storage()?
                .set_item(&self.key, contents)
                .map_err(|e| SaveError::Storage(format!("{e:?}")))
        }

        fn remove(&self) -> Result<bool, SaveError> {
            let storage = get_storage()?;
            let existed = storage
                .get_item(&self.key)
                .map_err(|e| SaveError::Storage(format!("{e:?}")))?
                .is_some();
            storage
                .remove_item(&self.key)
                .map_err(|e| SaveError::Storage(format!("{e:?}")))?;
            Ok(existed)
        }
    }
}

/// In-memory slot.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: RefCell<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contents(contents: &str) -> Self {
        Self {
            data: RefCell::new(Some(contents.into())),
        }
    }

    pub fn contents(&self) -> Option<String> {
        self.data.borrow().clone()
    }
}

impl SaveStore for MemoryStore {
    fn read(&self) -> Result<Option<String>, SaveError> {
        Ok(self.data.borrow().clone())
    }

    fn write(&self, contents: &str) -> Result<(), SaveError> {
        *self.data.borrow_mut() = Some(contents.into());
        Ok(())
    }

    fn remove(&self) -> Result<bool, SaveError> {
        Ok(self.data.borrow_mut().take().is_some())
    }
}
