use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::error::{Error, Result};

use super::{validate_key, Medium};

/// Extension of the file holding a key's value.
const VALUE_EXTENSION: &str = "json";

/// Medium that stores each key as `<dir>/<key>.json`.
///
/// Values are written to a scratch file in the same directory and renamed
/// into place, so a crash mid-write leaves the previous value intact. The
/// scratch file is removed if the write or the rename fails.
#[derive(Debug)]
pub struct FileMedium {
    dir: PathBuf,
}

impl FileMedium {
    /// Open a file medium rooted at `dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        if !dir.exists() {
            fs::create_dir_all(&dir).map_err(|source| Error::DirectoryCreate {
                path: dir.clone(),
                source,
            })?;
        }
        info!("Using history directory {}", dir.display());
        Ok(Self { dir })
    }

    /// Directory holding the value files.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file that holds `key`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidKey`] if the key cannot be used as a file name.
    pub fn path_for(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{key}.{VALUE_EXTENSION}")))
    }
}

impl Medium for FileMedium {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        let mut temp = NamedTempFile::new_in(&self.dir)?;
        temp.write_all(value.as_bytes())?;
        temp.persist(&path).map_err(|e| Error::Io(e.error))?;
        debug!("Wrote {} bytes to {}", value.len(), path.display());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!("Removed {}", path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn location(&self) -> String {
        self.dir().display().to_string()
    }
}
