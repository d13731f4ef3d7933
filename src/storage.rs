use crate::task::Task;
use std::{
    fs, io,
    path::{Path, PathBuf},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to access task file: {0}")]
    Io(#[from] io::Error),
    #[error("failed to encode tasks: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug)]
pub struct Storage {
    path: PathBuf,
}

impl Storage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .map(|dir| dir.join("todotui").join("tasks.json"))
            .unwrap_or_else(|| PathBuf::from("tasks.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save(&self, tasks: &[Task]) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, serde_json::to_string_pretty(tasks)?)?;
        Ok(())
    }

    // Missing or malformed data yields an empty collection rather than
    // aborting startup.
    pub fn load(&self) -> Vec<Task> {
        if !self.path.exists() {
            return Vec::new();
        }
        match fs::read_to_string(&self.path) {
            Ok(data) => serde_json::from_str(&data).unwrap_or_else(|err| {
                eprintln!("Ignoring malformed task file {}: {err}", self.path.display());
                Vec::new()
            }),
            Err(err) => {
                eprintln!("Failed to read task file {}: {err}", self.path.display());
                Vec::new()
            }
        }
    }
}
