//! JSON-lines file output with size-based rotation.
//!
//! Each entry is appended as one `serde_json` line. Once the file has grown
//! to `max_file_size` bytes, the next write shifts `<file>.1 .. <file>.N-1`
//! up by one, moves the live file to `<file>.1` and starts a fresh one. At
//! most `max_backups` rotated files are kept.

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use casement_config::schema::LoggingConfig;

use crate::entry::LogEntry;

pub struct FileSink {
    path: PathBuf,
    max_file_size: u64,
    max_backups: usize,
    file: Mutex<Option<File>>,
}

impl FileSink {
    /// Open (or create) `path` for appending. Missing parent directories
    /// are created.
    pub fn open(
        path: impl Into<PathBuf>,
        max_file_size: u64,
        max_backups: usize,
    ) -> io::Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let file = open_append(&path)?;
        Ok(Self {
            path,
            max_file_size,
            max_backups,
            file: Mutex::new(Some(file)),
        })
    }

    /// The sink configured by `[logging] file`, or `None` when unset.
    pub fn from_config(config: &LoggingConfig) -> io::Result<Option<Self>> {
        config
            .file
            .as_ref()
            .map(|path| Self::open(path, config.max_file_size, config.max_backups))
            .transpose()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of the `n`-th rotated file.
    pub fn backup_path(&self, n: usize) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(format!(".{n}"));
        PathBuf::from(name)
    }

    /// Append one entry, rotating first if the file is full.
    pub fn write(&self, entry: &LogEntry) -> io::Result<()> {
        let line = serde_json::to_string(entry).map_err(io::Error::other)?;
        let mut file = self.file.lock().unwrap_or_else(|e| e.into_inner());

        let size = fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0);
        if size >= self.max_file_size {
            // Close before renaming so the handle does not follow the old file.
            *file = None;
            self.rotate()?;
        }
        if file.is_none() {
            *file = Some(open_append(&self.path)?);
        }
        if let Some(file) = file.as_mut() {
            writeln!(file, "{line}")?;
            file.flush()?;
        }
        Ok(())
    }

    fn rotate(&self) -> io::Result<()> {
        if self.max_backups == 0 {
            return remove_if_present(&self.path);
        }
        remove_if_present(&self.backup_path(self.max_backups))?;
        for n in (1..self.max_backups).rev() {
            let from = self.backup_path(n);
            if from.exists() {
                fs::rename(&from, self.backup_path(n + 1))?;
            }
        }
        match fs::rename(&self.path, self.backup_path(1)) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }

    /// Wrap for [`LogBackend::add_sink`](crate::LogBackend::add_sink). Write
    /// failures are reported through `tracing` and never reach the caller.
    pub fn into_sink(self) -> impl Fn(&LogEntry) + Send + Sync + 'static {
        let sink = Arc::new(self);
        move |entry: &LogEntry| {
            if let Err(err) = sink.write(entry) {
                tracing::warn!(
                    target: "casement",
                    path = %sink.path.display(),
                    error = %err,
                    "failed to write log file"
                );
            }
        }
    }
}

impl std::fmt::Debug for FileSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileSink")
            .field("path", &self.path)
            .field("max_file_size", &self.max_file_size)
            .field("max_backups", &self.max_backups)
            .finish()
    }
}

fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

fn remove_if_present(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}
