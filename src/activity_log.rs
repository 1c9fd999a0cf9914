//! Append-only diagnostic log of lifecycle and decision events.
//!
//! Appending is best-effort: write failures are dropped so they never affect
//! the heartbeat loop.

use crate::error::AppError;
use crate::models::unix_secs;
use log::debug;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

pub trait ActivityLog: Send {
    fn append(&mut self, event: &str);
}

/// Discards every event.
pub struct NullActivityLog;

impl ActivityLog for NullActivityLog {
    fn append(&mut self, _event: &str) {}
}

/// Writes one `<unix secs> <event>` line per event.
pub struct FileActivityLog {
    path: PathBuf,
    file: File,
}

impl FileActivityLog {
    pub fn open(path: &Path) -> Result<Self, AppError> {
        let to_err = |source| AppError::ActivityLog {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(to_err)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(to_err)?;

        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ActivityLog for FileActivityLog {
    fn append(&mut self, event: &str) {
        let line = format!("{} {event}\n", unix_secs(SystemTime::now()));
        if let Err(e) = self.file.write_all(line.as_bytes()) {
            debug!("Dropping activity log entry for {}: {}", self.path.display(), e);
        }
    }
}

/// Where the supervisor sends activity events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivityLogTarget {
    Disabled,
    File(PathBuf),
}

impl ActivityLogTarget {
    pub fn open(&self) -> Result<Box<dyn ActivityLog>, AppError> {
        match self {
            ActivityLogTarget::Disabled => Ok(Box::new(NullActivityLog)),
            ActivityLogTarget::File(path) => Ok(Box::new(FileActivityLog::open(path)?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_open_creates_file_and_parents() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("logs").join("activity.log");

        let log = FileActivityLog::open(&path).unwrap();

        assert!(path.exists());
        assert_eq!(log.path(), path.as_path());
    }

    #[test]
    fn test_append_writes_timestamped_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("activity.log");

        let mut log = FileActivityLog::open(&path).unwrap();
        log.append("started");
        log.append("moved pointer");
        drop(log);

        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with(" started"));
        assert!(lines[1].ends_with(" moved pointer"));
        let stamp: u64 = lines[0].split(' ').next().unwrap().parse().unwrap();
        assert!(stamp > 0);
    }

    #[test]
    fn test_reopen_appends() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("activity.log");

        FileActivityLog::open(&path).unwrap().append("first");
        FileActivityLog::open(&path).unwrap().append("second");

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 2);
    }

    #[test]
    fn test_open_fails_when_parent_is_a_file() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, b"x").unwrap();

        let target = ActivityLogTarget::File(blocker.join("activity.log"));
        assert!(matches!(target.open(), Err(AppError::ActivityLog { .. })));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_failed_write_is_dropped() {
        let mut log = FileActivityLog::open(Path::new("/dev/full")).unwrap();
        log.append("started");
        log.append("stopped");
    }

    #[test]
    fn test_disabled_target_never_fails() {
        let mut log = ActivityLogTarget::Disabled.open().unwrap();
        log.append("ignored");
    }
}
