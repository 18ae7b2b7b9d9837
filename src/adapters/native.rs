//! Default adapter implementations (spec §14).

use super::{Database, FileSystem, HttpClient, Locale, Process, Security, SftpClient};
use crate::error::{ErrorKind, ParsleyError};
use crate::value::{RequestHandle, ResponseHandle, Value};
use std::path::{Path, PathBuf};

/// A `std::fs`-backed filesystem. The only adapter besides
/// `AllowListSecurity` that does real I/O; every error is wrapped with the
/// offending path so a script's uncaught-error report is actionable.
pub struct NativeFileSystem;

impl FileSystem for NativeFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String, ParsleyError> {
        std::fs::read_to_string(path)
            .map_err(|e| ParsleyError::new(ErrorKind::Io, format!("failed to read {}: {e}", path.display())))
    }

    fn write_string(&self, path: &Path, contents: &str, append: bool) -> Result<(), ParsleyError> {
        use std::io::Write;
        let mut opts = std::fs::OpenOptions::new();
        opts.write(true).create(true);
        if append {
            opts.append(true);
        } else {
            opts.truncate(true);
        }
        let mut file = opts
            .open(path)
            .map_err(|e| ParsleyError::new(ErrorKind::Io, format!("{}: {e}", path.display())))?;
        file.write_all(contents.as_bytes())
            .map_err(|e| ParsleyError::new(ErrorKind::Io, format!("{}: {e}", path.display())))
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>, ParsleyError> {
        let entries = std::fs::read_dir(path)
            .map_err(|e| ParsleyError::new(ErrorKind::Io, format!("{}: {e}", path.display())))?;
        let mut out = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| ParsleyError::new(ErrorKind::Io, e.to_string()))?;
            out.push(entry.path());
        }
        Ok(out)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

/// Fail-closed by default: only the paths/hosts/programs the host explicitly
/// listed at startup are permitted (spec §5).
pub struct AllowListSecurity {
    allowed_read: Vec<PathBuf>,
    allowed_write: Vec<PathBuf>,
    allowed_execute: Vec<PathBuf>,
}

impl AllowListSecurity {
    pub fn new(allowed_read: Vec<PathBuf>, allowed_write: Vec<PathBuf>, allowed_execute: Vec<PathBuf>) -> Self {
        Self { allowed_read, allowed_write, allowed_execute }
    }

    fn is_under(path: &Path, allowed: &[PathBuf]) -> bool {
        let Ok(path) = path.canonicalize().or_else(|_| Ok::<_, std::io::Error>(path.to_path_buf())) else {
            return false;
        };
        allowed.iter().any(|root| {
            let root = root.canonicalize().unwrap_or_else(|_| root.clone());
            path.starts_with(&root)
        })
    }
}

impl Security for AllowListSecurity {
    fn allow_read(&self, path: &Path) -> bool {
        Self::is_under(path, &self.allowed_read)
    }

    fn allow_write(&self, path: &Path) -> bool {
        Self::is_under(path, &self.allowed_write)
    }

    fn allow_execute(&self, path: &Path) -> bool {
        Self::is_under(path, &self.allowed_execute)
    }
}

pub struct SystemLocale;

impl Locale for SystemLocale {
    fn now(&self) -> chrono::DateTime<chrono::FixedOffset> {
        chrono::Local::now().with_timezone(&chrono::Local::now().offset().fix())
    }
}

pub struct UnsupportedHttpClient;

impl HttpClient for UnsupportedHttpClient {
    fn send(&self, _request: &RequestHandle) -> Result<ResponseHandle, ParsleyError> {
        Err(ParsleyError::new(ErrorKind::Io, "no HTTP client adapter is configured for this run"))
    }
}

pub struct UnsupportedSftpClient;

impl SftpClient for UnsupportedSftpClient {
    fn read_to_string(&self, _host: &str, _user: &str, path: &Path) -> Result<String, ParsleyError> {
        Err(ParsleyError::new(ErrorKind::Io, format!("no SFTP adapter is configured for this run ({})", path.display())))
    }

    fn write_string(&self, _host: &str, _user: &str, path: &Path, _contents: &str) -> Result<(), ParsleyError> {
        Err(ParsleyError::new(ErrorKind::Io, format!("no SFTP adapter is configured for this run ({})", path.display())))
    }
}

pub struct UnsupportedDatabase;

impl Database for UnsupportedDatabase {
    fn query_one(&self, _dsn: &str, _sql: &str) -> Result<Value, ParsleyError> {
        Err(ParsleyError::new(ErrorKind::Io, "no database adapter is configured for this run"))
    }
    fn query_all(&self, _dsn: &str, _sql: &str) -> Result<Value, ParsleyError> {
        Err(ParsleyError::new(ErrorKind::Io, "no database adapter is configured for this run"))
    }
    fn execute(&self, _dsn: &str, _sql: &str) -> Result<Value, ParsleyError> {
        Err(ParsleyError::new(ErrorKind::Io, "no database adapter is configured for this run"))
    }
}

pub struct UnsupportedProcess;

impl Process for UnsupportedProcess {
    fn run(&self, _command: &crate::value::CommandHandle) -> Result<Value, ParsleyError> {
        Err(ParsleyError::new(ErrorKind::Io, "no process adapter is configured for this run"))
    }
}
