//! External-resource adapter traits (spec §5, §6.4) and the bundle of
//! concrete implementations an interpreter run is configured with.
//!
//! Grounded on the teacher's `typechecker::Scope`/`loader::Loader` split
//! between "what the language needs" (a trait) and "how the host actually
//! provides it" (one concrete struct) — generalized here into one trait per
//! external resource kind, since Parsley's surface talks to far more of the
//! outside world than Y's compiler ever does.

mod native;

pub use native::{AllowListSecurity, NativeFileSystem};

use crate::error::ParsleyError;
use crate::value::{CommandHandle, RequestHandle, ResponseHandle};
use std::path::Path;

pub trait FileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String, ParsleyError>;
    fn write_string(&self, path: &Path, contents: &str, append: bool) -> Result<(), ParsleyError>;
    fn read_dir(&self, path: &Path) -> Result<Vec<std::path::PathBuf>, ParsleyError>;
    fn exists(&self, path: &Path) -> bool;
}

pub trait HttpClient {
    fn send(&self, request: &RequestHandle) -> Result<ResponseHandle, ParsleyError>;
}

pub trait SftpClient {
    fn read_to_string(&self, host: &str, user: &str, path: &Path) -> Result<String, ParsleyError>;
    fn write_string(&self, host: &str, user: &str, path: &Path, contents: &str) -> Result<(), ParsleyError>;
}

pub trait Database {
    fn query_one(&self, dsn: &str, sql: &str) -> Result<crate::value::Value, ParsleyError>;
    fn query_all(&self, dsn: &str, sql: &str) -> Result<crate::value::Value, ParsleyError>;
    fn execute(&self, dsn: &str, sql: &str) -> Result<crate::value::Value, ParsleyError>;
}

pub trait Process {
    fn run(&self, command: &CommandHandle) -> Result<crate::value::Value, ParsleyError>;
}

pub trait Locale {
    fn now(&self) -> chrono::DateTime<chrono::FixedOffset>;
}

/// Gates every adapter behind an allow/deny decision, so a script cannot
/// reach the filesystem or process table unless the host explicitly
/// permitted it (spec §5: "security-policy-gated I/O", §6.4's three
/// predicates). Module imports and process spawns are both gated by
/// `allow_execute`, matching spec §1's "before touching the filesystem or
/// spawning processes"; network requests have no predicate of their own in
/// spec §6.4 and so are ungated here.
pub trait Security {
    fn allow_read(&self, path: &Path) -> bool;
    fn allow_write(&self, path: &Path) -> bool;
    fn allow_execute(&self, path: &Path) -> bool;
}

pub fn security_denied(resource: impl std::fmt::Display) -> ParsleyError {
    ParsleyError::new(
        crate::error::ErrorKind::Security,
        format!("access denied by security policy: {resource}"),
    )
}

/// The full set of adapters an interpreter run is configured with. Only
/// `filesystem` and `security` have a real implementation backing them
/// (spec §14); the others return an `Io`/`Security` error until a host
/// chooses to wire in a real backend, matching the teacher's habit of
/// keeping unimplemented compiler backends (`src/compiler`) present but
/// inert rather than missing.
pub struct Adapters {
    pub filesystem: Box<dyn FileSystem>,
    pub http: Box<dyn HttpClient>,
    pub sftp: Box<dyn SftpClient>,
    pub database: Box<dyn Database>,
    pub process: Box<dyn Process>,
    pub locale: Box<dyn Locale>,
    pub security: Box<dyn Security>,
}

impl Adapters {
    /// The default bundle: a real filesystem gated by a real allow-list
    /// security policy, and stub adapters for everything the CLI doesn't
    /// yet wire a live backend for.
    pub fn native(
        allowed_read: Vec<std::path::PathBuf>,
        allowed_write: Vec<std::path::PathBuf>,
        allowed_execute: Vec<std::path::PathBuf>,
    ) -> Self {
        Adapters {
            filesystem: Box::new(NativeFileSystem),
            http: Box::new(native::UnsupportedHttpClient),
            sftp: Box::new(native::UnsupportedSftpClient),
            database: Box::new(native::UnsupportedDatabase),
            process: Box::new(native::UnsupportedProcess),
            locale: Box::new(native::SystemLocale),
            security: Box::new(AllowListSecurity::new(allowed_read, allowed_write, allowed_execute)),
        }
    }
}
