//! Contains types representing errors encountered during loading.

use crate::locator::Locator;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::rc::Rc;

/// A boxed error type, used for errors produced by host collaborators such as script engines and native require hooks.
///
/// Workaround for https://github.com/rust-lang/project-error-handling/issues/16
#[repr(transparent)]
pub struct GenericError(Box<dyn std::error::Error>);

impl GenericError {
    pub fn new<E: std::error::Error + 'static>(error: E) -> Self {
        Self(Box::from(error))
    }

    /// Creates an error from a plain message.
    pub fn msg<M: Into<String>>(message: M) -> Self {
        Self(Box::from(message.into()))
    }
}

impl From<Box<dyn std::error::Error>> for GenericError {
    fn from(error: Box<dyn std::error::Error>) -> Self {
        Self(error)
    }
}

impl std::fmt::Debug for GenericError {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        std::fmt::Debug::fmt(&self.0, f)
    }
}

impl Display for GenericError {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl std::error::Error for GenericError {}

/// A list specifying the ways loading a single script can fail.
///
/// Usually used with the [`LoadError`] type.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum LoadErrorKind {
    #[error("unable to require native module \"{name}\": {source}")]
    NativeRequire { name: String, source: GenericError },
    #[error("\"{locator}\" does not name a local file")]
    NotAFile { locator: Locator },
    #[error("unable to read {}: {source}", .path.display())]
    ReadSource { path: PathBuf, source: std::io::Error },
    #[error("unable to compile {}: {source}", .path.display())]
    Compile { path: PathBuf, source: GenericError },
    #[error("error evaluating {}: {source}", .path.display())]
    Evaluate { path: PathBuf, source: GenericError },
    #[error("could not load script \"{locator}\"")]
    ScriptElement { locator: Locator },
    #[error("unable to import \"{locator}\" into the worker: {source}")]
    WorkerImport { locator: Locator, source: GenericError },
    /// The task driving the load was dropped before it completed, usually because the runtime shut down.
    #[error("load of \"{locator}\" was abandoned before completion")]
    Canceled { locator: Locator },
}

/// The error type used when loading a script fails.
///
/// A single failure may be reported to every caller waiting on the same locator, so the error is reference counted and
/// cloning it is cheap.
#[derive(Clone, Debug)]
#[repr(transparent)]
pub struct LoadError(Rc<LoadErrorKind>);

impl LoadError {
    pub fn new<E: Into<LoadErrorKind>>(error: E) -> Self {
        Self(Rc::new(error.into()))
    }

    pub fn kind(&self) -> &LoadErrorKind {
        &self.0
    }
}

impl Display for LoadError {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(&*self.0)
    }
}

impl From<LoadErrorKind> for LoadError {
    fn from(error: LoadErrorKind) -> Self {
        Self::new(error)
    }
}

/// Identifies which part of the bytecode cache protocol went wrong.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum CacheErrorCode {
    /// The engine rejected the cached data supplied for a script.
    CachedDataRejected,
    /// Removing a rejected cache file failed.
    Unlink,
    /// Persisting freshly produced cached data failed.
    WriteFile,
}

impl CacheErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CachedDataRejected => "cachedDataRejected",
            Self::Unlink => "unlink",
            Self::WriteFile => "writeFile",
        }
    }
}

impl Display for CacheErrorCode {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reported to the error hook when bytecode caching fails. These errors never fail a load.
#[derive(Debug, thiserror::Error)]
pub struct CacheError {
    pub code: CacheErrorCode,
    /// The cache file involved.
    pub path: PathBuf,
    #[source]
    pub detail: Option<std::io::Error>,
}

impl CacheError {
    pub(crate) fn new(code: CacheErrorCode, path: PathBuf, detail: Option<std::io::Error>) -> Self {
        Self { code, path, detail }
    }
}

impl Display for CacheError {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{} ({})", self.code, self.path.display())?;
        if let Some(detail) = &self.detail {
            write!(f, ": {}", detail)?;
        }
        Ok(())
    }
}
