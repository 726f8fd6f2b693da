//! Hooks supplied by the embedder to customize how scripts are required, transformed, and how cache problems are
//! reported.

use crate::error::{CacheError, GenericError};
use std::any::Any;
use std::fmt::{Debug, Formatter};
use std::path::Path;
use std::rc::Rc;

/// The value exported by a module native to the host process.
pub type NativeModule = Rc<dyn Any>;

pub type NativeRequire = Rc<dyn Fn(&str) -> Result<NativeModule, GenericError>>;

/// Rewrites wrapped source text before it is compiled, receiving the normalized path of the script.
pub type Instrumenter = Rc<dyn Fn(String, &Path) -> String>;

pub type ErrorHook = Rc<dyn Fn(CacheError)>;

#[derive(Clone)]
pub struct Hooks {
    pub native_require: NativeRequire,
    pub instrumenter: Instrumenter,
    pub on_error: ErrorHook,
}

impl Hooks {
    pub fn with_native_require<F>(mut self, require: F) -> Self
    where
        F: Fn(&str) -> Result<NativeModule, GenericError> + 'static,
    {
        self.native_require = Rc::new(require);
        self
    }

    pub fn with_instrumenter<F: Fn(String, &Path) -> String + 'static>(mut self, instrumenter: F) -> Self {
        self.instrumenter = Rc::new(instrumenter);
        self
    }

    pub fn with_error_hook<F: Fn(CacheError) + 'static>(mut self, hook: F) -> Self {
        self.on_error = Rc::new(hook);
        self
    }
}

impl Default for Hooks {
    fn default() -> Self {
        Self {
            native_require: Rc::new(|name: &str| -> Result<NativeModule, GenericError> {
                Err(GenericError::msg(format!("no native require available for \"{}\"", name)))
            }),
            instrumenter: Rc::new(|source: String, _: &Path| source),
            on_error: Rc::new(|error: CacheError| log::error!("bytecode cache error: {}", error)),
        }
    }
}

impl Debug for Hooks {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        f.debug_struct("Hooks").finish_non_exhaustive()
    }
}
