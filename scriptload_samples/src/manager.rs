use scriptload::config::Config;
use scriptload::error::{CacheError, CacheErrorCode};
use scriptload::event::{EventRecorder, LoaderEventRecorder};
use scriptload::hooks::{Hooks, NativeModule};
use scriptload::manager::{ModuleFactory, ModuleManager};
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

/// A module manager that records everything the loaders ask of it.
pub struct SampleManager {
    config: Config,
    hooks: Hooks,
    recorder: Rc<LoaderEventRecorder>,
    definitions: RefCell<Vec<ModuleFactory>>,
    cache_errors: Rc<RefCell<Vec<(CacheErrorCode, PathBuf)>>>,
}

impl SampleManager {
    /// Creates a manager whose error hook collects cache errors, see [`cache_errors`](SampleManager::cache_errors).
    pub fn new(config: Config) -> Self {
        Self::with_hooks(config, Hooks::default())
    }

    /// Creates a manager using the given hooks, replacing the error hook with one that collects cache errors.
    pub fn with_hooks(config: Config, hooks: Hooks) -> Self {
        let cache_errors = Rc::new(RefCell::new(Vec::new()));
        let collected = cache_errors.clone();
        Self {
            config,
            hooks: hooks.with_error_hook(move |error: CacheError| collected.borrow_mut().push((error.code, error.path))),
            recorder: Rc::new(LoaderEventRecorder::new()),
            definitions: RefCell::default(),
            cache_errors,
        }
    }

    pub fn events(&self) -> &Rc<LoaderEventRecorder> {
        &self.recorder
    }

    pub fn cache_errors(&self) -> Vec<(CacheErrorCode, PathBuf)> {
        self.cache_errors.borrow().clone()
    }

    pub fn definition_count(&self) -> usize {
        self.definitions.borrow().len()
    }

    /// Instantiates every anonymous module defined so far, in order.
    pub fn take_definitions(&self) -> Vec<NativeModule> {
        self.definitions
            .borrow_mut()
            .drain(..)
            .map(|factory| factory())
            .collect()
    }
}

impl ModuleManager for SampleManager {
    fn config(&self) -> &Config {
        &self.config
    }

    fn hooks(&self) -> &Hooks {
        &self.hooks
    }

    fn recorder(&self) -> &dyn EventRecorder {
        &*self.recorder
    }

    fn enqueue_define_anonymous_module(&self, factory: ModuleFactory) {
        self.definitions.borrow_mut().push(factory);
    }
}
