//! Loading of scripts in a host process, either from native modules or from files evaluated with a script engine.
//!
//! File scripts are wrapped in a function taking `require`, `define`, `__filename` and `__dirname`, so they do not
//! leak into the global scope. When a cache directory is configured, the compiled bytecode of each script is kept
//! between runs; see [`cache`](crate::cache).

use crate::cache::BytecodeCache;
use crate::error::{CacheError, CacheErrorCode, GenericError, LoadError, LoadErrorKind};
use crate::event::LoaderEventKind;
use crate::loader::{LoadFuture, LoadScript};
use crate::locator::{normalize_path, Kind, Locator};
use crate::manager::ModuleManager;
use crate::source;
use crate::spawn::Spawner;
use futures::future::FutureExt as _;
use std::fmt::{Debug, Formatter};
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// The locals made available to a script while it is evaluated.
///
/// The engine provides `require` and `define` itself, using the module manager.
pub struct EvaluationContext<'a> {
    pub locator: &'a Locator,
    pub filename: &'a Path,
    pub dirname: &'a Path,
    pub manager: &'a dyn ModuleManager,
}

/// A script compiled by a [`ScriptEngine`], ready to be evaluated.
pub trait CompiledScript {
    fn run(&mut self, context: &EvaluationContext<'_>) -> Result<(), GenericError>;

    /// Returns `true` if cached data was supplied during compilation but did not match the source.
    fn cached_data_rejected(&self) -> bool;

    /// Takes the cached data produced during compilation, if production was requested and succeeded.
    fn take_produced_cached_data(&mut self) -> Option<Vec<u8>>;
}

/// Trait for the engine that compiles wrapped script source.
pub trait ScriptEngine {
    /// Compiles `source`, reporting it under `filename`.
    ///
    /// If `cached_data` is provided the engine may use it to skip compilation. If `produce_cached_data` is set, the
    /// engine should produce cached data that can be retrieved from the compiled script.
    fn compile(
        &self,
        source: &str,
        filename: &str,
        cached_data: Option<Vec<u8>>,
        produce_cached_data: bool,
    ) -> Result<Box<dyn CompiledScript>, GenericError>;
}

struct Host {
    manager: Rc<dyn ModuleManager>,
    engine: Rc<dyn ScriptEngine>,
    cache: Option<BytecodeCache>,
}

impl Host {
    fn record(&self, kind: LoaderEventKind, locator: &Locator) {
        self.manager.recorder().record(kind, locator);
    }

    fn load_native(&self, locator: &Locator, name: &str) -> crate::Result<()> {
        self.record(LoaderEventKind::NodeBeginNativeRequire, locator);
        let result = (self.manager.hooks().native_require)(name);
        self.record(LoaderEventKind::NodeEndNativeRequire, locator);

        let exports = result.map_err(|source| {
            LoadError::new(LoadErrorKind::NativeRequire {
                name: name.to_string(),
                source,
            })
        })?;

        self.manager
            .enqueue_define_anonymous_module(Box::new(move || exports));
        Ok(())
    }

    async fn load_file(self: Rc<Self>, locator: Locator) -> crate::Result<()> {
        let path = locator
            .to_file_path()
            .ok_or_else(|| LoadError::new(LoadErrorKind::NotAFile { locator: locator.clone() }))?;
        let path = normalize_path(&path);
        let cache_path = self.cache.as_ref().map(|cache| cache.file_path(&path));

        let read_cached_data = async {
            match (&self.cache, &cache_path) {
                (Some(cache), Some(cache_path)) => cache.read(cache_path).await,
                _ => None,
            }
        };

        let (text, cached_data) = futures::join!(tokio::fs::read_to_string(&path), read_cached_data);
        let text = text.map_err(|source| {
            LoadError::new(LoadErrorKind::ReadSource {
                path: path.clone(),
                source,
            })
        })?;

        if self.cache.is_some() {
            let kind = if cached_data.is_some() {
                LoaderEventKind::CachedDataFound
            } else {
                LoaderEventKind::CachedDataMissed
            };
            self.record(kind, &locator);
        }

        let hooks = self.manager.hooks();
        let wrapped = (hooks.instrumenter)(source::wrap(&text), &path);
        let filename = source::script_filename(&path, self.manager.config().embedded_renderer);
        let produce_cached_data = self.cache.is_some() && cached_data.is_none();

        let mut script = self
            .engine
            .compile(&wrapped, &filename, cached_data, produce_cached_data)
            .map_err(|source| {
                LoadError::new(LoadErrorKind::Compile {
                    path: path.clone(),
                    source,
                })
            })?;

        let context = EvaluationContext {
            locator: &locator,
            filename: &path,
            dirname: path.parent().unwrap_or_else(|| Path::new("")),
            manager: &*self.manager,
        };

        self.record(LoaderEventKind::NodeBeginEvaluatingScript, &locator);
        let result = script.run(&context);
        self.record(LoaderEventKind::NodeEndEvaluatingScript, &locator);
        result.map_err(|source| {
            LoadError::new(LoadErrorKind::Evaluate {
                path: path.clone(),
                source,
            })
        })?;

        if let (Some(cache), Some(cache_path)) = (&self.cache, cache_path) {
            self.process_cached_data(cache, &locator, cache_path, script.as_mut());
        }

        Ok(())
    }

    // Only schedules work, the load is reported as successful without waiting for the cache.
    fn process_cached_data(
        &self,
        cache: &BytecodeCache,
        locator: &Locator,
        cache_path: PathBuf,
        script: &mut dyn CompiledScript,
    ) {
        let on_error = self.manager.hooks().on_error.clone();
        if script.cached_data_rejected() {
            log::warn!("cached data for {} was rejected", locator);
            on_error(CacheError::new(CacheErrorCode::CachedDataRejected, cache_path.clone(), None));
            self.record(LoaderEventKind::CachedDataRejected, locator);
            cache.schedule_eviction(cache_path, on_error);
        } else if let Some(data) = script.take_produced_cached_data() {
            log::debug!("produced {} bytes of cached data for {}", data.len(), locator);
            self.record(LoaderEventKind::CachedDataCreated, locator);
            cache.schedule_write(cache_path, data, on_error);
        }
    }
}

/// Loads `node|<name>` locators through the native require hook, and everything else as a script file.
pub struct HostLoader {
    host: Rc<Host>,
}

impl HostLoader {
    /// Creates a loader, enabling the bytecode cache if the manager's configuration names a cache directory.
    ///
    /// Cache write-back and eviction are spawned with `spawner`, after the load that triggered them has succeeded.
    pub fn new(manager: Rc<dyn ModuleManager>, engine: Rc<dyn ScriptEngine>, spawner: Spawner) -> Self {
        let cache = manager
            .config()
            .node_cached_data
            .clone()
            .map(|config| BytecodeCache::new(config, spawner));
        Self {
            host: Rc::new(Host { manager, engine, cache }),
        }
    }

    pub fn cache(&self) -> Option<&BytecodeCache> {
        self.host.cache.as_ref()
    }
}

impl LoadScript for HostLoader {
    fn load(&self, locator: &Locator) -> LoadFuture {
        match locator.kind() {
            Kind::Native(name) => futures::future::ready(self.host.load_native(locator, name)).boxed_local(),
            Kind::File => self.host.clone().load_file(locator.clone()).boxed_local(),
        }
    }
}

impl Debug for HostLoader {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        f.debug_struct("HostLoader")
            .field("cache", &self.host.cache)
            .finish_non_exhaustive()
    }
}
