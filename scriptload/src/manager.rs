//! The interface to the module manager that owns the loaders.

use crate::config::Config;
use crate::event::EventRecorder;
use crate::hooks::{Hooks, NativeModule};

/// Produces the exports of an anonymous module when the module manager decides to instantiate it.
pub type ModuleFactory = Box<dyn FnOnce() -> NativeModule>;

/// Trait for the module manager, which tracks module definitions and dependencies on behalf of the loaders.
///
/// Loaders only ever load one script at a time; the module manager is responsible for everything around that.
pub trait ModuleManager {
    fn config(&self) -> &Config;

    fn hooks(&self) -> &Hooks;

    fn recorder(&self) -> &dyn EventRecorder;

    /// Registers a module with no name and no dependencies, to be claimed by the load that is currently completing.
    fn enqueue_define_anonymous_module(&self, factory: ModuleFactory);
}
