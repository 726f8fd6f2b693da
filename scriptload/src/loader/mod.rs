//! Module for the strategies that load a single script, and the decorator that deduplicates concurrent loads.

use crate::locator::Locator;
use crate::spawn::Spawner;
use futures::future::LocalBoxFuture;

pub mod host;
pub mod in_page;
mod only_once;
pub mod worker;

pub use host::{CompiledScript, EvaluationContext, HostLoader, ScriptEngine};
pub use in_page::{Document, InPageLoader, ListenerId, ScriptElement, ScriptEvent};
pub use only_once::OnlyOnce;
pub use worker::{WorkerLoader, WorkerScope};

/// A loaded script either evaluated successfully or failed with a [`LoadError`](crate::LoadError).
pub type LoadFuture = LocalBoxFuture<'static, crate::Result<()>>;

/// Trait for fetching and evaluating the script named by a locator.
///
/// The returned future resolves exactly once. Dropping it does not abort the load.
pub trait LoadScript {
    fn load(&self, locator: &Locator) -> LoadFuture;
}

impl<L: LoadScript + ?Sized> LoadScript for Box<L> {
    fn load(&self, locator: &Locator) -> LoadFuture {
        L::load(self, locator)
    }
}

impl<L: LoadScript + ?Sized> LoadScript for std::rc::Rc<L> {
    fn load(&self, locator: &Locator) -> LoadFuture {
        L::load(self, locator)
    }
}

/// The loading strategy for the environment the program runs in, chosen once at startup.
#[derive(Debug)]
pub enum ScriptLoader {
    InPage(InPageLoader),
    Worker(WorkerLoader),
    Host(HostLoader),
}

crate::enum_case_from_impl!(ScriptLoader, InPage, InPageLoader);
crate::enum_case_from_impl!(ScriptLoader, Worker, WorkerLoader);
crate::enum_case_from_impl!(ScriptLoader, Host, HostLoader);

impl ScriptLoader {
    /// Wraps the strategy so concurrent loads of one locator share a single underlying load.
    pub fn only_once(self, spawner: Spawner) -> OnlyOnce<Self> {
        OnlyOnce::new(self, spawner)
    }
}

impl LoadScript for ScriptLoader {
    fn load(&self, locator: &Locator) -> LoadFuture {
        match self {
            Self::InPage(loader) => loader.load(locator),
            Self::Worker(loader) => loader.load(locator),
            Self::Host(loader) => loader.load(locator),
        }
    }
}
