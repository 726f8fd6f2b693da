//! Running of background work that outlives the poll of a single load future.

use std::fmt::{Debug, Formatter};
use std::future::Future;
use std::rc::Rc;
use tokio::task::{JoinHandle, LocalSet};

/// Handle to the [`LocalSet`] that loaders spawn their background tasks onto.
///
/// Loaders capture a spawner when they are created, so spawning never depends on which task happens to poll a load.
/// Spawned tasks only make progress while the set is driven, with [`Spawner::run_until`].
#[derive(Clone, Default)]
pub struct Spawner {
    set: Rc<LocalSet>,
}

impl Spawner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn<F>(&self, task: F) -> JoinHandle<F::Output>
    where
        F: Future + 'static,
        F::Output: 'static,
    {
        self.set.spawn_local(task)
    }

    /// Drives `future` to completion, running spawned tasks in the meantime.
    pub async fn run_until<F: Future>(&self, future: F) -> F::Output {
        self.set.run_until(future).await
    }
}

impl Debug for Spawner {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        f.debug_struct("Spawner").finish_non_exhaustive()
    }
}
