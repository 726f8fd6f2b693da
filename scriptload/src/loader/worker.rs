//! Loading of scripts inside a worker.

use crate::error::{GenericError, LoadError, LoadErrorKind};
use crate::loader::{LoadFuture, LoadScript};
use crate::locator::Locator;
use futures::future::FutureExt as _;
use std::fmt::{Debug, Formatter};
use std::rc::Rc;

/// The global scope of a worker, able to synchronously fetch and evaluate a script.
pub trait WorkerScope {
    fn import_scripts(&self, url: &str) -> Result<(), GenericError>;
}

/// Imports scripts synchronously, during the call to [`load`](LoadScript::load). The returned future is always ready.
pub struct WorkerLoader {
    scope: Rc<dyn WorkerScope>,
}

impl WorkerLoader {
    pub fn new(scope: Rc<dyn WorkerScope>) -> Self {
        Self { scope }
    }
}

impl LoadScript for WorkerLoader {
    fn load(&self, locator: &Locator) -> LoadFuture {
        let result = self.scope.import_scripts(locator).map_err(|source| {
            LoadError::new(LoadErrorKind::WorkerImport {
                locator: locator.clone(),
                source,
            })
        });

        futures::future::ready(result).boxed_local()
    }
}

impl Debug for WorkerLoader {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        f.debug_struct("WorkerLoader").finish_non_exhaustive()
    }
}
