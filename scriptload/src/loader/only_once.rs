use crate::error::{LoadError, LoadErrorKind};
use crate::event::{EventRecorder, LoaderEventKind, NullRecorder};
use crate::loader::{LoadFuture, LoadScript};
use crate::locator::Locator;
use crate::spawn::Spawner;
use futures::channel::oneshot;
use futures::future::FutureExt as _;
use std::cell::RefCell;
use std::collections::hash_map;
use std::fmt::{Debug, Formatter};
use std::rc::Rc;

type Waiter = oneshot::Sender<crate::Result<()>>;

// An entry exists only while the underlying load of its locator is running.
type PendingLookup = rustc_hash::FxHashMap<Locator, Vec<Waiter>>;

struct Shared<L> {
    loader: L,
    pending: RefCell<PendingLookup>,
    recorder: Rc<dyn EventRecorder>,
}

/// Wraps a loading strategy so that concurrent loads of the same locator result in exactly one underlying load.
///
/// Callers that request a locator while a load of it is in flight wait for that load, and are notified in the order
/// they made their requests. Once a load completes, successfully or not, the next request for its locator starts a
/// fresh attempt. No retries are performed.
///
/// Each underlying load is driven by a task spawned with the decorator's [`Spawner`], so it keeps running even if every
/// caller drops its future.
pub struct OnlyOnce<L> {
    shared: Rc<Shared<L>>,
    spawner: Spawner,
}

impl<L: LoadScript + 'static> OnlyOnce<L> {
    pub fn new(loader: L, spawner: Spawner) -> Self {
        Self::with_recorder(loader, spawner, Rc::new(NullRecorder))
    }

    /// Creates a decorator that records when underlying loads begin and end.
    pub fn with_recorder(loader: L, spawner: Spawner, recorder: Rc<dyn EventRecorder>) -> Self {
        Self {
            shared: Rc::new(Shared {
                loader,
                pending: RefCell::default(),
                recorder,
            }),
            spawner,
        }
    }

    #[inline]
    pub fn inner(&self) -> &L {
        &self.shared.loader
    }

    /// The number of locators with a load in flight.
    pub fn pending_count(&self) -> usize {
        self.shared.pending.borrow().len()
    }

    pub fn is_pending(&self, locator: &str) -> bool {
        self.shared.pending.borrow().contains_key(locator)
    }

    fn start(&self, locator: &Locator) {
        log::debug!("loading {}", locator);
        self.shared.recorder.record(LoaderEventKind::BeginLoadingScript, locator);

        let load = self.shared.loader.load(locator);
        let shared = self.shared.clone();
        let locator = locator.clone();
        self.spawner.spawn(async move {
            let result = load.await;
            match &result {
                Ok(()) => shared.recorder.record(LoaderEventKind::EndLoadingScriptOk, &locator),
                Err(error) => {
                    log::debug!("failed to load {}: {}", locator, error);
                    shared.recorder.record(LoaderEventKind::EndLoadingScriptError, &locator);
                }
            }

            let waiters = shared.pending.borrow_mut().remove(&locator).unwrap_or_default();
            for waiter in waiters {
                // The caller may have dropped its future, which is fine.
                let _ = waiter.send(result.clone());
            }
        });
    }
}

impl<L: LoadScript + 'static> LoadScript for OnlyOnce<L> {
    fn load(&self, locator: &Locator) -> LoadFuture {
        let (sender, receiver) = oneshot::channel();
        let first = match self.shared.pending.borrow_mut().entry(locator.clone()) {
            hash_map::Entry::Occupied(mut occupied) => {
                occupied.get_mut().push(sender);
                false
            }
            hash_map::Entry::Vacant(vacant) => {
                vacant.insert(vec![sender]);
                true
            }
        };

        if first {
            self.start(locator);
        }

        let locator = locator.clone();
        async move {
            receiver
                .await
                .unwrap_or_else(|_| Err(LoadError::new(LoadErrorKind::Canceled { locator })))
        }
        .boxed_local()
    }
}

impl<L: Debug> Debug for OnlyOnce<L> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        f.debug_struct("OnlyOnce")
            .field("loader", &self.shared.loader)
            .field("pending", &self.shared.pending.borrow().keys().collect::<Vec<_>>())
            .finish()
    }
}
