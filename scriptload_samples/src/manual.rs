//! A loading strategy whose loads only complete when a test says so.

use futures::channel::oneshot;
use futures::future::FutureExt as _;
use scriptload::error::{LoadError, LoadErrorKind};
use scriptload::loader::{LoadFuture, LoadScript};
use scriptload::Locator;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Default)]
struct State {
    started: Vec<Locator>,
    in_flight: Vec<(Locator, oneshot::Sender<scriptload::Result<()>>)>,
}

/// Cloning a [`ManualLoader`] gives another handle to the same loads.
#[derive(Clone, Default)]
pub struct ManualLoader {
    state: Rc<RefCell<State>>,
}

impl ManualLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of underlying loads started for `locator`.
    pub fn started(&self, locator: &str) -> usize {
        self.state
            .borrow()
            .started
            .iter()
            .filter(|started| started.as_str() == locator)
            .count()
    }

    pub fn in_flight(&self) -> usize {
        self.state.borrow().in_flight.len()
    }

    /// Completes the oldest in-flight load of `locator`, returning `false` if there is none.
    pub fn complete(&self, locator: &str, result: scriptload::Result<()>) -> bool {
        let mut state = self.state.borrow_mut();
        match state.in_flight.iter().position(|(pending, _)| pending.as_str() == locator) {
            Some(index) => {
                let (_, sender) = state.in_flight.remove(index);
                let _ = sender.send(result);
                true
            }
            None => false,
        }
    }

    pub fn succeed(&self, locator: &str) -> bool {
        self.complete(locator, Ok(()))
    }

    pub fn fail(&self, locator: &str) -> bool {
        self.complete(
            locator,
            Err(LoadError::new(LoadErrorKind::ScriptElement {
                locator: Locator::from(locator),
            })),
        )
    }
}

impl LoadScript for ManualLoader {
    fn load(&self, locator: &Locator) -> LoadFuture {
        let (sender, receiver) = oneshot::channel();
        let mut state = self.state.borrow_mut();
        state.started.push(locator.clone());
        state.in_flight.push((locator.clone(), sender));

        let locator = locator.clone();
        async move {
            receiver
                .await
                .unwrap_or_else(|_| Err(LoadError::new(LoadErrorKind::Canceled { locator })))
        }
        .boxed_local()
    }
}

impl std::fmt::Debug for ManualLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("ManualLoader").field("in_flight", &self.in_flight()).finish()
    }
}
