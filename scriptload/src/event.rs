//! Recording of loader events, used by the module manager for load-time telemetry.

use crate::locator::Locator;
use std::cell::RefCell;
use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum LoaderEventKind {
    BeginLoadingScript,
    EndLoadingScriptOk,
    EndLoadingScriptError,
    NodeBeginEvaluatingScript,
    NodeEndEvaluatingScript,
    NodeBeginNativeRequire,
    NodeEndNativeRequire,
    CachedDataFound,
    CachedDataMissed,
    CachedDataRejected,
    CachedDataCreated,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LoaderEvent {
    pub kind: LoaderEventKind,
    pub locator: Locator,
    /// Time elapsed since the recorder was created.
    pub timestamp: Duration,
}

pub trait EventRecorder {
    fn record(&self, kind: LoaderEventKind, locator: &Locator);
}

/// Discards every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullRecorder;

impl EventRecorder for NullRecorder {
    fn record(&self, _: LoaderEventKind, _: &Locator) {}
}

/// Keeps every recorded event in memory.
#[derive(Debug)]
pub struct LoaderEventRecorder {
    start: Instant,
    events: RefCell<Vec<LoaderEvent>>,
}

impl LoaderEventRecorder {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            events: RefCell::default(),
        }
    }

    /// Returns a copy of the events recorded so far, in the order they were recorded.
    pub fn events(&self) -> Vec<LoaderEvent> {
        self.events.borrow().clone()
    }

    pub fn kinds_for(&self, locator: &str) -> Vec<LoaderEventKind> {
        self.events
            .borrow()
            .iter()
            .filter(|event| event.locator.as_str() == locator)
            .map(|event| event.kind)
            .collect()
    }
}

impl Default for LoaderEventRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl EventRecorder for LoaderEventRecorder {
    fn record(&self, kind: LoaderEventKind, locator: &Locator) {
        self.events.borrow_mut().push(LoaderEvent {
            kind,
            locator: locator.clone(),
            timestamp: self.start.elapsed(),
        });
    }
}

#[cfg(test)]
mod tests {
    use crate::event::{EventRecorder, LoaderEventKind, LoaderEventRecorder};
    use crate::locator::Locator;

    #[test]
    fn events_are_kept_in_order() {
        let recorder = LoaderEventRecorder::new();
        let a = Locator::from("a.js");
        recorder.record(LoaderEventKind::NodeBeginEvaluatingScript, &a);
        recorder.record(LoaderEventKind::CachedDataMissed, &Locator::from("b.js"));
        recorder.record(LoaderEventKind::NodeEndEvaluatingScript, &a);

        assert_eq!(
            recorder.kinds_for("a.js"),
            vec![
                LoaderEventKind::NodeBeginEvaluatingScript,
                LoaderEventKind::NodeEndEvaluatingScript
            ]
        );
        assert_eq!(recorder.events().len(), 3);
    }
}
