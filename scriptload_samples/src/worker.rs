use crate::SampleError;
use scriptload::error::GenericError;
use scriptload::loader::WorkerScope;
use std::cell::RefCell;

/// A worker scope where every import succeeds, except for URLs marked as failing.
#[derive(Debug, Default)]
pub struct SampleWorkerScope {
    failing: Vec<String>,
    imported: RefCell<Vec<String>>,
}

impl SampleWorkerScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on<S: Into<String>>(mut self, url: S) -> Self {
        self.failing.push(url.into());
        self
    }

    /// URLs successfully imported, in order.
    pub fn imported(&self) -> Vec<String> {
        self.imported.borrow().clone()
    }
}

impl WorkerScope for SampleWorkerScope {
    fn import_scripts(&self, url: &str) -> Result<(), GenericError> {
        if self.failing.iter().any(|failing| failing == url) {
            return Err(GenericError::new(SampleError::ImportFailed(url.to_string())));
        }

        self.imported.borrow_mut().push(url.to_string());
        Ok(())
    }
}
