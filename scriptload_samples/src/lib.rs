//! Contains an in-memory host environment for exercising the loaders without a browser or a real script engine.

pub mod document;
pub mod engine;
pub mod manager;
pub mod manual;
pub mod worker;

pub use document::SampleDocument;
pub use engine::SampleEngine;
pub use manager::SampleManager;
pub use manual::ManualLoader;
pub use worker::SampleWorkerScope;

/// Errors raised by the sample collaborators.
#[derive(Clone, Debug, thiserror::Error)]
#[non_exhaustive]
pub enum SampleError {
    #[error("syntax error in {0}")]
    Syntax(String),
    #[error("uncaught exception in {0}")]
    Thrown(String),
    #[error("cannot find module \"{0}\"")]
    ModuleNotFound(String),
    #[error("failed to import {0}")]
    ImportFailed(String),
}
