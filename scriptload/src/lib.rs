//! Library for loading individual scripts into a running program, in a page, a worker, or a host process.
//!
//! The types provided by this crate are not thread-safe. Each loader belongs to a single execution context, and
//! background work is spawned onto the [`tokio::task::LocalSet`] of the [`Spawner`] it was created with.

pub mod cache;
pub mod config;
pub mod error;
pub mod event;
pub mod hooks;
pub mod loader;
pub mod locator;
pub mod manager;
pub mod source;
pub mod spawn;

pub use config::Config;
pub use error::{LoadError, LoadErrorKind};
pub use loader::{LoadScript, OnlyOnce, ScriptLoader};
pub use locator::Locator;
pub use manager::ModuleManager;
pub use spawn::Spawner;

pub type Result<T> = std::result::Result<T, error::LoadError>;

#[macro_export]
#[doc(hidden)]
macro_rules! enum_case_from_impl {
    ($implementor: ty, $case_name: ident, $case_type: ty) => {
        impl std::convert::From<$case_type> for $implementor {
            #[inline]
            fn from(value: $case_type) -> Self {
                Self::$case_name(value)
            }
        }
    };
}
