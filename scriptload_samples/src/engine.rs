//! A toy script engine whose cached data is a digest of the compiled source.

use crate::SampleError;
use scriptload::error::GenericError;
use scriptload::loader::{CompiledScript, EvaluationContext, ScriptEngine};
use sha2::{Digest as _, Sha256};
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

/// Source text containing this marker fails to compile.
pub const SYNTAX_ERROR: &str = "@syntax-error";

/// Source text containing this marker throws when evaluated.
pub const THROW: &str = "@throw";

/// Describes one call to [`ScriptEngine::compile`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Compilation {
    pub source: String,
    pub filename: String,
    pub had_cached_data: bool,
    pub produce_cached_data: bool,
}

/// Describes one evaluation of a compiled script.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Evaluation {
    pub locator: String,
    pub filename: PathBuf,
    pub dirname: PathBuf,
}

#[derive(Debug, Default)]
struct Log {
    compilations: Vec<Compilation>,
    evaluations: Vec<Evaluation>,
}

#[derive(Clone, Debug, Default)]
pub struct SampleEngine {
    log: Rc<RefCell<Log>>,
}

impl SampleEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes the cached data the engine accepts for `source`.
    pub fn cached_data_for(source: &str) -> Vec<u8> {
        Sha256::digest(source.as_bytes()).to_vec()
    }

    pub fn compilations(&self) -> Vec<Compilation> {
        self.log.borrow().compilations.clone()
    }

    pub fn evaluations(&self) -> Vec<Evaluation> {
        self.log.borrow().evaluations.clone()
    }
}

struct SampleScript {
    filename: String,
    throws: bool,
    rejected: bool,
    produced: Option<Vec<u8>>,
    log: Rc<RefCell<Log>>,
}

impl CompiledScript for SampleScript {
    fn run(&mut self, context: &EvaluationContext<'_>) -> Result<(), GenericError> {
        self.log.borrow_mut().evaluations.push(Evaluation {
            locator: context.locator.to_string(),
            filename: context.filename.to_path_buf(),
            dirname: context.dirname.to_path_buf(),
        });

        if self.throws {
            Err(GenericError::new(SampleError::Thrown(self.filename.clone())))
        } else {
            Ok(())
        }
    }

    fn cached_data_rejected(&self) -> bool {
        self.rejected
    }

    fn take_produced_cached_data(&mut self) -> Option<Vec<u8>> {
        self.produced.take()
    }
}

impl ScriptEngine for SampleEngine {
    fn compile(
        &self,
        source: &str,
        filename: &str,
        cached_data: Option<Vec<u8>>,
        produce_cached_data: bool,
    ) -> Result<Box<dyn CompiledScript>, GenericError> {
        self.log.borrow_mut().compilations.push(Compilation {
            source: source.to_string(),
            filename: filename.to_string(),
            had_cached_data: cached_data.is_some(),
            produce_cached_data,
        });

        if source.contains(SYNTAX_ERROR) {
            return Err(GenericError::new(SampleError::Syntax(filename.to_string())));
        }

        let expected = Self::cached_data_for(source);
        Ok(Box::new(SampleScript {
            filename: filename.to_string(),
            throws: source.contains(THROW),
            rejected: cached_data.map_or(false, |data| data != expected),
            produced: if produce_cached_data { Some(expected) } else { None },
            log: self.log.clone(),
        }))
    }
}
