use futures::FutureExt as _;
use scriptload::loader::WorkerLoader;
use scriptload::{LoadErrorKind, LoadScript, Locator, ScriptLoader};
use scriptload_samples::SampleWorkerScope;
use std::rc::Rc;

#[test]
fn import_completes_before_load_returns() {
    let scope = Rc::new(SampleWorkerScope::new());
    let loader = ScriptLoader::from(WorkerLoader::new(scope.clone()));

    let load = loader.load(&Locator::from("worker/a.js"));
    assert_eq!(scope.imported(), vec![String::from("worker/a.js")]);
    assert!(load.now_or_never().unwrap().is_ok());
}

#[test]
fn import_error_is_reported_as_failure() {
    let scope = Rc::new(SampleWorkerScope::new().failing_on("worker/bad.js"));
    let loader = WorkerLoader::new(scope.clone());

    let error = loader
        .load(&Locator::from("worker/bad.js"))
        .now_or_never()
        .unwrap()
        .unwrap_err();

    assert!(matches!(error.kind(), LoadErrorKind::WorkerImport { .. }));
    assert!(scope.imported().is_empty());
}
