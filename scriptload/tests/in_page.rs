use futures::FutureExt as _;
use scriptload::config::Config;
use scriptload::loader::{InPageLoader, ScriptEvent};
use scriptload::{LoadErrorKind, LoadScript, Locator};
use scriptload_samples::SampleDocument;
use std::rc::Rc;

#[test]
fn load_event_resolves_and_detaches_listeners() {
    let document = Rc::new(SampleDocument::new());
    let loader = InPageLoader::new(document.clone(), &Config::default());

    let mut load = loader.load(&Locator::from("https://example.com/a.js"));
    assert!((&mut load).now_or_never().is_none());

    let element = document.script("https://example.com/a.js").unwrap();
    assert_eq!(element.attribute("type").as_deref(), Some("text/javascript"));
    assert_eq!(element.attribute("async").as_deref(), Some("async"));
    assert_eq!(element.attribute("nonce"), None);
    assert_eq!(element.listener_count(), 2);

    element.fire(ScriptEvent::Load);
    assert_eq!(element.listener_count(), 0);
    assert!(load.now_or_never().unwrap().is_ok());

    // Nothing is listening anymore, so a late event is ignored.
    element.fire(ScriptEvent::Error);
}

#[test]
fn error_event_fails_the_load() {
    let document = Rc::new(SampleDocument::new());
    let loader = InPageLoader::new(document.clone(), &Config::default());

    let load = loader.load(&Locator::from("missing.js"));
    let element = document.script("missing.js").unwrap();
    element.fire(ScriptEvent::Error);
    element.fire(ScriptEvent::Load);

    let error = load.now_or_never().unwrap().unwrap_err();
    match error.kind() {
        LoadErrorKind::ScriptElement { locator } => assert_eq!(locator.as_str(), "missing.js"),
        kind => panic!("unexpected error kind {:?}", kind),
    }
    assert_eq!(element.listener_count(), 0);
}

#[test]
fn configured_attributes_are_applied() {
    let document = Rc::new(SampleDocument::new());
    let config = Config {
        csp_nonce: Some(String::from("r4nd0m")),
        cross_origin: Some(String::from("anonymous")),
        ..Config::default()
    };
    let loader = InPageLoader::new(document.clone(), &config);

    let _load = loader.load(&Locator::from("a.js"));
    let element = document.script("a.js").unwrap();
    assert_eq!(element.attribute("nonce").as_deref(), Some("r4nd0m"));
    assert_eq!(element.attribute("crossorigin").as_deref(), Some("anonymous"));
    assert_eq!(document.scripts().len(), 1);
}
