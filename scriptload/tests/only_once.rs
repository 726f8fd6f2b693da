use scriptload::event::{LoaderEventKind, LoaderEventRecorder, NullRecorder};
use scriptload::loader::WorkerLoader;
use scriptload::{LoadErrorKind, LoadScript, Locator, OnlyOnce, Spawner};
use scriptload_samples::{ManualLoader, SampleWorkerScope};
use std::cell::RefCell;
use std::rc::Rc;

mod setup;

#[tokio::test]
async fn concurrent_loads_share_one_underlying_load() {
    setup::local(|spawner| async move {
        let manual = ManualLoader::new();
        let loader = OnlyOnce::new(manual.clone(), spawner.clone());
        let order = Rc::new(RefCell::new(Vec::new()));

        let mut waiters = Vec::new();
        for index in 0..5 {
            let load = loader.load(&Locator::from("a.js"));
            let order = order.clone();
            waiters.push(spawner.spawn(async move {
                load.await.unwrap();
                order.borrow_mut().push(index);
            }));
        }

        assert_eq!(manual.started("a.js"), 1);
        assert!(loader.is_pending("a.js"));
        assert_eq!(loader.pending_count(), 1);

        tokio::task::yield_now().await;
        assert!(manual.succeed("a.js"));
        for waiter in waiters {
            waiter.await.unwrap();
        }

        assert_eq!(*order.borrow(), vec![0, 1, 2, 3, 4]);
        assert_eq!(loader.pending_count(), 0);
    })
    .await;
}

#[tokio::test]
async fn completed_load_is_attempted_again() {
    setup::local(|spawner| async move {
        let manual = ManualLoader::new();
        let loader = OnlyOnce::new(manual.clone(), spawner.clone());
        let locator = Locator::from("a.js");

        let first = loader.load(&locator);
        manual.succeed("a.js");
        first.await.unwrap();
        assert!(!loader.is_pending("a.js"));

        let second = loader.load(&locator);
        assert_eq!(manual.started("a.js"), 2);
        manual.succeed("a.js");
        second.await.unwrap();
    })
    .await;
}

#[tokio::test]
async fn failure_reaches_every_waiter_and_clears_entry() {
    setup::local(|spawner| async move {
        let manual = ManualLoader::new();
        let loader = OnlyOnce::new(manual.clone(), spawner.clone());
        let locator = Locator::from("broken.js");

        let first = loader.load(&locator);
        let second = loader.load(&locator);
        manual.fail("broken.js");

        for result in [first.await, second.await] {
            match result.unwrap_err().kind() {
                LoadErrorKind::ScriptElement { locator } => assert_eq!(locator.as_str(), "broken.js"),
                kind => panic!("unexpected error kind {:?}", kind),
            }
        }

        assert_eq!(loader.pending_count(), 0);
        assert_eq!(manual.started("broken.js"), 1);

        let retry = loader.load(&locator);
        assert_eq!(manual.started("broken.js"), 2);
        manual.succeed("broken.js");
        retry.await.unwrap();
    })
    .await;
}

#[tokio::test]
async fn dropping_a_waiter_does_not_cancel_the_load() {
    setup::local(|spawner| async move {
        let manual = ManualLoader::new();
        let loader = OnlyOnce::new(manual.clone(), spawner.clone());
        let locator = Locator::from("a.js");

        drop(loader.load(&locator));
        let remaining = loader.load(&locator);
        assert_eq!(manual.started("a.js"), 1);

        manual.succeed("a.js");
        remaining.await.unwrap();
        assert_eq!(loader.pending_count(), 0);
    })
    .await;
}

#[tokio::test]
async fn different_locators_load_independently() {
    setup::local(|spawner| async move {
        let manual = ManualLoader::new();
        let loader = OnlyOnce::new(manual.clone(), spawner.clone());

        let a = loader.load(&Locator::from("a.js"));
        let b = loader.load(&Locator::from("b.js"));
        assert_eq!(loader.pending_count(), 2);
        assert_eq!(manual.in_flight(), 2);

        manual.fail("b.js");
        assert!(b.await.is_err());
        assert!(loader.is_pending("a.js"));

        manual.succeed("a.js");
        a.await.unwrap();
    })
    .await;
}

#[tokio::test]
async fn underlying_loads_are_recorded() {
    setup::local(|spawner| async move {
        let manual = ManualLoader::new();
        let recorder = Rc::new(LoaderEventRecorder::new());
        let loader = OnlyOnce::with_recorder(manual.clone(), spawner.clone(), recorder.clone());

        let ok = loader.load(&Locator::from("a.js"));
        let joined = loader.load(&Locator::from("a.js"));
        manual.succeed("a.js");
        ok.await.unwrap();
        joined.await.unwrap();

        let failed = loader.load(&Locator::from("b.js"));
        manual.fail("b.js");
        assert!(failed.await.is_err());

        assert_eq!(
            recorder.kinds_for("a.js"),
            vec![LoaderEventKind::BeginLoadingScript, LoaderEventKind::EndLoadingScriptOk]
        );
        assert_eq!(
            recorder.kinds_for("b.js"),
            vec![LoaderEventKind::BeginLoadingScript, LoaderEventKind::EndLoadingScriptError]
        );
    })
    .await;
}

#[tokio::test]
async fn discarded_events_do_not_affect_loading() {
    setup::local(|spawner| async move {
        let manual = ManualLoader::new();
        let loader = OnlyOnce::with_recorder(manual.clone(), spawner.clone(), Rc::new(NullRecorder));

        let load = loader.load(&Locator::from("a.js"));
        assert!(loader.is_pending("a.js"));
        manual.succeed("a.js");
        load.await.unwrap();
        assert_eq!(loader.pending_count(), 0);
    })
    .await;
}

#[tokio::test]
async fn load_can_be_started_before_its_spawner_is_driven() {
    let spawner = Spawner::new();
    let scope = Rc::new(SampleWorkerScope::new());
    let loader = OnlyOnce::new(WorkerLoader::new(scope.clone()), spawner.clone());

    let load = loader.load(&Locator::from("a.js"));
    assert!(loader.is_pending("a.js"));
    assert_eq!(scope.imported(), vec![String::from("a.js")]);

    spawner.run_until(load).await.unwrap();
    assert_eq!(loader.pending_count(), 0);
}
