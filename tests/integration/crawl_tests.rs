use crate::support::{url, ScriptedDiscovery};
use serde_json::json;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use wcraas_control::store::{MemoryLockStore, StoreError};
use wcraas_control::{Address, Coordinator, CrawlContext, LockState};

fn context(store: &MemoryLockStore, discovery: &Arc<ScriptedDiscovery>) -> CrawlContext {
    CrawlContext::new(Arc::new(store.clone()), discovery.clone())
}

fn coordinator() -> Coordinator {
    Coordinator::new(Duration::ZERO)
}

#[tokio::test]
async fn test_depth_first_crawl_of_small_site() {
    let store = MemoryLockStore::new();
    let discovery = Arc::new(
        ScriptedDiscovery::new()
            .links(&url("/"), &[&url("/about"), &url("/blog")])
            .links(&url("/blog"), &[&url("/blog/1"), &url("/blog/2")])
            .links(&url("/blog/2"), &[&url("/"), &url("/about")])
            .links(&url("/about"), &[&url("/team")]),
    );

    let report = coordinator()
        .crawl(&context(&store, &discovery), Address::from(url("/")))
        .await
        .expect("Crawl failed");

    assert_eq!(
        discovery.calls(),
        vec![
            url("/"),
            url("/blog"),
            url("/blog/2"),
            // still pending when /blog/2 links to it again, so it moves up
            url("/about"),
            url("/team"),
            url("/blog/1"),
        ]
    );
    assert_eq!(report.processed, 6);
    assert_eq!(report.done, 6);
    assert_eq!(report.failed, 0);

    for path in ["/", "/about", "/blog", "/blog/1", "/blog/2", "/team"] {
        assert_eq!(store.state_of(&url(path)), Some(LockState::Done), "{}", path);
    }
}

#[tokio::test]
async fn test_cyclic_graph_terminates_and_visits_each_address_once() {
    let store = MemoryLockStore::new();
    let discovery = Arc::new(
        ScriptedDiscovery::new()
            .links(&url("/a"), &[&url("/b"), &url("/c")])
            .links(&url("/b"), &[&url("/a"), &url("/c")])
            .links(&url("/c"), &[&url("/a"), &url("/b"), &url("/d")])
            .links(&url("/d"), &[&url("/a"), &url("/d")]),
    );

    coordinator()
        .crawl(&context(&store, &discovery), Address::from(url("/a")))
        .await
        .expect("Crawl failed");

    let calls = discovery.calls();
    let unique: HashSet<_> = calls.iter().collect();
    assert_eq!(calls.len(), 4);
    assert_eq!(unique.len(), 4);

    for (address, _) in store.writes() {
        let states = store.writes_for(address.as_str());
        assert_eq!(states.len(), 2, "{} written {:?}", address, states);
        assert_eq!(states[0], LockState::Locked);
        assert!(states[0].can_transition_to(states[1]));
    }
}

#[tokio::test]
async fn test_addresses_claimed_elsewhere_are_never_enqueued() {
    let store = MemoryLockStore::with_states([
        (url("/done"), LockState::Done),
        (url("/busy"), LockState::Locked),
        (url("/broken"), LockState::Failed),
    ]);
    let discovery = Arc::new(
        ScriptedDiscovery::new()
            .links(&url("/"), &[&url("/done"), &url("/next")])
            .links(&url("/next"), &[&url("/busy"), &url("/broken"), &url("/done")]),
    );

    let report = coordinator()
        .crawl(&context(&store, &discovery), Address::from(url("/")))
        .await
        .expect("Crawl failed");

    assert_eq!(discovery.calls(), vec![url("/"), url("/next")]);
    assert_eq!(report.skipped, 4);
    assert_eq!(report.enqueued, 1);

    assert!(store.writes_for(&url("/done")).is_empty());
    assert!(store.writes_for(&url("/busy")).is_empty());
    assert!(store.writes_for(&url("/broken")).is_empty());
}

#[tokio::test]
async fn test_failures_do_not_stop_the_crawl() {
    let store = MemoryLockStore::new();
    let discovery = Arc::new(
        ScriptedDiscovery::new()
            .links(&url("/"), &[&url("/ok"), &url("/timeout"), &url("/crash")])
            .fails(&url("/crash"), "ValueError: bad markup")
            .fails(&url("/timeout"), "TimeoutError: page took too long")
            .links(&url("/ok"), &[&url("/ok/child")]),
    );

    let report = coordinator()
        .crawl(&context(&store, &discovery), Address::from(url("/")))
        .await
        .expect("Discovery failures must not abort the crawl");

    assert_eq!(
        discovery.calls(),
        vec![url("/"), url("/crash"), url("/timeout"), url("/ok"), url("/ok/child")]
    );
    assert_eq!(report.failed, 2);
    assert_eq!(report.done, 3);

    assert_eq!(
        store.writes_for(&url("/crash")),
        vec![LockState::Locked, LockState::Failed]
    );
    assert_eq!(
        store.writes_for(&url("/timeout")),
        vec![LockState::Locked, LockState::Failed]
    );
    assert_eq!(store.state_of(&url("/ok/child")), Some(LockState::Done));
}

#[tokio::test]
async fn test_failed_address_is_not_retried_in_later_runs() {
    let store = MemoryLockStore::new();
    let discovery = Arc::new(
        ScriptedDiscovery::new()
            .links(&url("/"), &[&url("/flaky")])
            .fails(&url("/flaky"), "ConnectionError")
            .links(&url("/flaky"), &[&url("/hidden")]),
    );

    coordinator()
        .crawl(&context(&store, &discovery), Address::from(url("/")))
        .await
        .expect("First crawl failed");
    coordinator()
        .crawl(&context(&store, &discovery), Address::from(url("/")))
        .await
        .expect("Second crawl failed");

    assert_eq!(discovery.calls(), vec![url("/"), url("/flaky"), url("/")]);
    assert_eq!(store.state_of(&url("/flaky")), Some(LockState::Failed));
    assert_eq!(store.state_of(&url("/hidden")), None);
}

#[tokio::test]
async fn test_second_run_only_reprocesses_the_seed() {
    let store = MemoryLockStore::new();
    let discovery = Arc::new(
        ScriptedDiscovery::new()
            .links(&url("/"), &[&url("/a"), &url("/b")])
            .links(&url("/a"), &[&url("/b")]),
    );

    coordinator()
        .crawl(&context(&store, &discovery), Address::from(url("/")))
        .await
        .expect("First crawl failed");
    let first_calls = discovery.calls().len();

    let report = coordinator()
        .crawl(&context(&store, &discovery), Address::from(url("/")))
        .await
        .expect("Second crawl failed");

    assert_eq!(discovery.calls().len(), first_calls + 1);
    assert_eq!(report.processed, 1);
    assert_eq!(report.skipped, 2);
    assert_eq!(
        store.writes_for(&url("/")),
        vec![
            LockState::Locked,
            LockState::Done,
            LockState::Locked,
            LockState::Done
        ]
    );
}

#[tokio::test]
async fn test_store_read_failure_aborts_crawl() {
    let store = MemoryLockStore::new();
    store.fail_reads();
    let discovery = Arc::new(ScriptedDiscovery::new().links(&url("/"), &[&url("/a")]));

    let result = coordinator()
        .crawl(&context(&store, &discovery), Address::from(url("/")))
        .await;

    assert!(matches!(result, Err(StoreError::Unavailable(_))));
    assert_eq!(discovery.calls(), vec![url("/")]);
    // The outcome written before the failure stays in place
    assert_eq!(store.state_of(&url("/")), Some(LockState::Done));
}

#[tokio::test]
async fn test_done_write_failure_aborts_crawl() {
    let store = MemoryLockStore::new();
    store.fail_writes_of(LockState::Done);
    let discovery = Arc::new(ScriptedDiscovery::new().links(&url("/"), &[&url("/a")]));

    let result = coordinator()
        .crawl(&context(&store, &discovery), Address::from(url("/")))
        .await;

    assert!(result.is_err());
    assert_eq!(store.state_of(&url("/")), Some(LockState::Locked));
    assert!(store.reads().is_empty());
}

#[tokio::test]
async fn test_no_store_traffic_after_frontier_empties() {
    let store = MemoryLockStore::new();
    let discovery = Arc::new(ScriptedDiscovery::new().links(&url("/"), &[&url("/leaf")]));

    coordinator()
        .crawl(&context(&store, &discovery), Address::from(url("/")))
        .await
        .expect("Crawl failed");

    assert_eq!(store.reads(), vec![Address::from(url("/leaf"))]);
    assert_eq!(
        store.writes(),
        vec![
            (Address::from(url("/")), LockState::Locked),
            (Address::from(url("/")), LockState::Done),
            (Address::from(url("/leaf")), LockState::Locked),
            (Address::from(url("/leaf")), LockState::Done),
        ]
    );
    assert_eq!(discovery.calls().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_iterations_are_paced() {
    let store = MemoryLockStore::new();
    let discovery = Arc::new(
        ScriptedDiscovery::new().links(&url("/"), &[&url("/a"), &url("/b"), &url("/c")]),
    );

    let started = tokio::time::Instant::now();
    Coordinator::new(Duration::from_secs(5))
        .crawl(&context(&store, &discovery), Address::from(url("/")))
        .await
        .expect("Crawl failed");
    let elapsed = started.elapsed();

    // Four iterations, paced three times; nothing after the last one
    assert!(elapsed >= Duration::from_secs(15), "elapsed {:?}", elapsed);
    assert!(elapsed < Duration::from_secs(20), "elapsed {:?}", elapsed);
}

#[tokio::test]
async fn test_list_collections_returns_reply_verbatim() {
    let store = MemoryLockStore::new();
    let discovery = Arc::new(ScriptedDiscovery::new());

    let value = coordinator()
        .list_collections(&context(&store, &discovery))
        .await
        .expect("list_collections failed");

    assert_eq!(value, json!({ "collections": ["pages", "links"] }));
    assert!(discovery.calls().is_empty());
}
