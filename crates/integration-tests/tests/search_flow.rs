//! The debounced search pipeline over a live in-memory catalog.

use std::time::Duration;

use tokio::time::sleep;

use keebcraft_integration_tests::seeded_catalog;
use keebcraft_storefront::search::SearchPipeline;

const WINDOW: Duration = Duration::from_millis(300);
const SETTLE: Duration = Duration::from_millis(350);

#[tokio::test(start_paused = true)]
async fn test_typing_settles_to_one_query_with_results() {
    let catalog = seeded_catalog();
    let pipeline = SearchPipeline::spawn(catalog, WINDOW);
    let mut rx = pipeline.subscribe();

    // Typing "bor" one keystroke at a time, faster than the window.
    for fragment in ["b", "bo", "bor"] {
        pipeline.input(fragment).await;
        sleep(Duration::from_millis(80)).await;
    }
    sleep(SETTLE).await;

    let batch = rx.recv().await.expect("settled batch");
    assert_eq!(batch.term, "bor");
    assert_eq!(batch.keyboards.len(), 1);
    assert_eq!(
        batch.keyboards.first().map(|k| k.name.as_str()),
        Some("Borealis")
    );
}

#[tokio::test(start_paused = true)]
async fn test_clearing_the_field_yields_empty_results() {
    let catalog = seeded_catalog();
    let pipeline = SearchPipeline::spawn(catalog, WINDOW);
    let mut rx = pipeline.subscribe();

    pipeline.input("aurora").await;
    sleep(SETTLE).await;
    pipeline.input("").await;
    sleep(SETTLE).await;

    let hits = rx.recv().await.expect("first batch");
    assert_eq!(hits.term, "aurora");
    assert_eq!(hits.keyboards.len(), 1);

    let cleared = rx.recv().await.expect("cleared batch");
    assert_eq!(cleared.term, "");
    assert!(cleared.keyboards.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_correcting_a_typo_reports_only_the_newest_term() {
    let catalog = seeded_catalog();
    let pipeline = SearchPipeline::spawn(catalog, WINDOW);
    let mut rx = pipeline.subscribe();

    // A term settles, then is corrected before the results are read.
    pipeline.input("casc").await;
    sleep(SETTLE).await;
    pipeline.input("cascade").await;
    sleep(SETTLE).await;

    let first = rx.recv().await.expect("first batch");
    assert_eq!(first.term, "casc");
    let second = rx.recv().await.expect("second batch");
    assert_eq!(second.term, "cascade");
    assert_eq!(
        second.keyboards.first().map(|k| k.name.as_str()),
        Some("Cascade")
    );
}
