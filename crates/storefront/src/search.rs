//! Debounced incremental catalog search.
//!
//! Keystrokes flow into a bounded channel; a driver task runs the debounce
//! state machine (Idle until a keystroke arrives, Waiting while the window
//! is open, each further keystroke re-arming it) and settles a term only
//! after the window elapses with no newer input. A settled term equal to
//! the previously settled one is suppressed; otherwise any in-flight query
//! is aborted and a new one dispatched, so subscribers only ever observe
//! results for the newest settled term.
//!
//! Whitespace-only terms settle to an immediate empty batch without
//! touching the catalog.

use std::time::Duration;

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use keebcraft_core::Keyboard;

use crate::remote::CatalogApi;

/// Results for one settled search term.
#[derive(Debug, Clone)]
pub struct SearchResults {
    /// The settled (trimmed) term the batch answers.
    pub term: String,
    /// Matching catalog records; empty for a blank term or a failed read.
    pub keyboards: Vec<Keyboard>,
}

/// Handle to a running search pipeline.
///
/// Dropping the handle stops the driver and any in-flight query.
#[derive(Debug)]
pub struct SearchPipeline {
    input: mpsc::Sender<String>,
    results: broadcast::Sender<SearchResults>,
    driver: JoinHandle<()>,
}

impl SearchPipeline {
    /// Spawn the pipeline over a catalog client with the given debounce
    /// window.
    #[must_use]
    pub fn spawn<C>(catalog: C, debounce: Duration) -> Self
    where
        C: CatalogApi + Clone + 'static,
    {
        let (input, keystrokes) = mpsc::channel(64);
        let (results, _) = broadcast::channel(16);
        let driver = tokio::spawn(drive(catalog, debounce, keystrokes, results.clone()));
        Self {
            input,
            results,
            driver,
        }
    }

    /// Feed one keystroke's worth of input (the whole current term).
    pub async fn input(&self, term: impl Into<String>) {
        if self.input.send(term.into()).await.is_err() {
            warn!("search pipeline stopped; input dropped");
        }
    }

    /// Subscribe to settled result batches.
    ///
    /// A subscriber only sees batches settled after it subscribes.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<SearchResults> {
        self.results.subscribe()
    }
}

impl Drop for SearchPipeline {
    fn drop(&mut self) {
        self.driver.abort();
    }
}

async fn drive<C>(
    catalog: C,
    debounce: Duration,
    mut keystrokes: mpsc::Receiver<String>,
    results: broadcast::Sender<SearchResults>,
) where
    C: CatalogApi + Clone + 'static,
{
    // Waiting-state term; None is the Idle state.
    let mut pending: Option<String> = None;
    let mut last_settled: Option<String> = None;
    let mut in_flight: Option<JoinHandle<()>> = None;

    loop {
        let settled = if let Some(term) = pending.take() {
            tokio::select! {
                next = keystrokes.recv() => {
                    match next {
                        // A newer keystroke re-arms the window.
                        Some(next) => {
                            pending = Some(next);
                            continue;
                        }
                        None => break,
                    }
                }
                () = tokio::time::sleep(debounce) => term,
            }
        } else {
            match keystrokes.recv().await {
                Some(term) => {
                    pending = Some(term);
                    continue;
                }
                None => break,
            }
        };

        let settled = settled.trim().to_string();
        if last_settled.as_deref() == Some(settled.as_str()) {
            debug!(term = %settled, "duplicate settled term suppressed");
            continue;
        }
        last_settled = Some(settled.clone());

        // Latest wins: a newer settled term obsoletes any running query.
        if let Some(handle) = in_flight.take() {
            handle.abort();
        }

        if settled.is_empty() {
            let _ = results.send(SearchResults {
                term: settled,
                keyboards: Vec::new(),
            });
            continue;
        }

        let catalog = catalog.clone();
        let results = results.clone();
        in_flight = Some(tokio::spawn(async move {
            let keyboards = catalog.search(&settled).await;
            let _ = results.send(SearchResults {
                term: settled,
                keyboards,
            });
        }));
    }

    if let Some(handle) = in_flight.take() {
        handle.abort();
    }
}
