// Task dispatcher.
// Runs the panel manager's queued work: spawns fetches and rebuilds reset panels.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::debug;

use crate::error::TileError;
use crate::remote::DataFetcher;

use super::panel::{FetchCompletion, FetchRequest, PanelStateManager, PanelTask};

/// Executes `PanelTask`s and feeds fetch completions back into the manager.
pub struct Dispatcher {
    fetcher: Arc<dyn DataFetcher>,
    tx: mpsc::UnboundedSender<FetchCompletion>,
    rx: mpsc::UnboundedReceiver<FetchCompletion>,
    in_flight: usize,
}

impl Dispatcher {
    pub fn new(fetcher: Arc<dyn DataFetcher>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            fetcher,
            tx,
            rx,
            in_flight: 0,
        }
    }

    /// Number of fetches spawned but not yet applied.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Run one scheduling tick. Must be called from within a tokio runtime.
    ///
    /// A `Reexpand` queued by a toggle since the last tick runs here, so the
    /// rebuilt panel is drawn on the very next frame. The fetch it queues is
    /// spawned within the same tick.
    pub fn pump(&mut self, manager: &mut PanelStateManager) {
        while let Ok(completion) = self.rx.try_recv() {
            self.in_flight = self.in_flight.saturating_sub(1);
            manager.apply_completion(completion);
        }

        while let Some(task) = manager.next_task() {
            match task {
                PanelTask::Fetch(request) => self.spawn_fetch(request),
                PanelTask::Reexpand { item_id, epoch } => {
                    debug!(item = %item_id, epoch, "running re-expand");
                    manager.run_reexpand(&item_id, epoch);
                }
            }
        }
    }

    /// Pump until no fetch is in flight and nothing is queued.
    pub async fn settle(&mut self, manager: &mut PanelStateManager) {
        loop {
            self.pump(manager);
            if self.in_flight == 0 && !manager.has_pending_tasks() {
                return;
            }
            if self.in_flight > 0 {
                if let Some(completion) = self.rx.recv().await {
                    self.in_flight -= 1;
                    manager.apply_completion(completion);
                }
            }
        }
    }

    fn spawn_fetch(&mut self, request: FetchRequest) {
        let fetcher = Arc::clone(&self.fetcher);
        let tx = self.tx.clone();
        self.in_flight += 1;

        tokio::spawn(async move {
            let item_id = request.item_id.clone();
            let tab_id = request.tab_id.clone();
            let forced = request.forced;

            // The inner task turns a panicking fetcher into a failed completion
            let outcome = tokio::spawn(async move { fetcher.fetch(&item_id, &tab_id, forced).await })
                .await
                .map_err(TileError::from);

            // Receiver is gone only during shutdown
            let _ = tx.send(FetchCompletion { request, outcome });
        });
    }
}
