use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::api::{run_api_server, ApiState};
use crate::config::ServerConfig;
use crate::error::{Result, TrackerError};
use crate::store::{AssignmentStore, Persister};

/// How long to wait for queued writes after the HTTP server has stopped.
const WRITER_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Owns the configuration and wires the store, the persistence writer and the
/// HTTP server together.
pub struct Server {
    pub config: ServerConfig,
}

impl Server {
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Run until `shutdown` is cancelled.
    ///
    /// 1. Loads the data file into the store
    /// 2. Spawns the persistence writer
    /// 3. Serves HTTP until shutdown (a failed write also triggers shutdown)
    /// 4. Flushes queued writes and waits for the writer to finish
    ///
    /// # Errors
    ///
    /// Returns an error if the data file cannot be read, the listener cannot be
    /// bound, or the writer failed to persist a snapshot.
    pub async fn run(self, shutdown: CancellationToken) -> Result<()> {
        let records = AssignmentStore::load(&self.config.data_file).await?;
        tracing::info!(
            count = records.len(),
            path = %self.config.data_file.display(),
            "Loaded assignments"
        );

        let (persist, writer) = Persister::spawn(self.config.data_file.clone(), shutdown.clone());
        let store = AssignmentStore::from_records(records)
            .with_id_strategy(self.config.id_strategy)
            .with_persist_mode(self.config.persist_mode)
            .with_persister(persist.clone());

        let served = run_api_server(self.config.listen_addr, ApiState::new(store), shutdown).await;

        if let Err(e) = persist.flush().await {
            tracing::warn!(error = %e, "Could not flush pending writes");
        }
        drop(persist);

        let written = match tokio::time::timeout(WRITER_DRAIN_TIMEOUT, writer).await {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => Err(TrackerError::Internal(format!("writer task failed: {}", e))),
            Err(_) => {
                tracing::warn!("Timed out waiting for the persistence writer");
                Ok(())
            }
        };

        served?;
        written
    }
}
