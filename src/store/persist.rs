use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::error::{Result, TrackerError};
use crate::store::assignment::Assignment;

enum PersistCommand {
    Write(Vec<Assignment>),
    Flush(oneshot::Sender<()>),
}

/// Sending side of the persistence queue.
///
/// Cheap to clone. The writer task exits once every handle is dropped.
#[derive(Debug, Clone)]
pub struct PersistHandle {
    tx: mpsc::UnboundedSender<PersistCommand>,
}

impl PersistHandle {
    /// Queue a full snapshot of the sequence. Never blocks.
    pub fn submit(&self, snapshot: Vec<Assignment>) -> Result<()> {
        self.tx
            .send(PersistCommand::Write(snapshot))
            .map_err(|_| TrackerError::Persistence("writer has stopped".to_string()))
    }

    /// Wait until every snapshot submitted before this call is on disk.
    pub async fn flush(&self) -> Result<()> {
        let (done_tx, done_rx) = oneshot::channel();
        self.tx
            .send(PersistCommand::Flush(done_tx))
            .map_err(|_| TrackerError::Persistence("writer has stopped".to_string()))?;
        done_rx
            .await
            .map_err(|_| TrackerError::Persistence("writer stopped before flushing".to_string()))
    }
}

/// Single writer that applies snapshots to the data file in submission order.
///
/// When several snapshots are waiting only the newest one is written, since each
/// snapshot holds the whole sequence. A failed write is fatal: the shutdown token
/// is cancelled and the error is returned from the task.
pub struct Persister {
    path: PathBuf,
    rx: mpsc::UnboundedReceiver<PersistCommand>,
    shutdown: CancellationToken,
}

impl Persister {
    pub fn spawn(
        path: impl Into<PathBuf>,
        shutdown: CancellationToken,
    ) -> (PersistHandle, JoinHandle<Result<()>>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let persister = Self {
            path: path.into(),
            rx,
            shutdown,
        };
        let handle = tokio::spawn(persister.run());
        (PersistHandle { tx }, handle)
    }

    async fn run(mut self) -> Result<()> {
        tracing::info!(path = %self.path.display(), "Persistence writer started");

        while let Some(first) = self.rx.recv().await {
            let mut latest = None;
            let mut waiters = Vec::new();

            let mut next = Some(first);
            while let Some(command) = next {
                match command {
                    PersistCommand::Write(snapshot) => latest = Some(snapshot),
                    PersistCommand::Flush(done) => waiters.push(done),
                }
                next = self.rx.try_recv().ok();
            }

            if let Some(snapshot) = latest {
                if let Err(e) = write_snapshot(&self.path, &snapshot).await {
                    tracing::error!(
                        path = %self.path.display(),
                        error = %e,
                        "Failed to write assignments, stopping"
                    );
                    self.shutdown.cancel();
                    return Err(e);
                }
                tracing::info!(
                    path = %self.path.display(),
                    count = snapshot.len(),
                    "Assignments written to file"
                );
            }

            for done in waiters {
                let _ = done.send(());
            }
        }

        tracing::debug!("Persistence writer stopped");
        Ok(())
    }
}

/// Serialize `records` and replace the file at `path` with them.
///
/// The data goes to a sibling `.tmp` file first and is renamed into place.
pub async fn write_snapshot(path: &Path, records: &[Assignment]) -> Result<()> {
    let bytes = serde_json::to_vec(records)?;

    let mut tmp: OsString = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    tokio::fs::write(&tmp, &bytes)
        .await
        .map_err(|e| TrackerError::Persistence(format!("{}: {}", tmp.display(), e)))?;
    tokio::fs::rename(&tmp, path)
        .await
        .map_err(|e| TrackerError::Persistence(format!("{}: {}", path.display(), e)))?;
    Ok(())
}
