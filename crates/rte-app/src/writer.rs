//! Saving the document to `--output` off the event-loop thread.
//!
//! Changes are queued on a channel and written by a task on a small
//! dedicated runtime. When several changes pile up while a write is in
//! flight only the newest one is written.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use tokio::runtime::Runtime;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::output;

/// Upper bound on how long shutdown waits for the last write.
const FLUSH_TIMEOUT: Duration = Duration::from_secs(5);

/// Cheap, cloneable handle for queueing changes.
#[derive(Debug, Clone)]
pub struct ChangeQueue {
    tx: mpsc::UnboundedSender<String>,
}

impl ChangeQueue {
    /// Queue `html` for saving. Never blocks.
    pub fn submit(&self, html: &str) {
        if self.tx.send(html.to_string()).is_err() {
            tracing::warn!(html_len = html.len(), "Document writer stopped, change not saved");
        }
    }
}

/// Owns the writer task and the runtime it runs on.
pub struct DocumentWriter {
    queue: Option<ChangeQueue>,
    task: Option<JoinHandle<usize>>,
    runtime: Runtime,
    path: PathBuf,
}

impl DocumentWriter {
    pub fn spawn(path: PathBuf, markdown: bool) -> io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("rte-writer")
            .enable_all()
            .build()?;
        let (tx, rx) = mpsc::unbounded_channel();
        let task = runtime.spawn(write_loop(path.clone(), markdown, rx));
        tracing::debug!(path = %path.display(), markdown, "Document writer started");
        Ok(Self {
            queue: Some(ChangeQueue { tx }),
            task: Some(task),
            runtime,
            path,
        })
    }

    /// A handle for the change callback. `None` once finished.
    pub fn queue(&self) -> Option<ChangeQueue> {
        self.queue.clone()
    }

    /// Stop accepting changes and wait for the pending one to land.
    /// Returns how many writes succeeded. Idempotent.
    ///
    /// Every [`ChangeQueue`] clone must be dropped first, otherwise this
    /// waits out [`FLUSH_TIMEOUT`].
    pub fn finish(&mut self) -> usize {
        self.queue = None;
        let Some(task) = self.task.take() else {
            return 0;
        };
        match self
            .runtime
            .block_on(async { tokio::time::timeout(FLUSH_TIMEOUT, task).await })
        {
            Ok(Ok(writes)) => {
                tracing::debug!(path = %self.path.display(), writes, "Document writer finished");
                writes
            }
            Ok(Err(e)) => {
                tracing::error!(path = %self.path.display(), "Document writer task failed: {e}");
                0
            }
            Err(_) => {
                tracing::warn!(
                    path = %self.path.display(),
                    timeout_ms = FLUSH_TIMEOUT.as_millis() as u64,
                    "Timed out waiting for the last save"
                );
                0
            }
        }
    }
}

impl Drop for DocumentWriter {
    fn drop(&mut self) {
        self.finish();
    }
}

async fn write_loop(path: PathBuf, markdown: bool, mut rx: mpsc::UnboundedReceiver<String>) -> usize {
    let mut writes = 0;
    while let Some(mut html) = rx.recv().await {
        let mut skipped = 0usize;
        while let Ok(newer) = rx.try_recv() {
            html = newer;
            skipped += 1;
        }

        let target = path.clone();
        let html_len = html.len();
        let result = tokio::task::spawn_blocking(move || {
            let rendered = output::render(&html, markdown);
            output::write_document(&target, &rendered).map(|()| rendered.len())
        })
        .await;

        match result {
            Ok(Ok(bytes)) => {
                writes += 1;
                tracing::debug!(path = %path.display(), html_len, bytes, skipped, "Saved document");
            }
            Ok(Err(e)) => tracing::warn!(path = %path.display(), "Failed to save document: {e}"),
            Err(e) => tracing::error!(path = %path.display(), "Save task panicked: {e}"),
        }
    }
    writes
}
