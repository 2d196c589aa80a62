//! Debounced persistence.
//!
//! Each persisted key gets its own flush task. Managers hand the task a fully
//! serialized payload; scheduling again before the quiet window elapses
//! replaces the payload and restarts the window, so a burst of mutations
//! costs one write.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::storage::KeyValueStorage;

/// Messages to control a flush task
enum FlushMessage {
    /// Replace the staged payload and restart the quiet window
    Save(String),
    /// Drop the staged payload without writing it
    Cancel,
    /// Write any staged payload immediately, then stop
    Shutdown,
}

/// Called after each successful write. The spawned flush task holds it
/// across its storage await, hence the `Sync` bound.
pub type AfterSave = Box<dyn Fn() + Send + Sync>;

/// Handle for a running flush task
pub struct SaveScheduler {
    sender: mpsc::UnboundedSender<FlushMessage>,
    task: Option<JoinHandle<()>>,
    key: &'static str,
}

impl SaveScheduler {
    /// Stage `payload` as the value to persist and restart the quiet window.
    pub fn schedule(&self, payload: String) {
        let _ = self.sender.send(FlushMessage::Save(payload));
    }

    /// Drop any staged payload without writing it.
    pub fn cancel(&self) {
        let _ = self.sender.send(FlushMessage::Cancel);
    }

    /// Flush any staged payload and stop the task. Returns once the final
    /// write has completed, so callers can rely on it during app shutdown.
    pub async fn shutdown(&mut self) {
        let _ = self.sender.send(FlushMessage::Shutdown);
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                log::warn!("flush: task for '{}' did not exit cleanly: {}", self.key, e);
            }
        }
    }
}

/// Start a flush task for one storage key.
///
/// `after_save` runs after every successful write; the stats tracker uses it
/// to notify subscribers that their counters reached disk.
pub fn start_save_scheduler(
    storage: Arc<dyn KeyValueStorage>,
    key: &'static str,
    window: Duration,
    after_save: Option<AfterSave>,
) -> SaveScheduler {
    // Unbounded: the newest payload carries the whole state and must never
    // be dropped on a full channel.
    let (tx, rx) = mpsc::unbounded_channel();

    let task = tokio::spawn(async move {
        flush_loop(storage, key, window, after_save, rx).await;
    });

    SaveScheduler {
        sender: tx,
        task: Some(task),
        key,
    }
}

async fn flush_loop(
    storage: Arc<dyn KeyValueStorage>,
    key: &'static str,
    window: Duration,
    after_save: Option<AfterSave>,
    mut receiver: mpsc::UnboundedReceiver<FlushMessage>,
) {
    loop {
        // Idle until the first payload arrives
        let mut staged = loop {
            match receiver.recv().await {
                Some(FlushMessage::Save(payload)) => break payload,
                Some(FlushMessage::Cancel) => continue,
                Some(FlushMessage::Shutdown) | None => return,
            }
        };

        // Armed: wait out the quiet window, restarting it on every new payload
        loop {
            tokio::select! {
                _ = tokio::time::sleep(window) => {
                    write_value(&*storage, key, &staged, after_save.as_ref()).await;
                    break;
                }
                msg = receiver.recv() => match msg {
                    Some(FlushMessage::Save(payload)) => staged = payload,
                    Some(FlushMessage::Cancel) => break,
                    Some(FlushMessage::Shutdown) => {
                        write_value(&*storage, key, &staged, after_save.as_ref()).await;
                        return;
                    }
                    None => {
                        // Handle dropped with a payload staged: flush it
                        write_value(&*storage, key, &staged, after_save.as_ref()).await;
                        return;
                    }
                },
            }
        }
    }
}

async fn write_value(
    storage: &dyn KeyValueStorage,
    key: &str,
    payload: &str,
    after_save: Option<&AfterSave>,
) {
    match storage.set(key, payload).await {
        Ok(()) => {
            log::debug!("flush: wrote {} bytes under '{}'", payload.len(), key);
            if let Some(hook) = after_save {
                hook();
            }
        }
        Err(e) => {
            log::error!("flush: failed to write '{}': {}", key, e);
        }
    }
}
