//! Delayed room deletion at the end of a call.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::sleep;

use crate::platform::PlatformApi;

/// Time given to final audio to finish playing before the room is deleted.
pub const DEFAULT_TEARDOWN_GRACE: Duration = Duration::from_secs(4);

/// A scheduled room deletion.
///
/// Dropping the handle leaves the deletion scheduled. Call
/// [`TeardownHandle::cancel`] to abort it before the grace period ends.
#[derive(Debug)]
pub struct TeardownHandle {
    room: String,
    grace: Duration,
    task: JoinHandle<()>,
}

impl TeardownHandle {
    pub fn room(&self) -> &str {
        &self.room
    }

    pub fn grace(&self) -> Duration {
        self.grace
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Aborts the deletion if it has not run yet.
    pub fn cancel(self) {
        if !self.task.is_finished() {
            tracing::info!(room = %self.room, "cancelling scheduled room teardown");
        }
        self.task.abort();
    }

    /// Waits for the deletion attempt to complete.
    pub async fn wait(self) {
        if let Err(e) = self.task.await {
            if !e.is_cancelled() {
                tracing::error!(room = %self.room, error = %e, "room teardown task failed");
            }
        }
    }
}

/// Schedules deletion of `room` after `grace`.
///
/// Deletion is best-effort: failures are logged, never returned.
pub fn schedule_teardown(
    platform: Arc<dyn PlatformApi>,
    room: impl Into<String>,
    grace: Duration,
) -> TeardownHandle {
    let room = room.into();
    tracing::info!(room = %room, grace_ms = grace.as_millis() as u64, "scheduling room teardown");

    let task_room = room.clone();
    let task = tokio::spawn(async move {
        sleep(grace).await;
        match platform.delete_room(&task_room).await {
            Ok(()) => tracing::info!(room = %task_room, "deleted call room"),
            Err(e) => tracing::warn!(room = %task_room, error = %e, "failed to delete call room"),
        }
    });

    TeardownHandle { room, grace, task }
}
