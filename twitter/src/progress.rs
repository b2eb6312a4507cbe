use serde::Serialize;
use tokio::sync::mpsc::UnboundedSender;

use crate::api::Relation;

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ProgressEvent {
    Started { relation: Relation, total: usize },
    Processed { relation: Relation, processed: usize, total: usize },
    Finished { relation: Relation, processed: usize },
}

/// Receives progress while the harvester walks a list of users.
///
/// Implemented for closures, for tokio unbounded senders, and by
/// [`LogProgress`], which writes the events to the `tracing` log.
pub trait Progress: Send + Sync {
    fn report(&self, event: ProgressEvent);
}

impl<F> Progress for F
where
    F: Fn(ProgressEvent) + Send + Sync,
{
    fn report(&self, event: ProgressEvent) {
        self(event)
    }
}

impl Progress for UnboundedSender<ProgressEvent> {
    fn report(&self, event: ProgressEvent) {
        // A dropped receiver just means nobody is listening anymore
        let _ = self.send(event);
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct LogProgress;

impl Progress for LogProgress {
    fn report(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::Started { relation, total } => {
                tracing::info!(%relation, total, "getting {relation}")
            }
            ProgressEvent::Processed {
                relation,
                processed,
                total,
            } => tracing::info!(%relation, processed, total, "{processed} users processed"),
            ProgressEvent::Finished {
                relation,
                processed,
            } => tracing::info!(%relation, processed, "finished {relation}"),
        }
    }
}
