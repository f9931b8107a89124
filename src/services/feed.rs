use std::sync::Arc;

use serde::Serialize;
use sqlx::SqlitePool;
use tokio::sync::watch;

use crate::db::repository;
use crate::models::Task;

/// One delivery of the live task query: the full set, ascending by order.
/// Revisions increase strictly across publishes; a subscriber that falls
/// behind skips straight to the latest snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct TaskSnapshot {
    pub revision: u64,
    pub tasks: Vec<Task>,
}

/// The reactive task query. Mutation paths call [`TaskFeed::publish`] after
/// commit; it re-runs the ordered query and pushes the fresh snapshot to
/// every subscriber.
#[derive(Clone)]
pub struct TaskFeed {
    tx: Arc<watch::Sender<TaskSnapshot>>,
}

impl TaskFeed {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(TaskSnapshot {
            revision: 0,
            tasks: Vec::new(),
        });
        Self { tx: Arc::new(tx) }
    }

    pub fn subscribe(&self) -> watch::Receiver<TaskSnapshot> {
        self.tx.subscribe()
    }

    pub async fn publish(&self, db: &SqlitePool) -> Result<(), sqlx::Error> {
        let tasks = repository::fetch_tasks(db).await?;
        self.tx.send_modify(|snapshot| {
            snapshot.revision += 1;
            snapshot.tasks = tasks;
        });
        Ok(())
    }
}

impl Default for TaskFeed {
    fn default() -> Self {
        Self::new()
    }
}
