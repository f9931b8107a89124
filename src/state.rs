use sqlx::SqlitePool;

use crate::services::TaskFeed;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub tasks: TaskFeed,
}
