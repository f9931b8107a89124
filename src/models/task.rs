use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One to-do entry. `order` defines display position in ascending sort; it is
/// not required to be unique or contiguous.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub text: String,
    pub completed: bool,
    #[sqlx(rename = "display_order")]
    pub order: i64,
    pub user_id: Option<String>,
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTaskRequest {
    pub text: String,
    /// Explicit display position. When absent the server assigns one past
    /// the current maximum.
    pub order: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTaskRequest {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderUpdate {
    pub id: String,
    pub order: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReorderRequest {
    pub tasks: Vec<OrderUpdate>,
}
