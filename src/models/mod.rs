pub mod preference;
pub mod task;

pub use preference::{SetThemeRequest, Theme, ThemeResponse};
pub use task::{NewTaskRequest, OrderUpdate, ReorderRequest, Task, UpdateTaskRequest};
