//! Task entities.

pub mod model;
pub mod status;

pub use model::{CreateTask, Task, TaskStatusUpdate};
pub use status::TaskStatus;
