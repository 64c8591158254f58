pub mod task;

pub use task::{CreateTask, Priority, SortKey, Task, TaskFilter, UpdateTask};
