pub mod lecturer;
pub mod remote;
pub mod task;

pub use lecturer::{
    PendingTaskToSet, PendingTasksToSet, SettedDatesRequest, TaskToDo, TasksToDo,
};
pub use remote::{Assessment, User};
pub use task::{NewTask, NewTaskRequest, Task};
