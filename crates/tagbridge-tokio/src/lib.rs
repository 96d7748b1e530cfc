mod abortable_task;
pub mod task;

pub use abortable_task::AbortableTask;
