pub mod task;
pub mod user;

pub use task::{Task, TaskInput, TaskUpdateInput, TodoItem};
pub use user::Account;
