//! PostgreSQL implementations of the store traits.

pub mod task;
pub mod user;

pub use task::TaskRepository;
pub use user::UserRepository;
