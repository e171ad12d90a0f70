pub mod category;
pub mod task;
pub mod user;

pub use category::{Category, CategoryInput};
pub use task::{Task, TaskInput, TaskPriority, TaskStatus, TaskUpdate};
pub use user::{NewUser, ProfileUpdate, PublicUser, User, UserChanges};
