pub mod ideas;
pub mod notes;
pub mod projects;
pub mod reminders;
pub mod tasks;

pub use ideas::Entity as Ideas;
pub use ideas::Model as Idea;
pub use notes::Entity as Notes;
pub use notes::Model as Note;
pub use projects::Entity as Projects;
pub use projects::Model as Project;
pub use reminders::Entity as Reminders;
pub use reminders::Model as Reminder;
pub use tasks::Entity as Tasks;
pub use tasks::Model as Task;
