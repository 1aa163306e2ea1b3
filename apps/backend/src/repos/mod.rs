pub mod ideas;
pub mod notes;
pub mod projects;
pub mod reminders;
pub mod tasks;
