pub mod db;
pub mod settings;

pub use db::db_url;
pub use settings::AppSettings;
