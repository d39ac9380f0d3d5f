pub mod history_entry;
pub mod settings;

pub use history_entry::*;
pub use settings::*;
