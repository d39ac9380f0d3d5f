//! Query history for data-source clients: records the queries a user ran,
//! lets them star, annotate and delete entries, and derives the headings
//! the history list is grouped under.

pub mod db;
pub mod error;
pub mod filter;
pub mod heading;
pub mod models;
pub mod state;
pub mod store;

pub use db::{KeyValueStore, MemoryStore, SqliteStore};
pub use error::{HistoryError, Result};
pub use models::{HistoryEntry, HistorySettings, NewEntry, SortOrder};
pub use state::HistoryState;
pub use store::RichHistory;

/// Install the `env_logger` backend for the `log` facade.
///
/// Only debug builds log by default (at `info`); `RUST_LOG` overrides the
/// level in any build. Calling this more than once is harmless.
pub fn init_logging() {
    let default_level = if cfg!(debug_assertions) { "info" } else { "off" };
    let env = env_logger::Env::default().default_filter_or(default_level);

    if env_logger::Builder::from_env(env).try_init().is_err() {
        log::debug!("Logger already initialized");
    }
}
