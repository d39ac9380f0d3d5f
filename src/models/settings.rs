use serde::{Deserialize, Serialize};

/// Days kept when no retention period has been configured
pub const DEFAULT_RETENTION_DAYS: u32 = 7;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct HistorySettings {
    /// Unstarred entries older than this many days are pruned
    pub retention_period: u32,
    pub starred_tab_as_first_tab: bool,
    pub active_datasource_only: bool,
    pub datasource_filters: Vec<String>,
}

impl Default for HistorySettings {
    fn default() -> Self {
        HistorySettings {
            retention_period: DEFAULT_RETENTION_DAYS,
            starred_tab_as_first_tab: false,
            active_datasource_only: false,
            datasource_filters: Vec::new(),
        }
    }
}
