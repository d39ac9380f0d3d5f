use serde::{Deserialize, Serialize};

/// One recorded query-history record, persisted as a camelCase JSON object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub ts: i64, // epoch millis
    pub datasource_id: String,
    pub datasource_name: String,
    pub queries: Vec<String>,
    pub starred: bool,
    pub comment: String,
    #[serde(default)]
    pub session_name: String,
}

/// Input for recording a new entry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEntry {
    pub datasource_id: String,
    pub datasource_name: String,
    pub queries: Vec<serde_json::Value>,
    pub starred: bool,
    pub comment: String,
    pub session_name: String,
}

impl NewEntry {
    pub fn new(
        datasource_id: impl Into<String>,
        datasource_name: impl Into<String>,
        queries: Vec<serde_json::Value>,
    ) -> Self {
        NewEntry {
            datasource_id: datasource_id.into(),
            datasource_name: datasource_name.into(),
            queries,
            ..Default::default()
        }
    }
}

/// Display order of the history list; also picks the section headings
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    #[serde(rename = "Newest first")]
    Descending,
    #[serde(rename = "Oldest first")]
    Ascending,
    #[serde(rename = "Data source A-Z")]
    DatasourceAZ,
    #[serde(rename = "Data source Z-A")]
    DatasourceZA,
}

impl SortOrder {
    pub fn label(self) -> &'static str {
        match self {
            SortOrder::Descending => "Newest first",
            SortOrder::Ascending => "Oldest first",
            SortOrder::DatasourceAZ => "Data source A-Z",
            SortOrder::DatasourceZA => "Data source Z-A",
        }
    }

    /// Whether entries are grouped by data source instead of by day
    pub fn is_by_datasource(self) -> bool {
        matches!(self, SortOrder::DatasourceAZ | SortOrder::DatasourceZA)
    }
}
