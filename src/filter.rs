use chrono::{DateTime, Days, NaiveDate, TimeZone};

use crate::models::{HistoryEntry, SortOrder};

/// Sort a copy of `entries`; ties keep their original relative order
pub fn sort_entries(entries: &[HistoryEntry], sort_order: SortOrder) -> Vec<HistoryEntry> {
    let mut sorted = entries.to_vec();
    match sort_order {
        SortOrder::Ascending => sorted.sort_by(|a, b| a.ts.cmp(&b.ts)),
        SortOrder::Descending => sorted.sort_by(|a, b| b.ts.cmp(&a.ts)),
        SortOrder::DatasourceAZ => sorted.sort_by(|a, b| a.datasource_name.cmp(&b.datasource_name)),
        SortOrder::DatasourceZA => sorted.sort_by(|a, b| b.datasource_name.cmp(&a.datasource_name)),
    }
    sorted
}

/// Keep entries from the listed data sources; an empty list keeps everything
pub fn filter_by_datasources(entries: &[HistoryEntry], names: &[String]) -> Vec<HistoryEntry> {
    if names.is_empty() {
        return entries.to_vec();
    }
    entries
        .iter()
        .filter(|e| names.iter().any(|n| *n == e.datasource_name))
        .cloned()
        .collect()
}

/// Case-insensitive match against queries, comment and data-source name
pub fn filter_by_search(entries: &[HistoryEntry], text: &str) -> Vec<HistoryEntry> {
    let needle = text.trim().to_lowercase();
    if needle.is_empty() {
        return entries.to_vec();
    }
    entries
        .iter()
        .filter(|e| {
            e.queries.iter().any(|q| q.to_lowercase().contains(&needle))
                || e.comment.to_lowercase().contains(&needle)
                || e.datasource_name.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}

/// Keep entries between the start of the day `to_days` ago and the end of the
/// day `from_days` ago (both counted back from `now`).
pub fn filter_by_time<Tz: TimeZone>(
    entries: &[HistoryEntry],
    (from_days, to_days): (u32, u32),
    now: &DateTime<Tz>,
) -> Vec<HistoryEntry> {
    let newest = retention_boundary(from_days, true, now);
    let oldest = retention_boundary(to_days, false, now);
    entries
        .iter()
        .filter(|e| e.ts < newest && e.ts > oldest)
        .cloned()
        .collect()
}

/// Epoch millis of the local midnight that starts (or, with `end_of_day`,
/// ends) the day `days` days before `now`.
pub fn retention_boundary<Tz: TimeZone>(days: u32, end_of_day: bool, now: &DateTime<Tz>) -> i64 {
    let today = now.date_naive();
    let day = today
        .checked_sub_days(Days::new(u64::from(days)))
        .unwrap_or(NaiveDate::MIN);
    let boundary_day = if end_of_day {
        day.succ_opt().unwrap_or(day)
    } else {
        day
    };
    local_midnight(&now.timezone(), boundary_day)
}

fn local_midnight<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> i64 {
    // A DST jump can skip midnight; the day then starts at 01:00
    [0, 1]
        .iter()
        .filter_map(|&hour| date.and_hms_opt(hour, 0, 0))
        .find_map(|start| tz.from_local_datetime(&start).earliest())
        .map(|dt| dt.timestamp_millis())
        .unwrap_or(0)
}

/// Distinct data-source names, sorted
pub fn datasource_names(entries: &[HistoryEntry]) -> Vec<String> {
    let mut names: Vec<String> = entries.iter().map(|e| e.datasource_name.clone()).collect();
    names.sort();
    names.dedup();
    names
}
