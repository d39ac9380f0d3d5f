//! Display helpers that turn history entries into section headings.
//!
//! Time-ordered lists are grouped by calendar day ("March 11"), data-source
//! ordered lists by data-source name. Day boundaries follow the time zone
//! passed in; the plain variants use the local zone.

use chrono::{Local, TimeZone};

use crate::models::{HistoryEntry, SortOrder};

/// Label shown on the day-range slider for an offset of `days`
pub fn map_number_to_relative_label(days: u32) -> String {
    match days {
        0 => "today".to_string(),
        1 => "yesterday".to_string(),
        7 => "a week ago".to_string(),
        14 => "two weeks ago".to_string(),
        n => format!("{} days ago", n),
    }
}

/// "Month Day" for an epoch-millis timestamp in the local time zone
pub fn format_date_from_timestamp(ts: i64) -> String {
    format_date_in(ts, &Local)
}

pub fn format_date_in<Tz: TimeZone>(ts: i64, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    match tz.timestamp_millis_opt(ts).earliest() {
        Some(dt) => dt.format("%B %-d").to_string(),
        None => {
            log::warn!("Timestamp {} is out of range for date formatting", ts);
            ts.to_string()
        }
    }
}

/// Heading for the section an entry falls in under `sort_order`
pub fn build_heading(entry: &HistoryEntry, sort_order: SortOrder) -> String {
    build_heading_in(entry, sort_order, &Local)
}

pub fn build_heading_in<Tz: TimeZone>(entry: &HistoryEntry, sort_order: SortOrder, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    if sort_order.is_by_datasource() {
        entry.datasource_name.clone()
    } else {
        format_date_in(entry.ts, tz)
    }
}

/// Group an already sorted list into consecutive headed sections.
///
/// Headings keep the order in which they first appear; entries keep their
/// relative order inside each section.
pub fn map_entries_to_headings(
    entries: &[HistoryEntry],
    sort_order: SortOrder,
) -> Vec<(String, Vec<HistoryEntry>)> {
    map_entries_to_headings_in(entries, sort_order, &Local)
}

pub fn map_entries_to_headings_in<Tz: TimeZone>(
    entries: &[HistoryEntry],
    sort_order: SortOrder,
    tz: &Tz,
) -> Vec<(String, Vec<HistoryEntry>)>
where
    Tz::Offset: std::fmt::Display,
{
    let mut sections: Vec<(String, Vec<HistoryEntry>)> = Vec::new();

    for entry in entries {
        let heading = build_heading_in(entry, sort_order, tz);
        match sections.iter_mut().find(|(h, _)| *h == heading) {
            Some((_, group)) => group.push(entry.clone()),
            None => sections.push((heading, vec![entry.clone()])),
        }
    }

    sections
}
