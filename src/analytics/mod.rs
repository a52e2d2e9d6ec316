//! Report aggregations
//!
//! Everything here operates on a working set: the rows of a dataset whose
//! parsed `created_at` falls inside the requested date range. Rows without
//! a parsed timestamp never enter the working set.

pub mod charts;
pub mod drilldown;
pub mod tables;

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::models::{DateRange, Dataset, Report, TicketRecord};

/// How many entries the top-N rankings keep
pub const TOP_N: usize = 10;

/// Open tickets older than this many hours count as high-aging
pub const AGING_THRESHOLD_HOURS: f64 = 72.0;

/// Select the rows the report and every drill-down operate on.
pub fn working_set<'a>(rows: &'a [TicketRecord], range: &DateRange) -> Vec<&'a TicketRecord> {
    rows.iter()
        .filter(|r| {
            let Some(created) = r.created_at else {
                return false;
            };
            let date = created.date_naive();
            if let Some(start) = range.start {
                if date < start {
                    return false;
                }
            }
            if let Some(end) = range.end {
                if date > end {
                    return false;
                }
            }
            true
        })
        .collect()
}

/// Build the full report payload for one date range.
pub fn build_report(dataset: &Dataset, range: DateRange) -> Report {
    let rows = working_set(&dataset.rows, &range);

    Report {
        total_tickets: rows.len(),
        start: range.start.or(dataset.min_created),
        end: range.end.or(dataset.max_created),
        tickets_by_date: charts::tickets_by_date(&rows),
        status_breakdown: charts::status_breakdown(&rows),
        top_categories: charts::top_categories(&rows),
        top_subcategories: charts::top_subcategories(&rows),
        agents_closed: charts::agents_closed(&rows),
        tech_issue: charts::tech_issue_breakdown(&rows),
        knowledge_gap: charts::knowledge_gap_breakdown(&rows),
        weekly: charts::weekly(&rows),
        last_four_weeks: charts::last_four_weeks(&rows),
        jira_weekly: charts::jira_weekly(&rows),
        high_aging: tables::high_aging(&rows),
        top_customers: tables::top_customers(&rows),
        jira_open: tables::jira_open(&rows),
    }
}

/// `"{name} ({count})"` — the legend/axis labeling used across the charts
pub(crate) fn count_label(name: &str, count: u64) -> String {
    format!("{name} ({count})")
}

/// Remove a single trailing `" (digits)"` count suffix, if present.
pub(crate) fn strip_count_suffix(label: &str) -> &str {
    if let Some(open) = label.rfind(" (") {
        let inner = &label[open + 2..];
        if let Some(digits) = inner.strip_suffix(')') {
            if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
                return &label[..open];
            }
        }
    }
    label
}

/// Count occurrences, ordered by count descending then label ascending.
pub(crate) fn sorted_counts<'a, I>(values: I) -> Vec<(String, u64)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: HashMap<&str, u64> = HashMap::new();
    for value in values {
        *counts.entry(value).or_default() += 1;
    }
    let mut out: Vec<(String, u64)> = counts
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
    out.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    out
}

/// A status counts as closed when it mentions closed or resolved.
pub(crate) fn is_closed_status(status: &str) -> bool {
    let lower = status.to_lowercase();
    lower.contains("closed") || lower.contains("resolved")
}

/// Collapse a raw status into the Jira chart's status groups.
pub(crate) fn jira_status_group(status: &str) -> Option<&'static str> {
    match status.to_lowercase().as_str() {
        "open" => Some("open"),
        "onhold" | "on hold" => Some("onhold"),
        "closed" | "resolved" => Some("closed"),
        _ => None,
    }
}

/// Sunday-first week bucket used by the Jira weekly chart.
pub(crate) fn jira_week_label(created: DateTime<Utc>) -> String {
    created.format("%Y-W%U").to_string()
}

/// A Jira link counts only when it has non-whitespace content.
pub(crate) fn has_jira_link(record: &TicketRecord) -> bool {
    record
        .jira_link
        .as_deref()
        .is_some_and(|link| !link.trim().is_empty())
}


#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use fixtures::ticket;

    #[test]
    fn test_strip_count_suffix() {
        assert_eq!(strip_count_suffix("Open (42)"), "Open");
        assert_eq!(strip_count_suffix("Open"), "Open");
        assert_eq!(strip_count_suffix("Weird (tag)"), "Weird (tag)");
        assert_eq!(strip_count_suffix("a (1) b"), "a (1) b");
        assert_eq!(strip_count_suffix("Nested (x) (7)"), "Nested (x)");
    }

    #[test]
    fn test_sorted_counts_orders_ties_by_label() {
        let values = ["b", "a", "c", "a", "b"];
        let counts = sorted_counts(values);
        assert_eq!(
            counts,
            vec![
                ("a".to_string(), 2),
                ("b".to_string(), 2),
                ("c".to_string(), 1)
            ]
        );
    }

    #[test]
    fn test_jira_status_group() {
        assert_eq!(jira_status_group("Open"), Some("open"));
        assert_eq!(jira_status_group("On Hold"), Some("onhold"));
        assert_eq!(jira_status_group("Resolved"), Some("closed"));
        assert_eq!(jira_status_group("Pending"), None);
    }

    #[test]
    fn test_working_set_excludes_unparsed_and_out_of_range() {
        let rows = vec![
            ticket("T-1", Some("01/03/2024 10:00:00"), "Open"),
            ticket("T-2", Some("10/03/2024 10:00:00"), "Open"),
            ticket("T-3", None, "Open"),
        ];
        let range = DateRange {
            start: NaiveDate::from_ymd_opt(2024, 3, 5),
            end: NaiveDate::from_ymd_opt(2024, 3, 31),
        };
        let set = working_set(&rows, &range);
        assert_eq!(set.len(), 1);
        assert_eq!(set[0].ticket_id, "T-2");

        // No bounds keeps every dated row
        let set = working_set(&rows, &DateRange::default());
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_working_set_inverted_range_is_empty() {
        let rows = vec![ticket("T-1", Some("01/03/2024"), "Open")];
        let range = DateRange {
            start: NaiveDate::from_ymd_opt(2024, 3, 10),
            end: NaiveDate::from_ymd_opt(2024, 3, 1),
        };
        assert!(working_set(&rows, &range).is_empty());
    }
}
