//! Chart aggregations

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::models::{
    AgentCount, DateCount, DateStatusSeries, JiraWeekEntry, JiraWeekly, PieSlice, RankedCount,
    TicketRecord, WeekBucket, WeekCount, YearSeries,
};

use super::{
    count_label, has_jira_link, is_closed_status, jira_status_group, jira_week_label,
    sorted_counts, TOP_N,
};

/// Created tickets per calendar date, one series per status. The legend
/// label carries the series total across the whole range.
pub fn tickets_by_date(rows: &[&TicketRecord]) -> Vec<DateStatusSeries> {
    let mut by_status: BTreeMap<&str, BTreeMap<NaiveDate, u64>> = BTreeMap::new();
    for row in rows {
        if row.status.is_empty() {
            continue;
        }
        let Some(created) = row.created_at else {
            continue;
        };
        *by_status
            .entry(row.status.as_str())
            .or_default()
            .entry(created.date_naive())
            .or_default() += 1;
    }

    by_status
        .into_iter()
        .map(|(status, dates)| {
            let total: u64 = dates.values().sum();
            DateStatusSeries {
                status: status.to_string(),
                label: count_label(status, total),
                points: dates
                    .into_iter()
                    .map(|(date, count)| DateCount { date, count })
                    .collect(),
            }
        })
        .collect()
}

/// Status value counts, as pie slices
pub fn status_breakdown(rows: &[&TicketRecord]) -> Vec<PieSlice> {
    value_pie(rows, |r| {
        if r.status.is_empty() {
            None
        } else {
            Some(r.status.as_str())
        }
    })
}

/// Top categories by ticket count
pub fn top_categories(rows: &[&TicketRecord]) -> Vec<RankedCount> {
    ranked(rows, |r| r.category.as_deref())
}

/// Top sub-categories by ticket count
pub fn top_subcategories(rows: &[&TicketRecord]) -> Vec<RankedCount> {
    ranked(rows, |r| r.subcategory.as_deref())
}

/// Closed/resolved ticket counts per agent, top N
pub fn agents_closed(rows: &[&TicketRecord]) -> Vec<AgentCount> {
    let mut counts = sorted_counts(
        rows.iter()
            .filter(|r| is_closed_status(&r.status))
            .map(|r| r.agent_name.as_str()),
    );
    counts.truncate(TOP_N);
    counts
        .into_iter()
        .map(|(agent, count)| AgentCount { agent, count })
        .collect()
}

/// Tech-issue flag value counts
pub fn tech_issue_breakdown(rows: &[&TicketRecord]) -> Vec<PieSlice> {
    value_pie(rows, |r| r.is_tech_issue.as_deref())
}

/// Knowledge-gap flag value counts
pub fn knowledge_gap_breakdown(rows: &[&TicketRecord]) -> Vec<PieSlice> {
    value_pie(rows, |r| r.knowledge_gap.as_deref())
}

/// Created tickets per ISO week, one series per ISO year
pub fn weekly(rows: &[&TicketRecord]) -> Vec<YearSeries> {
    let mut by_year: BTreeMap<i32, BTreeMap<u32, u64>> = BTreeMap::new();
    for row in rows {
        if let (Some(year), Some(week)) = (row.iso_year, row.iso_week) {
            *by_year.entry(year).or_default().entry(week).or_default() += 1;
        }
    }

    by_year
        .into_iter()
        .map(|(year, weeks)| YearSeries {
            year,
            points: weeks
                .into_iter()
                .map(|(week, count)| WeekCount { week, count })
                .collect(),
        })
        .collect()
}

/// The four most recent ISO week buckets, in chronological order
pub fn last_four_weeks(rows: &[&TicketRecord]) -> Vec<WeekBucket> {
    let mut counts: BTreeMap<(i32, u32), u64> = BTreeMap::new();
    for row in rows {
        if let (Some(year), Some(week)) = (row.iso_year, row.iso_week) {
            *counts.entry((year, week)).or_default() += 1;
        }
    }

    let skip = counts.len().saturating_sub(4);
    counts
        .into_iter()
        .skip(skip)
        .map(|((year, week), count)| WeekBucket {
            year,
            week,
            label: format!("{year}-W{week}"),
            count,
        })
        .collect()
}

/// Week-wise status breakdown of Jira-linked tickets, with a per-week
/// `total` pseudo-group appended after the real groups.
pub fn jira_weekly(rows: &[&TicketRecord]) -> JiraWeekly {
    let mut per_week_group: BTreeMap<(String, &'static str), u64> = BTreeMap::new();
    let mut per_week: BTreeMap<String, u64> = BTreeMap::new();
    let mut per_group: BTreeMap<&'static str, u64> = BTreeMap::new();
    let mut total = 0u64;

    for row in rows {
        if !has_jira_link(row) {
            continue;
        }
        let Some(group) = jira_status_group(&row.status) else {
            continue;
        };
        let Some(created) = row.created_at else {
            continue;
        };
        let week = jira_week_label(created);
        *per_week_group.entry((week.clone(), group)).or_default() += 1;
        *per_week.entry(week).or_default() += 1;
        *per_group.entry(group).or_default() += 1;
        total += 1;
    }

    let mut entries: Vec<JiraWeekEntry> = per_week_group
        .into_iter()
        .map(|((week, group), count)| JiraWeekEntry {
            week,
            group: group.to_string(),
            label: count_label(&capitalize(group), *per_group.get(group).unwrap_or(&0)),
            count,
        })
        .collect();
    entries.extend(per_week.into_iter().map(|(week, count)| JiraWeekEntry {
        week,
        group: "total".to_string(),
        label: count_label("Total", total),
        count,
    }));

    JiraWeekly { total, entries }
}

fn ranked<'a, F>(rows: &'a [&TicketRecord], extract: F) -> Vec<RankedCount>
where
    F: Fn(&'a TicketRecord) -> Option<&'a str>,
{
    let mut counts = sorted_counts(rows.iter().filter_map(|r| extract(r)));
    counts.truncate(TOP_N);
    counts
        .into_iter()
        .map(|(name, count)| RankedCount {
            label: count_label(&name, count),
            name,
            count,
        })
        .collect()
}

fn value_pie<'a, F>(rows: &'a [&TicketRecord], extract: F) -> Vec<PieSlice>
where
    F: Fn(&'a TicketRecord) -> Option<&'a str>,
{
    sorted_counts(rows.iter().filter_map(|r| extract(r)))
        .into_iter()
        .map(|(value, count)| PieSlice {
            label: count_label(&value, count),
            value,
            count,
        })
        .collect()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::fixtures::ticket;
    use crate::models::TicketRecord;

    fn refs(rows: &[TicketRecord]) -> Vec<&TicketRecord> {
        rows.iter().collect()
    }

    #[test]
    fn test_tickets_by_date_labels_carry_series_totals() {
        let rows = vec![
            ticket("T-1", Some("01/03/2024 09:00:00"), "Open"),
            ticket("T-2", Some("01/03/2024 11:00:00"), "Open"),
            ticket("T-3", Some("02/03/2024 09:00:00"), "Open"),
            ticket("T-4", Some("02/03/2024 09:30:00"), "Closed"),
        ];
        let refs = refs(&rows);
        let series = tickets_by_date(&refs);
        assert_eq!(series.len(), 2);

        let open = series.iter().find(|s| s.status == "Open").unwrap();
        assert_eq!(open.label, "Open (3)");
        assert_eq!(open.points.len(), 2);
        assert_eq!(open.points[0].count, 2);

        let closed = series.iter().find(|s| s.status == "Closed").unwrap();
        assert_eq!(closed.label, "Closed (1)");
    }

    #[test]
    fn test_top_categories_truncates_and_labels() {
        let mut rows = Vec::new();
        for i in 0..12 {
            for j in 0..=i {
                let id = format!("T-{i}-{j}");
                rows.push(TicketRecord {
                    category: Some(format!("cat{i:02}")),
                    ..ticket(&id, Some("01/03/2024"), "Open")
                });
            }
        }
        let refs = refs(&rows);
        let top = top_categories(&refs);
        assert_eq!(top.len(), TOP_N);
        assert_eq!(top[0].name, "cat11");
        assert_eq!(top[0].label, "cat11 (12)");
        // cat00 and cat01 fall off the bottom
        assert!(top.iter().all(|c| c.name != "cat00" && c.name != "cat01"));
    }

    #[test]
    fn test_agents_closed_counts_only_closed_like_statuses() {
        let rows = vec![
            TicketRecord {
                agent_name: "Alice".into(),
                ..ticket("T-1", Some("01/03/2024"), "Closed")
            },
            TicketRecord {
                agent_name: "Alice".into(),
                ..ticket("T-2", Some("01/03/2024"), "Resolved by agent")
            },
            TicketRecord {
                agent_name: "Bob".into(),
                ..ticket("T-3", Some("01/03/2024"), "Open")
            },
        ];
        let refs = refs(&rows);
        let counts = agents_closed(&refs);
        assert_eq!(counts.len(), 1);
        assert_eq!(counts[0].agent, "Alice");
        assert_eq!(counts[0].count, 2);
    }

    #[test]
    fn test_flag_pies_skip_blank_values() {
        let rows = vec![
            TicketRecord {
                is_tech_issue: Some("Yes".into()),
                ..ticket("T-1", Some("01/03/2024"), "Open")
            },
            TicketRecord {
                is_tech_issue: Some("Yes".into()),
                ..ticket("T-2", Some("01/03/2024"), "Open")
            },
            ticket("T-3", Some("01/03/2024"), "Open"),
        ];
        let refs = refs(&rows);
        let pie = tech_issue_breakdown(&refs);
        assert_eq!(pie.len(), 1);
        assert_eq!(pie[0].label, "Yes (2)");
    }

    #[test]
    fn test_weekly_splits_series_by_iso_year() {
        let rows = vec![
            // 30/12/2024 is ISO week 1 of 2025
            ticket("T-1", Some("30/12/2024"), "Open"),
            ticket("T-2", Some("02/01/2025"), "Open"),
            ticket("T-3", Some("20/12/2024"), "Open"),
        ];
        let refs = refs(&rows);
        let series = weekly(&refs);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].year, 2024);
        assert_eq!(series[0].points.len(), 1);
        assert_eq!(series[1].year, 2025);
        assert_eq!(series[1].points[0].week, 1);
        assert_eq!(series[1].points[0].count, 2);
    }

    #[test]
    fn test_last_four_weeks_keeps_most_recent_in_order() {
        let rows = vec![
            ticket("T-1", Some("01/01/2024"), "Open"),
            ticket("T-2", Some("08/01/2024"), "Open"),
            ticket("T-3", Some("15/01/2024"), "Open"),
            ticket("T-4", Some("22/01/2024"), "Open"),
            ticket("T-5", Some("29/01/2024"), "Open"),
            ticket("T-6", Some("29/01/2024"), "Open"),
        ];
        let refs = refs(&rows);
        let buckets = last_four_weeks(&refs);
        assert_eq!(buckets.len(), 4);
        assert_eq!(buckets[0].label, "2024-W2");
        assert_eq!(buckets[3].label, "2024-W5");
        assert_eq!(buckets[3].count, 2);
    }

    #[test]
    fn test_jira_weekly_groups_and_totals() {
        let rows = vec![
            TicketRecord {
                jira_link: Some("https://jira/A-1".into()),
                ..ticket("T-1", Some("04/03/2024"), "Open")
            },
            TicketRecord {
                jira_link: Some("https://jira/A-2".into()),
                ..ticket("T-2", Some("05/03/2024"), "Resolved")
            },
            TicketRecord {
                jira_link: Some("https://jira/A-3".into()),
                ..ticket("T-3", Some("05/03/2024"), "Pending")
            },
            // no link: never counted
            ticket("T-4", Some("05/03/2024"), "Open"),
        ];
        let refs = refs(&rows);
        let jira = jira_weekly(&refs);
        assert_eq!(jira.total, 2);

        let week = "2024-W09"; // 4-5 March 2024, Sunday-first numbering
        let open = jira
            .entries
            .iter()
            .find(|e| e.group == "open")
            .unwrap();
        assert_eq!(open.week, week);
        assert_eq!(open.label, "Open (1)");

        let closed = jira
            .entries
            .iter()
            .find(|e| e.group == "closed")
            .unwrap();
        assert_eq!(closed.label, "Closed (1)");

        let total = jira
            .entries
            .iter()
            .find(|e| e.group == "total")
            .unwrap();
        assert_eq!(total.count, 2);
        assert_eq!(total.label, "Total (2)");
    }
}
