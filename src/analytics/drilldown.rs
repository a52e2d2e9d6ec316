//! Click-to-filter drill-down
//!
//! Re-filters the working set to match whatever chart element the user
//! clicked. Every arm is a plain boolean filter; the only string work is
//! stripping the `" (N)"` count suffix charts append to their labels.

use crate::error::ApiError;
use crate::models::{ChartKind, Dataset, DateRange, DrilldownQuery, TicketRecord};

use super::{
    has_jira_link, is_closed_status, jira_status_group, jira_week_label, strip_count_suffix,
    working_set, AGING_THRESHOLD_HOURS,
};

/// Rows matching the clicked chart element.
pub fn drill(dataset: &Dataset, query: &DrilldownQuery) -> Result<Vec<TicketRecord>, ApiError> {
    let range = DateRange {
        start: query.start,
        end: query.end,
    };
    let rows = working_set(&dataset.rows, &range);

    let matched: Vec<TicketRecord> = match query.chart {
        ChartKind::TicketsByDate => {
            let status = stripped_label(query)?.to_string();
            let date = query
                .date
                .ok_or_else(|| ApiError::InvalidQuery("date is required".into()))?;
            collect(rows, |r| {
                r.status == status
                    && r.created_at.is_some_and(|c| c.date_naive() == date)
            })
        }
        ChartKind::StatusBreakdown => {
            let status = stripped_label(query)?.to_string();
            collect(rows, |r| r.status == status)
        }
        ChartKind::TopCategories => {
            let category = stripped_label(query)?.to_string();
            collect(rows, |r| r.category.as_deref() == Some(category.as_str()))
        }
        ChartKind::TopSubcategories => {
            let subcategory = stripped_label(query)?.to_string();
            collect(rows, |r| {
                r.subcategory.as_deref() == Some(subcategory.as_str())
            })
        }
        ChartKind::AgentsClosed => {
            let agent = raw_label(query)?.to_string();
            collect(rows, |r| {
                r.agent_name == agent && is_closed_status(&r.status)
            })
        }
        ChartKind::TechIssue => {
            let value = stripped_label(query)?.to_string();
            collect(rows, |r| r.is_tech_issue.as_deref() == Some(value.as_str()))
        }
        ChartKind::KnowledgeGap => {
            let value = stripped_label(query)?.to_string();
            collect(rows, |r| {
                r.knowledge_gap.as_deref() == Some(value.as_str())
            })
        }
        ChartKind::Weekly => {
            let year = query
                .year
                .ok_or_else(|| ApiError::InvalidQuery("year is required".into()))?;
            let week = query
                .week
                .ok_or_else(|| ApiError::InvalidQuery("week is required".into()))?;
            collect(rows, |r| {
                r.iso_year == Some(year) && r.iso_week == Some(week)
            })
        }
        ChartKind::LastFourWeeks => {
            let (year, week) = parse_week_bucket(raw_label(query)?)?;
            collect(rows, |r| {
                r.iso_year == Some(year) && r.iso_week == Some(week)
            })
        }
        ChartKind::JiraWeekly => {
            let week = query
                .week_label
                .as_deref()
                .ok_or_else(|| ApiError::InvalidQuery("week_label is required".into()))?
                .to_string();
            let group = strip_count_suffix(raw_label(query)?).to_lowercase();
            collect(rows, |r| {
                if !has_jira_link(r) {
                    return false;
                }
                let Some(row_group) = jira_status_group(&r.status) else {
                    return false;
                };
                let week_matches = r
                    .created_at
                    .is_some_and(|c| jira_week_label(c) == week);
                week_matches && (group == "total" || row_group == group)
            })
        }
        ChartKind::HighAging => collect(rows, |r| {
            r.status.eq_ignore_ascii_case("open")
                && r.age_hours.is_some_and(|age| age > AGING_THRESHOLD_HOURS)
        }),
        ChartKind::TopCustomers => {
            let email = raw_label(query)?.to_string();
            collect(rows, |r| {
                r.customer_email.as_deref() == Some(email.as_str())
            })
        }
        ChartKind::JiraOpen => collect(rows, |r| {
            let lower = r.status.to_lowercase();
            has_jira_link(r) && (lower == "open" || lower == "onhold")
        }),
    };

    Ok(matched)
}

/// Serialize drill-down rows as a CSV export.
pub fn write_csv(rows: &[TicketRecord]) -> Result<Vec<u8>, ApiError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record([
            "ticket_id",
            "title",
            "created_at",
            "ticket_status",
            "category",
            "sub_category",
            "agent_name",
            "is_tech_issue",
            "knowledge_gap",
            "user_email",
            "jira_link",
            "age_hours",
        ])
        .map_err(|e| ApiError::Export(e.to_string()))?;

    for row in rows {
        writer
            .write_record([
                row.ticket_id.as_str(),
                row.title.as_str(),
                &row.created_at
                    .map(|c| c.format("%Y-%m-%d %H:%M:%S").to_string())
                    .unwrap_or_default(),
                row.status.as_str(),
                row.category.as_deref().unwrap_or(""),
                row.subcategory.as_deref().unwrap_or(""),
                row.agent_name.as_str(),
                row.is_tech_issue.as_deref().unwrap_or(""),
                row.knowledge_gap.as_deref().unwrap_or(""),
                row.customer_email.as_deref().unwrap_or(""),
                row.jira_link.as_deref().unwrap_or(""),
                &row.age_hours
                    .map(|age| format!("{age:.2}"))
                    .unwrap_or_default(),
            ])
            .map_err(|e| ApiError::Export(e.to_string()))?;
    }

    writer
        .into_inner()
        .map_err(|e| ApiError::Export(e.to_string()))
}

fn collect<F>(rows: Vec<&TicketRecord>, keep: F) -> Vec<TicketRecord>
where
    F: Fn(&TicketRecord) -> bool,
{
    rows.into_iter()
        .filter(|r| keep(r))
        .cloned()
        .collect()
}

fn raw_label(query: &DrilldownQuery) -> Result<&str, ApiError> {
    query
        .label
        .as_deref()
        .ok_or_else(|| ApiError::InvalidQuery("label is required".into()))
}

fn stripped_label(query: &DrilldownQuery) -> Result<&str, ApiError> {
    raw_label(query).map(strip_count_suffix)
}

/// Parse a `"{year}-W{week}"` axis label back into its parts.
fn parse_week_bucket(label: &str) -> Result<(i32, u32), ApiError> {
    let invalid = || ApiError::InvalidQuery(format!("bad week bucket: {label}"));
    let (year, week) = label.split_once("-W").ok_or_else(invalid)?;
    Ok((
        year.parse().map_err(|_| invalid())?,
        week.parse().map_err(|_| invalid())?,
    ))
}
