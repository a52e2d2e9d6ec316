//! Insight tables

use crate::models::{AgingRow, CustomerRow, JiraRow, TicketRecord};

use super::{has_jira_link, sorted_counts, AGING_THRESHOLD_HOURS, TOP_N};

/// Open tickets older than the aging threshold, oldest first
pub fn high_aging(rows: &[&TicketRecord]) -> Vec<AgingRow> {
    let mut aging: Vec<AgingRow> = rows
        .iter()
        .filter(|r| r.status.eq_ignore_ascii_case("open"))
        .filter_map(|r| {
            let age = r.age_hours?;
            (age > AGING_THRESHOLD_HOURS).then(|| AgingRow {
                ticket_id: r.ticket_id.clone(),
                title: r.title.clone(),
                age_hours: age,
            })
        })
        .collect();
    aging.sort_by(|a, b| b.age_hours.total_cmp(&a.age_hours));
    aging
}

/// Customers with the most tickets, by email
pub fn top_customers(rows: &[&TicketRecord]) -> Vec<CustomerRow> {
    let mut counts = sorted_counts(rows.iter().filter_map(|r| r.customer_email.as_deref()));
    counts.truncate(TOP_N);
    counts
        .into_iter()
        .map(|(email, count)| CustomerRow { email, count })
        .collect()
}

/// Jira-linked tickets still open or on hold, in dataset order
pub fn jira_open(rows: &[&TicketRecord]) -> Vec<JiraRow> {
    rows.iter()
        .filter(|r| has_jira_link(r))
        .filter(|r| {
            let lower = r.status.to_lowercase();
            lower == "open" || lower == "onhold"
        })
        .map(|r| JiraRow {
            ticket_id: r.ticket_id.clone(),
            status: r.status.clone(),
            jira_link: r.jira_link.clone().unwrap_or_default(),
        })
        .collect()
}
