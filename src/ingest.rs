//! CSV ingest and preprocessing
//!
//! Turns an uploaded export into a [`Dataset`]: timestamps parsed
//! day-first, the agent display name extracted from the assignment
//! encoding, and per-row age computed once at load time.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::error::ApiError;
use crate::models::{Dataset, TicketRecord};

/// Columns the export tool always writes
pub const REQUIRED_COLUMNS: [&str; 11] = [
    "ticket_id",
    "title",
    "created_at",
    "ticket_status",
    "cf_tech_issue_category",
    "cf_cf_tech_issue_category_sub-category",
    "last_agent_assignment",
    "cf_is_tech_issue",
    "cf_knowledge_gap",
    "user_email",
    "cf_jira_link",
];

/// Fallback agent name when the assignment cell is blank or carries no name
pub const UNASSIGNED: &str = "Unassigned";

/// Parse an uploaded CSV export into a dataset.
///
/// `now` is the reference point for `age_hours`; injected so tests are
/// deterministic.
pub fn parse_csv(bytes: &[u8], now: DateTime<Utc>) -> Result<Dataset, ApiError> {
    if bytes.is_empty() {
        return Err(ApiError::EmptyFile);
    }

    let mut reader = csv::Reader::from_reader(bytes);
    let headers = reader
        .headers()
        .map_err(|e| ApiError::MalformedCsv(e.to_string()))?
        .clone();

    let mut indices = [0usize; REQUIRED_COLUMNS.len()];
    for (slot, name) in indices.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| ApiError::MissingColumn(name.to_string()))?;
    }
    let [id_idx, title_idx, created_idx, status_idx, cat_idx, subcat_idx, agent_idx, tech_idx, gap_idx, email_idx, jira_idx] =
        indices;

    let mut rows = Vec::new();
    let mut unparsed = 0usize;
    for record in reader.records() {
        let record = record.map_err(|e| ApiError::MalformedCsv(e.to_string()))?;
        let field = |idx: usize| record.get(idx).unwrap_or("").to_string();

        let created_at = parse_created_at(&field(created_idx));
        if created_at.is_none() {
            unparsed += 1;
        }

        rows.push(TicketRecord {
            ticket_id: field(id_idx),
            title: field(title_idx),
            created_at,
            status: field(status_idx),
            category: non_empty(&field(cat_idx)),
            subcategory: non_empty(&field(subcat_idx)),
            agent_name: parse_agent_name(&field(agent_idx)),
            is_tech_issue: non_empty(&field(tech_idx)),
            knowledge_gap: non_empty(&field(gap_idx)),
            customer_email: non_empty(&field(email_idx)),
            jira_link: non_empty(&field(jira_idx)),
            age_hours: created_at
                .map(|c| (now - c).num_seconds() as f64 / 3600.0),
            iso_year: created_at.map(|c| c.iso_week().year()),
            iso_week: created_at.map(|c| c.iso_week().week()),
        });
    }

    let min_created = rows
        .iter()
        .filter_map(|r| r.created_at)
        .min()
        .map(|c| c.date_naive());
    let max_created = rows
        .iter()
        .filter_map(|r| r.created_at)
        .max()
        .map(|c| c.date_naive());

    Ok(Dataset {
        rows,
        unparsed_timestamps: unparsed,
        min_created,
        max_created,
    })
}

/// Extract the display name from the `||`-delimited assignment encoding.
///
/// The first part containing `Name:` wins; everything after the marker is
/// the name.
pub fn parse_agent_name(assignment: &str) -> String {
    for part in assignment.split("||") {
        if let Some(pos) = part.find("Name:") {
            let name = part[pos + "Name:".len()..].trim();
            if !name.is_empty() {
                return name.to_string();
            }
        }
    }
    UNASSIGNED.to_string()
}

/// Parse a creation timestamp, day-first, falling back to ISO and
/// month-first forms. Unparseable input yields `None`.
pub fn parse_created_at(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    const DATETIME_FORMATS: [&str; 10] = [
        "%d/%m/%Y %H:%M:%S",
        "%d/%m/%Y %H:%M",
        "%d-%m-%Y %H:%M:%S",
        "%d-%m-%Y %H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%m/%d/%Y %H:%M:%S",
        "%m/%d/%Y %H:%M",
        "%m-%d-%Y %H:%M:%S",
    ];
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(Utc.from_utc_datetime(&dt));
        }
    }

    const DATE_FORMATS: [&str; 5] = [
        "%d/%m/%Y",
        "%d-%m-%Y",
        "%Y-%m-%d",
        "%m/%d/%Y",
        "%m-%d-%Y",
    ];
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(raw, fmt) {
            let dt = d.and_hms_opt(0, 0, 0)?;
            return Some(Utc.from_utc_datetime(&dt));
        }
    }

    None
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap()
    }

    const HEADER: &str = "ticket_id,title,created_at,ticket_status,cf_tech_issue_category,cf_cf_tech_issue_category_sub-category,last_agent_assignment,cf_is_tech_issue,cf_knowledge_gap,user_email,cf_jira_link";

    #[test]
    fn test_parse_agent_name() {
        assert_eq!(
            parse_agent_name("Id:42||Name: Alice Smith||Team:tier2"),
            "Alice Smith"
        );
        assert_eq!(parse_agent_name("Name:Bob"), "Bob");
        assert_eq!(parse_agent_name(""), UNASSIGNED);
        assert_eq!(parse_agent_name("Id:42||Team:tier2"), UNASSIGNED);
        assert_eq!(parse_agent_name("Name:   "), UNASSIGNED);
    }

    #[test]
    fn test_parse_created_at_day_first() {
        let dt = parse_created_at("25/12/2023 14:30:00").unwrap();
        assert_eq!(dt.date_naive(), NaiveDate::from_ymd_opt(2023, 12, 25).unwrap());

        let dt = parse_created_at("05/03/2024").unwrap();
        assert_eq!(dt.date_naive(), NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
    }

    #[test]
    fn test_parse_created_at_iso_and_fallback() {
        let dt = parse_created_at("2024-03-05 08:15:00").unwrap();
        assert_eq!(dt.date_naive(), NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());

        // Month-first only parses when day-first cannot
        let dt = parse_created_at("12/25/2023 09:00:00").unwrap();
        assert_eq!(dt.date_naive(), NaiveDate::from_ymd_opt(2023, 12, 25).unwrap());

        assert!(parse_created_at("not a date").is_none());
        assert!(parse_created_at("").is_none());
    }

    #[test]
    fn test_parse_csv_missing_column() {
        let data = "ticket_id,title\n1,Broken header\n";
        let err = parse_csv(data.as_bytes(), now()).unwrap_err();
        match err {
            ApiError::MissingColumn(col) => assert_eq!(col, "created_at"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_parse_csv_empty() {
        assert!(matches!(
            parse_csv(b"", now()),
            Err(ApiError::EmptyFile)
        ));
    }

    #[test]
    fn test_parse_csv_rows_and_derived_fields() {
        let data = format!(
            "{HEADER}\n\
             T-1,Login broken,01/03/2024 10:00:00,Open,Auth,SSO,Id:7||Name: Alice,Yes,No,a@example.com,https://jira/X-1\n\
             T-2,Slow page,garbage,Closed,Perf,,,No,,b@example.com,\n\
             T-3,No date,,Open,Auth,SSO,,Yes,Yes,a@example.com,\n"
        );
        let dataset = parse_csv(data.as_bytes(), now()).unwrap();
        assert_eq!(dataset.rows.len(), 3);
        assert_eq!(dataset.unparsed_timestamps, 2);
        assert_eq!(
            dataset.min_created,
            NaiveDate::from_ymd_opt(2024, 3, 1)
        );
        assert_eq!(dataset.max_created, NaiveDate::from_ymd_opt(2024, 3, 1));

        let first = &dataset.rows[0];
        assert_eq!(first.agent_name, "Alice");
        assert_eq!(first.jira_link.as_deref(), Some("https://jira/X-1"));
        // 2024-03-01 10:00 -> 2024-03-15 12:00 is 338 hours
        assert!((first.age_hours.unwrap() - 338.0).abs() < 1e-9);
        assert_eq!(first.iso_year, Some(2024));
        assert_eq!(first.iso_week, Some(9));

        let second = &dataset.rows[1];
        assert!(second.created_at.is_none());
        assert_eq!(second.agent_name, UNASSIGNED);
        assert!(second.subcategory.is_none());
        assert!(second.jira_link.is_none());
    }
}
