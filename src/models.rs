//! Data models

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============ Tickets ============

/// One row of the uploaded support-ticket export, plus derived fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketRecord {
    pub ticket_id: String,
    pub title: String,
    /// Parsed creation timestamp; `None` when the cell was blank or unparseable
    pub created_at: Option<DateTime<Utc>>,
    pub status: String,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    /// Display name extracted from the assignment encoding, `"Unassigned"` otherwise
    pub agent_name: String,
    pub is_tech_issue: Option<String>,
    pub knowledge_gap: Option<String>,
    pub customer_email: Option<String>,
    pub jira_link: Option<String>,
    /// Hours since creation, computed at load time
    pub age_hours: Option<f64>,
    pub iso_year: Option<i32>,
    pub iso_week: Option<u32>,
}

/// A fully parsed upload
#[derive(Debug, Clone)]
pub struct Dataset {
    pub rows: Vec<TicketRecord>,
    /// Rows whose `created_at` cell could not be parsed
    pub unparsed_timestamps: usize,
    pub min_created: Option<NaiveDate>,
    pub max_created: Option<NaiveDate>,
}

// ============ Upload ============

/// Response to a successful upload
#[derive(Debug, Serialize, Deserialize)]
pub struct UploadSummary {
    pub session_id: Uuid,
    pub filename: String,
    pub rows: usize,
    pub unparsed_timestamps: usize,
    pub min_created: Option<NaiveDate>,
    pub max_created: Option<NaiveDate>,
}

// ============ Report ============

/// Date-range query shared by the report and drill-down endpoints
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

/// Everything the dashboard page renders for one date range
#[derive(Debug, Serialize, Deserialize)]
pub struct Report {
    pub total_tickets: usize,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub tickets_by_date: Vec<DateStatusSeries>,
    pub status_breakdown: Vec<PieSlice>,
    pub top_categories: Vec<RankedCount>,
    pub top_subcategories: Vec<RankedCount>,
    pub agents_closed: Vec<AgentCount>,
    pub tech_issue: Vec<PieSlice>,
    pub knowledge_gap: Vec<PieSlice>,
    pub weekly: Vec<YearSeries>,
    pub last_four_weeks: Vec<WeekBucket>,
    pub jira_weekly: JiraWeekly,
    pub high_aging: Vec<AgingRow>,
    pub top_customers: Vec<CustomerRow>,
    pub jira_open: Vec<JiraRow>,
}

/// One status line in the tickets-by-date chart
#[derive(Debug, Serialize, Deserialize)]
pub struct DateStatusSeries {
    pub status: String,
    /// Legend label, `"{status} ({series total})"`
    pub label: String,
    pub points: Vec<DateCount>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DateCount {
    pub date: NaiveDate,
    pub count: u64,
}

/// One slice of a value-count pie
#[derive(Debug, Serialize, Deserialize)]
pub struct PieSlice {
    pub value: String,
    /// Slice label, `"{value} ({count})"`
    pub label: String,
    pub count: u64,
}

/// One bar of a top-N ranking
#[derive(Debug, Serialize, Deserialize)]
pub struct RankedCount {
    pub name: String,
    /// Bar label, `"{name} ({count})"`
    pub label: String,
    pub count: u64,
}

/// Closed-ticket count for one agent
#[derive(Debug, Serialize, Deserialize)]
pub struct AgentCount {
    pub agent: String,
    pub count: u64,
}

/// One year's line in the week-over-week chart
#[derive(Debug, Serialize, Deserialize)]
pub struct YearSeries {
    pub year: i32,
    pub points: Vec<WeekCount>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WeekCount {
    pub week: u32,
    pub count: u64,
}

/// One of the four most recent week buckets
#[derive(Debug, Serialize, Deserialize)]
pub struct WeekBucket {
    pub year: i32,
    pub week: u32,
    /// Axis label, `"{year}-W{week}"`
    pub label: String,
    pub count: u64,
}

/// Week-wise status breakdown of Jira-linked tickets
#[derive(Debug, Serialize, Deserialize)]
pub struct JiraWeekly {
    /// Count of Jira-linked tickets in a recognized status group
    pub total: u64,
    pub entries: Vec<JiraWeekEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JiraWeekEntry {
    /// `"%Y-W%U"` bucket of the creation timestamp
    pub week: String,
    /// `open`, `onhold`, `closed` or `total`
    pub group: String,
    /// Legend label, `"{Group} ({group total})"`
    pub label: String,
    pub count: u64,
}

/// Open ticket older than the aging threshold
#[derive(Debug, Serialize, Deserialize)]
pub struct AgingRow {
    pub ticket_id: String,
    pub title: String,
    pub age_hours: f64,
}

/// Ticket count for one customer email
#[derive(Debug, Serialize, Deserialize)]
pub struct CustomerRow {
    pub email: String,
    pub count: u64,
}

/// Jira-linked ticket still open or on hold
#[derive(Debug, Serialize, Deserialize)]
pub struct JiraRow {
    pub ticket_id: String,
    pub status: String,
    pub jira_link: String,
}

// ============ Drill-down ============

/// Which chart or table the user clicked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    TicketsByDate,
    StatusBreakdown,
    TopCategories,
    TopSubcategories,
    AgentsClosed,
    TechIssue,
    KnowledgeGap,
    Weekly,
    LastFourWeeks,
    JiraWeekly,
    HighAging,
    TopCustomers,
    JiraOpen,
}

/// Drill-down query: the clicked element plus the range the report was
/// rendered with. `label` may still carry the `" (N)"` count suffix.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrilldownQuery {
    pub chart: ChartKind,
    pub label: Option<String>,
    pub date: Option<NaiveDate>,
    pub year: Option<i32>,
    pub week: Option<u32>,
    /// `"%Y-W%U"` x-axis value of the Jira weekly chart
    pub week_label: Option<String>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

/// Matching rows for a drill-down
#[derive(Debug, Serialize, Deserialize)]
pub struct DrilldownResponse {
    pub matched: usize,
    pub rows: Vec<TicketRecord>,
}
