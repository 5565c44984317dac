//! Translation between domain records and vendor field bags.
//!
//! # Design
//! `build_*` functions produce the operation-specific `fields` of an
//! `RpcEnvelope`; `parse_*` functions turn a successful response body into
//! domain records. Both directions are pure and synchronous. Parsing is
//! total: a missing field becomes an empty string, a missing array becomes
//! an empty `Vec`, so rendering code never has to handle absence.

use chrono::NaiveDate;
use serde_json::{json, Map, Value};

use crate::date::format_date;
use crate::envelope::{Operation, RpcEnvelope};
use crate::error::{MaconomyError, Result};
use crate::types::{
    DailyEntry, DailyTotal, LoginInfo, Period, PeriodSummary, SaveEntry, SearchKind, SearchResult,
    Session, TimesheetLine,
};

/// Line attributes requested by `getperiod`.
pub const LINE_FIELDS: &str = "JobNameVar,JobNumber,TaskName,EntryText,TaskDescriptionVar,\
CustomerNameVar,Invoiceable,ApprovalStatus,CommentProjectManager,TheDate,NumberOf,\
DailyDescription,ActivityNumber,ActivityTextVar,PermanentLine";

/// Line attributes a save asks the vendor to display. Same set as
/// `LINE_FIELDS`, in the order the save screen uses.
pub const SAVE_DISPLAY_FIELDS: &str = "JobNameVar,EntryText,JobNumber,TaskName,TaskDescriptionVar,\
CustomerNameVar,Invoiceable,ApprovalStatus,CommentProjectManager,TheDate,NumberOf,\
DailyDescription,ActivityNumber,ActivityTextVar,PermanentLine";

const RECENTLY_USED_JOBS_SEARCH: &str = "RecentlyUsedJobsSearch";
const TASK_SEARCH: &str = "TaskSearch";

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

pub fn build_login(username: &str, password: &str) -> RpcEnvelope {
    let fields = object(json!({
        "username": username,
        "password": password,
        "includeScreenLayouts": false,
    }));
    RpcEnvelope::new(Operation::Login, None, fields)
}

pub fn build_get_period(session: &Session, start: NaiveDate, end: NaiveDate) -> RpcEnvelope {
    let start = format_date(start);
    let fields = object(json!({
        "inputTheDate": start,
        "startDate": start,
        "endDate": format_date(end),
        "includeLineMetadata": true,
        "lineFields": LINE_FIELDS,
    }));
    RpcEnvelope::new(Operation::GetPeriod, Some(session), fields)
}

/// Create a line (no `line_key`) or update one day of an existing line.
///
/// Hours go out as a single-quoted literal (`'5.5'`); the vendor parses
/// quoted numerics specially and rejects or misreads bare ones.
pub fn build_save_entry(session: &Session, entry: &SaveEntry) -> RpcEnvelope {
    let date = format_date(entry.date);
    let fields = object(json!({
        "theDate": date,
        "InstanceKey": entry.line_key.as_deref().unwrap_or_default(),
        "Fields": {
            "Favorite": "",
            "JobNumber": entry.project_id,
            "TaskName": entry.task,
            "DailyDescription": entry.daily_description,
            "NumberOf": format!("'{}'", entry.hours),
            "EntryText": entry.text,
            "PermanentLine": "false",
            "InternalJob": "true",
            "LineCurrentApprovalStatusDescriptionVar": "",
            "LineCurrentApprovalStatusVar": "",
            "CommentProjectManager": "",
            "Invoiceable": "false",
            "ApprovalStatus": "",
            "EntryDate": date,
            "createfavorite": "undefined",
        },
        "reopenIfSubmitted": false,
        "DisplayFields": SAVE_DISPLAY_FIELDS,
    }));
    RpcEnvelope::new(Operation::SaveTimesheetEntry, Some(session), fields)
}

/// Delete a line. The vendor scopes deletion by a date inside the line's week.
pub fn build_delete_entry(session: &Session, line_key: &str, date: NaiveDate) -> Result<RpcEnvelope> {
    if line_key.trim().is_empty() {
        return Err(MaconomyError::InvalidInput(
            "a line key is required to delete an entry".to_string(),
        ));
    }
    let fields = object(json!({
        "theDate": format_date(date),
        "InstanceKey": line_key,
        "reopenIfSubmitted": false,
    }));
    Ok(RpcEnvelope::new(Operation::DeleteTimesheetEntry, Some(session), fields))
}

pub fn build_search(session: &Session, kind: &SearchKind, query: &str) -> RpcEnvelope {
    let (name, filters) = match kind {
        SearchKind::RecentlyUsedProjects => (
            RECENTLY_USED_JOBS_SEARCH,
            json!([{ "Name": "SearchText", "Value": query }]),
        ),
        SearchKind::TasksForProject(project_id) => (
            TASK_SEARCH,
            json!([
                { "Name": "SearchText", "Value": query },
                { "Name": "JobNumber", "Value": project_id },
            ]),
        ),
    };
    let fields = object(json!({
        "SearchName": name,
        "Fields": filters,
    }));
    RpcEnvelope::new(Operation::Search, Some(session), fields)
}

pub fn build_timesheet_periods(session: &Session) -> RpcEnvelope {
    RpcEnvelope::new(Operation::GetTimesheetPeriods, Some(session), Map::new())
}

pub fn build_timesheet_totals(session: &Session, from: NaiveDate, to: NaiveDate) -> RpcEnvelope {
    let fields = object(json!({
        "fromDate": format_date(from),
        "toDate": format_date(to),
    }));
    RpcEnvelope::new(Operation::GetTimesheetTotals, Some(session), fields)
}

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

pub fn parse_login(json: &Value) -> LoginInfo {
    LoginInfo {
        session_id: text(json, "sessionid"),
        employee_name: text(json, "EmployeeName"),
        employee_number: text(json, "EmployeeNumber"),
        company: text(json, "Company"),
    }
}

/// Flatten `Lines[].Fields.dailyFields[]` into `daily_entries`, keeping the
/// server's day order.
pub fn parse_period(json: &Value) -> Period {
    Period {
        start_date: text(json, "StartDate"),
        end_date: text(json, "EndDate"),
        submitted: flag(json, "Submitted"),
        lines: items(json, "Lines").iter().map(parse_line).collect(),
        daily_totals: items(json, "DailyTotals").iter().map(parse_daily_total).collect(),
    }
}

fn parse_line(line: &Value) -> TimesheetLine {
    let fields = line.get("Fields").unwrap_or(&Value::Null);
    TimesheetLine {
        key: text(line, "InstanceKey"),
        name: text(line, "DisplayName"),
        project_id: text(fields, "JobNumber"),
        task: text(fields, "TaskName"),
        task_description: text(fields, "TaskDescriptionVar"),
        entry_text: text(fields, "EntryText"),
        customer: text(fields, "CustomerNameVar"),
        daily_entries: items(fields, "dailyFields")
            .iter()
            .map(|day| DailyEntry {
                date: text(day, "TheDate"),
                description: text(day, "DailyDescription"),
                hours: text(day, "NumberOf"),
            })
            .collect(),
    }
}

fn parse_daily_total(day: &Value) -> DailyTotal {
    DailyTotal {
        date: text(day, "TheDate"),
        hours: text(day, "NumberOf"),
    }
}

/// Same extraction for every search kind.
pub fn parse_search_results(json: &Value) -> Vec<SearchResult> {
    items(json, "Records")
        .iter()
        .map(|record| SearchResult {
            key: first_text(record, &["Key", "InstanceKey"]),
            display_name: text(record, "DisplayName"),
        })
        .collect()
}

/// Instance key of the line a save created or updated.
pub fn parse_saved_key(json: &Value) -> String {
    text(json, "InstanceKey")
}

pub fn parse_timesheet_periods(json: &Value) -> Vec<PeriodSummary> {
    items(json, "Periods")
        .iter()
        .map(|period| PeriodSummary {
            start_date: text(period, "StartDate"),
            end_date: text(period, "EndDate"),
            submitted: flag(period, "Submitted"),
        })
        .collect()
}

pub fn parse_timesheet_totals(json: &Value) -> Vec<DailyTotal> {
    items(json, "Totals").iter().map(parse_daily_total).collect()
}

/// Field as text. Absent and `null` are empty; numbers keep their JSON text.
fn text(bag: &Value, key: &str) -> String {
    match bag.get(key) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn first_text(bag: &Value, keys: &[&str]) -> String {
    keys.iter()
        .map(|key| text(bag, key))
        .find(|value| !value.is_empty())
        .unwrap_or_default()
}

fn items<'a>(bag: &'a Value, key: &str) -> &'a [Value] {
    bag.get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

fn flag(bag: &Value, key: &str) -> bool {
    match bag.get(key) {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => matches!(s.to_ascii_lowercase().as_str(), "true" | "1" | "yes"),
        Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
        _ => false,
    }
}
